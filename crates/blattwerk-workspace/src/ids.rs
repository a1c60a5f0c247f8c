// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File identifier conventions. Output ids mirror their input id with the
// group name swapped, so `IMG_0007` in group `IMG` becomes `PAGE_0007` in
// group `PAGE` and page lineage stays readable in the manifest.

/// Join `base` and a one-based, zero-padded sequence number.
///
/// `concat_padded("PAGE", 0)` is `PAGE_0001`.
pub fn concat_padded(base: &str, seq: usize) -> String {
    format!("{}_{:04}", base, seq + 1)
}

/// Derive the output file id for the `seq`-th input of a processing run.
///
/// Replaces the input group name inside the input id. When the input id does
/// not contain the group name the result would collide across files, so the
/// id falls back to numbering by sequence position.
pub fn derive_file_id(input_id: &str, input_group: &str, output_group: &str, seq: usize) -> String {
    let derived = input_id.replace(input_group, output_group);
    if derived == input_id {
        concat_padded(output_group, seq)
    } else {
        derived
    }
}

// -- Tests --------------------------------------------------------------------
