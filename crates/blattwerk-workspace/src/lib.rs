// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Workspace file management and the processor contract for Blattwerk.
//!
//! A workspace is a plain directory with a `workspace.json` manifest tracking
//! every file by id, group and MIME type. Processors implement [`Processor`]
//! and are driven over a whole input group by [`run_processor`], which owns
//! the read/annotate/write loop so the processors only see one page document
//! at a time.

pub mod ids;
pub mod manifest;
pub mod processor;
pub mod workspace;

pub use ids::{concat_padded, derive_file_id};
pub use manifest::{FileEntry, Manifest, MANIFEST_FILENAME};
pub use processor::{Processor, RunContext, RunGroups, run_processor};
pub use workspace::Workspace;
