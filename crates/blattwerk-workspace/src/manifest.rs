// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The workspace manifest: a JSON inventory of every file the workspace
// tracks. Groups partition the files by processing stage (scanned images,
// cropped images, page descriptions, ...); the page identifier ties the
// files that describe the same physical page together across groups.

use serde::{Deserialize, Serialize};

/// Manifest file name inside a workspace directory.
pub const MANIFEST_FILENAME: &str = "workspace.json";

/// One tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Workspace-unique identifier, also the stem of the file name.
    pub id: String,
    /// Processing stage this file belongs to.
    pub group: String,
    /// Identifier of the physical page this file describes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    /// MIME type, e.g. `image/png` or the PAGE XML type.
    pub mimetype: String,
    /// Path relative to the workspace root.
    pub path: String,
    /// Pixel density of the source scan, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dpi: Option<u32>,
}

/// The full inventory, serialised as `workspace.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl Manifest {
    /// Add an entry, replacing any existing entry with the same id.
    pub fn add(&mut self, entry: FileEntry) {
        self.files.retain(|existing| existing.id != entry.id);
        self.files.push(entry);
    }

    /// Look up an entry by id.
    pub fn find(&self, id: &str) -> Option<&FileEntry> {
        self.files.iter().find(|entry| entry.id == id)
    }

    /// All entries of one group, sorted by id so processing order is stable.
    pub fn in_group(&self, group: &str) -> Vec<&FileEntry> {
        let mut entries: Vec<&FileEntry> = self
            .files
            .iter()
            .filter(|entry| entry.group == group)
            .collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    /// All group names present, sorted and deduplicated.
    pub fn groups(&self) -> Vec<String> {
        let mut groups: Vec<String> = self.files.iter().map(|entry| entry.group.clone()).collect();
        groups.sort();
        groups.dedup();
        groups
    }
}

// -- Tests --------------------------------------------------------------------
