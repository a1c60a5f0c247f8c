// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// A workspace is a directory with a `workspace.json` manifest. All tracked
// files live under the root at `<group>/<id>.<ext>` and the manifest records
// them by id, group and MIME type. Every path in the manifest and in page
// documents is relative to the root, so workspaces stay relocatable.

use std::fs;
use std::path::{Path, PathBuf};

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::{ImageKind, MIMETYPE_PAGE};
use blattwerk_page::{PcGts, io as page_io};
use image::DynamicImage;
use tracing::{debug, info, instrument};

use crate::manifest::{FileEntry, Manifest, MANIFEST_FILENAME};

/// An open workspace directory.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    manifest: Manifest,
}

impl Workspace {
    /// Create a fresh workspace at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`BlattwerkError::Workspace`] if a manifest already exists.
    #[instrument(skip_all, fields(root = %root.as_ref().display()))]
    pub fn init(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        if root.join(MANIFEST_FILENAME).exists() {
            return Err(BlattwerkError::Workspace(format!(
                "workspace already initialised at {}",
                root.display()
            )));
        }
        let workspace = Self {
            root,
            manifest: Manifest::default(),
        };
        workspace.save()?;
        info!("Workspace initialised");
        Ok(workspace)
    }

    /// Open an existing workspace at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let manifest_path = root.join(MANIFEST_FILENAME);
        let content = fs::read_to_string(&manifest_path).map_err(|err| {
            BlattwerkError::Workspace(format!(
                "failed to read manifest {}: {}",
                manifest_path.display(),
                err
            ))
        })?;
        let manifest: Manifest = serde_json::from_str(&content).map_err(|err| {
            BlattwerkError::Workspace(format!(
                "invalid manifest {}: {}",
                manifest_path.display(),
                err
            ))
        })?;
        debug!(root = %root.display(), files = manifest.files.len(), "Workspace opened");
        Ok(Self { root, manifest })
    }

    /// Write the manifest back to disk.
    pub fn save(&self) -> Result<()> {
        let manifest_path = self.root.join(MANIFEST_FILENAME);
        let content = serde_json::to_string_pretty(&self.manifest)?;
        fs::write(&manifest_path, content)?;
        debug!(path = %manifest_path.display(), "Manifest saved");
        Ok(())
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a manifest-relative path against the root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Look up a tracked file by id.
    pub fn find_file(&self, id: &str) -> Option<&FileEntry> {
        self.manifest.find(id)
    }

    /// Owned copies of all entries in `group`, sorted by id.
    pub fn files_in_group(&self, group: &str) -> Vec<FileEntry> {
        self.manifest
            .in_group(group)
            .into_iter()
            .cloned()
            .collect()
    }

    /// All group names present in the manifest.
    pub fn groups(&self) -> Vec<String> {
        self.manifest.groups()
    }

    /// Track a file that already exists under the root.
    pub fn add_file(&mut self, entry: FileEntry) {
        self.manifest.add(entry);
    }

    /// Copy an external image into the workspace and track it.
    ///
    /// The file lands at `<group>/<id>.<ext>`, keeping the source extension.
    #[instrument(skip_all, fields(source = %source.as_ref().display(), group, id))]
    pub fn import_image(
        &mut self,
        source: impl AsRef<Path>,
        group: &str,
        id: &str,
        page_id: Option<&str>,
        dpi: Option<u32>,
    ) -> Result<FileEntry> {
        let source = source.as_ref();
        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");
        let kind = match ImageKind::from_extension(extension) {
            Some(kind) => kind,
            None => {
                return Err(BlattwerkError::Workspace(format!(
                    "unsupported image type: {}",
                    source.display()
                )));
            }
        };

        let relative = format!("{}/{}.{}", group, id, extension.to_ascii_lowercase());
        let target = self.resolve(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, &target)?;

        let entry = FileEntry {
            id: id.to_string(),
            group: group.to_string(),
            page_id: page_id.map(str::to_string),
            mimetype: kind.mime_type().to_string(),
            path: relative,
            dpi,
        };
        self.manifest.add(entry.clone());
        info!(path = entry.path, "Image imported");
        Ok(entry)
    }

    /// Load an image file referenced by a manifest-relative path.
    pub fn load_image_path(&self, relative: &str) -> Result<DynamicImage> {
        let path = self.resolve(relative);
        image::open(&path).map_err(|err| {
            BlattwerkError::Image(format!("failed to load {}: {}", path.display(), err))
        })
    }

    /// Load the image behind a tracked file entry.
    pub fn load_image(&self, entry: &FileEntry) -> Result<DynamicImage> {
        self.load_image_path(&entry.path)
    }

    /// Load the original page image a document refers to.
    pub fn load_page_image(&self, doc: &PcGts) -> Result<DynamicImage> {
        self.load_image_path(&doc.page.image_filename)
    }

    /// Save a derived image as PNG under `<group>/<file_id>.png` and track it.
    ///
    /// Returns the manifest-relative path, which callers record in the page
    /// document as an AlternativeImage.
    pub fn save_derived_image(
        &mut self,
        image: &DynamicImage,
        file_id: &str,
        group: &str,
        page_id: Option<&str>,
        dpi: Option<u32>,
    ) -> Result<String> {
        let relative = format!("{}/{}.png", group, file_id);
        let target = self.resolve(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        image.save(&target).map_err(|err| {
            BlattwerkError::Image(format!("failed to save {}: {}", target.display(), err))
        })?;

        self.manifest.add(FileEntry {
            id: file_id.to_string(),
            group: group.to_string(),
            page_id: page_id.map(str::to_string),
            mimetype: ImageKind::Png.mime_type().to_string(),
            path: relative.clone(),
            dpi,
        });
        debug!(path = relative, "Derived image saved");
        Ok(relative)
    }

    /// Read a file entry as a page document.
    ///
    /// PAGE XML entries are parsed directly. Plain image entries are wrapped
    /// in a skeleton document describing the image, so workflows can start
    /// from bare scans.
    pub fn read_page(&self, entry: &FileEntry) -> Result<PcGts> {
        if entry.mimetype == MIMETYPE_PAGE {
            return page_io::read_file(&self.resolve(&entry.path));
        }
        if entry.mimetype.starts_with("image/") {
            let path = self.resolve(&entry.path);
            let (width, height) = image::image_dimensions(&path).map_err(|err| {
                BlattwerkError::Image(format!("failed to probe {}: {}", path.display(), err))
            })?;
            let mut doc = PcGts::for_image(&entry.path, width, height);
            doc.pc_gts_id = Some(entry.id.clone());
            return Ok(doc);
        }
        Err(BlattwerkError::Workspace(format!(
            "cannot interpret {} ({}) as a page document",
            entry.id, entry.mimetype
        )))
    }

    /// Write a page document to `<group>/<file_id>.xml` and track it.
    pub fn write_page(
        &mut self,
        doc: &PcGts,
        file_id: &str,
        group: &str,
        page_id: Option<&str>,
    ) -> Result<String> {
        let relative = format!("{}/{}.xml", group, file_id);
        let target = self.resolve(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        page_io::write_file(&target, doc)?;

        self.manifest.add(FileEntry {
            id: file_id.to_string(),
            group: group.to_string(),
            page_id: page_id.map(str::to_string),
            mimetype: MIMETYPE_PAGE.to_string(),
            path: relative.clone(),
            dpi: None,
        });
        debug!(path = relative, "Page document saved");
        Ok(relative)
    }
}

// -- Tests --------------------------------------------------------------------
