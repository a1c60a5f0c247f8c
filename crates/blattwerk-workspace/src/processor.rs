// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The processor contract. A processor transforms one page document at a time;
// the runner owns the loop around it: reading the input (bootstrapping a
// document for bare images), recording the processing step, deriving the
// output file id and writing the result into the output group.

use blattwerk_core::error::Result;
use blattwerk_page::PcGts;
use tracing::{info, instrument, warn};

use crate::ids::derive_file_id;
use crate::manifest::FileEntry;
use crate::workspace::Workspace;

/// Input, output and derived-image groups of one processor run.
#[derive(Debug, Clone)]
pub struct RunGroups {
    /// Group the input files are read from.
    pub input: String,
    /// Group the output page documents are written to.
    pub output: String,
    /// Group derived images are saved into.
    pub image: String,
}

/// Per-file context handed to a processor.
pub struct RunContext<'a> {
    pub workspace: &'a mut Workspace,
    pub input_group: &'a str,
    pub image_group: &'a str,
}

impl RunContext<'_> {
    /// File id for an image derived from `input`, placed in the image group.
    pub fn derived_image_id(&self, input: &FileEntry, seq: usize) -> String {
        derive_file_id(&input.id, self.input_group, self.image_group, seq)
    }
}

/// A page-at-a-time processing step.
pub trait Processor {
    /// Tool name recorded in the processing step metadata.
    fn tool_name(&self) -> &'static str;

    /// Workflow step identifier, e.g. `preprocessing/optimization/cropping`.
    fn step(&self) -> &'static str;

    /// Parameter values recorded as labels of the processing step.
    fn parameters(&self) -> Vec<(String, String)>;

    /// Transform one page document in place.
    ///
    /// `seq` is the position of `input` within the input group; processors
    /// use it when deriving file ids for images they save via `ctx`.
    fn process_page(
        &self,
        doc: &mut PcGts,
        input: &FileEntry,
        seq: usize,
        ctx: &mut RunContext<'_>,
    ) -> Result<()>;
}

/// Run a processor over every file of the input group.
///
/// Files are processed in id order. The first failing page aborts the run;
/// pages already written stay in the workspace, and the manifest is saved on
/// success only.
#[instrument(skip_all, fields(tool = processor.tool_name(), input = groups.input, output = groups.output))]
pub fn run_processor(
    workspace: &mut Workspace,
    processor: &dyn Processor,
    groups: &RunGroups,
) -> Result<()> {
    let entries = workspace.files_in_group(&groups.input);
    if entries.is_empty() {
        warn!(group = groups.input, "No files in input group");
    }

    for (seq, entry) in entries.iter().enumerate() {
        info!(
            seq,
            file_id = %entry.id,
            page_id = entry.page_id.as_deref().unwrap_or(""),
            "Processing input file"
        );
        let mut doc = workspace.read_page(entry)?;
        doc.append_processing_step(processor.step(), processor.tool_name(), &processor.parameters());

        let mut ctx = RunContext {
            workspace: &mut *workspace,
            input_group: &groups.input,
            image_group: &groups.image,
        };
        processor.process_page(&mut doc, entry, seq, &mut ctx)?;

        let file_id = derive_file_id(&entry.id, &groups.input, &groups.output, seq);
        workspace.write_page(&doc, &file_id, &groups.output, entry.page_id.as_deref())?;
    }

    workspace.save()?;
    info!(files = entries.len(), "Processor run complete");
    Ok(())
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use blattwerk_core::error::BlattwerkError;
    use blattwerk_core::types::MIMETYPE_PAGE;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    struct MarkingProcessor;

    impl Processor for MarkingProcessor {
        fn tool_name(&self) -> &'static str {
            "blattwerk-test"
        }

        fn step(&self) -> &'static str {
            "test/marking"
        }

        fn parameters(&self) -> Vec<(String, String)> {
            vec![("mark".to_string(), "true".to_string())]
        }

        fn process_page(
            &self,
            doc: &mut PcGts,
            input: &FileEntry,
            seq: usize,
            ctx: &mut RunContext<'_>,
        ) -> Result<()> {
            doc.page.orientation = Some(0.0);
            // Exercise the derived-image path the way real processors do.
            let image = ctx.workspace.load_page_image(doc)?;
            let image_id = ctx.derived_image_id(input, seq);
            let relative = ctx.workspace.save_derived_image(
                &image,
                &image_id,
                ctx.image_group,
                input.page_id.as_deref(),
                input.dpi,
            )?;
            doc.page.add_alternative_image(relative, None);
            Ok(())
        }
    }

    struct FailingProcessor;

    impl Processor for FailingProcessor {
        fn tool_name(&self) -> &'static str {
            "blattwerk-fail"
        }

        fn step(&self) -> &'static str {
            "test/failing"
        }

        fn parameters(&self) -> Vec<(String, String)> {
            Vec::new()
        }

        fn process_page(
            &self,
            _doc: &mut PcGts,
            _input: &FileEntry,
            _seq: usize,
            _ctx: &mut RunContext<'_>,
        ) -> Result<()> {
            Err(BlattwerkError::Engine("deliberate failure".to_string()))
        }
    }

    fn seeded_workspace(dir: &TempDir) -> Workspace {
        let source = dir.path().join("scan.png");
        RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]))
            .save(&source)
            .unwrap();
        let mut ws = Workspace::init(dir.path().join("ws")).unwrap();
        ws.import_image(&source, "IMG", "IMG_0001", Some("P_0001"), Some(300))
            .unwrap();
        ws.import_image(&source, "IMG", "IMG_0002", Some("P_0002"), Some(300))
            .unwrap();
        ws
    }

    #[test]
    fn run_writes_outputs_and_records_step() {
        let dir = TempDir::new().unwrap();
        let mut ws = seeded_workspace(&dir);
        let groups = RunGroups {
            input: "IMG".to_string(),
            output: "PAGE".to_string(),
            image: "IMG-TEST".to_string(),
        };

        run_processor(&mut ws, &MarkingProcessor, &groups).unwrap();

        let out = ws.find_file("PAGE_0002").unwrap().clone();
        assert_eq!(out.group, "PAGE");
        assert_eq!(out.mimetype, MIMETYPE_PAGE);
        assert_eq!(out.page_id.as_deref(), Some("P_0002"));

        let doc = ws.read_page(&out).unwrap();
        assert_eq!(doc.page.orientation, Some(0.0));
        assert_eq!(doc.metadata.items.len(), 1);
        assert_eq!(doc.metadata.items[0].name, "test/marking");
        assert_eq!(doc.metadata.items[0].value, "blattwerk-test");
        assert_eq!(
            doc.page.latest_alternative_image().unwrap().filename,
            "IMG-TEST/IMG-TEST_0002.png"
        );
        assert!(ws.resolve("IMG-TEST/IMG-TEST_0002.png").exists());
    }

    #[test]
    fn run_persists_manifest() {
        let dir = TempDir::new().unwrap();
        let mut ws = seeded_workspace(&dir);
        let groups = RunGroups {
            input: "IMG".to_string(),
            output: "PAGE".to_string(),
            image: "IMG-TEST".to_string(),
        };
        run_processor(&mut ws, &MarkingProcessor, &groups).unwrap();
        let root = ws.root().to_path_buf();
        drop(ws);

        let reopened = Workspace::open(&root).unwrap();
        assert_eq!(reopened.files_in_group("PAGE").len(), 2);
        assert_eq!(reopened.files_in_group("IMG-TEST").len(), 2);
    }

    #[test]
    fn run_aborts_on_first_failure() {
        let dir = TempDir::new().unwrap();
        let mut ws = seeded_workspace(&dir);
        let groups = RunGroups {
            input: "IMG".to_string(),
            output: "PAGE".to_string(),
            image: "IMG-TEST".to_string(),
        };

        assert!(run_processor(&mut ws, &FailingProcessor, &groups).is_err());
        assert!(ws.find_file("PAGE_0001").is_none());
    }

    #[test]
    fn empty_input_group_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let mut ws = Workspace::init(dir.path().join("ws")).unwrap();
        let groups = RunGroups {
            input: "IMG".to_string(),
            output: "PAGE".to_string(),
            image: "IMG-TEST".to_string(),
        };
        run_processor(&mut ws, &MarkingProcessor, &groups).unwrap();
        assert!(ws.files_in_group("PAGE").is_empty());
    }
}
