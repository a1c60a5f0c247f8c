// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk: command line front end for the preprocessing tools.
//
// Manages a workspace directory and runs the crop, deskew and line
// segmentation processors over file groups. Processor parameters come from
// an optional JSON file, with individual flags overriding single values.

use std::path::{Path, PathBuf};
use std::process;

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_engine::OcrsAnalyzer;
use blattwerk_process::{
    CropParams, CropProcessor, DeskewParams, DeskewProcessor, OperationLevel, SegmentLineParams,
    SegmentLineProcessor,
};
use blattwerk_workspace::{RunGroups, Workspace, concat_padded, run_processor};
use clap::{Args, Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "blattwerk", version, about = "Document image preprocessing for OCR workflows", long_about = None)]
struct Cli {
    /// Workspace directory
    #[arg(short = 'w', long, global = true, default_value = ".")]
    workspace: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new workspace
    Init,
    /// Import an image into the workspace
    Add {
        /// File group to add the image to
        #[arg(long, default_value = "IMG")]
        group: String,
        /// File id; numbered within the group when omitted
        #[arg(long)]
        id: Option<String>,
        /// Physical page identifier
        #[arg(long)]
        page_id: Option<String>,
        /// Pixel density of the scan
        #[arg(long)]
        dpi: Option<u32>,
        /// Image file to import
        file: PathBuf,
    },
    /// List tracked files
    List {
        /// Only list files of this group
        #[arg(long)]
        group: Option<String>,
    },
    /// Crop pages to their text extent
    Crop {
        #[command(flatten)]
        run: RunOpts,
        /// Padding around the detected extent in pixels
        #[arg(long)]
        padding: Option<u32>,
    },
    /// Correct page or region orientation and skew
    Deskew {
        #[command(flatten)]
        run: RunOpts,
        /// Segment granularity: page or region
        #[arg(long)]
        level: Option<OperationLevel>,
        /// Minimum confidence for applying orientation results
        #[arg(long)]
        min_orientation_confidence: Option<f32>,
    },
    /// Segment text regions into text lines
    SegmentLines {
        #[command(flatten)]
        run: RunOpts,
        /// Keep existing text lines instead of replacing them
        #[arg(long)]
        keep_lines: bool,
    },
}

/// Options shared by all processor runs.
#[derive(Args)]
struct RunOpts {
    /// Input file group
    #[arg(short = 'I', long, default_value = "IMG")]
    input_group: String,
    /// Output file group for page documents
    #[arg(short = 'O', long)]
    output_group: String,
    /// File group for derived images (defaults per tool)
    #[arg(long)]
    image_group: Option<String>,
    /// Directory holding the detection model
    #[arg(long)]
    models: Option<PathBuf>,
    /// JSON file with processor parameters
    #[arg(short = 'p', long)]
    param_file: Option<PathBuf>,
}

impl RunOpts {
    fn groups(&self, default_image_group: &str) -> RunGroups {
        RunGroups {
            input: self.input_group.clone(),
            output: self.output_group.clone(),
            image: self
                .image_group
                .clone()
                .unwrap_or_else(|| default_image_group.to_string()),
        }
    }

    fn analyzer(&self) -> Result<OcrsAnalyzer> {
        match &self.models {
            Some(dir) => OcrsAnalyzer::from_model_dir(dir),
            None => OcrsAnalyzer::with_defaults(),
        }
    }
}

fn load_params<T>(path: Option<&Path>) -> Result<T>
where
    T: Default + serde::de::DeserializeOwned,
{
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|err| {
                BlattwerkError::Parameter(format!(
                    "invalid parameter file {}: {}",
                    path.display(),
                    err
                ))
            })
        }
        None => Ok(T::default()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        tracing::error!(error = %err, "blattwerk failed");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Init => {
            Workspace::init(&cli.workspace)?;
            Ok(())
        }
        Command::Add {
            group,
            id,
            page_id,
            dpi,
            file,
        } => {
            let mut workspace = Workspace::open(&cli.workspace)?;
            let id = id.unwrap_or_else(|| {
                concat_padded(&group, workspace.files_in_group(&group).len())
            });
            let entry = workspace.import_image(&file, &group, &id, page_id.as_deref(), dpi)?;
            workspace.save()?;
            println!("{}", entry.id);
            Ok(())
        }
        Command::List { group } => {
            let workspace = Workspace::open(&cli.workspace)?;
            let groups = match group {
                Some(group) => vec![group],
                None => workspace.groups(),
            };
            for group in groups {
                for entry in workspace.files_in_group(&group) {
                    println!(
                        "{}\t{}\t{}\t{}",
                        entry.id, entry.group, entry.mimetype, entry.path
                    );
                }
            }
            Ok(())
        }
        Command::Crop { run, padding } => {
            let mut params: CropParams = load_params(run.param_file.as_deref())?;
            if let Some(padding) = padding {
                params.padding = padding;
            }
            let analyzer = run.analyzer()?;
            let processor = CropProcessor::new(params, &analyzer);
            let mut workspace = Workspace::open(&cli.workspace)?;
            run_processor(&mut workspace, &processor, &run.groups("IMG-CROP"))
        }
        Command::Deskew {
            run,
            level,
            min_orientation_confidence,
        } => {
            let mut params: DeskewParams = load_params(run.param_file.as_deref())?;
            if let Some(level) = level {
                params.operation_level = level;
            }
            if let Some(confidence) = min_orientation_confidence {
                params.min_orientation_confidence = confidence;
            }
            info!(level = params.operation_level.keyword(), "Deskewing");
            let analyzer = run.analyzer()?;
            let processor = DeskewProcessor::new(params, &analyzer);
            let mut workspace = Workspace::open(&cli.workspace)?;
            run_processor(&mut workspace, &processor, &run.groups("IMG-DESKEW"))
        }
        Command::SegmentLines { run, keep_lines } => {
            let mut params: SegmentLineParams = load_params(run.param_file.as_deref())?;
            if keep_lines {
                params.overwrite_lines = false;
            }
            let analyzer = run.analyzer()?;
            let processor = SegmentLineProcessor::new(params, &analyzer);
            let mut workspace = Workspace::open(&cli.workspace)?;
            run_processor(&mut workspace, &processor, &run.groups("IMG-SEG"))
        }
    }
}
