// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine model configuration.
//
// The layout analysis engine (`ocrs`) runs a neural text-detection model
// executed via `rten`. Only the detection model is required: the processors
// locate and measure text but never recognise characters.
//
// The model can be downloaded from the ocrs-models repository:
//   <https://github.com/nickknight/ocrs-models/releases>
//
// Or obtained automatically by running the `ocrs-cli` tool once:
//   ```sh
//   cargo install ocrs-cli
//   ocrs some-image.png  # downloads models to ~/.cache/ocrs/
//   ```
//
// The default cache directory is `$XDG_CACHE_HOME/ocrs` (typically
// `~/.cache/ocrs`).

use std::path::{Path, PathBuf};

use blattwerk_core::error::{BlattwerkError, Result};

/// Default directory for cached model files.
///
/// Follows the XDG Base Directory specification: `$XDG_CACHE_HOME/ocrs`,
/// falling back to `~/.cache/ocrs` when `XDG_CACHE_HOME` is unset.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        // Last resort: current directory.
        PathBuf::from("ocrs-models")
    }
}

/// Well-known filename of the text-detection model.
const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";

/// Configuration for constructing an [`OcrsAnalyzer`](crate::OcrsAnalyzer).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Path to the text-detection model file (`.rten`).
    pub detection_model_path: PathBuf,
}

impl Default for EngineConfig {
    /// Returns a config pointing at the default model cache directory.
    fn default() -> Self {
        Self {
            detection_model_path: default_model_dir().join(DETECTION_MODEL_FILENAME),
        }
    }
}

impl EngineConfig {
    /// Create a config with an explicit model directory.
    ///
    /// Expects the directory to contain `text-detection.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            detection_model_path: dir.as_ref().join(DETECTION_MODEL_FILENAME),
        }
    }

    /// Create a config pointing at a specific model file.
    pub fn from_path(detection_model: impl Into<PathBuf>) -> Self {
        Self {
            detection_model_path: detection_model.into(),
        }
    }

    /// Verify that the model file exists.
    pub fn validate(&self) -> Result<()> {
        if !self.detection_model_path.exists() {
            return Err(BlattwerkError::Engine(format!(
                "detection model not found at {}; run `ocrs-cli` once to download models, \
                 or see <https://github.com/nickknight/ocrs-models/releases>",
                self.detection_model_path.display()
            )));
        }
        Ok(())
    }
}

/// Check whether the detection model exists in the default cache location.
pub fn models_available() -> bool {
    EngineConfig::default().detection_model_path.exists()
}

/// Return the default model directory path (for diagnostics).
pub fn model_directory() -> PathBuf {
    default_model_dir()
}
