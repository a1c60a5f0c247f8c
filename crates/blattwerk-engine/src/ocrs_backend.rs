// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout analysis backed by the `ocrs` engine, a pure-Rust OCR stack running
// neural models via `rten`.
//
// The engine exposes word detection and line grouping. The remaining
// operations are reconstructed strictly from those primitives:
//
// - Orientation: score word detection across the four cardinal rotations of
//   a downscaled copy; the rotation with the most detected text wins, and
//   the ratio against the runner-up is the confidence.
// - Skew: median of the engine's word quad angles.
// - Reading direction / line order: word order within the engine's lines and
//   the sequence of the lines themselves.
//
// No pixel-level analysis happens on this side of the seam.

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::{CardinalRotation, ReadingDirection, TextLineOrder};
use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams, OcrInput};
use rten::Model;
use rten_imageproc::RotatedRect;
use tracing::{debug, info, instrument};

use crate::analyzer::{LayoutAnalysis, LayoutAnalyzer, OrientationDetection, TextQuad};
use crate::config::EngineConfig;

/// Longest image side used for orientation scoring. Detection quality at this
/// size is ample for deciding between quarter turns, and it keeps the four
/// detection passes cheap.
const DETECTION_MAX_DIM: u32 = 1024;

/// Layout analyzer backed by the `ocrs` text detection model.
///
/// Model loading is the expensive step: construct the analyzer once per run
/// and reuse it for every page.
///
/// # Performance
///
/// **Important:** the `ocrs` and `rten` crates must be compiled in release
/// mode. Debug builds will be extremely slow (10-100x slower).
pub struct OcrsAnalyzer {
    engine: OcrsEngine,
}

impl OcrsAnalyzer {
    /// Create an analyzer, loading the detection model from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BlattwerkError::Engine`] if the model file is missing or
    /// corrupt.
    #[instrument(skip_all, fields(detection = %config.detection_model_path.display()))]
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        info!("Loading text detection model");
        let detection_model = Model::load_file(&config.detection_model_path).map_err(|err| {
            BlattwerkError::Engine(format!(
                "failed to load detection model from {}: {}",
                config.detection_model_path.display(),
                err
            ))
        })?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: None,
            ..Default::default()
        })
        .map_err(|err| {
            BlattwerkError::Engine(format!("failed to initialise layout engine: {}", err))
        })?;

        info!("Layout engine initialised successfully");
        Ok(Self { engine })
    }

    /// Create an analyzer using the default model cache directory.
    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    /// Create an analyzer loading the model from a specific directory.
    pub fn from_model_dir(dir: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::new(EngineConfig::from_dir(dir))
    }

    /// Convert an image into the engine's input tensor.
    fn prepare(&self, image: &DynamicImage) -> Result<OcrInput> {
        // Convert to RGB8, the format expected by ocrs.
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            BlattwerkError::Engine(format!(
                "failed to create image source ({}x{}): {}",
                width, height, err
            ))
        })?;

        self.engine.prepare_input(source).map_err(|err| {
            BlattwerkError::Engine(format!("engine preprocessing failed: {}", err))
        })
    }

    fn detect_word_rects(&self, input: &OcrInput) -> Result<Vec<RotatedRect>> {
        self.engine
            .detect_words(input)
            .map_err(|err| BlattwerkError::Engine(format!("word detection failed: {}", err)))
    }
}

impl LayoutAnalyzer for OcrsAnalyzer {
    fn detect_blocks(&self, image: &DynamicImage) -> Result<Vec<TextQuad>> {
        // ocrs groups words into lines but offers nothing coarser; blocks are
        // reported at line granularity, which the crop extent union absorbs.
        self.detect_lines(image)
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn detect_lines(&self, image: &DynamicImage) -> Result<Vec<TextQuad>> {
        let input = self.prepare(image)?;
        let words = self.detect_word_rects(&input)?;
        debug!(word_count = words.len(), "Words detected");

        let lines = self.engine.find_text_lines(&input, &words);
        debug!(line_count = lines.len(), "Text lines found");

        Ok(lines
            .iter()
            .filter_map(|line| {
                let quads: Vec<TextQuad> = line.iter().map(quad_from_rect).collect();
                line_union_quad(&quads)
            })
            .collect())
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn detect_orientation(&self, image: &DynamicImage) -> Result<Option<OrientationDetection>> {
        let small = downscale_for_detection(image);

        let mut scores = [0.0f32; 4];
        for (i, slot) in scores.iter_mut().enumerate() {
            let rotated = match i {
                0 => small.clone(),
                1 => small.rotate90(),
                2 => small.rotate180(),
                _ => small.rotate270(),
            };
            let input = self.prepare(&rotated)?;
            let words = self.detect_word_rects(&input)?;
            *slot = words.iter().map(|rect| quad_from_rect(rect).area()).sum();
        }
        debug!(?scores, "Cardinal rotation scores");

        Ok(pick_orientation(&scores))
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn analyze_layout(&self, image: &DynamicImage) -> Result<Option<LayoutAnalysis>> {
        let input = self.prepare(image)?;
        let words = self.detect_word_rects(&input)?;
        if words.is_empty() {
            debug!("No text detected");
            return Ok(None);
        }

        let word_quads: Vec<TextQuad> = words.iter().map(quad_from_rect).collect();
        let skew_degrees = median_skew_degrees(&word_quads);

        let lines = self.engine.find_text_lines(&input, &words);
        let line_words: Vec<Vec<TextQuad>> = lines
            .iter()
            .map(|line| line.iter().map(quad_from_rect).collect())
            .collect();
        let reading_direction = infer_reading_direction(&line_words);

        let line_quads: Vec<TextQuad> = line_words
            .iter()
            .filter_map(|words| line_union_quad(words))
            .collect();
        let line_order = infer_line_order(&line_quads);

        debug!(
            skew_degrees,
            reading_direction = reading_direction.keyword(),
            line_order = line_order.keyword(),
            "Layout analysis complete"
        );
        Ok(Some(LayoutAnalysis {
            skew_degrees,
            reading_direction,
            line_order,
        }))
    }
}

// -- Engine output translation ------------------------------------------------

fn quad_from_rect(rect: &RotatedRect) -> TextQuad {
    TextQuad::from_corners(rect.corners().map(|corner| (corner.x, corner.y)))
}

/// Axis-aligned union of the word quads of one line.
fn line_union_quad(words: &[TextQuad]) -> Option<TextQuad> {
    let mut iter = words.iter();
    let mut bbox = iter.next()?.bounding_box();
    for word in iter {
        bbox = bbox.union(&word.bounding_box());
    }
    Some(TextQuad::from_bbox(&bbox))
}

/// Winner of the cardinal rotation scoring, or `None` when no rotation
/// detected any text.
fn pick_orientation(scores: &[f32; 4]) -> Option<OrientationDetection> {
    let mut best_idx = 0;
    for (i, score) in scores.iter().enumerate() {
        if *score > scores[best_idx] {
            best_idx = i;
        }
    }
    let best = scores[best_idx];
    if best <= 0.0 {
        return None;
    }
    let runner_up = scores
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != best_idx)
        .map(|(_, score)| *score)
        .fold(0.0f32, f32::max);
    // A floor of one area unit keeps the ratio finite when the other
    // rotations detected nothing at all.
    let confidence = best / runner_up.max(1.0);
    let rotation = match best_idx {
        0 => CardinalRotation::None,
        1 => CardinalRotation::Clockwise90,
        2 => CardinalRotation::Clockwise180,
        _ => CardinalRotation::Clockwise270,
    };
    Some(OrientationDetection { rotation, confidence })
}

/// Clockwise correction angle from the median word quad tilt.
fn median_skew_degrees(quads: &[TextQuad]) -> f32 {
    if quads.is_empty() {
        return 0.0;
    }
    let mut angles: Vec<f32> = quads.iter().map(TextQuad::edge_angle_degrees).collect();
    angles.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = angles.len() / 2;
    let median = if angles.len() % 2 == 0 {
        (angles[mid - 1] + angles[mid]) / 2.0
    } else {
        angles[mid]
    };
    // The measured tilt is the text's deviation; the correction undoes it.
    -median
}

/// Majority vote over the word progression within each line.
fn infer_reading_direction(lines: &[Vec<TextQuad>]) -> ReadingDirection {
    let mut ltr = 0u32;
    let mut rtl = 0u32;
    let mut ttb = 0u32;
    let mut btt = 0u32;
    for words in lines {
        if words.len() < 2 {
            continue;
        }
        let first = words[0].center();
        let last = words[words.len() - 1].center();
        let dx = last.0 - first.0;
        let dy = last.1 - first.1;
        if dx.abs() >= dy.abs() {
            if dx >= 0.0 {
                ltr += 1;
            } else {
                rtl += 1;
            }
        } else if dy >= 0.0 {
            ttb += 1;
        } else {
            btt += 1;
        }
    }
    let best = ltr.max(rtl).max(ttb).max(btt);
    if best == 0 || best == ltr {
        ReadingDirection::LeftToRight
    } else if best == rtl {
        ReadingDirection::RightToLeft
    } else if best == ttb {
        ReadingDirection::TopToBottom
    } else {
        ReadingDirection::BottomToTop
    }
}

/// Majority vote over the progression of consecutive line centers.
fn infer_line_order(lines: &[TextQuad]) -> TextLineOrder {
    let mut ttb = 0u32;
    let mut btt = 0u32;
    let mut ltr = 0u32;
    let mut rtl = 0u32;
    for pair in lines.windows(2) {
        let a = pair[0].center();
        let b = pair[1].center();
        let dx = b.0 - a.0;
        let dy = b.1 - a.1;
        if dy.abs() >= dx.abs() {
            if dy >= 0.0 {
                ttb += 1;
            } else {
                btt += 1;
            }
        } else if dx >= 0.0 {
            ltr += 1;
        } else {
            rtl += 1;
        }
    }
    let best = ttb.max(btt).max(ltr).max(rtl);
    if best == 0 || best == ttb {
        TextLineOrder::TopToBottom
    } else if best == btt {
        TextLineOrder::BottomToTop
    } else if best == ltr {
        TextLineOrder::LeftToRight
    } else {
        TextLineOrder::RightToLeft
    }
}

/// Shrink large images before orientation scoring, preserving aspect ratio.
fn downscale_for_detection(image: &DynamicImage) -> DynamicImage {
    if image.width().max(image.height()) <= DETECTION_MAX_DIM {
        return image.clone();
    }
    image.resize(
        DETECTION_MAX_DIM,
        DETECTION_MAX_DIM,
        image::imageops::FilterType::Lanczos3,
    )
}

// -- Tests --------------------------------------------------------------------
