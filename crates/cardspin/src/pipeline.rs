//! Batch orchestration: discover pairs, render, encode, report.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;

use crate::discover::{discover_pairs, CardPair, DiscoverError};
use crate::encode::{save_frames_png, write_gif, EncodeError};
use crate::report::{BatchReport, CardReport};
use crate::sequence::{generate_sequence, ConfigError, RotationConfig};
use cardspin_core::RgbImage;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Discover(#[from] DiscoverError),
    #[error("failed to create output directory {}: {}", .path.display(), .source)]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to load {}: {}", .path.display(), .source)]
    LoadImage {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Everything needed to run a batch.
#[derive(Clone, Debug)]
pub struct BatchOptions {
    /// Directory scanned for `<id>_front.jpg` / `<id>_back.jpg` pairs.
    pub input_dir: PathBuf,
    /// Directory the GIFs are written into, created on demand.
    pub output_dir: PathBuf,
    pub config: RotationConfig,
    /// When set, every rendered frame is also written here as a PNG.
    pub frames_dir: Option<PathBuf>,
}

fn load_rgb(path: &Path) -> Result<RgbImage, PipelineError> {
    let load_err = |source| PipelineError::LoadImage {
        path: path.to_path_buf(),
        source,
    };
    let img = image::ImageReader::open(path)
        .map_err(|e| load_err(e.into()))?
        .decode()
        .map_err(load_err)?
        .to_rgb8();
    Ok(RgbImage {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.into_raw(),
    })
}

/// Render and encode one card pair. Returns the path of the written GIF.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, fields(id = %pair.id))
)]
pub fn process_pair(
    pair: &CardPair,
    out_dir: &Path,
    config: &RotationConfig,
    frames_dir: Option<&Path>,
) -> Result<PathBuf, PipelineError> {
    let front = load_rgb(&pair.front)?;
    let back = load_rgb(&pair.back)?;
    log::debug!(
        "{}: front {}x{}, back {}x{}",
        pair.id,
        front.width,
        front.height,
        back.width,
        back.height
    );

    let frames = generate_sequence(&front, &back, config);

    if let Some(dir) = frames_dir {
        save_frames_png(dir, &pair.id, &frames)?;
    }

    let gif_path = out_dir.join(format!("{}.gif", pair.id));
    write_gif(&gif_path, &frames, config.delay_ms)?;
    Ok(gif_path)
}

/// Process every pair found in the input directory.
///
/// A failing card is logged and recorded in the report; it does not stop the
/// rest of the batch. Batch-level problems (unreadable input directory, bad
/// config, output directory that cannot be created) abort the run.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
pub fn run_batch(options: &BatchOptions) -> Result<BatchReport, PipelineError> {
    options.config.validate()?;
    let started = Instant::now();

    let pairs = discover_pairs(&options.input_dir)?;
    log::info!("{} valid image pair(s) detected", pairs.len());

    let create_dir = |path: &PathBuf| {
        fs::create_dir_all(path).map_err(|source| PipelineError::CreateOutputDir {
            path: path.clone(),
            source,
        })
    };
    create_dir(&options.output_dir)?;
    if let Some(dir) = &options.frames_dir {
        create_dir(dir)?;
    }

    let mut cards = Vec::with_capacity(pairs.len());
    for pair in &pairs {
        let card_started = Instant::now();
        log::info!("generating gif for {}", pair.id);
        match process_pair(
            pair,
            &options.output_dir,
            &options.config,
            options.frames_dir.as_deref(),
        ) {
            Ok(path) => {
                log::info!("{}: wrote {}", pair.id, path.display());
                cards.push(CardReport {
                    id: pair.id.clone(),
                    output: Some(path),
                    frames: options.config.frames,
                    elapsed_ms: card_started.elapsed().as_millis() as u64,
                    error: None,
                });
            }
            Err(err) => {
                log::error!("{}: {err}", pair.id);
                cards.push(CardReport {
                    id: pair.id.clone(),
                    output: None,
                    frames: 0,
                    elapsed_ms: card_started.elapsed().as_millis() as u64,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    Ok(BatchReport {
        input_dir: options.input_dir.clone(),
        output_dir: options.output_dir.clone(),
        config: options.config,
        pairs: pairs.len(),
        cards,
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}
