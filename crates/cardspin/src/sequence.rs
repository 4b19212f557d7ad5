//! Ordered frame generation for one full turn of the turntable.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::{render_frame, PreparedCard};
use cardspin_core::{frame_angle, Face, RgbImage};

/// Knobs for one rotation animation, built once and shared by reference for
/// the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Number of frames in one full turn.
    pub frames: u32,
    /// Display time of every frame, in milliseconds.
    pub delay_ms: u16,
    /// Black margin added on every side of the card, in pixels.
    pub buffer_px: u32,
    /// Amplitude of the vertical corner lift, in pixels.
    pub zoom: f64,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            frames: 240,
            delay_ms: 60,
            buffer_px: 100,
            zoom: 50.0,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("frame count must be at least 1")]
    NoFrames,
}

impl RotationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frames == 0 {
            return Err(ConfigError::NoFrames);
        }
        Ok(())
    }
}

/// One rendered frame of the turn.
#[derive(Clone, Debug)]
pub struct RenderedFrame {
    pub index: u32,
    pub angle: f64,
    pub face: Face,
    pub image: RgbImage,
}

/// Render every frame of a full turn, in temporal order.
///
/// Frames are independent and computed in parallel; the returned order is by
/// index regardless. The result is a pure function of the inputs, so a rerun
/// reproduces the same frames.
pub fn generate_sequence(
    front: &RgbImage,
    back: &RgbImage,
    config: &RotationConfig,
) -> Vec<RenderedFrame> {
    log::debug!("rendering {} frame(s)", config.frames);
    let card = PreparedCard::new(front, back, config.buffer_px);

    (0..config.frames)
        .into_par_iter()
        .map(|index| {
            let angle = frame_angle(index, config.frames);
            RenderedFrame {
                index,
                angle,
                face: Face::for_angle(angle),
                image: render_frame(&card, angle, config.zoom),
            }
        })
        .collect()
}
