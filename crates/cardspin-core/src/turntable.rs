//! Turntable pose model: which card face is visible at a rotation angle and
//! where the card's corners land on the padded canvas.

use std::f64::consts::{FRAC_PI_2, TAU};

use nalgebra::Point2;

use crate::homography::{homography_from_quad, Homography};

/// Corner positions in winding order bottom-left, bottom-right, top-right,
/// top-left.
pub type Quad = [Point2<f64>; 4];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Back,
}

impl Face {
    /// The back face is visible for angles in `[pi/2, 3*pi/2]`, both ends
    /// inclusive. The swap is a hard cut, never a blend.
    pub fn for_angle(angle: f64) -> Self {
        if (FRAC_PI_2..=3.0 * FRAC_PI_2).contains(&angle) {
            Face::Back
        } else {
            Face::Front
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Face::Front => "front",
            Face::Back => "back",
        }
    }
}

/// Rotation angle of frame `index` out of `frames` equal steps of a full
/// turn, evaluated as `index * (tau / frames)`.
pub fn frame_angle(index: u32, frames: u32) -> f64 {
    debug_assert!(frames > 0);
    index as f64 * (TAU / frames as f64)
}

/// Per-frame pose: visible face plus the card silhouette before and after
/// the turntable projection, both in padded-canvas coordinates.
#[derive(Clone, Copy, Debug)]
pub struct FrameGeometry {
    pub angle: f64,
    pub face: Face,
    pub source: Quad,
    pub target: Quad,
}

impl FrameGeometry {
    /// Projective transform taking the source corners onto the target
    /// corners. Degenerate edge-on poses yield a non-invertible transform
    /// rather than `None`.
    pub fn homography(&self) -> Option<Homography> {
        homography_from_quad(&self.source, &self.target)
    }
}

/// Project the silhouette of a `width` x `height` card rotated by `angle`
/// onto a canvas padded by `buffer_px` on every side.
///
/// The corners move by a horizontal inset of `width * sin^2(angle / 2)`
/// (both vertical edges slide towards the middle and meet edge-on at a
/// quarter turn) and a vertical lift of `zoom * sin(angle)` applied with
/// opposite signs on the left and right edges, which fakes the out-of-plane
/// parallax of a spinning card.
pub fn frame_geometry(
    angle: f64,
    width: u32,
    height: u32,
    buffer_px: u32,
    zoom: f64,
) -> FrameGeometry {
    let w = width as f64;
    let h = height as f64;
    let b = buffer_px as f64;

    let source: Quad = [
        Point2::new(b, b + h),
        Point2::new(b + w, b + h),
        Point2::new(b + w, b),
        Point2::new(b, b),
    ];

    let inset = w * (angle / 2.0).sin().powi(2);
    let lift = zoom * angle.sin();

    let target: Quad = [
        Point2::new(b + inset, (b + h) + lift),
        Point2::new((b + w) - inset, (b + h) - lift),
        Point2::new((b + w) - inset, b + lift),
        Point2::new(b + inset, b - lift),
    ];

    FrameGeometry {
        angle,
        face: Face::for_angle(angle),
        source,
        target,
    }
}
