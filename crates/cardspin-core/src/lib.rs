//! Turntable geometry and perspective warping for card rotation animations.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! touch the filesystem and has no opinion on image formats: callers hand it
//! raw RGB buffers and get raw RGB buffers back.

mod homography;
mod image;
mod turntable;

pub use homography::{homography_from_quad, warp_perspective_rgb, Homography};
pub use image::{
    flip_horizontal, get_rgb, pad_constant, sample_bilinear_rgb, RgbImage, RgbImageView,
};
pub use turntable::{frame_angle, frame_geometry, Face, FrameGeometry, Quad};
