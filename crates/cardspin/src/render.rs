//! Per-frame rendering: pick the visible face and warp it into pose.

use cardspin_core::{
    flip_horizontal, frame_geometry, pad_constant, warp_perspective_rgb, Face, RgbImage,
};

/// Both faces of a card readied for rendering: the back mirrored once, both
/// padded once. Preparation does not depend on the rotation angle, so one
/// `PreparedCard` serves every frame of a sequence.
pub struct PreparedCard {
    front: PreparedFace,
    back: PreparedFace,
    buffer_px: u32,
}

struct PreparedFace {
    // unpadded card size
    width: u32,
    height: u32,
    padded: RgbImage,
}

impl PreparedFace {
    fn new(card: &RgbImage, buffer_px: u32) -> Self {
        Self {
            width: card.width as u32,
            height: card.height as u32,
            padded: pad_constant(&card.as_view(), buffer_px as usize, [0, 0, 0]),
        }
    }
}

impl PreparedCard {
    /// `front` and `back` are the raw card photographs. The back is stored
    /// mirrored, so it reads correctly once the turntable shows it reversed.
    pub fn new(front: &RgbImage, back: &RgbImage, buffer_px: u32) -> Self {
        let mirrored_back = flip_horizontal(&back.as_view());
        Self {
            front: PreparedFace::new(front, buffer_px),
            back: PreparedFace::new(&mirrored_back, buffer_px),
            buffer_px,
        }
    }

    fn face(&self, face: Face) -> &PreparedFace {
        match face {
            Face::Front => &self.front,
            Face::Back => &self.back,
        }
    }
}

/// Render the card at `angle` (radians) against its padded canvas.
///
/// The canvas tracks the visible face: a frame measures face width plus
/// twice the buffer by face height plus twice the buffer. Poses where the
/// silhouette collapses edge-on come back as the plain black canvas.
pub fn render_frame(card: &PreparedCard, angle: f64, zoom: f64) -> RgbImage {
    let face = card.face(Face::for_angle(angle));
    let geometry = frame_geometry(angle, face.width, face.height, card.buffer_px, zoom);

    let warp = geometry
        .homography()
        .filter(|h| !h.is_degenerate())
        .and_then(|h| h.inverse());

    match warp {
        Some(h_inv) => warp_perspective_rgb(
            &face.padded.as_view(),
            h_inv,
            face.padded.width,
            face.padded.height,
        ),
        None => {
            log::debug!("edge-on pose at angle {angle:.6}, emitting the black canvas");
            RgbImage::black(face.padded.width, face.padded.height)
        }
    }
}
