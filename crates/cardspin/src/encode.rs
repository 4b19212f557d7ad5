//! GIF assembly and the optional per-frame PNG dump.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};
use thiserror::Error;

use crate::sequence::RenderedFrame;

/// NeuQuant palette pass speed: 1 is slowest and closest, 30 is fastest.
const GIF_QUANT_SPEED: i32 = 10;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to create {}: {}", .path.display(), .source)]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

fn rgb_to_rgba(src: &cardspin_core::RgbImage) -> RgbaImage {
    RgbaImage::from_fn(src.width as u32, src.height as u32, |x, y| {
        let i = (y as usize * src.width + x as usize) * 3;
        Rgba([src.data[i], src.data[i + 1], src.data[i + 2], 255])
    })
}

/// Encode `frames` in order into one infinitely looping GIF at `path`, every
/// frame shown for `delay_ms` milliseconds. GIF stores delays in
/// centiseconds, so the value is rounded on disk.
pub fn write_gif(path: &Path, frames: &[RenderedFrame], delay_ms: u16) -> Result<(), EncodeError> {
    let file = File::create(path).map_err(|source| EncodeError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), GIF_QUANT_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(delay_ms as u32, 1);
    for frame in frames {
        encoder.encode_frame(Frame::from_parts(rgb_to_rgba(&frame.image), 0, 0, delay))?;
    }

    Ok(())
}

/// Write every frame as `<id>_<index>.png` (index zero-padded to four
/// digits) into `dir`. A debug artifact: the GIF never reads these back.
pub fn save_frames_png(dir: &Path, id: &str, frames: &[RenderedFrame]) -> Result<(), EncodeError> {
    for frame in frames {
        let path = dir.join(format!("{}_{:04}.png", id, frame.index));
        image::save_buffer(
            &path,
            &frame.image.data,
            frame.image.width as u32,
            frame.image.height as u32,
            image::ColorType::Rgb8,
        )?;
    }
    log::debug!("dumped {} frame png(s) for {id}", frames.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardspin_core::{frame_angle, Face, RgbImage};
    use image::codecs::gif::GifDecoder;
    use image::AnimationDecoder;
    use std::io::BufReader;

    fn frames(n: u32, width: usize, height: usize) -> Vec<RenderedFrame> {
        (0..n)
            .map(|index| {
                let mut image = RgbImage::black(width, height);
                image.data.fill((40 * (index + 1)) as u8);
                RenderedFrame {
                    index,
                    angle: frame_angle(index, n),
                    face: Face::for_angle(frame_angle(index, n)),
                    image,
                }
            })
            .collect()
    }

    #[test]
    fn gif_keeps_frame_count_and_delay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.gif");
        write_gif(&path, &frames(3, 10, 8), 60).unwrap();

        let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 3);
        for frame in &decoded {
            assert_eq!(frame.buffer().width(), 10);
            assert_eq!(frame.buffer().height(), 8);
            let (num, den) = frame.delay().numer_denom_ms();
            assert_eq!(num / den, 60);
        }
    }

    #[test]
    fn frame_dump_writes_zero_padded_pngs() {
        let dir = tempfile::tempdir().unwrap();
        save_frames_png(dir.path(), "holo", &frames(2, 6, 4)).unwrap();

        let first = dir.path().join("holo_0000.png");
        let second = dir.path().join("holo_0001.png");
        assert!(second.exists());

        let png = image::open(&first).unwrap().to_rgb8();
        assert_eq!(png.dimensions(), (6, 4));
        assert_eq!(png.get_pixel(0, 0).0, [40, 40, 40]);
    }

    #[test]
    fn unwritable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("card.gif");
        let err = write_gif(&path, &frames(1, 4, 4), 60).unwrap_err();
        assert!(matches!(err, EncodeError::Create { .. }));
    }
}
