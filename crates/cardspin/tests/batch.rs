use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use cardspin::{run_batch, BatchOptions, RotationConfig};
use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;

fn write_jpg(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(path)
        .unwrap();
}

fn small_config(frames: u32) -> RotationConfig {
    RotationConfig {
        frames,
        buffer_px: 10,
        zoom: 5.0,
        ..RotationConfig::default()
    }
}

#[test]
fn batch_writes_one_looping_gif_per_pair() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_jpg(&input.path().join("foo_front.jpg"), 200, 100, [190, 30, 30]);
    write_jpg(&input.path().join("foo_back.jpg"), 200, 100, [30, 30, 190]);
    // pattern-matching names that must not produce output
    std::fs::write(input.path().join("foo_front.txt"), b"not a photo").unwrap();
    write_jpg(&input.path().join("lonely_front.jpg"), 20, 10, [0, 255, 0]);

    let report = run_batch(&BatchOptions {
        input_dir: input.path().to_path_buf(),
        output_dir: output.path().to_path_buf(),
        config: small_config(4),
        frames_dir: None,
    })
    .unwrap();

    assert_eq!(report.pairs, 1);
    assert_eq!(report.failed(), 0);
    assert_eq!(report.cards[0].frames, 4);
    assert!(!output.path().join("lonely.gif").exists());

    let gif = output.path().join("foo.gif");
    assert_eq!(report.cards[0].output.as_deref(), Some(gif.as_path()));

    let decoder = GifDecoder::new(BufReader::new(File::open(&gif).unwrap())).unwrap();
    let frames = decoder.into_frames().collect_frames().unwrap();
    assert_eq!(frames.len(), 4);

    // 200x100 card inside a 10 px buffer on every side
    for frame in &frames {
        assert_eq!(frame.buffer().width(), 220);
        assert_eq!(frame.buffer().height(), 120);
    }

    // frame 0 faces forward (red-ish card), frame 2 is the back (blue-ish),
    // frames 1 and 3 are the edge-on black canvas
    let center = |i: usize| frames[i].buffer().get_pixel(110, 60).0;
    let [r0, _, b0, _] = center(0);
    assert!(r0 > 120 && b0 < 120, "front frame should be red, got {:?}", center(0));
    let [r2, _, b2, _] = center(2);
    assert!(b2 > 120 && r2 < 120, "back frame should be blue, got {:?}", center(2));
    let [r1, g1, b1, _] = center(1);
    assert!(
        r1 < 40 && g1 < 40 && b1 < 40,
        "edge-on frame should be black, got {:?}",
        center(1)
    );
}

#[test]
fn failing_card_does_not_stop_the_batch() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("bad_front.jpg"), b"garbage").unwrap();
    std::fs::write(input.path().join("bad_back.jpg"), b"garbage").unwrap();
    write_jpg(&input.path().join("good_front.jpg"), 40, 20, [200, 0, 0]);
    write_jpg(&input.path().join("good_back.jpg"), 40, 20, [0, 0, 200]);

    let report = run_batch(&BatchOptions {
        input_dir: input.path().to_path_buf(),
        output_dir: output.path().to_path_buf(),
        config: small_config(2),
        frames_dir: None,
    })
    .unwrap();

    assert_eq!(report.pairs, 2);
    assert_eq!(report.failed(), 1);

    let bad = report.cards.iter().find(|c| c.id == "bad").unwrap();
    assert!(bad.output.is_none());
    assert!(bad.error.as_deref().unwrap().contains("bad_front.jpg"));
    assert!(!output.path().join("bad.gif").exists());

    let good = report.cards.iter().find(|c| c.id == "good").unwrap();
    assert!(good.error.is_none());
    assert!(output.path().join("good.gif").exists());
}

#[test]
fn frame_dump_mirrors_the_sequence() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    let dump = output.path().join("frames");
    write_jpg(&input.path().join("holo_front.jpg"), 30, 20, [250, 250, 0]);
    write_jpg(&input.path().join("holo_back.jpg"), 30, 20, [0, 250, 250]);

    let report = run_batch(&BatchOptions {
        input_dir: input.path().to_path_buf(),
        output_dir: output.path().to_path_buf(),
        config: small_config(3),
        frames_dir: Some(dump.clone()),
    })
    .unwrap();
    assert_eq!(report.failed(), 0);

    for index in 0..3 {
        let path = dump.join(format!("holo_{index:04}.png"));
        let png = image::open(&path).unwrap();
        assert_eq!(png.width(), 50);
        assert_eq!(png.height(), 40);
    }
}

#[test]
fn empty_input_directory_is_not_an_error() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let report = run_batch(&BatchOptions {
        input_dir: input.path().to_path_buf(),
        output_dir: output.path().join("fresh"),
        config: RotationConfig::default(),
        frames_dir: None,
    })
    .unwrap();

    assert_eq!(report.pairs, 0);
    assert!(report.cards.is_empty());
    // the output directory is still created
    assert!(output.path().join("fresh").is_dir());
}
