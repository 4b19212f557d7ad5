#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major RGB, len = w*h*3
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbImage {
    pub fn black(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width * height * 3],
        }
    }

    pub fn as_view(&self) -> RgbImageView<'_> {
        RgbImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

#[inline]
pub fn get_rgb(src: &RgbImageView<'_>, x: i32, y: i32) -> [u8; 3] {
    if x < 0 || y < 0 || x >= src.width as i32 || y >= src.height as i32 {
        return [0, 0, 0];
    }
    let i = (y as usize * src.width + x as usize) * 3;
    [src.data[i], src.data[i + 1], src.data[i + 2]]
}

#[inline]
pub fn sample_bilinear_rgb(src: &RgbImageView<'_>, x: f64, y: f64) -> [u8; 3] {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = get_rgb(src, x0, y0);
    let p10 = get_rgb(src, x0 + 1, y0);
    let p01 = get_rgb(src, x0, y0 + 1);
    let p11 = get_rgb(src, x0 + 1, y0 + 1);

    let mut out = [0u8; 3];
    for c in 0..3 {
        let a = p00[c] as f64 + fx * (p10[c] as f64 - p00[c] as f64);
        let b = p01[c] as f64 + fx * (p11[c] as f64 - p01[c] as f64);
        out[c] = (a + fy * (b - a)).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Mirror left-right. The returned buffer has the same dimensions.
pub fn flip_horizontal(src: &RgbImageView<'_>) -> RgbImage {
    let mut data = vec![0u8; src.data.len()];
    for y in 0..src.height {
        let row = y * src.width;
        for x in 0..src.width {
            let s = (row + x) * 3;
            let d = (row + (src.width - 1 - x)) * 3;
            data[d..d + 3].copy_from_slice(&src.data[s..s + 3]);
        }
    }
    RgbImage {
        width: src.width,
        height: src.height,
        data,
    }
}

/// Embed `src` centered in a canvas grown by `margin` pixels on every side,
/// border filled with `fill`.
pub fn pad_constant(src: &RgbImageView<'_>, margin: usize, fill: [u8; 3]) -> RgbImage {
    let out_w = src.width + 2 * margin;
    let out_h = src.height + 2 * margin;
    let mut data = vec![0u8; out_w * out_h * 3];
    if fill != [0, 0, 0] {
        for px in data.chunks_exact_mut(3) {
            px.copy_from_slice(&fill);
        }
    }
    for y in 0..src.height {
        let s = y * src.width * 3;
        let d = ((y + margin) * out_w + margin) * 3;
        data[d..d + src.width * 3].copy_from_slice(&src.data[s..s + src.width * 3]);
    }
    RgbImage {
        width: out_w,
        height: out_h,
        data,
    }
}
