use crate::image::{sample_bilinear_rgb, RgbImage, RgbImageView};
use nalgebra::{DMatrix, Matrix3, Point2, SMatrix, SVector, Vector3};

/// Accept the direct 8x8 solve only when it maps every corner this close.
const QUAD_REFIT_TOL: f64 = 1e-6;

/// Singular value ratio below this marks the transform as edge-on
/// (numerically rank deficient).
const DEGENERATE_SV_RATIO: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    #[inline]
    pub fn apply(&self, p: Point2<f64>) -> Point2<f64> {
        let v = self.h * Vector3::new(p.x, p.y, 1.0);
        Point2::new(v[0] / v[2], v[1] / v[2])
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }

    /// A transform that flattens the plane onto a line (or worse).
    /// `try_inverse` can still numerically succeed on one, so callers gate
    /// on this before inverting.
    pub fn is_degenerate(&self) -> bool {
        let sv = self.h.singular_values();
        let max = sv.max();
        let min = sv.min();
        !min.is_finite() || min < max * DEGENERATE_SV_RATIO
    }
}

fn hartley_normalization(cx: f64, cy: f64, mean_dist: f64) -> Matrix3<f64> {
    let s = if mean_dist > 1e-12 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    Matrix3::<f64>::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn normalize_quad(pts: &[Point2<f64>; 4]) -> ([Point2<f64>; 4], Matrix3<f64>) {
    // Hartley normalization: translate to centroid, scale so mean distance = sqrt(2)
    let n = 4.0_f64;
    let mut cx = 0.0_f64;
    let mut cy = 0.0_f64;
    for p in pts {
        cx += p.x;
        cy += p.y;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0_f64;
    for p in pts {
        let dx = p.x - cx;
        let dy = p.y - cy;
        mean_dist += (dx * dx + dy * dy).sqrt();
    }
    mean_dist /= n;

    let t = hartley_normalization(cx, cy, mean_dist);

    let mut out = [Point2::new(0.0_f64, 0.0_f64); 4];
    for (i, p) in pts.iter().enumerate() {
        let v = t * Vector3::new(p.x, p.y, 1.0);
        out[i] = Point2::new(v[0], v[1]);
    }

    (out, t)
}

fn normalize_homography(h: Matrix3<f64>) -> Option<Matrix3<f64>> {
    let s = h[(2, 2)];
    if s.abs() < 1e-12 {
        return None;
    }
    Some(h / s)
}

fn denormalize_homography(
    hn: Matrix3<f64>,
    t_src: Matrix3<f64>,
    t_dst: Matrix3<f64>,
) -> Option<Matrix3<f64>> {
    let t_dst_inv = t_dst.try_inverse()?;
    Some(t_dst_inv * hn * t_src)
}

fn max_corner_error(h: &Homography, src: &[Point2<f64>; 4], dst: &[Point2<f64>; 4]) -> f64 {
    let mut worst = 0.0_f64;
    for (s, d) in src.iter().zip(dst.iter()) {
        let p = h.apply(*s);
        let e = ((p.x - d.x).powi(2) + (p.y - d.y).powi(2)).sqrt();
        if !e.is_finite() {
            return f64::INFINITY;
        }
        worst = worst.max(e);
    }
    worst
}

/// Compute H such that: dst ~ H * src (projective), from 4 corner pairs.
///
/// Corner order must be consistent between `src` and `dst`. A collapsed
/// destination quad (coincident or collinear corners) does not fail the
/// solve: the rank-deficient case is handed to a null-space estimate, which
/// yields a non-invertible transform (see [`Homography::is_degenerate`])
/// instead of `None`.
pub fn homography_from_quad(
    src: &[Point2<f64>; 4],
    dst: &[Point2<f64>; 4],
) -> Option<Homography> {
    let (src_n, t_src) = normalize_quad(src);
    let (dst_n, t_dst) = normalize_quad(dst);

    if let Some(h) = solve_quad_lu(&src_n, &dst_n, t_src, t_dst) {
        if max_corner_error(&h, src, dst) <= QUAD_REFIT_TOL {
            return Some(h);
        }
    }

    log::debug!("4-point solve is rank deficient, switching to the null-space estimate");
    solve_quad_dlt(&src_n, &dst_n, t_src, t_dst)
}

fn solve_quad_lu(
    src_n: &[Point2<f64>; 4],
    dst_n: &[Point2<f64>; 4],
    t_src: Matrix3<f64>,
    t_dst: Matrix3<f64>,
) -> Option<Homography> {
    // Unknowns: [h11 h12 h13 h21 h22 h23 h31 h32], with h33 = 1
    // For each correspondence (x,y)->(u,v):
    // h11 x + h12 y + h13 - u h31 x - u h32 y = u
    // h21 x + h22 y + h23 - v h31 x - v h32 y = v
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let x = src_n[k].x;
        let y = src_n[k].y;
        let u = dst_n[k].x;
        let v = dst_n[k].y;

        // row 2k
        let r0 = 2 * k;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        // row 2k+1
        let r1 = 2 * k + 1;
        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let x = a.lu().solve(&b)?;

    let hn = Matrix3::<f64>::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );

    let h_den = denormalize_homography(hn, t_src, t_dst)?;
    let h_den = normalize_homography(h_den)?;

    Some(Homography::new(h_den))
}

fn solve_quad_dlt(
    src_n: &[Point2<f64>; 4],
    dst_n: &[Point2<f64>; 4],
    t_src: Matrix3<f64>,
    t_dst: Matrix3<f64>,
) -> Option<Homography> {
    // Build A (8 x 9) for Ah = 0
    let mut a = DMatrix::<f64>::zeros(8, 9);

    for k in 0..4 {
        let x = src_n[k].x;
        let y = src_n[k].y;
        let u = dst_n[k].x;
        let v = dst_n[k].y;

        // [ -x -y -1   0  0  0   u*x u*y u ]
        a[(2 * k, 0)] = -x;
        a[(2 * k, 1)] = -y;
        a[(2 * k, 2)] = -1.0;
        a[(2 * k, 6)] = u * x;
        a[(2 * k, 7)] = u * y;
        a[(2 * k, 8)] = u;

        // [ 0  0  0  -x -y -1   v*x v*y v ]
        a[(2 * k + 1, 3)] = -x;
        a[(2 * k + 1, 4)] = -y;
        a[(2 * k + 1, 5)] = -1.0;
        a[(2 * k + 1, 6)] = v * x;
        a[(2 * k + 1, 7)] = v * y;
        a[(2 * k + 1, 8)] = v;
    }

    // h is the eigenvector of A^T A with the smallest eigenvalue. The 9x9
    // symmetric eigenproblem sees the full right null space, which a thin
    // SVD of the 8x9 system would not return.
    let ata = a.transpose() * &a;
    let eig = nalgebra::SymmetricEigen::new(ata);

    let mut min_idx = 0;
    let mut min_val = eig.eigenvalues[0].abs();
    for i in 1..9 {
        let v = eig.eigenvalues[i].abs();
        if v < min_val {
            min_val = v;
            min_idx = i;
        }
    }

    let hv = eig.eigenvectors.column(min_idx);
    let hn = Matrix3::<f64>::new(
        hv[0], hv[1], hv[2], //
        hv[3], hv[4], hv[5], //
        hv[6], hv[7], hv[8],
    );

    let h = denormalize_homography(hn, t_src, t_dst)?;

    // Keep the unnormalized solution when h33 vanishes: the transform is
    // still an exact fit, just not invertible.
    let s = h[(2, 2)];
    let h = if s.abs() < 1e-15 { h } else { h / s };

    Some(Homography::new(h))
}

/// Inverse-mapping warp: for each destination pixel, map through
/// `h_src_from_dst` and bilinearly sample the source. Destination pixels are
/// addressed at integer coordinates; samples outside the source read black.
pub fn warp_perspective_rgb(
    src: &RgbImageView<'_>,
    h_src_from_dst: Homography,
    out_w: usize,
    out_h: usize,
) -> RgbImage {
    let mut out = RgbImage::black(out_w, out_h);

    for y in 0..out_h {
        for x in 0..out_w {
            let p = h_src_from_dst.apply(Point2::new(x as f64, y as f64));
            let px = sample_bilinear_rgb(src, p.x, p.y);
            let i = (y * out_w + x) * 3;
            out.data[i..i + 3].copy_from_slice(&px);
        }
    }

    out
}
