//! Horizontal resampling of single-channel planes.
//!
//! Both functions move content to the right for positive shifts. Samples
//! that would come from outside the image are zero, never a repeated edge.

use anaglyph_core::Plane;

/// Shift every row of `src` right by `d` columns (left for negative `d`).
///
/// The `|d|` columns uncovered on the entering side are zero; `|d| >= width`
/// yields an all-zero plane.
pub fn shift_x(src: &Plane, d: i64) -> Plane {
    let (width, height) = src.dimensions();
    let mut out = Plane::new(width, height);
    let w = width as i64;
    for y in 0..height {
        let src_row = src.row(y);
        let dst_row = out.row_mut(y);
        for (x, dst) in dst_row.iter_mut().enumerate() {
            let sx = (x as i64).saturating_sub(d);
            if (0..w).contains(&sx) {
                *dst = src_row[sx as usize];
            }
        }
    }
    out
}

/// Shift `src` by a per-pixel amount, `sign * field(x, y)` columns.
///
/// This is a pull mapping: the destination pixel `(x, y)` takes its value
/// from `x' = x - sign * field(x, y)` on the same row, linearly interpolated
/// between `floor(x')` and `ceil(x')`. The field therefore says where a pixel
/// comes from, not where a source pixel lands, so depth discontinuities in
/// the field stretch or tear the content next to them.
///
/// A sample whose left or right neighbour lies outside `[0, width - 1]`
/// contributes zero. `field` must have the same shape as `src`.
pub fn shift_x_field(src: &Plane, field: &Plane, sign: f64) -> Plane {
    let (width, height) = src.dimensions();
    debug_assert_eq!(field.dimensions(), (width, height));
    let mut out = Plane::new(width, height);
    let last = width as i64 - 1;
    for y in 0..height {
        let src_row = src.row(y);
        let field_row = field.row(y);
        let dst_row = out.row_mut(y);
        for (x, dst) in dst_row.iter_mut().enumerate() {
            let sx = x as f64 - sign * field_row[x];
            let x1 = sx.floor() as i64;
            let x2 = sx.ceil() as i64;
            if x1 < 0 || x1 > last || x2 < 0 || x2 > last {
                continue;
            }
            let z1 = src_row[x1 as usize];
            let z2 = src_row[x2 as usize];
            *dst = z1 + (z2 - z1) * (sx - x1 as f64);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[f64]) -> Plane {
        Plane::from_vec(values.len() as u32, 1, values.to_vec()).unwrap()
    }

    #[test]
    fn test_shift_right_zero_fills_left_edge() {
        let p = row(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(shift_x(&p, 2).data(), &[0.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_shift_left_zero_fills_right_edge() {
        let p = row(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(shift_x(&p, -1).data(), &[2.0, 3.0, 4.0, 5.0, 0.0]);
    }

    #[test]
    fn test_shift_zero_and_beyond_width() {
        let p = row(&[1.0, 2.0, 3.0]);
        assert_eq!(shift_x(&p, 0), p);
        assert!(shift_x(&p, 3).data().iter().all(|&v| v == 0.0));
        assert!(shift_x(&p, -7).data().iter().all(|&v| v == 0.0));
        assert!(shift_x(&p, i64::MIN).data().iter().all(|&v| v == 0.0));
        assert!(shift_x(&p, i64::MAX).data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_shift_applies_to_every_row() {
        let p = Plane::from_vec(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(shift_x(&p, 1).data(), &[0.0, 1.0, 2.0, 0.0, 4.0, 5.0]);
    }

    #[test]
    fn test_constant_field_matches_uniform_shift() {
        let p = row(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        let field = Plane::filled(6, 1, 2.0);
        assert_eq!(shift_x_field(&p, &field, 1.0), shift_x(&p, 2));
        assert_eq!(shift_x_field(&p, &field, -1.0), shift_x(&p, -2));
    }

    #[test]
    fn test_fractional_field_interpolates() {
        let p = row(&[0.0, 100.0, 200.0, 300.0]);
        let field = Plane::filled(4, 1, 0.25);
        let out = shift_x_field(&p, &field, -1.0);
        // x' = x + 0.25; the last pixel needs column 4 and is masked.
        assert_eq!(out.data(), &[25.0, 125.0, 225.0, 0.0]);
    }

    #[test]
    fn test_out_of_bounds_samples_are_zero_not_clamped() {
        let p = row(&[7.0, 7.0, 7.0]);
        let field = Plane::from_vec(3, 1, vec![0.5, 0.0, -5.0]).unwrap();
        let out = shift_x_field(&p, &field, 1.0);
        // x=0 pulls from -0.5, x=2 pulls from 7.
        assert_eq!(out.data(), &[0.0, 7.0, 0.0]);
    }

    #[test]
    fn test_field_is_pull_mapping() {
        // Only the destination pixel with a non-zero field value changes,
        // even though its source pixel stays where it was.
        let p = row(&[1.0, 2.0, 3.0, 4.0]);
        let field = Plane::from_vec(4, 1, vec![0.0, 0.0, 0.0, 3.0]).unwrap();
        let out = shift_x_field(&p, &field, 1.0);
        assert_eq!(out.data(), &[1.0, 2.0, 3.0, 1.0]);
    }
}
