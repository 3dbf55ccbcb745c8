//! Eye-contact heuristic.
//!
//! Treats the face as looking at the camera when the centroid of both eyes
//! sits at a small angle from the image center. The angle is taken with
//! `atan2(dy, dx)`, so only centroids roughly level with the center and to its
//! right (in normalized image space) qualify.

use poise_common::error::{PoiseError, PoiseResult};
use poise_signal_model::landmark::Point2D;

/// Maximum absolute angle (radians) still counted as eye contact.
pub const EYE_CONTACT_MAX_ANGLE_RAD: f64 = 0.2;

/// Centroid of all eye points.
fn eye_centroid(left_eye: &[Point2D], right_eye: &[Point2D]) -> Point2D {
    let n = (left_eye.len() + right_eye.len()) as f64;
    let (sx, sy) = left_eye
        .iter()
        .chain(right_eye)
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2D::new(sx / n, sy / n)
}

/// Angle of the vector from the image center to the eye centroid.
///
/// A centroid exactly at the center yields 0.0 (`atan2(0, 0)`).
pub fn gaze_offset_angle(left_eye: &[Point2D], right_eye: &[Point2D]) -> PoiseResult<f64> {
    if left_eye.is_empty() || right_eye.is_empty() {
        return Err(PoiseError::eye_landmarks(format!(
            "both eyes need at least one point (left: {}, right: {})",
            left_eye.len(),
            right_eye.len()
        )));
    }
    let centroid = eye_centroid(left_eye, right_eye);
    let dx = centroid.x - Point2D::CENTER.x;
    let dy = centroid.y - Point2D::CENTER.y;
    Ok(dy.atan2(dx))
}

/// Binary eye-contact indicator for one face.
///
/// Fails if either eye has no points.
pub fn estimate_eye_contact(left_eye: &[Point2D], right_eye: &[Point2D]) -> PoiseResult<bool> {
    let angle = gaze_offset_angle(left_eye, right_eye)?;
    Ok(angle.abs() < EYE_CONTACT_MAX_ANGLE_RAD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn eye_around(cx: f64, cy: f64) -> Vec<Point2D> {
        // Six points on a small ring centered on (cx, cy).
        [(-0.02, 0.0), (-0.01, -0.01), (0.01, -0.01), (0.02, 0.0), (0.01, 0.01), (-0.01, 0.01)]
            .iter()
            .map(|(dx, dy)| Point2D::new(cx + dx, cy + dy))
            .collect()
    }

    #[test]
    fn test_centroid_at_center_counts_as_contact() {
        let left = vec![Point2D::new(0.25, 0.5), Point2D::new(0.375, 0.5)];
        let right = vec![Point2D::new(0.625, 0.5), Point2D::new(0.75, 0.5)];
        assert_eq!(gaze_offset_angle(&left, &right).unwrap(), 0.0);
        assert!(estimate_eye_contact(&left, &right).unwrap());
    }

    #[test]
    fn test_centroid_right_of_center_counts_as_contact() {
        let left = eye_around(0.55, 0.50);
        let right = eye_around(0.65, 0.50);
        assert!(estimate_eye_contact(&left, &right).unwrap());
    }

    #[test]
    fn test_centroid_left_of_center_is_not_contact() {
        // Angle is ~pi for a centroid straight left of center.
        let left = eye_around(0.35, 0.50);
        let right = eye_around(0.45, 0.50);
        assert!(!estimate_eye_contact(&left, &right).unwrap());
    }

    #[test]
    fn test_centroid_above_center_is_not_contact() {
        let left = eye_around(0.45, 0.30);
        let right = eye_around(0.55, 0.30);
        let angle = gaze_offset_angle(&left, &right).unwrap();
        assert!((angle + std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert!(!estimate_eye_contact(&left, &right).unwrap());
    }

    #[test]
    fn test_accepts_uneven_subsets() {
        let left = vec![Point2D::new(0.7, 0.5)];
        let right = eye_around(0.7, 0.5);
        assert!(estimate_eye_contact(&left, &right).unwrap());
    }

    #[test]
    fn test_empty_eye_is_an_error() {
        let eye = eye_around(0.5, 0.5);
        assert!(matches!(
            estimate_eye_contact(&[], &eye),
            Err(PoiseError::EyeLandmarks { .. })
        ));
        assert!(matches!(
            estimate_eye_contact(&eye, &[]),
            Err(PoiseError::EyeLandmarks { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_centroid_exactly_at_center_is_contact(
            kx in -400i32..400,
            ky in -400i32..400,
        ) {
            // Multiples of 1/1024 keep the sums exact, so the centroid is
            // exactly (0.5, 0.5).
            let dx = f64::from(kx) / 1024.0;
            let dy = f64::from(ky) / 1024.0;
            let left = vec![Point2D::new(0.5 - dx, 0.5 - dy)];
            let right = vec![Point2D::new(0.5 + dx, 0.5 + dy)];
            prop_assert!(estimate_eye_contact(&left, &right).unwrap());
        }

        #[test]
        fn prop_offset_beyond_threshold_is_never_contact(
            radius in 0.01f64..0.4,
            angle in 0.21f64..3.14,
            below in proptest::bool::ANY,
        ) {
            let theta = if below { angle } else { -angle };
            let cx = 0.5 + radius * theta.cos();
            let cy = 0.5 + radius * theta.sin();
            let left = eye_around(cx - 0.05, cy);
            let right = eye_around(cx + 0.05, cy);
            prop_assert!(!estimate_eye_contact(&left, &right).unwrap());
        }

        #[test]
        fn prop_offset_within_threshold_is_contact(
            radius in 0.01f64..0.4,
            angle in -0.19f64..0.19,
        ) {
            let cx = 0.5 + radius * angle.cos();
            let cy = 0.5 + radius * angle.sin();
            let left = eye_around(cx - 0.05, cy);
            let right = eye_around(cx + 0.05, cy);
            prop_assert!(estimate_eye_contact(&left, &right).unwrap());
        }
    }
}
