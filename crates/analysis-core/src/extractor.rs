//! Per-frame signal extraction.

use poise_common::error::{PoiseError, PoiseResult};
use poise_signal_model::landmark::{FaceTopology, LandmarkSet};
use poise_signal_model::signal::FrameSignal;

use crate::eye_contact::estimate_eye_contact;

/// Confidence reported for every frame with a face.
///
/// Placeholder: there is no confidence model, this is a fixed value.
pub const PLACEHOLDER_CONFIDENCE: f64 = 0.8;

/// Nervousness reported for every frame with a face.
///
/// Placeholder: there is no nervousness model, this is a fixed value.
pub const PLACEHOLDER_NERVOUSNESS: f64 = 0.2;

/// Derives a [`FrameSignal`] from one face's landmarks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalExtractor {
    topology: FaceTopology,
}

impl SignalExtractor {
    pub fn new(topology: FaceTopology) -> Self {
        Self { topology }
    }

    pub fn topology(&self) -> FaceTopology {
        self.topology
    }

    /// Signal for one frame. `None` in, `None` out: a frame without a face
    /// contributes nothing rather than a zero.
    ///
    /// Fails if the landmark set is too short to contain both eyes.
    pub fn extract_signal(&self, face: Option<&LandmarkSet>) -> PoiseResult<Option<FrameSignal>> {
        let Some(face) = face else {
            return Ok(None);
        };

        let left_eye = face.select(self.topology.left_eye);
        let right_eye = face.select(self.topology.right_eye);
        let (Some(left_eye), Some(right_eye)) = (left_eye, right_eye) else {
            return Err(PoiseError::landmarks(format!(
                "{} landmarks is too few for the {} eye indices",
                face.len(),
                self.topology.name
            )));
        };

        let eye_contact = estimate_eye_contact(&left_eye, &right_eye)?;
        Ok(Some(FrameSignal::new(
            PLACEHOLDER_CONFIDENCE,
            PLACEHOLDER_NERVOUSNESS,
            eye_contact,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise_signal_model::landmark::Point2D;

    /// 68 points, eyes placed so their centroid lands at `eye_center`.
    fn face_with_eyes_at(eye_center: Point2D) -> LandmarkSet {
        let mut points = vec![Point2D::new(0.1, 0.9); 68];
        for i in 36..42 {
            points[i] = Point2D::new(eye_center.x - 0.05, eye_center.y);
        }
        for i in 42..48 {
            points[i] = Point2D::new(eye_center.x + 0.05, eye_center.y);
        }
        LandmarkSet::new(points)
    }

    #[test]
    fn test_no_face_yields_nothing() {
        let extractor = SignalExtractor::default();
        assert_eq!(extractor.extract_signal(None).unwrap(), None);
    }

    #[test]
    fn test_face_uses_placeholders() {
        let extractor = SignalExtractor::default();
        let face = face_with_eyes_at(Point2D::new(0.5, 0.5));
        let signal = extractor.extract_signal(Some(&face)).unwrap().unwrap();
        assert_eq!(signal.confidence, PLACEHOLDER_CONFIDENCE);
        assert_eq!(signal.nervousness, PLACEHOLDER_NERVOUSNESS);
        assert_eq!(signal.eye_contact, 1);
    }

    #[test]
    fn test_only_eye_points_matter() {
        // Non-eye points sit bottom-left; only the eyes decide.
        let extractor = SignalExtractor::default();
        let face = face_with_eyes_at(Point2D::new(0.5, 0.2));
        let signal = extractor.extract_signal(Some(&face)).unwrap().unwrap();
        assert_eq!(signal.eye_contact, 0);
    }

    #[test]
    fn test_short_landmark_set_is_an_error() {
        let extractor = SignalExtractor::default();
        let face = LandmarkSet::new(vec![Point2D::new(0.5, 0.5); 40]);
        assert!(matches!(
            extractor.extract_signal(Some(&face)),
            Err(PoiseError::Landmarks { .. })
        ));
    }

    #[test]
    fn test_mediapipe_topology_reads_its_own_indices() {
        let extractor = SignalExtractor::new(FaceTopology::MEDIAPIPE_468);
        let mut points = vec![Point2D::new(0.1, 0.1); 468];
        for &i in FaceTopology::MEDIAPIPE_468.left_eye {
            points[i] = Point2D::new(0.55, 0.5);
        }
        for &i in FaceTopology::MEDIAPIPE_468.right_eye {
            points[i] = Point2D::new(0.65, 0.5);
        }
        let signal = extractor
            .extract_signal(Some(&LandmarkSet::new(points)))
            .unwrap()
            .unwrap();
        assert!(signal.has_eye_contact());
    }
}
