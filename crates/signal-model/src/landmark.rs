//! Facial landmark types.
//!
//! All coordinates are normalized to `[0.0, 1.0]` range.

use serde::{Deserialize, Serialize};

/// A 2D normalized point.
///
/// `(0.0, 0.0)` is the top-left corner of the frame,
/// `(1.0, 1.0)` the bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    /// The normalized image center.
    pub const CENTER: Point2D = Point2D { x: 0.5, y: 0.5 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Normalize a pixel-space point against frame dimensions.
    pub fn from_pixels(px: f64, py: f64, width: u32, height: u32) -> Self {
        Self {
            x: px / width.max(1) as f64,
            y: py / height.max(1) as f64,
        }
    }
}

/// Landmarks for one detected face, ordered by canonical landmark index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Point2D>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    /// Build from pixel-space `(x, y)` pairs, normalizing by frame size.
    pub fn from_pixels(points: &[(f64, f64)], width: u32, height: u32) -> Self {
        Self {
            points: points
                .iter()
                .map(|&(x, y)| Point2D::from_pixels(x, y, width, height))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Point2D> {
        self.points.get(index).copied()
    }

    /// Gather the points at `indices`, in order.
    /// Returns `None` if any index is out of range.
    pub fn select(&self, indices: &[usize]) -> Option<Vec<Point2D>> {
        indices.iter().map(|&i| self.get(i)).collect()
    }
}

/// Which landmark indices make up each eye for a given detector layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceTopology {
    pub name: &'static str,
    /// Total points a face carries in this layout.
    pub point_count: usize,
    pub left_eye: &'static [usize],
    pub right_eye: &'static [usize],
}

impl FaceTopology {
    /// iBUG 300-W 68-point layout (dlib, OpenCV LBF facemark).
    pub const IBUG_68: FaceTopology = FaceTopology {
        name: "ibug68",
        point_count: 68,
        left_eye: &[36, 37, 38, 39, 40, 41],
        right_eye: &[42, 43, 44, 45, 46, 47],
    };

    /// MediaPipe Face Mesh 468-point layout, six contour points per eye.
    pub const MEDIAPIPE_468: FaceTopology = FaceTopology {
        name: "mediapipe468",
        point_count: 468,
        left_eye: &[33, 160, 158, 133, 153, 144],
        right_eye: &[362, 385, 387, 263, 373, 380],
    };

    /// Fewest points a face needs for both eye subsets to be in range.
    pub fn min_points(&self) -> usize {
        self.left_eye
            .iter()
            .chain(self.right_eye)
            .max()
            .map_or(0, |&i| i + 1)
    }

    pub fn by_name(name: &str) -> Option<FaceTopology> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ibug68" | "68" | "dlib68" => Some(Self::IBUG_68),
            "mediapipe468" | "468" | "mediapipe" => Some(Self::MEDIAPIPE_468),
            _ => None,
        }
    }
}

impl Default for FaceTopology {
    fn default() -> Self {
        Self::IBUG_68
    }
}
