//! OpenCV-backed frame source and facemark landmark provider.

use std::path::{Path, PathBuf};

use opencv::core::{self, Mat, Point2f, Rect, Size, Vector};
use opencv::prelude::*;
use opencv::{face, imgproc, objdetect, videoio};

use poise_analysis_core::source::{FrameSource, LandmarkProvider};
use poise_common::error::{PoiseError, PoiseResult};
use poise_signal_model::frame::{ChannelOrder, Frame};
use poise_signal_model::landmark::LandmarkSet;

/// Decodes a video file with `VideoCapture`.
pub struct OpenCvFrameSource {
    path: PathBuf,
    capture: Option<videoio::VideoCapture>,
    next_index: u64,
}

impl OpenCvFrameSource {
    pub fn open(path: &Path) -> PoiseResult<Self> {
        if !path.exists() {
            return Err(PoiseError::source_open(path, "file does not exist"));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| PoiseError::source_open(path, "path is not valid UTF-8"))?;

        let capture = videoio::VideoCapture::from_file(path_str, videoio::CAP_ANY)
            .map_err(|e| PoiseError::source_open(path, e.to_string()))?;
        let opened = capture
            .is_opened()
            .map_err(|e| PoiseError::source_open(path, e.to_string()))?;
        if !opened {
            return Err(PoiseError::source_open(
                path,
                "VideoCapture could not open the file (unsupported codec?)",
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
            capture: Some(capture),
            next_index: 0,
        })
    }
}

impl FrameSource for OpenCvFrameSource {
    fn next_frame(&mut self) -> PoiseResult<Option<Frame>> {
        let Some(capture) = self.capture.as_mut() else {
            return Ok(None);
        };

        let mut mat = Mat::default();
        let grabbed = capture
            .read(&mut mat)
            .map_err(|e| PoiseError::decode(e.to_string()))?;
        if !grabbed || mat.empty() {
            return Ok(None);
        }

        let frame = mat_to_frame(self.next_index, &mat)?;
        self.next_index += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if let Some(mut capture) = self.capture.take() {
            if let Err(e) = capture.release() {
                tracing::warn!(error = %e, "Failed to release VideoCapture");
            }
        }
    }

    fn describe(&self) -> String {
        format!("opencv:{}", self.path.display())
    }
}

impl Drop for OpenCvFrameSource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Copy an 8-bit, 3-channel BGR `Mat` into a [`Frame`].
fn mat_to_frame(index: u64, mat: &Mat) -> PoiseResult<Frame> {
    if mat.typ() != core::CV_8UC3 {
        return Err(PoiseError::decode(format!(
            "expected an 8-bit BGR frame, got Mat type {}",
            mat.typ()
        )));
    }

    let width = mat.cols() as u32;
    let height = mat.rows() as u32;

    let data = if mat.is_continuous() {
        mat.data_bytes()
            .map_err(|e| PoiseError::decode(e.to_string()))?
            .to_vec()
    } else {
        let packed = mat
            .try_clone()
            .map_err(|e| PoiseError::decode(e.to_string()))?;
        packed
            .data_bytes()
            .map_err(|e| PoiseError::decode(e.to_string()))?
            .to_vec()
    };

    Frame::new(index, width, height, ChannelOrder::Bgr, data)
        .map_err(|e| PoiseError::decode(e.to_string()))
}

/// Haar cascade face detection followed by LBF 68-point landmark fitting.
pub struct OpenCvFacemarkProvider {
    cascade: objdetect::CascadeClassifier,
    facemark: core::Ptr<face::Facemark>,
}

impl OpenCvFacemarkProvider {
    pub fn new(cascade_path: &Path, model_path: &Path) -> PoiseResult<Self> {
        for path in [cascade_path, model_path] {
            if !path.exists() {
                return Err(PoiseError::FileNotFound {
                    path: path.to_path_buf(),
                });
            }
        }

        let cascade = objdetect::CascadeClassifier::new(&cascade_path.to_string_lossy())
            .map_err(|e| PoiseError::config(format!("failed to load face cascade: {e}")))?;
        if cascade.empty().unwrap_or(true) {
            return Err(PoiseError::config(format!(
                "face cascade {} is empty or invalid",
                cascade_path.display()
            )));
        }

        let mut facemark = face::create_facemark_lbf()
            .map_err(|e| PoiseError::config(format!("failed to create facemark: {e}")))?;
        facemark
            .load_model(&model_path.to_string_lossy())
            .map_err(|e| PoiseError::config(format!("failed to load facemark model: {e}")))?;

        tracing::info!(
            cascade = %cascade_path.display(),
            model = %model_path.display(),
            "OpenCV facemark provider ready"
        );
        Ok(Self { cascade, facemark })
    }
}

impl LandmarkProvider for OpenCvFacemarkProvider {
    fn detect(&mut self, frame: &Frame) -> PoiseResult<Vec<LandmarkSet>> {
        let cv_err = |e: opencv::Error| PoiseError::landmarks(e.to_string());

        let rgb = Mat::from_slice(frame.data())
            .and_then(|flat| flat.reshape(3, frame.height as i32)?.try_clone())
            .map_err(cv_err)?;
        let mut gray = Mat::default();
        imgproc::cvt_color(&rgb, &mut gray, imgproc::COLOR_RGB2GRAY, 0).map_err(cv_err)?;

        let mut faces = Vector::<Rect>::new();
        self.cascade
            .detect_multi_scale(
                &gray,
                &mut faces,
                1.1,
                3,
                0,
                Size::new(30, 30),
                Size::default(),
            )
            .map_err(cv_err)?;
        if faces.is_empty() {
            return Ok(Vec::new());
        }

        let mut shapes = Vector::<Vector<Point2f>>::new();
        let fitted = self
            .facemark
            .fit(&gray, &faces, &mut shapes)
            .map_err(cv_err)?;
        if !fitted {
            return Ok(Vec::new());
        }

        Ok(shapes
            .iter()
            .map(|shape| {
                let points: Vec<(f64, f64)> = shape
                    .iter()
                    .map(|p| (f64::from(p.x), f64::from(p.y)))
                    .collect();
                LandmarkSet::from_pixels(&points, frame.width, frame.height)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "opencv-facemark"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mat_to_frame_copies_bgr_pixels() {
        let data: Vec<u8> = (0..12).collect();
        let mat = Mat::from_slice(&data)
            .and_then(|flat| flat.reshape(3, 2)?.try_clone())
            .unwrap();

        let frame = mat_to_frame(7, &mat).unwrap();

        assert_eq!(frame.index, 7);
        assert_eq!((frame.width, frame.height), (2, 2));
        assert_eq!(frame.order(), ChannelOrder::Bgr);
        assert_eq!(frame.pixel(1, 1), Some([9, 10, 11]));
    }

    #[test]
    fn test_open_missing_file() {
        let path = std::env::temp_dir().join("poise-cv-missing.mp4");
        assert!(matches!(
            OpenCvFrameSource::open(&path),
            Err(PoiseError::SourceOpen { .. })
        ));
    }
}
