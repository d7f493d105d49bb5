use crate::error::{Error, Result};
use crate::rule::Frame;
use image::RgbImage;
use opencv::{core::Mat, imgproc, prelude::*, videoio};

pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Frame>;
}

// Released when dropped
pub struct OpenCvCamera {
    capture: videoio::VideoCapture,
    buffer: Mat,
}

impl OpenCvCamera {
    pub fn open(index: i32) -> Result<Self> {
        let capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)?;
        if !videoio::VideoCapture::is_opened(&capture)? {
            return Err(Error::CameraUnavailable { index });
        }
        tracing::info!("Opened camera {}", index);

        Ok(Self {
            capture,
            buffer: Mat::default(),
        })
    }
}

impl FrameSource for OpenCvCamera {
    fn next_frame(&mut self) -> Result<Frame> {
        let grabbed = self.capture.read(&mut self.buffer)?;
        if !grabbed || self.buffer.rows() <= 0 || self.buffer.cols() <= 0 {
            return Err(Error::EmptyFrame);
        }
        bgr_to_frame(&self.buffer)
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        if let Err(err) = self.capture.release() {
            tracing::warn!("Failed to release camera: {}", err);
        }
    }
}

fn bgr_to_frame(bgr: &Mat) -> Result<Frame> {
    let mut rgb = Mat::default();
    imgproc::cvt_color_def(bgr, &mut rgb, imgproc::COLOR_BGR2RGB)?;

    let width = rgb.cols() as u32;
    let height = rgb.rows() as u32;
    let bytes = rgb.data_bytes()?.to_vec();
    let pixels = RgbImage::from_raw(width, height, bytes).ok_or(Error::EmptyFrame)?;
    Frame::new(pixels)
}
