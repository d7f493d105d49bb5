use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not open camera {index}")]
    CameraUnavailable { index: i32 },
    #[error("Camera error: {0}")]
    Camera(#[from] opencv::Error),
    #[error("Camera returned an empty frame")]
    EmptyFrame,
    #[error("Preview window was closed before a frame was chosen")]
    AcquisitionAborted,
    #[error("Display error: {0}")]
    Display(#[from] eframe::Error),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
