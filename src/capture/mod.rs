//! Camera Capture Layer
//!
//! Wraps a nokhwa-backed webcam behind the [`FrameSource`] capability so the
//! vision pipeline (and its tests) never talk to a device directly. A frame
//! that is not ready yet is `Ok(None)`, not an error.

pub mod frame;

use anyhow::{Context, Result};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use tracing::{debug, info};

pub use frame::Frame;

/// Source of frames for the vision pipeline.
pub trait FrameSource {
    /// Acquire the next frame. `Ok(None)` means no frame is available right
    /// now; the caller skips the tick silently.
    fn acquire_frame(&mut self) -> Result<Option<Frame>>;
}

/// An available camera device.
#[derive(Debug, Clone)]
pub struct CameraDevice {
    /// Device index as understood by [`CameraSource::open`].
    pub index: u32,
    /// Human-readable device name.
    pub name: String,
}

/// Enumerate available camera devices in backend order.
pub fn list_cameras() -> Result<Vec<CameraDevice>> {
    let mut devices = Vec::new();
    for info in nokhwa::query(ApiBackend::Auto).context("camera enumeration failed")? {
        if let CameraIndex::Index(index) = info.index() {
            devices.push(CameraDevice {
                index: *index,
                name: info.human_name(),
            });
        }
    }
    Ok(devices)
}

/// A live webcam stream.
pub struct CameraSource {
    camera: Camera,
}

impl CameraSource {
    /// Open the device at `index` and start streaming.
    ///
    /// Failure to open is fatal for the application; per-frame read failures
    /// later are not.
    pub fn open(index: u32) -> Result<Self> {
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .with_context(|| format!("failed to open camera {}", index))?;
        camera
            .open_stream()
            .with_context(|| format!("failed to start camera {} stream", index))?;
        info!(index, "camera stream opened");
        Ok(Self { camera })
    }
}

impl FrameSource for CameraSource {
    fn acquire_frame(&mut self) -> Result<Option<Frame>> {
        let buffer = match self.camera.frame() {
            Ok(buffer) => buffer,
            Err(e) => {
                // Transient: the device had no frame ready for this tick
                debug!(error = %e, "no camera frame available");
                return Ok(None);
            }
        };
        match buffer.decode_image::<RgbFormat>() {
            Ok(image) => Ok(Some(Frame::new(image))),
            Err(e) => {
                debug!(error = %e, "failed to decode camera frame");
                Ok(None)
            }
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            debug!(error = %e, "error stopping camera stream");
        } else {
            info!("camera stream released");
        }
    }
}
