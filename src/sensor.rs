//! Accelerometer tilt smoothing
//!
//! The device reports (x, y, z) acceleration at ~5 Hz; only x matters for
//! steering. Samples are exponentially smoothed and an errored sample is
//! dropped on the floor, keeping the previous smoothed value.

use serde::{Deserialize, Serialize};

use crate::consts::{SENSOR_INTERVAL_SECS, TILT_SMOOTHING};

/// One raw accelerometer reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Exponential smoothing filter over the horizontal tilt axis.
///
/// `new = 0.75 * raw + 0.25 * old`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TiltFilter {
    smoothed: f32,
}

impl TiltFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requested sampling cadence for the sensor service
    pub fn update_interval() -> f32 {
        SENSOR_INTERVAL_SECS
    }

    /// Fold one reading into the filter and return the new smoothed tilt.
    /// `None` marks a sensor error; the sample is dropped and the previous
    /// value persists.
    pub fn ingest(&mut self, sample: Option<AccelSample>) -> f32 {
        if let Some(sample) = sample {
            self.smoothed = TILT_SMOOTHING * sample.x + (1.0 - TILT_SMOOTHING) * self.smoothed;
        } else {
            log::warn!("accelerometer sample dropped");
        }
        self.smoothed
    }

    pub fn value(&self) -> f32 {
        self.smoothed
    }
}
