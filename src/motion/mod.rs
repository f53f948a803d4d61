//! Device motion tracking
//!
//! Turns raw accelerometer events into a debounced "device is moving" flag.
//! Motion is reported on the first sample above the threshold; stillness is
//! only trusted once it has persisted for the debounce delay.

use crate::timing::{OneShotTimer, Timer, Timestamp};
use crate::types::{MotionSample, OrientationSample, RotationRate, Vec3};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MOTION_THRESHOLD: f64 = 0.6;
pub const DEFAULT_STILL_DELAY: Duration = Duration::from_millis(500);

/// Debounced motion flag plus the start of a pending still period, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionState {
    pub is_moving: bool,
    pub pending_still_since: Option<Timestamp>,
}

/// Device orientation angles in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

/// Latest raw sensor readings, kept for the status surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionTelemetry {
    pub acceleration: Vec3,
    pub acceleration_including_gravity: Vec3,
    pub magnitude: f64,
    pub interval_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_rate: Option<RotationRate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    pub events_processed: u64,
}

#[derive(Debug, Clone)]
pub struct MotionTracker {
    threshold: f64,
    still_delay: Duration,
    is_moving: bool,
    still_timer: OneShotTimer,
    telemetry: MotionTelemetry,
}

impl MotionTracker {
    pub fn new(threshold: f64, still_delay: Duration) -> Self {
        Self {
            threshold,
            still_delay,
            is_moving: false,
            still_timer: OneShotTimer::new(),
            telemetry: MotionTelemetry::default(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Feed one accelerometer event.
    ///
    /// A still timer that would have expired before this sample arrived is
    /// applied first, so late delivery cannot cancel an elapsed still period.
    pub fn on_sample(&mut self, sample: &MotionSample) -> MotionState {
        self.expire(sample.timestamp);

        let magnitude = sample.acceleration.magnitude();
        let currently_moving = magnitude > self.threshold;

        if currently_moving {
            if !self.is_moving {
                log::debug!(
                    "Device moving (magnitude {:.3} > {:.3})",
                    magnitude,
                    self.threshold
                );
            }
            self.is_moving = true;
            self.still_timer.cancel();
        } else if !self.still_timer.is_armed() {
            self.still_timer.schedule(sample.timestamp, self.still_delay);
        }

        self.record(sample, magnitude);
        self.state()
    }

    /// Orientation only feeds telemetry; it never affects the motion flag.
    pub fn on_orientation(&mut self, sample: &OrientationSample) {
        self.telemetry.orientation = Some(Orientation {
            alpha: sample.alpha,
            beta: sample.beta,
            gamma: sample.gamma,
        });
        self.telemetry.events_processed += 1;
    }

    /// Apply the still timer if it is due. Returns the new state on a transition.
    pub fn expire(&mut self, now: Timestamp) -> Option<MotionState> {
        if self.still_timer.fire(now) {
            self.settle_still()
        } else {
            None
        }
    }

    /// Clear the motion flag after an elapsed still period.
    fn settle_still(&mut self) -> Option<MotionState> {
        if !self.is_moving {
            return None;
        }
        log::debug!("Device still for {:?}", self.still_delay);
        self.is_moving = false;
        Some(self.state())
    }

    pub fn state(&self) -> MotionState {
        MotionState {
            is_moving: self.is_moving,
            pending_still_since: self.still_timer.armed_at(),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    pub fn telemetry(&self) -> &MotionTelemetry {
        &self.telemetry
    }

    /// Drop any pending still period, as when the camera stops.
    pub fn cancel(&mut self) {
        self.still_timer.cancel();
    }

    fn record(&mut self, sample: &MotionSample, magnitude: f64) {
        let telemetry = &mut self.telemetry;
        telemetry.acceleration = sample.acceleration;
        telemetry.acceleration_including_gravity = sample.acceleration_including_gravity;
        telemetry.magnitude = magnitude;
        telemetry.interval_ms = sample.interval_ms;
        telemetry.rotation_rate = sample.rotation_rate;
        telemetry.events_processed += 1;
    }
}

impl Timer for MotionTracker {
    fn deadline(&self) -> Option<Timestamp> {
        self.still_timer.deadline()
    }

    fn cancel(&mut self) {
        MotionTracker::cancel(self);
    }

    fn fire(&mut self, now: Timestamp) -> bool {
        let fired = self.still_timer.fire(now);
        if fired {
            self.settle_still();
        }
        fired
    }
}

impl Default for MotionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MOTION_THRESHOLD, DEFAULT_STILL_DELAY)
    }
}
