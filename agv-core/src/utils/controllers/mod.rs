//! Module Exports
//!
//! This file exports the drive-side components of the AGV.
//!
//! - `drive`: the differential-drive controller with its command-timeout
//!   failsafe.
//! - `wheels`: the two wheel actuators the controller's targets are applied to.

pub mod drive;
pub mod wheels;

use core::fmt;

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

pub use drive::{ControllerState, DriveController};
pub use wheels::{DriveParams, Drivetrain, WheelActuator, WheelSide};

/// Which input source feeds the controller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// Teleop axes sampled every tick.
    Keyboard,
    /// Velocity commands received on `cmd_vel`.
    #[default]
    ExternalCommand,
}

/// Errors raised while setting up the drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveError {
    MissingWheel(WheelSide),
    InvalidConfig(&'static str),
}

impl fmt::Display for DriveError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            DriveError::MissingWheel(side) => write!(f, "{:?} wheel actuator is not set", side),
            DriveError::InvalidConfig(reason) => write!(f, "invalid drive config: {}", reason),
        }
    }
}

impl core::error::Error for DriveError {}

/// Per-robot drive parameters.
///
/// Deserialized with `#[serde(default)]`, so a partial JSON document only
/// overrides the fields it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub namespace: alloc::string::String,
    pub mode: ControlMode,
    /// m/s
    pub max_linear_speed: f32,
    /// rad/s
    pub max_angular_speed: f32,
    /// m
    pub wheel_radius: f32,
    /// m, distance between the tyres
    pub track_width: f32,
    pub force_limit: f32,
    pub damping: f32,
    /// seconds without a command before the robot is stopped
    pub command_timeout: f32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            namespace: "agv0".into(),
            mode: ControlMode::ExternalCommand,
            max_linear_speed: 2.0,
            max_angular_speed: 1.0,
            wheel_radius: 0.033,
            track_width: 0.288,
            force_limit: 10.0,
            damping: 10.0,
            command_timeout: 0.5,
        }
    }
}

impl DriveConfig {
    /// Reject geometry and limits the mixer cannot work with.
    pub fn validate(&self) -> Result<(), DriveError> {
        if self.max_linear_speed.is_nan() || self.max_linear_speed < 0.0 {
            return Err(DriveError::InvalidConfig("max_linear_speed must not be negative"));
        }
        if self.max_angular_speed.is_nan() || self.max_angular_speed < 0.0 {
            return Err(DriveError::InvalidConfig("max_angular_speed must not be negative"));
        }
        if self.wheel_radius.is_nan() || self.wheel_radius <= 0.0 {
            return Err(DriveError::InvalidConfig("wheel_radius must be positive"));
        }
        if self.track_width.is_nan() || self.track_width < 0.0 {
            return Err(DriveError::InvalidConfig("track_width must not be negative"));
        }
        if self.command_timeout.is_nan() || self.command_timeout < 0.0 {
            return Err(DriveError::InvalidConfig("command_timeout must not be negative"));
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_micros((self.command_timeout * 1_000_000.0) as u64)
    }

    pub fn drive_params(&self) -> DriveParams {
        DriveParams {
            force_limit: self.force_limit,
            damping: self.damping,
        }
    }
}
