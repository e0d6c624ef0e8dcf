//! Differential-drive controller.
//!
//! `DriveController` turns the active input source into wheel targets once per
//! fixed tick. Commands may arrive from another task or thread than the one
//! ticking the controller; the `{linear, angular, timestamp}` triple is always
//! read and written as a whole under a critical-section mutex.

use core::cell::Cell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embassy_time::{Duration, Instant};

use super::{ControlMode, DriveConfig, DriveError};
use crate::utils::math::kinematics::{DifferentialKinematics, WheelTarget};

/// Last velocity command and when it was received.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerState {
    pub last_command: Instant,
    pub linear: f32,
    pub angular: f32,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            last_command: Instant::from_ticks(0),
            linear: 0.0,
            angular: 0.0,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Inputs {
    command: ControllerState,
    /// (vertical, horizontal)
    axes: (f32, f32),
    stale: bool,
}

/// Velocity command → wheel targets, with a stale-command failsafe.
pub struct DriveController {
    mode: ControlMode,
    kinematics: DifferentialKinematics,
    command_timeout: Duration,
    inputs: Mutex<CriticalSectionRawMutex, Cell<Inputs>>,
}

impl DriveController {
    pub fn new(config: &DriveConfig) -> Result<Self, DriveError> {
        config.validate()?;
        tracing::info!(
            mode = ?config.mode,
            max_linear = config.max_linear_speed,
            max_angular = config.max_angular_speed,
            timeout_s = config.command_timeout,
            "drive controller ready"
        );
        Ok(Self {
            mode: config.mode,
            kinematics: DifferentialKinematics::new(
                config.wheel_radius,
                config.track_width,
                config.max_linear_speed,
                config.max_angular_speed,
            ),
            command_timeout: config.command_timeout(),
            inputs: Mutex::new(Cell::new(Inputs::default())),
        })
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn kinematics(&self) -> &DifferentialKinematics {
        &self.kinematics
    }

    /// Snapshot of the stored command.
    pub fn state(&self) -> ControllerState {
        self.inputs.lock(|cell| cell.get().command)
    }

    /// Store a velocity command (m/s, rad/s) received at `now`.
    pub fn set_command(
        &self,
        linear: f32,
        angular: f32,
        now: Instant,
    ) {
        self.inputs.lock(|cell| {
            let mut inputs = cell.get();
            inputs.command = ControllerState {
                last_command: now,
                linear,
                angular,
            };
            cell.set(inputs);
        });
        tracing::debug!(linear, angular, "cmd_vel stored");
    }

    /// Latch the teleop axes for the next ticks.
    pub fn set_keyboard_axes(
        &self,
        vertical: f32,
        horizontal: f32,
    ) {
        self.inputs.lock(|cell| {
            let mut inputs = cell.get();
            inputs.axes = (vertical, horizontal);
            cell.set(inputs);
        });
    }

    /// Compute this tick's wheel targets.
    pub fn evaluate(
        &self,
        now: Instant,
    ) -> WheelTarget {
        match self.mode {
            ControlMode::Keyboard => {
                let (vertical, horizontal) = self.inputs.lock(|cell| cell.get().axes);
                let (linear, angular) = self.kinematics.keyboard_command(vertical, horizontal);
                self.kinematics.compute_wheel_targets(linear, angular)
            }
            ControlMode::ExternalCommand => {
                let (command, went_stale) = self.inputs.lock(|cell| {
                    let mut inputs = cell.get();
                    let expired = now.saturating_duration_since(inputs.command.last_command)
                        > self.command_timeout;
                    if expired {
                        inputs.command.linear = 0.0;
                        inputs.command.angular = 0.0;
                    }
                    let went_stale = expired && !inputs.stale;
                    inputs.stale = expired;
                    cell.set(inputs);
                    (inputs.command, went_stale)
                });
                if went_stale {
                    tracing::warn!(
                        last_command_ms = command.last_command.as_millis(),
                        "no fresh cmd_vel, stopping"
                    );
                }
                // Wheel joints turn opposite to the middleware's yaw convention.
                self.kinematics
                    .compute_wheel_targets(command.linear, -command.angular)
            }
        }
    }
}
