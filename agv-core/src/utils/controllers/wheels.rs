//! Wheel actuators for the AGV.
//!
//! The physics joints belong to the host. `WheelActuator` is the seam the host
//! implements; `Drivetrain` configures both joints identically at setup and
//! forwards each tick's targets to them.

use embassy_time::Instant;

use super::{DriveConfig, DriveController, DriveError};
use crate::utils::math::kinematics::WheelTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelSide {
    Left,
    Right,
}

/// Joint drive settings applied once at setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveParams {
    pub force_limit: f32,
    pub damping: f32,
}

/// A velocity-driven wheel joint.
pub trait WheelActuator {
    fn configure(
        &mut self,
        params: DriveParams,
    );

    /// Target angular velocity in deg/s.
    fn set_target_angular_velocity(
        &mut self,
        value: f32,
    );
}

/// The two wheels of the base.
pub struct Drivetrain<W> {
    left: W,
    right: W,
}

impl<W: WheelActuator> Drivetrain<W> {
    /// Configure both wheels. Fails if either actuator is missing.
    pub fn new(
        left: Option<W>,
        right: Option<W>,
        config: &DriveConfig,
    ) -> Result<Self, DriveError> {
        let mut left = left.ok_or(DriveError::MissingWheel(WheelSide::Left))?;
        let mut right = right.ok_or(DriveError::MissingWheel(WheelSide::Right))?;

        let params = config.drive_params();
        left.configure(params);
        right.configure(params);
        tracing::info!(
            force_limit = params.force_limit,
            damping = params.damping,
            "wheel drives configured"
        );

        Ok(Self { left, right })
    }

    /// Forward a target to the joints verbatim.
    pub fn apply(
        &mut self,
        target: WheelTarget,
    ) {
        self.left.set_target_angular_velocity(target.left);
        self.right.set_target_angular_velocity(target.right);
    }

    /// One fixed tick: evaluate the controller and apply its output.
    pub fn drive(
        &mut self,
        controller: &DriveController,
        now: Instant,
    ) -> WheelTarget {
        let target = controller.evaluate(now);
        self.apply(target);
        target
    }

    pub fn wheel(
        &self,
        side: WheelSide,
    ) -> &W {
        match side {
            WheelSide::Left => &self.left,
            WheelSide::Right => &self.right,
        }
    }
}
