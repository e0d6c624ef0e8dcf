//! Kinematics for a two-wheeled differential-drive robot.
//!
//! `DifferentialKinematics` maps a body velocity command (linear m/s, angular
//! rad/s) to left/right wheel angular velocities in degrees per second, which is
//! the unit the wheel joints of the simulated robot expect.
//!
//! # Example
//! ```rust
//! use agv_core::utils::math::kinematics::DifferentialKinematics;
//! let kin = DifferentialKinematics::new(0.033, 0.288, 2.0, 1.0);
//! let target = kin.compute_wheel_targets(1.0, 0.0);
//! assert_eq!(target.left, target.right);
//! ```

/// Per-wheel angular velocity targets (deg/s).
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WheelTarget {
    pub left: f32,
    pub right: f32,
}

impl WheelTarget {
    /// Both wheels stopped.
    pub const STOP: WheelTarget = WheelTarget {
        left: 0.0,
        right: 0.0,
    };
}

/// Geometry and speed limits of a differential-drive base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialKinematics {
    /// Radius of each wheel (m)
    wheel_radius: f32,
    /// Lateral distance between the wheel contact points (m)
    track_width: f32,
    /// Upper bound applied to the linear command (m/s)
    max_linear_speed: f32,
    /// Upper bound applied to the angular command (rad/s)
    max_angular_speed: f32,
}

impl DifferentialKinematics {
    pub fn new(
        wheel_radius: f32,
        track_width: f32,
        max_linear_speed: f32,
        max_angular_speed: f32,
    ) -> Self {
        Self {
            wheel_radius,
            track_width,
            max_linear_speed,
            max_angular_speed,
        }
    }

    /// Cap `linear` and `angular` at their configured maxima.
    ///
    /// Only the upper bound is enforced: a command below `-max` passes through
    /// unchanged. Reverse overspeed is therefore not limited here.
    pub fn clamp(
        &self,
        linear: f32,
        angular: f32,
    ) -> (f32, f32) {
        let linear = if linear > self.max_linear_speed {
            self.max_linear_speed
        } else {
            linear
        };
        let angular = if angular > self.max_angular_speed {
            self.max_angular_speed
        } else {
            angular
        };
        (linear, angular)
    }

    /// Turn two teleop axes into a full-speed command.
    ///
    /// Each axis only contributes its sign: positive maps to `+max`, negative to
    /// `-max`, zero (or NaN) to `0`.
    pub fn keyboard_command(
        &self,
        vertical: f32,
        horizontal: f32,
    ) -> (f32, f32) {
        fn ternary(
            axis: f32,
            max: f32,
        ) -> f32 {
            if axis > 0.0 {
                max
            } else if axis < 0.0 {
                -max
            } else {
                0.0
            }
        }
        (
            ternary(vertical, self.max_linear_speed),
            ternary(horizontal, self.max_angular_speed),
        )
    }

    /// Mix a body command into wheel targets without clamping.
    ///
    /// With `angular == 0` both wheels get exactly the same value.
    pub fn wheel_targets(
        &self,
        linear: f32,
        angular: f32,
    ) -> WheelTarget {
        let base = linear / self.wheel_radius;
        if angular != 0.0 {
            let delta = (angular * self.track_width) / self.wheel_radius;
            WheelTarget {
                left: (base + delta).to_degrees(),
                right: (base - delta).to_degrees(),
            }
        } else {
            let both = base.to_degrees();
            WheelTarget {
                left: both,
                right: both,
            }
        }
    }

    /// Clamp then mix.
    pub fn compute_wheel_targets(
        &self,
        linear: f32,
        angular: f32,
    ) -> WheelTarget {
        let (linear, angular) = self.clamp(linear, angular);
        self.wheel_targets(linear, angular)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kin() -> DifferentialKinematics {
        DifferentialKinematics::new(0.033, 0.288, 2.0, 1.0)
    }

    fn close(
        a: f32,
        b: f32,
        eps: f32,
    ) -> bool {
        libm::fabsf(a - b) < eps
    }

    #[test]
    fn test_straight_line_is_symmetric() {
        let k = kin();
        for linear in [-3.0, -1.0, 0.0, 0.25, 1.5, 2.0] {
            let t = k.compute_wheel_targets(linear, 0.0);
            assert_eq!(t.left, t.right, "asymmetric at linear={}", linear);
        }
    }

    #[test]
    fn test_reference_scenario() {
        let t = kin().wheel_targets(1.0, 0.5);
        let base = 1.0f32 / 0.033;
        let delta = (0.5f32 * 0.288) / 0.033;
        assert!(close(base, 30.30, 0.01));
        assert!(close(delta, 4.36, 0.01));
        assert!(close(t.left, 34.666_67 * 57.295_78, 0.05));
        assert!(close(t.right, 25.939_39 * 57.295_78, 0.05));
    }

    #[test]
    fn test_upper_clamp() {
        let k = kin();
        assert_eq!(
            k.compute_wheel_targets(2.0 + 5.0, 0.0),
            k.compute_wheel_targets(2.0, 0.0)
        );
        assert_eq!(k.clamp(0.0, 1.0 + 5.0), (0.0, 1.0));
    }

    #[test]
    fn test_reverse_overspeed_passes_through() {
        // Characterizes current behavior: only the upper bound is enforced.
        let k = kin();
        let t = k.compute_wheel_targets(-(2.0 + 5.0), 0.0);
        assert_ne!(t, k.compute_wheel_targets(-2.0, 0.0));
        assert!(close(t.left, (-7.0f32 / 0.033).to_degrees(), 0.05));
    }

    #[test]
    fn test_angular_increases_left_decreases_right() {
        let k = kin();
        let mut prev = k.wheel_targets(0.5, -0.9);
        for step in 1..10 {
            let angular = -0.9 + step as f32 * 0.2;
            let next = k.wheel_targets(0.5, angular);
            assert!(next.left > prev.left);
            assert!(next.right < prev.right);
            prev = next;
        }
    }

    #[test]
    fn test_keyboard_ternary() {
        let k = kin();
        assert_eq!(k.keyboard_command(0.3, -0.01), (2.0, -1.0));
        assert_eq!(k.keyboard_command(-1.0, 1.0), (-2.0, 1.0));
        assert_eq!(k.keyboard_command(0.0, f32::NAN), (0.0, 0.0));
    }
}
