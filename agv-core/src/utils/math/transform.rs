//! Rigid transforms for frame publishing.
//!
//! Poses are stored in whatever convention the scene uses. The engine the
//! robot lives in is left-handed right-up-forward (RUF); middleware consumers
//! expect right-handed forward-left-up (FLU). `FrameConvention` selects whether
//! a pose is converted on its way out.

use core::ops::Mul;

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);

    pub const fn new(
        x: f32,
        y: f32,
        z: f32,
    ) -> Self {
        Self { x, y, z }
    }

    fn cross(
        self,
        o: Vector3,
    ) -> Vector3 {
        Vector3::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }
}

impl core::ops::Add for Vector3 {
    type Output = Vector3;

    fn add(
        self,
        o: Vector3,
    ) -> Vector3 {
        Vector3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(
        self,
        s: f32,
    ) -> Vector3 {
        Vector3::new(self.x * s, self.y * s, self.z * s)
    }
}

/// Unit quaternion `(x, y, z, w)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(
        x: f32,
        y: f32,
        z: f32,
        w: f32,
    ) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians about the normalized `axis`.
    pub fn from_axis_angle(
        axis: Vector3,
        angle: f32,
    ) -> Self {
        let half = angle * 0.5;
        let s = libm::sinf(half);
        Quaternion::new(axis.x * s, axis.y * s, axis.z * s, libm::cosf(half)).normalized()
    }

    /// Scale to unit length. A zero quaternion becomes the identity.
    pub fn normalized(self) -> Self {
        let n = libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w);
        if n == 0.0 {
            return Self::IDENTITY;
        }
        Quaternion::new(self.x / n, self.y / n, self.z / n, self.w / n)
    }

    /// Rotate a vector by this quaternion.
    pub fn rotate(
        self,
        v: Vector3,
    ) -> Vector3 {
        let u = Vector3::new(self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;
        v + t * self.w + u.cross(t)
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(
        self,
        o: Quaternion,
    ) -> Quaternion {
        Quaternion::new(
            self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
            self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
        )
    }
}

/// Translation + rotation of a frame relative to its parent.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pose {
    pub translation: Vector3,
    pub rotation: Quaternion,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        translation: Vector3::ZERO,
        rotation: Quaternion::IDENTITY,
    };

    pub fn new(
        translation: Vector3,
        rotation: Quaternion,
    ) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Express `child` (given relative to `self`) in `self`'s parent frame.
    pub fn compose(
        &self,
        child: &Pose,
    ) -> Pose {
        Pose {
            translation: self.translation + self.rotation.rotate(child.translation),
            rotation: (self.rotation * child.rotation).normalized(),
        }
    }
}

/// Axis convention of published poses.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameConvention {
    /// Publish poses exactly as the scene stores them.
    #[default]
    Native,
    /// Scene is engine RUF, publish as ROS FLU.
    RufToFlu,
}

impl FrameConvention {
    pub fn apply(
        self,
        pose: Pose,
    ) -> Pose {
        match self {
            FrameConvention::Native => pose,
            FrameConvention::RufToFlu => {
                let t = pose.translation;
                let q = pose.rotation;
                Pose {
                    translation: Vector3::new(t.z, -t.x, t.y),
                    rotation: Quaternion::new(q.z, -q.x, q.y, -q.w),
                }
            }
        }
    }
}
