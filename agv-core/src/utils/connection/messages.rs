//! Wire messages exchanged with the middleware bridge.
//!
//! Shapes follow `geometry_msgs/Twist` and `tf2_msgs/TFMessage`, encoded as
//! JSON with `serde_json`.

use alloc::{string::String, vec::Vec};
use core::fmt;

use embassy_time::Instant;
use serde::{Deserialize, Serialize};

use crate::utils::math::transform::{Pose, Quaternion, Vector3};

/// Velocity command. Only `linear.x` (m/s) and `angular.z` (rad/s) are used.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Twist {
    pub linear: Vector3,
    pub angular: Vector3,
}

impl Twist {
    pub fn planar(
        linear_x: f32,
        angular_z: f32,
    ) -> Self {
        Self {
            linear: Vector3::new(linear_x, 0.0, 0.0),
            angular: Vector3::new(0.0, 0.0, angular_z),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Time {
    pub sec: u32,
    pub nanosec: u32,
}

impl From<Instant> for Time {
    fn from(instant: Instant) -> Self {
        let micros = instant.as_micros();
        Time {
            sec: (micros / 1_000_000) as u32,
            nanosec: ((micros % 1_000_000) * 1_000) as u32,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub stamp: Time,
    pub frame_id: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vector3,
    pub rotation: Quaternion,
}

impl From<Pose> for Transform {
    fn from(pose: Pose) -> Self {
        Transform {
            translation: pose.translation,
            rotation: pose.rotation,
        }
    }
}

/// Pose of `child_frame_id` relative to `header.frame_id`.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformStamped {
    pub header: Header,
    pub child_frame_id: String,
    pub transform: Transform,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfMessage {
    pub transforms: Vec<TransformStamped>,
}

#[derive(Debug)]
pub enum MessageError {
    Decode(serde_json::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for MessageError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            MessageError::Decode(e) => write!(f, "failed to decode message: {}", e),
            MessageError::Encode(e) => write!(f, "failed to encode message: {}", e),
        }
    }
}

impl core::error::Error for MessageError {}

pub fn decode_twist(payload: &[u8]) -> Result<Twist, MessageError> {
    serde_json::from_slice(payload).map_err(MessageError::Decode)
}

impl TfMessage {
    pub fn to_json(&self) -> Result<String, MessageError> {
        serde_json::to_string(self).map_err(MessageError::Encode)
    }
}
