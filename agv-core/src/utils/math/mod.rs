//! Math utilities for the AGV.
//!
//! This module provides differential-drive kinematics and the rigid transforms
//! used when publishing the frame tree.

pub mod kinematics;
pub mod transform;
