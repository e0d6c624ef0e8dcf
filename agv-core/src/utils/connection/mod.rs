//! Module Exports
//!
//! This file exports the middleware-facing side of the AGV.
//!
//! # Modules
//! - `messages`: Twist and TF message shapes with their JSON codec.
//! - `subscriber`: the `cmd_vel` channel and the loop feeding the drive
//!   controller.

pub mod messages;
pub mod subscriber;

use alloc::{format, string::String};

/// Topic the velocity commands arrive on.
///
/// `"<namespace>/cmd_vel"`, or plain `"cmd_vel"` for an empty namespace.
pub fn cmd_vel_topic(namespace: &str) -> String {
    if namespace.is_empty() {
        String::from("cmd_vel")
    } else {
        format!("{}/cmd_vel", namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_vel_topic() {
        assert_eq!(cmd_vel_topic("agv0"), "agv0/cmd_vel");
        assert_eq!(cmd_vel_topic(""), "cmd_vel");
    }
}
