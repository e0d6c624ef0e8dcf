//! `cmd_vel` subscription.
//!
//! Each robot owns one [`CmdVelChannel`]. The transport decodes incoming
//! payloads into it with [`submit`] from whichever thread it runs on;
//! [`listen`] drains it on the control side and stamps each command with the
//! local clock.

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use embassy_time::Instant;

use super::messages::{decode_twist, MessageError, Twist};
use crate::utils::controllers::DriveController;

/// Queue of velocity commands (`Twist` messages) bound for one robot.
pub type CmdVelChannel = Channel<CriticalSectionRawMutex, Twist, 16>;

/// Decode a JSON payload and queue it on `channel` without blocking.
///
/// Returns `Ok(false)` when the queue is full and the command was dropped.
pub fn submit(
    channel: &CmdVelChannel,
    payload: &[u8],
) -> Result<bool, MessageError> {
    let twist = match decode_twist(payload) {
        Ok(twist) => twist,
        Err(error) => {
            tracing::error!(%error, "dropping malformed cmd_vel");
            return Err(error);
        }
    };
    match channel.try_send(twist) {
        Ok(()) => Ok(true),
        Err(_) => {
            tracing::warn!("cmd_vel queue full, dropping command");
            Ok(false)
        }
    }
}

/// Store one received command on the controller.
pub fn receive(
    controller: &DriveController,
    twist: Twist,
    now: Instant,
) {
    controller.set_command(twist.linear.x, twist.angular.z, now);
}

/// Feed every command queued on `channel` into `controller`, stamped with
/// `now()`.
pub async fn listen(
    channel: &CmdVelChannel,
    controller: &DriveController,
    now: fn() -> Instant,
) -> ! {
    loop {
        let twist = channel.receive().await;
        receive(controller, twist, now());
    }
}
