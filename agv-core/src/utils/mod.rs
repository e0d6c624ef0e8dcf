//! Utility re-exports and helper macros for the AGV.
//!
//! - `connection`: wire messages, topic naming and the `cmd_vel` listener
//! - `controllers`: differential-drive controller and wheel actuators
//! - `frames`: scene-graph access, frame-tree discovery and TF broadcasting
//! - `math`: differential kinematics and rigid transforms
//!
//! The `mk_static!` macro simplifies static initialization for values shared
//! between the host's tasks and threads.

pub mod connection;
pub mod controllers;
pub mod frames;
pub mod math;

pub use connection::subscriber::{listen as cmd_vel_listener, CmdVelChannel};
pub use controllers::{ControlMode, DriveConfig, DriveController, Drivetrain, WheelActuator};
pub use embassy_time::{Duration, Instant};
pub use frames::{FrameTree, SceneArena, TfBroadcaster};

#[doc(hidden)]
pub use static_cell as __static_cell;

#[macro_export]
/// Initialize a static cell and write the given value into it.
///
/// This macro creates a `static_cell::StaticCell` for type `$t` and initializes
/// it with `$val`, returning a `&'static mut` to the stored value.
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: $crate::utils::__static_cell::StaticCell<$t> =
            $crate::utils::__static_cell::StaticCell::new();
        STATIC_CELL.uninit().write($val)
    }};
}
