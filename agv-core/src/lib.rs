//! Drive control and frame-tree broadcasting for a simulated two-wheeled AGV.
//!
//! The crate is `no_std` + `alloc`; the host owns the clock, the physics and the
//! transport. For a runnable host, see `agv-app/sim-host`.
#![no_std]

extern crate alloc;

pub mod utils;
