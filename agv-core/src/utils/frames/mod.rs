//! Frame tree of the robot.
//!
//! - `scene`: access to the host scene graph, plus an in-memory arena
//! - `tree`: discovery of link frames below a root node
//! - `broadcast`: periodic TF publishing of the discovered frames

pub mod broadcast;
pub mod scene;
pub mod tree;

pub use broadcast::{BroadcastConfig, TfBroadcaster, TransformPublisher};
pub use scene::{NodeId, PoseSource, SceneArena, SceneDescription, SceneGraph};
pub use tree::{Frame, FrameNode, FrameTree};
