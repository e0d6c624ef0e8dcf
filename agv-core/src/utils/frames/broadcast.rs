//! Periodic transform broadcast.
//!
//! Every call walks the frame tree in pre-order and reads each node's pose from
//! the scene at that moment. The root is published against the configured
//! global frame using its world pose; every other frame is published against
//! its parent frame using its local pose.

use alloc::{string::String, vec::Vec};

use embassy_time::{Duration, Instant};
use serde::{Deserialize, Serialize};

use super::{scene::PoseSource, tree::FrameTree};
use crate::utils::{
    connection::messages::{Header, TfMessage, Time, TransformStamped},
    math::transform::FrameConvention,
};

/// Sink for TF batches, e.g. a middleware bridge.
pub trait TransformPublisher {
    fn publish(
        &mut self,
        message: TfMessage,
    );
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Parent frame of the tree root.
    pub root_frame: String,
    /// Prefix applied to every frame name.
    pub prefix: String,
    pub convention: FrameConvention,
    pub publish_hz: f32,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            root_frame: String::from("odom"),
            prefix: String::new(),
            convention: FrameConvention::Native,
            publish_hz: 20.0,
        }
    }
}

/// Shortest publish period; rates above 1 kHz are capped.
const MIN_PUBLISH_PERIOD: Duration = Duration::from_millis(1);

impl BroadcastConfig {
    /// Interval between two broadcasts. A rate that is not a positive finite
    /// number falls back to once per second.
    pub fn publish_period(&self) -> Duration {
        if self.publish_hz.is_finite() && self.publish_hz > 0.0 {
            Duration::from_micros((1_000_000.0 / self.publish_hz) as u64).max(MIN_PUBLISH_PERIOD)
        } else {
            Duration::from_secs(1)
        }
    }
}

pub struct TfBroadcaster<P> {
    config: BroadcastConfig,
    publisher: P,
}

impl<P: TransformPublisher> TfBroadcaster<P> {
    pub fn new(
        config: BroadcastConfig,
        publisher: P,
    ) -> Self {
        Self { config, publisher }
    }

    pub fn config(&self) -> &BroadcastConfig {
        &self.config
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Snapshot the live poses of every frame.
    pub fn collect<G: PoseSource>(
        &self,
        tree: &FrameTree<G::Handle>,
        graph: &G,
        stamp: Instant,
    ) -> TfMessage {
        let stamp = Time::from(stamp);
        let transforms: Vec<TransformStamped> = tree
            .frames()
            .iter()
            .map(|frame| {
                let (parent, pose) = match &frame.parent {
                    Some(parent) => (parent.clone(), graph.local_pose(frame.handle)),
                    None => (self.config.root_frame.clone(), graph.world_pose(frame.handle)),
                };
                TransformStamped {
                    header: Header {
                        stamp,
                        frame_id: parent,
                    },
                    child_frame_id: frame.name.clone(),
                    transform: self.config.convention.apply(pose).into(),
                }
            })
            .collect();
        TfMessage { transforms }
    }

    /// Collect and hand the batch to the publisher. Returns the frame count.
    pub fn broadcast<G: PoseSource>(
        &mut self,
        tree: &FrameTree<G::Handle>,
        graph: &G,
        stamp: Instant,
    ) -> usize {
        let message = self.collect(tree, graph, stamp);
        let count = message.transforms.len();
        self.publisher.publish(message);
        tracing::trace!(count, "tf published");
        count
    }
}
