//! Scene-graph access.
//!
//! The host's scene graph is reached through [`SceneGraph`] (topology, names
//! and link tags) and [`PoseSource`] (live transforms). [`SceneArena`] is an
//! in-memory graph implementing both, loaded from a JSON [`SceneDescription`].

use alloc::{string::String, vec::Vec};
use core::fmt;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::utils::math::transform::Pose;

/// Read-only view of a scene hierarchy.
pub trait SceneGraph {
    type Handle: Copy + fmt::Debug;

    /// Direct children in the host's enumeration order.
    fn children_of(
        &self,
        node: Self::Handle,
    ) -> Vec<Self::Handle>;

    fn name_of(
        &self,
        node: Self::Handle,
    ) -> &str;

    /// Whether the node is a kinematic link of the robot.
    fn has_link_tag(
        &self,
        node: Self::Handle,
    ) -> bool;
}

/// Live transform state of scene nodes.
pub trait PoseSource: SceneGraph {
    /// Pose relative to the scene parent.
    fn local_pose(
        &self,
        node: Self::Handle,
    ) -> Pose;

    /// Pose relative to the scene origin.
    fn world_pose(
        &self,
        node: Self::Handle,
    ) -> Pose;
}

/// Nested scene as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub name: String,
    #[serde(default)]
    pub link: bool,
    #[serde(default)]
    pub pose: Pose,
    #[serde(default)]
    pub children: Vec<SceneDescription>,
}

/// Index of a node inside a [`SceneArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct SceneObject {
    name: String,
    link: bool,
    pose: Pose,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Flat, index-addressed scene graph.
#[derive(Debug, Clone, Default)]
pub struct SceneArena {
    objects: Vec<SceneObject>,
    by_name: HashMap<String, NodeId>,
}

impl SceneArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a nested description, returning the arena and its root.
    pub fn from_description(description: &SceneDescription) -> (Self, NodeId) {
        let mut arena = Self::new();
        let root = arena.insert(None, description);
        (arena, root)
    }

    fn insert(
        &mut self,
        parent: Option<NodeId>,
        description: &SceneDescription,
    ) -> NodeId {
        let id = self.add(
            parent,
            &description.name,
            description.link,
            description.pose,
        );
        for child in &description.children {
            self.insert(Some(id), child);
        }
        id
    }

    /// Append a node under `parent` (or as a new root).
    pub fn add(
        &mut self,
        parent: Option<NodeId>,
        name: &str,
        link: bool,
        pose: Pose,
    ) -> NodeId {
        let id = NodeId(self.objects.len());
        self.objects.push(SceneObject {
            name: String::from(name),
            link,
            pose,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.objects[parent.0].children.push(id);
        }
        self.by_name.entry(String::from(name)).or_insert(id);
        id
    }

    /// First node added under `name`.
    pub fn find(
        &self,
        name: &str,
    ) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn parent_of(
        &self,
        node: NodeId,
    ) -> Option<NodeId> {
        self.objects[node.0].parent
    }

    pub fn set_local_pose(
        &mut self,
        node: NodeId,
        pose: Pose,
    ) {
        self.objects[node.0].pose = pose;
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl SceneGraph for SceneArena {
    type Handle = NodeId;

    fn children_of(
        &self,
        node: NodeId,
    ) -> Vec<NodeId> {
        self.objects[node.0].children.clone()
    }

    fn name_of(
        &self,
        node: NodeId,
    ) -> &str {
        &self.objects[node.0].name
    }

    fn has_link_tag(
        &self,
        node: NodeId,
    ) -> bool {
        self.objects[node.0].link
    }
}

impl PoseSource for SceneArena {
    fn local_pose(
        &self,
        node: NodeId,
    ) -> Pose {
        self.objects[node.0].pose
    }

    fn world_pose(
        &self,
        node: NodeId,
    ) -> Pose {
        let mut pose = self.local_pose(node);
        let mut current = self.parent_of(node);
        while let Some(parent) = current {
            pose = self.local_pose(parent).compose(&pose);
            current = self.parent_of(parent);
        }
        pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::math::transform::{Quaternion, Vector3};

    const SCENE: &str = r#"{
        "name": "agv",
        "pose": {"translation": {"x": 1.0}},
        "children": [
            {"name": "base_link", "link": true, "pose": {"translation": {"y": 0.5}},
             "children": [{"name": "lidar", "link": true}]},
            {"name": "mesh"}
        ]
    }"#;

    #[test]
    fn test_description_keeps_child_order() {
        let description: SceneDescription = serde_json::from_str(SCENE).unwrap();
        let (arena, root) = SceneArena::from_description(&description);
        assert_eq!(arena.len(), 4);
        let names: Vec<&str> = arena
            .children_of(root)
            .into_iter()
            .map(|c| arena.name_of(c))
            .collect();
        assert_eq!(names, ["base_link", "mesh"]);
        assert!(!arena.has_link_tag(root));
        assert!(!arena.has_link_tag(arena.find("mesh").unwrap()));
        assert_eq!(arena.parent_of(root), None);
        assert_eq!(arena.parent_of(arena.find("lidar").unwrap()), arena.find("base_link"));
    }

    #[test]
    fn test_world_pose_composes_parents() {
        let description: SceneDescription = serde_json::from_str(SCENE).unwrap();
        let (arena, _) = SceneArena::from_description(&description);
        let lidar = arena.find("lidar").unwrap();
        assert_eq!(arena.local_pose(lidar), Pose::IDENTITY);
        assert_eq!(arena.world_pose(lidar).translation, Vector3::new(1.0, 0.5, 0.0));
        assert_eq!(arena.world_pose(lidar).rotation, Quaternion::IDENTITY);
    }
}
