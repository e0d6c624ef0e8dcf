//! Frame-tree discovery.
//!
//! Starting at a root node, the builder walks the scene depth-first and keeps
//! every child tagged as a robot link. A child without the tag is dropped
//! together with everything beneath it. All frames share the root's prefix;
//! it does not grow with depth.

use alloc::{format, string::String, vec::Vec};

use hashbrown::HashMap;

use super::scene::SceneGraph;

/// One frame of the robot, mirroring a scene node.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameNode<H> {
    name: String,
    handle: H,
    children: Vec<FrameNode<H>>,
}

impl<H: Copy> FrameNode<H> {
    /// Build the frame subtree rooted at `root`.
    ///
    /// A non-empty `prefix` is joined to every frame name with `_`.
    pub fn build<G>(
        graph: &G,
        root: H,
        prefix: &str,
    ) -> Self
    where
        G: SceneGraph<Handle = H>,
    {
        let prefix = normalize_prefix(prefix);
        Self::build_with(graph, root, &prefix)
    }

    fn build_with<G>(
        graph: &G,
        node: H,
        prefix: &str,
    ) -> Self
    where
        G: SceneGraph<Handle = H>,
    {
        let children = graph
            .children_of(node)
            .into_iter()
            .filter(|&child| graph.has_link_tag(child))
            .map(|child| Self::build_with(graph, child, prefix))
            .collect();
        FrameNode {
            name: format!("{}{}", prefix, graph.name_of(node)),
            handle: node,
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> H {
        self.handle
    }

    pub fn children(&self) -> &[FrameNode<H>] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let mut prefix = String::from(prefix);
    if !prefix.is_empty() && !prefix.ends_with('_') {
        prefix.push('_');
    }
    prefix
}

/// A frame as published: its name, its parent frame (if any) and the scene
/// node to read the pose from.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<H> {
    pub name: String,
    pub parent: Option<String>,
    pub handle: H,
}

/// The discovered tree plus its pre-order flattening.
#[derive(Debug, Clone)]
pub struct FrameTree<H> {
    root: FrameNode<H>,
    frames: Vec<Frame<H>>,
    index: HashMap<String, usize>,
}

impl<H: Copy> FrameTree<H> {
    pub fn build<G>(
        graph: &G,
        root: H,
        prefix: &str,
    ) -> Self
    where
        G: SceneGraph<Handle = H>,
    {
        let tree = Self::from_root(FrameNode::build(graph, root, prefix));
        tracing::info!(
            root = tree.root().name(),
            frames = tree.len(),
            "frame tree built"
        );
        tree
    }

    pub fn from_root(root: FrameNode<H>) -> Self {
        let mut frames = Vec::new();
        flatten(&root, None, &mut frames);

        let mut index: HashMap<String, usize> = HashMap::with_capacity(frames.len());
        for (i, frame) in frames.iter().enumerate() {
            if index.contains_key(frame.name.as_str()) {
                tracing::warn!(frame = %frame.name, "duplicate frame name");
                continue;
            }
            index.insert(frame.name.clone(), i);
        }

        Self {
            root,
            frames,
            index,
        }
    }

    pub fn root(&self) -> &FrameNode<H> {
        &self.root
    }

    /// Frames in depth-first pre-order, root first.
    pub fn frames(&self) -> &[Frame<H>] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn find(
        &self,
        name: &str,
    ) -> Option<&Frame<H>> {
        self.index.get(name).map(|&i| &self.frames[i])
    }
}

fn flatten<H: Copy>(
    node: &FrameNode<H>,
    parent: Option<&str>,
    out: &mut Vec<Frame<H>>,
) {
    out.push(Frame {
        name: node.name.clone(),
        parent: parent.map(String::from),
        handle: node.handle(),
    });
    for child in &node.children {
        flatten(child, Some(node.name.as_str()), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::frames::scene::{NodeId, SceneArena};
    use crate::utils::math::transform::Pose;

    /// R{A(link){C(link)}, B{D(link)}}
    fn scene() -> (SceneArena, NodeId) {
        let mut s = SceneArena::new();
        let r = s.add(None, "R", false, Pose::IDENTITY);
        let a = s.add(Some(r), "A", true, Pose::IDENTITY);
        let b = s.add(Some(r), "B", false, Pose::IDENTITY);
        s.add(Some(a), "C", true, Pose::IDENTITY);
        s.add(Some(b), "D", true, Pose::IDENTITY);
        (s, r)
    }

    #[test]
    fn test_non_link_prunes_subtree() {
        let (s, r) = scene();
        let root = FrameNode::build(&s, r, "");
        assert_eq!(root.name(), "R");
        assert_eq!(root.handle(), r);
        assert_eq!(root.children().len(), 1);
        let a = &root.children()[0];
        assert_eq!(a.name(), "A");
        assert_eq!(a.children().len(), 1);
        assert_eq!(a.children()[0].name(), "C");
        assert!(a.children()[0].is_leaf());
        assert!(!a.is_leaf());
    }

    #[test]
    fn test_prefix_does_not_accumulate() {
        let (s, r) = scene();
        let root = FrameNode::build(&s, r, "pfx");
        assert_eq!(root.name(), "pfx_R");
        assert_eq!(root.children()[0].name(), "pfx_A");
        assert_eq!(root.children()[0].children()[0].name(), "pfx_C");
    }

    #[test]
    fn test_prefix_with_separator_is_kept() {
        let (s, r) = scene();
        let root = FrameNode::build(&s, r, "pfx_");
        assert_eq!(root.children()[0].name(), "pfx_A");
    }

    #[test]
    fn test_build_is_idempotent() {
        let (s, r) = scene();
        assert_eq!(FrameNode::build(&s, r, "x"), FrameNode::build(&s, r, "x"));
    }

    #[test]
    fn test_flattened_preorder_with_parents() {
        let (s, r) = scene();
        let tree = FrameTree::build(&s, r, "");
        let flat: Vec<(&str, Option<&str>)> = tree
            .frames()
            .iter()
            .map(|f| (f.name.as_str(), f.parent.as_deref()))
            .collect();
        assert_eq!(flat, [("R", None), ("A", Some("R")), ("C", Some("A"))]);
        assert_eq!(tree.root(), &FrameNode::build(&s, r, ""));
        assert!(tree.find("D").is_none());
        assert_eq!(tree.find("C").map(|f| f.parent.as_deref()), Some(Some("A")));
    }

    #[test]
    fn test_duplicate_names_index_first() {
        let mut s = SceneArena::new();
        let r = s.add(None, "R", false, Pose::IDENTITY);
        let first = s.add(Some(r), "wheel", true, Pose::IDENTITY);
        s.add(Some(r), "wheel", true, Pose::IDENTITY);
        let tree = FrameTree::build(&s, r, "");
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.find("wheel").map(|f| f.handle), Some(first));
    }
}
