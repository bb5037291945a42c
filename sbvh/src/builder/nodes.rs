use std::ops;

use super::Reference;
use crate::BoundingBox;

#[derive(Clone, Debug)]
pub(crate) enum BuildNode {
    Internal {
        bb: BoundingBox,
        left_id: BuildNodeId,
        right_id: BuildNodeId,
    },

    Leaf {
        bb: BoundingBox,
        refs: Vec<Reference>,
    },
}

impl BuildNode {
    pub fn bb(&self) -> BoundingBox {
        match self {
            BuildNode::Internal { bb, .. } | BuildNode::Leaf { bb, .. } => *bb,
        }
    }
}

impl Default for BuildNode {
    fn default() -> Self {
        BuildNode::Leaf {
            bb: Default::default(),
            refs: Default::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BuildNodeId(u32);

impl BuildNodeId {
    pub fn root() -> Self {
        Self(0)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Arena of nodes built so far.
///
/// The root is allocated up front, so that the root of an arena built on
/// another thread can be found (at zero) after it gets appended.
#[derive(Debug)]
pub(crate) struct BuildNodes {
    nodes: Vec<BuildNode>,
}

impl BuildNodes {
    /// Allocates a placeholder node that's expected to get overwritten.
    pub fn reserve(&mut self) -> BuildNodeId {
        self.nodes.push(BuildNode::default());

        BuildNodeId((self.nodes.len() - 1) as u32)
    }

    /// Moves all nodes from `other` into this arena and returns the new id of
    /// `other`'s root.
    pub fn append(&mut self, other: BuildNodes) -> BuildNodeId {
        let offset = self.nodes.len() as u32;

        self.nodes.reserve(other.nodes.len());

        for mut node in other.nodes {
            if let BuildNode::Internal {
                left_id, right_id, ..
            } = &mut node
            {
                left_id.0 += offset;
                right_id.0 += offset;
            }

            self.nodes.push(node);
        }

        BuildNodeId(offset)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl Default for BuildNodes {
    fn default() -> Self {
        Self {
            nodes: vec![BuildNode::default()],
        }
    }
}

impl ops::Index<BuildNodeId> for BuildNodes {
    type Output = BuildNode;

    fn index(&self, index: BuildNodeId) -> &Self::Output {
        &self.nodes[index.get() as usize]
    }
}

impl ops::IndexMut<BuildNodeId> for BuildNodes {
    fn index_mut(&mut self, index: BuildNodeId) -> &mut Self::Output {
        &mut self.nodes[index.get() as usize]
    }
}
