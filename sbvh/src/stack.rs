use crate::BVH_STACK_SIZE;

/// Fixed-size stack used while traversing a BVH.
///
/// Each entry holds a node's index together with the distance at which the
/// ray enters that node, so that nodes farther than the closest hit found so
/// far can be skipped once popped.
///
/// Queries create one on the call stack when not given any; reusing a single
/// stack across many queries on the same thread avoids re-initializing it.
#[derive(Clone, Debug)]
pub struct BvhStack {
    items: [(u32, f32); BVH_STACK_SIZE],
    len: usize,
}

impl BvhStack {
    pub fn new() -> Self {
        Self {
            items: [(0, 0.0); BVH_STACK_SIZE],
            len: 0,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.len = 0;
    }

    /// Pushes an entry.
    ///
    /// Panics if the stack is full; trees are limited in depth so that this
    /// can't happen during a traversal.
    pub(crate) fn push(&mut self, node_id: u32, distance: f32) {
        self.items[self.len] = (node_id, distance);
        self.len += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<(u32, f32)> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            Some(self.items[self.len])
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for BvhStack {
    fn default() -> Self {
        Self::new()
    }
}
