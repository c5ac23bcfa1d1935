use crate::types::{BranchId, PointIndex};
use std::ops::Range;

/// Where a child branch was grafted onto its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BranchAttachment {
    /// Absolute index of the parent's graft point.
    pub node_index: PointIndex,
    pub child: BranchId,
}

/// One spine of the plant: a contiguous run of points.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub start: PointIndex,
    pub point_count: usize,
    /// Rest length between consecutive points of this branch.
    pub spacing: f32,
    /// Lookup-only link to the parent; `None` for the main branch.
    pub parent: Option<BranchId>,
    /// Distance from the main branch in branching levels.
    pub depth: u32,
    /// Children in grafting order.
    pub attachments: Vec<BranchAttachment>,
}

impl Branch {
    pub fn new_root(start: PointIndex, point_count: usize, spacing: f32) -> Self {
        Self {
            start,
            point_count,
            spacing,
            parent: None,
            depth: 0,
            attachments: Vec::new(),
        }
    }

    pub fn new_child(
        start: PointIndex,
        point_count: usize,
        spacing: f32,
        parent: BranchId,
        depth: u32,
    ) -> Self {
        Self {
            start,
            point_count,
            spacing,
            parent: Some(parent),
            depth,
            attachments: Vec::new(),
        }
    }

    /// One past the last point index owned by this branch.
    pub fn end(&self) -> PointIndex {
        self.start + self.point_count
    }

    /// Index of the last point owned by this branch.
    pub fn last(&self) -> PointIndex {
        self.end() - 1
    }

    pub fn range(&self) -> Range<PointIndex> {
        self.start..self.end()
    }
}

/// Arena of branches. Parent links are ids into the arena, so the tree
/// can never form an ownership cycle.
#[derive(Debug, Default, Clone)]
pub struct BranchTree {
    pub branches: Vec<Branch>,
}

impl BranchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Adds the main branch. Its id is always 0 when called first.
    pub fn add_root(&mut self, start: PointIndex, point_count: usize, spacing: f32) -> BranchId {
        let id = self.branches.len();
        self.branches
            .push(Branch::new_root(start, point_count, spacing));
        id
    }

    /// Adds a child grafted at local offset `offset` of `parent` and
    /// records the attachment on the parent.
    ///
    /// ### Panics
    /// Panics if `parent` is not in the arena or `offset` lies outside it.
    pub fn add_child(
        &mut self,
        parent: BranchId,
        offset: usize,
        start: PointIndex,
        point_count: usize,
        spacing: f32,
    ) -> BranchId {
        let id = self.branches.len();
        let p = &self.branches[parent];
        assert!(
            offset < p.point_count,
            "graft offset {offset} outside branch of {} points",
            p.point_count
        );
        let node_index = p.start + offset;
        let depth = p.depth + 1;

        self.branches
            .push(Branch::new_child(start, point_count, spacing, parent, depth));
        self.branches[parent]
            .attachments
            .push(BranchAttachment { node_index, child: id });
        id
    }

    pub fn get(&self, id: BranchId) -> Option<&Branch> {
        self.branches.get(id)
    }

    pub fn parent_of(&self, id: BranchId) -> Option<BranchId> {
        self.branches.get(id).and_then(|b| b.parent)
    }

    pub fn depth_of(&self, id: BranchId) -> Option<u32> {
        self.branches.get(id).map(|b| b.depth)
    }

    pub fn iter(&self) -> impl Iterator<Item = (BranchId, &Branch)> {
        self.branches.iter().enumerate()
    }

    /// Largest depth of any branch, or `None` for an empty tree.
    pub fn max_depth(&self) -> Option<u32> {
        self.branches.iter().map(|b| b.depth).max()
    }
}
