use crate::{
    branch::BranchTree,
    types::{BranchId, PointIndex},
};
use std::collections::VecDeque;

/// Ordered point indices for one branch poly-line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderGroup {
    /// Branch depth; 0 is the main branch. Used for width tapering.
    pub order: u32,
    pub branch: BranchId,
    /// The parent's graft point (if any) followed by the branch's own
    /// contiguous range.
    pub indices: Vec<PointIndex>,
}

/// Derives one [`RenderGroup`] per branch, breadth-first from the main
/// branch (id `root`). Children are visited in grafting order.
///
/// Pure function of the tree.
pub fn render_groups(tree: &BranchTree, root: BranchId) -> Vec<RenderGroup> {
    let mut groups = Vec::with_capacity(tree.len());
    if tree.get(root).is_none() {
        return groups;
    }

    // The main branch hangs off a synthetic attachment with no graft point.
    let mut queue: VecDeque<(Option<PointIndex>, BranchId, u32)> =
        VecDeque::from([(None, root, 0)]);

    while let Some((graft, id, order)) = queue.pop_front() {
        let branch = &tree.branches[id];

        let mut indices = Vec::with_capacity(branch.point_count + 1);
        indices.extend(graft);
        indices.extend(branch.range());
        groups.push(RenderGroup {
            order,
            branch: id,
            indices,
        });

        for att in &branch.attachments {
            queue.push_back((Some(att.node_index), att.child, order + 1));
        }
    }
    groups
}
