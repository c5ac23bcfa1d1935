/// Identifier for a point in a [`crate::point_store::PointStore`].
///
/// This is an index into `PointStore::points` and stays valid for the
/// whole lifetime of the structure it was allocated in.
pub type PointIndex = usize;

/// Identifier for a branch in a [`crate::branch::BranchTree`].
///
/// An index into the branch arena; parent links are stored as ids, never
/// as owning references.
pub type BranchId = usize;
