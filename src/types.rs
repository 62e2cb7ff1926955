/// Identifier for an edge pair owned by a [`crate::system::SubstrateSystem`].
///
/// Ids are **1-based**: `0` is reserved as the "unclaimed" marker in the
/// ownership grid and never names a real edge. Id `n` lives at index `n - 1`
/// in the system's edge arena, and ids only grow — edges are never removed,
/// splitting appends.
pub type EdgeId = usize;

/// Identifier for an emitted [`crate::polygon::Polygon`].
///
/// An independent 0-based sequence, assigned in emission order and never
/// reused within the lifetime of a given system instance.
pub type PolygonId = usize;
