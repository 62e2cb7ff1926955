use crate::types::PolygonId;
use glam::Vec2;

/// A closed region extracted from the half-edge mesh.
///
/// Vertices are ordered along the boundary walk; the last vertex connects
/// implicitly back to the first. Immutable once emitted.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub id: PolygonId,
    pub vertices: Vec<Vec2>,
}
