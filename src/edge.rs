use crate::particle::Particle;
use crate::types::EdgeId;
use glam::Vec2;

/// Handle to one directed half of an edge pair.
///
/// Encoded as `(edge_id - 1) * 2 + side`: side 0 (the main half) runs
/// `a -> b`, side 1 (the twin) runs `b -> a`. Twin lookup flips the low bit,
/// so `h.twin().twin() == h` holds structurally for every handle and the
/// half-edge invariant cannot be broken by rewiring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HalfId(usize);

impl HalfId {
    /// The main half of edge `edge`.
    pub fn main(edge: EdgeId) -> Self {
        debug_assert!(edge >= 1, "edge ids are 1-based");
        Self((edge - 1) * 2)
    }

    /// The opposite-direction half sharing the same segment.
    pub fn twin(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Id of the edge pair this half belongs to.
    pub fn edge(self) -> EdgeId {
        self.0 / 2 + 1
    }

    pub fn is_twin(self) -> bool {
        self.0 & 1 == 1
    }
}

/// One edge pair in the system's arena: a directed segment `a -> b` grown by
/// `boid`, plus the implicit twin running the other way.
///
/// `b` follows `boid.position` while the edge is growing and is frozen at
/// the split point when the edge is shortened. `next` holds the boundary
/// continuation per side (`[main, twin]`); a half whose `next` is its own
/// twin sits on an open, unclosed boundary. Cross-references are plain
/// [`HalfId`] indices into the owning system, never owned handles.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub a: Vec2,
    pub b: Vec2,
    pub boid: Particle,
    pub(crate) next: [HalfId; 2],
}

impl Edge {
    pub(crate) fn new(id: EdgeId, a: Vec2, boid: Particle) -> Self {
        let main = HalfId::main(id);
        Self {
            a,
            b: boid.position,
            boid,
            // Both halves start pointing at each other: an open boundary.
            next: [main.twin(), main],
        }
    }

    /// Direction of travel, taken from the tip particle's velocity.
    pub fn angle(&self) -> f32 {
        self.boid.velocity.to_angle()
    }

    /// Signed angle from this edge's direction of travel to `other`'s.
    pub fn angle_to(&self, other: &Self) -> f32 {
        self.boid.velocity.angle_to(other.boid.velocity)
    }

    pub(crate) fn next_of(&self, half: HalfId) -> HalfId {
        self.next[half.is_twin() as usize]
    }

    pub(crate) fn set_next(&mut self, half: HalfId, to: HalfId) {
        self.next[half.is_twin() as usize] = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn half_id_encodes_edge_and_side() {
        let m = HalfId::main(3);
        assert_eq!(m.edge(), 3);
        assert!(!m.is_twin());

        let t = m.twin();
        assert_eq!(t.edge(), 3);
        assert!(t.is_twin());
    }

    #[test]
    fn twin_is_an_involution() {
        for id in 1..10 {
            let m = HalfId::main(id);
            assert_eq!(m.twin().twin(), m);
            assert_eq!(m.twin().twin().twin(), m.twin());
        }
    }

    #[test]
    fn new_edge_is_an_open_boundary() {
        let boid = Particle::new(Vec2::new(2.0, 3.0), Vec2::new(1.0, 0.0), None);
        let e = Edge::new(5, Vec2::new(2.0, 3.0), boid);
        let main = HalfId::main(5);
        assert_eq!(e.next_of(main), main.twin());
        assert_eq!(e.next_of(main.twin()), main);
        assert_eq!(e.a, e.b);
    }

    #[test]
    fn angle_follows_the_tip_velocity() {
        let boid = Particle::new(Vec2::ZERO, Vec2::new(0.0, 1.0), None);
        let e = Edge::new(1, Vec2::ZERO, boid);
        assert!((e.angle() - FRAC_PI_2).abs() < 1e-6);

        let other = Edge::new(2, Vec2::ZERO, Particle::new(Vec2::ZERO, Vec2::new(1.0, 0.0), None));
        // Signed angle from +y to +x is a negative quarter turn.
        assert!((e.angle_to(&other) + FRAC_PI_2).abs() < 1e-6);
    }
}
