//! The substrate growth orchestrator.
//!
//! [`SubstrateSystem`] owns every edge pair, every emitted polygon and the
//! ownership grid, and advances them together. Each inner tick:
//!
//! 1. Every live front integrates its particle and either claims the grid
//!    cell under its tip or collides with the cell's current owner.
//! 2. A collision kills the moving front and splits the owning edge,
//!    rewiring the half-edge `next`/`twin` links and re-staking grid
//!    ownership along the old trail.
//! 3. Fronts stochastically spawn children, reconciled through the same
//!    split routine in spawn mode — this is how the mesh boundary grows as
//!    fronts advance, not just when they collide.
//! 4. Collisions that close a `next`-loop emit a [`Polygon`] through the
//!    polygon-added hook.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;

use glam::Vec2;
use log::{debug, trace};
use rand::Rng;

use crate::config::{Config, ConfigError};
use crate::edge::{Edge, HalfId};
use crate::grid::OwnershipGrid;
use crate::particle::Particle;
use crate::polygon::Polygon;
use crate::types::{EdgeId, PolygonId};

/// Hard cap on the polygon boundary walk; longer walks are abandoned
/// without emitting rather than treated as errors.
const POLYGON_WALK_MAX_HOPS: usize = 100;
/// Direction changes below this many radians merge consecutive collinear
/// halves into one straight polygon side.
const POLYGON_ANGLE_EPSILON: f32 = 0.1;
/// Consecutive empty relabel passes before the grid sweep stops; hysteresis
/// against discretization gaps in the claimed trail.
const SWEEP_SECURITY_MARGIN: u32 = 3;
/// Perpendicular sample spacing of the relabel sweep, in cells. Nine
/// samples at this spacing span roughly ±1.3 units around the path.
const SWEEP_OFFSET_STEP: f32 = 0.33;

/// The discrete-space growth simulation: a planar subdivision built from
/// independently moving growth fronts competing for grid territory.
///
/// All edges and polygons are exclusively owned by the system; external
/// callers observe them only through shared references and ids. Memory
/// grows monotonically with simulation ticks — roughly
/// `spawn_probability_ratio × live-front count × ticks` edge pairs — so
/// long-running hosts should bound runs via edge `life` and the spawn
/// ratio.
pub struct SubstrateSystem {
    edges: Vec<Edge>,
    polygons: Vec<Polygon>,
    grid: OwnershipGrid,
    cfg: Config,
    polygon_added: Option<Box<dyn FnMut(&Polygon)>>,
}

impl fmt::Debug for SubstrateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstrateSystem")
            .field("edges", &self.edges.len())
            .field("polygons", &self.polygons.len())
            .field("grid", &self.grid)
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

impl SubstrateSystem {
    /// Creates an empty system over a `width × height` cell grid.
    ///
    /// ### Parameters
    /// - `width`, `height` - Grid dimensions in cells; must be positive.
    /// - `cfg` - Simulation parameters, validated up front.
    ///
    /// ### Returns
    /// The system, or a [`ConfigError`] describing the first rejected
    /// parameter.
    pub fn new(width: usize, height: usize, cfg: Config) -> Result<Self, ConfigError> {
        cfg.validate(width, height)?;
        Ok(Self {
            edges: Vec::new(),
            polygons: Vec::new(),
            grid: OwnershipGrid::new(width, height),
            cfg,
            polygon_added: None,
        })
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// All edge pairs in creation order; index + 1 is the edge's id.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All emitted polygons in emission order.
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Read-only view of the ownership grid. All mutation goes through the
    /// system's own update machinery.
    pub fn grid(&self) -> &OwnershipGrid {
        &self.grid
    }

    /// Returns the edge with the given 1-based id, `None` for id `0` or
    /// out of range.
    pub fn get_edge_by_id(&self, id: EdgeId) -> Option<&Edge> {
        if id == 0 { None } else { self.edges.get(id - 1) }
    }

    /// Continuation link of the given half along its boundary, or `None`
    /// when the handle does not name an edge in this system.
    pub fn next_of(&self, half: HalfId) -> Option<HalfId> {
        self.edges.get(half.edge() - 1).map(|e| e.next_of(half))
    }

    /// Infallible continuation lookup for handles the system built itself.
    fn next_link(&self, half: HalfId) -> HalfId {
        self.edges[half.edge() - 1].next_of(half)
    }

    /// Registers the polygon-added hook, the single extension point
    /// consumed by hosts. Replaces any previously registered callback.
    pub fn on_polygon_added(&mut self, callback: impl FnMut(&Polygon) + 'static) {
        self.polygon_added = Some(Box::new(callback));
    }

    /// Discards all edges and polygons and resets the grid to unclaimed.
    /// Configuration and the registered hook are kept.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.edges.clear();
        self.polygons.clear();
    }

    /// Inserts one new growth front at `(x, y)` heading `velocity_angle`
    /// (unit speed), optionally bounded to `life` ticks, and returns its id.
    ///
    /// The new pair starts as an open boundary: each half's `next` is its
    /// own twin.
    pub fn spawn_edge(&mut self, x: f32, y: f32, velocity_angle: f32, life: Option<u32>) -> EdgeId {
        let boid = Particle::new(Vec2::new(x, y), Vec2::from_angle(velocity_angle), life);
        self.push_edge(Vec2::new(x, y), boid)
    }

    fn push_edge(&mut self, a: Vec2, boid: Particle) -> EdgeId {
        let id = self.edges.len() + 1;
        self.edges.push(Edge::new(id, a, boid));
        id
    }

    /// Inserts a completed polygon and fires the polygon-added hook.
    ///
    /// Normally called by the closure walk, but hosts may inject polygons
    /// directly. Ids continue the emission sequence (first polygon is 0).
    pub fn add_polygon(&mut self, vertices: Vec<Vec2>) -> PolygonId {
        let id = self.polygons.last().map_or(0, |p| p.id + 1);
        let polygon = Polygon { id, vertices };
        debug!("polygon {id} closed with {} vertices", polygon.vertices.len());
        if let Some(callback) = &mut self.polygon_added {
            callback(&polygon);
        }
        self.polygons.push(polygon);
        id
    }

    /// Advances the simulation by `cfg.speed` inner ticks.
    ///
    /// Each tick iterates the edge arena by index, so pairs appended
    /// mid-tick (spawn children and split continuations) are visited within
    /// the same tick and begin growing immediately.
    ///
    /// ### Parameters
    /// - `rng` - Randomness source for spawn decisions and angle jitter;
    ///   inject a seeded generator for reproducible runs.
    pub fn update(&mut self, rng: &mut impl Rng) {
        for _ in 0..self.cfg.speed {
            let mut i = 0;
            while i < self.edges.len() {
                self.step_edge(i + 1, rng);
                i += 1;
            }
        }
    }

    /// One tick of one front: advance, claim or collide, then maybe spawn.
    fn step_edge(&mut self, id: EdgeId, rng: &mut impl Rng) {
        if self.edges[id - 1].boid.is_dead {
            return;
        }

        self.edges[id - 1].boid.update();
        let tip = self.edges[id - 1].boid.position;
        self.edges[id - 1].b = tip;

        // Fronts leaving the bounds die before any grid write; boundary
        // cells are never claimed.
        if tip.x <= 0.0
            || tip.x >= self.grid.width() as f32
            || tip.y <= 0.0
            || tip.y >= self.grid.height() as f32
        {
            self.edges[id - 1].boid.kill();
            return;
        }

        let owner = self.grid.owner_at(tip.x, tip.y);
        if owner != 0 && owner != id {
            self.edges[id - 1].boid.kill();
            self.split_edge_with_edge(owner, id);
        } else {
            self.grid.claim(tip.x, tip.y, id);
        }

        // Stochastic child spawn, reconciled in spawn mode. Runs whether or
        // not this front just collided.
        if rng.random::<f32>() < self.cfg.spawn_probability_ratio {
            let (parent_angle, tip, life) = {
                let parent = &self.edges[id - 1];
                (parent.angle(), parent.boid.position, parent.boid.life)
            };
            let velocity_angle = match self.cfg.spawn_options.velocity_angle {
                Some(delta) => parent_angle + delta,
                None => jitter_angle(parent_angle, rng),
            };
            let child = self.spawn_edge(tip.x, tip.y, velocity_angle, life);
            self.split_edge_with_edge(id, child);
        }
    }

    /// Splits `splitted_id` at `edge_id`'s endpoint and rewires the mesh.
    ///
    /// Two logical modes share this routine, selected by whether `edge_id`'s
    /// particle is already dead on entry:
    ///
    /// - **collision**: `edge_id` just ran into a cell owned by
    ///   `splitted_id`; the attachment side is mirrored and polygon closure
    ///   is checked on both halves of the collider.
    /// - **spawn**: `edge_id` is a freshly spawned, still-live child of
    ///   `splitted_id`; the parent's growth is handed to a new continuation
    ///   pair.
    ///
    /// Note the mode is read solely from the dead flag: a particle whose
    /// life expires on the very tick it is passed here in spawn mode is
    /// indistinguishable from a collision. Kept as-is for behavioral
    /// fidelity.
    ///
    /// A degenerate (zero or non-finite) splitted velocity makes the sweep
    /// and side choice meaningless; the routine then returns without
    /// mutating anything and the simulation moves on.
    fn split_edge_with_edge(&mut self, splitted_id: EdgeId, edge_id: EdgeId) {
        let splitted_boid = self.edges[splitted_id - 1].boid;
        if !splitted_boid.velocity.is_finite() || splitted_boid.velocity == Vec2::ZERO {
            return;
        }

        let angle = self.edges[splitted_id - 1].angle_to(&self.edges[edge_id - 1]);
        let mut is_main_edge = angle > 0.0;

        let edge_b = self.edges[edge_id - 1].b;
        let collided = self.edges[edge_id - 1].boid.is_dead;

        // Where the splitted front would have been one step later: the
        // continuation starts there and the relabel sweep walks from there.
        let mut sweep = Particle::new(edge_b, splitted_boid.velocity, None);
        sweep.update();

        // The continuation pair starts at the sweep position and inherits
        // the splitted front's full kinematic state.
        let new_id = self.push_edge(sweep.position, sweep);
        {
            let new_edge = &mut self.edges[new_id - 1];
            new_edge.boid.copy_from(&splitted_boid);
            new_edge.b = new_edge.boid.position;
        }
        if splitted_boid.is_dead {
            // Terminal split: the continuation never grows.
            self.edges[new_id - 1].boid.kill();
        } else {
            self.edges[splitted_id - 1].boid.kill();
        }

        // Shorten the splitted edge to the portion before the split point.
        // The dead boid's position follows so a later split copying this
        // boid observes the shortened endpoint.
        self.edges[splitted_id - 1].b = edge_b;
        self.edges[splitted_id - 1].boid.position = edge_b;

        if collided {
            is_main_edge = !is_main_edge;
        }

        let s_main = HalfId::main(splitted_id);
        let n_main = HalfId::main(new_id);
        let e_main = HalfId::main(edge_id);

        // The splitted edge already continued somewhere: hand that
        // continuation over to the new edge so the boundary walk stays
        // connected.
        let s_next = self.next_link(s_main);
        if s_next != s_main.twin() {
            self.set_next(n_main, s_next);
            let hand_off = self.next_link(s_next.twin()).twin();
            self.set_next(hand_off, n_main.twin());
        }

        if is_main_edge {
            self.set_next(n_main.twin(), s_main.twin());
            if collided {
                trace!("split: main collided, edge {edge_id} with {splitted_id}");
                self.set_next(e_main, n_main);
                self.set_next(s_main, e_main.twin());
            } else {
                trace!("split: main spawned, edge {edge_id} with {splitted_id}");
                self.set_next(e_main.twin(), n_main);
                self.set_next(s_main, e_main);
            }
        } else {
            self.set_next(s_main, n_main);
            if collided {
                trace!("split: twin collided, edge {edge_id} with {splitted_id}");
                self.set_next(e_main, s_main.twin());
                self.set_next(n_main.twin(), e_main.twin());
            } else {
                trace!("split: twin spawned, edge {edge_id} with {splitted_id}");
                self.set_next(n_main.twin(), e_main);
                self.set_next(e_main.twin(), s_main.twin());
            }
        }

        self.sweep_relabel(sweep, splitted_id, new_id);

        if collided {
            self.polygon_check(e_main);
            self.polygon_check(e_main.twin());
        }
    }

    /// Re-walks the sweep trajectory and relabels cells still owned by the
    /// splitted edge to its continuation, sampling a perpendicular band of
    /// nine offsets around the path. Stops after [`SWEEP_SECURITY_MARGIN`]
    /// consecutive passes without a relabel.
    fn sweep_relabel(&mut self, mut sweep: Particle, from: EdgeId, to: EdgeId) {
        let mut margin = 0;
        while margin < SWEEP_SECURITY_MARGIN {
            for i in -4..=4 {
                let offset = i as f32 * SWEEP_OFFSET_STEP;
                let x = sweep.position.x + sweep.velocity.y * offset;
                let y = sweep.position.y - sweep.velocity.x * offset;
                if self.grid.relabel(x, y, from, to) {
                    margin = 0;
                }
            }
            sweep.update();
            margin += 1;
        }
    }

    /// Walks `next` links from `start`, accumulating a vertex at every
    /// direction change greater than [`POLYGON_ANGLE_EPSILON`] (collinear
    /// halves merge into one straight side). Emits a polygon when the
    /// walk's `next` comes back around to `start` within
    /// [`POLYGON_WALK_MAX_HOPS`] hops; open boundaries (`next == twin`) and
    /// overlong walks are abandoned without emitting.
    fn polygon_check(&mut self, start: HalfId) {
        let mut half = start;
        let mut vertices = vec![self.half_origin(half)];
        for _ in 0..POLYGON_WALK_MAX_HOPS {
            let next = self.next_link(half);
            if next == half.twin() {
                break;
            }
            if (self.half_angle(half) - self.half_angle(next)).abs() > POLYGON_ANGLE_EPSILON {
                vertices.push(self.half_dest(half));
            }
            half = next;
            if self.next_link(half) == start {
                self.add_polygon(vertices);
                return;
            }
        }
    }

    fn set_next(&mut self, half: HalfId, to: HalfId) {
        self.edges[half.edge() - 1].set_next(half, to);
    }

    fn half_origin(&self, half: HalfId) -> Vec2 {
        let e = &self.edges[half.edge() - 1];
        if half.is_twin() { e.b } else { e.a }
    }

    fn half_dest(&self, half: HalfId) -> Vec2 {
        let e = &self.edges[half.edge() - 1];
        if half.is_twin() { e.a } else { e.b }
    }

    /// Direction of a half: the boid's travel angle for the main side, its
    /// opposite (normalized into `(-π, π]`) for the twin.
    fn half_angle(&self, half: HalfId) -> f32 {
        let a = self.edges[half.edge() - 1].angle();
        if half.is_twin() {
            if a > 0.0 { a - PI } else { a + PI }
        } else {
            a
        }
    }
}

/// The original substrate spawn-angle jitter: a power-biased deviation
/// strongly preferring zero, plus a coin-flipped quarter turn, so children
/// shoot off roughly perpendicular to their parent.
fn jitter_angle(parent_angle: f32, rng: &mut impl Rng) -> f32 {
    let deviation = rng.random::<f32>().powi(100) * coin(rng);
    let turn = FRAC_PI_2 * coin(rng);
    deviation + parent_angle + turn
}

fn coin(rng: &mut impl Rng) -> f32 {
    if rng.random::<bool>() { 1.0 } else { -1.0 }
}
