use glam::Vec2;

/// A growth-tip particle ("boid"): a point with a velocity, an optional
/// remaining lifetime in ticks, and a dead flag.
///
/// Once dead a particle never revives; it stays in place and is kept around
/// for topology bookkeeping by the edge that owns it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining ticks, `None` for unbounded.
    pub life: Option<u32>,
    pub is_dead: bool,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, life: Option<u32>) -> Self {
        Self {
            position,
            velocity,
            life,
            is_dead: false,
        }
    }

    /// Advances one tick: integrates the velocity and burns one unit of
    /// life, dying when it runs out. No-op on dead particles.
    pub fn update(&mut self) {
        if self.is_dead {
            return;
        }
        self.position += self.velocity;
        if let Some(life) = &mut self.life {
            *life = life.saturating_sub(1);
            if *life == 0 {
                self.is_dead = true;
            }
        }
    }

    /// Marks the particle dead. Idempotent.
    pub fn kill(&mut self) {
        self.is_dead = true;
    }

    /// Overwrites the full state (position, velocity, life, dead flag)
    /// from `other`.
    pub fn copy_from(&mut self, other: &Self) {
        *self = *other;
    }
}
