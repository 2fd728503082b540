use bevy::prelude::*;
use rand::Rng;

use crate::frame::{SimRng, Simulation};
use crate::params::ReactionParams;
use crate::state::{Counts, SimState};

// --- Particles ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    HPlus,
    ClMinus,
    ZincIon,
}

impl Species {
    pub fn label(self) -> &'static str {
        match self {
            Species::HPlus => "H⁺",
            Species::ClMinus => "Cl⁻",
            Species::ZincIon => "Zn²⁺",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ion {
    pub species: Species,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Ion {
    pub fn new(species: Species, position: Vec2, velocity: Vec2) -> Self {
        Self {
            species,
            position,
            velocity,
        }
    }

    /// Integrates by `dt` and bounces off the edges of `bounds`: the
    /// offending velocity component is negated and the position clamped.
    pub fn advance(&mut self, dt: f32, bounds: Rect) {
        self.position += self.velocity * dt;

        if self.position.x < bounds.min.x {
            self.position.x = bounds.min.x;
            self.velocity.x = -self.velocity.x;
        }
        if self.position.x > bounds.max.x {
            self.position.x = bounds.max.x;
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < bounds.min.y {
            self.position.y = bounds.min.y;
            self.velocity.y = -self.velocity.y;
        }
        if self.position.y > bounds.max.y {
            self.position.y = bounds.max.y;
            self.velocity.y = -self.velocity.y;
        }
    }
}

/// One atom of the solid heap. `hits` counts effective H⁺ collisions.
#[derive(Debug, Clone, Copy)]
pub struct ZincAtom {
    pub position: Vec2,
    pub hits: u32,
}

/// H₂ rising out of the solution.
#[derive(Debug, Clone, Copy)]
pub struct Bubble {
    pub position: Vec2,
    pub rise: f32,
    pub drift: f32,
}

/// Number of live particles per species, as shown in the status overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Census {
    pub h_plus: usize,
    pub cl_minus: usize,
    pub zinc: usize,
    pub zinc_ions: usize,
    pub bubbles: usize,
}

// --- Beaker ---

#[derive(Debug, Clone, Default)]
pub struct Beaker {
    pub size: Vec2,
    pub h_plus: Vec<Ion>,
    pub cl_minus: Vec<Ion>,
    pub zinc: Vec<ZincAtom>,
    pub zinc_ions: Vec<Ion>,
    pub bubbles: Vec<Bubble>,
}

impl Beaker {
    /// Rebuilds every collection from `counts`: the zinc heap at the
    /// bottom, acid ions scattered above it, no products.
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        counts: Counts,
        params: &ReactionParams,
        rng: &mut R,
    ) {
        self.size = params.canvas_size;
        self.zinc = zinc_heap(counts.zinc, params);
        self.h_plus = (0..counts.h_plus)
            .map(|_| random_ion(Species::HPlus, params, rng))
            .collect();
        self.cl_minus = (0..counts.cl_minus)
            .map(|_| random_ion(Species::ClMinus, params, rng))
            .collect();
        self.zinc_ions.clear();
        self.bubbles.clear();
    }

    pub fn census(&self) -> Census {
        Census {
            h_plus: self.h_plus.len(),
            cl_minus: self.cl_minus.len(),
            zinc: self.zinc.len(),
            zinc_ions: self.zinc_ions.len(),
            bubbles: self.bubbles.len(),
        }
    }
}

/// Staggered rows of `params.heap_columns` atoms, one diameter apart,
/// centred horizontally and stacked upward from the base line.
pub fn zinc_heap(count: usize, params: &ReactionParams) -> Vec<ZincAtom> {
    let r = params.radius;
    let diameter = 2.0 * r;
    let columns = params.heap_columns.max(1);
    let heap_width = columns as f32 * diameter + r;
    let start_x = ((params.canvas_size.x - heap_width) / 2.0).max(0.0) + r;
    let base_y = params.heap_base_y();

    (0..count)
        .map(|i| {
            let row = i / columns;
            let col = i % columns;
            let stagger = if row % 2 == 1 { r } else { 0.0 };
            ZincAtom {
                position: Vec2::new(
                    start_x + col as f32 * diameter + stagger,
                    (base_y - row as f32 * diameter).max(r),
                ),
                hits: 0,
            }
        })
        .collect()
}

const SPAWN_ATTEMPTS: usize = 16;

fn random_ion<R: Rng + ?Sized>(
    species: Species,
    params: &ReactionParams,
    rng: &mut R,
) -> Ion {
    let field = params.playfield();
    let max_y = (params.canvas_size.y - params.spawn_bottom_reserve)
        .clamp(field.min.y, field.max.y);

    let mut position = Vec2::ZERO;
    for _ in 0..SPAWN_ATTEMPTS {
        position = Vec2::new(
            sample(rng, field.min.x, field.max.x),
            sample(rng, field.min.y, max_y),
        );
        if !params.hud.contains(position) {
            break;
        }
    }
    // Unlucky draws land just right of the overlay.
    if params.hud.contains(position) {
        position.x = (params.hud.max.x + params.radius).min(field.max.x);
    }

    let speed = params.ion_speed;
    let velocity = Vec2::new(sample(rng, -speed, speed), sample(rng, -speed, speed));
    Ion::new(species, position, velocity)
}

/// Uniform draw in `[lo, hi]` that tolerates an empty range.
pub(crate) fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo { lo } else { rng.gen_range(lo..=hi) }
}

// --- Systems ---

pub fn reset_system(
    mut state: ResMut<SimState>,
    mut sim: ResMut<Simulation>,
    mut rng: ResMut<SimRng>,
    params: Res<ReactionParams>,
) {
    if !state.reset_requested {
        return;
    }

    let counts = state.counts();
    sim.reset(counts, &params, &mut rng.0);

    info!(
        "Reset beaker: {} Zn, {} H+, {} Cl-",
        counts.zinc, counts.h_plus, counts.cl_minus
    );

    state.reset_requested = false;
}
