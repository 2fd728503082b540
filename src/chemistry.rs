use bevy::prelude::*;
use rand::Rng;

use crate::beaker::{Beaker, Bubble, Ion, Species, sample};
use crate::params::ReactionParams;
use crate::state::sanitize_temperature;

/// Velocity scale for a given temperature. Grows with T², so T = 2 moves
/// ions at their base speed and T = 5 at 6.25x.
pub fn speed_multiplier(temperature: f32, params: &ReactionParams) -> f32 {
    let t = sanitize_temperature(temperature, params.min_temperature, params.max_temperature);
    params.speed_coefficient * t * t
}

/// Chance that an H⁺ touching the zinc actually reacts.
pub fn reaction_probability(temperature: f32, params: &ReactionParams) -> f32 {
    let t = sanitize_temperature(temperature, params.min_temperature, params.max_temperature);
    let scale = params.probability_offset + params.probability_slope * t;
    (params.base_probability * scale).min(params.probability_cap)
}

/// What one reaction pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reactions {
    /// H⁺ ions consumed by an effective collision.
    pub effective: usize,
    /// Zinc atoms that reached the hit threshold and left the heap.
    pub dissolved: usize,
}

impl Beaker {
    /// Moves H⁺ and Cl⁻ by their velocities, scaled by temperature, and
    /// bounces them inside the playfield.
    pub fn step(&mut self, dt: f32, temperature: f32, params: &ReactionParams) {
        let speed = speed_multiplier(temperature, params);
        let field = params.playfield();

        for ion in &mut self.h_plus {
            ion.advance(dt * speed, field);
        }
        for ion in &mut self.cl_minus {
            ion.advance(dt * speed * params.cl_speed_ratio, field);
        }
    }

    /// Each H⁺ tests the first zinc atom within reach, once. On success the
    /// ion is consumed and the atom takes a hit; an atom with enough hits
    /// becomes one Zn²⁺ plus one H₂ bubble.
    pub fn react_collisions<R: Rng + ?Sized>(
        &mut self,
        temperature: f32,
        params: &ReactionParams,
        rng: &mut R,
    ) -> Reactions {
        let p = reaction_probability(temperature, params);
        let reach_sq = params.interaction_radius().powi(2);
        let mut out = Reactions::default();

        let mut i = self.h_plus.len();
        while i > 0 {
            i -= 1;
            let h = self.h_plus[i].position;

            let Some(j) = self
                .zinc
                .iter()
                .position(|z| z.position.distance_squared(h) <= reach_sq)
            else {
                continue;
            };

            if rng.gen_range(0.0f32..1.0) >= p {
                continue;
            }

            self.h_plus.remove(i);
            out.effective += 1;
            self.zinc[j].hits += 1;

            if self.zinc[j].hits >= params.hits_to_dissolve {
                let atom = self.zinc.remove(j);
                out.dissolved += 1;

                let half = params.zinc_ion_max_speed / 2.0;
                let velocity = Vec2::new(sample(rng, -half, half), sample(rng, -half, half));
                self.zinc_ions.push(Ion::new(
                    Species::ZincIon,
                    atom.position + Vec2::new(2.0, -2.0),
                    velocity,
                ));

                self.bubbles.push(Bubble {
                    position: atom.position + Vec2::new(sample(rng, -5.0, 5.0), -20.0),
                    rise: sample(rng, params.bubble_rise.0, params.bubble_rise.1),
                    drift: sample(rng, -params.bubble_drift, params.bubble_drift),
                });
            }
        }

        out
    }

    /// Lifts bubbles, drops the ones that cleared the top, and lets Zn²⁺
    /// random-walk through the solution.
    pub fn advance_byproducts<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        params: &ReactionParams,
        rng: &mut R,
    ) {
        let r = params.radius;
        let max_x = (self.size.x - r).max(r);

        for bubble in &mut self.bubbles {
            bubble.position.y -= bubble.rise * dt;
            bubble.position.x = (bubble.position.x + bubble.drift * dt).clamp(r, max_x);
        }
        self.bubbles.retain(|b| b.position.y >= params.bubble_exit_y);

        let solution = params.solution();
        for ion in &mut self.zinc_ions {
            let kick = Vec2::new(sample(rng, -1.0, 1.0), sample(rng, -1.0, 1.0));
            ion.velocity = (ion.velocity + kick * params.zinc_ion_jitter * dt)
                .clamp_length_max(params.zinc_ion_max_speed);
            ion.advance(dt, solution);
        }
    }
}
