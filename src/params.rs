//! Tunable constants for the beaker.

use bevy::prelude::*;

#[derive(Resource, Clone, Debug)]
pub struct ReactionParams {
    /// Logical canvas size; the painter scales it to the window.
    pub canvas_size: Vec2,
    /// Radius of every drawn sphere.
    pub radius: f32,
    /// Band at the bottom that mobile ions never enter.
    pub bottom_margin: f32,
    /// Band at the bottom that freshly spawned ions avoid.
    pub spawn_bottom_reserve: f32,
    /// Status overlay rectangle, kept free of spawned ions.
    pub hud: Rect,

    // Zinc heap layout
    pub heap_columns: usize,

    // Ion motion
    pub ion_speed: f32,
    pub cl_speed_ratio: f32,
    pub min_temperature: f32,
    pub max_temperature: f32,
    /// Speed multiplier is `speed_coefficient * T²`.
    pub speed_coefficient: f32,

    // Reaction: base * (offset + slope * T), capped
    pub base_probability: f32,
    pub probability_offset: f32,
    pub probability_slope: f32,
    pub probability_cap: f32,
    pub interaction_margin: f32,
    pub hits_to_dissolve: u32,

    // Byproducts
    pub bubble_rise: (f32, f32),
    pub bubble_drift: f32,
    pub bubble_exit_y: f32,
    pub zinc_ion_jitter: f32,
    pub zinc_ion_max_speed: f32,

    /// Frame time ceiling in seconds.
    pub max_frame_dt: f32,
}

impl Default for ReactionParams {
    fn default() -> Self {
        Self {
            canvas_size: Vec2::new(960.0, 600.0),
            radius: 18.0,
            bottom_margin: 120.0,
            spawn_bottom_reserve: 230.0,
            hud: Rect::new(18.0, 18.0, 208.0, 138.0),

            heap_columns: 10,

            ion_speed: 60.0, // px/s per axis at multiplier 1
            cl_speed_ratio: 0.9,
            min_temperature: 0.0,
            max_temperature: 5.0,
            speed_coefficient: 0.25, // T = 2 -> 1x

            base_probability: 0.75,
            probability_offset: 0.65,
            probability_slope: 0.20,
            probability_cap: 0.98,
            interaction_margin: 8.0,
            hits_to_dissolve: 2,

            bubble_rise: (25.0, 40.0),
            bubble_drift: 8.0,
            bubble_exit_y: -50.0,
            zinc_ion_jitter: 60.0,
            zinc_ion_max_speed: 35.0,

            max_frame_dt: 0.033,
        }
    }
}

impl ReactionParams {
    pub fn interaction_radius(&self) -> f32 {
        self.radius + self.interaction_margin
    }

    /// Bottom row of the zinc heap, one radius below the lowest point H⁺
    /// can reach, so that row always stays within interaction range.
    pub fn heap_base_y(&self) -> f32 {
        self.playfield().max.y + self.radius
    }

    /// Rectangle that H⁺ and Cl⁻ centres are confined to.
    pub fn playfield(&self) -> Rect {
        let max_y = (self.canvas_size.y - self.bottom_margin).max(self.radius);
        Rect::new(
            self.radius,
            self.radius,
            (self.canvas_size.x - self.radius).max(self.radius),
            max_y,
        )
    }

    /// Rectangle that dissolved Zn²⁺ ions wander in.
    pub fn solution(&self) -> Rect {
        Rect::new(
            self.radius,
            self.radius,
            (self.canvas_size.x - self.radius).max(self.radius),
            (self.canvas_size.y - self.radius).max(self.radius),
        )
    }
}
