use bevy::prelude::*;

/// Live control values. Temperature is read fresh every frame; changing a
/// count requests a full reset.
#[derive(Resource, Debug, Clone)]
pub struct SimState {
    pub temperature: f32,
    pub zinc_count: usize,
    pub h_plus_count: usize,
    pub cl_minus_count: usize,
    pub paused: bool,
    pub show_labels: bool,
    pub reset_requested: bool,
}

impl Default for SimState {
    fn default() -> Self {
        Self {
            temperature: 2.0,
            zinc_count: 60,
            h_plus_count: 30,
            cl_minus_count: 30,
            paused: false,
            show_labels: true,
            reset_requested: true,
        }
    }
}

/// Initial population handed to a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub zinc: usize,
    pub h_plus: usize,
    pub cl_minus: usize,
}

impl SimState {
    pub fn counts(&self) -> Counts {
        Counts {
            zinc: self.zinc_count,
            h_plus: self.h_plus_count,
            cl_minus: self.cl_minus_count,
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_labels(&mut self) {
        self.show_labels = !self.show_labels;
    }

    /// The reset button also resumes playback; count sliders leave the
    /// pause flag alone.
    pub fn request_reset(&mut self, resume: bool) {
        if resume {
            self.paused = false;
        }
        self.reset_requested = true;
    }
}

/// Reads a typed-in quantity. Anything that is not a finite number counts
/// as zero, and negatives are floored to zero.
pub fn parse_quantity(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v.max(0.0),
        _ => 0.0,
    }
}

pub fn sanitize_temperature(temperature: f32, min: f32, max: f32) -> f32 {
    if temperature.is_nan() {
        return min;
    }
    temperature.clamp(min, max)
}
