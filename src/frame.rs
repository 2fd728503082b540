//! The per-frame loop: clock, pause handling, and the bevy system that
//! drives it once per display refresh.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::beaker::{Beaker, Census};
use crate::chemistry::Reactions;
use crate::params::ReactionParams;
use crate::render::{Canvas, EguiCanvas, Overlay, render};
use crate::state::{Counts, SimState};

/// Injectable random source shared by reset and the reaction pass.
#[derive(Resource)]
pub struct SimRng(pub StdRng);

impl Default for SimRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

/// Turns host timestamps into capped frame deltas.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    /// Seconds since the previous tick, at most `max_dt`. The first tick
    /// after a restart reports zero.
    pub fn tick(&mut self, now: f64, max_dt: f32) -> f32 {
        let dt = match self.last {
            Some(prev) => ((now - prev).max(0.0) as f32).min(max_dt),
            None => 0.0,
        };
        self.last = Some(now);
        dt
    }

    pub fn restart(&mut self) {
        self.last = None;
    }
}

#[derive(Resource, Debug, Default)]
pub struct Simulation {
    pub beaker: Beaker,
    pub clock: FrameClock,
    /// Latches so exhaustion is logged once per run.
    exhausted: bool,
}

impl Simulation {
    pub fn reset<R: Rng + ?Sized>(
        &mut self,
        counts: Counts,
        params: &ReactionParams,
        rng: &mut R,
    ) {
        self.beaker.reset(counts, params, rng);
        self.clock.restart();
        self.exhausted = false;
    }

    pub fn census(&self) -> Census {
        self.beaker.census()
    }

    /// One frame: advance unless paused, then always draw.
    pub fn frame<R, C>(
        &mut self,
        now: f64,
        controls: &SimState,
        params: &ReactionParams,
        rng: &mut R,
        canvas: &mut C,
    ) -> Reactions
    where
        R: Rng + ?Sized,
        C: Canvas + ?Sized,
    {
        let dt = self.clock.tick(now, params.max_frame_dt);
        let done = if controls.paused {
            Reactions::default()
        } else {
            self.beaker.step(dt, controls.temperature, params);
            let done = self.beaker.react_collisions(controls.temperature, params, rng);
            self.beaker.advance_byproducts(dt, params, rng);
            self.log_progress(done);
            done
        };

        render(
            &self.beaker,
            Overlay {
                show_labels: controls.show_labels,
                paused: controls.paused,
            },
            params,
            canvas,
        );

        done
    }

    fn log_progress(&mut self, done: Reactions) {
        if done.dissolved > 0 {
            debug!(
                "{} zinc atom(s) dissolved, {} left in the heap",
                done.dissolved,
                self.beaker.zinc.len()
            );
        }

        if !self.exhausted && (self.beaker.h_plus.is_empty() || self.beaker.zinc.is_empty()) {
            let census = self.census();
            info!(
                "Reaction finished: {} H+ and {} Zn left, {} Zn2+ formed",
                census.h_plus, census.zinc, census.zinc_ions
            );
            self.exhausted = true;
        }
    }
}

// --- Systems ---

pub fn frame_system(
    mut contexts: EguiContexts,
    mut sim: ResMut<Simulation>,
    mut rng: ResMut<SimRng>,
    state: Res<SimState>,
    params: Res<ReactionParams>,
    time: Res<Time>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(egui::Color32::from_rgb(236, 240, 245)))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::hover());
                let mut canvas = EguiCanvas::fit(&painter, response.rect, params.canvas_size);
                sim.frame(
                    time.elapsed_secs_f64(),
                    &state,
                    &params,
                    &mut rng.0,
                    &mut canvas,
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::RecordingCanvas;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    fn running_sim(params: &ReactionParams, rng: &mut StdRng) -> Simulation {
        let mut sim = Simulation::default();
        sim.reset(
            Counts {
                zinc: 60,
                h_plus: 60,
                cl_minus: 30,
            },
            params,
            rng,
        );
        sim
    }

    fn snapshot(sim: &Simulation) -> Vec<Vec2> {
        let b = &sim.beaker;
        b.h_plus
            .iter()
            .chain(&b.cl_minus)
            .chain(&b.zinc_ions)
            .map(|i| i.position)
            .chain(b.bubbles.iter().map(|b| b.position))
            .collect()
    }

    #[test]
    fn clock_caps_large_gaps() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(10.0, 0.033), 0.0);
        assert!((clock.tick(10.016, 0.033) - 0.016).abs() < 1e-6);
        assert_eq!(clock.tick(12.0, 0.033), 0.033);
        // Timestamps going backwards never yield a negative step.
        assert_eq!(clock.tick(11.0, 0.033), 0.0);

        clock.restart();
        assert_eq!(clock.tick(50.0, 0.033), 0.0);
    }

    #[test]
    fn paused_frames_freeze_everything() {
        let params = ReactionParams::default();
        let mut rng = seeded();
        let mut sim = running_sim(&params, &mut rng);
        let mut canvas = RecordingCanvas::default();
        let mut controls = SimState {
            temperature: 5.0,
            reset_requested: false,
            ..default()
        };

        // Let something happen first so there are byproducts to freeze.
        let mut now = 0.0;
        for _ in 0..600 {
            now += 0.016;
            sim.frame(now, &controls, &params, &mut rng, &mut canvas);
        }

        controls.toggle_pause();
        let frozen = snapshot(&sim);
        let census = sim.census();
        for _ in 0..120 {
            now += 0.016;
            let done = sim.frame(now, &controls, &params, &mut rng, &mut canvas);
            assert_eq!(done, Reactions::default());
            assert_eq!(snapshot(&sim), frozen);
            assert_eq!(sim.census(), census);
        }

        controls.toggle_pause();
        now += 0.016;
        sim.frame(now, &controls, &params, &mut rng, &mut canvas);
        if !sim.beaker.h_plus.is_empty() || !sim.beaker.cl_minus.is_empty() {
            assert_ne!(snapshot(&sim), frozen);
        }
    }

    #[test]
    fn every_frame_renders_even_when_paused() {
        let params = ReactionParams::default();
        let mut rng = seeded();
        let mut sim = running_sim(&params, &mut rng);
        let controls = SimState {
            paused: true,
            ..default()
        };

        let mut canvas = RecordingCanvas::default();
        sim.frame(0.0, &controls, &params, &mut rng, &mut canvas);
        assert_eq!(canvas.clears(), 1);
        assert!(canvas.texts().iter().any(|t| t == "PAUSE"));
    }

    #[test]
    fn first_frame_after_reset_does_not_move_ions() {
        let params = ReactionParams::default();
        let mut rng = seeded();
        let mut sim = running_sim(&params, &mut rng);
        let controls = SimState::default();
        let before: Vec<Vec2> = sim.beaker.h_plus.iter().map(|i| i.position).collect();

        let mut canvas = RecordingCanvas::default();
        sim.frame(1000.0, &controls, &params, &mut rng, &mut canvas);

        let after: Vec<Vec2> = sim
            .beaker
            .h_plus
            .iter()
            .map(|i| i.position)
            .take(before.len())
            .collect();
        // Some H+ may have reacted, but nobody moved on a zero-length frame.
        assert!(after.iter().all(|p| before.contains(p)));
    }

    #[test]
    fn a_small_heap_still_reacts() {
        let params = ReactionParams::default();
        let mut rng = seeded();
        let mut sim = Simulation::default();
        sim.reset(
            Counts {
                zinc: 5,
                h_plus: 40,
                cl_minus: 0,
            },
            &params,
            &mut rng,
        );
        let controls = SimState {
            temperature: 5.0,
            ..default()
        };
        let mut canvas = RecordingCanvas::default();

        let mut effective = 0;
        let mut now = 0.0;
        for _ in 0..20_000 {
            now += 0.033;
            effective += sim
                .frame(now, &controls, &params, &mut rng, &mut canvas)
                .effective;
        }

        assert!(effective > 0);
        assert!(sim.census().h_plus < 40);
    }

    #[test]
    fn a_long_run_consumes_the_acid() {
        let params = ReactionParams::default();
        let mut rng = seeded();
        let mut sim = Simulation::default();
        sim.reset(
            Counts {
                zinc: 60,
                h_plus: 20,
                cl_minus: 20,
            },
            &params,
            &mut rng,
        );
        let controls = SimState {
            temperature: 5.0,
            ..default()
        };
        let mut canvas = RecordingCanvas::default();

        let mut dissolved = 0;
        let mut now = 0.0;
        for _ in 0..20_000 {
            now += 0.033;
            dissolved += sim
                .frame(now, &controls, &params, &mut rng, &mut canvas)
                .dissolved;
        }

        let census = sim.census();
        assert!(census.h_plus < 20);
        assert_eq!(census.zinc_ions, dissolved);
        assert_eq!(census.zinc + dissolved, 60);
        assert_eq!(census.cl_minus, 20);
    }
}
