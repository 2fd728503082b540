use bevy::prelude::*;
use bevy_egui::egui::{self, Align2, Color32};

use crate::beaker::{Beaker, Species};
use crate::params::ReactionParams;

/// Immediate-mode 2D surface in logical canvas coordinates (origin top
/// left, y down).
pub trait Canvas {
    fn clear(&mut self, color: Color32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color32);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color32);
    fn fill_rect(
        &mut self,
        rect: Rect,
        rounding: f32,
        fill: Color32,
        outline: Option<(f32, Color32)>,
    );
    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Color32, anchor: Align2);
}

const BACKGROUND: Color32 = Color32::from_rgb(248, 250, 252);
const ZINC: Color32 = Color32::from_rgb(0x7f, 0x7f, 0x7f);
const H_PLUS: Color32 = Color32::WHITE;
const CL_MINUS: Color32 = Color32::from_rgb(0x1a, 0xa3, 0x4a);
const ZINC_ION: Color32 = Color32::from_rgb(0x1f, 0x6f, 0xeb);
const HYDROGEN: Color32 = Color32::from_rgb(0xf5, 0x9e, 0x0b);

#[derive(Debug, Clone, Copy)]
pub struct Overlay {
    pub show_labels: bool,
    pub paused: bool,
}

struct Style {
    fill: Color32,
    outline: Color32,
    ink: Color32,
}

fn species_style(species: Species) -> Style {
    match species {
        Species::HPlus => Style {
            fill: H_PLUS,
            outline: Color32::from_black_alpha(90),
            ink: Color32::from_gray(17),
        },
        Species::ClMinus => plain(CL_MINUS),
        Species::ZincIon => plain(ZINC_ION),
    }
}

fn plain(fill: Color32) -> Style {
    Style {
        fill,
        outline: Color32::from_black_alpha(30),
        ink: Color32::WHITE,
    }
}

/// Draws the whole beaker: solid, ions, bubbles, the count overlay, and the
/// pause veil. Reads state only.
pub fn render<C: Canvas + ?Sized>(
    beaker: &Beaker,
    overlay: Overlay,
    params: &ReactionParams,
    canvas: &mut C,
) {
    let r = params.radius;
    let label = |text: &'static str| overlay.show_labels.then_some(text);

    canvas.clear(BACKGROUND);

    for atom in &beaker.zinc {
        sphere(canvas, atom.position, r, &plain(ZINC), label("Zn"));
    }
    for ion in beaker.h_plus.iter().chain(&beaker.cl_minus).chain(&beaker.zinc_ions) {
        let style = species_style(ion.species);
        sphere(canvas, ion.position, r, &style, label(ion.species.label()));
    }
    for bubble in &beaker.bubbles {
        sphere(canvas, bubble.position, r, &plain(HYDROGEN), label("H₂"));
    }

    hud(beaker, params, canvas);

    if overlay.paused {
        let full = Rect::from_corners(Vec2::ZERO, beaker.size);
        canvas.fill_rect(full, 0.0, Color32::from_black_alpha(25), None);
        canvas.text(
            full.center(),
            "PAUSE",
            46.0,
            Color32::from_gray(17),
            Align2::CENTER_CENTER,
        );
    }
}

fn sphere<C: Canvas + ?Sized>(
    canvas: &mut C,
    center: Vec2,
    r: f32,
    style: &Style,
    label: Option<&str>,
) {
    canvas.fill_circle(center, r, style.fill);
    canvas.stroke_circle(center, r, 2.0, style.outline);
    // highlight
    canvas.fill_circle(
        center - Vec2::splat(r * 0.35),
        r * 0.35,
        Color32::from_white_alpha(90),
    );

    if let Some(text) = label {
        canvas.text(center, text, 14.0, style.ink, Align2::CENTER_CENTER);
    }
}

fn hud<C: Canvas + ?Sized>(beaker: &Beaker, params: &ReactionParams, canvas: &mut C) {
    let area = params.hud;
    canvas.fill_rect(
        area,
        14.0,
        Color32::from_white_alpha(190),
        Some((2.0, Color32::from_black_alpha(64))),
    );

    let census = beaker.census();
    let lines = [
        format!("H⁺ : {}", census.h_plus),
        format!("Cl⁻ : {}", census.cl_minus),
        format!("Zn(s) : {}", census.zinc),
        format!("Zn²⁺ : {}", census.zinc_ions),
        format!("H₂ : {}", census.bubbles),
    ];
    let mut pos = area.min + Vec2::new(14.0, 12.0);
    for line in &lines {
        canvas.text(pos, line, 18.0, Color32::from_gray(17), Align2::LEFT_TOP);
        pos.y += 20.0;
    }
}

/// Paints onto an egui painter, scaling the logical canvas uniformly to fit
/// the allotted screen rectangle.
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    scale: f32,
    bounds: egui::Rect,
}

impl<'a> EguiCanvas<'a> {
    pub fn fit(painter: &'a egui::Painter, screen: egui::Rect, logical: Vec2) -> Self {
        let scale = (screen.width() / logical.x.max(1.0))
            .min(screen.height() / logical.y.max(1.0))
            .max(0.01);
        let used = egui::vec2(logical.x, logical.y) * scale;
        let origin = screen.center() - used / 2.0;
        Self {
            painter,
            origin,
            scale,
            bounds: egui::Rect::from_min_size(origin, used),
        }
    }

    fn to_screen(&self, p: Vec2) -> egui::Pos2 {
        self.origin + egui::vec2(p.x, p.y) * self.scale
    }
}

impl Canvas for EguiCanvas<'_> {
    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.bounds, 0.0, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color32) {
        self.painter
            .circle_filled(self.to_screen(center), radius * self.scale, color);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color32) {
        self.painter.circle_stroke(
            self.to_screen(center),
            radius * self.scale,
            egui::Stroke::new(width * self.scale, color),
        );
    }

    fn fill_rect(
        &mut self,
        rect: Rect,
        rounding: f32,
        fill: Color32,
        outline: Option<(f32, Color32)>,
    ) {
        let screen = egui::Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max));
        let stroke = outline
            .map(|(width, color)| egui::Stroke::new(width * self.scale, color))
            .unwrap_or(egui::Stroke::NONE);
        self.painter.rect(
            screen,
            rounding * self.scale,
            fill,
            stroke,
            egui::StrokeKind::Inside,
        );
    }

    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Color32, anchor: Align2) {
        self.painter.text(
            self.to_screen(pos),
            anchor,
            text,
            egui::FontId::proportional(size * self.scale),
            color,
        );
    }
}
