use crate::{
    domain::{
        bolt::{Bolt, Branch},
        geometry::{Point, Rgba},
    },
    ui::surface::{Stroke, Surface},
};

pub const GLOW_WIDTH_SCALE: f32 = 2.5;
pub const BOLT_GLOW_ALPHA: f32 = 0.2;
pub const BRANCH_GLOW_ALPHA: f32 = 0.15;

/// Two passes per path: a wide faint glow under a narrow core whose opacity
/// is the remaining life.
pub fn paint_bolt<S: Surface + ?Sized>(surface: &mut S, bolt: &Bolt) {
    if !bolt.is_alive() {
        return;
    }
    paint_glowing_path(surface, &bolt.points, bolt.width, bolt.color, bolt.life, BOLT_GLOW_ALPHA);
    for branch in bolt.all_branches().filter(|branch| branch.is_alive()) {
        paint_branch(surface, branch, bolt.color);
    }
}

fn paint_branch<S: Surface + ?Sized>(surface: &mut S, branch: &Branch, color: Rgba) {
    paint_glowing_path(
        surface,
        &branch.points,
        branch.width,
        color,
        branch.life,
        BRANCH_GLOW_ALPHA,
    );
}

fn paint_glowing_path<S: Surface + ?Sized>(
    surface: &mut S,
    points: &[Point],
    width: f32,
    color: Rgba,
    life: f32,
    glow_alpha: f32,
) {
    surface.stroke_path(
        points,
        Stroke::new(width * GLOW_WIDTH_SCALE, Rgba::GLOW.with_alpha(life * glow_alpha)),
    );
    surface.stroke_path(points, Stroke::new(width, color.with_alpha(life)));
}
