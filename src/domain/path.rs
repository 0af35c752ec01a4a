//! Randomized midpoint-displacement paths for bolts and their branches.
//!
//! Output is intentionally non-deterministic for a given pair of endpoints;
//! callers pass the random source so a seeded run can be reproduced.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::ops::Range;

use rand::Rng;

use crate::domain::{bolt::Branch, geometry::Point};

/// Detail levels above this are clamped; `2^12` steps is already far finer
/// than any terminal can show.
pub const MAX_DETAIL: i32 = 12;

const DISPLACEMENT_DIVISOR: f32 = 4.0;
const DISPLACEMENT_FALLOFF: f32 = 0.8;

pub const BRANCH_LENGTH: Range<f32> = 40.0..120.0;
pub const BRANCH_LIFE_SCALE: f32 = 0.7;
pub const BRANCH_DECAY_MULTIPLIER: f32 = 1.2;

pub const SUB_BRANCH_CHANCE: f64 = 0.3;
pub const SUB_BRANCH_LENGTH_SCALE: f32 = 0.4;
pub const SUB_BRANCH_LIFE_SCALE: f32 = 0.5;
pub const SUB_BRANCH_WIDTH_SCALE: f32 = 0.6;
pub const SUB_BRANCH_DECAY_MULTIPLIER: f32 = 1.5;

/// Jagged path from `start` to `end` with `2^detail` steps.
///
/// The first point is `start` and the last is exactly `end`; every step in
/// between is pushed sideways by a displacement that starts at a quarter of
/// the span and shrinks by 20% per step. `detail <= 0` yields `[start, end]`.
pub fn generate<R: Rng + ?Sized>(start: Point, end: Point, detail: i32, rng: &mut R) -> Vec<Point> {
    if detail <= 0 {
        return vec![start, end];
    }

    let steps = 1_usize << detail.min(MAX_DETAIL);
    let mut points = Vec::with_capacity(steps + 1);
    points.push(start);

    let mut max_displacement = start.distance(end) / DISPLACEMENT_DIVISOR;
    if !max_displacement.is_finite() {
        max_displacement = 0.0;
    }

    let mut current = start;
    for i in 0..steps - 1 {
        let remaining = (steps - i) as f32;
        let dx = (end.x - current.x) / remaining;
        let dy = (end.y - current.y) / remaining;
        let (nx, ny) = unit_normal(dx, dy);

        let displacement = rng.random_range(-1.0f32..1.0) * max_displacement;
        max_displacement *= DISPLACEMENT_FALLOFF;

        current = Point::new(
            current.x + dx + nx * displacement,
            current.y + dy + ny * displacement,
        );
        points.push(current);
    }

    points.push(end);
    points
}

/// Parameters shared by every branch hanging off one parent path.
#[derive(Debug, Clone, Copy)]
pub struct BranchPlan {
    pub count: usize,
    /// Detail of the parent path; branches use one level less.
    pub detail: i32,
    pub parent_life: f32,
    pub width: f32,
}

/// Spawns `plan.count` branches anchored on interior points of `path`.
///
/// Paths with fewer than three points have no interior and get no branches.
pub fn generate_branches<R: Rng + ?Sized>(
    path: &[Point],
    plan: BranchPlan,
    rng: &mut R,
) -> Vec<Branch> {
    if path.len() < 3 {
        return Vec::new();
    }
    (0..plan.count)
        .map(|_| spawn_branch(path, plan, rng))
        .collect()
}

fn spawn_branch<R: Rng + ?Sized>(path: &[Point], plan: BranchPlan, rng: &mut R) -> Branch {
    let index = rng.random_range(1..path.len() - 1);
    let anchor = path[index];
    let next = path[index + 1];

    let heading = (next.y - anchor.y).atan2(next.x - anchor.x);
    let angle = heading + rng.random_range(-FRAC_PI_2..FRAC_PI_2);
    let length = rng.random_range(BRANCH_LENGTH);

    let points = generate(anchor, anchor.project(angle, length), plan.detail - 1, rng);
    let sub_branch = maybe_sub_branch(&points, angle, length, plan, rng);

    Branch {
        points,
        life: plan.parent_life * BRANCH_LIFE_SCALE,
        width: plan.width,
        decay_multiplier: BRANCH_DECAY_MULTIPLIER,
        sub_branch,
    }
}

fn maybe_sub_branch<R: Rng + ?Sized>(
    branch_points: &[Point],
    branch_angle: f32,
    branch_length: f32,
    plan: BranchPlan,
    rng: &mut R,
) -> Option<Box<Branch>> {
    if plan.detail <= 1 || branch_points.len() <= 2 || !rng.random_bool(SUB_BRANCH_CHANCE) {
        return None;
    }

    let mid = branch_points[branch_points.len() / 2];
    let angle = branch_angle + rng.random_range(-FRAC_PI_4..FRAC_PI_4);
    let tip = mid.project(angle, branch_length * SUB_BRANCH_LENGTH_SCALE);

    Some(Box::new(Branch {
        points: generate(mid, tip, plan.detail - 2, rng),
        life: plan.parent_life * SUB_BRANCH_LIFE_SCALE,
        width: plan.width * SUB_BRANCH_WIDTH_SCALE,
        decay_multiplier: SUB_BRANCH_DECAY_MULTIPLIER,
        sub_branch: None,
    }))
}

fn unit_normal(dx: f32, dy: f32) -> (f32, f32) {
    let len = dx.hypot(dy);
    if len > 0.0 && len.is_finite() {
        (-dy / len, dx / len)
    } else {
        (0.0, 0.0)
    }
}
