use rand::Rng;

use crate::domain::{
    geometry::{Point, Rgba},
    path::{BranchPlan, generate, generate_branches},
};

/// Main bolt width divided by this gives the width of its branches.
pub const BRANCH_WIDTH_DIVISOR: f32 = 2.5;

/// Starting life never exceeds this.
pub const MAX_LIFE: f32 = 1.0;
/// Per-frame decay never drops below this, so every bolt expires.
pub const MIN_DECAY: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoltId(pub u64);

/// Shape and lifetime of a single strike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeOptions {
    pub width: f32,
    pub branches: usize,
    pub detail: i32,
    pub life: f32,
    pub decay: f32,
    pub color: Rgba,
}

impl Default for StrikeOptions {
    fn default() -> Self {
        Self {
            width: 1.2,
            branches: 1,
            detail: 5,
            life: 0.7,
            decay: 0.05,
            color: Rgba::WHITE,
        }
    }
}

/// Secondary path hanging off a bolt. Owned by that bolt and at most one
/// level of further nesting.
#[derive(Debug, Clone)]
pub struct Branch {
    pub points: Vec<Point>,
    pub life: f32,
    pub width: f32,
    pub decay_multiplier: f32,
    pub sub_branch: Option<Box<Branch>>,
}

impl Branch {
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    fn advance(&mut self, decay: f32) {
        self.life -= decay * self.decay_multiplier;
        if let Some(sub) = self.sub_branch.as_deref_mut() {
            sub.advance(decay);
        }
    }

    /// This branch followed by its nested sub-branch, if any.
    pub fn iter(&self) -> impl Iterator<Item = &Branch> {
        std::iter::successors(Some(self), |branch| branch.sub_branch.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct Bolt {
    pub id: BoltId,
    pub start: Point,
    pub end: Point,
    pub points: Vec<Point>,
    pub branches: Vec<Branch>,
    pub width: f32,
    pub branch_width: f32,
    pub color: Rgba,
    pub life: f32,
    pub decay: f32,
    pub detail: i32,
}

impl Bolt {
    /// Generates the main path and its branches between `start` and `end`.
    pub fn strike<R: Rng + ?Sized>(
        id: BoltId,
        start: Point,
        end: Point,
        options: &StrikeOptions,
        rng: &mut R,
    ) -> Self {
        let life = options.life.min(MAX_LIFE);
        let decay = options.decay.max(MIN_DECAY);
        let points = generate(start, end, options.detail, rng);
        let branch_width = options.width / BRANCH_WIDTH_DIVISOR;
        let branches = generate_branches(
            &points,
            BranchPlan {
                count: options.branches,
                detail: options.detail,
                parent_life: life,
                width: branch_width,
            },
            rng,
        );

        Self {
            id,
            start,
            end,
            points,
            branches,
            width: options.width,
            branch_width,
            color: options.color,
            life,
            decay,
            detail: options.detail,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Applies one frame of decay; returns whether the bolt is still alive.
    pub fn advance(&mut self) -> bool {
        self.life -= self.decay;
        for branch in &mut self.branches {
            branch.advance(self.decay);
        }
        self.is_alive()
    }

    /// Every branch including nested ones, depth first.
    pub fn all_branches(&self) -> impl Iterator<Item = &Branch> {
        self.branches.iter().flat_map(Branch::iter)
    }
}
