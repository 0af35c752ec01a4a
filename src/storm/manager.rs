use std::{collections::BTreeSet, f32::consts::TAU, time::Duration};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    audio::{AudioCue, SilentCue, ThunderTone},
    domain::{
        bolt::{Bolt, BoltId, MAX_LIFE, StrikeOptions},
        element::{ElementId, ElementLocator},
        geometry::{Point, Rgba},
    },
    storm::{
        paint::paint_bolt,
        schedule::{DeferredQueue, DeferredStrike, ScheduleId},
        tuning::Tuning,
    },
    ui::surface::Surface,
};

const EDGE_END_SWAY: f32 = 200.0;
const TOWARD_EDGE_JITTER: f32 = 100.0;
const SECONDARY_START_JITTER: (f32, f32) = (50.0, 50.0);
const SECONDARY_END_JITTER: f32 = 50.0;
const BURST_REACH_MIN: f32 = 50.0;
const BURST_REACH_JITTER: f32 = 100.0;

/// One of the four surface edges a strike can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

/// Owns every live bolt and decides when new ones strike.
///
/// Driven by exactly one [`tick`](Self::tick) and one
/// [`render`](Self::render) per frame. Time is the duration since the storm
/// started, supplied by the caller.
#[derive(Debug)]
pub struct StormManager {
    tuning: Tuning,
    width: f32,
    height: f32,
    bolts: Vec<Bolt>,
    hovered: BTreeSet<ElementId>,
    pending: DeferredQueue,
    now: Duration,
    next_strike: Duration,
    next_bolt: u64,
    rng: StdRng,
    audio: Box<dyn AudioCue>,
}

impl StormManager {
    pub fn new(width: f32, height: f32, tuning: Tuning, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut storm = Self {
            tuning,
            width,
            height,
            bolts: Vec::new(),
            hovered: BTreeSet::new(),
            pending: DeferredQueue::new(),
            now: Duration::ZERO,
            next_strike: Duration::ZERO,
            next_bolt: 0,
            rng,
            audio: Box::new(SilentCue),
        };
        storm.next_strike = storm.next_strike_after(Duration::ZERO);
        if storm.tuning.intro_strikes {
            for at in Tuning::INTRO_STRIKES_AT {
                storm.pending.schedule(at, DeferredStrike::Random);
            }
        }
        storm
    }

    #[must_use]
    pub fn with_audio(mut self, audio: Box<dyn AudioCue>) -> Self {
        self.audio = audio;
        self
    }

    pub fn bolts(&self) -> &[Bolt] {
        &self.bolts
    }

    pub fn bolt(&self, id: BoltId) -> Option<&Bolt> {
        self.bolts.iter().find(|bolt| bolt.id == id)
    }

    /// Bolts created since start, including ones that already expired.
    pub fn total_strikes(&self) -> u64 {
        self.next_bolt
    }

    pub fn hovered(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.hovered.iter().copied()
    }

    pub fn is_hovered(&self, id: ElementId) -> bool {
        self.hovered.contains(&id)
    }

    pub fn pending_strikes(&self) -> usize {
        self.pending.len()
    }

    pub fn next_strike_at(&self) -> Duration {
        self.next_strike
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Drops every bolt and every strike still waiting to fire.
    pub fn reset(&mut self) {
        self.bolts.clear();
        self.pending.cancel_all();
    }

    /// Queues `strike` to fire `delay` after the current storm time.
    pub fn schedule(&mut self, delay: Duration, strike: DeferredStrike) -> ScheduleId {
        self.pending.schedule(self.now + delay, strike)
    }

    pub fn cancel(&mut self, id: ScheduleId) -> bool {
        self.pending.cancel(id)
    }

    /// A strike from a random edge toward the interior, sometimes followed
    /// by a smaller second flash. Asks for a thunder cue.
    pub fn strike_random(&mut self) {
        let edge = self.random_edge();
        let (start, end) = self.edge_strike_path(edge);
        let options = StrikeOptions {
            width: self.between(1.2, 3.0),
            branches: 2 + self.rng.random_range(0..3),
            detail: self.tuning.random_strike_detail,
            life: self.between(0.8, MAX_LIFE),
            decay: self.between(0.02, 0.04),
            color: Rgba::WHITE,
        };
        self.strike_between(start, end, options);

        if self.rng.random_bool(self.tuning.double_strike_chance) {
            self.schedule_double_strike(start, end);
        }

        let tone = ThunderTone::random(&mut self.rng);
        if let Err(err) = self.audio.play_thunder(tone) {
            log::debug!("thunder cue skipped: {err}");
        }
    }

    /// Inserts one bolt between two points and returns it.
    pub fn strike_between(&mut self, from: Point, to: Point, options: StrikeOptions) -> &Bolt {
        let id = BoltId(self.next_bolt);
        self.next_bolt += 1;
        let bolt = Bolt::strike(id, from, to, &options, &mut self.rng);
        log::trace!(
            "bolt {} from ({:.0},{:.0}) to ({:.0},{:.0}), {} branches",
            id.0,
            from.x,
            from.y,
            to.x,
            to.y,
            bolt.branches.len()
        );
        self.bolts.push(bolt);
        &self.bolts[self.bolts.len() - 1]
    }

    /// A strike from a random edge onto `target`.
    pub fn strike_toward(&mut self, target: Point) -> &Bolt {
        let edge = self.random_edge();
        let jitter = self.between(-TOWARD_EDGE_JITTER, TOWARD_EDGE_JITTER);
        let start = match edge {
            Edge::Top => Point::new(target.x + jitter, 0.0),
            Edge::Right => Point::new(self.width, target.y + jitter),
            Edge::Bottom => Point::new(target.x + jitter, self.height),
            Edge::Left => Point::new(0.0, target.y + jitter),
        };
        let options = StrikeOptions {
            width: self.between(1.2, 2.2),
            branches: 1 + self.rng.random_range(0..3),
            detail: 6,
            life: self.between(0.7, 1.0),
            decay: self.between(0.04, 0.06),
            color: Rgba::WHITE,
        };
        self.strike_between(start, target, options)
    }

    /// Short bolts radiating from `center` at even angles, launched one
    /// stagger apart, sometimes joined by a long strike onto the centre.
    pub fn burst(&mut self, center: Point) {
        let count = self
            .rng
            .random_range(self.tuning.burst_bolts_min..=self.tuning.burst_bolts_max);
        let stagger = Duration::from_millis(self.tuning.burst_stagger_ms);

        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU;
            let reach = BURST_REACH_MIN + self.rng.random::<f32>() * BURST_REACH_JITTER;
            let options = StrikeOptions {
                width: self.between(0.8, 1.8),
                branches: usize::from(self.rng.random_bool(self.tuning.burst_branch_chance)),
                detail: 4 + self.rng.random_range(0..2),
                life: self.between(0.5, 0.8),
                decay: self.between(0.06, 0.1),
                color: Rgba::WHITE,
            };
            let strike = DeferredStrike::Between {
                from: center,
                to: center.project(angle, reach),
                options,
            };
            self.fire_after(stagger * i as u32, strike);
        }

        if self.rng.random_bool(self.tuning.burst_strike_toward_chance) {
            self.strike_toward(center);
        }
    }

    /// Records hover state for `element`. Entering an element may burst
    /// immediately; returns whether it did.
    pub fn track_hover<L: ElementLocator + ?Sized>(
        &mut self,
        element: ElementId,
        hovering: bool,
        elements: &L,
    ) -> bool {
        if !hovering {
            self.hovered.remove(&element);
            return false;
        }
        if !self.hovered.insert(element) {
            return false;
        }
        if !self.rng.random_bool(self.tuning.hover_enter_burst_chance) {
            return false;
        }
        match elements.center_of(element) {
            Some(center) => {
                self.burst(center);
                true
            }
            None => false,
        }
    }

    /// A click on `element`: a volley of bursts, one stagger apart.
    pub fn activate<L: ElementLocator + ?Sized>(&mut self, element: ElementId, elements: &L) {
        let Some(center) = elements.center_of(element) else {
            return;
        };
        let stagger = Duration::from_millis(self.tuning.activate_stagger_ms);
        for i in 0..self.tuning.activate_bursts {
            self.fire_after(stagger * i as u32, DeferredStrike::Burst { center });
        }
    }

    /// Advances the storm to `now`: fires due strikes, rolls for new ones,
    /// then decays every bolt and drops the expired.
    pub fn tick<L: ElementLocator + ?Sized>(&mut self, now: Duration, pointer: Point, elements: &L) {
        self.now = self.now.max(now);

        for due in self.pending.drain_due(self.now) {
            self.fire(due.strike);
        }

        if self.now > self.next_strike {
            self.strike_random();
            self.next_strike = self.next_strike_after(self.now);
        }

        if self.rng.random_bool(self.tuning.pointer_strike_chance) {
            self.strike_toward(pointer);
        }

        let hovered: Vec<ElementId> = self.hovered.iter().copied().collect();
        for element in hovered {
            if self.rng.random_bool(self.tuning.hover_burst_chance)
                && let Some(center) = elements.center_of(element)
            {
                self.burst(center);
            }
        }

        let before = self.bolts.len();
        self.bolts.retain_mut(Bolt::advance);
        let expired = before - self.bolts.len();
        if expired > 0 {
            log::trace!("{expired} bolts expired, {} live", self.bolts.len());
        }
    }

    /// Clears `surface` and draws every live bolt onto it.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for bolt in &self.bolts {
            paint_bolt(surface, bolt);
        }
    }

    fn fire(&mut self, strike: DeferredStrike) {
        match strike {
            DeferredStrike::Between { from, to, options } => {
                self.strike_between(from, to, options);
            }
            DeferredStrike::Burst { center } => self.burst(center),
            DeferredStrike::Random => self.strike_random(),
        }
    }

    fn fire_after(&mut self, delay: Duration, strike: DeferredStrike) {
        if delay.is_zero() {
            self.fire(strike);
        } else {
            self.schedule(delay, strike);
        }
    }

    fn schedule_double_strike(&mut self, start: Point, end: Point) {
        let delay = Duration::from_millis(self.tuning.double_strike_delay_min_ms)
            + self.tuning_jitter(self.tuning.double_strike_delay_jitter_ms);
        let from = start.offset(
            self.between(-SECONDARY_START_JITTER.0, SECONDARY_START_JITTER.0),
            self.between(0.0, SECONDARY_START_JITTER.1),
        );
        let to = end.offset(
            self.between(-SECONDARY_END_JITTER, SECONDARY_END_JITTER),
            self.between(-SECONDARY_END_JITTER, SECONDARY_END_JITTER),
        );
        let options = StrikeOptions {
            width: self.between(0.8, 2.0),
            branches: 1 + self.rng.random_range(0..2),
            detail: (self.tuning.random_strike_detail - 1).max(0),
            life: self.between(0.6, 0.9),
            decay: self.between(0.03, 0.05),
            color: Rgba::WHITE,
        };
        self.schedule(delay, DeferredStrike::Between { from, to, options });
    }

    fn edge_strike_path(&mut self, edge: Edge) -> (Point, Point) {
        let (w, h) = (self.width, self.height);
        match edge {
            Edge::Top => {
                let start = Point::new(self.between(0.0, w), 0.0);
                let end = Point::new(
                    start.x + self.between(-EDGE_END_SWAY, EDGE_END_SWAY),
                    self.between(0.0, h * 0.7),
                );
                (start, end)
            }
            Edge::Right => (
                Point::new(w, self.between(0.0, h * 0.5)),
                Point::new(self.between(0.0, w * 0.7), self.between(0.0, h)),
            ),
            Edge::Bottom => {
                let start = Point::new(self.between(0.0, w), h);
                let end = Point::new(
                    start.x + self.between(-EDGE_END_SWAY, EDGE_END_SWAY),
                    self.between(0.0, h * 0.7),
                );
                (start, end)
            }
            Edge::Left => (
                Point::new(0.0, self.between(0.0, h * 0.5)),
                Point::new(self.between(w * 0.3, w), self.between(0.0, h)),
            ),
        }
    }

    fn next_strike_after(&mut self, now: Duration) -> Duration {
        now + self.tuning.strike_interval_min()
            + self.tuning_jitter(self.tuning.strike_interval_jitter_ms)
    }

    fn tuning_jitter(&mut self, max_ms: u64) -> Duration {
        Duration::from_secs_f64(self.rng.random::<f64>() * max_ms as f64 / 1_000.0)
    }

    fn random_edge(&mut self) -> Edge {
        Edge::ALL[self.rng.random_range(0..Edge::ALL.len())]
    }

    /// Uniform in `[lo, hi)`; collapses to `lo` for an empty span.
    fn between(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.rng.random::<f32>() * (hi - lo)
    }
}
