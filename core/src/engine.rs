use core::time::Duration;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// How long the deposit animation plays before the box closes.
pub const DEPOSIT_DELAY: Duration = Duration::from_millis(1500);
/// How long the closing animation plays before the fill is committed.
pub const CLOSE_DELAY: Duration = Duration::from_millis(1500);

const MAX_REGENERATE: u32 = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Generating,
    AwaitingSelection,
    BoxChosen { target: usize },
    BoxOpen { target: usize },
    Depositing { target: usize },
    Closing { target: usize },
    Filled { target: usize, amount: Fill },
    Complete,
}

impl Phase {
    /// Box chosen for the current deposit, if any.
    pub const fn target(self) -> Option<usize> {
        use Phase::*;
        match self {
            BoxChosen { target }
            | BoxOpen { target }
            | Depositing { target }
            | Closing { target }
            | Filled { target, .. } => Some(target),
            Generating | AwaitingSelection | Complete => None,
        }
    }

    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }

    pub const fn accepts_selection(self) -> bool {
        matches!(self, Self::AwaitingSelection)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Generating
    }
}

/// Identifies one armed timer; only the most recently armed token is honored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerToken(u64);

/// A delayed transition the host must schedule, then report back through
/// [`RoundEngine::fire`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScheduledTransition {
    pub token: TimerToken,
    pub delay: Duration,
}

/// Result of a successful engine operation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Step {
    /// Phases entered, in order.
    pub entered: SmallVec<[Phase; 4]>,
    pub schedule: Option<ScheduledTransition>,
}

impl Step {
    pub fn has_update(&self) -> bool {
        !self.entered.is_empty()
    }

    pub fn last(&self) -> Option<Phase> {
        self.entered.last().copied()
    }
}

/// Drives a session from selection through deposit and fill, round after round.
///
/// The engine never sleeps: delayed phases come back as a
/// [`ScheduledTransition`] and move on when the host calls [`RoundEngine::fire`]
/// with the matching token. Any reset disarms the pending token, so a late
/// callback cannot commit into a later round.
#[derive(Clone, Debug)]
pub struct RoundEngine<G = RandomRoundGenerator> {
    config: RoundConfig,
    generator: G,
    rng: SmallRng,
    round: Round,
    phase: Phase,
    armed: Option<TimerToken>,
    next_token: u64,
    torn_down: bool,
}

impl RoundEngine<RandomRoundGenerator> {
    pub fn new(seed: u64, config: RoundConfig) -> Self {
        Self::with_generator(RandomRoundGenerator::new(seed), seed, config)
    }
}

impl<G: RoundGenerator> RoundEngine<G> {
    /// Starts in [`Phase::Generating`]; call [`RoundEngine::start`] once mounted.
    pub fn with_generator(generator: G, seed: u64, config: RoundConfig) -> Self {
        Self {
            config,
            generator,
            // decorrelate from the generator when both come from the same seed
            rng: SmallRng::seed_from_u64(seed.rotate_left(32) ^ 0x6d64_725f_626f_7865),
            round: Round::default(),
            phase: Phase::Generating,
            armed: None,
            next_token: 0,
            torn_down: false,
        }
    }

    pub fn config(&self) -> RoundConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn armed_timer(&self) -> Option<TimerToken> {
        self.armed
    }

    pub fn is_complete(&self) -> bool {
        self.phase.is_complete()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Generates the first round.
    pub fn start(&mut self) -> Result<Step> {
        self.check_live()?;
        self.check_phase(matches!(self.phase, Phase::Generating))?;

        let mut step = Step::default();
        self.enter_generating(&mut step);
        Ok(step)
    }

    pub fn toggle_or_add(&mut self, index: CellIndex) -> Result<SelectOutcome> {
        self.check_selecting()?;
        self.round.toggle_or_add(index)
    }

    pub fn begin_drag(&mut self, index: CellIndex) -> Result<SelectOutcome> {
        self.check_selecting()?;
        self.round.begin_drag(index)
    }

    pub fn drag_over(&mut self, index: CellIndex) -> Result<SelectOutcome> {
        self.check_selecting()?;
        self.round.drag_over(index)
    }

    /// Ends a drag gesture; accepted in any phase since releasing the pointer
    /// must never leave the flag stuck.
    pub fn end_drag(&mut self) -> bool {
        self.round.end_drag()
    }

    /// Picks a random box with room left and opens it.
    pub fn open_box<S: BoxStore + ?Sized>(&mut self, store: &S) -> Result<Step> {
        self.check_selecting()?;
        if !self.round.is_complete() {
            return Err(GameError::SelectionIncomplete);
        }

        let candidates = store.open_candidates();
        let Some(&target) = candidates.choose(&mut self.rng) else {
            log::warn!("open requested but every box is full");
            return Err(GameError::NoOpenBox);
        };

        let mut step = Step::default();
        self.enter(Phase::BoxChosen { target }, &mut step);
        self.enter(Phase::BoxOpen { target }, &mut step);
        Ok(step)
    }

    /// Starts depositing into the open box.
    pub fn confirm(&mut self) -> Result<Step> {
        self.check_live()?;
        let Phase::BoxOpen { target } = self.phase else {
            return Err(GameError::WrongPhase);
        };

        let mut step = Step::default();
        self.enter(Phase::Depositing { target }, &mut step);
        step.schedule = Some(self.arm(DEPOSIT_DELAY));
        Ok(step)
    }

    /// Completes the delayed transition armed under `token`.
    pub fn fire<S: BoxStore + ?Sized>(&mut self, token: TimerToken, store: &mut S) -> Result<Step> {
        self.check_live()?;
        if self.armed != Some(token) {
            log::debug!("ignoring stale timer {:?}", token);
            return Err(GameError::StaleTimer);
        }
        self.armed = None;

        let mut step = Step::default();
        match self.phase {
            Phase::Depositing { target } => {
                self.enter(Phase::Closing { target }, &mut step);
                step.schedule = Some(self.arm(CLOSE_DELAY));
            }
            Phase::Closing { target } => {
                let drawn = self.rng.random_range(INCREMENT_RANGE);
                let before = store.fills().get(target).copied().unwrap_or(FULL);
                // Filled reports what actually landed in the box
                let amount = match store.commit_increment(target, drawn) {
                    Ok(after) => after.saturating_sub(before),
                    Err(err) => {
                        log::warn!("could not fill box {}: {}", target, err);
                        0
                    }
                };
                self.enter(Phase::Filled { target, amount }, &mut step);

                if store.is_all_complete() {
                    self.enter(Phase::Complete, &mut step);
                } else {
                    self.enter_generating(&mut step);
                }
            }
            phase => {
                log::warn!("timer fired in {:?}", phase);
                return Err(GameError::WrongPhase);
            }
        }
        Ok(step)
    }

    /// Throws the live round away and deals a new one.
    pub fn regenerate(&mut self) -> Result<Step> {
        self.check_live()?;
        self.check_phase(!self.phase.is_complete())?;

        self.disarm();
        let mut step = Step::default();
        self.enter_generating(&mut step);
        Ok(step)
    }

    /// Clears all box progress and starts over; only valid once complete.
    pub fn restart<S: BoxStore + ?Sized>(&mut self, store: &mut S) -> Result<Step> {
        self.check_live()?;
        self.check_phase(self.phase.is_complete())?;

        store.reset_progress();
        self.disarm();
        let mut step = Step::default();
        self.enter_generating(&mut step);
        Ok(step)
    }

    /// Makes the engine inert; pending and future timers are all stale.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            log::debug!("engine torn down in {:?}", self.phase);
        }
        self.torn_down = true;
        self.disarm();
        self.round.end_drag();
    }

    fn enter_generating(&mut self, step: &mut Step) {
        self.enter(Phase::Generating, step);

        self.round = self.generator.generate(self.config);
        let mut attempts = 0;
        while self.round.cluster().is_empty() && attempts < MAX_REGENERATE {
            log::warn!("generated round without a target, regenerating");
            self.round = self.generator.generate(self.config);
            attempts += 1;
        }
        if self.round.cluster().is_empty() {
            log::error!("no target after {} attempts", MAX_REGENERATE);
        }

        self.enter(Phase::AwaitingSelection, step);
    }

    fn enter(&mut self, phase: Phase, step: &mut Step) {
        log::debug!("phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        step.entered.push(phase);
    }

    fn arm(&mut self, delay: Duration) -> ScheduledTransition {
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        self.armed = Some(token);
        ScheduledTransition { token, delay }
    }

    fn disarm(&mut self) {
        if let Some(token) = self.armed.take() {
            log::debug!("cancelled timer {:?}", token);
        }
    }

    fn check_live(&self) -> Result<()> {
        if self.torn_down {
            Err(GameError::TornDown)
        } else {
            Ok(())
        }
    }

    fn check_phase(&self, ok: bool) -> Result<()> {
        if ok {
            Ok(())
        } else {
            Err(GameError::WrongPhase)
        }
    }

    fn check_selecting(&self) -> Result<()> {
        self.check_live()?;
        self.check_phase(self.phase.accepts_selection())
    }
}
