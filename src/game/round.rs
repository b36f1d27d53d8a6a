//! Round controller: owns the scheduler state, score, countdown and the task
//! queue that replaces nested timeout callbacks.
//!
//! Nothing here reads a clock. The caller feeds a monotonically increasing
//! millisecond timestamp into [`Round::advance_to`] and drains the resulting
//! [`Signal`]s. Every task carries the generation of the round that scheduled
//! it, and whether an appearance chain continues is decided when its hide
//! task fires, never when it was scheduled.

use std::time::Duration;

use rand::rngs::SmallRng;

use super::delay::compute_delay;
use super::queue::TimerQueue;
use super::selector::{Slot, SlotSelector};
use crate::config::{Difficulty, GameConfig};
use crate::error::Result;
use crate::rng::{Draw, entropy_rng};

/// Points awarded by a single hit attempt (0 or 1).
pub type ScoreDelta = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Idle,
    Running,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndReason {
    TimeUp,
    Stopped,
}

/// Output of the core for whatever draws the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Signal {
    SlotShown(Slot),
    SlotHidden(Slot),
    HitCue { slot: Slot, active: bool },
    ScoreChanged(u32),
    TimeChanged(u32),
    RoundEnded { score: u32, reason: EndReason },
}

/// Selection memory, pace and the flag that gates every continuation.
#[derive(Clone, Debug)]
pub struct SchedulerState {
    selector: SlotSelector,
    pub difficulty: Difficulty,
    pub running: bool,
}

impl SchedulerState {
    fn new(difficulty: Difficulty) -> Self {
        Self {
            selector: SlotSelector::new(),
            difficulty,
            running: false,
        }
    }

    pub fn last_slot(&self) -> Option<Slot> {
        self.selector.last_slot()
    }
}

/// One mole being up in one hole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Activation {
    pub id: u64,
    pub slot: Slot,
    pub shown_at_ms: u64,
    pub hide_delay: Duration,
    /// Set by the first successful hit; a second hit on the same mole scores nothing.
    pub consumed: bool,
}

#[derive(Clone, Debug, Default)]
struct SlotState {
    activation: Option<Activation>,
    // Activation id whose hit cue is still showing.
    cue: Option<u64>,
}

#[derive(Clone, Copy, Debug)]
enum Task {
    Hide { slot: Slot, activation: u64 },
    ClearHitCue { slot: Slot, activation: u64 },
    Tick,
}

pub struct Round<R = SmallRng> {
    config: GameConfig,
    state: SchedulerState,
    rng: R,
    slots: Vec<SlotState>,
    phase: Phase,
    score: u32,
    remaining: u32,
    now_ms: u64,
    generation: u64,
    next_activation: u64,
    queue: TimerQueue<(u64, Task)>,
    signals: Vec<Signal>,
}

impl Round<SmallRng> {
    /// Round seeded from platform entropy.
    pub fn with_entropy(config: GameConfig) -> Self {
        Self::new(config, entropy_rng())
    }
}

impl<R: Draw> Round<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        let state = SchedulerState::new(config.difficulty);
        let remaining = config.duration_secs;
        Self {
            config,
            state,
            rng,
            slots: Vec::new(),
            phase: Phase::Idle,
            score: 0,
            remaining,
            now_ms: 0,
            generation: 0,
            next_activation: 0,
            queue: TimerQueue::new(),
            signals: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn scheduler_state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn difficulty(&self) -> Difficulty {
        self.state.difficulty
    }

    pub fn last_slot(&self) -> Option<Slot> {
        self.state.last_slot()
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn activation(&self, slot: Slot) -> Option<&Activation> {
        self.slots.get(slot).and_then(|s| s.activation.as_ref())
    }

    pub fn active_slots(&self) -> Vec<Slot> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.activation.is_some())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn has_hit_cue(&self, slot: Slot) -> bool {
        self.slots.get(slot).is_some_and(|s| s.cue.is_some())
    }

    /// Earliest pending task, including stale ones from earlier rounds.
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.next_due()
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Takes effect at the next appearance, including within a running round.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.state.difficulty = difficulty;
        self.config.difficulty = difficulty;
    }

    /// Takes effect at the next `start`.
    pub fn set_duration(&mut self, duration_secs: u32) {
        self.config.duration_secs = duration_secs;
        if !self.state.running {
            self.remaining = duration_secs;
        }
    }

    /// Takes effect at the next `start`.
    pub fn set_slot_count(&mut self, slot_count: usize) {
        self.config.slot_count = slot_count;
    }

    /// Swap in a whole new configuration. Difficulty applies at the next
    /// appearance, everything else at the next `start`. The RNG and the
    /// generation counter carry over, so earlier rounds' tasks stay stale.
    pub fn reconfigure(&mut self, config: GameConfig) {
        self.state.difficulty = config.difficulty;
        if !self.state.running {
            self.remaining = config.duration_secs;
        }
        self.config = config;
    }

    pub fn drain_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    /// Begin (or replay) a round at `now_ms`. Fails without touching the
    /// current round if the configuration cannot be played.
    pub fn start(&mut self, now_ms: u64) -> Result<()> {
        self.config.validate()?;

        self.hide_all();
        self.generation += 1;
        self.now_ms = now_ms;
        self.slots = vec![SlotState::default(); self.config.slot_count];
        self.state.selector.reset();
        self.state.difficulty = self.config.difficulty;
        self.state.running = true;
        self.phase = Phase::Running;
        self.score = 0;
        self.remaining = self.config.duration_secs;
        self.signals.push(Signal::ScoreChanged(0));
        self.signals.push(Signal::TimeChanged(self.remaining));

        self.queue
            .schedule(now_ms + self.config.tick_ms, (self.generation, Task::Tick));
        for _ in 0..self.config.max_active {
            self.run_appearance_cycle(None)?;
        }
        log::info!(
            "round {} started: {} slots, {}s, {}",
            self.generation,
            self.config.slot_count,
            self.config.duration_secs,
            self.state.difficulty
        );
        Ok(())
    }

    /// Manual stop. Hides everything; pending tasks become no-ops.
    pub fn stop(&mut self) {
        if self.state.running {
            self.end(EndReason::Stopped);
        }
    }

    /// Run every task due at or before `now_ms`, in deadline order.
    pub fn advance_to(&mut self, now_ms: u64) {
        while let Some((due, (generation, task))) = self.queue.pop_due(now_ms) {
            if generation != self.generation {
                continue;
            }
            self.now_ms = self.now_ms.max(due);
            self.dispatch(task);
        }
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Whack `slot`. Scores only a visible, not yet whacked mole in a running
    /// round; anything else is ignored.
    pub fn register_hit(&mut self, slot: Slot) -> ScoreDelta {
        if !self.state.running {
            return 0;
        }
        let Some(slot_state) = self.slots.get_mut(slot) else {
            return 0;
        };
        let Some(activation) = slot_state.activation.as_mut() else {
            return 0;
        };
        if activation.consumed {
            return 0;
        }
        activation.consumed = true;
        let id = activation.id;
        slot_state.cue = Some(id);

        self.score += 1;
        self.signals.push(Signal::ScoreChanged(self.score));
        self.signals.push(Signal::HitCue { slot, active: true });
        self.queue.schedule(
            self.now_ms + self.config.hit_cooldown_ms,
            (
                self.generation,
                Task::ClearHitCue {
                    slot,
                    activation: id,
                },
            ),
        );
        1
    }

    /// Catch up to `now_ms` first, then whack.
    pub fn register_hit_at(&mut self, slot: Slot, now_ms: u64) -> ScoreDelta {
        self.advance_to(now_ms);
        self.register_hit(slot)
    }

    fn should_continue(&self) -> bool {
        self.state.running && self.remaining > 0
    }

    /// Show the next mole of a chain. `vacated` is the slot the chain just
    /// left; it is skipped while any other slot is free.
    fn run_appearance_cycle(&mut self, vacated: Option<Slot>) -> Result<()> {
        let delay = compute_delay(self.state.difficulty, &mut self.rng);
        let mut free: Vec<Slot> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.activation.is_none())
            .map(|(i, _)| i)
            .collect();
        // With a single chain the selector's own last-slot rule covers this.
        if let Some(prev) = vacated.filter(|&p| Some(p) != self.state.selector.last_slot()) {
            if free.len() > 1 {
                free.retain(|&s| s != prev);
            }
        }
        let slot = self.state.selector.select(&free, &mut self.rng)?;

        let id = self.next_activation;
        self.next_activation += 1;
        self.slots[slot].activation = Some(Activation {
            id,
            slot,
            shown_at_ms: self.now_ms,
            hide_delay: delay,
            consumed: false,
        });
        self.signals.push(Signal::SlotShown(slot));

        let due = self.now_ms + delay.as_millis() as u64;
        self.queue.schedule(
            due,
            (
                self.generation,
                Task::Hide {
                    slot,
                    activation: id,
                },
            ),
        );
        log::debug!("mole {id} up in slot {slot} for {}ms", delay.as_millis());
        Ok(())
    }

    fn dispatch(&mut self, task: Task) {
        match task {
            Task::Hide { slot, activation } => self.on_hide(slot, activation),
            Task::ClearHitCue { slot, activation } => {
                if let Some(s) = self.slots.get_mut(slot) {
                    if s.cue == Some(activation) {
                        s.cue = None;
                        self.signals.push(Signal::HitCue {
                            slot,
                            active: false,
                        });
                    }
                }
            }
            Task::Tick => self.on_tick(),
        }
    }

    fn on_hide(&mut self, slot: Slot, activation: u64) {
        // Cleanup first, regardless of whether the round is still going.
        if let Some(s) = self.slots.get_mut(slot) {
            if s.activation.is_some_and(|a| a.id == activation) {
                s.activation = None;
                self.signals.push(Signal::SlotHidden(slot));
            }
        }
        if !self.should_continue() {
            return;
        }
        if let Err(e) = self.run_appearance_cycle(Some(slot)) {
            log::warn!("appearance chain stopped: {e}");
        }
    }

    fn on_tick(&mut self) {
        if !self.state.running {
            return;
        }
        self.remaining = self.remaining.saturating_sub(1);
        self.signals.push(Signal::TimeChanged(self.remaining));
        if self.remaining == 0 {
            self.end(EndReason::TimeUp);
        } else {
            self.queue.schedule(
                self.now_ms + self.config.tick_ms,
                (self.generation, Task::Tick),
            );
        }
    }

    fn end(&mut self, reason: EndReason) {
        self.state.running = false;
        self.phase = Phase::Ended;
        self.hide_all();
        self.signals.push(Signal::RoundEnded {
            score: self.score,
            reason,
        });
        log::info!(
            "round {} ended ({reason:?}) with {} points",
            self.generation,
            self.score
        );
    }

    fn hide_all(&mut self) {
        for (i, s) in self.slots.iter_mut().enumerate() {
            if s.activation.take().is_some() {
                self.signals.push(Signal::SlotHidden(i));
            }
            if s.cue.take().is_some() {
                self.signals.push(Signal::HitCue {
                    slot: i,
                    active: false,
                });
            }
        }
    }
}
