//! Day simulation engine - the single entry point the presentation layer
//! drives.
//!
//! The engine owns one [`SimState`] and the randomness used for Relax
//! branching. It is synchronous and owns no timer; the caller calls
//! [`DayEngine::tick`] on its own cadence.
//!
//! ```
//! use dreamstory_logic::prelude::*;
//!
//! let mut engine = DayEngine::seeded(EngineConfig::default(), 7).unwrap();
//! let outcome = engine.request_action(ActionKind::Sleep);
//! assert!(outcome.is_applied());
//! assert_eq!(engine.state().score, 20);
//! ```

use chrono::NaiveDateTime;
use rand::distributions::{Bernoulli, Distribution};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

use crate::actions::ActionKind;
use crate::attributes::Mood;
use crate::config::{ConfigError, EngineConfig};
use crate::outcome::{Outcome, RejectReason};
use crate::outside::{self, OutsideBranch, OUTSIDE_PROMPT};
use crate::rooms::{Direction, RoomId};
use crate::state::{ScoreLevel, SimState};

/// Caller-level toggles that survive [`DayEngine::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub sound_enabled: bool,
    pub music_enabled: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
        }
    }
}

/// A Relax request that was redirected and awaits resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOutside {
    pub requested_at: NaiveDateTime,
    pub from_room: RoomId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no outside event is pending")]
    NoPendingOutsideEvent,
}

/// Read-only projection for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub state: SimState,
    pub mood: Mood,
    pub clock: String,
    pub score_level: ScoreLevel,
    pub preferences: Preferences,
    pub pending_outside: Option<PendingOutside>,
}

pub struct DayEngine<R: Rng> {
    config: EngineConfig,
    state: SimState,
    preferences: Preferences,
    rng: R,
    relax_redirect: Bernoulli,
    outside_favorable: Bernoulli,
    pending_outside: Option<PendingOutside>,
    last_outcome: Option<Outcome>,
}

impl DayEngine<StdRng> {
    /// Engine with a seeded standard RNG.
    pub fn seeded(config: EngineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DayEngine<R> {
    pub fn new(config: EngineConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let relax_redirect = bernoulli("relax_redirect_chance", config.relax_redirect_chance)?;
        let outside_favorable =
            bernoulli("outside_favorable_chance", config.outside_favorable_chance)?;
        Ok(Self {
            state: SimState::new(&config),
            config,
            preferences: Preferences::default(),
            rng,
            relax_redirect,
            outside_favorable,
            pending_outside: None,
            last_outcome: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn mood(&self) -> Mood {
        self.state.mood()
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    /// Flip the sound toggle; returns the new value.
    pub fn toggle_sound(&mut self) -> bool {
        self.preferences.sound_enabled = !self.preferences.sound_enabled;
        self.preferences.sound_enabled
    }

    /// Flip the music toggle; returns the new value.
    pub fn toggle_music(&mut self) -> bool {
        self.preferences.music_enabled = !self.preferences.music_enabled;
        self.preferences.music_enabled
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }

    pub fn pending_outside_event(&self) -> Option<&PendingOutside> {
        self.pending_outside.as_ref()
    }

    pub fn format_clock(&self) -> String {
        self.state.clock.format()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            state: self.state.clone(),
            mood: self.state.mood(),
            clock: self.format_clock(),
            score_level: self.state.score_level(),
            preferences: self.preferences,
            pending_outside: self.pending_outside,
        }
    }

    // ── Clock ───────────────────────────────────────────────────────────

    /// Advance simulated time by one tick. Returns `true` on day rollover.
    pub fn tick(&mut self) -> bool {
        let rolled = self.state.advance_clock(self.config.tick_minutes);
        if rolled {
            log::info!(
                "Day {} begins at {}, daily actions cleared",
                self.state.current_day,
                self.state.clock.now()
            );
        }
        rolled
    }

    // ── Navigation ──────────────────────────────────────────────────────

    pub fn navigate(&mut self, direction: Direction) -> RoomId {
        self.state.current_room = self.state.current_room.step(direction);
        self.state.current_room
    }

    pub fn enter_room(&mut self, room: RoomId) {
        self.state.current_room = room;
    }

    // ── Actions ─────────────────────────────────────────────────────────

    /// Request an action. The returned outcome is also kept as
    /// [`DayEngine::last_outcome`].
    pub fn request_action(&mut self, kind: ActionKind) -> Outcome {
        let outcome = self.resolve_request(kind);
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    /// Request an action by its presentation-layer identifier.
    pub fn request_action_by_id(&mut self, id: &str) -> Outcome {
        match ActionKind::from_id(id) {
            Some(kind) => self.request_action(kind),
            None => {
                log::debug!("Unknown action id {:?}", id);
                let outcome = Outcome::Rejected {
                    reason: RejectReason::UnknownAction,
                    message: format!("Ação desconhecida: \"{}\"", id),
                };
                self.last_outcome = Some(outcome.clone());
                outcome
            }
        }
    }

    fn resolve_request(&mut self, kind: ActionKind) -> Outcome {
        if self.pending_outside.is_some() {
            return reject(
                kind,
                RejectReason::OutsideEventPending,
                "Alex ainda está fora de casa.".to_string(),
            );
        }

        if self.state.daily_actions.contains(kind) {
            return reject(
                kind,
                RejectReason::AlreadyDone,
                format!(
                    "Alex já {} hoje! Tente novamente amanhã.",
                    kind.description().to_lowercase()
                ),
            );
        }

        if self.config.enforce_location {
            let room = self.state.current_room.room();
            if !room.offers(kind) {
                return reject(
                    kind,
                    RejectReason::WrongRoom,
                    format!("{} não está disponível em {}", kind.description(), room.name),
                );
            }
        }

        if kind.can_go_outside() && self.relax_redirect.sample(&mut self.rng) {
            self.pending_outside = Some(PendingOutside {
                requested_at: self.state.clock.now(),
                from_room: self.state.current_room,
            });
            log::debug!("{:?} redirected to an outside event", kind);
            return Outcome::Redirected {
                action: kind,
                message: OUTSIDE_PROMPT.to_string(),
            };
        }

        let effect = kind.effect();
        let new_mood = self
            .state
            .apply_effect(kind, &effect.deltas, effect.points_delta);
        log::debug!(
            "{:?} applied: {:+} points, score {}, mood {:?}",
            kind,
            effect.points_delta,
            self.state.score,
            new_mood
        );
        Outcome::Applied {
            action: kind,
            points_delta: effect.points_delta,
            message: effect.message.to_string(),
            new_mood,
            outside: None,
        }
    }

    /// Resolve the outside event left by a `Redirected` outcome.
    pub fn resolve_outside_event(&mut self) -> Result<Outcome, EngineError> {
        if self.pending_outside.take().is_none() {
            log::warn!("resolve_outside_event called with nothing pending");
            return Err(EngineError::NoPendingOutsideEvent);
        }

        let branch = OutsideBranch::roll(&mut self.rng, &self.outside_favorable);
        let new_mood = outside::apply_branch(&mut self.state, branch, self.config.return_room);
        let effect = branch.effect();
        log::debug!(
            "Outside event {:?}: {:+} points, score {}, mood {:?}",
            branch,
            effect.points_delta,
            self.state.score,
            new_mood
        );

        let outcome = Outcome::Applied {
            action: ActionKind::Relax,
            points_delta: effect.points_delta,
            message: effect.message.to_string(),
            new_mood,
            outside: Some(branch),
        };
        self.last_outcome = Some(outcome.clone());
        Ok(outcome)
    }

    // ── Reset ───────────────────────────────────────────────────────────

    /// Start over from the initial state. Preferences are kept.
    pub fn reset(&mut self) {
        log::info!(
            "Resetting session at day {} with score {}",
            self.state.current_day,
            self.state.score
        );
        self.state = SimState::new(&self.config);
        self.pending_outside = None;
        self.last_outcome = None;
    }
}

fn reject(kind: ActionKind, reason: RejectReason, message: String) -> Outcome {
    log::debug!("{:?} rejected: {:?}", kind, reason);
    Outcome::Rejected { reason, message }
}

fn bernoulli(field: &'static str, p: f64) -> Result<Bernoulli, ConfigError> {
    Bernoulli::new(p).map_err(|_| ConfigError::Probability { field, value: p })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::FeedbackTone;
    use rand::rngs::mock::StepRng;

    /// Every Bernoulli draw comes out `true`.
    fn always_heads() -> StepRng {
        StepRng::new(0, 0)
    }

    /// Every Bernoulli draw with p < 1 comes out `false`.
    fn always_tails() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn engine_with(rng: StepRng) -> DayEngine<StepRng> {
        DayEngine::new(EngineConfig::default(), rng).unwrap()
    }

    fn tick_to_next_day(engine: &mut DayEngine<impl Rng>) {
        let day = engine.state().current_day;
        while engine.state().current_day == day {
            engine.tick();
        }
    }

    #[test]
    fn test_sleep_on_fresh_state() {
        let mut engine = engine_with(always_tails());
        let outcome = engine.request_action(ActionKind::Sleep);
        let s = engine.state();
        assert_eq!(s.attributes.health, 60);
        assert_eq!(s.attributes.energy, 70);
        assert_eq!(s.attributes.sleep_quality, 75);
        assert_eq!(s.attributes.relationships, 50);
        assert_eq!(s.attributes.productivity, 50);
        assert_eq!(s.score, 20);
        // (60 + 70 + 75 + 50) / 4 = 63.75
        assert_eq!(engine.mood(), Mood::Relaxed);
        match outcome {
            Outcome::Applied {
                action,
                points_delta,
                new_mood,
                outside,
                ..
            } => {
                assert_eq!(action, ActionKind::Sleep);
                assert_eq!(points_delta, 20);
                assert_eq!(new_mood, Mood::Relaxed);
                assert_eq!(outside, None);
            }
            other => panic!("expected Applied, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_action_rejected_without_mutation() {
        let mut engine = engine_with(always_tails());
        assert!(engine.request_action(ActionKind::Eat).is_applied());
        let before = engine.state().clone();
        let second = engine.request_action(ActionKind::Eat);
        assert_eq!(second.reject_reason(), Some(RejectReason::AlreadyDone));
        assert_eq!(second.message(), "Alex já comer hoje! Tente novamente amanhã.");
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.last_outcome(), Some(&second));
    }

    #[test]
    fn test_rollover_allows_actions_again() {
        let mut engine = engine_with(always_tails());
        engine.request_action(ActionKind::Shower);
        tick_to_next_day(&mut engine);
        assert_eq!(engine.state().current_day, 2);
        assert!(engine.state().daily_actions.is_empty());
        assert!(engine.request_action(ActionKind::Shower).is_applied());
    }

    #[test]
    fn test_first_rollover_after_68_ticks() {
        let mut engine = engine_with(always_tails());
        for _ in 0..67 {
            assert!(!engine.tick());
        }
        assert_eq!(engine.format_clock(), "23:45");
        assert!(engine.tick());
        assert_eq!(engine.format_clock(), "00:00");
        assert_eq!(engine.state().current_day, 2);
    }

    #[test]
    fn test_relax_applies_directly_on_tails() {
        let mut engine = engine_with(always_tails());
        let outcome = engine.request_action(ActionKind::Relax);
        assert!(outcome.is_applied());
        assert_eq!(engine.state().score, 12);
        assert_eq!(engine.state().attributes.relationships, 65);
        assert!(engine.pending_outside_event().is_none());
    }

    #[test]
    fn test_relax_redirect_then_resolve() {
        let mut engine = engine_with(always_heads());
        engine.enter_room(RoomId::Kitchen);
        let outcome = engine.request_action(ActionKind::Relax);
        assert!(outcome.is_redirected());
        assert_eq!(outcome.message(), OUTSIDE_PROMPT);
        // Nothing applied yet.
        assert!(!engine.state().daily_actions.contains(ActionKind::Relax));
        assert_eq!(engine.state().score, 0);
        assert_eq!(
            engine.pending_outside_event().map(|p| p.from_room),
            Some(RoomId::Kitchen)
        );

        let resolved = engine.resolve_outside_event().unwrap();
        match resolved {
            Outcome::Applied { outside, points_delta, .. } => {
                assert_eq!(outside, Some(OutsideBranch::Favorable));
                assert_eq!(points_delta, 15);
            }
            other => panic!("expected Applied, got {:?}", other),
        }
        let s = engine.state();
        assert_eq!(s.score, 15);
        assert_eq!(s.attributes.relationships, 65);
        assert_eq!(s.attributes.health, 55);
        assert_eq!(s.current_room, RoomId::Living);
        assert!(s.daily_actions.contains(ActionKind::Relax));
        assert!(engine.pending_outside_event().is_none());
    }

    #[test]
    fn test_unfavorable_outside_event_from_fresh_state() {
        let config = EngineConfig {
            relax_redirect_chance: 1.0,
            outside_favorable_chance: 0.0,
            ..EngineConfig::default()
        };
        let mut engine = DayEngine::seeded(config, 99).unwrap();
        assert!(engine.request_action(ActionKind::Relax).is_redirected());
        engine.resolve_outside_event().unwrap();
        let s = engine.state();
        assert_eq!(s.attributes.sleep_quality, 30);
        assert_eq!(s.attributes.energy, 35);
        assert_eq!(s.score, 0);
        assert_eq!(
            engine.last_outcome().and_then(|o| o.tone()),
            Some(FeedbackTone::Negative)
        );
    }

    #[test]
    fn test_resolve_without_pending_is_error() {
        let mut engine = engine_with(always_heads());
        let before = engine.state().clone();
        assert_eq!(
            engine.resolve_outside_event(),
            Err(EngineError::NoPendingOutsideEvent)
        );
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_resolve_twice_is_error() {
        let mut engine = engine_with(always_heads());
        engine.request_action(ActionKind::Relax);
        assert!(engine.resolve_outside_event().is_ok());
        assert!(engine.resolve_outside_event().is_err());
    }

    #[test]
    fn test_requests_blocked_while_outside() {
        let mut engine = engine_with(always_heads());
        engine.request_action(ActionKind::Relax);
        let before = engine.state().clone();
        let blocked = engine.request_action(ActionKind::Sleep);
        assert_eq!(blocked.reject_reason(), Some(RejectReason::OutsideEventPending));
        assert_eq!(engine.state(), &before);
        engine.resolve_outside_event().unwrap();
        assert!(engine.request_action(ActionKind::Sleep).is_applied());
    }

    #[test]
    fn test_rollover_while_outside_keeps_pending_event() {
        let mut engine = engine_with(always_heads());
        assert!(engine.request_action(ActionKind::Sleep).is_applied());
        assert!(engine.request_action(ActionKind::Relax).is_redirected());
        let requested_at = engine.pending_outside_event().map(|p| p.requested_at);

        tick_to_next_day(&mut engine);
        assert_eq!(engine.state().current_day, 2);
        assert!(engine.state().daily_actions.is_empty());
        assert_eq!(
            engine.pending_outside_event().map(|p| p.requested_at),
            requested_at
        );

        let resolved = engine.resolve_outside_event().unwrap();
        assert!(resolved.is_applied());
        let s = engine.state();
        assert_eq!(s.daily_actions.len(), 1);
        assert!(s.daily_actions.contains(ActionKind::Relax));
        assert_eq!(s.current_room, RoomId::Living);
        // The new day still allows Sleep.
        assert!(engine.request_action(ActionKind::Sleep).is_applied());
    }

    #[test]
    fn test_relax_done_is_rejected_before_rolling() {
        let mut engine = engine_with(always_tails());
        engine.request_action(ActionKind::Relax);
        let second = engine.request_action(ActionKind::Relax);
        assert_eq!(second.reject_reason(), Some(RejectReason::AlreadyDone));
        assert!(engine.pending_outside_event().is_none());
    }

    #[test]
    fn test_unknown_action_id() {
        let mut engine = engine_with(always_tails());
        let before = engine.state().clone();
        let outcome = engine.request_action_by_id("nap");
        assert_eq!(outcome.reject_reason(), Some(RejectReason::UnknownAction));
        assert_eq!(engine.state(), &before);
        assert!(engine.request_action_by_id("drinkWater").is_applied());
        assert_eq!(engine.state().score, 8);
    }

    #[test]
    fn test_location_enforced() {
        let config = EngineConfig {
            enforce_location: true,
            ..EngineConfig::default()
        };
        let mut engine = DayEngine::new(config, always_tails()).unwrap();
        let outcome = engine.request_action(ActionKind::Eat);
        assert_eq!(outcome.reject_reason(), Some(RejectReason::WrongRoom));
        assert_eq!(engine.state().score, 0);

        assert_eq!(engine.navigate(Direction::Right), RoomId::Living);
        assert_eq!(engine.navigate(Direction::Right), RoomId::Kitchen);
        assert!(engine.request_action(ActionKind::Eat).is_applied());
        assert!(engine.request_action(ActionKind::DrinkWater).is_applied());
    }

    #[test]
    fn test_location_ignored_by_default() {
        let mut engine = engine_with(always_tails());
        assert_eq!(engine.state().current_room, RoomId::Bedroom);
        assert!(engine.request_action(ActionKind::Exercise).is_applied());
    }

    #[test]
    fn test_reset_restores_initial_state_and_keeps_preferences() {
        let mut engine = engine_with(always_heads());
        engine.request_action(ActionKind::Sleep);
        engine.request_action(ActionKind::Relax);
        for _ in 0..200 {
            engine.tick();
        }
        engine.navigate(Direction::Left);
        assert!(!engine.toggle_music());

        engine.reset();
        assert_eq!(engine.state(), &SimState::new(engine.config()));
        assert!(engine.pending_outside_event().is_none());
        assert!(engine.last_outcome().is_none());
        assert!(!engine.preferences().music_enabled);
        assert!(engine.preferences().sound_enabled);
    }

    #[test]
    fn test_snapshot_projection() {
        let mut engine = engine_with(always_tails());
        engine.tick();
        let snap = engine.snapshot();
        assert_eq!(snap.clock, "07:15");
        assert_eq!(snap.mood, Mood::Relaxed);
        assert_eq!(snap.score_level, ScoreLevel::Normal);
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["state"]["score"], 0);
        assert_eq!(json["preferences"]["soundEnabled"], true);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            relax_redirect_chance: -0.1,
            ..EngineConfig::default()
        };
        assert!(DayEngine::new(config, always_tails()).is_err());
    }
}
