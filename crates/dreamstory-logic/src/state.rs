//! The per-session simulation state.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;
use crate::attributes::{AttributeDeltas, Attributes, Mood};
use crate::clock::GameClock;
use crate::config::EngineConfig;
use crate::rooms::RoomId;

/// Actions completed since the last day rollover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyActions(BTreeSet<ActionKind>);

impl DailyActions {
    pub fn contains(&self, kind: ActionKind) -> bool {
        self.0.contains(&kind)
    }

    /// Mark `kind` done. Returns `false` if it already was.
    pub fn mark(&mut self, kind: ActionKind) -> bool {
        self.0.insert(kind)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All six actions done.
    pub fn is_complete(&self) -> bool {
        self.0.len() == ActionKind::ALL.len()
    }

    pub fn remaining(&self) -> impl Iterator<Item = ActionKind> + '_ {
        ActionKind::ALL
            .into_iter()
            .filter(move |k| !self.contains(*k))
    }
}

/// Band used to colour the score display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreLevel {
    High,
    Normal,
}

impl ScoreLevel {
    pub fn from_score(score: u32) -> Self {
        if score >= 100 {
            Self::High
        } else {
            Self::Normal
        }
    }
}

/// Everything the engine owns about one play session.
///
/// Mood is not stored; [`SimState::mood`] derives it from the attributes on
/// every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimState {
    pub score: u32,
    pub current_day: u32,
    pub clock: GameClock,
    pub attributes: Attributes,
    pub daily_actions: DailyActions,
    pub current_room: RoomId,
    pub last_action_at: Option<NaiveDateTime>,
}

impl SimState {
    /// Fresh session state for `config`.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            score: 0,
            current_day: 1,
            clock: GameClock::new(config.start_time),
            attributes: Attributes::uniform(config.initial_attribute),
            daily_actions: DailyActions::default(),
            current_room: config.start_room,
            last_action_at: None,
        }
    }

    pub fn mood(&self) -> Mood {
        self.attributes.mood()
    }

    /// Advance the clock; on a date change bump the day and clear the
    /// action set. Returns `true` on rollover.
    pub fn advance_clock(&mut self, minutes: u32) -> bool {
        let crossed = self.clock.advance(minutes);
        if crossed {
            self.current_day = self.current_day.saturating_add(1);
            self.daily_actions.clear();
        }
        crossed
    }

    /// Add `deltas` to the attributes (clamped) and `points` to the score
    /// (floored at zero), then mark `kind` done for today.
    pub fn apply_effect(&mut self, kind: ActionKind, deltas: &AttributeDeltas, points: i32) -> Mood {
        self.attributes.apply(deltas);
        self.score = self.score.saturating_add_signed(points);
        self.daily_actions.mark(kind);
        self.last_action_at = Some(self.clock.now());
        self.mood()
    }

    pub fn score_level(&self) -> ScoreLevel {
        ScoreLevel::from_score(self.score)
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
