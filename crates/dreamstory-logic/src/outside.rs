//! Outside events: the alternate resolution of a Relax request.
//!
//! Sometimes relaxing means Alex goes out with friends. The outcome is a
//! single coin flip between a favorable and an unfavorable branch. Rolling
//! the branch and applying it are separate so tests can pin either step.

use rand::distributions::{Bernoulli, Distribution};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;
use crate::attributes::{AttributeDeltas, Mood};
use crate::rooms::RoomId;
use crate::state::SimState;

/// Shown when a Relax request is redirected outside.
pub const OUTSIDE_PROMPT: &str = "Alex foi para a balada com os amigos.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutsideBranch {
    Favorable,
    Unfavorable,
}

/// Score and attribute changes for an outside branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutsideEffect {
    pub points_delta: i32,
    pub deltas: AttributeDeltas,
    pub message: &'static str,
}

const FAVORABLE: OutsideEffect = OutsideEffect {
    points_delta: 15,
    deltas: AttributeDeltas {
        health: 5,
        relationships: 15,
        ..AttributeDeltas::ZERO
    },
    message: "Parabéns! Alex fez novos amigos e se divertiu! Ganhou 15 pontos!",
};

const UNFAVORABLE: OutsideEffect = OutsideEffect {
    points_delta: -10,
    deltas: AttributeDeltas {
        energy: -15,
        sleep_quality: -20,
        ..AttributeDeltas::ZERO
    },
    message: "Oh não! Alex ficou cansado e perdeu qualidade de sono. Sua pontuação caiu 10 pontos!",
};

impl OutsideBranch {
    /// Draw a branch; `favorable` is the chance of the favorable one.
    pub fn roll(rng: &mut impl Rng, favorable: &Bernoulli) -> Self {
        if favorable.sample(rng) {
            Self::Favorable
        } else {
            Self::Unfavorable
        }
    }

    pub fn effect(self) -> &'static OutsideEffect {
        match self {
            Self::Favorable => &FAVORABLE,
            Self::Unfavorable => &UNFAVORABLE,
        }
    }

    pub fn is_favorable(self) -> bool {
        matches!(self, Self::Favorable)
    }
}

/// Apply `branch` to `state`: attribute and score changes, Relax marked
/// done, and Alex back at `return_room`. Returns the new mood.
pub fn apply_branch(state: &mut SimState, branch: OutsideBranch, return_room: RoomId) -> Mood {
    let effect = branch.effect();
    let mood = state.apply_effect(ActionKind::Relax, &effect.deltas, effect.points_delta);
    state.current_room = return_room;
    mood
}
