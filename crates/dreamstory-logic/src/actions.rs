//! Player actions and their fixed effects.
//!
//! Each [`ActionKind`] maps to exactly one static [`ActionEffect`]. The table
//! is data only; resolution lives in [`crate::state::SimState::apply_effect`].

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeDeltas;

/// An action Alex can perform once per simulated day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Sleep,
    Eat,
    Exercise,
    Relax,
    DrinkWater,
    Shower,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::Sleep,
        ActionKind::Eat,
        ActionKind::Exercise,
        ActionKind::Relax,
        ActionKind::DrinkWater,
        ActionKind::Shower,
    ];

    /// Identifier used by the presentation layer (`"drinkWater"`, ...).
    pub fn id(self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Eat => "eat",
            Self::Exercise => "exercise",
            Self::Relax => "relax",
            Self::DrinkWater => "drinkWater",
            Self::Shower => "shower",
        }
    }

    /// Parse a presentation-layer identifier. Exact match only.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    /// Short verb shown on the action button.
    pub fn description(self) -> &'static str {
        match self {
            Self::Sleep => "Dormir",
            Self::Eat => "Comer",
            Self::Exercise => "Exercitar-se",
            Self::Relax => "Relaxar",
            Self::DrinkWater => "Beber água",
            Self::Shower => "Tomar banho",
        }
    }

    /// Whether requesting this action may branch into an outside event.
    pub fn can_go_outside(self) -> bool {
        matches!(self, Self::Relax)
    }

    pub fn effect(self) -> &'static ActionEffect {
        match self {
            Self::Sleep => &SLEEP,
            Self::Eat => &EAT,
            Self::Exercise => &EXERCISE,
            Self::Relax => &RELAX,
            Self::DrinkWater => &DRINK_WATER,
            Self::Shower => &SHOWER,
        }
    }
}

/// Score and attribute changes from performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionEffect {
    pub points_delta: i32,
    pub deltas: AttributeDeltas,
    pub message: &'static str,
}

const SLEEP: ActionEffect = ActionEffect {
    points_delta: 20,
    deltas: AttributeDeltas {
        health: 10,
        energy: 20,
        sleep_quality: 25,
        ..AttributeDeltas::ZERO
    },
    message: "Parabéns! Alex dormiu bem e recuperou energia. Ganhou 20 pontos!",
};

const EAT: ActionEffect = ActionEffect {
    points_delta: 15,
    deltas: AttributeDeltas {
        health: 20,
        energy: 15,
        ..AttributeDeltas::ZERO
    },
    message: "Parabéns! Alex fez uma refeição saudável. Ganhou 15 pontos!",
};

const EXERCISE: ActionEffect = ActionEffect {
    points_delta: 18,
    deltas: AttributeDeltas {
        health: 25,
        energy: -5,
        sleep_quality: 10,
        ..AttributeDeltas::ZERO
    },
    message: "Parabéns! Alex se exercitou e melhorou sua saúde. Ganhou 18 pontos!",
};

const RELAX: ActionEffect = ActionEffect {
    points_delta: 12,
    deltas: AttributeDeltas {
        health: 10,
        energy: 10,
        relationships: 15,
        ..AttributeDeltas::ZERO
    },
    message: "Parabéns! Alex relaxou e reduziu o estresse. Ganhou 12 pontos!",
};

const DRINK_WATER: ActionEffect = ActionEffect {
    points_delta: 8,
    deltas: AttributeDeltas {
        health: 10,
        energy: 5,
        ..AttributeDeltas::ZERO
    },
    message: "Parabéns! Alex se hidratou bem. Ganhou 8 pontos!",
};

const SHOWER: ActionEffect = ActionEffect {
    points_delta: 10,
    deltas: AttributeDeltas {
        health: 15,
        relationships: 10,
        ..AttributeDeltas::ZERO
    },
    message: "Parabéns! Alex tomou banho e se sente renovado. Ganhou 10 pontos!",
};
