//! Alex's wellness attributes, attribute deltas, and the derived mood.
//!
//! All attribute values are integers in [0, 100]. Deltas are added first and
//! the sum is clamped afterwards, so a large negative delta lands on 0 and a
//! large positive one lands on 100.

use serde::{Deserialize, Serialize};

/// Lowest value any attribute can hold.
pub const ATTRIBUTE_MIN: u8 = 0;

/// Highest value any attribute can hold.
pub const ATTRIBUTE_MAX: u8 = 100;

/// Value every attribute starts at in a fresh session.
pub const ATTRIBUTE_START: u8 = 50;

/// The five tracked attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Health,
    Energy,
    SleepQuality,
    Relationships,
    /// Carried in the state but no rule reads or writes it.
    Productivity,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Health,
        Attribute::Energy,
        Attribute::SleepQuality,
        Attribute::Relationships,
        Attribute::Productivity,
    ];
}

/// Snapshot of Alex's attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub health: u8,
    pub energy: u8,
    pub sleep_quality: u8,
    pub relationships: u8,
    pub productivity: u8,
}

impl Attributes {
    /// Every attribute set to `value`, clamped to the valid range.
    pub fn uniform(value: u8) -> Self {
        let v = value.min(ATTRIBUTE_MAX);
        Self {
            health: v,
            energy: v,
            sleep_quality: v,
            relationships: v,
            productivity: v,
        }
    }

    pub fn get(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::Health => self.health,
            Attribute::Energy => self.energy,
            Attribute::SleepQuality => self.sleep_quality,
            Attribute::Relationships => self.relationships,
            Attribute::Productivity => self.productivity,
        }
    }

    /// Apply `deltas`, clamping each sum to [0, 100].
    pub fn apply(&mut self, deltas: &AttributeDeltas) {
        self.health = clamp_add(self.health, deltas.health);
        self.energy = clamp_add(self.energy, deltas.energy);
        self.sleep_quality = clamp_add(self.sleep_quality, deltas.sleep_quality);
        self.relationships = clamp_add(self.relationships, deltas.relationships);
        self.productivity = clamp_add(self.productivity, deltas.productivity);
    }

    /// Mean of the four mood-bearing attributes (productivity excluded).
    pub fn mood_average(&self) -> f32 {
        let sum = u32::from(self.health)
            + u32::from(self.energy)
            + u32::from(self.sleep_quality)
            + u32::from(self.relationships);
        sum as f32 / 4.0
    }

    /// Mood derived from the current values.
    pub fn mood(&self) -> Mood {
        Mood::from_attributes(self)
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::uniform(ATTRIBUTE_START)
    }
}

/// Signed change to each attribute. Missing entries are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeDeltas {
    pub health: i32,
    pub energy: i32,
    pub sleep_quality: i32,
    pub relationships: i32,
    pub productivity: i32,
}

impl AttributeDeltas {
    pub const ZERO: AttributeDeltas = AttributeDeltas {
        health: 0,
        energy: 0,
        sleep_quality: 0,
        relationships: 0,
        productivity: 0,
    };

    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Health => self.health,
            Attribute::Energy => self.energy,
            Attribute::SleepQuality => self.sleep_quality,
            Attribute::Relationships => self.relationships,
            Attribute::Productivity => self.productivity,
        }
    }
}

fn clamp_add(value: u8, delta: i32) -> u8 {
    let sum = i32::from(value)
        .saturating_add(delta)
        .clamp(i32::from(ATTRIBUTE_MIN), i32::from(ATTRIBUTE_MAX));
    // In range after the clamp.
    sum as u8
}

/// Alex's mood, a display-only summary of the attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Average >= 70.
    Happy,
    /// Average 50..70.
    Relaxed,
    /// Average 30..50.
    Tired,
    /// Average < 30.
    Stressed,
}

impl Mood {
    pub fn from_average(average: f32) -> Self {
        if average >= 70.0 {
            Self::Happy
        } else if average >= 50.0 {
            Self::Relaxed
        } else if average >= 30.0 {
            Self::Tired
        } else {
            Self::Stressed
        }
    }

    pub fn from_attributes(attributes: &Attributes) -> Self {
        Self::from_average(attributes.mood_average())
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Happy => "😊",
            Self::Relaxed => "😌",
            Self::Tired => "😴",
            Self::Stressed => "😰",
        }
    }
}

/// Coarse band for a single attribute value, used to colour stat bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatLevel {
    Good,
    Fair,
    Poor,
}

impl StatLevel {
    pub fn from_value(value: u8) -> Self {
        if value >= 70 {
            Self::Good
        } else if value >= 40 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}
