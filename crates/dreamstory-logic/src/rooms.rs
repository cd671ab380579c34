//! The fixed room catalog of Alex's home and room-to-room navigation.
//!
//! Rooms are ordered; navigating left from the first room wraps to the last
//! and vice versa. Every action is offered by exactly one room.

use serde::{Deserialize, Serialize};

use crate::actions::ActionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomId {
    Bedroom,
    Living,
    Kitchen,
    Gym,
    Bathroom,
}

/// Navigation direction through the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

/// A clickable fixture in a room that triggers an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomAction {
    pub kind: ActionKind,
    /// Fixture label ("Cama", "Sofá", ...).
    pub label: &'static str,
    /// Position in percent of the room view.
    pub position: (u8, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub name: &'static str,
    pub description: &'static str,
    pub actions: &'static [RoomAction],
}

impl Room {
    pub fn offers(&self, kind: ActionKind) -> bool {
        self.actions.iter().any(|a| a.kind == kind)
    }
}

pub const ROOMS: [Room; 5] = [
    Room {
        id: RoomId::Bedroom,
        name: "Quarto",
        description: "O quarto aconchegante de Alex com uma cama confortável",
        actions: &[RoomAction {
            kind: ActionKind::Sleep,
            label: "Cama",
            position: (70, 60),
        }],
    },
    Room {
        id: RoomId::Living,
        name: "Sala de Estar",
        description: "Sala confortável com sofá e TV para relaxar",
        actions: &[RoomAction {
            kind: ActionKind::Relax,
            label: "Sofá",
            position: (30, 50),
        }],
    },
    Room {
        id: RoomId::Kitchen,
        name: "Cozinha",
        description: "Cozinha equipada para preparar refeições saudáveis",
        actions: &[
            RoomAction {
                kind: ActionKind::Eat,
                label: "Mesa",
                position: (50, 40),
            },
            RoomAction {
                kind: ActionKind::DrinkWater,
                label: "Água",
                position: (80, 30),
            },
        ],
    },
    Room {
        id: RoomId::Gym,
        name: "Academia",
        description: "Academia bem equipada para exercícios",
        actions: &[RoomAction {
            kind: ActionKind::Exercise,
            label: "Equipamentos",
            position: (60, 50),
        }],
    },
    Room {
        id: RoomId::Bathroom,
        name: "Banheiro",
        description: "Banheiro limpo e relaxante",
        actions: &[RoomAction {
            kind: ActionKind::Shower,
            label: "Chuveiro",
            position: (40, 60),
        }],
    },
];

impl RoomId {
    pub fn index(self) -> usize {
        match self {
            Self::Bedroom => 0,
            Self::Living => 1,
            Self::Kitchen => 2,
            Self::Gym => 3,
            Self::Bathroom => 4,
        }
    }

    pub fn room(self) -> &'static Room {
        &ROOMS[self.index()]
    }

    /// The neighbouring room in `direction`, wrapping at either end.
    pub fn step(self, direction: Direction) -> RoomId {
        let len = ROOMS.len();
        let next = match direction {
            Direction::Left => (self.index() + len - 1) % len,
            Direction::Right => (self.index() + 1) % len,
        };
        ROOMS[next].id
    }
}

/// The room that offers `kind`.
pub fn room_for_action(kind: ActionKind) -> RoomId {
    match kind {
        ActionKind::Sleep => RoomId::Bedroom,
        ActionKind::Relax => RoomId::Living,
        ActionKind::Eat | ActionKind::DrinkWater => RoomId::Kitchen,
        ActionKind::Exercise => RoomId::Gym,
        ActionKind::Shower => RoomId::Bathroom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_indices_match() {
        for (i, room) in ROOMS.iter().enumerate() {
            assert_eq!(room.id.index(), i);
            assert_eq!(room.id.room().id, room.id);
        }
    }

    #[test]
    fn test_every_action_in_exactly_one_room() {
        for kind in ActionKind::ALL {
            let offering: Vec<_> = ROOMS.iter().filter(|r| r.offers(kind)).collect();
            assert_eq!(offering.len(), 1, "{:?}", kind);
            assert_eq!(offering[0].id, room_for_action(kind));
        }
    }

    #[test]
    fn test_kitchen_offers_two_actions() {
        let kitchen = RoomId::Kitchen.room();
        assert!(kitchen.offers(ActionKind::Eat));
        assert!(kitchen.offers(ActionKind::DrinkWater));
        assert!(!kitchen.offers(ActionKind::Sleep));
    }

    #[test]
    fn test_navigate_right_wraps() {
        assert_eq!(RoomId::Bedroom.step(Direction::Right), RoomId::Living);
        assert_eq!(RoomId::Bathroom.step(Direction::Right), RoomId::Bedroom);
    }

    #[test]
    fn test_navigate_left_wraps() {
        assert_eq!(RoomId::Bedroom.step(Direction::Left), RoomId::Bathroom);
        assert_eq!(RoomId::Kitchen.step(Direction::Left), RoomId::Living);
    }

    #[test]
    fn test_full_loop_returns_home() {
        let mut room = RoomId::Gym;
        for _ in 0..ROOMS.len() {
            room = room.step(Direction::Right);
        }
        assert_eq!(room, RoomId::Gym);
    }
}
