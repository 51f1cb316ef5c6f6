//! Integer identifiers for stored entities.
//!
//! Each entity kind gets its own newtype so a deck id can never be used to
//! look up a player (and vice versa).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// The id following this one, or `None` past `u32::MAX`.
            pub fn next(self) -> Option<Self> {
                self.0.checked_add(1).map(Self)
            }

            /// Next free id for a collection: one past the largest existing id.
            pub fn after<I: IntoIterator<Item = Self>>(existing: I) -> Option<Self> {
                existing.into_iter().max().map_or(Some(Self(1)), Self::next)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }
    };
}

entity_id!(
    /// Identifies a player (a person, not a deck).
    PlayerId
);

entity_id!(
    /// Identifies a deck.
    DeckId
);

entity_id!(
    /// Identifies a recorded game.
    GameId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(format!("{}", DeckId(42)), "42");
        assert_eq!(format!("{}", PlayerId(7)), "7");
    }

    #[test]
    fn test_id_serialization_is_transparent() {
        let json = serde_json::to_string(&GameId(12)).unwrap();
        assert_eq!(json, "12");
        let parsed: GameId = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, GameId(12));
    }

    #[test]
    fn test_id_ordering() {
        let mut ids = vec![DeckId(3), DeckId(1), DeckId(2)];
        ids.sort();
        assert_eq!(ids, vec![DeckId(1), DeckId(2), DeckId(3)]);
    }

    #[test]
    fn test_id_next() {
        assert_eq!(PlayerId(4).next(), Some(PlayerId(5)));
        assert_eq!(PlayerId(u32::MAX).next(), None);
    }

    #[test]
    fn test_id_after_existing() {
        assert_eq!(
            DeckId::after(vec![DeckId(2), DeckId(9), DeckId(4)]),
            Some(DeckId(10))
        );
        assert_eq!(DeckId::after(Vec::new()), Some(DeckId(1)));
        assert_eq!(DeckId::after(vec![DeckId(1), DeckId(u32::MAX)]), None);
    }

    #[test]
    fn test_id_default_is_zero() {
        assert_eq!(PlayerId::default(), PlayerId(0));
    }
}
