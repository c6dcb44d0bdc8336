use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Highest possible adjacency count on an 8-connected grid.
pub const MAX_ADJACENT_BOMBS: u8 = 8;

/// String sentinel used for bomb cells in the textual representation.
const BOMB_LITERAL: &str = "BOMB";

/// Player-visible state of a cell. The only field of a cell that ever
/// changes after generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CellState {
    Initial,
    Opened,
    Flagged,
}

impl CellState {
    pub const fn is_opened(self) -> bool {
        matches!(self, Self::Opened)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Initial
    }
}

/// Fixed content of a cell: either the count of adjacent bombs or a bomb.
///
/// Serializes as a bare integer or the literal string `"BOMB"`, so a grid
/// round-trips through the same textual shape the query-string variant
/// carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CellValue {
    Count(u8),
    Bomb,
}

impl CellValue {
    pub const fn is_bomb(self) -> bool {
        matches!(self, Self::Bomb)
    }

    pub const fn is_zero(self) -> bool {
        matches!(self, Self::Count(0))
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(count) => serializer.serialize_u8(*count),
            Self::Bomb => serializer.serialize_str(BOMB_LITERAL),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CellValueVisitor;

        impl<'de> Visitor<'de> for CellValueVisitor {
            type Value = CellValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "an adjacency count (0-{}) or \"{}\"", MAX_ADJACENT_BOMBS, BOMB_LITERAL)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                if value <= MAX_ADJACENT_BOMBS.into() {
                    Ok(CellValue::Count(value as u8))
                } else {
                    Err(E::invalid_value(de::Unexpected::Unsigned(value), &self))
                }
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                u64::try_from(value)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
                    .and_then(|value| self.visit_u64(value))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                if value == BOMB_LITERAL {
                    Ok(CellValue::Bomb)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(value), &self))
                }
            }
        }

        deserializer.deserialize_any(CellValueVisitor)
    }
}

/// One square of the minefield.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub state: CellState,
    pub value: CellValue,
}

impl Cell {
    pub const fn bomb() -> Self {
        Self {
            state: CellState::Initial,
            value: CellValue::Bomb,
        }
    }

    pub const fn count(count: u8) -> Self {
        Self {
            state: CellState::Initial,
            value: CellValue::Count(count),
        }
    }

    pub const fn is_bomb(self) -> bool {
        self.value.is_bomb()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_value_serializes_as_count_or_sentinel() {
        assert_eq!(serde_json::to_string(&CellValue::Count(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&CellValue::Bomb).unwrap(), "\"BOMB\"");
    }

    #[test]
    fn cell_value_round_trips() {
        for value in [CellValue::Count(0), CellValue::Count(8), CellValue::Bomb] {
            let json = serde_json::to_string(&value).unwrap();
            assert_eq!(serde_json::from_str::<CellValue>(&json).unwrap(), value);
        }
    }

    #[test]
    fn cell_value_rejects_out_of_range_counts() {
        assert!(serde_json::from_str::<CellValue>("9").is_err());
        assert!(serde_json::from_str::<CellValue>("-1").is_err());
        assert!(serde_json::from_str::<CellValue>("\"MINE\"").is_err());
    }

    #[test]
    fn cell_state_uses_uppercase_literals() {
        assert_eq!(serde_json::to_string(&CellState::Initial).unwrap(), "\"INITIAL\"");
        assert_eq!(serde_json::to_string(&CellState::Opened).unwrap(), "\"OPENED\"");
        assert_eq!(serde_json::to_string(&CellState::Flagged).unwrap(), "\"FLAGGED\"");
    }

    #[test]
    fn cell_serializes_with_state_and_value_fields() {
        let cell = Cell::count(2);
        assert_eq!(
            serde_json::to_string(&cell).unwrap(),
            r#"{"state":"INITIAL","value":2}"#
        );
    }
}
