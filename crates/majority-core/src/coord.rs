//! Square-grid coordinate system.
//!
//! Tiles live on an unbounded 4-connected grid. `GridCoord` is a plain value
//! type so it can be used directly as a map key; the canonical `"x,y"` text
//! form exists only for canonical serialization (fingerprinting and JSON
//! export), where map keys must be strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A cell on the board grid.
///
/// Derived `Ord` is lexicographic on `(x, y)`, which fixes the iteration
/// order of every position-keyed map in the engine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    /// The cell the first tile is forced onto at game start.
    pub const ORIGIN: GridCoord = GridCoord { x: 0, y: 0 };

    /// Create a new coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four edge-adjacent cells (E, W, N, S).
    pub fn neighbors(&self) -> [GridCoord; 4] {
        [
            GridCoord::new(self.x + 1, self.y),
            GridCoord::new(self.x - 1, self.y),
            GridCoord::new(self.x, self.y + 1),
            GridCoord::new(self.x, self.y - 1),
        ]
    }

    /// Canonical `"x,y"` key used wherever a coordinate must serialize as a
    /// map key.
    pub fn canonical_key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Error parsing a canonical `"x,y"` coordinate key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCoordError(String);

impl fmt::Display for ParseCoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid coordinate key: {:?}", self.0)
    }
}

impl std::error::Error for ParseCoordError {}

impl FromStr for GridCoord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s.split_once(',').ok_or_else(|| ParseCoordError(s.into()))?;
        let x = x.parse().map_err(|_| ParseCoordError(s.into()))?;
        let y = y.parse().map_err(|_| ParseCoordError(s.into()))?;
        Ok(GridCoord::new(x, y))
    }
}

/// Serde adapter serializing a position-keyed map with canonical `"x,y"`
/// string keys, so the same encoding backs both JSON export and the state
/// fingerprint.
pub mod coord_key_map {
    use super::GridCoord;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<V, S>(map: &BTreeMap<GridCoord, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        V: Serialize,
        S: Serializer,
    {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (coord, value) in map {
            out.serialize_entry(&coord.canonical_key(), value)?;
        }
        out.end()
    }

    pub fn deserialize<'de, V, D>(deserializer: D) -> Result<BTreeMap<GridCoord, V>, D::Error>
    where
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, V>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, value)| {
                key.parse::<GridCoord>()
                    .map(|coord| (coord, value))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
