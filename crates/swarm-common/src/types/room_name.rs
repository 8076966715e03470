//! RoomName - grid-addressed room identifiers
//!
//! Rooms live on an unbounded grid addressed as `[WE]<x>[NS]<y>`. The two
//! axes are signed with a zero-boundary flip: `W0` sits immediately west of
//! `E0`, and `N0` immediately north of `S0`. Internally:
//!
//! ```text
//! E x -> x          W x -> -x - 1
//! S y -> y          N y -> -y - 1
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RoomNameError;

/// Largest sector index accepted on either axis
pub const MAX_SECTOR_INDEX: u32 = 1024;

/// Signed grid coordinate of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomCoord {
    /// West/east axis (negative = west)
    pub x: i32,
    /// North/south axis (negative = north)
    pub y: i32,
}

impl RoomCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four orthogonal neighbors, in north, east, south, west order
    pub fn orthogonal(self) -> [RoomCoord; 4] {
        [
            RoomCoord::new(self.x, self.y - 1),
            RoomCoord::new(self.x + 1, self.y),
            RoomCoord::new(self.x, self.y + 1),
            RoomCoord::new(self.x - 1, self.y),
        ]
    }
}

/// Validated, normalized (upper-case) room name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomName(String);

impl RoomName {
    /// Parse and normalize a room name
    pub fn parse(raw: &str) -> Result<Self, RoomNameError> {
        let coord = parse_coord(raw)?;
        Self::from_coord(coord)
    }

    /// Build the canonical name for a coordinate
    pub fn from_coord(coord: RoomCoord) -> Result<Self, RoomNameError> {
        let (h, x) = if coord.x < 0 {
            ('W', -(coord.x as i64) - 1)
        } else {
            ('E', coord.x as i64)
        };
        let (v, y) = if coord.y < 0 {
            ('N', -(coord.y as i64) - 1)
        } else {
            ('S', coord.y as i64)
        };
        let name = format!("{h}{x}{v}{y}");
        if x > MAX_SECTOR_INDEX as i64 || y > MAX_SECTOR_INDEX as i64 {
            return Err(RoomNameError::OutOfRange(name));
        }
        Ok(Self(name))
    }

    /// Grid coordinate of this room
    pub fn coord(&self) -> RoomCoord {
        // Names are validated on construction, so this cannot fail.
        parse_coord(&self.0).unwrap_or(RoomCoord::new(0, 0))
    }

    /// Grid-adjacent room names (up to four; fewer at the edge of the
    /// addressable range)
    pub fn neighbors(&self) -> Vec<RoomName> {
        self.coord()
            .orthogonal()
            .into_iter()
            .filter_map(|c| RoomName::from_coord(c).ok())
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Parse `raw` and return its grid-adjacent room names.
pub fn neighbor_names(raw: &str) -> Result<Vec<RoomName>, RoomNameError> {
    Ok(RoomName::parse(raw)?.neighbors())
}

fn parse_coord(raw: &str) -> Result<RoomCoord, RoomNameError> {
    if raw.is_empty() {
        return Err(RoomNameError::Empty);
    }
    let upper = raw.to_ascii_uppercase();
    let invalid = || RoomNameError::InvalidFormat(raw.to_string());

    let h = upper.chars().next().ok_or_else(invalid)?;
    if h != 'W' && h != 'E' {
        return Err(invalid());
    }
    let split = upper[1..]
        .find(|c| c == 'N' || c == 'S')
        .map(|i| i + 1)
        .ok_or_else(invalid)?;
    let x_part = &upper[1..split];
    let v = upper[split..].chars().next().ok_or_else(invalid)?;
    let y_part = &upper[split + 1..];

    let x = parse_index(x_part, raw)?;
    let y = parse_index(y_part, raw)?;

    let x = if h == 'W' { -(x as i32) - 1 } else { x as i32 };
    let y = if v == 'N' { -(y as i32) - 1 } else { y as i32 };
    Ok(RoomCoord::new(x, y))
}

fn parse_index(part: &str, raw: &str) -> Result<u32, RoomNameError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RoomNameError::InvalidFormat(raw.to_string()));
    }
    let value: u32 = part
        .parse()
        .map_err(|_| RoomNameError::OutOfRange(raw.to_string()))?;
    if value > MAX_SECTOR_INDEX {
        return Err(RoomNameError::OutOfRange(raw.to_string()));
    }
    Ok(value)
}

impl FromStr for RoomName {
    type Err = RoomNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomName::parse(s)
    }
}

impl TryFrom<String> for RoomName {
    type Error = RoomNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RoomName::parse(&value)
    }
}

impl From<RoomName> for String {
    fn from(name: RoomName) -> Self {
        name.0
    }
}

impl AsRef<str> for RoomName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
