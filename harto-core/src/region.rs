//! Region configurations: daily reset hour and time-slot boundaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    #[default]
    Sea,
    Tw,
}

/// One of the four in-game time-of-day slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [TimeSlot::Dawn, TimeSlot::Day, TimeSlot::Dusk, TimeSlot::Night];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeSlot::Dawn => "dawn",
            TimeSlot::Day => "day",
            TimeSlot::Dusk => "dusk",
            TimeSlot::Night => "night",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Start hours of each slot, in slot order (dawn, day, dusk, night).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotStarts {
    pub dawn: u32,
    pub day: u32,
    pub dusk: u32,
    pub night: u32,
}

impl Region {
    pub const ALL: [Region; 2] = [Region::Sea, Region::Tw];

    /// Server hour at which the in-game day rolls over.
    pub fn reset_hour(self) -> u32 {
        match self {
            Region::Sea => 7,
            Region::Tw => 6,
        }
    }

    pub fn slot_starts(self) -> SlotStarts {
        match self {
            Region::Sea => SlotStarts { dawn: 7, day: 13, dusk: 19, night: 1 },
            Region::Tw => SlotStarts { dawn: 6, day: 12, dusk: 18, night: 0 },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Sea => "SEA",
            Region::Tw => "TW",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sea" => Ok(Region::Sea),
            "tw" => Ok(Region::Tw),
            other => anyhow::bail!("unknown region '{other}' (expected sea or tw)"),
        }
    }
}
