//! Identifier types.
//!
//! Two families live here:
//!
//! - **Document ids** ([`ElementId`], [`LaneId`]) are what the OpenDRIVE
//!   document itself uses.  Road and junction ids are opaque strings; lane
//!   ids are small signed integers whose sign encodes the side of the road.
//! - **Arena indices** ([`RoadIdx`], [`JunctionIdx`]) are assigned when a
//!   validated network is built.  They are `Copy + Ord + Hash` and index
//!   directly into the network's `Vec`s via `.index()`.

use std::fmt;

/// Generate a typed arena index around a primitive integer.
macro_rules! typed_idx {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_idx! {
    /// Position of a road in a validated network's road arena.
    pub struct RoadIdx(u32);
}

typed_idx! {
    /// Position of a junction in a validated network's junction arena.
    pub struct JunctionIdx(u32);
}

// ── ElementId ─────────────────────────────────────────────────────────────────

/// Opaque document identifier of a road, junction, controller or signal.
///
/// The document uses `-1` (and, in the wild, an empty string) to mean "no
/// element"; [`ElementId::is_none_sentinel`] recognises both.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElementId(String);

impl ElementId {
    /// The canonical "no link" sentinel.
    pub const NONE_SENTINEL: &'static str = "-1";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for `-1` or an all-whitespace id.
    pub fn is_none_sentinel(&self) -> bool {
        let trimmed = self.0.trim();
        trimmed.is_empty() || trimmed == Self::NONE_SENTINEL
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::borrow::Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── LaneId ────────────────────────────────────────────────────────────────────

/// Signed lane id: positive = left of the reference line, negative = right,
/// `0` = the center lane.
///
/// Lane `n` physically borders lanes `n - 1` and `n + 1` (skipping over 0
/// only through the center lane itself), so ids double as lateral positions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LaneId(pub i32);

impl LaneId {
    pub const CENTER: LaneId = LaneId(0);

    #[inline]
    pub fn is_center(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_left(self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub fn is_right(self) -> bool {
        self.0 < 0
    }

    /// The neighbour one step closer to the center lane, or `None` for the
    /// center lane itself.
    #[inline]
    pub fn inward(self) -> Option<LaneId> {
        match self.0.signum() {
            0 => None,
            sign => Some(LaneId(self.0 - sign)),
        }
    }

    /// Distance (in lanes) from the center lane.
    #[inline]
    pub fn rank(self) -> u32 {
        self.0.unsigned_abs()
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lane {}", self.0)
    }
}

impl From<i32> for LaneId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}
