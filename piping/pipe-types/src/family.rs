//! Component family tags.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The closed set of component families.
///
/// Each family statically declares whether it exposes ports and whether it
/// is a straight member that can be trimmed along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ComponentFamily {
    /// Straight pipe.
    Pipe,
    /// Butt-weld elbow (bend).
    Elbow,
    /// Socket-weld elbow.
    SocketElbow,
    /// Butt-weld tee.
    Tee,
    /// Socket-weld tee.
    SocketTee,
    /// Concentric or eccentric reducer.
    Reducer,
    /// Butt-weld cap.
    Cap,
    /// Socket-weld cap.
    SocketCap,
    /// Flange of any type.
    Flange,
    /// Spiral-wound gasket.
    Gasket,
    /// Inline valve.
    Valve,
    /// Branch outlet fitting.
    Outlet,
    /// U-bolt pipe support.
    UBolt,
    /// Threaded terminal adapter.
    TerminalAdapter,
    /// Extruded structural section.
    Beam,
    /// Tank shell.
    Shell,
}

impl ComponentFamily {
    /// Every family, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Pipe,
        Self::Elbow,
        Self::SocketElbow,
        Self::Tee,
        Self::SocketTee,
        Self::Reducer,
        Self::Cap,
        Self::SocketCap,
        Self::Flange,
        Self::Gasket,
        Self::Valve,
        Self::Outlet,
        Self::UBolt,
        Self::TerminalAdapter,
        Self::Beam,
        Self::Shell,
    ];

    /// Human-readable family name, also used as an ID prefix.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pipe => "Pipe",
            Self::Elbow => "Elbow",
            Self::SocketElbow => "SocketElbow",
            Self::Tee => "Tee",
            Self::SocketTee => "SocketTee",
            Self::Reducer => "Reducer",
            Self::Cap => "Cap",
            Self::SocketCap => "SocketCap",
            Self::Flange => "Flange",
            Self::Gasket => "Gasket",
            Self::Valve => "Valve",
            Self::Outlet => "Outlet",
            Self::UBolt => "UBolt",
            Self::TerminalAdapter => "TerminalAdapter",
            Self::Beam => "Beam",
            Self::Shell => "Shell",
        }
    }

    /// Returns `true` if components of this family carry ports.
    #[must_use]
    pub const fn has_ports(self) -> bool {
        !matches!(self, Self::Shell)
    }

    /// Returns `true` for straight members that can be trimmed along local Z.
    #[must_use]
    pub const fn is_straight(self) -> bool {
        matches!(self, Self::Pipe | Self::Beam)
    }

    /// Returns `true` for families whose geometry is a bend between two ports.
    #[must_use]
    pub const fn is_bend(self) -> bool {
        matches!(self, Self::Elbow | Self::SocketElbow)
    }

    /// Port that mates onto an existing port when the component is inserted.
    ///
    /// Flanges mate their weld end; everything else mates port 0.
    #[must_use]
    pub const fn insertion_port(self) -> usize {
        match self {
            Self::Flange => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for ComponentFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
