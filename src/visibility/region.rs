//! Region keys and element handles.

use std::fmt;
use std::str::FromStr;

use slotmap::new_key_type;

new_key_type! {
    /// Handle of one mounted region element. A region that unmounts and
    /// mounts again gets a fresh handle.
    pub struct ElementId;
}

/// A named, independently mountable section of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionKey {
    Header,
    Form,
    Error,
    Diagnoses,
    Recommendations,
    Disclaimer,
}

impl RegionKey {
    /// Every key, in page order.
    pub const ALL: [RegionKey; 6] = [
        RegionKey::Header,
        RegionKey::Form,
        RegionKey::Error,
        RegionKey::Diagnoses,
        RegionKey::Recommendations,
        RegionKey::Disclaimer,
    ];

    /// The stable string key.
    pub fn as_str(self) -> &'static str {
        match self {
            RegionKey::Header => "header",
            RegionKey::Form => "form",
            RegionKey::Error => "error",
            RegionKey::Diagnoses => "diagnoses",
            RegionKey::Recommendations => "recommendations",
            RegionKey::Disclaimer => "disclaimer",
        }
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no region.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown region key: {0}")]
pub struct UnknownRegion(pub String);

impl FromStr for RegionKey {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RegionKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownRegion(s.to_owned()))
    }
}
