use serde::{Deserialize, Serialize};

/// Category label shared by every animal stocked from the same config entry.
pub type Species = String;

/// Hunger levels at which an animal starts complaining and at which it dies.
///
/// Both comparisons are strict: an animal at exactly `dying` hunger is still fine,
/// and one at exactly `dead` hunger is dying but alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub dying: u32,
    pub dead: u32,
}

impl Thresholds {
    pub const fn new(dying: u32, dead: u32) -> Self {
        Self { dying, dead }
    }

    /// Hunger strictly above the death threshold.
    pub fn is_fatal(&self, hunger: u32) -> bool {
        hunger > self.dead
    }

    /// Hunger strictly above the warning threshold.
    pub fn is_starving(&self, hunger: u32) -> bool {
        hunger > self.dying
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(20, 30)
    }
}
