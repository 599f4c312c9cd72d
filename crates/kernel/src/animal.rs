use serde::{Deserialize, Serialize};
use zoo_common::{Species, Thresholds};

/// Position of an animal in the population, assigned in stocking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimalId(pub u32);

impl std::fmt::Display for AnimalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single simulated animal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    pub species: Species,
    /// Hunger gained per tick. Never zero.
    pub decay_rate: u32,
    pub hunger: u32,
    pub dead: bool,
}

/// Notification produced when a tick pushes an animal past a threshold.
///
/// Serialized with a `kind` tag (`"dying"` / `"dead"`) so a JSON line reads
/// `{"kind":"dead","tick":4,"animal":0,"species":"otter","hunger":40}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LifeEvent {
    /// Hunger is above the warning threshold. Repeats every tick until death.
    Dying {
        tick: u64,
        animal: AnimalId,
        species: Species,
        hunger: u32,
    },
    /// Hunger crossed the death threshold. Fires exactly once per animal.
    Dead {
        tick: u64,
        animal: AnimalId,
        species: Species,
        hunger: u32,
    },
}

impl LifeEvent {
    pub fn species(&self) -> &str {
        match self {
            Self::Dying { species, .. } | Self::Dead { species, .. } => species,
        }
    }

    pub fn animal(&self) -> AnimalId {
        match self {
            Self::Dying { animal, .. } | Self::Dead { animal, .. } => *animal,
        }
    }

    pub fn tick(&self) -> u64 {
        match self {
            Self::Dying { tick, .. } | Self::Dead { tick, .. } => *tick,
        }
    }

    pub fn is_death(&self) -> bool {
        matches!(self, Self::Dead { .. })
    }
}

impl Animal {
    pub fn new(id: AnimalId, species: impl Into<Species>, decay_rate: u32) -> Self {
        Self {
            id,
            species: species.into(),
            decay_rate: decay_rate.max(1),
            hunger: 0,
            dead: false,
        }
    }

    /// Advance this animal by one tick.
    ///
    /// Dead animals are untouched and report nothing. For live ones the death
    /// check wins over the warning when both thresholds are crossed at once, and
    /// hunger is stored even on the tick that kills.
    pub fn advance(&mut self, tick: u64, thresholds: &Thresholds) -> Option<LifeEvent> {
        if self.dead {
            return None;
        }
        let hunger = self.hunger.saturating_add(self.decay_rate);
        let event = if thresholds.is_fatal(hunger) {
            self.dead = true;
            Some(LifeEvent::Dead {
                tick,
                animal: self.id,
                species: self.species.clone(),
                hunger,
            })
        } else if thresholds.is_starving(hunger) {
            Some(LifeEvent::Dying {
                tick,
                animal: self.id,
                species: self.species.clone(),
                hunger,
            })
        } else {
            None
        };
        self.hunger = hunger;
        event
    }
}
