use crate::animal::{Animal, AnimalId, LifeEvent};
use crate::rng::Draw;
use serde::{Deserialize, Serialize};
use zoo_common::{Species, Thresholds, ZooConfig};

/// Largest decay rate a stocking draw can produce.
pub const MAX_DECAY_RATE: u32 = 10;
/// Largest number of animals stocked per species.
pub const MAX_PER_SPECIES: u32 = 20;

/// The authoritative zoo state: who lives here, how hungry they are, and how
/// many ticks have elapsed.
///
/// All mutation goes through [`Zoo::step`]. Iteration order is stocking order,
/// so events within a tick come out in a stable sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zoo {
    name: String,
    size: u32,
    slogan: String,
    groups: Vec<StockGroup>,
    thresholds: Thresholds,
    population: Vec<Animal>,
    tick: u64,
}

/// A run of animals stocked together from one config entry. A species listed
/// twice in the config gets two groups, each with its own decay rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockGroup {
    pub species: Species,
    pub decay_rate: u32,
    /// Index of the first animal in the population.
    pub start: usize,
    pub len: usize,
}

/// Alive/dead counts for one stocking group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCensus {
    pub species: Species,
    pub decay_rate: u32,
    pub alive: usize,
    pub dead: usize,
}

impl Zoo {
    /// Build a zoo from its config, stocking every species with `draw`.
    pub fn open(config: &ZooConfig, draw: &mut impl Draw) -> Self {
        let (population, groups) = stock_groups(&config.species, draw);
        tracing::info!(
            zoo = %config.name,
            groups = groups.len(),
            animals = population.len(),
            "cages filled"
        );
        Self {
            name: config.name.clone(),
            size: config.size,
            slogan: config.slogan.clone(),
            groups,
            thresholds: config.simulation.thresholds,
            population,
            tick: 0,
        }
    }

    /// Build a zoo around an explicit population (for replay and tests).
    ///
    /// Groups are recovered as contiguous runs of animals sharing a species
    /// and decay rate.
    pub fn with_population(
        name: impl Into<String>,
        thresholds: Thresholds,
        population: Vec<Animal>,
    ) -> Self {
        let mut groups: Vec<StockGroup> = Vec::new();
        for (i, a) in population.iter().enumerate() {
            match groups.last_mut() {
                Some(g) if g.species == a.species && g.decay_rate == a.decay_rate => g.len += 1,
                _ => groups.push(StockGroup {
                    species: a.species.clone(),
                    decay_rate: a.decay_rate,
                    start: i,
                    len: 1,
                }),
            }
        }
        Self {
            name: name.into(),
            size: 0,
            slogan: String::new(),
            groups,
            thresholds,
            population,
            tick: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn slogan(&self) -> &str {
        &self.slogan
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Ticks elapsed since the zoo opened.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Read-only access to the population, in stocking order.
    pub fn population(&self) -> &[Animal] {
        &self.population
    }

    pub fn get(&self, id: AnimalId) -> Option<&Animal> {
        self.population.get(id.0 as usize)
    }

    pub fn alive_count(&self) -> usize {
        self.population.iter().filter(|a| !a.dead).count()
    }

    pub fn dead_count(&self) -> usize {
        self.population.len() - self.alive_count()
    }

    /// True once every animal is dead. An empty zoo is trivially extinct.
    pub fn is_extinct(&self) -> bool {
        self.population.iter().all(|a| a.dead)
    }

    pub fn groups(&self) -> &[StockGroup] {
        &self.groups
    }

    /// Per-group counts in stocking order.
    pub fn census(&self) -> Vec<SpeciesCensus> {
        self.groups
            .iter()
            .map(|g| {
                let mut entry = SpeciesCensus {
                    species: g.species.clone(),
                    decay_rate: g.decay_rate,
                    alive: 0,
                    dead: 0,
                };
                for a in &self.population[g.start..g.start + g.len] {
                    if a.dead {
                        entry.dead += 1;
                    } else {
                        entry.alive += 1;
                    }
                }
                entry
            })
            .collect()
    }

    /// Advance every live animal by one tick and return the notifications in
    /// population order.
    pub fn step(&mut self) -> Vec<LifeEvent> {
        self.tick += 1;
        let tick = self.tick;
        let thresholds = self.thresholds;
        let events: Vec<LifeEvent> = self
            .population
            .iter_mut()
            .filter_map(|a| a.advance(tick, &thresholds))
            .collect();
        tracing::debug!(
            tick,
            events = events.len(),
            alive = self.alive_count(),
            "zoo stepped"
        );
        events
    }
}

/// Draw a decay rate in `[1, MAX_DECAY_RATE]`. A draw that rounds to zero
/// becomes 1 so hunger always grows.
pub fn draw_decay_rate(draw: &mut impl Draw) -> u32 {
    let rate = (draw.unit() * MAX_DECAY_RATE as f64).round() as u32;
    rate.clamp(1, MAX_DECAY_RATE)
}

/// Draw a head count in `[1, MAX_PER_SPECIES]`.
pub fn draw_head_count(draw: &mut impl Draw) -> u32 {
    let count = (draw.unit() * MAX_PER_SPECIES as f64).floor() as u32 + 1;
    count.min(MAX_PER_SPECIES)
}

/// Fill the cages: one shared decay rate and a random head count per species.
pub fn stock(species: &[Species], draw: &mut impl Draw) -> Vec<Animal> {
    stock_groups(species, draw).0
}

fn stock_groups(species: &[Species], draw: &mut impl Draw) -> (Vec<Animal>, Vec<StockGroup>) {
    let mut population = Vec::new();
    let mut groups = Vec::with_capacity(species.len());
    for s in species {
        let rate = draw_decay_rate(draw);
        let count = draw_head_count(draw);
        tracing::debug!(species = %s, rate, count, "stocking species");
        let start = population.len();
        for _ in 0..count {
            let id = AnimalId(population.len() as u32);
            population.push(Animal::new(id, s.clone(), rate));
        }
        groups.push(StockGroup {
            species: s.clone(),
            decay_rate: rate,
            start,
            len: count as usize,
        });
    }
    (population, groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{Scripted, SplitMix64};

    fn single(rate: u32) -> Zoo {
        Zoo::with_population(
            "test",
            Thresholds::default(),
            vec![Animal::new(AnimalId(0), "otter", rate)],
        )
    }

    #[test]
    fn zoo_opens_at_tick_zero() {
        let z = Zoo::open(&ZooConfig::default(), &mut SplitMix64::new(1));
        assert_eq!(z.tick(), 0);
        assert_eq!(z.name(), "Zootopia");
        assert_eq!(z.size(), 500);
        assert!(z.population().iter().all(|a| a.hunger == 0 && !a.dead));
    }

    #[test]
    fn forced_zero_draw_gives_rate_one() {
        for _ in 0..10 {
            assert_eq!(draw_decay_rate(&mut Scripted::new([0.0])), 1);
        }
        // 0.04 * 10 rounds to 0 as well.
        assert_eq!(draw_decay_rate(&mut Scripted::new([0.04])), 1);
    }

    #[test]
    fn counts_and_rates_stay_in_range() {
        let species: Vec<Species> = vec!["a".into(), "b".into(), "c".into()];
        for seed in 0..500 {
            let pop = stock(&species, &mut SplitMix64::new(seed));
            for s in &species {
                let group: Vec<&Animal> = pop.iter().filter(|a| &a.species == s).collect();
                assert!((1..=MAX_PER_SPECIES as usize).contains(&group.len()));
                let rate = group[0].decay_rate;
                assert!((1..=MAX_DECAY_RATE).contains(&rate));
                assert!(group.iter().all(|a| a.decay_rate == rate));
            }
        }
    }

    #[test]
    fn extreme_draws_hit_range_edges() {
        let mut low = Scripted::new([0.0]);
        assert_eq!(draw_head_count(&mut low), 1);
        let mut high = Scripted::new([0.999_999]);
        assert_eq!(draw_head_count(&mut high), MAX_PER_SPECIES);
        assert_eq!(draw_decay_rate(&mut high), MAX_DECAY_RATE);
    }

    #[test]
    fn stocking_preserves_species_order_and_ids() {
        // rate draw then count draw, per species
        let mut draw = Scripted::new([0.5, 0.1, 0.2, 0.0]);
        let species: Vec<Species> = vec!["monkey".into(), "otter".into()];
        let pop = stock(&species, &mut draw);
        assert_eq!(pop.len(), 3 + 1);
        assert_eq!(pop[0].species, "monkey");
        assert_eq!(pop[0].decay_rate, 5);
        assert_eq!(pop[3].species, "otter");
        assert_eq!(pop[3].decay_rate, 2);
        for (i, a) in pop.iter().enumerate() {
            assert_eq!(a.id, AnimalId(i as u32));
        }
    }

    #[test]
    fn same_seed_same_zoo() {
        let c = ZooConfig::default();
        let a = Zoo::open(&c, &mut SplitMix64::new(42));
        let b = Zoo::open(&c, &mut SplitMix64::new(42));
        assert_eq!(a.population(), b.population());
    }

    #[test]
    fn rate_one_first_warning_at_21_death_at_31() {
        let mut z = single(1);
        let mut warnings = Vec::new();
        let mut death = None;
        for _ in 0..40 {
            for e in z.step() {
                match e {
                    LifeEvent::Dying { tick, .. } => warnings.push(tick),
                    LifeEvent::Dead { tick, .. } => death = Some(tick),
                }
            }
        }
        assert_eq!(warnings.first(), Some(&21));
        // warning repeats every tick while in the band
        assert_eq!(warnings, (21..=30).collect::<Vec<_>>());
        assert_eq!(death, Some(31));
        assert_eq!(z.get(AnimalId(0)).unwrap().hunger, 31);
    }

    #[test]
    fn rate_ten_dies_on_fourth_tick() {
        let mut z = single(10);
        assert!(z.step().is_empty());
        assert!(z.step().is_empty());
        let third = z.step();
        assert!(matches!(third.as_slice(), [LifeEvent::Dying { hunger: 30, .. }]));
        let fourth = z.step();
        assert!(matches!(fourth.as_slice(), [LifeEvent::Dead { hunger: 40, .. }]));
        assert!(z.is_extinct());
    }

    #[test]
    fn hunger_monotonic_until_death_then_frozen() {
        let mut z = Zoo::open(&ZooConfig::default(), &mut SplitMix64::new(3));
        let mut prev: Vec<Animal> = z.population().to_vec();
        for _ in 0..40 {
            z.step();
            for (before, after) in prev.iter().zip(z.population()) {
                if before.dead {
                    assert_eq!(before.hunger, after.hunger);
                    assert!(after.dead);
                } else {
                    assert_eq!(after.hunger, before.hunger + before.decay_rate);
                }
            }
            prev = z.population().to_vec();
        }
        // 40 ticks at rate >= 1 pushes everyone past 30
        assert!(z.is_extinct());
    }

    #[test]
    fn dead_iff_cumulative_hunger_exceeded_threshold() {
        let mut z = Zoo::open(&ZooConfig::default(), &mut SplitMix64::new(11));
        for ticks in 1..=35u64 {
            z.step();
            for a in z.population() {
                let cumulative = a.decay_rate as u64 * ticks;
                assert_eq!(a.dead, cumulative > 30, "rate {} tick {ticks}", a.decay_rate);
            }
        }
    }

    #[test]
    fn events_follow_population_order() {
        let pop = vec![
            Animal::new(AnimalId(0), "monkey", 10),
            Animal::new(AnimalId(1), "otter", 10),
            Animal::new(AnimalId(2), "monkey", 10),
        ];
        let mut z = Zoo::with_population("order", Thresholds::default(), pop);
        z.step();
        z.step();
        let ids: Vec<AnimalId> = z.step().iter().map(LifeEvent::animal).collect();
        assert_eq!(ids, vec![AnimalId(0), AnimalId(1), AnimalId(2)]);
    }

    #[test]
    fn census_tracks_deaths_per_group() {
        let pop = vec![
            Animal::new(AnimalId(0), "monkey", 10),
            Animal::new(AnimalId(1), "monkey", 10),
            Animal::new(AnimalId(2), "otter", 1),
        ];
        let mut z = Zoo::with_population("census", Thresholds::default(), pop);
        for _ in 0..4 {
            z.step();
        }
        let census = z.census();
        assert_eq!(census.len(), 2);
        assert_eq!(census[0].species, "monkey");
        assert_eq!((census[0].alive, census[0].dead), (0, 2));
        assert_eq!((census[1].alive, census[1].dead), (1, 0));
        assert_eq!(z.alive_count(), 1);
        assert_eq!(z.dead_count(), 2);
        assert!(!z.is_extinct());
    }

    #[test]
    fn custom_thresholds_apply() {
        let mut z = Zoo::with_population(
            "tight",
            Thresholds::new(1, 2),
            vec![Animal::new(AnimalId(0), "otter", 1)],
        );
        assert_eq!(z.thresholds(), Thresholds::new(1, 2));
        assert!(z.step().is_empty());
        assert!(matches!(z.step().as_slice(), [LifeEvent::Dying { .. }]));
        assert!(matches!(z.step().as_slice(), [LifeEvent::Dead { .. }]));
    }

    #[test]
    fn empty_zoo_is_extinct_and_quiet() {
        let config = ZooConfig {
            species: Vec::new(),
            ..ZooConfig::default()
        };
        let mut z = Zoo::open(&config, &mut SplitMix64::new(0));
        assert!(z.is_extinct());
        assert!(z.step().is_empty());
        assert_eq!(z.tick(), 1);
    }

    #[test]
    fn repeated_species_keeps_separate_groups_in_census() {
        let config = ZooConfig {
            species: vec!["otter".into(), "otter".into()],
            ..ZooConfig::default()
        };
        let mut z = Zoo::open(&config, &mut Scripted::new([0.5, 0.1, 0.2, 0.0]));
        assert_eq!(z.population().len(), 4);
        let census = z.census();
        assert_eq!(census.len(), 2);
        assert_eq!((census[0].decay_rate, census[0].alive), (5, 3));
        assert_eq!((census[1].decay_rate, census[1].alive), (2, 1));
        let total: usize = census.iter().map(|c| c.alive + c.dead).sum();
        assert_eq!(total, z.population().len());

        // rate 5 dies on tick 7, rate 2 is still alive
        for _ in 0..7 {
            z.step();
        }
        let census = z.census();
        assert_eq!((census[0].alive, census[0].dead), (0, 3));
        assert_eq!((census[1].alive, census[1].dead), (1, 0));
    }

    #[test]
    fn with_population_splits_groups_on_rate_change() {
        let pop = vec![
            Animal::new(AnimalId(0), "otter", 3),
            Animal::new(AnimalId(1), "otter", 3),
            Animal::new(AnimalId(2), "otter", 7),
        ];
        let z = Zoo::with_population("split", Thresholds::default(), pop);
        let groups = z.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].start, groups[0].len), (0, 2));
        assert_eq!((groups[1].start, groups[1].len, groups[1].decay_rate), (2, 1, 7));
    }
}
