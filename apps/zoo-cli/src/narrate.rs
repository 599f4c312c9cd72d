//! Turns kernel events into the lines a visitor would read.

use zoo_kernel::{LifeEvent, SpeciesCensus, Zoo};
use zoo_roster::Roster;

pub struct Narrator {
    roster: Roster,
}

impl Narrator {
    pub fn new(roster: Roster) -> Self {
        Self { roster }
    }

    pub fn welcome(zoo: &Zoo) -> [String; 2] {
        [
            format!("Welcome to {} {}", zoo.name(), zoo.size()),
            format!("Life has started :)! {}", zoo.slogan()),
        ]
    }

    pub fn event(&self, event: &LifeEvent) -> String {
        let species = event.species();
        if !event.is_death() {
            return format!("{species}: Yo im dying man please give me some food :(");
        }
        match self.roster.scapegoat() {
            Some(who) => format!("{species}: I DIED, RIP :'(, I blame {}", who.first_name),
            None => format!("{species}: I DIED, RIP :'("),
        }
    }

    pub fn thresholds_line(zoo: &Zoo) -> String {
        let t = zoo.thresholds();
        format!("dying above {} hunger, dead above {}", t.dying, t.dead)
    }

    pub fn census_line(entry: &SpeciesCensus) -> String {
        format!(
            "{}: rate={} alive={} dead={}",
            entry.species, entry.decay_rate, entry.alive, entry.dead
        )
    }
}
