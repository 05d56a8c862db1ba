//! Test fixtures shared by the API tests.
//!
//! Builds an [`App`] over the in-memory stores with a seeded catalog and a
//! fixed quality roll, so outputs are predictable.

use std::sync::Arc;

use skirmish_domain::{
    Character, Race, Skill, SkillBranch, SkillTarget, StatBlock, StatKey, UserId,
};

use crate::app::{App, Repositories};
use crate::infrastructure::clock::{SequenceRandom, SystemClock};
use crate::infrastructure::memory::{
    InMemoryCatalog, InMemoryEventStore, InMemoryRoundStore, InMemorySessionStore,
    InMemoryUsageStore,
};
use crate::infrastructure::notifications::BroadcastNotifier;

pub fn stat(raw: &str) -> StatKey {
    StatKey::new(raw).expect("stat key")
}

/// Human fighter with the given FOR and RES 10.
pub fn fighter(name: &str, force: i32) -> Character {
    Character::new(UserId::new(), name, Race::new("Human")).with_stats(
        [(stat("FOR"), force), (stat("RES"), 10)]
            .into_iter()
            .collect::<StatBlock>(),
    )
}

/// Base power 10, scaling from FOR then RES, aimed at another character.
pub fn strike() -> Skill {
    Skill::new(
        "Strike",
        10,
        SkillTarget::Other,
        SkillBranch::new("blade").expect("branch"),
    )
    .with_scaling_stat(stat("FOR"))
    .and_then(|s| s.with_scaling_stat(stat("RES")))
    .expect("skill")
}

pub struct TestWorld {
    pub app: Arc<App>,
    pub catalog: Arc<InMemoryCatalog>,
    pub ada: Character,
    pub bryn: Character,
    pub strike: Skill,
}

impl TestWorld {
    /// Ada (FOR 20) and Bryn (FOR 10) both know Strike. Every roll is a 10.
    pub async fn new() -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        let ada = fighter("Ada", 20);
        let bryn = fighter("Bryn", 10);
        let strike = strike();
        catalog.insert_character(ada.clone()).await;
        catalog.insert_character(bryn.clone()).await;
        catalog.insert_skill(strike.clone()).await;

        let repos = Repositories {
            character: catalog.clone(),
            skill: catalog.clone(),
            usage: Arc::new(InMemoryUsageStore::new()),
            round: Arc::new(InMemoryRoundStore::new()),
            event: Arc::new(InMemoryEventStore::new()),
            session: Arc::new(InMemorySessionStore::new()),
        };
        let app = App::with_ports(
            repos,
            Arc::new(BroadcastNotifier::new(64)),
            Arc::new(SystemClock::new()),
            Arc::new(SequenceRandom::new([10])),
            20,
        );

        Self {
            app: Arc::new(app),
            catalog,
            ada,
            bryn,
            strike,
        }
    }
}
