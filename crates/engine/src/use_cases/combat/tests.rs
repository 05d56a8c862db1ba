use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use skirmish_domain::{
    Character, CharacterId, ClashOutcome, DomainEvent, Event as DomainEventAggregate, EventType,
    LocationId, Race, ResolutionData, RollQuality, RoundStatus, Skill, SkillBranch, SkillId,
    SkillTarget, SkillUse, StatBlock, StatKey, UserId,
};

use super::*;
use crate::entities::{Character as CharacterEntity, Progression, Skill as SkillEntity};
use crate::infrastructure::clock::{FixedClock, SequenceRandom};
use crate::infrastructure::memory::{
    InMemoryCatalog, InMemoryEventStore, InMemoryRoundStore, InMemoryUsageStore,
};
use crate::infrastructure::notifications::BroadcastNotifier;
use crate::infrastructure::ports::{
    EventRepo, MockUsageRepo, RandomPort, RoundRepo, UsageRepo,
};

fn key(raw: &str) -> StatKey {
    StatKey::new(raw).expect("stat key")
}

fn fighter(name: &str, force: i32) -> Character {
    Character::new(UserId::new(), name, Race::new("Human")).with_stats(
        [(key("FOR"), force), (key("RES"), 10)]
            .into_iter()
            .collect::<StatBlock>(),
    )
}

fn strike() -> Skill {
    Skill::new(
        "Strike",
        10,
        SkillTarget::Other,
        SkillBranch::new("blade").expect("branch"),
    )
    .with_scaling_stat(key("FOR"))
    .and_then(|s| s.with_scaling_stat(key("RES")))
    .expect("skill")
}

// =============================================================================
// Stores whose writes can be switched off
// =============================================================================

/// In-memory store wrapper whose writes fail while `offline` is set.
struct Switchable<S> {
    inner: Arc<S>,
    offline: Arc<AtomicBool>,
}

impl<S> Switchable<S> {
    fn new(inner: Arc<S>) -> (Arc<Self>, Arc<AtomicBool>) {
        let offline = Arc::new(AtomicBool::new(false));
        let store = Arc::new(Self {
            inner,
            offline: offline.clone(),
        });
        (store, offline)
    }

    fn check(&self, operation: &'static str) -> Result<(), RepoError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RepoError::storage(operation, "store offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RoundRepo for Switchable<InMemoryRoundStore> {
    async fn get(&self, id: RoundId) -> Result<Option<CombatRound>, RepoError> {
        self.inner.get(id).await
    }

    async fn save(&self, round: &CombatRound) -> Result<(), RepoError> {
        self.check("save_round")?;
        self.inner.save(round).await
    }

    async fn get_active_in_location(
        &self,
        location_id: LocationId,
    ) -> Result<Option<CombatRound>, RepoError> {
        self.inner.get_active_in_location(location_id).await
    }

    async fn get_active_for_event(
        &self,
        event_id: EventId,
    ) -> Result<Option<CombatRound>, RepoError> {
        self.inner.get_active_for_event(event_id).await
    }

    async fn list_resolved(
        &self,
        location_id: LocationId,
        limit: u32,
    ) -> Result<Vec<CombatRound>, RepoError> {
        self.inner.list_resolved(location_id, limit).await
    }

    async fn next_round_number(&self, location_id: LocationId) -> Result<u32, RepoError> {
        self.inner.next_round_number(location_id).await
    }
}

#[async_trait]
impl EventRepo for Switchable<InMemoryEventStore> {
    async fn get(&self, id: EventId) -> Result<Option<DomainEventAggregate>, RepoError> {
        self.inner.get(id).await
    }

    async fn save(&self, event: &DomainEventAggregate) -> Result<(), RepoError> {
        self.check("save_event")?;
        self.inner.save(event).await
    }

    async fn get_active_in_location(
        &self,
        location_id: LocationId,
    ) -> Result<Option<DomainEventAggregate>, RepoError> {
        self.inner.get_active_in_location(location_id).await
    }
}

#[async_trait]
impl UsageRepo for Switchable<InMemoryUsageStore> {
    async fn skill_uses(
        &self,
        character_id: CharacterId,
        skill_id: SkillId,
    ) -> Result<u32, RepoError> {
        self.inner.skill_uses(character_id, skill_id).await
    }

    async fn branch_uses(
        &self,
        character_id: CharacterId,
        branch: &SkillBranch,
    ) -> Result<u32, RepoError> {
        self.inner.branch_uses(character_id, branch).await
    }

    async fn record_round_uses(
        &self,
        round_id: RoundId,
        uses: &[SkillUse],
    ) -> Result<bool, RepoError> {
        self.check("record_round_uses")?;
        self.inner.record_round_uses(round_id, uses).await
    }
}

struct Harness {
    catalog: Arc<InMemoryCatalog>,
    usage: Arc<InMemoryUsageStore>,
    rounds: Arc<InMemoryRoundStore>,
    events: Arc<InMemoryEventStore>,
    rounds_offline: Arc<AtomicBool>,
    events_offline: Arc<AtomicBool>,
    usage_offline: Arc<AtomicBool>,
    notifier: Arc<BroadcastNotifier>,
    combat: CombatUseCases,
}

impl Harness {
    fn new() -> Self {
        Self::with(Arc::new(SequenceRandom::new([10])), None)
    }

    fn with(random: Arc<dyn RandomPort>, usage_override: Option<Arc<dyn UsageRepo>>) -> Self {
        let catalog = Arc::new(InMemoryCatalog::new());
        let usage = Arc::new(InMemoryUsageStore::new());
        let rounds = Arc::new(InMemoryRoundStore::new());
        let events = Arc::new(InMemoryEventStore::new());
        let notifier = Arc::new(BroadcastNotifier::new(64));
        let clock: Arc<dyn ClockPort> = Arc::new(FixedClock(
            Utc.timestamp_opt(1_700_000_000, 0).single().expect("timestamp"),
        ));

        let (round_repo, rounds_offline) = Switchable::new(rounds.clone());
        let (event_repo, events_offline) = Switchable::new(events.clone());
        let (switchable_usage, usage_offline) = Switchable::new(usage.clone());
        let usage_repo: Arc<dyn UsageRepo> = match usage_override {
            Some(repo) => repo,
            None => switchable_usage,
        };
        let round = Arc::new(Round::new(round_repo));
        let event = Arc::new(Event::new(event_repo));
        let character = Arc::new(CharacterEntity::new(catalog.clone()));
        let skill = Arc::new(SkillEntity::new(catalog.clone()));
        let progression = Arc::new(Progression::new(usage_repo));
        let location_locks = Arc::new(LocationLocks::new());
        let round_locks = Arc::new(RoundLocks::new());

        let combat = CombatUseCases::new(
            Arc::new(CreateRound::new(
                round.clone(),
                event.clone(),
                clock.clone(),
                notifier.clone(),
                location_locks.clone(),
            )),
            Arc::new(SubmitAction::new(
                round.clone(),
                character,
                skill,
                clock.clone(),
                notifier.clone(),
                round_locks.clone(),
            )),
            Arc::new(ResolveRound::new(
                round.clone(),
                event.clone(),
                progression,
                clock.clone(),
                random,
                notifier.clone(),
                round_locks.clone(),
                location_locks.clone(),
            )),
            Arc::new(CancelRound::new(
                round.clone(),
                event,
                clock,
                notifier.clone(),
                round_locks,
                location_locks,
            )),
            Arc::new(RoundQueries::new(round, 5)),
        );

        Self {
            catalog,
            usage,
            rounds,
            events,
            rounds_offline,
            events_offline,
            usage_offline,
            notifier,
            combat,
        }
    }

    async fn open_event(&self, location_id: LocationId) -> DomainEventAggregate {
        let event = DomainEventAggregate::new("Ambush", EventType::Duel, location_id, Utc::now())
            .expect("event");
        EventRepo::save(self.events.as_ref(), &event)
            .await
            .expect("save event");
        event
    }

    async fn stored_event(&self, event: &DomainEventAggregate) -> DomainEventAggregate {
        EventRepo::get(self.events.as_ref(), event.id())
            .await
            .expect("get event")
            .expect("event present")
    }

    /// Put a character at 1.3 skill rank and 1.05 branch rank for `skill`.
    async fn season(&self, character_id: CharacterId, skill: &Skill) {
        let this_skill = SkillUse {
            character_id,
            skill_id: skill.id,
            branch: skill.branch.clone(),
        };
        let sibling = SkillUse {
            skill_id: SkillId::new(),
            ..this_skill.clone()
        };
        let mut uses = vec![this_skill; 21];
        uses.extend(std::iter::repeat(sibling).take(55));
        self.usage
            .record_round_uses(RoundId::new(), &uses)
            .await
            .expect("season");
    }

    /// Active round with two characters striking each other.
    async fn duel(&self) -> (CombatRound, Character, Character, Skill) {
        let location_id = LocationId::new();
        let event = self.open_event(location_id).await;
        let ada = fighter("Ada", 20);
        let bryn = fighter("Bryn", 10);
        let skill = strike();
        self.catalog.insert_character(ada.clone()).await;
        self.catalog.insert_character(bryn.clone()).await;
        self.catalog.insert_skill(skill.clone()).await;

        let round = self
            .combat
            .create_round
            .execute(location_id, event.id())
            .await
            .expect("create round");
        self.combat
            .submit_action
            .execute(round.id(), ada.id, skill.id, Some(bryn.id))
            .await
            .expect("ada strikes");
        self.combat
            .submit_action
            .execute(round.id(), bryn.id, skill.id, Some(ada.id))
            .await
            .expect("bryn strikes");
        (round, ada, bryn, skill)
    }

    async fn stored_round(&self, round_id: RoundId) -> CombatRound {
        RoundRepo::get(self.rounds.as_ref(), round_id)
            .await
            .expect("get round")
            .expect("round present")
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn create_round_requires_the_active_event_of_the_location() {
    let harness = Harness::new();
    let location_id = LocationId::new();

    let err = harness
        .combat
        .create_round
        .execute(location_id, EventId::new())
        .await
        .expect_err("no event");
    assert!(matches!(err, CombatError::PreconditionFailed(_)));

    harness.open_event(location_id).await;
    let err = harness
        .combat
        .create_round
        .execute(location_id, EventId::new())
        .await
        .expect_err("wrong event id");
    assert!(matches!(err, CombatError::PreconditionFailed(_)));
}

#[tokio::test]
async fn create_round_numbers_rounds_and_counts_them_on_the_event() {
    let harness = Harness::new();
    let location_id = LocationId::new();
    let event = harness.open_event(location_id).await;
    let mut messages = harness.notifier.subscribe();

    let round = harness
        .combat
        .create_round
        .execute(location_id, event.id())
        .await
        .expect("create");
    assert_eq!(round.round_number(), 1);
    assert_eq!(round.status(), RoundStatus::Active);
    assert_eq!(harness.stored_event(&event).await.stats().total_rounds, 1);

    let pushed = messages.try_recv().expect("round created pushed");
    assert!(matches!(pushed, DomainEvent::RoundCreated { .. }));

    let err = harness
        .combat
        .create_round
        .execute(location_id, event.id())
        .await
        .expect_err("second active round");
    assert!(matches!(err, CombatError::PreconditionFailed(_)));

    harness
        .combat
        .cancel_round
        .execute(round.id())
        .await
        .expect("cancel");
    let next = harness
        .combat
        .create_round
        .execute(location_id, event.id())
        .await
        .expect("create after cancel");
    assert_eq!(next.round_number(), 2);
}

#[tokio::test]
async fn create_round_is_rejected_while_the_event_is_frozen() {
    let harness = Harness::new();
    let location_id = LocationId::new();
    let mut event = harness.open_event(location_id).await;
    event.freeze(Utc::now()).expect("freeze");
    EventRepo::save(harness.events.as_ref(), &event)
        .await
        .expect("save");

    let err = harness
        .combat
        .create_round
        .execute(location_id, event.id())
        .await
        .expect_err("frozen");
    assert!(matches!(err, CombatError::PreconditionFailed(msg) if msg.contains("frozen")));
}

// =============================================================================
// Submit
// =============================================================================

#[tokio::test]
async fn submit_snapshots_actor_skill_and_target() {
    let harness = Harness::new();
    let (round, ada, bryn, skill) = harness.duel().await;

    let stored = harness.stored_round(round.id()).await;
    assert_eq!(stored.actions().len(), 2);
    let first = &stored.actions()[0];
    assert_eq!(first.character().id, ada.id);
    assert_eq!(first.character().stats.get(&key("FOR")), 20);
    assert_eq!(first.skill().id, skill.id);
    assert_eq!(first.target().map(|t| t.id), Some(bryn.id));
    assert!(first.final_output().is_none());
}

#[tokio::test]
async fn submit_validates_the_target_against_the_skill() {
    let harness = Harness::new();
    let (round, ada, _, skill) = harness.duel().await;

    let err = harness
        .combat
        .submit_action
        .execute(round.id(), ada.id, skill.id, None)
        .await
        .expect_err("other-target skill without target");
    assert!(matches!(err, CombatError::Validation(_)));

    let err = harness
        .combat
        .submit_action
        .execute(round.id(), ada.id, skill.id, Some(CharacterId::new()))
        .await
        .expect_err("unknown target");
    assert!(matches!(err, CombatError::NotFound { entity_type: "Character", .. }));
}

#[tokio::test]
async fn self_skills_target_the_actor() {
    let harness = Harness::new();
    let (round, ada, _, _) = harness.duel().await;
    let ward = Skill::new(
        "Ward",
        5,
        SkillTarget::SelfOnly,
        SkillBranch::new("warding").expect("branch"),
    );
    harness.catalog.insert_skill(ward.clone()).await;

    let action = harness
        .combat
        .submit_action
        .execute(round.id(), ada.id, ward.id, None)
        .await
        .expect("self skill");
    assert_eq!(action.target().map(|t| t.id), Some(ada.id));
}

#[tokio::test]
async fn submit_rejects_unknown_skill_and_inactive_character() {
    let harness = Harness::new();
    let (round, ada, bryn, skill) = harness.duel().await;

    let err = harness
        .combat
        .submit_action
        .execute(round.id(), ada.id, SkillId::new(), Some(bryn.id))
        .await
        .expect_err("unknown skill");
    assert!(matches!(err, CombatError::NotFound { entity_type: "Skill", .. }));

    let mut benched = fighter("Cato", 12);
    benched.is_active = false;
    harness.catalog.insert_character(benched.clone()).await;
    let err = harness
        .combat
        .submit_action
        .execute(round.id(), benched.id, skill.id, Some(ada.id))
        .await
        .expect_err("inactive character");
    assert!(matches!(err, CombatError::Validation(_)));
}

#[tokio::test]
async fn submit_to_unknown_round_is_not_found() {
    let harness = Harness::new();
    let err = harness
        .combat
        .submit_action
        .execute(RoundId::new(), CharacterId::new(), SkillId::new(), None)
        .await
        .expect_err("unknown round");
    assert!(matches!(err, CombatError::NotFound { entity_type: "Round", .. }));
}

// =============================================================================
// Resolve
// =============================================================================

#[tokio::test]
async fn mutual_strikes_clash_and_the_stronger_output_wins() {
    let harness = Harness::new();
    let (round, ada, bryn, skill) = harness.duel().await;
    harness.season(ada.id, &skill).await;
    let mut messages = harness.notifier.subscribe();

    let resolution = harness
        .combat
        .resolve_round
        .execute(round.id())
        .await
        .expect("resolve");

    assert_eq!(resolution.total_actions, 2);
    assert_eq!(resolution.clash_count, 1);
    assert_eq!(resolution.independent_count, 0);

    let stored = harness.stored_round(round.id()).await;
    assert_eq!(stored.status(), RoundStatus::Resolved);
    let ada_action = &stored.actions()[0];
    let bryn_action = &stored.actions()[1];

    // 10 + floor(20 * 0.7) + floor(10 * 0.3) = 27, scaled by 1.3 + 1.05
    let score = ada_action.score().expect("scored");
    assert_eq!(score.base_impact, 27);
    assert_eq!((score.tiers.poor, score.tiers.standard, score.tiers.critical), (38, 63, 88));
    assert_eq!(ada_action.final_output(), Some(63));
    assert_eq!(ada_action.roll_quality(), Some(RollQuality::Standard));

    // 10 + 7 + 3 = 20, unseasoned 1.0 + 1.0
    assert_eq!(bryn_action.final_output(), Some(40));

    assert_eq!(
        resolution.clashes[0].outcome,
        ClashOutcome::Victory {
            winner: ada_action.id(),
            loser: bryn_action.id(),
            damage: 23
        }
    );

    assert_eq!(harness.usage.skill_uses(ada.id, skill.id).await.expect("uses"), 22);
    assert_eq!(harness.usage.skill_uses(bryn.id, skill.id).await.expect("uses"), 1);
    assert_eq!(
        harness.usage.branch_uses(bryn.id, &skill.branch).await.expect("uses"),
        1
    );

    let event = EventRepo::get(harness.events.as_ref(), stored.event_id())
        .await
        .expect("get")
        .expect("event");
    assert_eq!(event.stats().resolved_rounds, 1);
    assert_eq!(event.stats().total_actions, 2);

    let pushed = messages.try_recv().expect("resolution pushed");
    assert!(matches!(pushed, DomainEvent::RoundResolved { round } if round.id() == stored.id()));
}

#[tokio::test]
async fn resolving_an_empty_round_reports_zero_counts() {
    let harness = Harness::new();
    let location_id = LocationId::new();
    let event = harness.open_event(location_id).await;
    let round = harness
        .combat
        .create_round
        .execute(location_id, event.id())
        .await
        .expect("create");

    let resolution = harness
        .combat
        .resolve_round
        .execute(round.id())
        .await
        .expect("resolve");
    assert_eq!(resolution, ResolutionData::default());
}

#[tokio::test]
async fn resolved_round_accepts_no_more_changes() {
    let harness = Harness::new();
    let (round, ada, bryn, skill) = harness.duel().await;
    harness
        .combat
        .resolve_round
        .execute(round.id())
        .await
        .expect("resolve");

    let err = harness
        .combat
        .submit_action
        .execute(round.id(), ada.id, skill.id, Some(bryn.id))
        .await
        .expect_err("submit after resolve");
    assert!(matches!(err, CombatError::PreconditionFailed(_)));

    let err = harness
        .combat
        .resolve_round
        .execute(round.id())
        .await
        .expect_err("resolve twice");
    assert!(matches!(err, CombatError::PreconditionFailed(_)));

    let err = harness
        .combat
        .cancel_round
        .execute(round.id())
        .await
        .expect_err("cancel after resolve");
    assert!(matches!(err, CombatError::PreconditionFailed(_)));
}

#[tokio::test]
async fn counter_failure_aborts_resolution_without_touching_the_round() {
    let mut usage = MockUsageRepo::new();
    usage
        .expect_skill_uses()
        .returning(|_, _| Err(RepoError::storage("skill_uses", "store offline")));
    usage.expect_record_round_uses().never();

    let harness = Harness::with(Arc::new(SequenceRandom::new([10])), Some(Arc::new(usage)));
    let (round, _, _, _) = harness.duel().await;

    let err = harness
        .combat
        .resolve_round
        .execute(round.id())
        .await
        .expect_err("dependency failure");
    assert!(matches!(err, CombatError::Dependency(_)));

    let stored = harness.stored_round(round.id()).await;
    assert_eq!(stored.status(), RoundStatus::Active);
    assert!(stored.actions().iter().all(|a| a.final_output().is_none()));
}

#[tokio::test]
async fn out_of_range_roll_is_a_dependency_failure() {
    let harness = Harness::with(Arc::new(SequenceRandom::new([25])), None);
    let (round, ada, _, skill) = harness.duel().await;

    let err = harness
        .combat
        .resolve_round
        .execute(round.id())
        .await
        .expect_err("bad roll");
    assert!(matches!(err, CombatError::Dependency(_)));
    assert!(harness.stored_round(round.id()).await.is_active());
    assert_eq!(harness.usage.skill_uses(ada.id, skill.id).await.expect("uses"), 0);
}

// =============================================================================
// Cancel and queries
// =============================================================================

#[tokio::test]
async fn cancel_discards_actions_without_counting_them() {
    let harness = Harness::new();
    let (round, ada, _, skill) = harness.duel().await;

    harness
        .combat
        .cancel_round
        .execute(round.id())
        .await
        .expect("cancel");

    let stored = harness.stored_round(round.id()).await;
    assert_eq!(stored.status(), RoundStatus::Cancelled);
    assert!(stored.cancelled_at().is_some());
    assert!(stored.resolution_data().is_none());
    assert_eq!(harness.usage.skill_uses(ada.id, skill.id).await.expect("uses"), 0);

    let event = EventRepo::get(harness.events.as_ref(), stored.event_id())
        .await
        .expect("get")
        .expect("event");
    assert_eq!(event.stats().cancelled_rounds, 1);
}

#[tokio::test]
async fn queries_find_the_active_round_and_page_resolved_ones() {
    let harness = Harness::new();
    let location_id = LocationId::new();
    let event = harness.open_event(location_id).await;

    for _ in 0..7 {
        let round = harness
            .combat
            .create_round
            .execute(location_id, event.id())
            .await
            .expect("create");
        let active = harness
            .combat
            .queries
            .active(location_id)
            .await
            .expect("active");
        assert_eq!(active.map(|r| r.id()), Some(round.id()));
        harness
            .combat
            .resolve_round
            .execute(round.id())
            .await
            .expect("resolve");
    }

    let queries = &harness.combat.queries;
    assert!(queries.active(location_id).await.expect("active").is_none());
    assert_eq!(queries.resolved(location_id, None).await.expect("list").len(), 5);
    assert_eq!(queries.resolved(location_id, Some(0)).await.expect("list").len(), 1);
    assert_eq!(queries.resolved(location_id, Some(500)).await.expect("list").len(), 5);
    assert_eq!(queries.resolved(location_id, Some(3)).await.expect("list").len(), 3);
}

#[test]
fn repo_and_domain_errors_map_onto_the_combat_taxonomy() {
    assert!(matches!(
        CombatError::from(RepoError::not_found("Round", "r1")),
        CombatError::NotFound { entity_type: "Round", .. }
    ));
    assert!(matches!(
        CombatError::from(RepoError::remote("get_skill", "timeout")),
        CombatError::Dependency(_)
    ));
    assert!(matches!(
        CombatError::from(DomainError::invalid_state_transition("round is resolved")),
        CombatError::PreconditionFailed(_)
    ));
    assert!(matches!(
        CombatError::from(DomainError::validation("bad")),
        CombatError::Validation(_)
    ));
}

// =============================================================================
// Failed writes leave stored state as it was
// =============================================================================

#[tokio::test]
async fn failed_event_write_on_create_stores_no_round() {
    let harness = Harness::new();
    let location_id = LocationId::new();
    let event = harness.open_event(location_id).await;

    harness.events_offline.store(true, Ordering::SeqCst);
    let err = harness
        .combat
        .create_round
        .execute(location_id, event.id())
        .await
        .expect_err("event store offline");
    assert!(matches!(err, CombatError::Dependency(_)));
    assert!(harness
        .rounds
        .get_active_for_event(event.id())
        .await
        .expect("lookup")
        .is_none());

    harness.events_offline.store(false, Ordering::SeqCst);
    let round = harness
        .combat
        .create_round
        .execute(location_id, event.id())
        .await
        .expect("retry succeeds");
    assert_eq!(round.round_number(), 1);
    assert_eq!(harness.stored_event(&event).await.stats().total_rounds, 1);
}

#[tokio::test]
async fn failed_round_write_on_create_restores_the_event() {
    let harness = Harness::new();
    let location_id = LocationId::new();
    let event = harness.open_event(location_id).await;

    harness.rounds_offline.store(true, Ordering::SeqCst);
    let err = harness
        .combat
        .create_round
        .execute(location_id, event.id())
        .await
        .expect_err("round store offline");
    assert!(matches!(err, CombatError::Dependency(_)));
    assert_eq!(harness.stored_event(&event).await.stats().total_rounds, 0);
    assert!(harness
        .rounds
        .get_active_in_location(location_id)
        .await
        .expect("lookup")
        .is_none());
}

#[tokio::test]
async fn usage_write_failure_fails_resolution_and_keeps_the_round_active() {
    let mut usage = MockUsageRepo::new();
    usage.expect_skill_uses().returning(|_, _| Ok(0));
    usage.expect_branch_uses().returning(|_, _| Ok(0));
    usage
        .expect_record_round_uses()
        .times(1)
        .returning(|_, _| Err(RepoError::storage("record_round_uses", "store offline")));

    let harness = Harness::with(Arc::new(SequenceRandom::new([10])), Some(Arc::new(usage)));
    let (round, _, _, _) = harness.duel().await;
    let mut messages = harness.notifier.subscribe();

    let err = harness
        .combat
        .resolve_round
        .execute(round.id())
        .await
        .expect_err("usage write fails");
    assert!(matches!(err, CombatError::Dependency(_)));

    let stored = harness.stored_round(round.id()).await;
    assert_eq!(stored.status(), RoundStatus::Active);
    assert!(stored.resolved_at().is_none());
    assert!(stored.actions().iter().all(|a| a.final_output().is_none()));

    let event = harness
        .events
        .get(stored.event_id())
        .await
        .expect("get")
        .expect("event");
    assert_eq!(event.stats().resolved_rounds, 0);
    assert_eq!(event.stats().total_actions, 0);
    assert!(messages.try_recv().is_err(), "nothing pushed for a failed resolve");
}

#[tokio::test]
async fn resolution_retried_after_a_usage_outage_counts_each_action_once() {
    let harness = Harness::new();
    let (round, ada, bryn, skill) = harness.duel().await;

    harness.usage_offline.store(true, Ordering::SeqCst);
    let err = harness
        .combat
        .resolve_round
        .execute(round.id())
        .await
        .expect_err("usage offline");
    assert!(matches!(err, CombatError::Dependency(_)));
    assert!(harness.stored_round(round.id()).await.is_active());
    assert_eq!(harness.usage.skill_uses(ada.id, skill.id).await.expect("uses"), 0);

    harness.usage_offline.store(false, Ordering::SeqCst);
    let resolution = harness
        .combat
        .resolve_round
        .execute(round.id())
        .await
        .expect("retry");
    assert_eq!(resolution.total_actions, 2);

    assert_eq!(harness.usage.skill_uses(ada.id, skill.id).await.expect("uses"), 1);
    assert_eq!(harness.usage.skill_uses(bryn.id, skill.id).await.expect("uses"), 1);
    let event = harness
        .events
        .get(round.event_id())
        .await
        .expect("get")
        .expect("event");
    assert_eq!(event.stats().resolved_rounds, 1);
    assert_eq!(event.stats().total_actions, 2);
}

#[tokio::test]
async fn failed_event_rollup_on_resolve_restores_the_round() {
    let harness = Harness::new();
    let (round, ada, _, skill) = harness.duel().await;
    let before = harness.stored_round(round.id()).await;

    harness.events_offline.store(true, Ordering::SeqCst);
    let err = harness
        .combat
        .resolve_round
        .execute(round.id())
        .await
        .expect_err("event store offline");
    assert!(matches!(err, CombatError::Dependency(_)));

    let stored = harness.stored_round(round.id()).await;
    assert_eq!(stored, before);
    assert!(stored.is_active());
    assert_eq!(harness.usage.skill_uses(ada.id, skill.id).await.expect("uses"), 0);
}

#[tokio::test]
async fn failed_event_rollup_on_cancel_restores_the_round() {
    let harness = Harness::new();
    let (round, _, _, _) = harness.duel().await;

    harness.events_offline.store(true, Ordering::SeqCst);
    let err = harness
        .combat
        .cancel_round
        .execute(round.id())
        .await
        .expect_err("event store offline");
    assert!(matches!(err, CombatError::Dependency(_)));
    assert!(harness.stored_round(round.id()).await.is_active());

    harness.events_offline.store(false, Ordering::SeqCst);
    harness
        .combat
        .cancel_round
        .execute(round.id())
        .await
        .expect("retry");
    assert_eq!(harness.stored_round(round.id()).await.status(), RoundStatus::Cancelled);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_at_one_location_open_exactly_one_round() {
    let harness = Arc::new(Harness::new());
    let location_id = LocationId::new();
    let event = harness.open_event(location_id).await;

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let harness = harness.clone();
            let event_id = event.id();
            tokio::spawn(async move {
                harness
                    .combat
                    .create_round
                    .execute(location_id, event_id)
                    .await
            })
        })
        .collect();
    let mut created = Vec::new();
    let mut rejected = 0;
    for task in tasks {
        match task.await.expect("task") {
            Ok(round) => created.push(round),
            Err(CombatError::PreconditionFailed(_)) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(created.len(), 1);
    assert_eq!(rejected, 7);
    assert_eq!(created[0].round_number(), 1);
    assert_eq!(harness.stored_event(&event).await.stats().total_rounds, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolves_of_one_round_score_it_once() {
    let harness = Arc::new(Harness::new());
    let (round, ada, _, skill) = harness.duel().await;

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let harness = harness.clone();
            let round_id = round.id();
            tokio::spawn(async move { harness.combat.resolve_round.execute(round_id).await })
        })
        .collect();
    let mut resolved = 0;
    for task in tasks {
        match task.await.expect("task") {
            Ok(_) => resolved += 1,
            Err(CombatError::PreconditionFailed(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(resolved, 1);
    assert_eq!(harness.usage.skill_uses(ada.id, skill.id).await.expect("uses"), 1);
}
