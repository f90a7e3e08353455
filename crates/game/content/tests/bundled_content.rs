use std::sync::Arc;

use battle_content::ContentFactory;
use battle_core::{BattleError, BattleOutcome, LogKind, PcgRng};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn bundled_catalogs_load() {
    let factory = ContentFactory::bundled();
    let config = factory.load_config().unwrap();
    assert_eq!(config.max_mana, 3);

    let cards = factory.load_cards().unwrap();
    assert!(cards.get("strike").is_some());
    assert!(factory.load_enemies().unwrap().get("sentinel").is_some());
    assert!(factory.load_relics().unwrap().get("flask").is_some());
    assert!(!factory.load_encounters().unwrap().encounters.is_empty());
}

#[test]
fn every_encounter_survives_a_few_turns() {
    init_tracing();
    let factory = ContentFactory::bundled();
    let encounters = factory.load_encounters().unwrap();

    for encounter in &encounters.encounters {
        let mut battle = factory
            .build_battle(&encounter.id, Arc::new(PcgRng))
            .unwrap();
        battle.start_battle().unwrap();

        for _ in 0..3 {
            match battle.end_turn() {
                Ok(()) => {}
                Err(BattleError::BattleOver) => break,
                Err(e) => panic!("encounter {} failed: {e}", encounter.id),
            }
        }

        let entries = battle.log().entries();
        assert_eq!(entries[0].kind, LogKind::BattleStart, "{}", encounter.id);
        if battle.outcome() == BattleOutcome::Ongoing {
            assert!(battle.turn().turn >= 4, "{}", encounter.id);
        }
    }
}

#[test]
fn shuffled_decks_follow_the_seed() {
    let factory = ContentFactory::bundled();
    let deal = || {
        let battle = factory.build_battle("pack", Arc::new(PcgRng)).unwrap();
        battle
            .piles()
            .deck()
            .iter()
            .map(|card| card.name().to_owned())
            .collect::<Vec<_>>()
    };

    assert_eq!(deal(), deal());
}
