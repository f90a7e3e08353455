use std::sync::Arc;

use battle_core::{
    Action, AnimationStage, Battle, BattleConfig, BattleEnv, BattleError, BattleSnapshot, CardBlueprint, CardId,
    CardOperation, DamageProfile, EnemyBlueprint, EnemyId, FixedRng, OperationError,
    PlayerBlueprint, RelicBlueprint, SkillEffect, SnapshotSections, StatusEffect, StatusKind,
    apply_snapshot_patch,
};

const SLIME: EnemyId = EnemyId(1);
const TURTLE: EnemyId = EnemyId(2);

fn strike() -> CardBlueprint {
    CardBlueprint::Action(Action::attack("Strike", 1, DamageProfile::single(6)))
}

fn builder() -> battle_core::BattleBuilder {
    Battle::builder(BattleEnv::with_defaults().with_rng(Arc::new(FixedRng(0))))
        .player(PlayerBlueprint::new(40))
        .enemy(
            EnemyBlueprint::new(
                "Slime",
                30,
                vec![Action::attack("Bite", 0, DamageProfile::single(5))],
            )
            .with_status(StatusEffect::new(StatusKind::Strength, 2)),
        )
        .enemy(EnemyBlueprint::new(
            "Turtle",
            30,
            vec![Action::skip("Hide", "hiding")],
        ))
}

fn started(builder: battle_core::BattleBuilder) -> Battle {
    let mut battle = builder.build().unwrap();
    battle.start_battle().unwrap();
    battle
}

fn without_log(snapshot: BattleSnapshot, log_from: &BattleSnapshot) -> BattleSnapshot {
    BattleSnapshot {
        log: Arc::clone(&log_from.log),
        ..snapshot
    }
}

#[test]
fn card_play_batches_touch_only_what_each_beat_changed() {
    let mut battle = started(builder().card(strike()));
    let entry = battle
        .play_card(CardId(1), &[CardOperation::target_enemy(SLIME)])
        .unwrap();

    let stages: Vec<_> = entry.animation_batches.iter().map(|batch| batch.stage).collect();
    assert_eq!(
        stages,
        [
            AnimationStage::CardPlay,
            AnimationStage::CardResolve,
            AnimationStage::CardTrash
        ]
    );
    let sections = |stage| entry.batch(stage).map(|batch| batch.sections);
    assert_eq!(
        sections(AnimationStage::CardPlay),
        Some(SnapshotSections::PLAYER | SnapshotSections::HAND)
    );
    assert_eq!(sections(AnimationStage::CardResolve), Some(SnapshotSections::ENEMIES));
    assert_eq!(sections(AnimationStage::CardTrash), Some(SnapshotSections::DISCARD_PILE));
    assert_eq!(entry.metadata["targetEnemyId"], 1);
}

#[test]
fn replaying_batches_reproduces_the_new_state() {
    let mut battle = started(builder().card(strike()));
    let before = battle.capture_snapshot();
    let entry = battle
        .play_card(CardId(1), &[CardOperation::target_enemy(SLIME)])
        .unwrap();
    let after = battle.capture_snapshot();

    let replayed = entry
        .animation_batches
        .iter()
        .fold(before.clone(), |snapshot, batch| {
            apply_snapshot_patch(&snapshot, &batch.patch)
        });
    assert_eq!(without_log(replayed.clone(), &after), after);

    // Untouched sections are shared, not rebuilt.
    assert!(Arc::ptr_eq(&replayed.deck, &before.deck));
    assert!(Arc::ptr_eq(&replayed.exile_pile, &before.exile_pile));
    let turtle_before = before.enemies.iter().find(|enemy| enemy.id == TURTLE).unwrap();
    let turtle_after = replayed.enemies.iter().find(|enemy| enemy.id == TURTLE).unwrap();
    assert!(Arc::ptr_eq(turtle_before, turtle_after));
}

#[test]
fn relic_activation_batch_touches_only_the_player() {
    let whetstone = RelicBlueprint {
        once_per_turn: true,
        ..RelicBlueprint::new(
            "whetstone",
            "Whetstone",
            Action::skill(
                "Sharpen",
                0,
                vec![SkillEffect::GainStatus(StatusEffect::new(StatusKind::Strength, 1))],
            ),
        )
    };
    let mut battle = started(builder().relic(whetstone));

    let entry = battle.play_relic("whetstone", &[]).unwrap();
    let activate = entry.batch(AnimationStage::RelicActivate).unwrap();
    assert_eq!(activate.sections, SnapshotSections::PLAYER);
    assert!(entry.batch(AnimationStage::RelicEffect).is_some());
    assert_eq!(
        battle.player().combatant.statuses.magnitude(StatusKind::Strength),
        1
    );

    assert_eq!(
        battle.play_relic("whetstone", &[]),
        Err(BattleError::RelicExhausted("whetstone".into()))
    );
    assert_eq!(
        battle.play_relic("anvil", &[]),
        Err(BattleError::RelicNotFound("anvil".into()))
    );
}

#[test]
fn relic_charges_run_out() {
    let flask = RelicBlueprint {
        charges: Some(1),
        ..RelicBlueprint::new(
            "flask",
            "Flask",
            Action::skill("Sip", 0, vec![SkillEffect::GainShield { amount: 5 }]),
        )
    };
    let mut battle = started(builder().relic(flask));
    battle.play_relic("flask", &[]).unwrap();
    assert_eq!(battle.player().combatant.shield, 5);

    battle.end_turn().unwrap();
    assert!(matches!(
        battle.play_relic("flask", &[]),
        Err(BattleError::RelicExhausted(_))
    ));
}

#[test]
fn rejected_plays_leave_the_battle_untouched() {
    let expensive = CardBlueprint::Action(Action::attack("Meteor", 5, DamageProfile::single(40)));
    let mut battle = started(builder().card(strike()).card(expensive));
    let before = battle.capture_snapshot();
    let log_len = battle.log().len();

    assert_eq!(
        battle.play_card(CardId(1), &[]),
        Err(BattleError::Operation(OperationError::Missing(
            "target-enemy".into()
        )))
    );
    assert_eq!(
        battle.play_card(
            CardId(1),
            &[
                CardOperation::target_enemy(SLIME),
                CardOperation::target_enemy(TURTLE)
            ]
        ),
        Err(BattleError::Operation(OperationError::AlreadyCompleted(
            "target-enemy".into()
        )))
    );
    assert_eq!(
        battle.play_card(CardId(1), &[CardOperation::target_enemy(EnemyId(7))]),
        Err(BattleError::Operation(OperationError::EnemyNotFound(EnemyId(7))))
    );
    assert_eq!(
        battle.play_card(CardId(2), &[CardOperation::target_enemy(SLIME)]),
        Err(BattleError::NotEnoughMana {
            required: 5,
            available: 3
        })
    );
    assert_eq!(
        battle.play_card(CardId(9), &[]),
        Err(BattleError::CardNotInHand(CardId(9)))
    );

    assert_eq!(battle.capture_snapshot(), before);
    assert_eq!(battle.log().len(), log_len);
}

#[test]
fn defeated_enemies_cannot_be_targeted() {
    let finisher = CardBlueprint::Action(Action::attack("Finisher", 0, DamageProfile::single(50)));
    let mut battle = started(builder().card(finisher).card(strike()));
    battle
        .play_card(CardId(1), &[CardOperation::target_enemy(SLIME)])
        .unwrap();

    assert_eq!(
        battle.play_card(CardId(2), &[CardOperation::target_enemy(SLIME)]),
        Err(BattleError::Operation(OperationError::EnemyNotSelectable {
            id: SLIME,
            reason: "defeated".into()
        }))
    );
}

#[test]
fn status_cards_cannot_be_played() {
    let curse = CardBlueprint::Status(StatusEffect::new(StatusKind::Weak, 1).into());
    let mut battle = started(builder().card(curse));
    assert_eq!(
        battle.play_card(CardId(1), &[]),
        Err(BattleError::CardNotPlayable(CardId(1)))
    );
}

#[test]
fn healing_at_full_hp_is_logged_as_skipped() {
    let mend = CardBlueprint::Action(Action::skill("Mend", 1, vec![SkillEffect::Heal { amount: 5 }]));
    let mut battle = started(builder().card(mend));
    let entry = battle.play_card(CardId(1), &[]).unwrap();

    assert_eq!(entry.skip_reason(), Some("already at full hp"));
    assert_eq!(battle.player().mana, 2);
    assert_eq!(battle.piles().discard().len(), 1);
}

#[test]
fn captured_memory_replays_the_observed_attack() {
    let recall = CardBlueprint::Action(Action::skill(
        "Recall",
        0,
        vec![SkillEffect::CaptureMemory { cost: 1 }],
    ));
    let mut battle = started(builder().card(recall));

    let options = battle.describe_card_operations(CardId(1)).unwrap();
    assert_eq!(options[0].kind, "target-enemy");
    let turtle = options[0]
        .candidates
        .iter()
        .find(|candidate| candidate.id == TURTLE.0)
        .unwrap();
    assert!(!turtle.selectable);
    assert_eq!(turtle.reason.as_deref(), Some("no attack planned"));

    battle
        .play_card(CardId(1), &[CardOperation::target_enemy(SLIME)])
        .unwrap();
    let memory = battle
        .piles()
        .hand()
        .iter()
        .find(|card| card.name() == "Memory: Bite")
        .map(|card| card.id())
        .unwrap();

    // Bite (5) with the slime's strength (2) was observed as 7.
    battle
        .play_card(memory, &[CardOperation::target_enemy(SLIME)])
        .unwrap();
    assert_eq!(battle.enemy(SLIME).unwrap().combatant.current_hp, 23);
    assert_eq!(battle.piles().exile().len(), 1);
    assert_eq!(battle.player().mana, 2);
}

#[test]
fn discard_selected_moves_another_hand_card() {
    let purge = CardBlueprint::Action(Action::skill("Purge", 0, vec![SkillEffect::ExileSelected]));
    let mut battle = started(builder().card(purge).card(strike()));

    assert_eq!(
        battle.play_card(CardId(1), &[CardOperation::select_hand_card(CardId(1))]),
        Err(BattleError::Operation(OperationError::CardNotSelectable {
            id: CardId(1),
            reason: "card is being played".into()
        }))
    );

    battle
        .play_card(CardId(1), &[CardOperation::select_hand_card(CardId(2))])
        .unwrap();
    assert!(battle.piles().hand().is_empty());
    assert_eq!(battle.piles().exile()[0].id(), CardId(2));
    assert_eq!(battle.piles().discard()[0].id(), CardId(1));
}

#[test]
fn selected_card_evicted_by_an_earlier_effect_is_skipped() {
    let weak = StatusEffect::new(StatusKind::Weak, 1);
    let hex = CardBlueprint::Action(Action::skill(
        "Hex",
        0,
        vec![
            SkillEffect::Curse(weak),
            SkillEffect::Curse(weak),
            SkillEffect::DiscardSelected,
        ],
    ));
    let config = BattleConfig {
        draw_per_turn: 10,
        ..BattleConfig::new()
    };
    let env = BattleEnv::with_defaults()
        .with_config(config)
        .with_rng(Arc::new(FixedRng(0)));
    let mut battle = Battle::builder(env)
        .player(PlayerBlueprint::new(40))
        .card(hex)
        .cards(std::iter::repeat_with(strike).take(9))
        .enemy(EnemyBlueprint::new("Slime", 30, Vec::new()))
        .build()
        .unwrap();
    battle.start_battle().unwrap();
    assert_eq!(battle.piles().hand().len(), 10);

    // The played card frees one slot, the first curse refills it, and the
    // second curse evicts the oldest action card: the selected one.
    let entry = battle
        .play_card(CardId(1), &[CardOperation::select_hand_card(CardId(2))])
        .unwrap();
    assert_eq!(entry.skip_reason(), Some("selected card left the hand"));

    let discard: Vec<_> = battle.piles().discard().iter().map(|card| card.id()).collect();
    assert_eq!(discard, [CardId(2), CardId(1)]);
    assert_eq!(battle.piles().hand().len(), 10);
    assert_eq!(battle.piles().hand().iter().filter(|card| card.is_status()).count(), 2);
    assert_eq!(battle.piles().total(), 12);
}
