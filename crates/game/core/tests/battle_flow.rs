use std::sync::Arc;

use battle_core::{
    Action, ActionLogEntry, Battle, BattleConfig, BattleEnv, BattleOutcome, CardBlueprint,
    CardId, CardOperation, DamageProfile, EnemyBlueprint, EnemyId, EnemyLife, FixedRng, LogKind,
    PlayerBlueprint, QueueBlueprint, SkillEffect, StatusBlueprint, StatusEffect, StatusKind,
};

fn env(rng: u32) -> BattleEnv {
    BattleEnv::with_defaults().with_rng(Arc::new(FixedRng(rng)))
}

fn enemy_actions(battle: &Battle) -> Vec<String> {
    battle
        .log()
        .entries()
        .iter()
        .filter(|entry| entry.kind == LogKind::EnemyAction)
        .filter_map(|entry| entry.metadata.get("action")?.as_str().map(str::to_owned))
        .collect()
}

fn last_enemy_action(battle: &Battle) -> &ActionLogEntry {
    battle
        .log()
        .entries()
        .iter()
        .rev()
        .find(|entry| entry.kind == LogKind::EnemyAction)
        .expect("an enemy acted")
}

#[test]
fn default_queue_alternates_between_two_actions() {
    let mut battle = Battle::builder(env(1))
        .player(PlayerBlueprint::new(100))
        .enemy(EnemyBlueprint::new(
            "Wolf",
            30,
            vec![
                Action::attack("Claw", 0, DamageProfile::single(4)),
                Action::attack("Bite", 0, DamageProfile::single(6)),
            ],
        ))
        .build()
        .unwrap();

    battle.start_battle().unwrap();
    for _ in 0..4 {
        battle.end_turn().unwrap();
    }

    assert_eq!(enemy_actions(&battle), ["Bite", "Claw", "Bite", "Claw"]);
    assert_eq!(battle.player().combatant.current_hp, 80);
}

#[test]
fn heaven_chain_costs_one_turn_then_planned_action_resumes() {
    let chain = Action::skill("Heaven Chain", 1, vec![SkillEffect::HeavenChain]);
    let mut battle = Battle::builder(env(0))
        .player(PlayerBlueprint::new(40))
        .card(CardBlueprint::Action(chain))
        .enemy(EnemyBlueprint::new(
            "Slime",
            30,
            vec![Action::attack("Bite", 0, DamageProfile::single(5))],
        ))
        .build()
        .unwrap();
    battle.start_battle().unwrap();

    battle
        .play_card(CardId(1), &[CardOperation::target_enemy(EnemyId(1))])
        .unwrap();
    let intent = battle.capture_snapshot().enemy(EnemyId(1)).unwrap().intent.clone();
    assert_eq!(intent.map(|intent| intent.name), Some("Heaven Chain".to_string()));

    battle.end_turn().unwrap();
    let bound = last_enemy_action(&battle);
    assert_eq!(bound.skip_reason(), Some("bound by heaven chain"));
    assert_eq!(bound.metadata["origin"], "inserted");
    assert_eq!(battle.player().combatant.current_hp, 40);

    battle.end_turn().unwrap();
    assert_eq!(last_enemy_action(&battle).metadata["action"], "Bite");
    assert_eq!(last_enemy_action(&battle).metadata["origin"], "scheduled");
    assert_eq!(battle.player().combatant.current_hp, 35);
}

#[test]
fn interrupting_a_charge_restarts_the_beam_cycle() {
    let jam = Action::skill("Jam", 0, vec![SkillEffect::Interrupt]);
    let mut battle = Battle::builder(env(0))
        .player(PlayerBlueprint::new(50))
        .card(CardBlueprint::Action(jam))
        .enemy(
            EnemyBlueprint::new(
                "Sentinel",
                60,
                vec![
                    Action::skip("Charge", "charging"),
                    Action::attack("Beam", 0, DamageProfile::single(20)),
                ],
            )
            .with_queue(QueueBlueprint::Beam {
                cycle: vec![0, 0, 1],
            }),
        )
        .build()
        .unwrap();
    battle.start_battle().unwrap();

    // Turn 1: first charge.
    battle.end_turn().unwrap();
    // Turn 2: the second charge is interrupted before it runs.
    battle
        .play_card(CardId(1), &[CardOperation::target_enemy(EnemyId(1))])
        .unwrap();
    battle.end_turn().unwrap();
    battle.end_turn().unwrap();
    assert_eq!(battle.player().combatant.current_hp, 50);

    battle.end_turn().unwrap();
    assert_eq!(enemy_actions(&battle), ["Charge", "Charge", "Charge", "Beam"]);
    assert_eq!(battle.player().combatant.current_hp, 30);
}

#[test]
fn interrupt_without_a_scheduled_action_is_skipped() {
    let chain = Action::skill("Heaven Chain", 0, vec![SkillEffect::HeavenChain]);
    let jam = Action::skill("Jam", 0, vec![SkillEffect::Interrupt]);
    let mut battle = Battle::builder(env(0))
        .player(PlayerBlueprint::new(40))
        .cards([CardBlueprint::Action(chain), CardBlueprint::Action(jam)])
        .enemy(EnemyBlueprint::new("Idler", 30, Vec::new()))
        .build()
        .unwrap();
    battle.start_battle().unwrap();

    battle
        .play_card(CardId(1), &[CardOperation::target_enemy(EnemyId(1))])
        .unwrap();
    let entry = battle
        .play_card(CardId(2), &[CardOperation::target_enemy(EnemyId(1))])
        .unwrap();
    assert_eq!(entry.skip_reason(), Some("nothing to interrupt"));
}

#[test]
fn turn_start_statuses_tick_for_both_sides() {
    let mut battle = Battle::builder(env(0))
        .player(PlayerBlueprint {
            statuses: vec![StatusBlueprint {
                id: "poison".into(),
                magnitude: 3,
            }],
            ..PlayerBlueprint::new(40)
        })
        .enemy(
            EnemyBlueprint::new("Turtle", 30, vec![Action::skip("Hide", "hiding")])
                .with_status(StatusEffect::new(StatusKind::Barrier, 4)),
        )
        .build()
        .unwrap();

    battle.start_battle().unwrap();
    let player = &battle.player().combatant;
    assert_eq!(player.current_hp, 37);
    assert_eq!(player.statuses.magnitude(StatusKind::Poison), 2);

    battle.end_player_turn().unwrap();
    battle.start_enemy_turn().unwrap();
    assert_eq!(battle.enemy(EnemyId(1)).unwrap().combatant.shield, 4);
}

#[test]
fn poison_can_decide_the_battle_at_turn_start() {
    let mut battle = Battle::builder(env(0))
        .player(PlayerBlueprint {
            current_hp: Some(2),
            statuses: vec![StatusBlueprint {
                id: "poison".into(),
                magnitude: 5,
            }],
            ..PlayerBlueprint::new(40)
        })
        .enemy(EnemyBlueprint::new("Slime", 30, Vec::new()))
        .build()
        .unwrap();

    battle.start_battle().unwrap();
    assert_eq!(battle.outcome(), BattleOutcome::Defeat);
    assert_eq!(battle.log().last().unwrap().kind, LogKind::BattleEnd);
}

#[test]
fn defeating_the_last_enemy_wins() {
    let strike = Action::attack("Strike", 1, DamageProfile::single(6));
    let mut battle = Battle::builder(env(0))
        .player(PlayerBlueprint::new(40))
        .cards([CardBlueprint::Action(strike.clone()), CardBlueprint::Action(strike)])
        .enemy(EnemyBlueprint::new(
            "Slime",
            6,
            vec![Action::attack("Bite", 0, DamageProfile::single(5))],
        ))
        .build()
        .unwrap();
    battle.start_battle().unwrap();

    let entry = battle
        .play_card(CardId(1), &[CardOperation::target_enemy(EnemyId(1))])
        .unwrap();
    assert_eq!(entry.kind, LogKind::CardPlay);
    assert_eq!(battle.outcome(), BattleOutcome::Victory);
    assert_eq!(battle.enemy(EnemyId(1)).unwrap().life, EnemyLife::Defeated);

    let entries = battle.log().entries();
    assert_eq!(entries[entries.len() - 1].kind, LogKind::BattleEnd);
    assert_eq!(entries[entries.len() - 2].sequence, entry.sequence);

    assert_eq!(
        battle.play_card(CardId(2), &[CardOperation::target_enemy(EnemyId(1))]),
        Err(battle_core::BattleError::BattleOver)
    );
}

#[test]
fn allies_buff_each_other_and_escapes_end_the_battle() {
    let mut battle = Battle::builder(env(0))
        .player(PlayerBlueprint::new(40))
        .enemy(EnemyBlueprint::new(
            "Imp",
            10,
            vec![Action::skill(
                "Cheer",
                0,
                vec![SkillEffect::BuffAlly(StatusEffect::new(StatusKind::Strength, 2))],
            )],
        ))
        .enemy(EnemyBlueprint::new(
            "Thief",
            10,
            vec![Action::skill("Flee", 0, vec![SkillEffect::Escape])],
        ))
        .build()
        .unwrap();
    battle.start_battle().unwrap();
    battle.end_turn().unwrap();

    let thief = battle.enemy(EnemyId(2)).unwrap();
    assert_eq!(thief.combatant.statuses.magnitude(StatusKind::Strength), 2);
    assert_eq!(thief.life, EnemyLife::Escaped);

    // With the thief gone the imp has nobody left to cheer for.
    battle.end_turn().unwrap();
    assert_eq!(last_enemy_action(&battle).skip_reason(), Some("no eligible ally"));
    assert_eq!(battle.outcome(), BattleOutcome::Ongoing);
}

#[test]
fn status_cards_in_hand_weaken_the_player() {
    let config = BattleConfig {
        hand_limit: 2,
        draw_per_turn: 2,
        ..BattleConfig::new()
    };
    let strike = CardBlueprint::Action(Action::attack("Strike", 1, DamageProfile::single(6)));
    let mut battle = Battle::builder(env(0).with_config(config))
        .player(PlayerBlueprint::new(40))
        .cards([strike.clone(), strike.clone(), strike])
        .enemy(EnemyBlueprint::new(
            "Witch",
            30,
            vec![Action::skill(
                "Hex",
                0,
                vec![SkillEffect::Curse(StatusEffect::new(StatusKind::Weak, 1))],
            )],
        ))
        .build()
        .unwrap();
    battle.start_battle().unwrap();
    battle.end_turn().unwrap();

    let hand = battle.piles().hand();
    assert!(hand[0].is_status());
    let strike = hand
        .iter()
        .find(|card| !card.is_status())
        .map(|card| card.id())
        .unwrap();

    battle
        .play_card(strike, &[CardOperation::target_enemy(EnemyId(1))])
        .unwrap();
    assert_eq!(battle.enemy(EnemyId(1)).unwrap().combatant.current_hp, 26);

    // Status cards survive the end-of-turn discard.
    battle.end_player_turn().unwrap();
    assert_eq!(battle.piles().hand().len(), 1);
}

#[test]
fn enemy_hand_card_effects_are_skipped_and_the_turn_completes() {
    let mut battle = Battle::builder(env(0))
        .player(PlayerBlueprint::new(40))
        .card(CardBlueprint::Action(Action::attack(
            "Strike",
            1,
            DamageProfile::single(6),
        )))
        .enemy(EnemyBlueprint::new(
            "Thief",
            20,
            vec![Action::skill("Pickpocket", 0, vec![SkillEffect::DiscardSelected])],
        ))
        .build()
        .unwrap();
    battle.start_battle().unwrap();

    battle.end_turn().unwrap();
    let pickpocket = last_enemy_action(&battle);
    assert_eq!(pickpocket.metadata["action"], "Pickpocket");
    assert_eq!(pickpocket.skip_reason(), Some("no card selected"));
    assert_eq!(battle.turn().turn, 2);
    assert!(battle.turn().is_player_main());
}
