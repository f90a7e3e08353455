//! Static behavior table for every [`StatusKind`].
//!
//! Each kind maps to a [`StatusHooks`] record: plain properties (priority,
//! stacking, debuff flag) plus optional callbacks. Callbacks never touch the
//! battle directly; they return [`StatusReaction`]s that the engine applies.

use super::{StatusEffect, StatusKind};
use crate::combat::DamageValues;
use crate::state::ActorRef;

/// Damage pipeline priorities. Lower values run first.
pub mod priority {
    /// Flat attacker bonuses.
    pub const ATTACKER_FLAT: u16 = 100;
    /// Multiplicative attacker modifiers.
    pub const ATTACKER_SCALE: u16 = 200;
    /// Defender modifiers.
    pub const DEFENDER: u16 = 300;
    /// Unconditional overrides. Always last.
    pub const DAMAGE_FIX: u16 = 900;
    /// Statuses that never touch damage.
    pub const NONE: u16 = 0;
}

/// Which participant of an attack must hold the status for its modifier to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModifierSide {
    Attacker,
    Defender,
}

pub type DamageModifier = fn(&mut DamageValues, &StatusEffect);
pub type TurnStartHook = fn(&StatusEffect) -> Vec<StatusReaction>;
pub type HitResolvedHook = fn(&StatusEffect, &HitReport) -> Vec<StatusReaction>;
pub type SequenceResolvedHook = fn(&StatusEffect, &SequenceReport) -> Vec<StatusReaction>;

/// Properties and callbacks of one status kind.
#[derive(Clone, Copy, Debug)]
pub struct StatusHooks {
    pub priority: u16,
    pub stackable: bool,
    pub debuff: bool,
    pub side: Option<ModifierSide>,
    pub modify_damage: Option<DamageModifier>,
    pub on_turn_start: Option<TurnStartHook>,
    /// Runs for the status holder after each hit it receives.
    pub on_hit_resolved: Option<HitResolvedHook>,
    /// Runs for the status holder once a whole attack against it has resolved.
    pub on_damage_sequence_resolved: Option<SequenceResolvedHook>,
}

impl StatusHooks {
    const fn inert(stackable: bool, debuff: bool) -> Self {
        Self {
            priority: priority::NONE,
            stackable,
            debuff,
            side: None,
            modify_damage: None,
            on_turn_start: None,
            on_hit_resolved: None,
            on_damage_sequence_resolved: None,
        }
    }

    const fn modifier(
        priority: u16,
        side: ModifierSide,
        stackable: bool,
        debuff: bool,
        modify: DamageModifier,
    ) -> Self {
        Self {
            priority,
            side: Some(side),
            modify_damage: Some(modify),
            ..Self::inert(stackable, debuff)
        }
    }
}

/// What a single hit did to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitReport {
    pub attacker: ActorRef,
    pub hit_index: u32,
    /// Damage absorbed by shield.
    pub absorbed: u32,
    /// HP actually lost.
    pub hp_loss: u32,
}

/// Summary of a complete attack against one target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceReport {
    pub attacker: ActorRef,
    pub hits_landed: u32,
    pub total_hp_loss: u32,
    pub target_alive: bool,
}

/// Side effect requested by a status callback, applied to the holder unless
/// stated otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusReaction {
    /// Lose HP, bypassing shield.
    LoseHp(u32),
    Heal(u32),
    /// Raise shield to at least this value.
    RestoreShield(u32),
    /// Deal damage to the attacker, bypassing the damage pipeline.
    Reflect(u32),
    /// Gain a status.
    Gain(StatusEffect),
    /// Lower the reacting status's own magnitude.
    Decay(u32),
}

impl StatusKind {
    /// Behavior record for this kind.
    pub fn hooks(self) -> &'static StatusHooks {
        match self {
            StatusKind::Strength => &STRENGTH,
            StatusKind::Heavyweight => &HEAVYWEIGHT,
            StatusKind::Lightweight => &LIGHTWEIGHT,
            StatusKind::Weak => &WEAK,
            StatusKind::Sticky => &STICKY,
            StatusKind::Corrosion => &CORROSION,
            StatusKind::Flight => &FLIGHT,
            StatusKind::Poison => &POISON,
            StatusKind::Barrier => &BARRIER,
            StatusKind::Regeneration => &REGENERATION,
            StatusKind::Thorns => &THORNS,
            StatusKind::Enrage => &ENRAGE,
        }
    }
}

// ============================================================================
// Damage modifiers
// ============================================================================

static STRENGTH: StatusHooks = StatusHooks::modifier(
    priority::ATTACKER_FLAT,
    ModifierSide::Attacker,
    true,
    false,
    |values, status| values.add_amount(status.magnitude),
);

static HEAVYWEIGHT: StatusHooks = StatusHooks::modifier(
    priority::ATTACKER_SCALE,
    ModifierSide::Attacker,
    false,
    false,
    |values, _| {
        values.scale_amount(3, 2);
        values.add_count(-1);
    },
);

static LIGHTWEIGHT: StatusHooks = StatusHooks::modifier(
    priority::ATTACKER_SCALE,
    ModifierSide::Attacker,
    false,
    false,
    |values, _| {
        values.scale_amount(2, 3);
        values.add_count(1);
    },
);

static WEAK: StatusHooks = StatusHooks::modifier(
    priority::ATTACKER_SCALE,
    ModifierSide::Attacker,
    false,
    true,
    |values, _| values.scale_amount(3, 4),
);

// A fully negated attack stays negated.
static STICKY: StatusHooks = StatusHooks::modifier(
    priority::DEFENDER,
    ModifierSide::Defender,
    false,
    true,
    |values, _| {
        if values.count > 0 {
            values.add_count(1);
        }
    },
);

static CORROSION: StatusHooks = StatusHooks::modifier(
    priority::DEFENDER,
    ModifierSide::Defender,
    true,
    true,
    |values, status| values.scale_amount(10u32.saturating_add(status.magnitude), 10),
);

static FLIGHT: StatusHooks = StatusHooks::modifier(
    priority::DAMAGE_FIX,
    ModifierSide::Defender,
    false,
    false,
    |values, _| values.fix_amount(1),
);

// ============================================================================
// Turn-start effects
// ============================================================================

static POISON: StatusHooks = StatusHooks {
    on_turn_start: Some(|status| {
        vec![
            StatusReaction::LoseHp(status.magnitude),
            StatusReaction::Decay(1),
        ]
    }),
    ..StatusHooks::inert(true, true)
};

static BARRIER: StatusHooks = StatusHooks {
    on_turn_start: Some(|status| vec![StatusReaction::RestoreShield(status.magnitude)]),
    ..StatusHooks::inert(true, false)
};

static REGENERATION: StatusHooks = StatusHooks {
    on_turn_start: Some(|status| {
        vec![
            StatusReaction::Heal(status.magnitude),
            StatusReaction::Decay(1),
        ]
    }),
    ..StatusHooks::inert(true, false)
};

// ============================================================================
// Reactive effects
// ============================================================================

static THORNS: StatusHooks = StatusHooks {
    on_hit_resolved: Some(|status, _hit| vec![StatusReaction::Reflect(status.magnitude)]),
    ..StatusHooks::inert(true, false)
};

static ENRAGE: StatusHooks = StatusHooks {
    on_damage_sequence_resolved: Some(|status, report| {
        if report.target_alive && report.total_hp_loss > 0 {
            vec![StatusReaction::Gain(StatusEffect::new(
                StatusKind::Strength,
                status.magnitude,
            ))]
        } else {
            Vec::new()
        }
    }),
    ..StatusHooks::inert(false, false)
};
