//! Status effect system for actors.
//!
//! A status is identified by a stable kebab-case id ([`StatusKind`]). Stackable
//! statuses accumulate `magnitude` when re-applied; non-stackable ones ignore
//! re-application. Behavior lives in a static [`StatusHooks`] table per kind
//! (see [`hooks`]), keeping the effect itself plain data.

pub mod hooks;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::error::BattleError;

pub use hooks::{
    DamageModifier, HitReport, ModifierSide, SequenceReport, StatusHooks, StatusReaction, priority,
};

/// Types of status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StatusKind {
    // ========================================================================
    // Attacker modifiers
    // ========================================================================
    /// Flat bonus to every hit.
    Strength,
    /// Heavier, fewer hits.
    Heavyweight,
    /// Lighter, more hits.
    Lightweight,
    /// Reduced hit amount.
    Weak,

    // ========================================================================
    // Defender modifiers
    // ========================================================================
    /// Attacks against the holder land one extra hit.
    Sticky,
    /// Incoming hits grow by 10% per stack.
    Corrosion,
    /// Incoming hits are fixed to 1 damage.
    Flight,

    // ========================================================================
    // Turn-start effects
    // ========================================================================
    /// Lose HP at turn start, then decay.
    Poison,
    /// Shield is restored at turn start.
    Barrier,
    /// Heal at turn start, then decay.
    Regeneration,

    // ========================================================================
    // Reactive effects
    // ========================================================================
    /// Every hit received reflects damage to the attacker.
    Thorns,
    /// Gain strength after surviving an attack.
    Enrage,
}

impl StatusKind {
    /// Stable string id used in logs, snapshots and content files.
    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn is_stackable(self) -> bool {
        self.hooks().stackable
    }

    pub fn is_debuff(self) -> bool {
        self.hooks().debuff
    }

    pub fn priority(self) -> u16 {
        self.hooks().priority
    }
}

/// A single status effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Accumulated stack size. Non-stackable statuses keep their first value.
    pub magnitude: u32,
}

impl StatusEffect {
    pub const fn new(kind: StatusKind, magnitude: u32) -> Self {
        Self { kind, magnitude }
    }

    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    pub fn hooks(&self) -> &'static StatusHooks {
        self.kind.hooks()
    }

    /// Rebuilds a status from its string id, e.g. when reconstructing views
    /// from plain data.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::Invariant`] when the id names no known status.
    pub fn restore(id: &str, magnitude: u32) -> Result<Self, BattleError> {
        let kind = id
            .parse::<StatusKind>()
            .map_err(|_| BattleError::invariant(format!("unrecoverable status '{id}'")))?;
        Ok(Self::new(kind, magnitude))
    }
}

/// Result of adding a status to a [`StatusEffects`] set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusApplied {
    /// A new instance was inserted.
    Added,
    /// Merged into the existing instance; carries the new magnitude.
    Stacked(u32),
    /// Non-stackable status already present, or the set is full.
    Ignored,
}

/// Active status effects on an actor, kept in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a status, merging stackable ones by id.
    pub fn add(&mut self, effect: StatusEffect) -> StatusApplied {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            if !effect.kind.is_stackable() {
                return StatusApplied::Ignored;
            }
            existing.magnitude = existing.magnitude.saturating_add(effect.magnitude);
            return StatusApplied::Stacked(existing.magnitude);
        }

        if self.effects.try_push(effect).is_err() {
            return StatusApplied::Ignored;
        }
        StatusApplied::Added
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    /// Magnitude of a status, 0 when absent.
    pub fn magnitude(&self, kind: StatusKind) -> u32 {
        self.get(kind).map_or(0, |e| e.magnitude)
    }

    /// Removes a status immediately.
    pub fn remove(&mut self, kind: StatusKind) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.kind == kind)?;
        Some(self.effects.remove(index))
    }

    /// Lowers a status by `amount`, removing it once it reaches zero.
    ///
    /// Returns the remaining magnitude (0 when removed or absent).
    pub fn decay(&mut self, kind: StatusKind, amount: u32) -> u32 {
        let Some(effect) = self.effects.iter_mut().find(|e| e.kind == kind) else {
            return 0;
        };
        effect.magnitude = effect.magnitude.saturating_sub(amount);
        let remaining = effect.magnitude;
        if remaining == 0 {
            self.remove(kind);
        }
        remaining
    }

    /// Removes every debuff, returning what was removed.
    pub fn remove_debuffs(&mut self) -> Vec<StatusEffect> {
        let removed: Vec<_> = self
            .effects
            .iter()
            .copied()
            .filter(|e| e.kind.is_debuff())
            .collect();
        self.effects.retain(|e| !e.kind.is_debuff());
        removed
    }

    /// Returns a copy of this set with `extra` statuses merged in.
    pub fn merged<I>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = StatusEffect>,
    {
        let mut merged = self.clone();
        for effect in extra {
            merged.add(effect);
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl FromIterator<StatusEffect> for StatusEffects {
    fn from_iter<T: IntoIterator<Item = StatusEffect>>(iter: T) -> Self {
        let mut set = Self::new();
        for effect in iter {
            set.add(effect);
        }
        set
    }
}
