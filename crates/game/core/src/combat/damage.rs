//! Damage calculation.
//!
//! [`Damages`] turns a base profile plus the attacker's and defender's statuses
//! into the amount and count actually dealt. Every status with a damage
//! modifier runs in ascending priority:
//!
//! ```text
//! attacker flat (100) → attacker scale (200) → defender (300) → damage fix (900)
//! ```
//!
//! Ties keep attacker statuses before defender statuses, then application
//! order. Damage-fix statuses therefore always have the last word.

use crate::status::{ModifierSide, StatusEffect};

/// Whether an attack lands once or as a series of hits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DamageKind {
    /// Always exactly one hit. Count modifiers do not apply.
    Single,
    /// Several hits; count modifiers apply and may reduce it to zero.
    Multi,
}

/// Base damage before any status is considered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageProfile {
    pub base_amount: u32,
    pub base_count: u32,
    pub kind: DamageKind,
}

impl DamageProfile {
    pub const fn single(amount: u32) -> Self {
        Self {
            base_amount: amount,
            base_count: 1,
            kind: DamageKind::Single,
        }
    }

    pub const fn multi(amount: u32, count: u32) -> Self {
        Self {
            base_amount: amount,
            base_count: count,
            kind: DamageKind::Multi,
        }
    }

    fn values(&self) -> DamageValues {
        let count = match self.kind {
            DamageKind::Single => 1,
            DamageKind::Multi => self.base_count,
        };
        DamageValues {
            amount: self.base_amount,
            count,
            kind: self.kind,
        }
    }
}

/// Working values threaded through the modifier pipeline.
///
/// Amount and count stay non-negative integers; every scaling floors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DamageValues {
    pub amount: u32,
    pub count: u32,
    pub kind: DamageKind,
}

impl DamageValues {
    pub fn add_amount(&mut self, bonus: u32) {
        self.amount = self.amount.saturating_add(bonus);
    }

    /// Multiplies amount by `numerator / denominator`, flooring.
    pub fn scale_amount(&mut self, numerator: u32, denominator: u32) {
        if denominator == 0 {
            return;
        }
        let scaled = u64::from(self.amount) * u64::from(numerator) / u64::from(denominator);
        self.amount = u32::try_from(scaled).unwrap_or(u32::MAX);
    }

    /// Adjusts hit count, saturating at zero. No-op for single hits.
    pub fn add_count(&mut self, delta: i32) {
        if self.kind == DamageKind::Single {
            return;
        }
        self.count = self.count.saturating_add_signed(delta);
    }

    /// Overrides amount unconditionally.
    pub fn fix_amount(&mut self, amount: u32) {
        self.amount = amount;
    }

    /// Amount × count.
    pub fn total(&self) -> u32 {
        self.amount.saturating_mul(self.count)
    }
}

/// Damage profile resolved against attacker and defender statuses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Damages {
    profile: DamageProfile,
    attacker: Vec<StatusEffect>,
    defender: Vec<StatusEffect>,
    resolved: DamageValues,
}

impl Damages {
    pub fn new<A, D>(profile: DamageProfile, attacker: A, defender: D) -> Self
    where
        A: IntoIterator<Item = StatusEffect>,
        D: IntoIterator<Item = StatusEffect>,
    {
        let attacker: Vec<_> = attacker.into_iter().collect();
        let defender: Vec<_> = defender.into_iter().collect();
        let resolved = resolve_damage(&profile, &attacker, &defender);
        Self {
            profile,
            attacker,
            defender,
            resolved,
        }
    }

    /// Profile without any status.
    pub fn base(profile: DamageProfile) -> Self {
        Self::new(profile, [], [])
    }

    pub fn profile(&self) -> &DamageProfile {
        &self.profile
    }

    pub fn attacker_states(&self) -> &[StatusEffect] {
        &self.attacker
    }

    pub fn defender_states(&self) -> &[StatusEffect] {
        &self.defender
    }

    pub fn values(&self) -> DamageValues {
        self.resolved
    }

    pub fn amount(&self) -> u32 {
        self.resolved.amount
    }

    pub fn count(&self) -> u32 {
        self.resolved.count
    }

    pub fn kind(&self) -> DamageKind {
        self.resolved.kind
    }

    /// Resolved values frozen into a new base profile.
    pub fn observed_profile(&self) -> DamageProfile {
        DamageProfile {
            base_amount: self.resolved.amount,
            base_count: self.resolved.count,
            kind: self.resolved.kind,
        }
    }
}

/// Runs the modifier pipeline.
pub fn resolve_damage(
    profile: &DamageProfile,
    attacker: &[StatusEffect],
    defender: &[StatusEffect],
) -> DamageValues {
    let mut steps: Vec<(u16, u8, usize, &StatusEffect)> = Vec::new();

    let sides = [(ModifierSide::Attacker, attacker), (ModifierSide::Defender, defender)];
    for (side_order, (side, statuses)) in sides.into_iter().enumerate() {
        for (seq, status) in statuses.iter().enumerate() {
            let hooks = status.hooks();
            if hooks.side == Some(side) && hooks.modify_damage.is_some() {
                steps.push((hooks.priority, side_order as u8, seq, status));
            }
        }
    }
    steps.sort_by_key(|&(priority, side_order, seq, _)| (priority, side_order, seq));

    let mut values = profile.values();
    for (_, _, _, status) in steps {
        if let Some(modify) = status.hooks().modify_damage {
            modify(&mut values, status);
            tracing::trace!(
                status = status.id(),
                amount = values.amount,
                count = values.count,
                "damage modifier applied"
            );
        }
    }
    values
}
