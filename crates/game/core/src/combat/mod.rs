//! Combat math: the damage pipeline and hit application helpers.

mod damage;

pub use damage::{DamageKind, DamageProfile, DamageValues, Damages, resolve_damage};

/// Outcome of damage applied to a single combatant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitOutcome {
    /// Damage absorbed by shield.
    pub absorbed: u32,
    /// HP actually lost.
    pub hp_loss: u32,
}

/// Splits `damage` between `shield` and `hp`.
///
/// Returns the new shield, new HP, and what each absorbed.
pub fn apply_damage(shield: u32, hp: u32, damage: u32) -> (u32, u32, HitOutcome) {
    let absorbed = damage.min(shield);
    let remaining = damage - absorbed;
    let hp_loss = remaining.min(hp);
    (
        shield - absorbed,
        hp - hp_loss,
        HitOutcome { absorbed, hp_loss },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shield_absorbs_before_hp() {
        assert_eq!(
            apply_damage(5, 20, 8),
            (
                0,
                17,
                HitOutcome {
                    absorbed: 5,
                    hp_loss: 3
                }
            )
        );
    }

    #[test]
    fn hp_never_underflows() {
        let (_, hp, outcome) = apply_damage(0, 4, 10);
        assert_eq!(hp, 0);
        assert_eq!(outcome.hp_loss, 4);
    }
}
