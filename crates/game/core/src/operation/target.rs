use serde_json::Value;

use crate::state::{EnemyId, EnemyState};

use super::{Availability, Metadata, Operation, OperationContext, OperationError, numeric_id};

/// Extra eligibility rule for [`TargetEnemyOperation`].
///
/// The predicate returns true when the enemy may be chosen; otherwise
/// `reason` explains why not.
#[derive(Clone, Copy, Debug)]
pub struct TargetRestriction {
    pub reason: &'static str,
    pub predicate: fn(&EnemyState) -> bool,
}

impl TargetRestriction {
    pub const fn new(reason: &'static str, predicate: fn(&EnemyState) -> bool) -> Self {
        Self { reason, predicate }
    }
}

/// Selects one enemy on the field.
///
/// Defeated and escaped enemies are never selectable.
#[derive(Clone, Debug, Default)]
pub struct TargetEnemyOperation {
    pub restrictions: Vec<TargetRestriction>,
}

impl TargetEnemyOperation {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_restriction(mut self, restriction: TargetRestriction) -> Self {
        self.restrictions.push(restriction);
        self
    }

    fn blocking_reason(&self, enemy: &EnemyState) -> Option<String> {
        if !enemy.is_active() {
            let life = if enemy.combatant.is_alive() {
                enemy.life
            } else {
                crate::state::EnemyLife::Defeated
            };
            return Some(life.to_string());
        }
        self.restrictions
            .iter()
            .find(|restriction| !(restriction.predicate)(enemy))
            .map(|restriction| restriction.reason.to_owned())
    }
}

impl Operation for TargetEnemyOperation {
    type Output = EnemyId;
    type Candidate = EnemyId;

    const KIND: &'static str = "target-enemy";

    fn resolve(
        &self,
        payload: &Value,
        ctx: &OperationContext<'_>,
    ) -> Result<EnemyId, OperationError> {
        let id = numeric_id(payload, "enemyId")
            .map(EnemyId)
            .ok_or(OperationError::MissingEnemyId)?;
        let enemy = ctx
            .enemies
            .get(id)
            .ok_or(OperationError::EnemyNotFound(id))?;
        if let Some(reason) = self.blocking_reason(enemy) {
            return Err(OperationError::EnemyNotSelectable { id, reason });
        }
        Ok(id)
    }

    fn describe_availability(&self, ctx: &OperationContext<'_>) -> Vec<Availability<EnemyId>> {
        ctx.enemies
            .iter()
            .map(|enemy| match self.blocking_reason(enemy) {
                Some(reason) => Availability::blocked(enemy.id(), reason),
                None => Availability::selectable(enemy.id()),
            })
            .collect()
    }

    fn metadata(&self, output: &EnemyId, ctx: &OperationContext<'_>) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("targetEnemyId".into(), Value::from(output.0));
        if let Some(enemy) = ctx.enemies.get(*output) {
            metadata.insert("targetName".into(), Value::from(enemy.name.clone()));
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::ActionQueue;
    use crate::state::{Combatant, EnemyLife, EnemyRoster};
    use serde_json::json;

    fn roster() -> EnemyRoster {
        let mut roster = EnemyRoster::new();
        roster.spawn("slime", Combatant::new(10), Vec::new(), ActionQueue::default());
        roster.spawn("bat", Combatant::new(4), Vec::new(), ActionQueue::default());
        roster
    }

    #[test]
    fn resolves_numeric_and_object_payloads() {
        let roster = roster();
        let ctx = OperationContext {
            enemies: &roster,
            hand: &[],
        };
        let operation = TargetEnemyOperation::new();
        assert_eq!(operation.resolve(&json!(1), &ctx), Ok(EnemyId(1)));
        assert_eq!(operation.resolve(&json!({ "enemyId": 2 }), &ctx), Ok(EnemyId(2)));
    }

    #[test]
    fn reports_descriptive_errors() {
        let roster = roster();
        let ctx = OperationContext {
            enemies: &roster,
            hand: &[],
        };
        let operation = TargetEnemyOperation::new();

        let error = operation.resolve(&json!("slime"), &ctx).unwrap_err();
        assert_eq!(error.to_string(), "Operation requires a numeric enemy id");

        let error = operation.resolve(&json!(999), &ctx).unwrap_err();
        assert_eq!(error.to_string(), "Enemy 999 not found");
    }

    #[test]
    fn escaped_and_restricted_enemies_are_not_selectable() {
        let mut roster = roster();
        roster.get_mut(EnemyId(2)).unwrap().life = EnemyLife::Escaped;
        let ctx = OperationContext {
            enemies: &roster,
            hand: &[],
        };

        let operation = TargetEnemyOperation::new()
            .with_restriction(TargetRestriction::new("too healthy", |enemy| {
                enemy.combatant.current_hp < 10
            }));
        let availability = operation.describe_availability(&ctx);
        assert_eq!(
            availability,
            vec![
                Availability::blocked(EnemyId(1), "too healthy"),
                Availability::blocked(EnemyId(2), "escaped"),
            ]
        );

        let error = operation.resolve(&json!(2), &ctx).unwrap_err();
        assert_eq!(error.to_string(), "Enemy 2 is not selectable: escaped");
    }
}
