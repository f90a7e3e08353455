//! Context preparation: resolving declared operations before any mutation.

use crate::operation::{
    CardOperation, Metadata, Operation, OperationContext, OperationError, OperationSlot,
    SelectHandCardOperation, TargetEnemyOperation,
};
use crate::state::{ActorRef, CardId, EnemyId};

use super::Action;

/// Who performs an action.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionSource {
    Player,
    Enemy(EnemyId),
    /// A relic, acting on the player's behalf.
    Relic(String),
}

impl ActionSource {
    /// Actor that uses the action and receives self-targeted effects.
    pub fn actor(&self) -> ActorRef {
        match self {
            ActionSource::Player | ActionSource::Relic(_) => ActorRef::Player,
            ActionSource::Enemy(id) => ActorRef::Enemy(*id),
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self, ActionSource::Enemy(_))
    }
}

/// An operation an action declares.
#[derive(Clone, Debug)]
pub enum RequiredOperation {
    TargetEnemy(TargetEnemyOperation),
    SelectHandCard(SelectHandCardOperation),
}

impl RequiredOperation {
    pub fn kind(&self) -> &'static str {
        match self {
            RequiredOperation::TargetEnemy(_) => TargetEnemyOperation::KIND,
            RequiredOperation::SelectHandCard(_) => SelectHandCardOperation::KIND,
        }
    }

    /// Enemy-initiated actions never select anything: their target is implicit.
    pub fn is_required(&self, source: &ActionSource) -> bool {
        !source.is_enemy()
    }
}

/// Everything an action needs to execute, resolved and validated.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionContext {
    pub source: ActionSource,
    /// Card being played, if any.
    pub card: Option<CardId>,
    pub target: Option<EnemyId>,
    pub selected_card: Option<CardId>,
    /// Merged metadata of every resolved operation.
    pub metadata: Metadata,
}

impl ActionContext {
    /// Context for an action that needs no operations.
    pub fn implicit(source: ActionSource) -> Self {
        Self {
            source,
            card: None,
            target: None,
            selected_card: None,
            metadata: Metadata::new(),
        }
    }
}

/// Resolves every operation `action` requires from `source` against the
/// supplied list.
///
/// Supplying an operation kind twice fails: a completed operation cannot be
/// resolved again. Operations of kinds the action does not declare are ignored.
pub fn prepare_context(
    action: &Action,
    ctx: &OperationContext<'_>,
    source: ActionSource,
    card: Option<CardId>,
    operations: &[CardOperation],
) -> Result<ActionContext, OperationError> {
    let mut target = OperationSlot::Pending;
    let mut selected = OperationSlot::Pending;
    let mut metadata = Metadata::new();

    for requirement in action.required_operations(card) {
        if !requirement.is_required(&source) {
            continue;
        }
        let kind = requirement.kind();
        let supplied: Vec<&CardOperation> =
            operations.iter().filter(|operation| operation.kind == kind).collect();
        if supplied.is_empty() {
            return Err(OperationError::Missing(kind.to_owned()));
        }

        for operation in supplied {
            match &requirement {
                RequiredOperation::TargetEnemy(resolver) => {
                    let id = resolver.resolve(&operation.payload, ctx)?;
                    target.complete(kind, id)?;
                    metadata.extend(resolver.metadata(&id, ctx));
                }
                RequiredOperation::SelectHandCard(resolver) => {
                    let id = resolver.resolve(&operation.payload, ctx)?;
                    selected.complete(kind, id)?;
                    metadata.extend(resolver.metadata(&id, ctx));
                }
            }
        }
    }

    Ok(ActionContext {
        source,
        card,
        target: target.into_value(),
        selected_card: selected.into_value(),
        metadata,
    })
}

/// Candidates of one declared operation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationAvailability {
    #[serde(rename = "type")]
    pub kind: String,
    pub candidates: Vec<crate::operation::Availability<u32>>,
}

/// Lists candidates for each operation `action` declares, so a caller can
/// submit only valid payloads.
pub fn describe_operations(
    action: &Action,
    ctx: &OperationContext<'_>,
    card: Option<CardId>,
) -> Vec<OperationAvailability> {
    action
        .required_operations(card)
        .into_iter()
        .map(|requirement| {
            let candidates = match &requirement {
                RequiredOperation::TargetEnemy(resolver) => resolver
                    .describe_availability(ctx)
                    .into_iter()
                    .map(|entry| crate::operation::Availability {
                        id: entry.id.0,
                        selectable: entry.selectable,
                        reason: entry.reason,
                    })
                    .collect(),
                RequiredOperation::SelectHandCard(resolver) => resolver
                    .describe_availability(ctx)
                    .into_iter()
                    .map(|entry| crate::operation::Availability {
                        id: entry.id.0,
                        selectable: entry.selectable,
                        reason: entry.reason,
                    })
                    .collect(),
            };
            OperationAvailability {
                kind: requirement.kind().to_owned(),
                candidates,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageProfile;
    use crate::queue::ActionQueue;
    use crate::state::{Combatant, EnemyRoster};
    use serde_json::json;

    fn roster() -> EnemyRoster {
        let mut roster = EnemyRoster::new();
        roster.spawn("slime", Combatant::new(10), Vec::new(), ActionQueue::default());
        roster
    }

    #[test]
    fn missing_operation_is_reported_by_type() {
        let roster = roster();
        let ctx = OperationContext {
            enemies: &roster,
            hand: &[],
        };
        let strike = Action::attack("Strike", 1, DamageProfile::single(6));

        let error = prepare_context(&strike, &ctx, ActionSource::Player, None, &[]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Operation \"target-enemy\" is required but missing"
        );
    }

    #[test]
    fn enemies_need_no_operations() {
        let roster = roster();
        let ctx = OperationContext {
            enemies: &roster,
            hand: &[],
        };
        let strike = Action::attack("Bite", 0, DamageProfile::single(3));
        let context =
            prepare_context(&strike, &ctx, ActionSource::Enemy(EnemyId(1)), None, &[]).unwrap();
        assert_eq!(context.target, None);
    }

    #[test]
    fn resolved_operations_contribute_metadata() {
        let roster = roster();
        let ctx = OperationContext {
            enemies: &roster,
            hand: &[],
        };
        let strike = Action::attack("Strike", 1, DamageProfile::single(6));
        let operations = [CardOperation::new("target-enemy", json!({ "enemyId": 1 }))];

        let context =
            prepare_context(&strike, &ctx, ActionSource::Player, None, &operations).unwrap();
        assert_eq!(context.target, Some(EnemyId(1)));
        assert_eq!(context.metadata["targetEnemyId"], json!(1));
        assert_eq!(context.metadata["targetName"], json!("slime"));
    }

    #[test]
    fn duplicate_operation_is_rejected() {
        let roster = roster();
        let ctx = OperationContext {
            enemies: &roster,
            hand: &[],
        };
        let strike = Action::attack("Strike", 1, DamageProfile::single(6));
        let operations = [
            CardOperation::target_enemy(EnemyId(1)),
            CardOperation::target_enemy(EnemyId(1)),
        ];

        let error =
            prepare_context(&strike, &ctx, ActionSource::Player, None, &operations).unwrap_err();
        assert_eq!(error, OperationError::AlreadyCompleted("target-enemy".into()));
    }

    #[test]
    fn availability_lists_every_enemy() {
        let roster = roster();
        let ctx = OperationContext {
            enemies: &roster,
            hand: &[],
        };
        let strike = Action::attack("Strike", 1, DamageProfile::single(6));
        let described = describe_operations(&strike, &ctx, None);
        assert_eq!(described.len(), 1);
        assert_eq!(described[0].kind, "target-enemy");
        assert!(described[0].candidates[0].selectable);
    }
}
