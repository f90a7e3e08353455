//! Operations: validated, caller-supplied inputs to an action.
//!
//! A command arrives with a list of [`CardOperation`]s (`{ type, payload }`).
//! Each action declares which operation kinds it needs; the matching payload
//! is resolved against live battle state by the operation type:
//!
//! - [`TargetEnemyOperation`] (`"target-enemy"`): payload is an enemy id
//! - [`SelectHandCardOperation`] (`"select-hand-card"`): payload is a card id
//!
//! Resolution never mutates the battle. [`Operation::describe_availability`]
//! lets a caller pre-filter candidates so only valid payloads are submitted.

mod error;
mod hand;
mod target;

pub use error::OperationError;
pub use hand::SelectHandCardOperation;
pub use target::{TargetEnemyOperation, TargetRestriction};

use serde_json::Value;

use crate::state::{Card, EnemyRoster};

/// Free-form metadata attached to log entries.
pub type Metadata = serde_json::Map<String, Value>;

/// Raw operation submitted with a command.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardOperation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl CardOperation {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    pub fn target_enemy(id: crate::state::EnemyId) -> Self {
        Self::new(TargetEnemyOperation::KIND, Value::from(id.0))
    }

    pub fn select_hand_card(id: crate::state::CardId) -> Self {
        Self::new(SelectHandCardOperation::KIND, Value::from(id.0))
    }
}

/// Read-only view of the battle used to resolve operations.
#[derive(Clone, Copy, Debug)]
pub struct OperationContext<'a> {
    pub enemies: &'a EnemyRoster,
    pub hand: &'a [Card],
}

/// Whether one candidate can currently be chosen.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability<Id> {
    pub id: Id,
    pub selectable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl<Id> Availability<Id> {
    pub fn selectable(id: Id) -> Self {
        Self {
            id,
            selectable: true,
            reason: None,
        }
    }

    pub fn blocked(id: Id, reason: impl Into<String>) -> Self {
        Self {
            id,
            selectable: false,
            reason: Some(reason.into()),
        }
    }
}

/// A typed operation kind.
pub trait Operation {
    /// Resolved domain value.
    type Output;
    /// Identifier of a candidate listed by [`Operation::describe_availability`].
    type Candidate;

    /// Value of the `type` field this operation answers to.
    const KIND: &'static str;

    /// Validates `payload` against the battle and returns the resolved value.
    fn resolve(
        &self,
        payload: &Value,
        ctx: &OperationContext<'_>,
    ) -> Result<Self::Output, OperationError>;

    /// Lists every candidate with its eligibility.
    fn describe_availability(&self, ctx: &OperationContext<'_>) -> Vec<Availability<Self::Candidate>>;

    /// Log metadata contributed by a resolved value.
    fn metadata(&self, output: &Self::Output, ctx: &OperationContext<'_>) -> Metadata;
}

/// Lifecycle of one operation: pending until completed exactly once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OperationSlot<T> {
    #[default]
    Pending,
    Completed(T),
}

impl<T> OperationSlot<T> {
    /// Stores the resolved value. A slot can only be completed once.
    pub fn complete(&mut self, kind: &str, value: T) -> Result<(), OperationError> {
        if self.is_completed() {
            return Err(OperationError::AlreadyCompleted(kind.to_owned()));
        }
        *self = OperationSlot::Completed(value);
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, OperationSlot::Completed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            OperationSlot::Pending => None,
            OperationSlot::Completed(value) => Some(value),
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            OperationSlot::Pending => None,
            OperationSlot::Completed(value) => Some(value),
        }
    }
}

/// Reads a numeric id either from a bare number or from `{ "<field>": n }`.
pub(crate) fn numeric_id(payload: &Value, field: &str) -> Option<u32> {
    let raw = match payload {
        Value::Object(map) => map.get(field)?,
        other => other,
    };
    raw.as_u64().and_then(|id| u32::try_from(id).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slot_completes_once() {
        let mut slot = OperationSlot::Pending;
        slot.complete("target-enemy", 3).unwrap();
        assert_eq!(slot.value(), Some(&3));
        assert_eq!(
            slot.complete("target-enemy", 4).unwrap_err().to_string(),
            "Operation \"target-enemy\" has already been completed"
        );
        assert_eq!(slot.into_value(), Some(3));
    }

    #[test]
    fn numeric_id_accepts_number_or_object() {
        assert_eq!(numeric_id(&json!(7), "enemyId"), Some(7));
        assert_eq!(numeric_id(&json!({ "enemyId": 9 }), "enemyId"), Some(9));
        assert_eq!(numeric_id(&json!("7"), "enemyId"), None);
        assert_eq!(numeric_id(&json!(-1), "enemyId"), None);
        assert_eq!(numeric_id(&json!(1.5), "enemyId"), None);
        assert_eq!(numeric_id(&Value::Null, "enemyId"), None);
    }

    #[test]
    fn card_operation_uses_type_key() {
        let operation: CardOperation =
            serde_json::from_value(json!({ "type": "target-enemy", "payload": 2 })).unwrap();
        assert_eq!(operation.kind, "target-enemy");
        assert_eq!(operation.payload, json!(2));
    }
}
