use serde_json::Value;

use crate::state::CardId;

use super::{Availability, Metadata, Operation, OperationContext, OperationError, numeric_id};

/// Selects a card currently held in hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectHandCardOperation {
    /// Card that may not be chosen, usually the one being played.
    pub exclude: Option<CardId>,
}

impl SelectHandCardOperation {
    pub fn excluding(card: Option<CardId>) -> Self {
        Self { exclude: card }
    }
}

impl Operation for SelectHandCardOperation {
    type Output = CardId;
    type Candidate = CardId;

    const KIND: &'static str = "select-hand-card";

    fn resolve(
        &self,
        payload: &Value,
        ctx: &OperationContext<'_>,
    ) -> Result<CardId, OperationError> {
        let id = numeric_id(payload, "cardId")
            .map(CardId)
            .ok_or(OperationError::MissingCardId)?;
        if !ctx.hand.iter().any(|card| card.id() == id) {
            return Err(OperationError::CardNotInHand(id));
        }
        if self.exclude == Some(id) {
            return Err(OperationError::CardNotSelectable {
                id,
                reason: "card is being played".into(),
            });
        }
        Ok(id)
    }

    fn describe_availability(&self, ctx: &OperationContext<'_>) -> Vec<Availability<CardId>> {
        ctx.hand
            .iter()
            .map(|card| {
                if self.exclude == Some(card.id()) {
                    Availability::blocked(card.id(), "card is being played")
                } else {
                    Availability::selectable(card.id())
                }
            })
            .collect()
    }

    fn metadata(&self, output: &CardId, ctx: &OperationContext<'_>) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("selectedCardId".into(), Value::from(output.0));
        if let Some(card) = ctx.hand.iter().find(|card| card.id() == *output) {
            metadata.insert("selectedCardName".into(), Value::from(card.name()));
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::state::{CardBody, CardRepository, EnemyRoster};
    use serde_json::json;

    #[test]
    fn rejects_unknown_and_excluded_cards() {
        let mut repo = CardRepository::new();
        let played = repo.register(CardBody::Action(Action::skip("Ponder", "idle")));
        let other = repo.register(CardBody::Action(Action::skip("Wait", "idle")));
        let hand = vec![played.clone(), other.clone()];
        let roster = EnemyRoster::new();
        let ctx = OperationContext {
            enemies: &roster,
            hand: &hand,
        };
        let operation = SelectHandCardOperation::excluding(Some(played.id()));

        assert_eq!(operation.resolve(&json!({ "cardId": other.id().0 }), &ctx), Ok(other.id()));
        assert_eq!(
            operation.resolve(&json!(999), &ctx).unwrap_err().to_string(),
            "Card 999 not found in hand"
        );
        assert_eq!(
            operation.resolve(&json!(null), &ctx).unwrap_err().to_string(),
            "Operation requires a numeric card id"
        );
        assert!(matches!(
            operation.resolve(&json!(played.id().0), &ctx),
            Err(OperationError::CardNotSelectable { .. })
        ));

        let metadata = operation.metadata(&other.id(), &ctx);
        assert_eq!(metadata["selectedCardName"], json!("Wait"));
    }
}
