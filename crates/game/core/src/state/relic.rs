use crate::action::Action;
use crate::error::BattleError;

/// A relic: a reusable player ability outside the card economy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relic {
    pub id: String,
    pub name: String,
    pub action: Action,
    /// Remaining activations, `None` for unlimited.
    pub charges: Option<u32>,
    pub once_per_turn: bool,
    pub used_this_turn: bool,
    /// Activations over the whole battle.
    pub uses: u32,
}

impl Relic {
    pub fn new(id: impl Into<String>, name: impl Into<String>, action: Action) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            action,
            charges: None,
            once_per_turn: false,
            used_this_turn: false,
            uses: 0,
        }
    }

    pub fn ensure_ready(&self) -> Result<(), BattleError> {
        let exhausted = self.charges == Some(0) || (self.once_per_turn && self.used_this_turn);
        if exhausted {
            return Err(BattleError::RelicExhausted(self.id.clone()));
        }
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ensure_ready().is_ok()
    }

    pub(crate) fn consume(&mut self) {
        if let Some(charges) = self.charges.as_mut() {
            *charges = charges.saturating_sub(1);
        }
        self.used_this_turn = true;
        self.uses += 1;
    }

    pub(crate) fn reset_turn(&mut self) {
        self.used_this_turn = false;
    }
}
