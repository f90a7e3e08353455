//! Battle state: actors, cards, relics and turn position.
//!
//! Everything here is plain data plus small invariant-keeping helpers. Rules
//! that span several of these types live in [`crate::engine`].

mod actor;
mod card;
mod ids;
mod relic;
mod turn;

pub use actor::{Combatant, EnemyLife, EnemyRoster, EnemyState, PlayerState};
pub use card::{Card, CardBody, CardPiles, CardRepository, DrawResult, HandInsert, Pile};
pub use ids::{ActorRef, CardId, EnemyId};
pub use relic::Relic;
pub use turn::{BattleOutcome, Side, TurnPhase, TurnPosition};
