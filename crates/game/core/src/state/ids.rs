use std::fmt;

/// Identifier of an enemy, assigned once by [`EnemyRoster`](super::EnemyRoster).
///
/// Ids are allocated monotonically from 1 and never reused within a battle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a card, assigned once by [`CardRepository`](super::CardRepository).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Any participant of the battle that can hold statuses and take damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActorRef {
    Player,
    Enemy(EnemyId),
}

impl ActorRef {
    /// Numeric actor component used when deriving RNG seeds.
    pub const fn seed_component(self) -> u32 {
        match self {
            ActorRef::Player => 0,
            ActorRef::Enemy(id) => id.0,
        }
    }

    pub const fn is_player(self) -> bool {
        matches!(self, ActorRef::Player)
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRef::Player => f.write_str("player"),
            ActorRef::Enemy(id) => write!(f, "enemy #{id}"),
        }
    }
}
