/// Which side is acting.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Side {
    Player,
    Enemy,
}

/// Step within a side's turn.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TurnPhase {
    /// Turn-start hooks and draws.
    Start,
    /// Commands are accepted.
    Main,
    /// Cleanup before the other side starts.
    End,
}

/// Position of the battle in its turn sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnPosition {
    /// 1-based round number; 0 before the battle starts.
    pub turn: u32,
    pub side: Side,
    pub phase: TurnPhase,
}

impl TurnPosition {
    pub const fn new() -> Self {
        Self {
            turn: 0,
            side: Side::Player,
            phase: TurnPhase::Start,
        }
    }

    pub fn is_player_main(&self) -> bool {
        self.side == Side::Player && self.phase == TurnPhase::Main
    }

    pub fn is_enemy_main(&self) -> bool {
        self.side == Side::Enemy && self.phase == TurnPhase::Main
    }
}

impl Default for TurnPosition {
    fn default() -> Self {
        Self::new()
    }
}

/// How the battle stands.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BattleOutcome {
    #[default]
    Ongoing,
    /// Every enemy is defeated or has escaped.
    Victory,
    /// The player's HP reached zero.
    Defeat,
}

impl BattleOutcome {
    pub fn is_over(self) -> bool {
        self != BattleOutcome::Ongoing
    }
}
