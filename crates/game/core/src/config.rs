/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Maximum number of cards held in hand. Clamped to [`Self::MAX_HAND_SIZE`].
    pub hand_limit: usize,
    /// Cards drawn at the start of every player turn.
    pub draw_per_turn: u32,
    /// Cards drawn when the battle starts, before the first turn draw.
    pub initial_draw: u32,
    /// Mana restored at the start of every player turn.
    pub max_mana: u32,
    /// Seed mixed into every random roll of the battle.
    pub seed: u64,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_HAND_SIZE: usize = 10;
    pub const MAX_STATUS_EFFECTS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DRAW_PER_TURN: u32 = 5;
    pub const DEFAULT_INITIAL_DRAW: u32 = 0;
    pub const DEFAULT_MAX_MANA: u32 = 3;

    pub fn new() -> Self {
        Self {
            hand_limit: Self::MAX_HAND_SIZE,
            draw_per_turn: Self::DEFAULT_DRAW_PER_TURN,
            initial_draw: Self::DEFAULT_INITIAL_DRAW,
            max_mana: Self::DEFAULT_MAX_MANA,
            seed: 0,
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::new()
        }
    }

    /// Hand limit after clamping to the storage capacity.
    pub fn effective_hand_limit(&self) -> usize {
        self.hand_limit.clamp(1, Self::MAX_HAND_SIZE)
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
