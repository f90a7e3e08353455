use bitflags::bitflags;

bitflags! {
    /// Top-level snapshot sections touched by a patch.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct SnapshotSections: u8 {
        const PLAYER       = 1 << 0;
        const ENEMIES      = 1 << 1;
        const HAND         = 1 << 2;
        const DECK         = 1 << 3;
        const DISCARD_PILE = 1 << 4;
        const EXILE_PILE   = 1 << 5;
        const TURN         = 1 << 6;
        const OUTCOME      = 1 << 7;

        const PILES = Self::HAND.bits()
            | Self::DECK.bits()
            | Self::DISCARD_PILE.bits()
            | Self::EXILE_PILE.bits();
    }
}

impl SnapshotSections {
    /// Snapshot key names, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        const NAMES: [(SnapshotSections, &str); 8] = [
            (SnapshotSections::PLAYER, "player"),
            (SnapshotSections::ENEMIES, "enemies"),
            (SnapshotSections::HAND, "hand"),
            (SnapshotSections::DECK, "deck"),
            (SnapshotSections::DISCARD_PILE, "discardPile"),
            (SnapshotSections::EXILE_PILE, "exilePile"),
            (SnapshotSections::TURN, "turn"),
            (SnapshotSections::OUTCOME, "outcome"),
        ];
        NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_snapshot_keys() {
        let sections = SnapshotSections::PLAYER | SnapshotSections::DISCARD_PILE;
        assert_eq!(sections.names(), ["player", "discardPile"]);
        assert!(!sections.intersects(SnapshotSections::HAND | SnapshotSections::DECK));
    }
}
