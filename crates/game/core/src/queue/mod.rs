//! Per-enemy action scheduling.
//!
//! Every enemy owns an [`ActionQueue`]: an ordered buffer of upcoming actions
//! plus a [`QueuePolicy`] that decides what gets scheduled next.
//!
//! ```text
//! idle ──plan──▶ planned ──act──▶ acted ──reset_turn──▶ idle | planned
//! ```
//!
//! Immediate insertion (crowd control) cuts to the front of the buffer and
//! keeps the scheduled remainder intact, so an interrupted plan resumes on
//! the following turn.

mod policy;

pub use policy::{BeamPolicy, DefaultPolicy, QueuePolicy};

use std::collections::VecDeque;

use crate::action::Action;
use crate::env::RngOracle;

/// Where a queued action came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueueOrigin {
    /// Chosen by the policy; `index` points into the enemy's declared actions.
    Scheduled { index: usize },
    /// Forced in from outside, e.g. a heaven chain skip.
    Inserted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueuedAction {
    pub action: Action,
    pub origin: QueueOrigin,
}

/// Scheduler state as exposed to views.
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
pub enum QueueStatus {
    /// Nothing planned yet.
    Idle,
    /// Next action determined, not yet executed.
    Planned,
    /// Already acted this turn.
    Acted,
}

#[derive(Clone, Debug, Default)]
pub struct ActionQueue {
    buffer: VecDeque<QueuedAction>,
    policy: QueuePolicy,
    acted_this_turn: bool,
}

impl ActionQueue {
    pub fn new(policy: QueuePolicy) -> Self {
        Self {
            buffer: VecDeque::new(),
            policy,
            acted_this_turn: false,
        }
    }

    pub fn policy(&self) -> &QueuePolicy {
        &self.policy
    }

    /// Schedules the policy's next action when the buffer is empty.
    ///
    /// Returns true when something new was scheduled.
    pub fn plan(&mut self, actions: &[Action], rng: &dyn RngOracle, seed: u64) -> bool {
        if !self.buffer.is_empty() {
            return false;
        }
        let Some(index) = self.policy.choose(actions, rng, seed) else {
            return false;
        };
        let Some(action) = actions.get(index) else {
            return false;
        };
        tracing::debug!(index, action = %action.name, "enemy action planned");
        self.buffer.push_back(QueuedAction {
            action: action.clone(),
            origin: QueueOrigin::Scheduled { index },
        });
        true
    }

    /// Action that will run on the next `act`.
    pub fn peek(&self) -> Option<&Action> {
        self.buffer.front().map(|queued| &queued.action)
    }

    pub fn pending(&self) -> impl Iterator<Item = &QueuedAction> {
        self.buffer.iter()
    }

    /// Removes and returns the front of the buffer.
    pub fn next(&mut self) -> Option<QueuedAction> {
        self.buffer.pop_front()
    }

    /// Puts `action` in front of everything already queued.
    pub fn insert_immediate(&mut self, action: Action) {
        self.buffer.push_front(QueuedAction {
            action,
            origin: QueueOrigin::Inserted,
        });
    }

    /// Discards the next scheduled action, leaving inserted ones alone.
    ///
    /// Scripted policies restart their cycle when this happens.
    pub fn discard_next(&mut self) -> Option<QueuedAction> {
        let position = self
            .buffer
            .iter()
            .position(|queued| matches!(queued.origin, QueueOrigin::Scheduled { .. }))?;
        let discarded = self.buffer.remove(position)?;
        self.policy.interrupted();
        Some(discarded)
    }

    pub fn mark_acted(&mut self) {
        self.acted_this_turn = true;
    }

    pub fn has_acted(&self) -> bool {
        self.acted_this_turn
    }

    /// Clears the per-turn acted flag.
    pub fn reset_turn(&mut self) {
        self.acted_this_turn = false;
    }

    pub fn status(&self) -> QueueStatus {
        if self.acted_this_turn {
            QueueStatus::Acted
        } else if self.buffer.is_empty() {
            QueueStatus::Idle
        } else {
            QueueStatus::Planned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageProfile;
    use crate::env::FixedRng;

    fn actions() -> Vec<Action> {
        vec![
            Action::attack("Claw", 0, DamageProfile::single(4)),
            Action::attack("Bite", 0, DamageProfile::single(6)),
        ]
    }

    fn act(queue: &mut ActionQueue, actions: &[Action]) -> String {
        queue.plan(actions, &FixedRng(1), 0);
        let queued = queue.next().expect("an action is planned");
        queue.mark_acted();
        queue.reset_turn();
        queued.action.name
    }

    #[test]
    fn default_policy_alternates_after_random_opening() {
        let actions = actions();
        let mut queue = ActionQueue::default();
        // FixedRng(1) picks index 1 ("Bite") for the opening.
        let order: Vec<_> = (0..4).map(|_| act(&mut queue, &actions)).collect();
        assert_eq!(order, ["Bite", "Claw", "Bite", "Claw"]);
    }

    #[test]
    fn inserted_action_runs_first_then_plan_resumes() {
        let actions = actions();
        let mut queue = ActionQueue::default();
        queue.plan(&actions, &FixedRng(0), 0);
        assert_eq!(queue.peek().map(|a| a.name.as_str()), Some("Claw"));

        queue.insert_immediate(Action::skip("Bound", "bound by heaven chain"));
        assert_eq!(queue.peek().map(|a| a.name.as_str()), Some("Bound"));
        assert_eq!(queue.next().map(|q| q.origin), Some(QueueOrigin::Inserted));

        assert!(!queue.plan(&actions, &FixedRng(0), 0));
        assert_eq!(queue.next().map(|q| q.action.name), Some("Claw".to_string()));
    }

    #[test]
    fn discard_skips_inserted_entries() {
        let actions = actions();
        let mut queue = ActionQueue::default();
        queue.plan(&actions, &FixedRng(0), 0);
        queue.insert_immediate(Action::skip("Bound", "bound"));

        let discarded = queue.discard_next().unwrap();
        assert_eq!(discarded.action.name, "Claw");
        assert_eq!(queue.peek().map(|a| a.name.as_str()), Some("Bound"));
    }

    #[test]
    fn status_tracks_lifecycle() {
        let actions = actions();
        let mut queue = ActionQueue::default();
        assert_eq!(queue.status(), QueueStatus::Idle);
        queue.plan(&actions, &FixedRng(0), 0);
        assert_eq!(queue.status(), QueueStatus::Planned);
        queue.next();
        queue.mark_acted();
        assert_eq!(queue.status(), QueueStatus::Acted);
        queue.reset_turn();
        assert_eq!(queue.status(), QueueStatus::Idle);
    }
}
