use crate::action::Action;
use crate::env::RngOracle;

/// How an enemy picks its next scheduled action.
#[derive(Clone, Debug)]
pub enum QueuePolicy {
    Default(DefaultPolicy),
    Beam(BeamPolicy),
}

impl QueuePolicy {
    pub(super) fn choose(
        &mut self,
        actions: &[Action],
        rng: &dyn RngOracle,
        seed: u64,
    ) -> Option<usize> {
        match self {
            QueuePolicy::Default(policy) => policy.choose(actions, rng, seed),
            QueuePolicy::Beam(policy) => policy.choose(actions),
        }
    }

    pub(super) fn interrupted(&mut self) {
        match self {
            // Alternation state survives interruptions.
            QueuePolicy::Default(_) => {}
            QueuePolicy::Beam(policy) => policy.restart(),
        }
    }
}

impl Default for QueuePolicy {
    fn default() -> Self {
        QueuePolicy::Default(DefaultPolicy::default())
    }
}

/// Random opening, then strict round-robin over the declared actions.
///
/// The opening pick is drawn from the actions accepted by `opening_filter`
/// (all of them when none qualifies). With two actions this never repeats the
/// previous one.
#[derive(Clone, Debug)]
pub struct DefaultPolicy {
    last: Option<usize>,
    opening_filter: fn(&Action) -> bool,
}

impl DefaultPolicy {
    pub fn new(opening_filter: fn(&Action) -> bool) -> Self {
        Self {
            last: None,
            opening_filter,
        }
    }

    /// Index chosen most recently.
    pub fn last(&self) -> Option<usize> {
        self.last
    }

    fn choose(&mut self, actions: &[Action], rng: &dyn RngOracle, seed: u64) -> Option<usize> {
        if actions.is_empty() {
            return None;
        }
        let index = match self.last {
            Some(last) => (last + 1) % actions.len(),
            None => {
                let mut candidates: Vec<usize> = (0..actions.len())
                    .filter(|&index| (self.opening_filter)(&actions[index]))
                    .collect();
                if candidates.is_empty() {
                    candidates = (0..actions.len()).collect();
                }
                candidates[rng.pick_index(seed, candidates.len())]
            }
        };
        self.last = Some(index);
        Some(index)
    }
}

impl Default for DefaultPolicy {
    fn default() -> Self {
        Self::new(|_| true)
    }
}

/// Fixed scripted cycle, e.g. charge → charge → release.
///
/// Interrupting a scheduled phase restarts the cycle from the first phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeamPolicy {
    cycle: Vec<usize>,
    position: usize,
}

impl BeamPolicy {
    /// `cycle` lists indices into the enemy's declared actions.
    pub fn new(cycle: Vec<usize>) -> Self {
        Self { cycle, position: 0 }
    }

    /// Two charges followed by a release.
    pub fn charge_release(charge: usize, release: usize) -> Self {
        Self::new(vec![charge, charge, release])
    }

    pub fn cycle(&self) -> &[usize] {
        &self.cycle
    }

    /// Index into the cycle of the phase scheduled next.
    pub fn position(&self) -> usize {
        self.position
    }

    fn choose(&mut self, actions: &[Action]) -> Option<usize> {
        let index = *self.cycle.get(self.position)?;
        if index >= actions.len() {
            return None;
        }
        self.position = (self.position + 1) % self.cycle.len();
        Some(index)
    }

    fn restart(&mut self) {
        if self.position != 0 {
            tracing::warn!(position = self.position, "scripted cycle interrupted, restarting");
        }
        self.position = 0;
    }
}
