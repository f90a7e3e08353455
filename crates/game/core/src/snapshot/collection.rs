use std::collections::BTreeMap;

/// Generic collection delta capturing additions, removals, and updates.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CollectionDelta<Id, Added, Patch> {
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub added: Vec<Added>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<Id>,
    #[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
    pub updated: Vec<Patch>,
}

impl<Id, Added, Patch> CollectionDelta<Id, Added, Patch> {
    pub(super) fn new() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            updated: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

impl<Id, Added, Patch> Default for CollectionDelta<Id, Added, Patch> {
    fn default() -> Self {
        Self::new()
    }
}

/// Diffs two id-keyed collections.
///
/// Removed ids come out sorted so the delta is deterministic.
pub(super) fn diff_collection<Id, T, Patch, FId, FPatch>(
    before: &[T],
    after: &[T],
    id_fn: FId,
    mut patch_fn: FPatch,
) -> CollectionDelta<Id, T, Patch>
where
    Id: Ord + Copy,
    T: Clone,
    FId: Fn(&T) -> Id,
    FPatch: FnMut(&T, &T) -> Option<Patch>,
{
    let mut before_map: BTreeMap<Id, &T> = before.iter().map(|item| (id_fn(item), item)).collect();
    let mut delta = CollectionDelta::new();

    for entry in after {
        let id = id_fn(entry);
        match before_map.remove(&id) {
            Some(prev) => {
                if let Some(patch) = patch_fn(prev, entry) {
                    delta.updated.push(patch);
                }
            }
            None => delta.added.push(entry.clone()),
        }
    }

    delta.removed.extend(before_map.into_keys());
    delta
}
