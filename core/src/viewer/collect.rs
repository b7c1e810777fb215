//! Entity collection: walk, filter, dedupe, sort

use std::collections::VecDeque;

use hashbrown::HashSet;

use crate::game::{Entity, EntityList};
use crate::memory::MemoryReader;

/// One collected entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRow {
    pub address: u64,
    /// Name as read during collection
    pub name: Option<String>,
}

impl EntityRow {
    /// Sort key: absent names order as the empty string.
    pub fn sort_key(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Collect every live entity of type `E` from `list`.
///
/// Null entities and entities without an id are skipped. Accepted entities
/// are prepended, so equal names keep reverse link order; an address linked
/// more than once is kept only the first time it is seen. The result is
/// stably sorted by name.
pub fn collect_entities<'a, E, M>(list: &EntityList<'a, M>) -> Vec<EntityRow>
where
    E: Entity<'a, M>,
    M: MemoryReader,
{
    let mut rows = VecDeque::new();
    let mut seen = HashSet::new();
    let mut skipped = 0usize;

    for entity in list.nodes(E::KIND) {
        let Some(address) = entity else {
            skipped += 1;
            continue;
        };
        let entity: E = list.entity(address);
        if entity.id().is_none() {
            skipped += 1;
            continue;
        }
        if !seen.insert(address) {
            tracing::trace!("{} {:#x} linked twice, keeping first", E::KIND.label(), address);
            continue;
        }
        rows.push_front(EntityRow {
            address,
            name: entity.name(),
        });
    }

    let mut rows: Vec<_> = rows.into();
    rows.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));

    tracing::trace!(
        "collected {} {}s ({} skipped)",
        rows.len(),
        E::KIND.label(),
        skipped
    );
    rows
}
