//! Entity list traversal

use super::{Entity, EntityKind};
use crate::layout::Layout;
use crate::memory::{MemoryReader, field};

/// The host's entity list: one linked list per [`EntityKind`]
pub struct EntityList<'a, M> {
    memory: &'a M,
    layout: &'a Layout,
    address: u64,
}

impl<M> Clone for EntityList<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for EntityList<'_, M> {}

impl<'a, M: MemoryReader> EntityList<'a, M> {
    pub(crate) fn new(memory: &'a M, layout: &'a Layout, address: u64) -> Self {
        Self {
            memory,
            layout,
            address,
        }
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    /// Wrap the record at `address` as an `E`.
    pub fn entity<E: Entity<'a, M>>(&self, address: u64) -> E {
        E::at(self.memory, self.layout, address)
    }

    /// Address of the list header for `kind`.
    fn header(&self, kind: EntityKind) -> Option<u64> {
        let offset = match kind {
            EntityKind::Character => self.layout.entity_list.characters,
            EntityKind::Item => self.layout.entity_list.items,
        };
        field(self.address, offset).ok()
    }

    /// Highest populated index of the list for `kind`.
    pub fn highest_index(&self, kind: EntityKind) -> Option<u32> {
        let header = self.header(kind)?;
        field(header, self.layout.list.count)
            .and_then(|address| self.memory.read_u32(address))
            .ok()
    }

    /// Walk the list for `kind`.
    ///
    /// Yields one element per visited node: the entity pointer, or `None`
    /// when the node's entry or entity pointer is unset.
    pub fn nodes(&self, kind: EntityKind) -> EntityNodes<'a, M> {
        let header = self.header(kind);
        let root = header.and_then(|header| {
            field(header, self.layout.list.root)
                .and_then(|address| self.memory.read_ptr(address))
                .ok()
                .flatten()
        });

        EntityNodes {
            memory: self.memory,
            layout: self.layout,
            kind,
            node: root,
            index: 0,
            highest_index: self.highest_index(kind).unwrap_or(0),
        }
    }
}

/// Iterator over the nodes of one entity list
///
/// Visits at most `highest_index + 1` nodes and stops early at a null or
/// unreadable `next` pointer, so a cyclic or corrupt list still terminates.
pub struct EntityNodes<'a, M> {
    memory: &'a M,
    layout: &'a Layout,
    kind: EntityKind,
    node: Option<u64>,
    index: u32,
    highest_index: u32,
}

impl<M: MemoryReader> EntityNodes<'_, M> {
    fn entity_of(&self, node: u64) -> Option<u64> {
        let offset = match self.kind {
            EntityKind::Character => self.layout.entry.character,
            EntityKind::Item => self.layout.entry.item,
        };
        let entry = field(node, self.layout.node.entry)
            .and_then(|address| self.memory.read_ptr(address))
            .ok()
            .flatten()?;
        field(entry, offset)
            .and_then(|address| self.memory.read_ptr(address))
            .ok()
            .flatten()
    }
}

impl<M: MemoryReader> Iterator for EntityNodes<'_, M> {
    type Item = Option<u64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index > self.highest_index {
            return None;
        }
        let node = self.node?;

        let entity = self.entity_of(node);
        self.node = match field(node, self.layout.node.next).and_then(|a| self.memory.read_ptr(a)) {
            Ok(next) => next,
            Err(e) => {
                tracing::trace!("{} list: next pointer of {:#x} unreadable: {}", self.kind.label(), node, e);
                None
            }
        };
        // `index <= highest_index <= u32::MAX` so a wrap only ends the walk
        self.index = match self.index.checked_add(1) {
            Some(index) => index,
            None => {
                self.node = None;
                self.index
            }
        };

        Some(entity)
    }
}
