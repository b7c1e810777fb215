//! Typed accessors over host game structures
//!
//! Nothing here owns host data. Accessors hold an address plus a borrowed
//! reader and re-read their fields on every call, so a value is exactly as
//! fresh as the frame that asked for it. Getters return `None` when the
//! host has not populated a field yet or the record has gone away.

mod character;
mod entity_list;
mod item;

pub use character::{Character, Equipment, EquipmentSlot, Parameter};
pub use entity_list::{EntityList, EntityNodes};
pub use item::{Item, ItemRecord};

use crate::layout::Layout;
use crate::memory::{MemoryReader, field};

/// Which of the two entity lists to walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Character,
    Item,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Item => "item",
        }
    }
}

/// Common surface of host entity records
pub trait Entity<'a, M: MemoryReader>: Sized {
    const KIND: EntityKind;

    /// Wrap the record at `address`.
    fn at(memory: &'a M, layout: &'a Layout, address: u64) -> Self;

    fn address(&self) -> u64;

    /// Entity id, `None` while the record is unpopulated
    fn id(&self) -> Option<u64>;

    /// Display name, `None` while the name pointer is unset
    fn name(&self) -> Option<String>;
}

/// The host game as seen through its memory
pub struct Game<M> {
    memory: M,
    layout: Layout,
    /// Address of the host global holding the entity-list pointer
    entity_list_slot: u64,
}

impl<M: MemoryReader> Game<M> {
    pub fn new(memory: M, layout: Layout, entity_list_slot: u64) -> Self {
        Self {
            memory,
            layout,
            entity_list_slot,
        }
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn entity_list_slot(&self) -> u64 {
        self.entity_list_slot
    }

    /// The live entity list, or `None` while the host has not created it.
    pub fn entity_list(&self) -> Option<EntityList<'_, M>> {
        match self.memory.read_ptr(self.entity_list_slot) {
            Ok(Some(address)) => Some(EntityList::new(&self.memory, &self.layout, address)),
            Ok(None) => None,
            Err(e) => {
                tracing::trace!("entity list slot unreadable: {}", e);
                None
            }
        }
    }

    /// First character in the character list whose id is `id`.
    pub fn character_by_id(&self, id: u64) -> Option<Character<'_, M>> {
        if id == 0 {
            return None;
        }
        let list = self.entity_list()?;
        list.nodes(EntityKind::Character)
            .flatten()
            .map(|address| list.entity::<Character<'_, M>>(address))
            .find(|character| character.id() == Some(id))
    }
}

/// Read an optional pointer field, folding read failures into `None`.
pub(crate) fn read_ptr_field<M: MemoryReader>(memory: &M, base: u64, offset: u64) -> Option<u64> {
    field(base, offset)
        .and_then(|address| memory.read_ptr(address))
        .ok()
        .flatten()
}

/// Read a non-zero id field.
pub(crate) fn read_id_field<M: MemoryReader>(memory: &M, base: u64, offset: u64) -> Option<u64> {
    field(base, offset)
        .and_then(|address| memory.read_u64(address))
        .ok()
        .filter(|&id| id != 0)
}

/// Follow a name pointer and read the string it points at.
pub(crate) fn read_name_field<M: MemoryReader>(
    memory: &M,
    layout: &Layout,
    base: u64,
    offset: u64,
) -> Option<String> {
    let name = read_ptr_field(memory, base, offset)?;
    memory.read_c_string(name, layout.max_name_len).ok()
}
