//! Item records

use super::{Entity, EntityKind, read_id_field, read_name_field, read_ptr_field};
use crate::layout::Layout;
use crate::memory::{MemoryReader, Result, field};

/// An item record in host memory
pub struct Item<'a, M> {
    memory: &'a M,
    layout: &'a Layout,
    address: u64,
}

/// Snapshot of an item's plain fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRecord {
    pub item_id: u32,
    pub inventory_id: u32,
    pub position_x: u32,
    pub position_y: u32,
    pub colors: [u32; 6],
    pub price: u32,
    pub sell_price: u32,
    /// Raw durability; see `viewer::format::durability_to_f64`
    pub durability: u32,
    pub max_durability: u32,
    pub stack_count: u16,
}

impl<'a, M: MemoryReader> Entity<'a, M> for Item<'a, M> {
    const KIND: EntityKind = EntityKind::Item;

    fn at(memory: &'a M, layout: &'a Layout, address: u64) -> Self {
        Self {
            memory,
            layout,
            address,
        }
    }

    fn address(&self) -> u64 {
        self.address
    }

    fn id(&self) -> Option<u64> {
        read_id_field(self.memory, self.address, self.layout.item.id)
    }

    fn name(&self) -> Option<String> {
        read_name_field(self.memory, self.layout, self.address, self.layout.item.name)
    }
}

impl<M: MemoryReader> Item<'_, M> {
    pub fn record(&self) -> Option<ItemRecord> {
        self.read_record().ok()
    }

    fn read_record(&self) -> Result<ItemRecord> {
        let it = &self.layout.item;
        let m = self.memory;
        let base = self.address;
        let u32_at = |offset| field(base, offset).and_then(|a| m.read_u32(a));

        let mut colors = [0u32; 6];
        for (i, color) in colors.iter_mut().enumerate() {
            *color = u32_at(it.colors + 4 * i as u64)?;
        }

        Ok(ItemRecord {
            item_id: u32_at(it.item_id)?,
            inventory_id: u32_at(it.inventory_id)?,
            position_x: u32_at(it.position_x)?,
            position_y: u32_at(it.position_y)?,
            colors,
            price: u32_at(it.price)?,
            sell_price: u32_at(it.sell_price)?,
            durability: u32_at(it.durability)?,
            max_durability: u32_at(it.max_durability)?,
            stack_count: m.read_u16(field(base, it.stack_count)?)?,
        })
    }

    /// Stack limit from the shared item-info record.
    pub fn max_stack_count(&self) -> Option<u16> {
        let info = read_ptr_field(self.memory, self.address, self.layout.item.info)?;
        field(info, self.layout.item_info.max_stack_count)
            .and_then(|address| self.memory.read_u16(address))
            .ok()
    }
}
