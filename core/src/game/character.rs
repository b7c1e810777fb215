//! Character records

use glam::Vec3;

use super::{Entity, EntityKind, read_id_field, read_name_field, read_ptr_field};
use crate::layout::Layout;
use crate::memory::{MemoryReader, Result, field};

/// A character record in host memory
pub struct Character<'a, M> {
    memory: &'a M,
    layout: &'a Layout,
    address: u64,
}

/// Snapshot of a character's parameter block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter {
    pub race: u32,
    pub age: u16,
    pub combat_power: f32,
    pub life: f32,
    pub life_max_base: f32,
    pub life_max_mod: f32,
}

impl Parameter {
    /// Effective maximum life (base plus modifiers)
    pub fn life_max(&self) -> f32 {
        self.life_max_base + self.life_max_mod
    }
}

/// One equipment slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentSlot {
    /// Item class, 0 for an empty slot
    pub class_id: u32,
    pub colors: [u32; 3],
}

impl EquipmentSlot {
    pub fn is_empty(&self) -> bool {
        self.class_id == 0
    }
}

/// A character's equipment block
pub struct Equipment<'a, M> {
    memory: &'a M,
    layout: &'a Layout,
    address: u64,
}

impl<'a, M: MemoryReader> Entity<'a, M> for Character<'a, M> {
    const KIND: EntityKind = EntityKind::Character;

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
        read_id_field(self.memory, self.address, self.layout.character.id)
    }

    fn name(&self) -> Option<String> {
        read_name_field(self.memory, self.layout, self.address, self.layout.character.name)
    }
}

impl<'a, M: MemoryReader> Character<'a, M> {
    /// World position, `None` while the character has no position record.
    pub fn position(&self) -> Option<Vec3> {
        let record = read_ptr_field(self.memory, self.address, self.layout.character.position)?;
        let pos = &self.layout.position;
        let read = |offset| field(record, offset).and_then(|a| self.memory.read_f32(a));
        match (read(pos.x), read(pos.y), read(pos.z)) {
            (Ok(x), Ok(y), Ok(z)) => Some(Vec3::new(x, y, z)),
            _ => None,
        }
    }

    pub fn parameter(&self) -> Option<Parameter> {
        let block = read_ptr_field(self.memory, self.address, self.layout.character.parameter)?;
        self.read_parameter(block).ok()
    }

    fn read_parameter(&self, block: u64) -> Result<Parameter> {
        let p = &self.layout.parameter;
        let m = self.memory;
        Ok(Parameter {
            race: m.read_u32(field(block, p.race)?)?,
            age: m.read_u16(field(block, p.age)?)?,
            combat_power: m.read_f32(field(block, p.combat_power)?)?,
            life: m.read_f32(field(block, p.life)?)?,
            life_max_base: m.read_f32(field(block, p.life_max_base)?)?,
            life_max_mod: m.read_f32(field(block, p.life_max_mod)?)?,
        })
    }

    /// Raw id of the current target, 0 when none
    pub fn target_id(&self) -> Option<u64> {
        field(self.address, self.layout.character.target_id)
            .and_then(|address| self.memory.read_u64(address))
            .ok()
    }

    pub fn equipment(&self) -> Option<Equipment<'a, M>> {
        let address = read_ptr_field(self.memory, self.address, self.layout.character.equipment)?;
        Some(Equipment {
            memory: self.memory,
            layout: self.layout,
            address,
        })
    }
}

impl<M: MemoryReader> Equipment<'_, M> {
    pub fn address(&self) -> u64 {
        self.address
    }

    /// Read slot `index`. `None` past the slot array or when unreadable.
    pub fn slot(&self, index: usize) -> Option<EquipmentSlot> {
        let eq = &self.layout.equipment;
        if index >= eq.slot_count {
            return None;
        }
        self.read_slot(index as u64).ok()
    }

    fn read_slot(&self, index: u64) -> Result<EquipmentSlot> {
        let eq = &self.layout.equipment;
        let m = self.memory;
        let slot = field(field(self.address, eq.slots)?, index.saturating_mul(eq.stride))?;
        Ok(EquipmentSlot {
            class_id: m.read_u32(field(slot, eq.class_id)?)?,
            colors: [
                m.read_u32(field(slot, eq.color1)?)?,
                m.read_u32(field(slot, eq.color2)?)?,
                m.read_u32(field(slot, eq.color3)?)?,
            ],
        })
    }
}
