//! Synthetic host image
//!
//! Lays out an entity list, characters and items in a [`SnapshotMemory`]
//! exactly as the host would under a given [`Layout`], so the viewer can
//! run without the game attached.

use glam::Vec3;

use crate::game::{EntityKind, EquipmentSlot, Game, ItemRecord, Parameter};
use crate::layout::Layout;
use crate::memory::{MemoryError, MemoryReader, Result, SnapshotMemory, field};

/// Description of a character to place in the image
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSpec {
    pub id: u64,
    pub name: Option<String>,
    pub position: Option<Vec3>,
    pub parameter: Option<Parameter>,
    pub target_id: u64,
    /// `None` leaves the equipment pointer null
    pub equipment: Option<Vec<(usize, EquipmentSlot)>>,
}

impl CharacterSpec {
    /// A fully populated character with no equipment and no target.
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: Some(name.to_string()),
            position: Some(Vec3::ZERO),
            parameter: Some(Parameter {
                race: 10001,
                age: 17,
                combat_power: 100.0,
                life: 50.0,
                life_max_base: 40.0,
                life_max_mod: 10.0,
            }),
            target_id: 0,
            equipment: None,
        }
    }
}

/// Description of an item to place in the image
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSpec {
    pub id: u64,
    pub name: Option<String>,
    pub record: ItemRecord,
    /// `None` leaves the item-info pointer null
    pub max_stack_count: Option<u16>,
}

impl ItemSpec {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: Some(name.to_string()),
            record: ItemRecord {
                item_id: 0,
                inventory_id: 0,
                position_x: 0,
                position_y: 0,
                colors: [0; 6],
                price: 0,
                sell_price: 0,
                durability: 0,
                max_durability: 0,
                stack_count: 1,
            },
            max_stack_count: Some(1),
        }
    }
}

/// Tail and length of one linked list being built
#[derive(Debug, Clone, Copy, Default)]
struct ListState {
    last_node: Option<u64>,
    len: u32,
}

/// A host image under construction
pub struct FixtureWorld {
    memory: SnapshotMemory,
    layout: Layout,
    entity_list_slot: u64,
    entity_list: Option<u64>,
    characters: ListState,
    items: ListState,
}

impl FixtureWorld {
    /// An image with an empty entity list.
    pub fn new(layout: Layout) -> Result<Self> {
        let mut memory = SnapshotMemory::new();
        let entity_list_slot = memory.alloc(8);
        let entity_list = memory.alloc(layout.entity_list_size() as usize);
        memory.write_u64(entity_list_slot, entity_list)?;

        Ok(Self {
            memory,
            layout,
            entity_list_slot,
            entity_list: Some(entity_list),
            characters: ListState::default(),
            items: ListState::default(),
        })
    }

    /// An image whose entity-list global is still null.
    pub fn without_entity_list(layout: Layout) -> Self {
        let mut memory = SnapshotMemory::new();
        let entity_list_slot = memory.alloc(8);

        Self {
            memory,
            layout,
            entity_list_slot,
            entity_list: None,
            characters: ListState::default(),
            items: ListState::default(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn memory(&self) -> &SnapshotMemory {
        &self.memory
    }

    /// View the image as a running game.
    pub fn game(&self) -> Game<&SnapshotMemory> {
        Game::new(&self.memory, self.layout.clone(), self.entity_list_slot)
    }

    pub fn into_game(self) -> Game<SnapshotMemory> {
        Game::new(self.memory, self.layout, self.entity_list_slot)
    }

    /// Place a character and append it to the character list.
    ///
    /// Returns the character's address.
    pub fn add_character(&mut self, spec: &CharacterSpec) -> Result<u64> {
        let address = self.write_character(spec)?;
        self.append_node(EntityKind::Character, Some(address))?;
        Ok(address)
    }

    /// Place an item and append it to the item list.
    pub fn add_item(&mut self, spec: &ItemSpec) -> Result<u64> {
        let address = self.write_item(spec)?;
        self.append_node(EntityKind::Item, Some(address))?;
        Ok(address)
    }

    /// Append a node whose entry points at `entity` (or at nothing).
    ///
    /// Lets tests link one record twice or leave holes in a list.
    pub fn append_node(&mut self, kind: EntityKind, entity: Option<u64>) -> Result<u64> {
        let Some(entity_list) = self.entity_list else {
            return Err(MemoryError::Null { len: 0 });
        };

        let entry = self
            .memory
            .alloc(span(&[self.layout.entry.character, self.layout.entry.item]));
        let entry_offset = match kind {
            EntityKind::Character => self.layout.entry.character,
            EntityKind::Item => self.layout.entry.item,
        };
        self.memory
            .write_field_u64(entry, entry_offset, entity.unwrap_or(0))?;

        let node = self
            .memory
            .alloc(span(&[self.layout.node.next, self.layout.node.entry]));
        self.memory
            .write_field_u64(node, self.layout.node.entry, entry)?;

        let header = field(entity_list, self.header_offset(kind))?;
        let state = self.list_state(kind);
        match state.last_node {
            Some(last) => self.memory.write_field_u64(last, self.layout.node.next, node)?,
            None => self.memory.write_field_u64(header, self.layout.list.root, node)?,
        }
        let len = state.len + 1;
        *self.list_state_mut(kind) = ListState {
            last_node: Some(node),
            len,
        };

        self.set_highest_index(kind, len - 1)?;
        Ok(node)
    }

    /// Overwrite the highest-index field of a list header.
    pub fn set_highest_index(&mut self, kind: EntityKind, index: u32) -> Result<()> {
        let Some(entity_list) = self.entity_list else {
            return Ok(());
        };
        let header = field(entity_list, self.header_offset(kind))?;
        self.memory
            .write_u32(field(header, self.layout.list.count)?, index)
    }

    /// Point the last node of a list back at the list's first node.
    pub fn close_cycle(&mut self, kind: EntityKind) -> Result<()> {
        let (Some(entity_list), Some(last)) = (self.entity_list, self.list_state(kind).last_node)
        else {
            return Ok(());
        };
        let header = field(entity_list, self.header_offset(kind))?;
        let root = self
            .memory
            .read_u64(field(header, self.layout.list.root)?)?;
        self.memory.write_field_u64(last, self.layout.node.next, root)
    }

    /// Move a character placed by [`Self::add_character`].
    pub fn set_position(&mut self, character: u64, position: Vec3) -> Result<()> {
        let Some(record) = self
            .memory
            .read_ptr(field(character, self.layout.character.position)?)?
        else {
            return Ok(());
        };
        let pos = self.layout.position;
        self.memory.write_f32(field(record, pos.x)?, position.x)?;
        self.memory.write_f32(field(record, pos.y)?, position.y)?;
        self.memory.write_f32(field(record, pos.z)?, position.z)
    }

    /// Change a character's target.
    pub fn set_target(&mut self, character: u64, target_id: u64) -> Result<()> {
        self.memory
            .write_field_u64(character, self.layout.character.target_id, target_id)
    }

    fn write_character(&mut self, spec: &CharacterSpec) -> Result<u64> {
        let c = self.layout.character;
        let address = self.memory.alloc(span(&[
            c.id,
            c.name,
            c.position,
            c.parameter,
            c.target_id,
            c.equipment,
        ]));
        self.memory.write_field_u64(address, c.id, spec.id)?;
        self.memory
            .write_field_u64(address, c.target_id, spec.target_id)?;

        if let Some(name) = &spec.name {
            let name = self.memory.alloc_c_string(name);
            self.memory.write_field_u64(address, c.name, name)?;
        }

        if let Some(position) = spec.position {
            let pos = self.layout.position;
            let record = self.memory.alloc(span(&[pos.x, pos.y, pos.z]));
            self.memory.write_field_u64(address, c.position, record)?;
            self.set_position(address, position)?;
        }

        if let Some(parameter) = &spec.parameter {
            let block = self.write_parameter(parameter)?;
            self.memory.write_field_u64(address, c.parameter, block)?;
        }

        if let Some(slots) = &spec.equipment {
            let block = self.write_equipment(slots)?;
            self.memory.write_field_u64(address, c.equipment, block)?;
        }

        Ok(address)
    }

    fn write_parameter(&mut self, parameter: &Parameter) -> Result<u64> {
        let p = self.layout.parameter;
        let block = self.memory.alloc(span(&[
            p.race,
            p.age,
            p.combat_power,
            p.life,
            p.life_max_base,
            p.life_max_mod,
        ]));
        self.memory.write_u32(field(block, p.race)?, parameter.race)?;
        self.memory.write_u16(field(block, p.age)?, parameter.age)?;
        self.memory
            .write_f32(field(block, p.combat_power)?, parameter.combat_power)?;
        self.memory.write_f32(field(block, p.life)?, parameter.life)?;
        self.memory
            .write_f32(field(block, p.life_max_base)?, parameter.life_max_base)?;
        self.memory
            .write_f32(field(block, p.life_max_mod)?, parameter.life_max_mod)?;
        Ok(block)
    }

    fn write_equipment(&mut self, slots: &[(usize, EquipmentSlot)]) -> Result<u64> {
        let eq = self.layout.equipment;
        let size = eq.slots + eq.stride * eq.slot_count as u64;
        let block = self.memory.alloc(size as usize);

        for (index, slot) in slots {
            if *index >= eq.slot_count {
                continue;
            }
            let base = field(field(block, eq.slots)?, *index as u64 * eq.stride)?;
            self.memory.write_u32(field(base, eq.class_id)?, slot.class_id)?;
            self.memory.write_u32(field(base, eq.color1)?, slot.colors[0])?;
            self.memory.write_u32(field(base, eq.color2)?, slot.colors[1])?;
            self.memory.write_u32(field(base, eq.color3)?, slot.colors[2])?;
        }
        Ok(block)
    }

    fn write_item(&mut self, spec: &ItemSpec) -> Result<u64> {
        let it = self.layout.item;
        let r = &spec.record;
        let address = self.memory.alloc(span(&[
            it.id,
            it.name,
            it.info,
            it.item_id,
            it.inventory_id,
            it.position_x,
            it.position_y,
            it.colors + 5 * 4,
            it.price,
            it.sell_price,
            it.durability,
            it.max_durability,
            it.stack_count,
        ]));
        self.memory.write_field_u64(address, it.id, spec.id)?;

        if let Some(name) = &spec.name {
            let name = self.memory.alloc_c_string(name);
            self.memory.write_field_u64(address, it.name, name)?;
        }

        if let Some(max_stack_count) = spec.max_stack_count {
            let info = self
                .memory
                .alloc(span(&[self.layout.item_info.max_stack_count]));
            self.memory
                .write_u16(field(info, self.layout.item_info.max_stack_count)?, max_stack_count)?;
            self.memory.write_field_u64(address, it.info, info)?;
        }

        let fields = [
            (it.item_id, r.item_id),
            (it.inventory_id, r.inventory_id),
            (it.position_x, r.position_x),
            (it.position_y, r.position_y),
            (it.price, r.price),
            (it.sell_price, r.sell_price),
            (it.durability, r.durability),
            (it.max_durability, r.max_durability),
        ];
        for (offset, value) in fields {
            self.memory.write_u32(field(address, offset)?, value)?;
        }
        for (i, color) in r.colors.iter().enumerate() {
            self.memory
                .write_u32(field(address, it.colors + 4 * i as u64)?, *color)?;
        }
        self.memory
            .write_u16(field(address, it.stack_count)?, r.stack_count)?;

        Ok(address)
    }

    fn header_offset(&self, kind: EntityKind) -> u64 {
        match kind {
            EntityKind::Character => self.layout.entity_list.characters,
            EntityKind::Item => self.layout.entity_list.items,
        }
    }

    fn list_state(&self, kind: EntityKind) -> ListState {
        match kind {
            EntityKind::Character => self.characters,
            EntityKind::Item => self.items,
        }
    }

    fn list_state_mut(&mut self, kind: EntityKind) -> &mut ListState {
        match kind {
            EntityKind::Character => &mut self.characters,
            EntityKind::Item => &mut self.items,
        }
    }
}

/// Bytes needed to hold 8-byte fields at every offset in `offsets`.
fn span(offsets: &[u64]) -> usize {
    offsets.iter().max().map_or(8, |&max| max as usize + 8)
}
