//! Host struct layout
//!
//! Offsets of every field the viewer reads, relative to the start of the
//! enclosing record. The real values belong to a specific host build and
//! come from `config.toml`; the defaults describe the image produced by
//! [`crate::fixture`].

use serde::{Deserialize, Serialize};

/// Complete set of offsets used by the accessors in [`crate::game`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Longest entity name read, in bytes
    pub max_name_len: usize,
    pub entity_list: EntityListLayout,
    pub list: ListLayout,
    pub node: NodeLayout,
    pub entry: EntryLayout,
    pub character: CharacterLayout,
    pub position: PositionLayout,
    pub parameter: ParameterLayout,
    pub equipment: EquipmentLayout,
    pub item: ItemLayout,
    pub item_info: ItemInfoLayout,
}

/// Location of the two list headers inside the entity list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityListLayout {
    pub characters: u64,
    pub items: u64,
}

/// List header: root node pointer and highest populated index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListLayout {
    pub root: u64,
    /// `u32` highest index; the traversal visits at most `count + 1` nodes
    pub count: u64,
}

/// Singly linked list node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeLayout {
    pub next: u64,
    pub entry: u64,
}

/// Entity pointer inside a node's entry, per list kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryLayout {
    pub character: u64,
    pub item: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterLayout {
    /// `u64` entity id
    pub id: u64,
    /// Pointer to a NUL-terminated name
    pub name: u64,
    /// Pointer to the record holding the world position
    pub position: u64,
    /// Pointer to the parameter block
    pub parameter: u64,
    /// `u64` id of the current target
    pub target_id: u64,
    /// Pointer to the equipment block
    pub equipment: u64,
}

/// Three `f32` components inside the position record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionLayout {
    pub x: u64,
    pub y: u64,
    pub z: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterLayout {
    /// `u32` race code
    pub race: u64,
    /// `u16` age
    pub age: u64,
    /// `f32` fields
    pub combat_power: u64,
    pub life: u64,
    pub life_max_base: u64,
    pub life_max_mod: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentLayout {
    /// Start of the slot array
    pub slots: u64,
    /// Size of one slot record
    pub stride: u64,
    /// Number of slots in the array
    pub slot_count: usize,
    /// `u32` fields inside a slot record
    pub class_id: u64,
    pub color1: u64,
    pub color2: u64,
    pub color3: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemLayout {
    /// `u64` entity id
    pub id: u64,
    /// Pointer to a NUL-terminated name
    pub name: u64,
    /// Pointer to the shared item-info record
    pub info: u64,
    /// `u32` fields
    pub item_id: u64,
    pub inventory_id: u64,
    pub position_x: u64,
    pub position_y: u64,
    /// First of six consecutive `u32` colours
    pub colors: u64,
    pub price: u64,
    pub sell_price: u64,
    pub durability: u64,
    pub max_durability: u64,
    /// `u16` current stack size
    pub stack_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemInfoLayout {
    /// `u16` stack limit
    pub max_stack_count: u64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            max_name_len: 256,
            entity_list: EntityListLayout::default(),
            list: ListLayout::default(),
            node: NodeLayout::default(),
            entry: EntryLayout::default(),
            character: CharacterLayout::default(),
            position: PositionLayout::default(),
            parameter: ParameterLayout::default(),
            equipment: EquipmentLayout::default(),
            item: ItemLayout::default(),
            item_info: ItemInfoLayout::default(),
        }
    }
}

impl Default for EntityListLayout {
    fn default() -> Self {
        Self {
            characters: 0x10,
            items: 0x30,
        }
    }
}

impl Default for ListLayout {
    fn default() -> Self {
        Self {
            root: 0x00,
            count: 0x08,
        }
    }
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self {
            next: 0x00,
            entry: 0x08,
        }
    }
}

impl Default for EntryLayout {
    fn default() -> Self {
        Self {
            character: 0x10,
            item: 0x10,
        }
    }
}

impl Default for CharacterLayout {
    fn default() -> Self {
        Self {
            id: 0x08,
            name: 0x10,
            position: 0x18,
            parameter: 0x20,
            target_id: 0x28,
            equipment: 0x30,
        }
    }
}

impl Default for PositionLayout {
    fn default() -> Self {
        Self {
            x: 0x00,
            y: 0x04,
            z: 0x08,
        }
    }
}

impl Default for ParameterLayout {
    fn default() -> Self {
        Self {
            race: 0x00,
            age: 0x08,
            combat_power: 0x10,
            life: 0x18,
            life_max_base: 0x1C,
            life_max_mod: 0x20,
        }
    }
}

impl Default for EquipmentLayout {
    fn default() -> Self {
        Self {
            slots: 0x00,
            stride: 0x20,
            slot_count: 20,
            class_id: 0x00,
            color1: 0x04,
            color2: 0x08,
            color3: 0x0C,
        }
    }
}

impl Default for ItemLayout {
    fn default() -> Self {
        Self {
            id: 0x08,
            name: 0x10,
            info: 0x18,
            item_id: 0x20,
            inventory_id: 0x24,
            position_x: 0x28,
            position_y: 0x2C,
            colors: 0x30,
            price: 0x48,
            sell_price: 0x4C,
            durability: 0x50,
            max_durability: 0x54,
            stack_count: 0x58,
        }
    }
}

impl Default for ItemInfoLayout {
    fn default() -> Self {
        Self {
            max_stack_count: 0x00,
        }
    }
}

impl Layout {
    /// Bytes the fixture reserves for one entity list
    pub fn entity_list_size(&self) -> u64 {
        self.entity_list.characters.max(self.entity_list.items) + self.list.count.max(self.list.root) + 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_deserialize_empty_is_default() {
        let layout: Layout = toml::from_str("").unwrap();
        assert_eq!(layout, Layout::default());
    }

    #[test]
    fn test_layout_partial_override() {
        let toml_str = r#"
max_name_len = 64

[character]
id = 0x40
"#;
        let layout: Layout = toml::from_str(toml_str).unwrap();
        assert_eq!(layout.max_name_len, 64);
        assert_eq!(layout.character.id, 0x40);
        // Untouched fields keep their defaults
        assert_eq!(layout.character.name, CharacterLayout::default().name);
        assert_eq!(layout.item, ItemLayout::default());
    }

    #[test]
    fn test_default_item_fields_do_not_overlap_colors() {
        let item = ItemLayout::default();
        // Six u32 colours fit before the price
        assert!(item.colors + 6 * 4 <= item.price);
    }

    #[test]
    fn test_entity_list_size_covers_both_headers() {
        let layout = Layout::default();
        let size = layout.entity_list_size();
        assert!(size >= layout.entity_list.items + layout.list.count + 4);
    }
}
