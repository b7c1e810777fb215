//! Display formatting for entity details
//!
//! Details are read once into plain structs, then turned into the bullet
//! lines the panel shows. Keeping the text here means it can be checked
//! without an egui frame.

use glam::Vec3;

use crate::game::{Character, Entity, Equipment, Game, Item, ItemRecord, Parameter};
use crate::memory::MemoryReader;

/// Equipment slots shown in the equipment sub-tree, in display order
pub const EQUIPMENT_SLOTS: [(usize, &str); 14] = [
    (1, "Torso\\Armor\\Shirt"),
    (2, "Head\\Helmet\\Hat"),
    (4, "Hands\\Gauntlets\\Gloves"),
    (5, "Feet\\Boots\\Shoes"),
    (7, "Hair"),
    (8, "Back\\Wings\\Robe"),
    (10, "Weapon 1"),
    (11, "Weapon 2"),
    (12, "Arrow\\Shield 1"),
    (13, "Arrow\\Shield 2"),
    (15, "Face Accessory"),
    (16, "Accessory 1"),
    (17, "Accessory 2"),
    (18, "Tail"),
];

pub const NO_TARGET: &str = "No Target";
pub const UNNAMED_TARGET: &str = "Unnamed";
pub const UNKNOWN_MAX_STACK: &str = "?";

/// Human-readable name of a race code
pub fn race_to_string(race: u32) -> &'static str {
    match race {
        8001 => "Female Giant",
        8002 => "Male Giant",
        9001 => "Female Elf",
        9002 => "Male Elf",
        10001 => "Female Human",
        10002 => "Male Human",
        _ => "Error: Unknown Race",
    }
}

/// Scale a raw durability value for display.
///
/// The host stores durability as fixed point whose precision depends on
/// the item: a max durability of six or more decimal digits carries four
/// fractional digits, anything shorter carries three.
pub fn durability_to_f64(durability: u32, max_durability: u32) -> f64 {
    if max_durability >= 100_000 {
        durability as f64 * 0.0001
    } else {
        durability as f64 * 0.001
    }
}

/// Everything shown for one character
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterDetails {
    pub address: u64,
    pub name: String,
    pub id: u64,
    pub position: Vec3,
    pub parameter: Parameter,
    /// `None` when the target id matches no character
    pub target: Option<Option<String>>,
}

impl CharacterDetails {
    /// Read the details, or `None` when the character has no data yet.
    pub fn read<M: MemoryReader>(game: &Game<M>, character: &Character<'_, M>) -> Option<Self> {
        let id = character.id()?;
        let name = character.name()?;
        let position = character.position()?;
        let parameter = character.parameter()?;

        let target = character
            .target_id()
            .and_then(|target_id| game.character_by_id(target_id))
            .map(|target| target.name());

        Some(Self {
            address: character.address(),
            name,
            id,
            position,
            parameter,
            target,
        })
    }

    pub fn lines(&self) -> Vec<String> {
        let p = &self.parameter;
        let target = match &self.target {
            None => NO_TARGET,
            Some(None) => UNNAMED_TARGET,
            Some(Some(name)) => name.as_str(),
        };

        vec![
            format!("Address: {}", format_address(self.address)),
            format!("Name: {}", self.name),
            format!("ID: {:X}", self.id),
            format!(
                "Pos: {:.6}, {:.6}, {:.6}",
                self.position.x, self.position.y, self.position.z
            ),
            format!("Combat Power: {:.6}", p.combat_power),
            format!("Age: {}", p.age),
            format!("Health: {:.6}/{:.6}", p.life, p.life_max()),
            format!("Race: {} ({})", race_to_string(p.race), p.race),
            format!("Target: {}", target),
        ]
    }
}

/// One line per occupied slot of [`EQUIPMENT_SLOTS`].
pub fn equipment_lines<M: MemoryReader>(equipment: &Equipment<'_, M>) -> Vec<String> {
    EQUIPMENT_SLOTS
        .iter()
        .filter_map(|&(index, name)| {
            let slot = equipment.slot(index)?;
            if slot.is_empty() {
                return None;
            }
            let [c1, c2, c3] = slot.colors;
            Some(format!(
                "[{}] ID: {} Colors: #{:08X} #{:08X} #{:08X}",
                name, slot.class_id, c1, c2, c3
            ))
        })
        .collect()
}

/// Everything shown for one item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetails {
    pub address: u64,
    pub name: String,
    pub id: u64,
    pub record: ItemRecord,
    pub max_stack_count: Option<u16>,
}

impl ItemDetails {
    /// Read the details, or `None` when the item has no data yet.
    pub fn read<M: MemoryReader>(item: &Item<'_, M>) -> Option<Self> {
        let id = item.id()?;
        let name = item.name()?;
        let record = item.record()?;

        Some(Self {
            address: item.address(),
            name,
            id,
            record,
            max_stack_count: item.max_stack_count(),
        })
    }

    pub fn lines(&self) -> Vec<String> {
        let r = &self.record;
        let [c1, c2, c3, c4, c5, c6] = r.colors;
        let max_stack = self
            .max_stack_count
            .map_or_else(|| UNKNOWN_MAX_STACK.to_string(), |max| max.to_string());

        vec![
            format!("Address: {}", format_address(self.address)),
            format!("Name: {}", self.name),
            format!("ID: {:X}", self.id),
            format!("Item ID: {}", r.item_id),
            format!("Inventory ID: {}", r.inventory_id),
            format!("Pos: {}, {}", r.position_x, r.position_y),
            format!("Color: {:X} {:X} {:X} {:X} {:X} {:X}", c1, c2, c3, c4, c5, c6),
            format!("Price: {}", r.price),
            format!("Sell price: {}", r.sell_price),
            format!(
                "Durability: {:.4}/{:.4}",
                durability_to_f64(r.durability, r.max_durability),
                durability_to_f64(r.max_durability, r.max_durability)
            ),
            format!("Stack count: {}/{}", r.stack_count, max_stack),
        ]
    }
}

/// Pointer-width uppercase hex, as the host's debuggers print addresses
pub fn format_address(address: u64) -> String {
    format!("{:016X}", address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_race_names() {
        assert_eq!(race_to_string(8001), "Female Giant");
        assert_eq!(race_to_string(8002), "Male Giant");
        assert_eq!(race_to_string(9001), "Female Elf");
        assert_eq!(race_to_string(9002), "Male Elf");
        assert_eq!(race_to_string(10001), "Female Human");
        assert_eq!(race_to_string(10002), "Male Human");
        assert_eq!(race_to_string(0), "Error: Unknown Race");
        assert_eq!(race_to_string(10003), "Error: Unknown Race");
    }

    #[test]
    fn test_durability_scale_by_max_digits() {
        // Five digits: three fractional digits
        assert!((durability_to_f64(12_000, 15_000) - 12.0).abs() < 1e-9);
        assert!((durability_to_f64(99_999, 99_999) - 99.999).abs() < 1e-9);
        // Six digits: four fractional digits
        assert!((durability_to_f64(120_000, 150_000) - 12.0).abs() < 1e-9);
        assert!((durability_to_f64(100_000, 100_000) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_durability_scale_uses_max_not_current() {
        // Current has six digits but max decides
        assert!((durability_to_f64(150_000, 20_000) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_equipment_slots_ascending() {
        assert!(EQUIPMENT_SLOTS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(0x1F2A_3B40), "000000001F2A3B40");
    }

    fn details() -> CharacterDetails {
        CharacterDetails {
            address: 0x1000_0040,
            name: "Nao".to_string(),
            id: 0x10_0000_0000_0001,
            position: Vec3::new(1.0, 2.5, -3.0),
            parameter: Parameter {
                race: 10001,
                age: 17,
                combat_power: 100.0,
                life: 50.0,
                life_max_base: 40.0,
                life_max_mod: 10.0,
            },
            target: None,
        }
    }

    #[test]
    fn test_character_lines() {
        let lines = details().lines();
        assert_eq!(
            lines,
            vec![
                "Address: 0000000010000040",
                "Name: Nao",
                "ID: 10000000000001",
                "Pos: 1.000000, 2.500000, -3.000000",
                "Combat Power: 100.000000",
                "Age: 17",
                "Health: 50.000000/50.000000",
                "Race: Female Human (10001)",
                "Target: No Target",
            ]
        );
    }

    #[test]
    fn test_character_target_lines() {
        let mut d = details();
        d.target = Some(Some("Tin".to_string()));
        assert_eq!(d.lines().last().unwrap(), "Target: Tin");

        d.target = Some(None);
        assert_eq!(d.lines().last().unwrap(), "Target: Unnamed");
    }

    #[test]
    fn test_item_lines() {
        let details = ItemDetails {
            address: 0xABCD,
            name: "Bread".to_string(),
            id: 0x50_0000_0000_0001,
            record: ItemRecord {
                item_id: 50004,
                inventory_id: 3,
                position_x: 4,
                position_y: 7,
                colors: [0xFF, 0x10, 0, 0xABCDEF, 1, 2],
                price: 1200,
                sell_price: 120,
                durability: 12000,
                max_durability: 15000,
                stack_count: 8,
            },
            max_stack_count: Some(10),
        };

        assert_eq!(
            details.lines(),
            vec![
                "Address: 000000000000ABCD",
                "Name: Bread",
                "ID: 50000000000001",
                "Item ID: 50004",
                "Inventory ID: 3",
                "Pos: 4, 7",
                "Color: FF 10 0 ABCDEF 1 2",
                "Price: 1200",
                "Sell price: 120",
                "Durability: 12.0000/15.0000",
                "Stack count: 8/10",
            ]
        );
    }

    #[test]
    fn test_item_unknown_max_stack() {
        let details = ItemDetails {
            address: 1,
            name: "Rock".to_string(),
            id: 1,
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
                stack_count: 3,
            },
            max_stack_count: None,
        };
        assert_eq!(details.lines().last().unwrap(), "Stack count: 3/?");
    }
}
