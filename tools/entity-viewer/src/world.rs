//! Synthetic game population
//!
//! Fills a [`FixtureWorld`] with a deterministic crowd of characters and
//! items, then moves the characters a little every frame so the viewer's
//! live refresh is visible.

use glam::Vec3;
use kanan_core::fixture::{CharacterSpec, FixtureWorld, ItemSpec};
use kanan_core::game::{EquipmentSlot, ItemRecord, Parameter};
use kanan_core::memory::Result;
use kanan_core::{Game, Layout, SnapshotMemory};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const CHARACTER_ID_BASE: u64 = 0x0010_0000_0000_0000;
const ITEM_ID_BASE: u64 = 0x0050_0000_0000_0000;

const CHARACTER_NAMES: [&str; 12] = [
    "Nao", "Tin", "Duncan", "Ranald", "Ferghus", "Malcolm", "Nora", "Dilys", "Trefor", "Deian",
    "Lassar", "Endelyon",
];

const ITEM_NAMES: [&str; 10] = [
    "Apple",
    "Bread",
    "Wooden Sword",
    "Short Sword",
    "Leather Gloves",
    "Mongo's Hat",
    "HP 10 Potion",
    "Wool",
    "Arrow",
    "Small Gem",
];

const RACES: [u32; 6] = [8001, 8002, 9001, 9002, 10001, 10002];

/// Equipment slots the generator fills
const EQUIPPED_SLOTS: [usize; 6] = [1, 2, 4, 5, 10, 12];

/// Half-extent of the square characters wander in
const WORLD_EXTENT: f32 = 5000.0;

struct Walker {
    address: u64,
    position: Vec3,
    velocity: Vec3,
}

/// A populated synthetic game
pub struct DemoWorld {
    fixture: FixtureWorld,
    rng: Pcg32,
    walkers: Vec<Walker>,
    character_ids: Vec<u64>,
}

impl DemoWorld {
    /// Place `characters` characters and `items` items laid out per `layout`.
    pub fn generate(layout: Layout, characters: usize, items: usize, seed: u64) -> Result<Self> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut fixture = FixtureWorld::new(layout)?;
        let mut walkers = Vec::with_capacity(characters);
        let character_ids: Vec<u64> = (1..=characters as u64).map(|i| CHARACTER_ID_BASE | i).collect();

        for (i, &id) in character_ids.iter().enumerate() {
            let spec = random_character(&mut rng, id, i, &character_ids);
            let address = fixture.add_character(&spec)?;
            walkers.push(Walker {
                address,
                position: spec.position.unwrap_or(Vec3::ZERO),
                velocity: Vec3::new(rng.random_range(-40.0..40.0), 0.0, rng.random_range(-40.0..40.0)),
            });
        }

        for i in 0..items {
            let id = ITEM_ID_BASE | (i as u64 + 1);
            fixture.add_item(&random_item(&mut rng, id, i))?;
        }

        tracing::debug!(
            "generated {} characters, {} items across {} regions",
            characters,
            items,
            fixture.memory().region_count()
        );

        Ok(Self {
            fixture,
            rng,
            walkers,
            character_ids,
        })
    }

    pub fn game(&self) -> Game<&SnapshotMemory> {
        self.fixture.game()
    }

    pub fn character_count(&self) -> usize {
        self.walkers.len()
    }

    /// Advance every character by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        for walker in &mut self.walkers {
            walker.position += walker.velocity * dt;
            // Bounce off the world edge
            if walker.position.x.abs() > WORLD_EXTENT {
                walker.velocity.x = -walker.velocity.x;
            }
            if walker.position.z.abs() > WORLD_EXTENT {
                walker.velocity.z = -walker.velocity.z;
            }
            self.fixture.set_position(walker.address, walker.position)?;
        }

        // Occasionally someone picks a new target
        if !self.walkers.is_empty() && self.rng.random_bool(0.01) {
            let walker = self.rng.random_range(0..self.walkers.len());
            let target = self.pick_target(walker);
            self.fixture.set_target(self.walkers[walker].address, target)?;
        }
        Ok(())
    }

    fn pick_target(&mut self, index: usize) -> u64 {
        if self.rng.random_bool(0.3) {
            return 0;
        }
        let target = self.rng.random_range(0..self.character_ids.len());
        if target == index { 0 } else { self.character_ids[target] }
    }
}

fn random_character(rng: &mut Pcg32, id: u64, index: usize, ids: &[u64]) -> CharacterSpec {
    let name = CHARACTER_NAMES[index % CHARACTER_NAMES.len()];
    let life_max_base = rng.random_range(30.0..300.0_f32).round();

    let equipment = if rng.random_bool(0.8) {
        let mut slots = Vec::new();
        for &slot in &EQUIPPED_SLOTS {
            if rng.random_bool(0.6) {
                slots.push((
                    slot,
                    EquipmentSlot {
                        class_id: rng.random_range(10_000..60_000),
                        colors: [rng.random(), rng.random(), rng.random()],
                    },
                ));
            }
        }
        Some(slots)
    } else {
        None
    };

    // Most characters have no target
    let target_id = if rng.random_bool(0.25) {
        ids[rng.random_range(0..ids.len())]
    } else {
        0
    };

    CharacterSpec {
        id,
        name: Some(name.to_string()),
        position: Some(Vec3::new(
            rng.random_range(-WORLD_EXTENT..WORLD_EXTENT),
            0.0,
            rng.random_range(-WORLD_EXTENT..WORLD_EXTENT),
        )),
        parameter: Some(Parameter {
            race: RACES[rng.random_range(0..RACES.len())],
            age: rng.random_range(10..30),
            combat_power: rng.random_range(10.0..2000.0),
            life: rng.random_range(1.0..life_max_base),
            life_max_base,
            life_max_mod: rng.random_range(0.0..50.0_f32).round(),
        }),
        target_id,
        equipment,
    }
}

fn random_item(rng: &mut Pcg32, id: u64, index: usize) -> ItemSpec {
    let name = ITEM_NAMES[index % ITEM_NAMES.len()];
    // Both fixed-point precisions the host uses
    let max_durability = if rng.random_bool(0.5) {
        rng.random_range(1..=30) * 1_000
    } else {
        rng.random_range(10..=30) * 10_000
    };
    let max_stack_count = rng.random_range(1..=100u16);
    let price = rng.random_range(1..50_000);

    ItemSpec {
        id,
        name: Some(name.to_string()),
        record: ItemRecord {
            item_id: rng.random_range(40_000..70_000),
            inventory_id: rng.random_range(1..8),
            position_x: rng.random_range(0..6),
            position_y: rng.random_range(0..10),
            colors: [
                rng.random(),
                rng.random(),
                rng.random(),
                rng.random(),
                rng.random(),
                rng.random(),
            ],
            price,
            sell_price: price / 10,
            durability: rng.random_range(0..=max_durability),
            max_durability,
            stack_count: rng.random_range(1..=max_stack_count),
        },
        max_stack_count: rng.random_bool(0.9).then_some(max_stack_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanan_core::EntityViewer;

    #[test]
    fn test_generate_populates_lists() {
        let world = DemoWorld::generate(Layout::default(), 5, 7, 1).unwrap();
        assert_eq!(world.character_count(), 5);

        let mut viewer = EntityViewer::default();
        let game = world.game();
        viewer.build_character_list(&game).unwrap();
        viewer.build_item_list(&game).unwrap();
        assert_eq!(viewer.characters().len(), 5);
        assert_eq!(viewer.items().len(), 7);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = DemoWorld::generate(Layout::default(), 4, 4, 42).unwrap();
        let b = DemoWorld::generate(Layout::default(), 4, 4, 42).unwrap();

        let mut viewer_a = EntityViewer::default();
        let mut viewer_b = EntityViewer::default();
        viewer_a.build_item_list(&a.game()).unwrap();
        viewer_b.build_item_list(&b.game()).unwrap();
        assert_eq!(viewer_a.items(), viewer_b.items());
    }

    #[test]
    fn test_tick_moves_characters() {
        let mut world = DemoWorld::generate(Layout::default(), 3, 0, 3).unwrap();
        let before: Vec<_> = {
            let game = world.game();
            (1..=3)
                .map(|i| game.character_by_id(CHARACTER_ID_BASE | i).unwrap().position())
                .collect()
        };

        world.tick(1.0).unwrap();

        let game = world.game();
        let after: Vec<_> = (1..=3)
            .map(|i| game.character_by_id(CHARACTER_ID_BASE | i).unwrap().position())
            .collect();
        assert_ne!(before, after);
    }

    #[test]
    fn test_empty_world() {
        let mut world = DemoWorld::generate(Layout::default(), 0, 0, 0).unwrap();
        world.tick(0.5).unwrap();

        let mut viewer = EntityViewer::default();
        viewer.build_character_list(&world.game()).unwrap();
        assert!(viewer.characters().is_empty());
    }
}
