//! Kanan Core - live entity inspection for an attached game process
//!
//! Walks the host game's entity lists through a [`MemoryReader`] and shows
//! characters and items as a browsable egui tree, refreshed every frame.
//!
//! # Architecture
//!
//! - [`memory`] - Read-only access to host memory
//! - [`layout`] - Host struct offsets, configurable per game build
//! - [`game`] - Typed accessors over entity lists, characters and items
//! - [`viewer`] - Collection, formatting and the egui panel
//! - [`config`] - `config.toml` loading and saving
//! - [`fixture`] - Synthetic host image for tests and the demo

pub mod config;
pub mod fixture;
pub mod game;
pub mod layout;
pub mod memory;
pub mod viewer;

pub use config::{Config, ViewerConfig};
pub use game::{Character, Entity, EntityKind, EntityList, Game, Item};
pub use layout::Layout;
pub use memory::{LocalMemory, MemoryError, MemoryReader, SnapshotMemory};
pub use viewer::{EntityViewer, ViewError};
