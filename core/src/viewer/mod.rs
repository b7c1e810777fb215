//! Entity viewer panel
//!
//! An egui panel that lists the host's characters and items as a tree.
//! Lists are rebuilt from host memory every frame their header is open;
//! the details under an open row are re-read every frame as well.

pub mod collect;
pub mod format;

use crate::config::ViewerConfig;
use crate::game::{Character, Entity, EntityList, Game, Item};
use crate::memory::MemoryReader;

use collect::{EntityRow, collect_entities};
use format::{CharacterDetails, ItemDetails, equipment_lines};

/// Errors surfaced in the panel instead of a list
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("Couldn't find the entity list.")]
    EntityListMissing,
}

const NO_CHARACTERS: &str = "There are no characters yet.";
const NO_ITEMS: &str = "There are no items yet.";
const CHARACTER_NO_DATA: &str = "This character has no data.";
const ITEM_NO_DATA: &str = "This item has no data.";

/// Entity browser state
pub struct EntityViewer {
    /// Whether the window is shown
    pub visible: bool,
    /// Open both list headers on first show
    default_open: bool,
    /// Key that toggles [`Self::visible`]
    toggle_key: Option<egui::Key>,
    characters: Vec<EntityRow>,
    items: Vec<EntityRow>,
    /// Last observed entity-list availability, for transition logging
    list_available: Option<bool>,
}

impl Default for EntityViewer {
    fn default() -> Self {
        Self::new(&ViewerConfig::default())
    }
}

impl EntityViewer {
    pub fn new(config: &ViewerConfig) -> Self {
        let toggle_key = egui::Key::from_name(&config.toggle_key);
        if toggle_key.is_none() {
            tracing::warn!("viewer: unknown toggle key '{}', toggling disabled", config.toggle_key);
        }

        Self {
            visible: config.visible,
            default_open: config.default_open,
            toggle_key,
            characters: Vec::new(),
            items: Vec::new(),
            list_available: None,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Characters collected on the last frame the list was open
    pub fn characters(&self) -> &[EntityRow] {
        &self.characters
    }

    /// Items collected on the last frame the list was open
    pub fn items(&self) -> &[EntityRow] {
        &self.items
    }

    /// Toggle visibility when the configured key was pressed this frame.
    pub fn handle_input(&mut self, ctx: &egui::Context) {
        if let Some(key) = self.toggle_key
            && ctx.input(|i| i.key_pressed(key))
        {
            self.toggle();
        }
    }

    /// Show the viewer in its own window
    pub fn show<M: MemoryReader>(&mut self, ctx: &egui::Context, game: &Game<M>) {
        self.handle_input(ctx);
        if !self.visible {
            return;
        }

        let mut visible = self.visible;
        egui::Window::new("Entity Viewer")
            .id(egui::Id::new("entity_viewer_window"))
            .open(&mut visible)
            .default_pos([10.0, 10.0])
            .default_size([360.0, 480.0])
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.ui(ui, game));
            });
        self.visible = visible;
    }

    /// Render the character and item lists into `ui`
    pub fn ui<M: MemoryReader>(&mut self, ui: &mut egui::Ui, game: &Game<M>) {
        egui::CollapsingHeader::new("Character List")
            .id_salt("entity_viewer_characters")
            .default_open(self.default_open)
            .show(ui, |ui| {
                if let Err(e) = self.build_character_list(game) {
                    ui.label(e.to_string());
                }
                // Rows are cleared on error, so this reports the empty list
                self.character_tree(ui, game);
            });

        egui::CollapsingHeader::new("Item List")
            .id_salt("entity_viewer_items")
            .default_open(self.default_open)
            .show(ui, |ui| {
                if let Err(e) = self.build_item_list(game) {
                    ui.label(e.to_string());
                }
                self.item_tree(ui, game);
            });
    }

    /// Replace the stored character rows with the host's current list.
    pub fn build_character_list<M: MemoryReader>(&mut self, game: &Game<M>) -> Result<(), ViewError> {
        self.characters.clear();
        let list = self.entity_list(game)?;
        self.characters = collect_entities::<Character<'_, M>, M>(&list);
        Ok(())
    }

    /// Replace the stored item rows with the host's current list.
    pub fn build_item_list<M: MemoryReader>(&mut self, game: &Game<M>) -> Result<(), ViewError> {
        self.items.clear();
        let list = self.entity_list(game)?;
        self.items = collect_entities::<Item<'_, M>, M>(&list);
        Ok(())
    }

    fn entity_list<'g, M: MemoryReader>(&mut self, game: &'g Game<M>) -> Result<EntityList<'g, M>, ViewError> {
        let list = game.entity_list();
        let available = list.is_some();
        if self.list_available != Some(available) {
            if available {
                tracing::debug!("viewer: entity list available");
            } else {
                tracing::debug!("viewer: entity list missing");
            }
            self.list_available = Some(available);
        }
        list.ok_or(ViewError::EntityListMissing)
    }

    fn character_tree<M: MemoryReader>(&self, ui: &mut egui::Ui, game: &Game<M>) {
        if self.characters.is_empty() {
            ui.label(NO_CHARACTERS);
            return;
        }

        for row in &self.characters {
            let Some(name) = &row.name else {
                continue;
            };
            egui::CollapsingHeader::new(name.as_str())
                .id_salt(("character", row.address))
                .show(ui, |ui| {
                    let character: Character<'_, M> = Character::at(game.memory(), game.layout(), row.address);
                    display_character(ui, game, &character);
                });
        }
    }

    fn item_tree<M: MemoryReader>(&self, ui: &mut egui::Ui, game: &Game<M>) {
        if self.items.is_empty() {
            ui.label(NO_ITEMS);
            return;
        }

        for row in &self.items {
            let Some(name) = &row.name else {
                continue;
            };
            egui::CollapsingHeader::new(name.as_str())
                .id_salt(("item", row.address))
                .show(ui, |ui| {
                    let item: Item<'_, M> = Item::at(game.memory(), game.layout(), row.address);
                    display_item(ui, &item);
                });
        }
    }
}

fn display_character<M: MemoryReader>(ui: &mut egui::Ui, game: &Game<M>, character: &Character<'_, M>) {
    let Some(details) = CharacterDetails::read(game, character) else {
        ui.label(CHARACTER_NO_DATA);
        return;
    };

    bullets(ui, &details.lines());

    if let Some(equipment) = character.equipment() {
        egui::CollapsingHeader::new("Equipment")
            .id_salt(("equipment", equipment.address()))
            .show(ui, |ui| bullets(ui, &equipment_lines(&equipment)));
    }
}

fn display_item<M: MemoryReader>(ui: &mut egui::Ui, item: &Item<'_, M>) {
    match ItemDetails::read(item) {
        Some(details) => bullets(ui, &details.lines()),
        None => {
            ui.label(ITEM_NO_DATA);
        }
    }
}

fn bullets(ui: &mut egui::Ui, lines: &[String]) {
    for line in lines {
        ui.label(format!("• {}", line));
    }
}
