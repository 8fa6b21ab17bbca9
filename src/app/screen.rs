// SPDX-License-Identifier: GPL-3.0-only

pub mod deck;
pub mod editor;

pub use deck::DeckScreen;
pub use editor::EditorScreen;

pub enum Screen {
    Deck(DeckScreen),
    Editor(EditorScreen),
}
