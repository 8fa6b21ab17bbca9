// SPDX-License-Identifier: GPL-3.0

use std::collections::BTreeSet;

use crate::app::core::models::card::Card;
use crate::app::core::repository::CardRepository;
use crate::app::core::store::KeyValueStore;

/// Adds and removes saved cards
///
/// Holds no list of its own, every operation starts from what is persisted.
#[derive(Debug)]
pub struct EditorController<S> {
    repository: CardRepository<S>,
}

impl<S> Clone for EditorController<S> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<S: KeyValueStore> EditorController<S> {
    pub fn new(repository: CardRepository<S>) -> Self {
        Self { repository }
    }

    /// The saved cards, newest first
    pub async fn cards(&self) -> Vec<Card> {
        self.repository.load().await
    }

    /// Saves a new card at the front of the list
    ///
    /// Spaces and tabs around both fields are trimmed; the card is only rejected
    /// when both end up empty.
    /// Returns the list as it is saved afterwards.
    pub async fn add_card(&self, prompt: &str, answer: &str) -> Result<Vec<Card>, anywho::Error> {
        let mut cards = self.repository.load().await;

        let Some(card) = new_card(prompt, answer) else {
            return Ok(cards);
        };

        cards.insert(0, card);
        self.repository.save(&cards).await?;
        tracing::info!("card added, {} saved cards", cards.len());

        Ok(cards)
    }

    /// Deletes the cards at the given positions
    ///
    /// Positions refer to the saved list before anything is removed; positions
    /// past the end are ignored. Returns the list as it is saved afterwards.
    pub async fn remove_cards(&self, indices: &[usize]) -> Result<Vec<Card>, anywho::Error> {
        let cards = self.repository.load().await;
        let doomed: BTreeSet<usize> = indices.iter().copied().collect();

        let kept: Vec<Card> = cards
            .into_iter()
            .enumerate()
            .filter(|(index, _)| !doomed.contains(index))
            .map(|(_, card)| card)
            .collect();

        self.repository.save(&kept).await?;
        tracing::info!("cards removed, {} saved cards", kept.len());

        Ok(kept)
    }
}

/// Builds a trimmed [`Card`], `None` if there is nothing to save
pub fn new_card(prompt: &str, answer: &str) -> Option<Card> {
    let prompt = trim_blanks(prompt);
    let answer = trim_blanks(answer);

    if prompt.is_empty() && answer.is_empty() {
        return None;
    }

    Some(Card::new(prompt, answer))
}

/// Strips leading and trailing spaces and tabs, line breaks are kept
fn trim_blanks(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() && !is_line_break(c))
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::core::repository::CARDS_KEY;
    use crate::app::core::store::MemoryStore;

    fn editor() -> EditorController<MemoryStore> {
        EditorController::new(CardRepository::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn one_non_blank_field_is_enough() {
        let editor = editor();
        editor.add_card("Q", "A").await.unwrap();

        let cards = editor.add_card("  ", "B").await.unwrap();

        assert_eq!(cards[0], Card::new("", "B"));
        assert_eq!(cards.len(), 2);
        assert_eq!(editor.cards().await, cards);
    }

    #[tokio::test]
    async fn blank_card_leaves_the_store_alone() {
        let editor = editor();
        let cards = editor.add_card(" \t", "   ").await.unwrap();

        assert!(cards.is_empty());
        assert_eq!(editor.repository.store().get(CARDS_KEY), None);
    }

    #[tokio::test]
    async fn newest_card_goes_first_and_is_trimmed() {
        let editor = editor();
        editor.add_card("first", "1").await.unwrap();
        let cards = editor.add_card("  second ", " 2  ").await.unwrap();

        assert_eq!(cards, vec![Card::new("second", "2"), Card::new("first", "1")]);
    }

    #[tokio::test]
    async fn removes_every_selected_position() {
        let editor = editor();
        for prompt in ["D", "C", "B", "A"] {
            editor.add_card(prompt, "").await.unwrap();
        }

        let cards = editor.remove_cards(&[3, 1, 1, 9]).await.unwrap();

        assert_eq!(cards, vec![Card::new("A", ""), Card::new("C", "")]);
        assert_eq!(editor.cards().await, cards);
    }

    #[tokio::test]
    async fn sees_changes_made_by_other_editors() {
        let repository = CardRepository::new(MemoryStore::new());
        let first = EditorController::new(repository.clone());
        let second = EditorController::new(repository);

        first.add_card("from first", "").await.unwrap();
        let cards = second.add_card("from second", "").await.unwrap();

        assert_eq!(
            cards,
            vec![Card::new("from second", ""), Card::new("from first", "")]
        );
    }

    #[test]
    fn new_card_trims_spaces_and_tabs() {
        assert_eq!(new_card(" a ", "\tb\u{00A0}"), Some(Card::new("a", "b")));
        assert_eq!(new_card(" \t", "\u{3000} "), None);
    }

    #[test]
    fn new_card_keeps_line_breaks() {
        assert_eq!(new_card("", "\n"), Some(Card::new("", "\n")));
        assert_eq!(new_card(" a\n ", "b"), Some(Card::new("a\n", "b")));
    }

    #[tokio::test]
    async fn line_break_only_card_is_saved() {
        let editor = editor();
        let cards = editor.add_card("", "\n").await.unwrap();

        assert_eq!(cards, vec![Card::new("", "\n")]);
        assert_eq!(editor.cards().await, cards);
    }
}
