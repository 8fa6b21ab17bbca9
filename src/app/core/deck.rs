// SPDX-License-Identifier: GPL-3.0

use crate::app::core::models::card::Card;
use crate::app::core::repository::CardRepository;
use crate::app::core::store::KeyValueStore;
use crate::app::core::swipe::{CardTransform, RenderOptions, SwipeDecision, SwipeState};

/// Length of a study session
pub const SESSION_SECONDS: u32 = 100;

/// Countdown of the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimer {
    pub remaining_seconds: u32,
    pub is_active: bool,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self {
            remaining_seconds: SESSION_SECONDS,
            is_active: true,
        }
    }
}

/// How the user judged their answer through the accessibility buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Wrong,
    Correct,
}

/// The in-session deck, its timer and the gesture state of the topmost card
#[derive(Debug, Default, Clone)]
pub struct DeckController {
    deck: Vec<Card>,
    timer: SessionTimer,
    swipe: SwipeState,
}

impl DeckController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards in display order, the last one is on top
    pub fn cards(&self) -> &[Card] {
        &self.deck
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.timer.remaining_seconds
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_active
    }

    /// Gesture state of the topmost card
    pub fn swipe(&self) -> &SwipeState {
        &self.swipe
    }

    /// Index of the topmost card, `None` on an empty deck
    pub fn top_index(&self) -> Option<usize> {
        self.deck.len().checked_sub(1)
    }

    /// Cards stop reacting to input once the time is up
    pub fn is_interactive(&self) -> bool {
        self.timer.remaining_seconds > 0
    }

    /// Only the topmost card takes input, and only while there is time left
    pub fn is_card_interactive(&self, index: usize) -> bool {
        self.is_interactive() && self.top_index() == Some(index)
    }

    /// Removes the card at `index`, does nothing if there is no such card
    ///
    /// Emptying the deck pauses the timer. Nothing is persisted.
    pub fn remove_card(&mut self, index: usize) {
        if index >= self.deck.len() {
            return;
        }

        let was_top = self.top_index() == Some(index);
        self.deck.remove(index);
        if was_top {
            self.swipe = SwipeState::new();
        }

        if self.deck.is_empty() {
            self.timer.is_active = false;
        }
    }

    /// Removes the topmost card, a no-op on an empty deck
    pub fn remove_top_card(&mut self) {
        if let Some(index) = self.top_index() {
            self.remove_card(index);
        }
    }

    /// Both accessibility buttons simply throw the top card away
    pub fn mark_answer(&mut self, answer: Answer) {
        tracing::debug!(?answer, "top card marked");
        self.remove_top_card();
    }

    /// Starts a new session with the given cards, discarding the current one
    pub fn reset_session(&mut self, cards: Vec<Card>) {
        self.deck = cards;
        self.timer = SessionTimer::default();
        self.swipe = SwipeState::new();
    }

    /// Starts a new session with whatever is saved in the repository
    pub async fn reload_session<S: KeyValueStore>(&mut self, repository: &CardRepository<S>) {
        let cards = repository.load().await;
        self.reset_session(cards);
    }

    /// One second went by
    pub fn tick(&mut self) {
        if self.timer.is_active && self.timer.remaining_seconds > 0 {
            self.timer.remaining_seconds -= 1;

            // A drag cut short by the end of the session never gets its release
            if self.timer.remaining_seconds == 0 {
                self.swipe.cancel();
            }
        }
    }

    /// The window gained or lost focus
    pub fn on_foreground_change(&mut self, is_foreground: bool) {
        if is_foreground {
            if !self.deck.is_empty() {
                self.timer.is_active = true;
            }
        } else {
            self.timer.is_active = false;
        }
    }

    /// Feeds a drag sample to the topmost card
    pub fn drag(&mut self, dx: f32, dy: f32, options: RenderOptions) -> Option<CardTransform> {
        if !self.is_interactive() || self.deck.is_empty() {
            return None;
        }

        Some(self.swipe.drag(dx, dy, options))
    }

    /// Ends the gesture on the topmost card, removing it when it was thrown away
    pub fn end_drag(&mut self) -> Option<SwipeDecision> {
        if self.deck.is_empty() {
            return None;
        }

        if !self.is_interactive() {
            self.swipe.cancel();
            return None;
        }

        let decision = self.swipe.end();
        if decision == SwipeDecision::Dismiss {
            self.remove_top_card();
        }

        Some(decision)
    }

    /// Reveals or hides the answer of the topmost card
    pub fn tap(&mut self) {
        if self.is_interactive() && !self.deck.is_empty() {
            self.swipe.tap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::core::store::MemoryStore;

    fn deck_of(prompts: &[&str]) -> DeckController {
        let mut deck = DeckController::new();
        deck.reset_session(prompts.iter().map(|p| Card::new(*p, "")).collect());
        deck
    }

    fn prompts(deck: &DeckController) -> Vec<&str> {
        deck.cards().iter().map(|c| c.prompt.as_str()).collect()
    }

    #[test]
    fn removing_keeps_relative_order() {
        for index in 0..4 {
            let mut deck = deck_of(&["A", "B", "C", "D"]);
            let mut expected = vec!["A", "B", "C", "D"];
            expected.remove(index);

            deck.remove_card(index);

            assert_eq!(prompts(&deck), expected);
        }
    }

    #[test]
    fn removing_a_missing_card_does_nothing() {
        let mut deck = deck_of(&["A", "B"]);
        deck.remove_card(2);
        assert_eq!(prompts(&deck), ["A", "B"]);

        let mut empty = DeckController::new();
        empty.remove_top_card();
        assert!(empty.is_empty());
        assert!(empty.is_active());
    }

    #[test]
    fn dragging_the_top_card_far_enough_dismisses_it() {
        let mut deck = deck_of(&["A", "B", "C"]);

        deck.drag(150.0, 0.0, RenderOptions::default());
        assert_eq!(deck.end_drag(), Some(SwipeDecision::Dismiss));

        assert_eq!(prompts(&deck), ["A", "B"]);
        assert_eq!(deck.cards().last().map(|c| c.prompt.as_str()), Some("B"));
        assert!(deck.is_card_interactive(1));
        assert!(!deck.is_card_interactive(0));
        assert_eq!(*deck.swipe(), SwipeState::new());
    }

    #[test]
    fn drag_at_the_threshold_snaps_back() {
        let mut deck = deck_of(&["A", "B", "C"]);

        deck.drag(-100.0, 0.0, RenderOptions::default());
        assert_eq!(deck.end_drag(), Some(SwipeDecision::SnapBack));

        assert_eq!(deck.cards().len(), 3);
        assert_eq!(deck.swipe().drag_offset(), (0.0, 0.0));
    }

    #[test]
    fn new_top_card_starts_hidden() {
        let mut deck = deck_of(&["A", "B"]);
        deck.tap();
        assert!(deck.swipe().is_revealed());

        deck.mark_answer(Answer::Correct);

        assert_eq!(prompts(&deck), ["A"]);
        assert!(!deck.swipe().is_revealed());
    }

    #[test]
    fn timer_never_goes_below_zero() {
        let mut deck = deck_of(&["A"]);
        for _ in 0..SESSION_SECONDS - 1 {
            deck.tick();
        }
        assert_eq!(deck.remaining_seconds(), 1);
        assert!(deck.is_active());

        deck.tick();
        assert_eq!(deck.remaining_seconds(), 0);
        deck.tick();
        deck.tick();
        assert_eq!(deck.remaining_seconds(), 0);
    }

    #[test]
    fn inactive_timer_does_not_tick() {
        let mut deck = deck_of(&["A"]);
        deck.on_foreground_change(false);
        deck.tick();
        assert_eq!(deck.remaining_seconds(), SESSION_SECONDS);
    }

    #[test]
    fn expired_time_locks_the_cards() {
        let mut deck = deck_of(&["A", "B"]);
        for _ in 0..SESSION_SECONDS {
            deck.tick();
        }

        assert!(!deck.is_interactive());
        assert!(!deck.is_card_interactive(1));
        assert_eq!(deck.drag(300.0, 0.0, RenderOptions::default()), None);
        assert_eq!(deck.end_drag(), None);
        deck.tap();
        assert!(!deck.swipe().is_revealed());
        assert_eq!(deck.cards().len(), 2);
    }

    #[test]
    fn running_out_of_time_mid_drag_puts_the_card_back() {
        let mut deck = deck_of(&["A", "B"]);
        deck.tap();
        deck.drag(60.0, 5.0, RenderOptions::default());
        for _ in 0..SESSION_SECONDS {
            deck.tick();
        }

        assert_eq!(deck.swipe().drag_offset(), (0.0, 0.0));
        assert_eq!(
            deck.swipe().transform(RenderOptions::default()),
            CardTransform::default()
        );
        assert!(deck.swipe().is_revealed());

        assert_eq!(deck.end_drag(), None);
        assert_eq!(deck.swipe().drag_offset(), (0.0, 0.0));
        assert_eq!(deck.cards().len(), 2);
    }

    #[test]
    fn emptying_the_deck_stops_the_timer() {
        let mut deck = deck_of(&["A", "B"]);
        deck.remove_top_card();
        assert!(deck.is_active());
        deck.mark_answer(Answer::Wrong);
        assert!(deck.is_empty());
        assert!(!deck.is_active());

        deck.on_foreground_change(true);
        assert!(!deck.is_active());
    }

    #[test]
    fn foreground_resumes_a_non_empty_deck() {
        let mut deck = deck_of(&["A"]);
        deck.on_foreground_change(false);
        assert!(!deck.is_active());
        deck.on_foreground_change(true);
        assert!(deck.is_active());
    }

    #[tokio::test]
    async fn reset_restores_the_saved_deck_and_timer() {
        let repository = CardRepository::new(MemoryStore::new());
        let saved = vec![Card::new("X", "1"), Card::new("Y", "2")];
        repository.save(&saved).await.unwrap();

        let mut deck = deck_of(&["A"]);
        deck.tick();
        deck.remove_top_card();
        assert!(!deck.is_active());

        deck.reload_session(&repository).await;

        assert_eq!(deck.cards(), saved.as_slice());
        assert_eq!(deck.remaining_seconds(), SESSION_SECONDS);
        assert!(deck.is_active());
    }
}
