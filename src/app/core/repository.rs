// SPDX-License-Identifier: GPL-3.0

use std::sync::Arc;

use crate::app::core::models::card::Card;
use crate::app::core::store::KeyValueStore;

/// Key under which the card list is persisted
pub const CARDS_KEY: &str = "Cards";

/// Reads and writes the ordered [`Card`] list through a [`KeyValueStore`]
///
/// Cheap to clone, every clone talks to the same store.
#[derive(Debug)]
pub struct CardRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for CardRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> CardRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get all saved [`Card`]s
    ///
    /// Missing, unreadable or malformed data all mean "no saved cards".
    pub async fn load(&self) -> Vec<Card> {
        match self.store.load(CARDS_KEY).await {
            Ok(Some(bytes)) => decode_cards(&bytes).unwrap_or_default(),
            Ok(None) => {
                tracing::debug!("no saved cards found");
                Vec::new()
            }
            Err(e) => {
                tracing::error!("failed to read saved cards: {e}");
                Vec::new()
            }
        }
    }

    /// Replace the saved [`Card`] list with the given one
    pub async fn save(&self, cards: &[Card]) -> Result<(), anywho::Error> {
        let bytes = encode_cards(cards)?;
        self.store.save(CARDS_KEY, bytes).await
    }
}

/// Encodes the cards as a JSON array of `{ "prompt", "answer" }` objects
pub fn encode_cards(cards: &[Card]) -> Result<Vec<u8>, anywho::Error> {
    Ok(serde_json::to_vec(cards)?)
}

/// Decodes bytes written by [`encode_cards`], `None` if they are not a card list
pub fn decode_cards(bytes: &[u8]) -> Option<Vec<Card>> {
    match serde_json::from_slice(bytes) {
        Ok(cards) => Some(cards),
        Err(e) => {
            tracing::warn!("ignoring undecodable saved cards: {e}");
            None
        }
    }
}
