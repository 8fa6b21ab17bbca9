// SPDX-License-Identifier: GPL-3.0

use serde::{Deserialize, Serialize};

/// A single prompt/answer pair
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub prompt: String,
    pub answer: String,
}

impl Card {
    /// Creates a new [`Card`] with the given prompt and answer
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }

    /// Sample [`Card`]
    #[cfg(test)]
    pub fn example() -> Self {
        Self::new(
            "Who played the 13th Doctor in Doctor Who?",
            "Jodie Whittaker",
        )
    }

    /// Text that should be displayed for this card given the reveal state and
    /// whether narration mode is on.
    ///
    /// In narration mode only one side is shown at a time so screen readers read
    /// a single field; otherwise the prompt is always shown and the answer is
    /// added beneath it once revealed.
    pub fn visible_text(&self, revealed: bool, narration_mode: bool) -> CardText<'_> {
        if narration_mode {
            CardText {
                headline: if revealed { &self.answer } else { &self.prompt },
                detail: None,
            }
        } else {
            CardText {
                headline: &self.prompt,
                detail: revealed.then_some(self.answer.as_str()),
            }
        }
    }
}

/// Borrowed view of what a [`Card`] shows on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardText<'a> {
    pub headline: &'a str,
    pub detail: Option<&'a str>,
}
