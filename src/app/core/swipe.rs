// SPDX-License-Identifier: GPL-3.0

//! Drag handling for the topmost card of the deck.
//!
//! Every visual parameter is a pure function of the horizontal drag `dx`, so the
//! math can be checked without a window.

/// Horizontal drag magnitude a card has to exceed to be dismissed
pub const DISMISS_THRESHOLD: f32 = 100.0;

/// Vertical distance between two stacked cards
pub const STACK_SPACING: f32 = 10.0;

/// Rotation of the card, 1/5th of the drag
pub fn rotation_degrees(dx: f32) -> f32 {
    dx / 5.0
}

/// Horizontal translation of the card, so short gestures move it a long way
pub fn translate_x(dx: f32) -> f32 {
    dx * 5.0
}

/// Unclamped-above opacity in `[0, 2]`
///
/// Stays at or above 1 until the card has been dragged 50 units and reaches 0
/// at [`DISMISS_THRESHOLD`].
pub fn raw_opacity(dx: f32) -> f32 {
    (2.0 - dx.abs() / 50.0).clamp(0.0, 2.0)
}

/// Displayable opacity in `[0, 1]`
pub fn opacity(dx: f32) -> f32 {
    raw_opacity(dx).min(1.0)
}

/// Strength of the white fill that hides the tint, fading as soon as the drag starts
pub fn tint_strength(dx: f32) -> f32 {
    (1.0 - dx.abs() / 50.0).clamp(0.0, 1.0)
}

/// Which way the card is leaning
pub fn tint_direction(dx: f32) -> TintDirection {
    if dx > 0.0 {
        TintDirection::Positive
    } else {
        TintDirection::Negative
    }
}

/// Whether releasing the card at `dx` throws it away (strictly past the threshold)
pub fn should_dismiss(dx: f32) -> bool {
    dx.abs() > DISMISS_THRESHOLD
}

/// Downward offset of the card at `position` in a deck of `total` cards
pub fn stack_offset(position: usize, total: usize) -> f32 {
    total.saturating_sub(position) as f32 * STACK_SPACING
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TintDirection {
    /// Dragged right, rendered green
    Positive,
    /// Dragged left, rendered red
    Negative,
}

/// Colour hint drawn behind the card while it is dragged
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tint {
    pub direction: TintDirection,
    /// Opacity of the white fill on top of the tint: 1 hides it, 0 shows it fully
    pub fill_strength: f32,
}

/// Rendering switches that change how a transform is drawn but never the decision
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Suppress the green/red tint, the white fill stays fully opaque
    pub differentiate_without_color: bool,
}

/// Visual parameters of the dragged card for a single drag sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub rotation_degrees: f32,
    pub translate_x: f32,
    pub opacity: f32,
    /// `None` when tinting is suppressed
    pub tint: Option<Tint>,
}

impl CardTransform {
    pub fn for_drag(dx: f32, options: RenderOptions) -> Self {
        let tint = (!options.differentiate_without_color).then(|| Tint {
            direction: tint_direction(dx),
            fill_strength: tint_strength(dx),
        });

        Self {
            rotation_degrees: rotation_degrees(dx),
            translate_x: translate_x(dx),
            opacity: opacity(dx),
            tint,
        }
    }
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::for_drag(0.0, RenderOptions::default())
    }
}

/// What happens to the card once the pointer is released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDecision {
    /// Remove the card from the deck
    Dismiss,
    /// Animate the card back to the center
    SnapBack,
}

/// Gesture state of the topmost card
///
/// A fresh value is created every time a new card becomes topmost.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SwipeState {
    drag_offset: (f32, f32),
    revealed: bool,
}

impl SwipeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_offset(&self) -> (f32, f32) {
        self.drag_offset
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Records a drag sample (translation since the gesture started)
    pub fn drag(&mut self, dx: f32, dy: f32, options: RenderOptions) -> CardTransform {
        self.drag_offset = (dx, dy);
        self.transform(options)
    }

    /// Current transform, without recording anything
    pub fn transform(&self, options: RenderOptions) -> CardTransform {
        CardTransform::for_drag(self.drag_offset.0, options)
    }

    /// Ends the gesture
    ///
    /// The offset is reset unless the card is being dismissed, a dismissed card
    /// keeps its last transform until it is removed.
    pub fn end(&mut self) -> SwipeDecision {
        if should_dismiss(self.drag_offset.0) {
            SwipeDecision::Dismiss
        } else {
            self.drag_offset = (0.0, 0.0);
            SwipeDecision::SnapBack
        }
    }

    /// Drops the gesture without a decision, the card goes back to rest
    pub fn cancel(&mut self) {
        self.drag_offset = (0.0, 0.0);
    }

    /// Flips between showing the prompt and the answer
    pub fn tap(&mut self) {
        self.revealed = !self.revealed;
    }
}
