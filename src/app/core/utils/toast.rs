// SPDX-License-Identifier: GPL-3.0

use std::time::Duration;

use cosmic::widget::Toast;

/// Short notification shown at the bottom of the window
#[derive(Debug, Clone)]
pub struct FlashzillaToast {
    pub message: String,
}

impl FlashzillaToast {
    pub fn new<T>(message: T) -> Self
    where
        T: ToString,
    {
        Self {
            message: message.to_string(),
        }
    }
}

impl From<FlashzillaToast> for Toast<crate::app::Message> {
    fn from(toast: FlashzillaToast) -> Self {
        Toast::new(toast.message).duration(Duration::from_secs(5))
    }
}
