// SPDX-License-Identifier: GPL-3.0-only

use cosmic::{
    cosmic_config::{self, Config, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry},
    theme,
};
use serde::{Deserialize, Serialize};

use crate::app::core::swipe::RenderOptions;

const CONFIG_VERSION: u64 = 1;
pub const APP_ID: &str = "dev.mariinkys.FlashZilla";

#[derive(Debug, Default, Clone, CosmicConfigEntry, Eq, PartialEq)]
pub struct FlashzillaConfig {
    pub app_theme: AppTheme,
    /// Drop the green/red swipe hint and show explicit answer buttons
    pub differentiate_without_color: bool,
    /// Show one side of a card at a time so screen readers read a single field
    pub narration_mode: bool,
}

impl FlashzillaConfig {
    pub fn config_handler() -> Option<Config> {
        Config::new(APP_ID, CONFIG_VERSION).ok()
    }

    pub fn config() -> FlashzillaConfig {
        match Self::config_handler() {
            Some(config_handler) => FlashzillaConfig::get_entry(&config_handler).unwrap_or_else(
                |(errors, config)| {
                    for why in errors {
                        tracing::error!(%why, "error loading app config");
                    }
                    config
                },
            ),
            None => FlashzillaConfig::default(),
        }
    }

    /// Switches that change how the deck is drawn
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            render: RenderOptions {
                differentiate_without_color: self.differentiate_without_color,
            },
            narration_mode: self.narration_mode,
        }
    }
}

/// Accessibility switches handed to the deck screen
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub render: RenderOptions,
    pub narration_mode: bool,
}

impl DisplayOptions {
    /// The explicit wrong/correct buttons are shown under either accessibility mode
    pub fn show_answer_buttons(&self) -> bool {
        self.render.differentiate_without_color || self.narration_mode
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum AppTheme {
    Dark,
    Light,
    #[default]
    System,
}

impl AppTheme {
    pub fn theme(&self) -> theme::Theme {
        match self {
            Self::Dark => theme::Theme::dark(),
            Self::Light => theme::Theme::light(),
            Self::System => theme::system_preference(),
        }
    }

    /// Position of the theme in the settings dropdown
    pub fn to_index(self) -> usize {
        match self {
            Self::System => 0,
            Self::Dark => 1,
            Self::Light => 2,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            1 => Self::Dark,
            2 => Self::Light,
            _ => Self::System,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_buttons_follow_either_mode() {
        let mut config = FlashzillaConfig::default();
        assert!(!config.display_options().show_answer_buttons());

        config.narration_mode = true;
        assert!(config.display_options().show_answer_buttons());

        config.narration_mode = false;
        config.differentiate_without_color = true;
        let options = config.display_options();
        assert!(options.show_answer_buttons());
        assert!(options.render.differentiate_without_color);
    }

    #[test]
    fn theme_index_round_trips() {
        for theme in [AppTheme::System, AppTheme::Dark, AppTheme::Light] {
            assert_eq!(AppTheme::from_index(theme.to_index()), theme);
        }
        assert_eq!(AppTheme::from_index(42), AppTheme::System);
    }
}
