// SPDX-License-Identifier: GPL-3.0-only

use cosmic::{
    app::Settings,
    iced::{Limits, Size},
};
use tracing_subscriber::EnvFilter;

use crate::flags::{self, Flags};

pub fn init() -> (Settings, Flags) {
    let settings = get_app_settings();
    let flags = flags::flags();

    (settings, flags)
}

/// Logs to stderr, `RUST_LOG` overrides the default level
///
/// Only the first call installs a logger.
pub fn set_logger() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flashzilla=info"));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("logger already installed");
    }
}

pub fn get_app_settings() -> Settings {
    let mut settings = Settings::default();

    settings = settings.size_limits(Limits::NONE.min_width(520.0).min_height(480.0));
    settings = settings.size(Size::new(900.0, 700.0));
    settings = settings.debug(false);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_can_be_installed_before_anything_else() {
        set_logger();
        assert!(tracing::dispatcher::has_been_set());

        set_logger();
        assert!(tracing::dispatcher::has_been_set());
    }
}
