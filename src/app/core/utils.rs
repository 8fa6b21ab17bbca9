// SPDX-License-Identifier: GPL-3.0

mod toast;

pub use toast::FlashzillaToast;
