// SPDX-License-Identifier: GPL-3.0

pub mod card;
