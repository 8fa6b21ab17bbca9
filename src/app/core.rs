// SPDX-License-Identifier: GPL-3.0

pub mod database;
pub mod deck;
pub mod editor;
pub mod models;
pub mod repository;
pub mod store;
pub mod swipe;
pub mod utils;

pub use database::init_database;
