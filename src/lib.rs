//! Smart Start USA — Telegram lead-intake bot.

pub mod bot;
pub mod config;
pub mod error;
pub mod event;
pub mod forms;
pub mod menu;
pub mod notify;
pub mod scoring;
pub mod telegram;
pub mod validators;
