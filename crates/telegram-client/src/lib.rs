//! Minimal Telegram Bot API client.
//!
//! Covers the handful of methods a webhook-driven backend needs:
//! `sendMessage`, `getMe`, `setWebhook` and `deleteWebhook`.

mod client;
mod error;
mod types;

pub use client::{TelegramClient, DEFAULT_API_URL};
pub use error::TelegramError;
pub use types::*;
