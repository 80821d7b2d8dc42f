//! Shared UI icons.
//!
//! Each icon falls back to plain ASCII on terminals without emoji support.

use console::Emoji;

// Status indicators
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK]");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[ERR]");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "*");
pub static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "[!]");

// Task lifecycle
pub static PENDING: Emoji<'_, '_> = Emoji("⏸️  ", "[ ]");
pub static CREATING: Emoji<'_, '_> = Emoji("⏳ ", "[..]");
pub static LINK: Emoji<'_, '_> = Emoji("🔗 ", "->");
