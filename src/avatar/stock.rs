//! Stock avatar selection.
//!
//! Discord offers a handful of default profile images under
//! `{cdn}/embed/avatars/{index}.png`. Which one an account gets depends on
//! whether it still carries a legacy 4-digit discriminator or has moved to
//! the unified username system.

/// Stock images available to unified-username accounts.
pub const STOCK_AVATAR_COUNT: u64 = 6;
/// Stock images available to legacy-discriminator accounts.
pub const LEGACY_STOCK_AVATAR_COUNT: u64 = 5;
/// Discriminator reported for accounts on the unified username system.
pub const UNIFIED_DISCRIMINATOR: &str = "0";

// Snowflake ids keep their creation timestamp above bit 22.
const SNOWFLAKE_TIMESTAMP_SHIFT: u32 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscriminatorSystem {
    /// `name#1234`, carries the numeric tag
    Legacy(u16),
    /// Unique usernames, discriminator `"0"`
    Unified,
}

impl DiscriminatorSystem {
    pub fn parse(discriminator: &str) -> Self {
        match discriminator.trim().parse::<u16>() {
            Ok(tag) if tag > 0 => DiscriminatorSystem::Legacy(tag),
            _ => DiscriminatorSystem::Unified,
        }
    }
}

/// Index derived from the user id alone.
///
/// Snowflakes use their timestamp bits. Anything that is not a snowflake
/// still maps to a stable index through its CRC-32.
pub fn snowflake_index(user_id: &str) -> u64 {
    match user_id.trim().parse::<u64>() {
        Ok(id) => (id >> SNOWFLAKE_TIMESTAMP_SHIFT) % STOCK_AVATAR_COUNT,
        Err(_) => u64::from(crc32fast::hash(user_id.as_bytes())) % STOCK_AVATAR_COUNT,
    }
}

/// Whether `user_id` is a plain snowflake, the only shape worth asking
/// the provider about.
pub fn is_snowflake(user_id: &str) -> bool {
    !user_id.is_empty()
        && user_id.bytes().all(|b| b.is_ascii_digit())
        && user_id.parse::<u64>().is_ok()
}

pub fn stock_index(discriminator: &str, user_id: &str) -> u64 {
    match DiscriminatorSystem::parse(discriminator) {
        DiscriminatorSystem::Legacy(tag) => u64::from(tag) % LEGACY_STOCK_AVATAR_COUNT,
        DiscriminatorSystem::Unified => snowflake_index(user_id),
    }
}

pub fn stock_avatar_url(cdn_base: &str, index: u64) -> String {
    format!("{cdn_base}/embed/avatars/{index}.png")
}

pub fn custom_avatar_url(cdn_base: &str, user_id: &str, avatar_hash: &str) -> String {
    format!("{cdn_base}/avatars/{user_id}/{avatar_hash}.png?size=256")
}
