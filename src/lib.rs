//! Backend of a personal portfolio site.
//!
//! The interesting part is [`avatar::AvatarResolver`], which turns a
//! Discord user id into an avatar and never fails doing so. The rest is a
//! small document store for users, projects and contact messages, served
//! over HTTP by [`server`].

pub mod avatar;
pub mod config;
mod errors;
pub mod models;
pub mod server;
pub mod storage;

use std::sync::Once;

pub use avatar::{AvatarResolver, AvatarResult, LiveAvatar};
pub use config::{AvatarConfig, Config};
pub use errors::{PortfolioError, Result};

pub const DATA_FOLDER: &str = ".portfolio";

static INIT: Once = Once::new();

/// Set up logging once, for tests and embedders without their own logger.
pub fn initialize() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
        log::info!("Initializing portfolio");
    });
}
