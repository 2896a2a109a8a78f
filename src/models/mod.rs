pub mod contact;
pub mod project;
pub mod user;

use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub use contact::{Contact, ContactInput, ContactPriority, ContactStatus, Contacts};
pub use project::{Project, ProjectCategory, ProjectInput, ProjectStatus, Projects};
pub use user::{SocialLinks, User, UserInput, UserPatch, Users};

use crate::storage::{CONTACTS_STORAGE_FILE, PROJECTS_STORAGE_FILE, USERS_STORAGE_FILE};
use crate::{PortfolioError, Result};

/// All document collections of the portfolio, shared between requests.
pub struct Store {
    users: RwLock<Users>,
    projects: RwLock<Projects>,
    contacts: RwLock<Contacts>,
}

impl Store {
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let root = data_dir.as_ref();
        log::info!("Opening document store at {}", root.display());
        Ok(Self {
            users: RwLock::new(Users::open(&root.join(USERS_STORAGE_FILE))?),
            projects: RwLock::new(Projects::open(&root.join(PROJECTS_STORAGE_FILE))?),
            contacts: RwLock::new(Contacts::open(&root.join(CONTACTS_STORAGE_FILE))?),
        })
    }

    pub fn users(&self) -> Result<RwLockReadGuard<'_, Users>> {
        self.users.read().map_err(|_| poisoned("users"))
    }

    pub fn users_mut(&self) -> Result<RwLockWriteGuard<'_, Users>> {
        self.users.write().map_err(|_| poisoned("users"))
    }

    pub fn projects(&self) -> Result<RwLockReadGuard<'_, Projects>> {
        self.projects.read().map_err(|_| poisoned("projects"))
    }

    pub fn projects_mut(&self) -> Result<RwLockWriteGuard<'_, Projects>> {
        self.projects.write().map_err(|_| poisoned("projects"))
    }

    pub fn contacts(&self) -> Result<RwLockReadGuard<'_, Contacts>> {
        self.contacts.read().map_err(|_| poisoned("contacts"))
    }

    pub fn contacts_mut(&self) -> Result<RwLockWriteGuard<'_, Contacts>> {
        self.contacts.write().map_err(|_| poisoned("contacts"))
    }
}

fn poisoned(label: &str) -> PortfolioError {
    PortfolioError::Storage(label.to_owned(), "lock poisoned".to_owned())
}

pub(crate) fn require(condition: bool, message: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(PortfolioError::Validation(message.to_owned()))
    }
}

pub(crate) fn max_length(value: &str, limit: usize, field: &str) -> Result<()> {
    require(
        value.chars().count() <= limit,
        &format!("{field} must be at most {limit} characters"),
    )
}

pub(crate) fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|email| email.trim().to_lowercase())
        .filter(|email| !email.is_empty())
}
