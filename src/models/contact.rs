use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{normalize_email, require};
use crate::storage::{Collection, Document};
use crate::Result;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Replied,
    Archived,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Message left through the "connect" section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub priority: ContactPriority,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Contact {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

pub struct Contacts {
    collection: Collection<Contact>,
}

impl Contacts {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            collection: Collection::open("contacts", path)?,
        })
    }

    pub fn create(&mut self, input: ContactInput) -> Result<Contact> {
        let email = normalize_email(Some(input.email));
        require(
            !input.name.trim().is_empty()
                && email.is_some()
                && !input.message.trim().is_empty(),
            "Missing required fields: name, email and message are required",
        )?;

        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4().to_string(),
            name: input.name.trim().to_owned(),
            email: email.unwrap_or_default(),
            subject: input.subject.trim().to_owned(),
            message: input.message.trim().to_owned(),
            status: ContactStatus::New,
            priority: ContactPriority::Medium,
            ip_address: input.ip_address,
            user_agent: input.user_agent,
            created_at: now,
            updated_at: now,
        };
        log::info!("New contact message {}", contact.id);
        self.collection.insert(contact)
    }

    /// Every message, newest first.
    pub fn find_all(&self) -> Vec<Contact> {
        let mut contacts: Vec<Contact> = self.collection.find(|_| true).cloned().collect();
        contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        contacts
    }

    pub fn update_status(
        &mut self,
        id: &str,
        status: ContactStatus,
    ) -> Result<Option<Contact>> {
        self.collection.update(id, |contact| {
            contact.status = status;
            contact.updated_at = Utc::now();
        })
    }
}
