use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{normalize_email, require};
use crate::avatar::FALLBACK_DISCRIMINATOR;
use crate::storage::{Collection, Document};
use crate::Result;

pub const DEFAULT_BIO: &str = "I'm LORD, an 18-year-old Moroccan developer living in Italy, \
building digital experiences with precision, depth, and purpose. I don't just write code, \
I craft presence. Every project I build is founded on vision and driven by a quiet obsession \
with detail, movement, and feel. Technology is my weapon. The web is my battlefield.";

pub const DEFAULT_SKILLS: [&str; 5] =
    ["React", "TypeScript", "Node.js", "MongoDB", "Tailwind CSS"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub github: String,
    #[serde(default)]
    pub discord: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub linkedin: String,
}

impl SocialLinks {
    fn portfolio_defaults() -> Self {
        Self {
            github: "https://github.com/lordx679".to_owned(),
            discord: "#".to_owned(),
            instagram: "#".to_owned(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub discord_id: String,
    pub username: String,
    pub discriminator: String,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub bio: String,
    pub skills: Vec<String>,
    pub social_links: SocialLinks,
    pub is_active: bool,
    pub last_login: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Body of a create-or-update request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserInput {
    #[serde(default)]
    pub discord_id: String,
    #[serde(default)]
    pub username: String,
    pub discriminator: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub social_links: Option<SocialLinks>,
}

impl UserInput {
    pub fn validate(&self) -> Result<()> {
        require(
            !self.discord_id.trim().is_empty() && !self.username.trim().is_empty(),
            "Missing required fields: discord_id and username are required",
        )
    }
}

/// Partial profile update, absent fields stay untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub discriminator: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub social_links: Option<SocialLinks>,
    pub is_active: Option<bool>,
}

impl UserPatch {
    fn apply(self, user: &mut User) {
        // A username is never cleared.
        if let Some(username) = self.username.filter(|name| !name.trim().is_empty()) {
            user.username = username.trim().to_owned();
        }
        if let Some(discriminator) = self.discriminator {
            user.discriminator = discriminator;
        }
        if let Some(avatar_url) = self.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        if let Some(email) = self.email {
            user.email = normalize_email(Some(email));
        }
        if let Some(bio) = self.bio {
            user.bio = bio;
        }
        if let Some(skills) = self.skills {
            user.skills = trimmed(skills);
        }
        if let Some(social_links) = self.social_links {
            user.social_links = social_links;
        }
        if let Some(is_active) = self.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();
    }
}

pub struct Users {
    collection: Collection<User>,
}

impl Users {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            collection: Collection::open("users", path)?,
        })
    }

    pub fn find_by_discord_id(&self, discord_id: &str) -> Option<User> {
        self.collection
            .find(|user| user.discord_id == discord_id)
            .next()
            .cloned()
    }

    pub fn create(&mut self, input: UserInput) -> Result<User> {
        input.validate()?;
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            discord_id: input.discord_id.trim().to_owned(),
            username: input.username.trim().to_owned(),
            discriminator: input
                .discriminator
                .unwrap_or_else(|| FALLBACK_DISCRIMINATOR.to_owned()),
            avatar_url: input.avatar_url,
            email: normalize_email(input.email),
            bio: input.bio.unwrap_or_else(|| DEFAULT_BIO.to_owned()),
            skills: input.skills.map(trimmed).unwrap_or_else(|| {
                DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
            }),
            social_links: input
                .social_links
                .unwrap_or_else(SocialLinks::portfolio_defaults),
            is_active: true,
            last_login: now,
            created_at: now,
            updated_at: now,
        };
        log::info!("Creating user {}", user.discord_id);
        self.collection.insert(user)
    }

    pub fn update_by_discord_id(
        &mut self,
        discord_id: &str,
        patch: UserPatch,
    ) -> Result<Option<User>> {
        let Some(id) = self.find_by_discord_id(discord_id).map(|user| user.id) else {
            return Ok(None);
        };
        self.collection.update(&id, |user| patch.apply(user))
    }

    /// Refresh the login data of a known user, create it otherwise.
    pub fn create_or_update(&mut self, input: UserInput) -> Result<User> {
        input.validate()?;
        let Some(existing) = self.find_by_discord_id(input.discord_id.trim()) else {
            return self.create(input);
        };

        let patch = UserPatch {
            username: Some(input.username),
            discriminator: input.discriminator,
            avatar_url: input.avatar_url,
            email: input.email,
            ..UserPatch::default()
        };
        let updated = self.collection.update(&existing.id, |user| {
            patch.apply(user);
            user.last_login = user.updated_at;
        })?;
        Ok(updated.unwrap_or(existing))
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }
}

fn trimmed(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PortfolioError;
    use tempdir::TempDir;

    fn input(discord_id: &str, username: &str) -> UserInput {
        UserInput {
            discord_id: discord_id.to_owned(),
            username: username.to_owned(),
            ..UserInput::default()
        }
    }

    #[test]
    fn create_fills_portfolio_defaults() {
        let dir = TempDir::new("portfolio_test").unwrap();
        let mut users = Users::open(&dir.path().join("users.json")).unwrap();

        let user = users.create(input("42", "lord")).unwrap();
        assert_eq!(user.discriminator, "0000");
        assert_eq!(user.bio, DEFAULT_BIO);
        assert_eq!(user.skills.len(), DEFAULT_SKILLS.len());
        assert_eq!(user.social_links.github, "https://github.com/lordx679");
        assert!(user.is_active);
        assert_eq!(users.find_by_discord_id("42"), Some(user));
    }

    #[test]
    fn missing_fields_are_rejected() {
        let dir = TempDir::new("portfolio_test").unwrap();
        let mut users = Users::open(&dir.path().join("users.json")).unwrap();

        let result = users.create_or_update(input("", "lord"));
        assert!(matches!(result, Err(PortfolioError::Validation(_))));
        let result = users.create_or_update(input("42", "  "));
        assert!(matches!(result, Err(PortfolioError::Validation(_))));
        assert!(users.is_empty());
    }

    #[test]
    fn create_or_update_keeps_one_document_per_discord_id() {
        let dir = TempDir::new("portfolio_test").unwrap();
        let mut users = Users::open(&dir.path().join("users.json")).unwrap();

        let created = users
            .create_or_update(UserInput {
                bio: Some("custom bio".to_owned()),
                ..input("42", "lord")
            })
            .unwrap();
        let updated = users
            .create_or_update(UserInput {
                email: Some("  Lord@Example.COM ".to_owned()),
                avatar_url: Some("https://cdn.example.com/a.png".to_owned()),
                ..input("42", "lordx")
            })
            .unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.username, "lordx");
        assert_eq!(updated.email.as_deref(), Some("lord@example.com"));
        assert_eq!(updated.bio, "custom bio");
        assert!(updated.last_login >= created.last_login);
    }

    #[test]
    fn blank_username_patch_keeps_name() {
        let dir = TempDir::new("portfolio_test").unwrap();
        let mut users = Users::open(&dir.path().join("users.json")).unwrap();
        users.create(input("42", "lord")).unwrap();

        let patch = UserPatch {
            username: Some("   ".to_owned()),
            bio: Some("new bio".to_owned()),
            ..UserPatch::default()
        };
        let updated = users.update_by_discord_id("42", patch).unwrap().unwrap();
        assert_eq!(updated.username, "lord");
        assert_eq!(updated.bio, "new bio");
    }

    #[test]
    fn update_unknown_user_is_none() {
        let dir = TempDir::new("portfolio_test").unwrap();
        let mut users = Users::open(&dir.path().join("users.json")).unwrap();

        let patch = UserPatch {
            bio: Some("x".to_owned()),
            ..UserPatch::default()
        };
        assert!(users.update_by_discord_id("404", patch).unwrap().is_none());
    }

    #[test]
    fn users_survive_reopen() {
        let dir = TempDir::new("portfolio_test").unwrap();
        let path = dir.path().join("users.json");
        {
            let mut users = Users::open(&path).unwrap();
            users.create(input("42", "lord")).unwrap();
        }
        let users = Users::open(&path).unwrap();
        assert_eq!(
            users.find_by_discord_id("42").map(|u| u.username),
            Some("lord".to_owned())
        );
    }
}
