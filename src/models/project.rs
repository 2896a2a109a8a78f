use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{max_length, require};
use crate::storage::{Collection, Document};
use crate::Result;

pub const DEFAULT_FEATURED_LIMIT: usize = 6;
pub const DEFAULT_LIST_LIMIT: usize = 10;

const TITLE_MAX_LENGTH: usize = 100;
const DESCRIPTION_MAX_LENGTH: usize = 300;
const LONG_DESCRIPTION_MAX_LENGTH: usize = 2000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    #[default]
    Web,
    Mobile,
    Desktop,
    Api,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Development,
    Completed,
    Maintenance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub images: Vec<String>,
    pub category: ProjectCategory,
    pub status: ProjectStatus,
    pub featured: bool,
    pub is_public: bool,
    pub likes: u64,
    pub views: u64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectInput {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub long_description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: Option<ProjectCategory>,
    pub status: Option<ProjectStatus>,
    pub featured: Option<bool>,
    pub is_public: Option<bool>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ProjectInput {
    pub fn validate(&self) -> Result<()> {
        require(!self.user_id.trim().is_empty(), "user_id is required")?;
        require(!self.title.trim().is_empty(), "title is required")?;
        require(!self.description.trim().is_empty(), "description is required")?;
        max_length(self.title.trim(), TITLE_MAX_LENGTH, "title")?;
        max_length(self.description.trim(), DESCRIPTION_MAX_LENGTH, "description")?;
        if let Some(long_description) = &self.long_description {
            max_length(
                long_description.trim(),
                LONG_DESCRIPTION_MAX_LENGTH,
                "long_description",
            )?;
        }
        Ok(())
    }
}

pub struct Projects {
    collection: Collection<Project>,
}

impl Projects {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            collection: Collection::open("projects", path)?,
        })
    }

    pub fn create(&mut self, input: ProjectInput) -> Result<Project> {
        input.validate()?;
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4().to_string(),
            user_id: input.user_id.trim().to_owned(),
            title: input.title.trim().to_owned(),
            description: input.description.trim().to_owned(),
            long_description: input.long_description.map(|d| d.trim().to_owned()),
            technologies: input
                .technologies
                .into_iter()
                .map(|t| t.trim().to_owned())
                .filter(|t| !t.is_empty())
                .collect(),
            github_url: input.github_url,
            live_url: input.live_url,
            image_url: input.image_url,
            images: input.images,
            category: input.category.unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            featured: input.featured.unwrap_or(false),
            is_public: input.is_public.unwrap_or(true),
            likes: 0,
            views: 0,
            tags: input
                .tags
                .into_iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            created_at: now,
            updated_at: now,
        };
        log::info!("Creating project {} for {}", project.id, project.user_id);
        self.collection.insert(project)
    }

    pub fn find_by_user_id(&self, user_id: &str, public_only: bool) -> Vec<Project> {
        newest_first(
            self.collection
                .find(|p| p.user_id == user_id && (p.is_public || !public_only)),
            None,
        )
    }

    pub fn find_featured(&self, limit: usize) -> Vec<Project> {
        newest_first(
            self.collection.find(|p| p.featured && p.is_public),
            Some(limit),
        )
    }

    pub fn find_all(&self, limit: usize) -> Vec<Project> {
        newest_first(self.collection.find(|p| p.is_public), Some(limit))
    }
}

fn newest_first<'a>(
    projects: impl Iterator<Item = &'a Project>,
    limit: Option<usize>,
) -> Vec<Project> {
    let mut projects: Vec<Project> = projects.cloned().collect();
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    if let Some(limit) = limit {
        projects.truncate(limit);
    }
    projects
}
