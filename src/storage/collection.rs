use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{PortfolioError, Result};

/*
A collection is one JSON file per document type:

    {"version": 1, "entries": {"<id>": {...}, ...}}

Writes go to a sibling temporary file which is then renamed over the
original, so a crash never leaves a half-written collection behind.
*/
const STORAGE_VERSION: i32 = 1;
const TEMP_SUFFIX: &str = "tmp";

/// Anything stored in a [`Collection`].
pub trait Document: Serialize + DeserializeOwned + Clone {
    fn id(&self) -> &str;
}

#[derive(Serialize, Deserialize)]
struct CollectionData<T> {
    version: i32,
    entries: BTreeMap<String, T>,
}

pub struct Collection<T> {
    label: String,
    path: PathBuf,
    data: CollectionData<T>,
}

impl<T: Document> Collection<T> {
    /// Open the collection stored at `path`, starting empty if the file
    /// does not exist yet.
    pub fn open(label: impl Into<String>, path: &Path) -> Result<Self> {
        let mut collection = Self {
            label: label.into(),
            path: path.to_path_buf(),
            data: CollectionData {
                version: STORAGE_VERSION,
                entries: BTreeMap::new(),
            },
        };
        if collection.path.exists() {
            collection.data.entries = collection.read_fs()?;
        }
        log::info!(
            "{} opened with {} documents",
            collection.label,
            collection.len()
        );
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.data.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.data.entries.get(id)
    }

    pub fn find<'a>(
        &'a self,
        predicate: impl Fn(&T) -> bool + 'a,
    ) -> impl Iterator<Item = &'a T> + 'a {
        self.data
            .entries
            .values()
            .filter(move |document| predicate(document))
    }

    /// Insert or replace a document and persist the collection.
    ///
    /// When persisting fails the previous entry is restored.
    pub fn insert(&mut self, document: T) -> Result<T> {
        let id = document.id().to_owned();
        let previous = self.data.entries.insert(id.clone(), document.clone());
        self.persist_or(|entries| match previous {
            Some(previous) => {
                entries.insert(id, previous);
            }
            None => {
                entries.remove(&id);
            }
        })?;
        Ok(document)
    }

    /// Apply `modify` to the document with `id` and persist it.
    ///
    /// Returns `None` when there is no such document.
    pub fn update(
        &mut self,
        id: &str,
        modify: impl FnOnce(&mut T),
    ) -> Result<Option<T>> {
        let Some(document) = self.data.entries.get_mut(id) else {
            return Ok(None);
        };
        let original = document.clone();
        modify(document);
        let updated = document.clone();

        self.persist_or(|entries| {
            entries.insert(id.to_owned(), original);
        })?;
        Ok(Some(updated))
    }

    pub fn remove(&mut self, id: &str) -> Result<T> {
        let removed = self.data.entries.remove(id).ok_or_else(|| {
            PortfolioError::Storage(self.label.clone(), "Key not found".to_owned())
        })?;
        let restored = removed.clone();
        self.persist_or(|entries| {
            entries.insert(id.to_owned(), restored);
        })?;
        Ok(removed)
    }

    // Memory only ever holds what made it to disk.
    fn persist_or(
        &mut self,
        rollback: impl FnOnce(&mut BTreeMap<String, T>),
    ) -> Result<()> {
        if let Err(err) = self.write_fs() {
            log::warn!("{} write failed, rolling back: {err}", self.label);
            rollback(&mut self.data.entries);
            return Err(err);
        }
        Ok(())
    }

    /// Read the entries currently persisted on disk.
    pub fn read_fs(&self) -> Result<BTreeMap<String, T>> {
        let file = File::open(&self.path)?;
        let data: CollectionData<T> = serde_json::from_reader(file)
            .map_err(|err| PortfolioError::Storage(self.label.clone(), err.to_string()))?;
        if data.version != STORAGE_VERSION {
            return Err(PortfolioError::Storage(
                self.label.clone(),
                format!(
                    "Storage version mismatch: expected {}, got {}",
                    STORAGE_VERSION, data.version
                ),
            ));
        }
        Ok(data.entries)
    }

    pub fn write_fs(&self) -> Result<()> {
        let parent_dir = self.path.parent().ok_or_else(|| {
            PortfolioError::Storage(
                self.label.clone(),
                "Failed to get parent directory".to_owned(),
            )
        })?;
        fs::create_dir_all(parent_dir)?;

        let temp_path = self.path.with_extension(TEMP_SUFFIX);
        let mut writer = BufWriter::new(File::create(&temp_path)?);
        serde_json::to_writer(&mut writer, &self.data)
            .map_err(|err| PortfolioError::Storage(self.label.clone(), err.to_string()))?;
        writer.flush()?;
        drop(writer);
        fs::rename(&temp_path, &self.path)?;

        log::debug!("{} {} documents have been written", self.label, self.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        text: String,
    }

    impl Document for Note {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, text: &str) -> Note {
        Note {
            id: id.to_owned(),
            text: text.to_owned(),
        }
    }

    #[test]
    fn collection_write_read() {
        let dir = TempDir::new("portfolio_test").unwrap();
        let path = dir.path().join("data").join("notes.json");

        let mut notes = Collection::open("notes", &path).unwrap();
        assert!(notes.is_empty());
        notes.insert(note("a", "first")).unwrap();
        notes.insert(note("b", "second")).unwrap();
        notes.remove("a").unwrap();

        let reopened: Collection<Note> = Collection::open("notes", &path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get("b"), Some(&note("b", "second")));
        assert!(!path.with_extension(TEMP_SUFFIX).exists());
    }

    #[test]
    fn update_missing_document_is_none() {
        let dir = TempDir::new("portfolio_test").unwrap();
        let mut notes: Collection<Note> =
            Collection::open("notes", &dir.path().join("notes.json")).unwrap();

        let updated = notes
            .update("nope", |n| n.text = "changed".to_owned())
            .unwrap();
        assert!(updated.is_none());
        assert!(matches!(
            notes.remove("nope"),
            Err(PortfolioError::Storage(_, _))
        ));
    }

    #[test]
    fn update_and_find() {
        let dir = TempDir::new("portfolio_test").unwrap();
        let mut notes: Collection<Note> =
            Collection::open("notes", &dir.path().join("notes.json")).unwrap();
        notes.insert(note("a", "keep")).unwrap();
        notes.insert(note("b", "drop")).unwrap();

        let updated = notes
            .update("b", |n| n.text = "keep".to_owned())
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "keep");
        assert_eq!(notes.find(|n| n.text == "keep").count(), 2);
        assert_eq!(notes.read_fs().unwrap().len(), 2);
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let dir = TempDir::new("portfolio_test").unwrap();
        let path = dir.path().join("notes.json");
        let mut notes: Collection<Note> = Collection::open("notes", &path).unwrap();
        notes.insert(note("a", "first")).unwrap();

        // A file where the parent folder should be makes every write fail.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        notes.path = blocker.join("notes.json");

        assert!(notes.insert(note("b", "second")).is_err());
        assert!(notes.get("b").is_none());

        assert!(notes.insert(note("a", "replaced")).is_err());
        assert_eq!(notes.get("a"), Some(&note("a", "first")));

        assert!(notes
            .update("a", |n| n.text = "changed".to_owned())
            .is_err());
        assert_eq!(notes.get("a"), Some(&note("a", "first")));

        assert!(notes.remove("a").is_err());
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let dir = TempDir::new("portfolio_test").unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, r#"{"version": 7, "entries": {}}"#).unwrap();

        let result: Result<Collection<Note>> = Collection::open("notes", &path);
        assert!(matches!(result, Err(PortfolioError::Storage(_, _))));
    }
}
