//! Personal watch list ("My List").
//!
//! The list is a flat snapshot of titles, read and rewritten as a whole on
//! every change. There is no locking: concurrent writers are last-write-wins.

use crate::{fs, Title, TitleID};
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};
use tracing::warn;

/// Snapshot of a title, as saved in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedListEntry {
    pub id: TitleID,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default)]
    pub chapter_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
}

impl From<&Title> for SavedListEntry {
    fn from(title: &Title) -> Self {
        Self {
            id: title.id.clone(),
            name: title.name.clone(),
            cover: title.cover.clone(),
            chapter_count: title.chapter_count,
            play_count: title.play_count.clone(),
            corner_name: title.corner_name.clone(),
            corner_color: title.corner_color.clone(),
            introduction: title.introduction.clone(),
        }
    }
}

/// Storage backend of the watch list.
pub trait ListStore {
    /// Loads the whole list.
    fn load(&self) -> Result<Vec<SavedListEntry>>;

    /// Replaces the whole list.
    fn save(&self, entries: &[SavedListEntry]) -> Result<()>;
}

/// Volatile store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<Vec<SavedListEntry>>,
}

impl ListStore for MemoryStore {
    fn load(&self) -> Result<Vec<SavedListEntry>> {
        Ok(self.entries.borrow().clone())
    }

    fn save(&self, entries: &[SavedListEntry]) -> Result<()> {
        *self.entries.borrow_mut() = entries.to_vec();
        Ok(())
    }
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Initializes a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default location, in the user's data directory.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("dramadeck");
        path.push("my-list.json");
        path
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ListStore for FileStore {
    fn load(&self) -> Result<Vec<SavedListEntry>> {
        let data = match fs::read_if_exists(&self.path)? {
            Some(data) => data,
            None => return Ok(Vec::new()),
        };

        // Best effort: a damaged list is not worth failing over.
        Ok(serde_json::from_slice(&data).unwrap_or_else(|err| {
            warn!(path = %self.path.display(), "ignoring unreadable list: {err}");
            Vec::new()
        }))
    }

    fn save(&self, entries: &[SavedListEntry]) -> Result<()> {
        if entries.is_empty() {
            return fs::remove_if_exists(&self.path);
        }

        let data = serde_json::to_vec_pretty(entries).context("serialize list")?;
        fs::atomic_write(&self.path, &data).context("save list")
    }
}

/// The watch list, on top of a store.
pub struct WatchList<S> {
    store: S,
}

impl<S: ListStore> WatchList<S> {
    /// Initializes a watch list on top of `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the saved entries, in insertion order.
    pub fn entries(&self) -> Result<Vec<SavedListEntry>> {
        self.store.load().context("load list")
    }

    /// Tests if the title is saved.
    pub fn contains(&self, id: &TitleID) -> Result<bool> {
        Ok(self.entries()?.iter().any(|entry| &entry.id == id))
    }

    /// Saves a title, if not already there.
    ///
    /// Returns whether the list changed.
    pub fn add(&self, title: &Title) -> Result<bool> {
        let mut entries = self.entries()?;
        if entries.iter().any(|entry| entry.id == title.id) {
            return Ok(false);
        }

        entries.push(title.into());
        self.store.save(&entries)?;
        Ok(true)
    }

    /// Removes a title.
    ///
    /// Returns whether the list changed.
    pub fn remove(&self, id: &TitleID) -> Result<bool> {
        let mut entries = self.entries()?;
        let len = entries.len();
        entries.retain(|entry| &entry.id != id);
        if entries.len() == len {
            return Ok(false);
        }

        self.store.save(&entries)?;
        Ok(true)
    }

    /// Adds the title if missing, removes it otherwise.
    ///
    /// Returns whether the title is now saved.
    pub fn toggle(&self, title: &Title) -> Result<bool> {
        if self.remove(&title.id)? {
            return Ok(false);
        }

        self.add(title)?;
        Ok(true)
    }

    /// Empties the list.
    pub fn clear(&self) -> Result<()> {
        self.store.save(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, process};

    fn title(id: &str, name: &str) -> Title {
        let book: crate::models::book::Book = serde_json::from_value(serde_json::json!({
            "bookId": id,
            "bookName": name,
            "coverWap": "https://img/cover.jpg",
            "chapterCount": 40,
        }))
        .expect("valid book");
        Title::try_from(book).expect("valid title")
    }

    #[test]
    fn add_remove_toggle() {
        let list = WatchList::new(MemoryStore::default());
        let heiress = title("1", "Hidden Heiress");
        let chance = title("2", "Second Chance");

        assert!(list.add(&heiress).expect("add"));
        assert!(!list.add(&heiress).expect("add twice"));
        assert!(list.add(&chance).expect("add"));
        assert_eq!(list.entries().expect("entries").len(), 2);

        assert!(!list.toggle(&heiress).expect("toggle off"));
        assert!(!list.contains(&heiress.id).expect("contains"));
        assert!(list.toggle(&heiress).expect("toggle on"));

        let names = list
            .entries()
            .expect("entries")
            .into_iter()
            .map(|entry| entry.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["Second Chance", "Hidden Heiress"]);

        assert!(list.remove(&chance.id).expect("remove"));
        assert!(!list.remove(&chance.id).expect("remove twice"));

        list.clear().expect("clear");
        assert!(list.entries().expect("entries").is_empty());
    }

    #[test]
    fn snapshot_format() {
        let entry = SavedListEntry::from(&title("41000102", "Hidden Heiress"));
        let json = serde_json::to_value(&entry).expect("serialize");

        assert_eq!(json["id"], "41000102");
        assert_eq!(json["name"], "Hidden Heiress");
        assert_eq!(json["cover"], "https://img/cover.jpg");
        assert_eq!(json["chapterCount"], 40);
        assert!(json.get("playCount").is_none());
    }

    #[test]
    fn file_store() {
        let path = env::temp_dir()
            .join(format!("dramadeck-list-{}", process::id()))
            .join("my-list.json");
        let store = FileStore::new(&path);

        assert!(store.load().expect("load missing").is_empty());

        let list = WatchList::new(store.clone());
        list.add(&title("1", "Hidden Heiress")).expect("add");
        assert_eq!(store.load().expect("load").len(), 1);

        std::fs::write(&path, "{not json").expect("corrupt list");
        assert!(store.load().expect("load corrupt").is_empty());

        list.clear().expect("clear");
        assert!(!path.exists());

        let _ = std::fs::remove_dir_all(path.parent().expect("parent"));
    }
}
