use crate::{
    models::{ChecklistItem, ItemDraft, ItemFilter, ItemStats, ItemUpdate, TaskList, DEFAULT_LIST_ID},
    Error, Result,
};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

const LISTS_KEY: &str = "taskflow-lists";
const ACTIVE_LIST_KEY: &str = "taskflow-active-list";

fn items_key(list_id: &str) -> String {
    format!("taskflow-tasks-{}", list_id)
}

/// Local checklists kept in a single JSON key-value file.
///
/// This store is independent of the record backend: its lists and items are
/// never reconciled with backend tasks.
pub struct LocalStore {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
}

impl LocalStore {
    /// Open the store, starting empty if the file does not exist yet
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => Map::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No local store at {}, starting empty", path.display());
                Map::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read<T: DeserializeOwned>(entries: &Map<String, Value>, key: &str) -> Result<Option<T>> {
        match entries.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    fn write<T: Serialize>(entries: &mut Map<String, Value>, key: &str, value: &T) -> Result<()> {
        entries.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Write `next` through a temp file and rename, then make it the live
    /// state. On failure the live state is left untouched.
    async fn commit(&self, live: &mut Map<String, Value>, next: Map<String, Value>) -> Result<()> {
        let contents = serde_json::to_vec_pretty(&next)?;
        let tmp = self.path.with_extension("tmp");

        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        *live = next;
        Ok(())
    }

    fn stored_lists(entries: &Map<String, Value>) -> Result<Vec<TaskList>> {
        let lists: Option<Vec<TaskList>> = Self::read(entries, LISTS_KEY)?;
        Ok(match lists {
            Some(lists) if !lists.is_empty() => lists,
            _ => vec![TaskList::default_list()],
        })
    }

    fn stored_items(entries: &Map<String, Value>, list_id: &str) -> Result<Vec<ChecklistItem>> {
        Ok(Self::read(entries, &items_key(list_id))?.unwrap_or_default())
    }

    fn require_list(entries: &Map<String, Value>, list_id: &str) -> Result<()> {
        if Self::stored_lists(entries)?.iter().any(|l| l.id == list_id) {
            Ok(())
        } else {
            Err(Error::ListNotFound(list_id.to_string()))
        }
    }

    // ========================================================================
    // List Operations
    // ========================================================================

    pub async fn lists(&self) -> Result<Vec<TaskList>> {
        let entries = self.entries.lock().await;
        Self::stored_lists(&entries)
    }

    /// The active list, falling back to the first list when the stored id is stale
    pub async fn active_list(&self) -> Result<TaskList> {
        let entries = self.entries.lock().await;
        let lists = Self::stored_lists(&entries)?;
        let active_id: Option<String> = Self::read(&entries, ACTIVE_LIST_KEY)?;
        let active_id = active_id.unwrap_or_else(|| DEFAULT_LIST_ID.to_string());

        lists
            .iter()
            .find(|l| l.id == active_id)
            .or_else(|| lists.first())
            .cloned()
            .ok_or_else(|| Error::ListNotFound(active_id))
    }

    /// Create a list and make it active
    pub async fn add_list(&self, name: &str) -> Result<TaskList> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("list name is required".to_string()));
        }

        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        let mut lists = Self::stored_lists(&entries)?;

        let list = TaskList {
            id: format!("list-{}", Uuid::new_v4()),
            name: name.to_string(),
            description: String::new(),
            created_at: Some(Utc::now()),
        };
        lists.push(list.clone());

        Self::write(&mut next, LISTS_KEY, &lists)?;
        Self::write(&mut next, ACTIVE_LIST_KEY, &list.id)?;
        self.commit(&mut entries, next).await?;

        tracing::info!("Created list {} ({})", list.name, list.id);
        Ok(list)
    }

    /// Delete a list and its items. The last remaining list cannot be deleted.
    pub async fn delete_list(&self, list_id: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        let lists = Self::stored_lists(&entries)?;

        if !lists.iter().any(|l| l.id == list_id) {
            return Err(Error::ListNotFound(list_id.to_string()));
        }
        if lists.len() <= 1 {
            return Err(Error::LastList);
        }

        let remaining: Vec<TaskList> = lists.into_iter().filter(|l| l.id != list_id).collect();
        Self::write(&mut next, LISTS_KEY, &remaining)?;
        next.remove(&items_key(list_id));

        let active_id: Option<String> = Self::read(&entries, ACTIVE_LIST_KEY)?;
        if active_id.as_deref().unwrap_or(DEFAULT_LIST_ID) == list_id {
            Self::write(&mut next, ACTIVE_LIST_KEY, &remaining[0].id)?;
        }

        self.commit(&mut entries, next).await?;

        tracing::info!("Deleted list {}", list_id);
        Ok(())
    }

    pub async fn set_active(&self, list_id: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        Self::require_list(&entries, list_id)?;

        Self::write(&mut next, ACTIVE_LIST_KEY, &list_id)?;
        self.commit(&mut entries, next).await
    }

    // ========================================================================
    // Item Operations
    // ========================================================================

    pub async fn items(&self, list_id: &str, filter: ItemFilter) -> Result<Vec<ChecklistItem>> {
        let entries = self.entries.lock().await;
        Self::require_list(&entries, list_id)?;

        Ok(Self::stored_items(&entries, list_id)?
            .into_iter()
            .filter(|item| filter.matches(item))
            .collect())
    }

    pub async fn stats(&self, list_id: &str) -> Result<ItemStats> {
        let entries = self.entries.lock().await;
        Self::require_list(&entries, list_id)?;

        Ok(ItemStats::from_items(&Self::stored_items(&entries, list_id)?))
    }

    pub async fn add_item(&self, list_id: &str, draft: ItemDraft) -> Result<ChecklistItem> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(Error::Validation("item title is required".to_string()));
        }

        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        Self::require_list(&entries, list_id)?;

        let item = ChecklistItem {
            id: format!("task-{}", Uuid::new_v4()),
            title: title.to_string(),
            description: draft.description.trim().to_string(),
            completed: false,
            created_at: Utc::now(),
            due_date: draft.due_date,
            priority: draft.priority,
            list_id: list_id.to_string(),
        };

        let mut items = Self::stored_items(&entries, list_id)?;
        items.push(item.clone());
        Self::write(&mut next, &items_key(list_id), &items)?;
        self.commit(&mut entries, next).await?;

        Ok(item)
    }

    /// Apply a change to one item and persist the list
    async fn modify_item<F>(&self, list_id: &str, item_id: &str, change: F) -> Result<ChecklistItem>
    where
        F: FnOnce(&mut ChecklistItem) -> Result<()>,
    {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        Self::require_list(&entries, list_id)?;

        let mut items = Self::stored_items(&entries, list_id)?;
        let item = items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| Error::ItemNotFound(item_id.to_string()))?;

        change(item)?;
        let updated = item.clone();

        Self::write(&mut next, &items_key(list_id), &items)?;
        self.commit(&mut entries, next).await?;

        Ok(updated)
    }

    pub async fn toggle_item(&self, list_id: &str, item_id: &str) -> Result<ChecklistItem> {
        self.modify_item(list_id, item_id, |item| {
            item.completed = !item.completed;
            Ok(())
        })
        .await
    }

    pub async fn update_item(
        &self,
        list_id: &str,
        item_id: &str,
        update: ItemUpdate,
    ) -> Result<ChecklistItem> {
        self.modify_item(list_id, item_id, |item| {
            if let Some(title) = update.title {
                let title = title.trim();
                if title.is_empty() {
                    return Err(Error::Validation("item title is required".to_string()));
                }
                item.title = title.to_string();
            }
            if let Some(description) = update.description {
                item.description = description.trim().to_string();
            }
            if let Some(due_date) = update.due_date {
                item.due_date = due_date;
            }
            if let Some(priority) = update.priority {
                item.priority = priority;
            }
            Ok(())
        })
        .await
    }

    pub async fn delete_item(&self, list_id: &str, item_id: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        Self::require_list(&entries, list_id)?;

        let mut items = Self::stored_items(&entries, list_id)?;
        let before = items.len();
        items.retain(|item| item.id != item_id);
        if items.len() == before {
            return Err(Error::ItemNotFound(item_id.to_string()));
        }

        Self::write(&mut next, &items_key(list_id), &items)?;
        self.commit(&mut entries, next).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemPriority;
    use chrono::NaiveDate;

    async fn store() -> (LocalStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(dir.path().join("local.json")).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_default_list_when_empty() {
        let (store, _dir) = store().await;

        let lists = store.lists().await.unwrap();
        assert_eq!(lists, vec![TaskList::default_list()]);
        assert_eq!(store.active_list().await.unwrap().id, DEFAULT_LIST_ID);
    }

    #[tokio::test]
    async fn test_add_list_becomes_active() {
        let (store, _dir) = store().await;

        assert!(store.add_list("   ").await.is_err());

        let list = store.add_list(" Groceries ").await.unwrap();
        assert_eq!(list.name, "Groceries");
        assert_eq!(store.active_list().await.unwrap().id, list.id);
        assert_eq!(store.lists().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_cannot_delete_last_list() {
        let (store, _dir) = store().await;
        assert!(matches!(store.delete_list(DEFAULT_LIST_ID).await, Err(Error::LastList)));
    }

    #[tokio::test]
    async fn test_delete_active_list_repoints_and_drops_items() {
        let (store, _dir) = store().await;
        let list = store.add_list("Work").await.unwrap();
        store.add_item(&list.id, ItemDraft::new("Report")).await.unwrap();

        store.delete_list(&list.id).await.unwrap();

        assert_eq!(store.active_list().await.unwrap().id, DEFAULT_LIST_ID);
        assert!(matches!(
            store.items(&list.id, ItemFilter::All).await,
            Err(Error::ListNotFound(_))
        ));

        let entries = store.entries.lock().await;
        assert!(!entries.contains_key(&items_key(&list.id)));
    }

    #[tokio::test]
    async fn test_item_lifecycle_and_filters() {
        let (store, _dir) = store().await;

        assert!(store.add_item(DEFAULT_LIST_ID, ItemDraft::new(" ")).await.is_err());

        let first = store
            .add_item(DEFAULT_LIST_ID, ItemDraft::new("  Buy milk "))
            .await
            .unwrap();
        assert_eq!(first.title, "Buy milk");
        assert_eq!(first.priority, ItemPriority::Medium);
        assert!(!first.completed);

        let second = store
            .add_item(DEFAULT_LIST_ID, ItemDraft::new("Call bank"))
            .await
            .unwrap();

        let toggled = store.toggle_item(DEFAULT_LIST_ID, &first.id).await.unwrap();
        assert!(toggled.completed);

        let active = store.items(DEFAULT_LIST_ID, ItemFilter::Active).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);

        let stats = store.stats(DEFAULT_LIST_ID).await.unwrap();
        assert_eq!(stats, ItemStats { total: 2, completed: 1, active: 1 });

        let update = ItemUpdate {
            title: Some("Call the bank".to_string()),
            priority: Some(ItemPriority::High),
            ..ItemUpdate::default()
        };
        let updated = store.update_item(DEFAULT_LIST_ID, &second.id, update).await.unwrap();
        assert_eq!(updated.title, "Call the bank");
        assert_eq!(updated.priority, ItemPriority::High);

        let blank = ItemUpdate {
            title: Some("".to_string()),
            ..ItemUpdate::default()
        };
        assert!(store.update_item(DEFAULT_LIST_ID, &second.id, blank).await.is_err());

        store.delete_item(DEFAULT_LIST_ID, &first.id).await.unwrap();
        assert!(matches!(
            store.delete_item(DEFAULT_LIST_ID, &first.id).await,
            Err(Error::ItemNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_due_date_can_be_cleared() {
        let (store, _dir) = store().await;
        let item = store
            .add_item(DEFAULT_LIST_ID, ItemDraft::new("Renew passport"))
            .await
            .unwrap();

        let due = NaiveDate::from_ymd_opt(2024, 9, 1);
        let set = ItemUpdate {
            due_date: Some(due),
            ..ItemUpdate::default()
        };
        let updated = store.update_item(DEFAULT_LIST_ID, &item.id, set).await.unwrap();
        assert_eq!(updated.due_date, due);

        let untouched = ItemUpdate {
            title: Some("Renew passport soon".to_string()),
            ..ItemUpdate::default()
        };
        let updated = store.update_item(DEFAULT_LIST_ID, &item.id, untouched).await.unwrap();
        assert_eq!(updated.due_date, due);

        let clear = ItemUpdate {
            due_date: Some(None),
            ..ItemUpdate::default()
        };
        let updated = store.update_item(DEFAULT_LIST_ID, &item.id, clear).await.unwrap();
        assert_eq!(updated.due_date, None);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("local.json");
        let store = LocalStore::open(&path).await.unwrap();

        assert!(store.add_list("Work").await.is_err());
        let lists = store.lists().await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].id, DEFAULT_LIST_ID);
        assert_eq!(store.active_list().await.unwrap().id, DEFAULT_LIST_ID);

        assert!(store
            .add_item(DEFAULT_LIST_ID, ItemDraft::new("Milk"))
            .await
            .is_err());
        assert!(store
            .items(DEFAULT_LIST_ID, ItemFilter::All)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");

        let list_id = {
            let store = LocalStore::open(&path).await.unwrap();
            let list = store.add_list("Travel").await.unwrap();
            store.add_item(&list.id, ItemDraft::new("Passport")).await.unwrap();
            list.id
        };

        let reopened = LocalStore::open(&path).await.unwrap();
        assert_eq!(reopened.active_list().await.unwrap().id, list_id);
        let items = reopened.items(&list_id, ItemFilter::All).await.unwrap();
        assert_eq!(items[0].title, "Passport");
    }
}
