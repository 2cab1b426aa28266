use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::tags::{is_valid_hex_color, sort_tags, Tag, TagForm, TagId};

/// On-disk shape of the tag collection
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    tags: Vec<Tag>,
}

/// The tag repository backing the dashboard. Fetch-or-mutate interface
/// over a JSON file; everything else about storage is an implementation
/// detail of this module.
#[derive(Debug, Clone)]
pub struct TagStore {
    path: PathBuf,
}

impl TagStore {
    /// Open the store at its default location (`~/.tagdeck/tags.json`)
    pub fn open_default() -> Result<Self, String> {
        let mut path =
            dirs::home_dir().ok_or_else(|| "Could not determine home directory".to_string())?;
        path.push(".tagdeck");
        std::fs::create_dir_all(&path)
            .map_err(|e| format!("Failed to create data directory: {}", e))?;
        path.push("tags.json");
        Ok(Self { path })
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Fetch the full tag collection, sorted for display
    pub async fn all_tags(&self) -> Result<Vec<Tag>, String> {
        let mut tags = self.read_file().await?.tags;
        sort_tags(&mut tags);
        Ok(tags)
    }

    /// Apply an edit payload to an existing tag and persist it
    pub async fn update_tag(&self, id: &TagId, form: TagForm) -> Result<Tag, String> {
        if let Some(color) = &form.color {
            if !is_valid_hex_color(color) {
                return Err(format!("Invalid color value: {}", color));
            }
        }

        let mut file = self.read_file().await?;
        let tag = file
            .tags
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| format!("No tag with id {}", id))?;

        tag.name = form.name;
        tag.color = form.color;
        tag.updated_at = chrono::Utc::now();
        let updated = tag.clone();

        self.write_file(&file).await?;
        Ok(updated)
    }

    /// Insert a tag, replacing any existing record with the same id
    #[allow(dead_code)]
    pub async fn insert_tag(&self, tag: Tag) -> Result<(), String> {
        let mut file = self.read_file().await?;
        file.tags.retain(|t| t.id != tag.id);
        file.tags.push(tag);
        self.write_file(&file).await
    }

    async fn read_file(&self) -> Result<StoreFile, String> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| format!("Failed to read tag store: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("Failed to parse tag store: {}", e))
    }

    async fn write_file(&self, file: &StoreFile) -> Result<(), String> {
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| format!("Failed to serialize tag store: {}", e))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| format!("Failed to write tag store: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tag(id: &str, name: &str, color: Option<&str>) -> Tag {
        Tag {
            id: TagId(id.to_string()),
            name: name.to_string(),
            color: color.map(str::to_string),
            updated_at: Utc::now(),
        }
    }

    fn temp_store(dir: &tempfile::TempDir) -> TagStore {
        TagStore::at_path(dir.path().join("tags.json"))
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        assert!(store.all_tags().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_and_fetch_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);

        store.insert_tag(tag("t1", "work", None)).await.unwrap();
        store
            .insert_tag(tag("t2", "Errands", Some("#00ff00")))
            .await
            .unwrap();

        let tags = store.all_tags().await.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].name, "Errands");
        assert_eq!(tags[1].name, "work");
    }

    #[tokio::test]
    async fn test_update_tag_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        store
            .insert_tag(tag("t1", "Urgent", Some("#ff0000")))
            .await
            .unwrap();

        let form = TagForm {
            name: "Urgent!!".to_string(),
            color: Some("#00ff00".to_string()),
        };
        let updated = store
            .update_tag(&TagId("t1".to_string()), form)
            .await
            .unwrap();
        assert_eq!(updated.name, "Urgent!!");

        // Re-read from disk
        let tags = store.all_tags().await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "Urgent!!");
        assert_eq!(tags[0].color.as_deref(), Some("#00ff00"));
    }

    #[tokio::test]
    async fn test_update_rejects_malformed_color() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);
        store.insert_tag(tag("t1", "Urgent", None)).await.unwrap();

        let form = TagForm {
            name: "Urgent".to_string(),
            color: Some("red".to_string()),
        };
        let result = store.update_tag(&TagId("t1".to_string()), form).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_update_missing_tag_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = temp_store(&dir);

        let form = TagForm {
            name: "Anything".to_string(),
            color: None,
        };
        let result = store.update_tag(&TagId("nope".to_string()), form).await;
        assert!(result.is_err());
    }
}
