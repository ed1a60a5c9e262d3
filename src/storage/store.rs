//! Sheet repository for JSON storage
//!
//! Manages loading and saving named sheets to sheets.json. Sheets are
//! keyed by name, case-insensitively.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{TopsheetError, TopsheetResult};
use crate::models::TopSheet;

use super::file_io::{read_json, write_json_atomic};

/// Serializable sheet data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SheetData {
    sheets: Vec<TopSheet>,
}

/// Repository for sheet persistence
pub struct SheetStore {
    path: PathBuf,
    data: RwLock<HashMap<String, TopSheet>>,
}

impl SheetStore {
    /// Create a new sheet store
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load sheets from disk
    pub fn load(&self) -> TopsheetResult<()> {
        let file_data: SheetData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| TopsheetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for sheet in file_data.sheets {
            data.insert(sheet.name.to_lowercase(), sheet);
        }

        Ok(())
    }

    /// Save sheets to disk
    pub fn save(&self) -> TopsheetResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| TopsheetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut sheets: Vec<_> = data.values().cloned().collect();
        sheets.sort_by(|a, b| a.name.cmp(&b.name));

        write_json_atomic(&self.path, &SheetData { sheets })
    }

    /// Get a sheet by name (case-insensitive)
    pub fn get(&self, name: &str) -> TopsheetResult<Option<TopSheet>> {
        let data = self
            .data
            .read()
            .map_err(|e| TopsheetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&name.to_lowercase()).cloned())
    }

    /// Get a sheet by name, or a not-found error
    pub fn get_required(&self, name: &str) -> TopsheetResult<TopSheet> {
        self.get(name)?
            .ok_or_else(|| TopsheetError::sheet_not_found(name.to_string()))
    }

    /// Insert or update a sheet, keyed by its name
    pub fn upsert(&self, sheet: TopSheet) -> TopsheetResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TopsheetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(sheet.name.to_lowercase(), sheet);
        Ok(())
    }

    /// Delete a sheet by name
    pub fn delete(&self, name: &str) -> TopsheetResult<bool> {
        let mut data = self
            .data
            .write()
            .map_err(|e| TopsheetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&name.to_lowercase()).is_some())
    }

    /// Check if a sheet exists
    pub fn exists(&self, name: &str) -> TopsheetResult<bool> {
        let data = self
            .data
            .read()
            .map_err(|e| TopsheetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.contains_key(&name.to_lowercase()))
    }

    /// List sheet names, sorted
    pub fn list(&self) -> TopsheetResult<Vec<String>> {
        let data = self
            .data
            .read()
            .map_err(|e| TopsheetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut names: Vec<_> = data.values().map(|s| s.name.clone()).collect();
        names.sort();
        Ok(names)
    }

    /// Count sheets
    pub fn count(&self) -> TopsheetResult<usize> {
        let data = self
            .data
            .read()
            .map_err(|e| TopsheetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaseConfig, Category, Group, Money};
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, SheetStore) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sheets.json");
        let store = SheetStore::new(path);
        (temp_dir, store)
    }

    fn sample_sheet(name: &str) -> TopSheet {
        let mut sheet = TopSheet::new(name, BaseConfig::FixedTotal(Money::from_cents(500_000)));
        let mut group = Group::new("Production");
        let mut category = Category::new("Camera");
        category.amount = Money::from_cents(400_000);
        group.categories.push(category);
        sheet.groups.push(group);
        sheet
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, store) = create_test_store();
        store.load().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, store) = create_test_store();
        store.load().unwrap();

        store.upsert(sample_sheet("Pilot")).unwrap();

        // Case insensitive
        let retrieved = store.get("pilot").unwrap().unwrap();
        assert_eq!(retrieved.name, "Pilot");
        assert!(store.get("Finale").unwrap().is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, store) = create_test_store();

        store.load().unwrap();
        store.upsert(sample_sheet("Pilot")).unwrap();
        store.save().unwrap();

        let path = temp_dir.path().join("sheets.json");
        let store2 = SheetStore::new(path);
        store2.load().unwrap();

        let retrieved = store2.get("Pilot").unwrap().unwrap();
        assert_eq!(retrieved.groups.len(), 1);
        assert_eq!(
            retrieved.groups[0].categories[0].amount,
            Money::from_cents(400_000)
        );
    }

    #[test]
    fn test_get_required_missing() {
        let (_temp_dir, store) = create_test_store();
        store.load().unwrap();

        let err = store.get_required("Ghost").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, store) = create_test_store();
        store.load().unwrap();

        store.upsert(sample_sheet("Pilot")).unwrap();
        assert!(store.exists("Pilot").unwrap());

        assert!(store.delete("pilot").unwrap());
        assert!(!store.exists("Pilot").unwrap());
        assert!(!store.delete("pilot").unwrap());
    }

    #[test]
    fn test_list_sorted() {
        let (_temp_dir, store) = create_test_store();
        store.load().unwrap();

        store.upsert(sample_sheet("Series Finale")).unwrap();
        store.upsert(sample_sheet("Pilot")).unwrap();

        let names = store.list().unwrap();
        assert_eq!(names, vec!["Pilot", "Series Finale"]);
    }
}
