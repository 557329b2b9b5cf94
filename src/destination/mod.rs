//! Selected destination storage
//!
//! The place picked on the explore page is handed to the directions page
//! through a single JSON record in the XDG data directory
//! (~/.local/share/tour-explore/destination.json).

use crate::config::defaults::{APP_DIR_NAME, DESTINATION_FILE_NAME};
use crate::config::Config;
use crate::discovery::PlaceSummary;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Notice shown when the directions page has nothing to route to
pub const NO_DESTINATION: &str = "No destination selected";

/// A place chosen as the route target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the selection was made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Destination {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            saved_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }
}

impl From<&PlaceSummary> for Destination {
    fn from(place: &PlaceSummary) -> Self {
        Destination::new(place.name.clone()).with_description(place.description.clone())
    }
}

/// File-backed store for the single selected destination
#[derive(Debug, Clone)]
pub struct DestinationStore {
    path: PathBuf,
}

impl DestinationStore {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }

    /// Store at the default location
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(Self::data_dir()?.join(DESTINATION_FILE_NAME)))
    }

    /// Store at a specific path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured path, or the default location
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.storage.destination_path {
            Some(path) => Ok(Self::at(path.clone())),
            None => Self::open_default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist a selection, replacing any previous one
    ///
    /// Stamps `saved_at` with the current time.
    pub fn save(&self, destination: &Destination) -> Result<Destination> {
        if destination.name.trim().is_empty() {
            return Err(Error::InvalidQuery("Destination name is empty".to_string()));
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create data directory: {}", e))
            })?;
        }

        let record = Destination {
            saved_at: Some(Utc::now()),
            ..destination.clone()
        };

        let content = serde_json::to_string_pretty(&record)?;
        fs::write(&self.path, content)?;
        debug!("Saved destination '{}' to {}", record.name, self.path.display());
        Ok(record)
    }

    /// Read the current selection
    ///
    /// A missing or unreadable record means nothing is selected. The record
    /// is left in place after reading.
    pub fn load(&self) -> Result<Destination> {
        if !self.path.exists() {
            return Err(Error::NotFound(NO_DESTINATION.to_string()));
        }

        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Destination>(&content) {
            Ok(destination) if !destination.name.trim().is_empty() => Ok(destination),
            Ok(_) => Err(Error::NotFound(NO_DESTINATION.to_string())),
            Err(e) => {
                warn!("Ignoring unreadable destination record: {}", e);
                Err(Error::NotFound(NO_DESTINATION.to_string()))
            }
        }
    }

    /// Forget the current selection
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, DestinationStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = DestinationStore::at(temp_dir.path().join("nested").join(DESTINATION_FILE_NAME));
        (temp_dir, store)
    }

    #[test]
    fn test_missing_record_is_not_found() {
        let (_dir, store) = temp_store();
        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::NotFound(ref m) if m == NO_DESTINATION));
        assert_eq!(err.notice(), "No destination selected");
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, store) = temp_store();
        let saved = store
            .save(&Destination::new("Louvre").with_description("Home of the Mona Lisa"))
            .unwrap();
        assert!(saved.saved_at.is_some());

        let loaded = store.load().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.description.as_deref(), Some("Home of the Mona Lisa"));

        // Reading does not consume the record
        assert!(store.load().is_ok());
    }

    #[test]
    fn test_last_write_wins() {
        let (_dir, store) = temp_store();
        store.save(&Destination::new("Louvre")).unwrap();
        store.save(&Destination::new("Musée d'Orsay")).unwrap();
        assert_eq!(store.load().unwrap().name, "Musée d'Orsay");
    }

    #[test]
    fn test_corrupt_record_is_not_found() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_legacy_bare_record() {
        let (_dir, store) = temp_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"name": "Colosseum"}"#).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.name, "Colosseum");
        assert!(loaded.saved_at.is_none());
    }

    #[test]
    fn test_empty_name_rejected() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.save(&Destination::new("  ")),
            Err(Error::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_clear() {
        let (_dir, store) = temp_store();
        store.clear().unwrap();
        store.save(&Destination::new("Louvre")).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_from_summary() {
        let place = PlaceSummary {
            name: "Gion".into(),
            description: String::new(),
        };
        let destination = Destination::from(&place);
        assert_eq!(destination.name, "Gion");
        assert!(destination.description.is_none());
    }

    #[test]
    fn test_from_config_path() {
        let mut config = Config::default();
        config.storage.destination_path = Some(PathBuf::from("/tmp/somewhere/dest.json"));
        let store = DestinationStore::from_config(&config).unwrap();
        assert_eq!(store.path(), Path::new("/tmp/somewhere/dest.json"));
    }
}
