//! Named snapshots of domain configurations that can be loaded back into the wizard.

use crate::app::domain_config::{Domain, DomainConfig};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedConfiguration {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub config: DomainConfig,
    pub saved_at: DateTime<Utc>,
}

impl SavedConfiguration {
    pub fn domain(&self) -> Domain {
        self.config.domain()
    }
}

/// Saved configurations kept in one JSON array file.
#[derive(Debug, Clone)]
pub struct SavedConfigStore {
    path: PathBuf,
}

impl SavedConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_data_dir() -> Option<Self> {
        crate::app::paths::data_dir().map(|dir| Self::new(dir.join("saved_configurations.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(path: &Path) -> Result<Vec<SavedConfiguration>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read saved configurations: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse saved configurations: {:?}", path))
    }

    /// Read-modify-write under an exclusive lock; the file is replaced atomically.
    fn update<T>(&self, change: impl FnOnce(&mut Vec<SavedConfiguration>) -> T) -> Result<T> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        let lock_path = self.path.with_extension("lock");
        let lock_file = fs::File::create(&lock_path).context("Failed to create lock file")?;
        lock_file
            .lock_exclusive()
            .context("Failed to acquire saved configurations lock")?;

        let mut saved = Self::read(&self.path)?;
        let result = change(&mut saved);

        let json =
            serde_json::to_string_pretty(&saved).context("Failed to serialize saved configurations")?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write {:?}", temp_path))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to replace {:?}", self.path))?;
        Ok(result)
    }

    /// Saves a snapshot and returns it.
    pub fn save(
        &self,
        name: &str,
        description: &str,
        config: DomainConfig,
    ) -> Result<SavedConfiguration> {
        let entry = SavedConfiguration {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description: description.trim().to_string(),
            config,
            saved_at: Utc::now(),
        };
        let stored = entry.clone();
        self.update(move |saved| saved.push(stored))?;
        info!(
            "Saved {} configuration '{}' ({})",
            entry.domain(),
            entry.name,
            entry.id
        );
        Ok(entry)
    }

    /// All snapshots, newest first.
    pub fn list(&self) -> Result<Vec<SavedConfiguration>> {
        let mut saved = Self::read(&self.path)?;
        saved.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        debug!("Listed {} saved configurations", saved.len());
        Ok(saved)
    }

    /// Removes a snapshot; returns whether it existed.
    pub fn delete(&self, id: Uuid) -> Result<bool> {
        let removed = self.update(|saved| {
            let before = saved.len();
            saved.retain(|entry| entry.id != id);
            saved.len() != before
        })?;
        if removed {
            info!("Deleted saved configuration {}", id);
        }
        Ok(removed)
    }
}
