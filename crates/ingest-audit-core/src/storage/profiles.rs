use crate::error::Error;
use crate::storage::models::SourceVolumeProfile;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Read-only lookup of historical volume profiles by source id.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    profiles: Vec<SourceVolumeProfile>,
    index: HashMap<String, usize>,
}

impl ProfileStore {
    pub fn from_profiles(profiles: Vec<SourceVolumeProfile>) -> Self {
        let mut kept = Vec::with_capacity(profiles.len());
        let mut index = HashMap::new();

        for profile in profiles {
            if index.contains_key(&profile.source_id) {
                warn!(
                    "Duplicate profile for source '{}', keeping the first one",
                    profile.source_id
                );
                continue;
            }
            index.insert(profile.source_id.clone(), kept.len());
            kept.push(profile);
        }

        Self {
            profiles: kept,
            index,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let profiles: Vec<SourceVolumeProfile> = serde_json::from_str(json)?;
        Ok(Self::from_profiles(profiles))
    }

    pub fn from_json_path(path: &Path) -> Result<Self, Error> {
        if !path.is_file() {
            return Err(Error::MissingData {
                what: "CV data",
                path: path.to_path_buf(),
            });
        }
        let contents = fs::read_to_string(path)?;
        let store = Self::from_json_str(&contents)?;
        debug!("Loaded {} source profiles from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn get(&self, source_id: &str) -> Option<&SourceVolumeProfile> {
        self.index.get(source_id).map(|&i| &self.profiles[i])
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.index.contains_key(source_id)
    }

    /// Source ids in document order.
    pub fn source_ids(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.source_id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
