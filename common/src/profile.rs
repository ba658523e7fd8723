use std::{collections::BTreeMap, fs, io, path::Path};

use thiserror::Error;

use crate::config::PrinterSettings;

/// Name of the built-in profile. Always present, never removable.
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("no profile named `{0}`")]
    NotFound(String),
    #[error("the `{DEFAULT_PROFILE}` profile cannot be removed")]
    RemoveDefault,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// An explicit collection of named printer profiles. Callers that need
/// profile enumeration get a reference to one of these, there is no
/// process-wide list.
#[derive(Clone, Debug)]
pub struct ProfileStore {
    profiles: BTreeMap<String, PrinterSettings>,
}

impl ProfileStore {
    /// Creates a store holding only the built-in default profile.
    pub fn new() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(DEFAULT_PROFILE.to_owned(), PrinterSettings::default());
        Self { profiles }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&PrinterSettings> {
        self.profiles.get(name)
    }

    /// Adds or replaces a profile, keyed by its `profile_name` field.
    pub fn insert(&mut self, settings: PrinterSettings) {
        self.profiles
            .insert(settings.profile_name.clone(), settings);
    }

    pub fn remove(&mut self, name: &str) -> Result<(), ProfileError> {
        if name == DEFAULT_PROFILE {
            return Err(ProfileError::RemoveDefault);
        }

        self.profiles
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ProfileError::NotFound(name.to_owned()))
    }

    /// Writes one profile to disk as pretty-printed JSON.
    pub fn save_profile(path: &Path, settings: &PrinterSettings) -> Result<(), ProfileError> {
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reads one profile back from disk.
    pub fn load_profile(path: &Path) -> Result<PrinterSettings, ProfileError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}
