use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

/// Yosemite-area campgrounds known out of the box
const YOSEMITE_CAMPGROUNDS: &[(&str, &str)] = &[
    ("232447", "Upper Pines"),
    ("232450", "Lower Pines"),
    ("232449", "North Pines"),
    ("232451", "Hodgdon Meadow"),
    ("232452", "Crane Flat"),
    ("232446", "Wawona"),
    ("232448", "Tuolumne Meadows"),
    ("10083567", "White Wolf"),
    ("232453", "Bridalveil Creek"),
    ("10083840", "Yosemite Creek"),
    ("10083831", "Porcupine Flat"),
    ("10083845", "Tamarack Flat"),
    ("232445", "Watchman"),
    ("232458", "Platte River"),
];

/// Immutable mapping from facility id to display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CampgroundDirectory {
    names: BTreeMap<String, String>,
}

/// Error loading a campground directory file
#[derive(thiserror::Error, Debug)]
pub enum DirectoryError {
    /// The file could not be read
    #[error("Failed to read campground directory: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a JSON object of id to name
    #[error("Failed to parse campground directory: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CampgroundDirectory {
    /// Build a directory from `(facility id, name)` pairs
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: entries
                .into_iter()
                .map(|(id, name)| (id.into(), name.into()))
                .collect(),
        }
    }

    /// Load a directory from a JSON file shaped like `{"232447": "Upper Pines"}`
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let contents = std::fs::read_to_string(path)?;
        let names: BTreeMap<String, String> = serde_json::from_str(&contents)?;
        Ok(Self { names })
    }

    /// Display name for a facility, if known
    pub fn get(&self, facility_id: &str) -> Option<&str> {
        self.names.get(facility_id).map(String::as_str)
    }

    /// Display name for a facility, falling back to `Campground {id}`
    pub fn name_for(&self, facility_id: &str) -> String {
        self.get(facility_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Campground {}", facility_id))
    }

    /// Iterate over `(facility id, name)` pairs ordered by id
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }

    /// Number of known campgrounds
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no campground is known
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for CampgroundDirectory {
    fn default() -> Self {
        Self::new(YOSEMITE_CAMPGROUNDS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directory_knows_yosemite() {
        let directory = CampgroundDirectory::default();
        assert_eq!(directory.len(), 14);
        assert_eq!(directory.get("232447"), Some("Upper Pines"));
        assert_eq!(directory.name_for("10083567"), "White Wolf");
    }

    #[test]
    fn test_unknown_facility_falls_back_to_raw_id() {
        let directory = CampgroundDirectory::default();
        assert_eq!(directory.get("999999"), None);
        assert_eq!(directory.name_for("999999"), "Campground 999999");
    }

    #[test]
    fn test_load_from_json_file() {
        let path = std::env::temp_dir().join(format!(
            "campground-directory-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"233503": "Grant River", "255119": "Fowlers Campground"}"#)
            .unwrap();

        let directory = CampgroundDirectory::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(directory.len(), 2);
        assert_eq!(directory.name_for("233503"), "Grant River");
        assert_eq!(directory.name_for("232447"), "Campground 232447");
    }

    #[test]
    fn test_load_rejects_non_object_json() {
        let path = std::env::temp_dir().join(format!(
            "campground-directory-bad-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"["232447"]"#).unwrap();

        let result = CampgroundDirectory::from_json_file(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(DirectoryError::Parse(_))));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let directory = CampgroundDirectory::new([("1", "One")]);
        assert_eq!(
            serde_json::to_value(&directory).unwrap(),
            serde_json::json!({"1": "One"})
        );
    }
}
