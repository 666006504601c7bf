//! ReleaseRecord - デコード済みのリリース

/// A decoded release: where the manifest goes and what it contains.
///
/// Read-only once decoded. `name` and `version` come from the stored record
/// itself and are only used for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseRecord {
    pub name: String,
    pub version: i32,
    pub namespace: String,
    pub manifest: String,
}

impl ReleaseRecord {
    pub fn new(namespace: impl Into<String>, manifest: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            version: 0,
            namespace: namespace.into(),
            manifest: manifest.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.version = version;
        self
    }
}
