use crate::types::{FormValues, PageRequest, RegistryEntry};

/// The form collaborator: validates itself and hands out its values.
pub trait FilterForm {
    fn is_valid(&self) -> bool;
    fn values(&self) -> FormValues;
}

/// Read accessor over the currently checked registry entries.
pub trait RegistrySource {
    fn checked_entries(&self) -> Vec<RegistryEntry>;
}

impl RegistrySource for [RegistryEntry] {
    fn checked_entries(&self) -> Vec<RegistryEntry> { self.to_vec() }
}

impl RegistrySource for Vec<RegistryEntry> {
    fn checked_entries(&self) -> Vec<RegistryEntry> { self.clone() }
}

/// Transport seam for record pages: returns the raw JSON reply.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, request: &PageRequest) -> anyhow::Result<serde_json::Value>;
}
