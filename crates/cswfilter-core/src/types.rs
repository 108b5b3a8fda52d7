//! Domain types shared by the record store and the task builder.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the form field that selects which catalogue services to search.
pub const SERVICE_ID_FIELD: &str = "serviceId";

/// A submitted form value: one string, or the ordered strings of a
/// repeated/multi-select control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    /// `""` and `[]` count as empty; a sequence of empty strings does not.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Single(s) => s.is_empty(),
            FieldValue::Multiple(items) => items.is_empty(),
        }
    }

    /// Flat string form used on the wire; sequences are comma-joined.
    pub fn to_query_value(&self) -> String {
        match self {
            FieldValue::Single(s) => s.clone(),
            FieldValue::Multiple(items) => items.join(","),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self { FieldValue::Single(value.to_string()) }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self { FieldValue::Single(value) }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self { FieldValue::Multiple(value) }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::Multiple(value.into_iter().map(str::to_string).collect())
    }
}

/// The validated key/value pairs of one form submission.
///
/// Field order is the order in which fields were inserted (or appeared in
/// the source JSON object). A `None` value stands for a null/absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    fields: Vec<(String, Option<FieldValue>)>,
}

impl FormValues {
    pub fn new() -> Self { Self::default() }

    /// Sets `name`. An existing field keeps its position and gets the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<FieldValue>) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.insert(name, None);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).and_then(|(_, v)| v.as_ref())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    /// The submitted service selection, if the field is present and not null.
    pub fn service_selection(&self) -> Option<ServiceSelection> {
        self.get(SERVICE_ID_FIELD).cloned().map(ServiceSelection::from)
    }
}

impl Serialize for FormValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FormValuesVisitor;

        impl<'de> Visitor<'de> for FormValuesVisitor {
            type Value = FormValues;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of form field names to strings or string arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<FormValues, A::Error> {
                let mut values = FormValues::new();
                while let Some((name, value)) = access.next_entry::<String, Option<FieldValue>>()? {
                    values.insert(name, value);
                }
                Ok(values)
            }
        }

        deserializer.deserialize_map(FormValuesVisitor)
    }
}

/// Which services a submission targets: one id or several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceSelection {
    Single(String),
    Multiple(Vec<String>),
}

impl ServiceSelection {
    /// Selected ids in submission order, duplicates kept.
    pub fn into_ids(self) -> Vec<String> {
        match self {
            ServiceSelection::Single(id) => vec![id],
            ServiceSelection::Multiple(ids) => ids,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ServiceSelection::Single(_) => 1,
            ServiceSelection::Multiple(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl From<FieldValue> for ServiceSelection {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Single(id) => ServiceSelection::Single(id),
            FieldValue::Multiple(ids) => ServiceSelection::Multiple(ids),
        }
    }
}

/// Parallel name/value sequences scoping one record query.
///
/// Only grows pairwise through [`ParameterList::push`], so `names` and
/// `values` always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParameterList {
    names: Vec<String>,
    values: Vec<FieldValue>,
}

impl ParameterList {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, name: impl Into<String>, value: FieldValue) {
        self.names.push(name.into());
        self.values.push(value);
    }

    pub fn names(&self) -> &[String] { &self.names }

    pub fn values(&self) -> &[FieldValue] { &self.values }

    pub fn len(&self) -> usize { self.names.len() }

    pub fn is_empty(&self) -> bool { self.names.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    /// First value recorded under `name`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

/// A checked entry of the registry selection list.
///
/// Accepts both `{id, label}` and the checkbox shape `{inputValue, boxLabel}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    #[serde(alias = "inputValue")]
    pub id: String,
    #[serde(alias = "boxLabel")]
    pub label: String,
}

impl RegistryEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into() }
    }
}

/// One paged record query, ready to be sent by a [`crate::traits::PageFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub endpoint: String,
    /// 1-based page number.
    pub page: usize,
    pub start: usize,
    pub limit: usize,
    /// Scoping criteria as `(name, flattened value)` pairs, in order.
    pub criteria: Vec<(String, String)>,
}

impl PageRequest {
    /// Query parameters as sent: every criterion name under `key`, every
    /// value under `value`, then the paging parameters.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = Vec::with_capacity(self.criteria.len() * 2 + 3);
        pairs.extend(self.criteria.iter().map(|(name, _)| ("key".to_string(), name.clone())));
        pairs.extend(self.criteria.iter().map(|(_, value)| ("value".to_string(), value.clone())));
        pairs.push(("page".to_string(), self.page.to_string()));
        pairs.push(("start".to_string(), self.start.to_string()));
        pairs.push(("limit".to_string(), self.limit.to_string()));
        pairs
    }
}

/// One decoded page of catalogue records. Records stay opaque JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordPage {
    pub page: usize,
    pub total_results: usize,
    pub records: Vec<serde_json::Value>,
}
