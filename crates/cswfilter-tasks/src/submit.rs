//! The submit action of the filter dialog.
//!
//! Returns the built tasks to the caller, which then decides when to show the
//! results and dismiss the dialog.

use cswfilter_core::error::{Error, Result};
use cswfilter_core::traits::{FilterForm, RegistrySource};
use cswfilter_core::types::FormValues;
use tracing::{debug, info};

use crate::builder::{SearchTask, TaskBuilder};

pub fn submit(form: &dyn FilterForm, registry: &dyn RegistrySource, builder: &TaskBuilder) -> Result<Vec<SearchTask>> {
    if !form.is_valid() {
        return Err(Error::InvalidForm("one or more fields failed validation".to_string()));
    }
    let values = form.values();
    if values.service_selection().is_none() {
        return Err(Error::MissingServiceId);
    }
    let entries = registry.checked_entries();
    debug!(fields = values.len(), registries = entries.len(), "submitting filter");
    let tasks = builder.build_tasks(&values, &entries)?;
    info!(tasks = tasks.len(), "filter submitted");
    Ok(tasks)
}

/// A form that is valid when each required field is present and non-empty,
/// and each field required only to be present is not null.
#[derive(Debug, Clone, Default)]
pub struct RequiredFieldsForm {
    values: FormValues,
    required: Vec<String>,
    present: Vec<String>,
}

impl RequiredFieldsForm {
    pub fn new(values: FormValues) -> Self { Self { values, required: Vec::new(), present: Vec::new() } }

    pub fn require(mut self, field: impl Into<String>) -> Self {
        self.required.push(field.into());
        self
    }

    /// Like [`Self::require`], but `""` and `[]` are accepted.
    pub fn require_present(mut self, field: impl Into<String>) -> Self {
        self.present.push(field.into());
        self
    }

    pub fn missing_fields(&self) -> Vec<&str> {
        let empty = self
            .required
            .iter()
            .map(String::as_str)
            .filter(|f| self.values.get(f).map_or(true, |v| v.is_empty()));
        let absent = self.present.iter().map(String::as_str).filter(|f| self.values.get(f).is_none());
        empty.chain(absent).collect()
    }
}

impl FilterForm for RequiredFieldsForm {
    fn is_valid(&self) -> bool { self.missing_fields().is_empty() }

    fn values(&self) -> FormValues { self.values.clone() }
}
