//! Per-service task assembly and title lookup.

use cswfilter_core::config::{FilterSettings, DEFAULT_ENDPOINT};
use cswfilter_core::error::{Error, Result};
use cswfilter_core::types::{FormValues, ParameterList, RegistryEntry};
use cswfilter_store::PagedRecordStore;
use tracing::{debug, warn};

use crate::denormalize::denormalize;

/// Records per page for every search task.
pub const PAGE_SIZE: usize = 35;

/// Title given to a task whose service is not among the checked registries.
pub const FALLBACK_TITLE: &str = "Error retrieving title";

/// What to do when a selected service has no registry label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TitlePolicy {
    /// Use [`FALLBACK_TITLE`] and keep building the batch.
    #[default]
    FailSoft,
    /// Abort the batch with [`Error::UnknownService`].
    Strict,
}

/// One search to run against a single service.
#[derive(Debug, Clone)]
pub struct SearchTask {
    pub title: String,
    pub parameters: ParameterList,
    pub page_size: usize,
    /// Not loaded yet; the results view pages through it.
    pub data_source: PagedRecordStore,
}

/// Label of the first registry entry whose id equals `service_id`.
pub fn resolve_title<'a>(registry: &'a [RegistryEntry], service_id: &str) -> Option<&'a str> {
    registry.iter().find(|e| e.id == service_id).map(|e| e.label.as_str())
}

#[derive(Debug, Clone)]
pub struct TaskBuilder {
    endpoint: String,
    policy: TitlePolicy,
}

impl Default for TaskBuilder {
    fn default() -> Self { Self::new(DEFAULT_ENDPOINT) }
}

impl TaskBuilder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), policy: TitlePolicy::default() }
    }

    pub fn from_settings(settings: &FilterSettings) -> Self {
        let policy = if settings.strict_titles { TitlePolicy::Strict } else { TitlePolicy::FailSoft };
        Self::new(settings.endpoint.clone()).with_policy(policy)
    }

    pub fn with_policy(mut self, policy: TitlePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn endpoint(&self) -> &str { &self.endpoint }

    pub fn policy(&self) -> TitlePolicy { self.policy }

    /// Builds one task per selected service id, in selection order.
    ///
    /// Duplicate ids give duplicate tasks; an empty selection gives no tasks.
    pub fn build_tasks(&self, values: &FormValues, registry: &[RegistryEntry]) -> Result<Vec<SearchTask>> {
        let ids = values.service_selection().ok_or(Error::MissingServiceId)?.into_ids();
        let tasks = ids
            .iter()
            .map(|id| self.build_task(values, id, registry))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = tasks.len(), "search tasks built");
        Ok(tasks)
    }

    pub fn build_task(&self, values: &FormValues, service_id: &str, registry: &[RegistryEntry]) -> Result<SearchTask> {
        let parameters = denormalize(values, service_id);
        let title = match (resolve_title(registry, service_id), self.policy) {
            (Some(label), _) => label.to_string(),
            (None, TitlePolicy::FailSoft) => {
                warn!(service_id, "service not among checked registries, using fallback title");
                FALLBACK_TITLE.to_string()
            }
            (None, TitlePolicy::Strict) => return Err(Error::UnknownService(service_id.to_string())),
        };
        debug!(service_id, %title, params = parameters.len(), "search task");
        let data_source = PagedRecordStore::new(self.endpoint.clone(), parameters.clone(), PAGE_SIZE);
        Ok(SearchTask { title, parameters, page_size: PAGE_SIZE, data_source })
    }
}
