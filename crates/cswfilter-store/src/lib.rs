//! Lazily-loaded, paginated record source scoped by a [`ParameterList`].
//!
//! A store is created without touching the network. Pages are only requested
//! when the results view calls [`PagedRecordStore::load_page`] with a
//! [`PageFetcher`].

pub mod codec;

use cswfilter_core::error::{Error, Result};
use cswfilter_core::traits::PageFetcher;
use cswfilter_core::types::{PageRequest, ParameterList, RecordPage};
use tracing::{debug, warn};

pub use codec::{decode_page, to_url};

#[derive(Debug, Clone)]
pub struct PagedRecordStore {
    endpoint: String,
    criteria: ParameterList,
    page_size: usize,
    current: Option<RecordPage>,
}

impl PagedRecordStore {
    pub fn new(endpoint: impl Into<String>, criteria: ParameterList, page_size: usize) -> Self {
        Self { endpoint: endpoint.into(), criteria, page_size, current: None }
    }

    pub fn endpoint(&self) -> &str { &self.endpoint }

    pub fn criteria(&self) -> &ParameterList { &self.criteria }

    pub fn page_size(&self) -> usize { self.page_size }

    pub fn is_loaded(&self) -> bool { self.current.is_some() }

    pub fn current_page(&self) -> Option<&RecordPage> { self.current.as_ref() }

    pub fn total_results(&self) -> Option<usize> { self.current.as_ref().map(|p| p.total_results) }

    /// Number of pages the last reply implies; `None` before the first load.
    pub fn page_count(&self) -> Option<usize> {
        let total = self.total_results()?;
        if self.page_size == 0 { return Some(0); }
        Some(total.div_ceil(self.page_size))
    }

    /// Builds the request for 1-based `page` without sending it.
    pub fn request_for(&self, page: usize) -> Result<PageRequest> {
        if page == 0 { return Err(Error::InvalidPage(page)); }
        let start = (page - 1).checked_mul(self.page_size).ok_or(Error::InvalidPage(page))?;
        Ok(PageRequest {
            endpoint: self.endpoint.clone(),
            page,
            start,
            limit: self.page_size,
            criteria: self.criteria.iter().map(|(n, v)| (n.to_string(), v.to_query_value())).collect(),
        })
    }

    /// Fetches and decodes `page`. On failure the previously loaded page is kept.
    pub fn load_page(&mut self, fetcher: &dyn PageFetcher, page: usize) -> Result<&RecordPage> {
        let request = self.request_for(page)?;
        debug!(endpoint = %request.endpoint, page, start = request.start, limit = request.limit, "requesting record page");
        let reply = fetcher.fetch(&request).map_err(|e| Error::Operation(format!("fetching page {}: {}", page, e)))?;
        let decoded = decode_page(page, &reply).inspect_err(|e| warn!(page, error = %e, "record page not usable"))?;
        debug!(page, records = decoded.records.len(), total = decoded.total_results, "record page loaded");
        Ok(&*self.current.insert(decoded))
    }

    pub fn next_page(&mut self, fetcher: &dyn PageFetcher) -> Result<&RecordPage> {
        let next = match self.current.as_ref() {
            Some(p) => p.page.checked_add(1).ok_or(Error::InvalidPage(p.page))?,
            None => 1,
        };
        self.load_page(fetcher, next)
    }
}
