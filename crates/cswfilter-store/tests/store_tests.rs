use std::sync::Mutex;

use anyhow::anyhow;
use serde_json::{json, Value};
use url::Url;

use cswfilter_core::error::Error;
use cswfilter_core::traits::PageFetcher;
use cswfilter_core::types::{FieldValue, PageRequest, ParameterList};
use cswfilter_store::{decode_page, to_url, PagedRecordStore};

/// Serves a fixed catalogue of `total` numbered records and remembers requests.
struct FakeCatalogue {
    total: usize,
    seen: Mutex<Vec<PageRequest>>,
}

impl FakeCatalogue {
    fn new(total: usize) -> Self { Self { total, seen: Mutex::new(Vec::new()) } }
}

impl PageFetcher for FakeCatalogue {
    fn fetch(&self, request: &PageRequest) -> anyhow::Result<Value> {
        self.seen.lock().unwrap().push(request.clone());
        let end = (request.start + request.limit).min(self.total);
        let data: Vec<Value> = (request.start..end).map(|i| json!({ "id": i })).collect();
        Ok(json!({ "success": true, "data": data, "totalResults": self.total }))
    }
}

struct Unreachable;

impl PageFetcher for Unreachable {
    fn fetch(&self, _request: &PageRequest) -> anyhow::Result<Value> { Err(anyhow!("connection refused")) }
}

fn criteria() -> ParameterList {
    let mut params = ParameterList::new();
    params.push("keyword", FieldValue::from("ice"));
    params.push("bbox", FieldValue::from(vec!["1", "2", "3", "4"]));
    params.push("serviceId", FieldValue::from("srv1"));
    params
}

#[test]
fn new_store_is_not_loaded() {
    let store = PagedRecordStore::new("records.do", criteria(), 35);
    assert!(!store.is_loaded());
    assert_eq!(store.total_results(), None);
    assert_eq!(store.page_count(), None);
    assert_eq!(store.page_size(), 35);
}

#[test]
fn request_scopes_by_criteria_and_pages() {
    let store = PagedRecordStore::new("records.do", criteria(), 35);
    let request = store.request_for(3).expect("request");
    assert_eq!(request.start, 70);
    assert_eq!(request.limit, 35);
    assert_eq!(
        request.criteria,
        vec![
            ("keyword".to_string(), "ice".to_string()),
            ("bbox".to_string(), "1,2,3,4".to_string()),
            ("serviceId".to_string(), "srv1".to_string()),
        ]
    );
    assert!(matches!(store.request_for(0), Err(Error::InvalidPage(0))));
}

#[test]
fn oversized_page_number_is_rejected() {
    let store = PagedRecordStore::new("records.do", criteria(), 35);
    let page = usize::MAX / 2;
    assert!(matches!(store.request_for(page), Err(Error::InvalidPage(p)) if p == page));

    let catalogue = FakeCatalogue::new(10);
    let mut store = store;
    assert!(matches!(store.load_page(&catalogue, usize::MAX), Err(Error::InvalidPage(_))));
    assert!(catalogue.seen.lock().unwrap().is_empty(), "nothing is sent for an unreachable page");
    assert!(!store.is_loaded());
}

#[test]
fn load_page_fetches_lazily_and_tracks_totals() {
    let catalogue = FakeCatalogue::new(80);
    let mut store = PagedRecordStore::new("records.do", criteria(), 35);
    assert!(catalogue.seen.lock().unwrap().is_empty(), "creating a store sends nothing");

    let first = store.load_page(&catalogue, 1).expect("page 1");
    assert_eq!(first.records.len(), 35);
    assert_eq!(first.total_results, 80);
    assert!(store.is_loaded());
    assert_eq!(store.page_count(), Some(3));

    let last = store.load_page(&catalogue, 3).expect("page 3");
    assert_eq!(last.records.len(), 10);
    assert_eq!(last.records[0], json!({ "id": 70 }));
    assert_eq!(catalogue.seen.lock().unwrap().len(), 2);
}

#[test]
fn next_page_walks_forward_from_current() {
    let catalogue = FakeCatalogue::new(50);
    let mut store = PagedRecordStore::new("records.do", criteria(), 35);
    assert_eq!(store.next_page(&catalogue).expect("first").page, 1);
    assert_eq!(store.next_page(&catalogue).expect("second").page, 2);
    let pages: Vec<usize> = catalogue.seen.lock().unwrap().iter().map(|r| r.page).collect();
    assert_eq!(pages, vec![1, 2]);
}

#[test]
fn failed_load_keeps_previous_page() {
    let mut store = PagedRecordStore::new("records.do", criteria(), 35);
    store.load_page(&FakeCatalogue::new(5), 1).expect("page 1");

    let err = store.load_page(&Unreachable, 2).unwrap_err();
    assert!(matches!(err, Error::Operation(_)), "got {err:?}");
    assert_eq!(store.current_page().map(|p| p.page), Some(1));
    assert_eq!(store.total_results(), Some(5));
}

#[test]
fn decode_rejects_failed_and_malformed_replies() {
    let rejected = decode_page(1, &json!({ "success": false, "msg": "registry offline" }));
    assert!(matches!(rejected, Err(Error::RequestRejected(ref m)) if m == "registry offline"));

    let no_total = decode_page(1, &json!({ "success": true, "data": [] }));
    assert!(matches!(no_total, Err(Error::MalformedResponse(_))));

    let not_object = decode_page(1, &json!([1, 2]));
    assert!(matches!(not_object, Err(Error::MalformedResponse(_))));

    let ok = decode_page(4, &json!({ "success": true, "data": [{"id": "r1"}], "totalResults": 106 })).expect("ok");
    assert_eq!(ok.page, 4);
    assert_eq!(ok.total_results, 106);
}

#[test]
fn request_renders_as_encoded_url() {
    let store = PagedRecordStore::new("getFilteredCSWRecords.do", criteria(), 35);
    let request = store.request_for(1).expect("request");
    let base = Url::parse("http://portal.example.org/portal/").unwrap();
    let url = to_url(&base, &request).expect("url");

    assert_eq!(url.path(), "/portal/getFilteredCSWRecords.do");
    assert_eq!(
        url.query(),
        Some("key=keyword&key=bbox&key=serviceId&value=ice&value=1%2C2%2C3%2C4&value=srv1&page=1&start=0&limit=35")
    );
}
