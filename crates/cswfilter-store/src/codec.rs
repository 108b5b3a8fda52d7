//! Wire format of the record endpoint.
//!
//! Replies look like `{"success": true, "data": [...], "totalResults": N}`.

use cswfilter_core::error::{Error, Result};
use cswfilter_core::types::{PageRequest, RecordPage};
use serde_json::Value;
use url::Url;

pub fn decode_page(page: usize, reply: &Value) -> Result<RecordPage> {
    let obj = reply.as_object().ok_or_else(|| Error::MalformedResponse("reply is not a JSON object".to_string()))?;

    match obj.get("success") {
        Some(Value::Bool(true)) => {}
        Some(Value::Bool(false)) => {
            let msg = obj.get("msg").and_then(Value::as_str).unwrap_or("server reported failure");
            return Err(Error::RequestRejected(msg.to_string()));
        }
        _ => return Err(Error::MalformedResponse("missing boolean 'success'".to_string())),
    }

    let records = obj
        .get("data")
        .and_then(Value::as_array)
        .cloned()
        .ok_or_else(|| Error::MalformedResponse("missing array 'data'".to_string()))?;
    let total = obj
        .get("totalResults")
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::MalformedResponse("missing count 'totalResults'".to_string()))?;
    let total_results = usize::try_from(total).map_err(|_| Error::MalformedResponse(format!("totalResults {} out of range", total)))?;

    Ok(RecordPage { page, total_results, records })
}

/// Renders `request` as a URL relative to `base` with a form-urlencoded query.
pub fn to_url(base: &Url, request: &PageRequest) -> Result<Url> {
    let mut url = base
        .join(&request.endpoint)
        .map_err(|e| Error::InvalidConfig(format!("endpoint '{}': {}", request.endpoint, e)))?;
    url.query_pairs_mut().clear().extend_pairs(request.query_pairs());
    Ok(url)
}
