use cswfilter_core::types::{FieldValue, FormValues, ParameterList, SERVICE_ID_FIELD};

/// Flattens `values` into the parameter list for a query against `service_id`.
///
/// Every field except the service selection itself is copied in form order,
/// skipping null and empty values. Sequence values are kept whole. The
/// `service_id` pair is always appended last.
pub fn denormalize(values: &FormValues, service_id: &str) -> ParameterList {
    let mut params = ParameterList::new();
    for (name, value) in values.iter() {
        if name == SERVICE_ID_FIELD { continue; }
        match value {
            Some(v) if !v.is_empty() => params.push(name, v.clone()),
            _ => {}
        }
    }
    params.push(SERVICE_ID_FIELD, FieldValue::from(service_id));
    params
}
