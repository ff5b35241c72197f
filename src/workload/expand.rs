use serde_json::Value;

use crate::config::{BlockRange, EndpointSpec};

use super::RequestDescriptor;

/// Expands declared endpoints against a block range into the ordered request
/// sequence the scheduler draws from.
///
/// Endpoints expand in declaration order. A block-indexed endpoint with an
/// enabled range emits one descriptor per block, ascending start..=end, with
/// `block_identifier.index` substituted in its payload. Everything else
/// emits exactly one descriptor with the payload template unmodified.
#[must_use]
pub fn expand_endpoints(
    endpoints: &[EndpointSpec],
    range: &BlockRange,
    base_url: &str,
) -> Vec<RequestDescriptor> {
    let mut descriptors = Vec::with_capacity(endpoints.len());
    for endpoint in endpoints {
        let url = format!("{}{}", base_url, endpoint.path);
        if range.enabled && endpoint.uses_block_index {
            for block in range.start..=range.end {
                let payload = endpoint.payload.clone().map(|mut payload| {
                    substitute_block_index(&mut payload, block);
                    payload
                });
                let label = if range.per_block_labels {
                    format!("{}#{}", endpoint.path, block)
                } else {
                    endpoint.path.clone()
                };
                descriptors.push(RequestDescriptor {
                    label,
                    method: endpoint.method,
                    url: url.clone(),
                    payload,
                });
            }
        } else {
            descriptors.push(RequestDescriptor {
                label: endpoint.path.clone(),
                method: endpoint.method,
                url,
                payload: endpoint.payload.clone(),
            });
        }
    }
    descriptors
}

/// Rewrites every `block_identifier.index` found anywhere in the payload
/// tree, walking nested mappings and arrays.
fn substitute_block_index(value: &mut Value, block: u64) {
    match value {
        Value::Object(map) => {
            if let Some(Value::Object(identifier)) = map.get_mut("block_identifier")
                && let Some(index) = identifier.get_mut("index")
            {
                *index = Value::from(block);
            }
            for entry in map.values_mut() {
                substitute_block_index(entry, block);
            }
        }
        Value::Array(items) => {
            for item in items {
                substitute_block_index(item, block);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}
