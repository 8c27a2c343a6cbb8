use serde_json::Value;

use super::types::Photo;
use crate::urls::join_url;

/// Reshape whatever the list endpoint returned into a uniform photo list.
///
/// The payload may be a bare array, or an object carrying the array under
/// `photos` or `data`. Items may be URL strings or records with loosely
/// named fields. Anything unusable is dropped, never padded with a
/// placeholder, and no payload shape makes this panic.
pub fn normalize_photo_list(payload: &Value, base_url: &str) -> Vec<Photo> {
    let items: &[Value] = match payload {
        Value::Array(items) => items,
        Value::Object(_) => first_present(payload, &["photos", "data"])
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| normalize_item(index, item, base_url))
        .collect()
}

fn normalize_item(index: usize, item: &Value, base_url: &str) -> Option<Photo> {
    if !is_truthy(item) {
        return None;
    }

    // A bare string is just a URL.
    if let Some(raw_url) = item.as_str() {
        return Some(Photo {
            id: format!("{}-{}", index, raw_url),
            url: join_url(base_url, raw_url),
            title: format!("Photo {}", index + 1),
            uploaded_at: None,
        });
    }

    let raw_url = first_string(item, &["url", "src", "path", "location"])?;

    let id = match first_present(item, &["id", "_id"]) {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => format!("{}-{}", index, raw_url),
    };

    let title = first_string(item, &["title", "name", "filename"])
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Photo {}", index + 1));

    Some(Photo {
        id,
        url: join_url(base_url, raw_url),
        title,
        uploaded_at: first_present(item, &["uploadedAt", "createdAt", "timestamp"]).cloned(),
    })
}

/// First of `fields` present on `item` with a truthy value.
fn first_present<'a>(item: &'a Value, fields: &[&str]) -> Option<&'a Value> {
    fields
        .iter()
        .find_map(|field| item.get(field).filter(|value| is_truthy(value)))
}

/// First of `fields` present on `item` as a non-empty string.
fn first_string<'a>(item: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .find_map(|field| item.get(field).and_then(Value::as_str).filter(|s| !s.is_empty()))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(truthy) => *truthy,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
