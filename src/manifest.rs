//! Paintings manifest: parsing, entry normalization and seed fallback.
//!
//! A manifest is either a bare JSON array of entries or an object with an `items` array.
//! Entries are shape-tolerant; [`normalize_entry`] decides field precedence.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::content::{Category, ContentItem, WallPosition, is_calendar_year};
use crate::error::ManifestError;

pub const DEFAULT_MANIFEST_PATH: &str = "paintings/manifest.json";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawManifest {
    List(Vec<Value>),
    Wrapped { items: Vec<Value> },
}

/// One manifest entry as written by hand. Every field is optional and loosely typed.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEntry {
    src: Option<Value>,
    image: Option<Value>,
    url: Option<Value>,
    path: Option<Value>,
    id: Option<Value>,
    title: Option<Value>,
    description: Option<Value>,
    year: Option<Value>,
    medium: Option<Value>,
    size: Option<Value>,
    wall_position: Option<Value>,
}

/// Scalar value as display text; empty strings, zero, `false` and structured values yield `None`.
fn coerce_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn coerce_year(value: Option<&Value>) -> Option<i32> {
    let year = match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))?,
        _ => return None,
    };
    i32::try_from(year).ok().filter(|&y| is_calendar_year(y))
}

/// Human-readable title from an image path: `oil_still-life.jpg` → `Oil Still Life`.
pub fn filename_to_title(path: &str) -> String {
    let file = match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => path,
    };
    let base = match file.rfind('.') {
        Some(dot) => &file[..dot],
        None => file,
    };

    base.replace(['-', '_'], " ")
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Turn one raw entry into a painting item, or `None` when it has no usable image source.
pub fn normalize_entry(raw: Value) -> Option<ContentItem> {
    let entry: RawEntry = serde_json::from_value(raw).ok()?;

    let src = [&entry.src, &entry.image, &entry.url, &entry.path]
        .into_iter()
        .find_map(|field| non_empty_str(field.as_ref()))?
        .to_string();

    let id = coerce_text(entry.id.as_ref()).unwrap_or_else(|| src.clone());
    let title = coerce_text(entry.title.as_ref())
        .or_else(|| Some(filename_to_title(&src)).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| src.clone());

    let mut item = ContentItem::new(id, title, src).with_category(Category::Painting);
    item.description = coerce_text(entry.description.as_ref());
    item.year = coerce_year(entry.year.as_ref());
    item.medium = coerce_text(entry.medium.as_ref());
    item.size = coerce_text(entry.size.as_ref());
    item.wall_position = non_empty_str(entry.wall_position.as_ref()).and_then(WallPosition::from_key);
    Some(item)
}

pub fn parse_manifest(body: &str) -> Result<Vec<ContentItem>, ManifestError> {
    let json: Value = serde_json::from_str(body)?;
    let entries = match serde_json::from_value::<RawManifest>(json) {
        Ok(RawManifest::List(entries)) | Ok(RawManifest::Wrapped { items: entries }) => entries,
        Err(_) => return Err(ManifestError::InvalidFormat),
    };

    let total = entries.len();
    let mut seen = HashSet::new();
    let items: Vec<ContentItem> = entries
        .into_iter()
        .filter_map(normalize_entry)
        .filter(|item| {
            let fresh = seen.insert(item.id.clone());
            if !fresh {
                warn!(id = %item.id, "dropping manifest entry with duplicate id");
            }
            fresh
        })
        .collect();

    if items.len() < total {
        warn!(kept = items.len(), total, "some manifest entries were skipped");
    }
    Ok(items)
}

/// Interpret a fetched manifest: anything outside 2xx is a failure.
pub fn parse_response(status: u16, body: &str) -> Result<Vec<ContentItem>, ManifestError> {
    if !(200..300).contains(&status) {
        return Err(ManifestError::Status(status));
    }
    parse_manifest(body)
}

pub fn load_manifest_file(path: impl AsRef<Path>) -> Result<Vec<ContentItem>, ManifestError> {
    let path = path.as_ref();
    let body = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&body)
}

/// Items to display plus the non-fatal error, if any, that forced the fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCollection {
    pub items: Vec<ContentItem>,
    pub error: Option<String>,
    pub from_fallback: bool,
}

pub fn resolve_with_fallback(
    loaded: Result<Vec<ContentItem>, ManifestError>,
    fallback: Vec<ContentItem>,
) -> LoadedCollection {
    match loaded {
        Ok(items) if !items.is_empty() => LoadedCollection {
            items,
            error: None,
            from_fallback: false,
        },
        Ok(_) => LoadedCollection {
            items: fallback,
            error: None,
            from_fallback: true,
        },
        Err(e) => {
            warn!(error = %e, "manifest unavailable, showing built-in paintings");
            LoadedCollection {
                items: fallback,
                error: Some(e.to_string()),
                from_fallback: true,
            }
        }
    }
}
