//! Data core of the portfolio site: palette extraction for gallery tiles, the gallery
//! query engine behind search/tabs/sort/lightbox, and the paintings manifest loader.
//!
//! Everything compiles natively; the `#[wasm_bindgen]` items below are the browser surface.

use js_sys::{Array, JSON, Object, Reflect};
use wasm_bindgen::prelude::*;

pub mod content;
pub mod error;
pub mod extractor;
pub mod gallery;
pub mod manifest;
pub mod seed;
pub mod settings;

pub use content::{Category, ContentItem, LinkKind, WallPosition};
pub use error::{ContentError, ImageLoadError, ManifestError, QueryParseError, SettingsError};
pub use extractor::{PaletteSlot, PaletteTicket, Swatch, extract_palette, palette_from_image, try_extract_palette};
pub use gallery::{CategoryCounts, CategoryFilter, Gallery, Lightbox, QueryState, SortOrder, filter_and_sort};
pub use manifest::{LoadedCollection, parse_manifest, parse_response, resolve_with_fallback};

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&format!("Unable to encode value: {e}")))?;
    JSON::parse(&json)
}

/// Most frequent colours of an image as CSS `rgb(...)` strings.
///
/// The host fetches the image; undecodable bytes give an empty array.
#[wasm_bindgen(js_name = extractPalette)]
pub fn extract_palette_js(input: Vec<u8>, count: usize) -> Array {
    let palette_js = Array::new();
    for swatch in extractor::extract_palette(&input, count) {
        palette_js.push(&JsValue::from_str(&swatch.css()));
    }
    palette_js
}

/// Normalize a fetched paintings manifest, falling back to the built-in paintings.
///
/// Returns `{ items, error }` where `error` is `null` unless the fallback was forced.
#[wasm_bindgen(js_name = loadPaintings)]
pub fn load_paintings(status: u16, body: &str) -> Result<Object, JsValue> {
    let loaded = manifest::resolve_with_fallback(manifest::parse_response(status, body), seed::paintings_fallback());

    let error = match loaded.error {
        Some(message) => JsValue::from_str(&message),
        None => JsValue::NULL,
    };

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("items"), &to_js(&loaded.items)?)?;
    Reflect::set(&result, &JsValue::from_str("error"), &error)?;
    Reflect::set(&result, &JsValue::from_str("fromFallback"), &JsValue::from_bool(loaded.from_fallback))?;
    Ok(result)
}

/// Built-in projects for the main gallery.
#[wasm_bindgen(js_name = seedProjects)]
pub fn seed_projects() -> Result<JsValue, JsValue> {
    to_js(&seed::projects())
}

/// Gallery state owned by a page: query, filtered view and lightbox position.
#[wasm_bindgen]
pub struct GalleryHandle {
    inner: Gallery,
}

#[wasm_bindgen]
impl GalleryHandle {
    /// `items_json` is a JSON array of content items.
    #[wasm_bindgen(constructor)]
    pub fn new(items_json: &str) -> Result<GalleryHandle, JsValue> {
        let items: Vec<ContentItem> =
            serde_json::from_str(items_json).map_err(|e| JsValue::from_str(&format!("Invalid items: {e}")))?;
        content::validate_collection(&items).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            inner: Gallery::new(items),
        })
    }

    #[wasm_bindgen(js_name = setQuery)]
    pub fn set_query(&mut self, search: &str, category: &str, sort: &str) -> Result<(), JsValue> {
        let category: CategoryFilter = category.parse().map_err(|e: QueryParseError| JsValue::from_str(&e.to_string()))?;
        let sort: SortOrder = sort.parse().map_err(|e: QueryParseError| JsValue::from_str(&e.to_string()))?;
        self.inner.set_query(QueryState::new(search, category, sort));
        Ok(())
    }

    pub fn visible(&self) -> Result<JsValue, JsValue> {
        let visible: Vec<&ContentItem> = self.inner.visible().collect();
        to_js(&visible)
    }

    /// `{ all, painting, 3d, game }` badge counts.
    pub fn counts(&self) -> Result<Object, JsValue> {
        let result = Object::new();
        for (key, count) in self.inner.counts().entries() {
            Reflect::set(&result, &JsValue::from_str(key), &JsValue::from_f64(count as f64))?;
        }
        Ok(result)
    }

    pub fn open(&mut self, index: usize) {
        self.inner.open(index);
    }

    pub fn close(&mut self) {
        self.inner.close();
    }

    pub fn next(&mut self) {
        self.inner.next();
    }

    pub fn prev(&mut self) {
        self.inner.prev();
    }

    #[wasm_bindgen(js_name = activeIndex)]
    pub fn active_index(&self) -> Option<usize> {
        self.inner.lightbox().index()
    }

    pub fn active(&self) -> Result<JsValue, JsValue> {
        match self.inner.active() {
            Some(item) => to_js(item),
            None => Ok(JsValue::NULL),
        }
    }
}
