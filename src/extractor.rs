use std::collections::HashMap;
use std::path::Path;

use image::{DynamicImage, imageops::FilterType};
use palette::Srgb;
use tracing::debug;

use crate::error::ImageLoadError;

/// Side length of the raster every image is reduced to before sampling.
pub const SAMPLE_SIDE: u32 = 64;
/// Only every n-th pixel of the sample raster is counted.
pub const PIXEL_STRIDE: usize = 4;
/// Pixels with lower alpha are treated as background and skipped.
pub const MIN_ALPHA: u8 = 200;
/// Width of one quantization bucket per channel.
pub const BUCKET_STEP: u16 = 32;
pub const DEFAULT_PALETTE_COUNT: usize = 5;

/// One representative colour and how many sampled pixels fell into its bucket.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swatch {
    rgb: Srgb<u8>,
    population: u32,
}

impl Swatch {
    pub fn new(rgb: Srgb<u8>, population: u32) -> Self {
        Self { rgb, population }
    }

    pub fn rgb(self) -> Srgb<u8> {
        self.rgb
    }

    pub fn population(self) -> u32 {
        self.population
    }

    /// CSS form used for swatch dots and frame colours.
    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.rgb.red, self.rgb.green, self.rgb.blue)
    }

    pub fn hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.rgb.red, self.rgb.green, self.rgb.blue)
    }
}

/// Round a channel to the nearest multiple of [`BUCKET_STEP`], halves rounding up.
///
/// The topmost bucket (256) does not fit in a byte and is clamped to 255.
pub fn quantize_channel(channel: u8) -> u8 {
    let step = BUCKET_STEP;
    let bucket = (channel as u16 + step / 2) / step;
    (bucket * step).min(u8::MAX as u16) as u8
}

/// Decode `input` and return up to `count` of its most frequent quantized colours.
///
/// Any decode failure yields an empty palette; callers render no swatches in that case.
pub fn extract_palette(input: &[u8], count: usize) -> Vec<Swatch> {
    match try_extract_palette(input, count) {
        Ok(swatches) => swatches,
        Err(e) => {
            debug!(error = %e, "palette extraction failed, using empty palette");
            Vec::new()
        }
    }
}

/// Read image bytes from disk for native callers.
pub fn read_image(path: impl AsRef<Path>) -> Result<Vec<u8>, ImageLoadError> {
    let path = path.as_ref();
    std::fs::read(path).map_err(|source| ImageLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn try_extract_palette(input: &[u8], count: usize) -> Result<Vec<Swatch>, ImageLoadError> {
    let img = image::load_from_memory(input)?;
    Ok(palette_from_image(&img, count))
}

pub fn palette_from_image(img: &DynamicImage, count: usize) -> Vec<Swatch> {
    if count == 0 {
        return Vec::new();
    }

    // Fixed raster so the cost does not depend on the source resolution
    let sample = image::imageops::resize(img, SAMPLE_SIDE, SAMPLE_SIDE, FilterType::Nearest);

    // Histogram keyed by quantized colour, remembering first-seen order for ties
    let mut slots: HashMap<[u8; 3], usize> = HashMap::new();
    let mut buckets: Vec<([u8; 3], u32)> = Vec::new();

    for pixel in sample.pixels().step_by(PIXEL_STRIDE) {
        let [r, g, b, a] = pixel.0;
        if a < MIN_ALPHA {
            continue;
        }

        let key = [quantize_channel(r), quantize_channel(g), quantize_channel(b)];
        match slots.get(&key) {
            Some(&slot) => buckets[slot].1 += 1,
            None => {
                slots.insert(key, buckets.len());
                buckets.push((key, 1));
            }
        }
    }

    // sort_by is stable, equal counts keep encounter order
    buckets.sort_by(|a, b| b.1.cmp(&a.1));

    buckets
        .into_iter()
        .take(count)
        .map(|([r, g, b], population)| Swatch::new(Srgb::new(r, g, b), population))
        .collect()
}

/// Opaque handle for one outstanding palette request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteTicket(u64);

/// Per-owner palette state: memoizes the result for the current `(url, count)` and drops
/// results that arrive after the owner went away or switched to another image.
#[derive(Debug, Default)]
pub struct PaletteSlot {
    source: Option<(String, usize)>,
    generation: u64,
    swatches: Option<Vec<Swatch>>,
    cancelled: bool,
}

impl PaletteSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `url`. Returns `None` when the same request is already in flight or
    /// answered, or when the slot has been torn down.
    pub fn request(&mut self, url: &str, count: usize) -> Option<PaletteTicket> {
        if self.cancelled || url.is_empty() {
            return None;
        }
        if let Some((current, current_count)) = &self.source {
            if current == url && *current_count == count {
                return None;
            }
        }

        self.generation += 1;
        self.source = Some((url.to_string(), count));
        self.swatches = None;
        Some(PaletteTicket(self.generation))
    }

    /// Deliver the loaded bytes (or the load failure) for `ticket`.
    ///
    /// Returns whether the outcome was applied.
    pub fn resolve(&mut self, ticket: PaletteTicket, loaded: Result<&[u8], ImageLoadError>) -> bool {
        if self.cancelled || ticket.0 != self.generation {
            debug!(ticket = ticket.0, current = self.generation, "dropping stale palette result");
            return false;
        }
        let Some((url, count)) = &self.source else {
            return false;
        };

        let swatches = match loaded {
            Ok(bytes) => extract_palette(bytes, *count),
            Err(e) => {
                debug!(url = %url, error = %e, "image failed to load, using empty palette");
                Vec::new()
            }
        };
        self.swatches = Some(swatches);
        true
    }

    pub fn teardown(&mut self) {
        self.cancelled = true;
    }

    pub fn is_resolved(&self) -> bool {
        self.swatches.is_some()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_ref().map(|(url, _)| url.as_str())
    }

    /// Resolved swatches, empty while loading.
    pub fn swatches(&self) -> &[Swatch] {
        self.swatches.as_deref().unwrap_or_default()
    }
}
