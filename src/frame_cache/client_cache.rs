/*
This file is part of the OpenMap tools library.
Created: 17/10/2026
Last Modified: 18/10/2026
License: MIT
*/
use super::source::{CoverageBox, FrameSource, RawImage, SubframeKey};
use super::view_attributes::ViewAttributes;
use super::FrameError;
use crate::structures::LatLonPoint;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Cache statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}

/// One client's view onto the frame source, with the subframes it decoded
/// most recently.
pub struct FrameCache<S: FrameSource> {
    source: Arc<S>,
    subframes: LruCache<SubframeKey, RawImage>,
    hits: u64,
    misses: u64,
}

impl<S: FrameSource> FrameCache<S> {
    pub fn new(source: Arc<S>, capacity: usize) -> FrameCache<S> {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        FrameCache {
            source: source,
            subframes: LruCache::new(cap),
            hits: 0,
            misses: 0,
        }
    }

    /// Coverage boxes for the area, limited to the client's chart series.
    pub fn coverage(
        &self,
        upper_left: &LatLonPoint,
        lower_right: &LatLonPoint,
        scale: f32,
        view: &ViewAttributes,
    ) -> Result<Vec<CoverageBox>, FrameError> {
        let boxes = self.source.coverage(upper_left, lower_right, scale, view)?;
        Ok(boxes
            .into_iter()
            .filter(|b| view.accepts_series(&b.chart_code))
            .collect())
    }

    pub fn subframe(&mut self, key: &SubframeKey, view: &ViewAttributes) -> Result<RawImage, FrameError> {
        key.validate()?;
        if let Some(image) = self.subframes.get(key) {
            self.hits += 1;
            return Ok(image.clone());
        }
        self.misses += 1;
        let image = self.source.decode_subframe(key, view)?;
        self.subframes.put(*key, image.clone());
        Ok(image)
    }

    pub fn compressed_subframe(
        &mut self,
        key: &SubframeKey,
        view: &ViewAttributes,
        quality: f32,
    ) -> Result<Vec<u8>, FrameError> {
        let image = self.subframe(key, view)?;
        let bytes = self.source.encode_jpeg(&image, quality.clamp(0.0, 1.0))?;
        if bytes.is_empty() {
            return Err(FrameError::Encode("encoder produced no data".to_string()));
        }
        Ok(bytes)
    }

    pub fn subframe_attributes(&self, key: &SubframeKey) -> Result<String, FrameError> {
        key.validate()?;
        self.source.subframe_attributes(key)
    }

    /// Drops decoded subframes, e.g. after the view attributes change.
    pub fn clear(&mut self) {
        self.subframes.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.subframes.len(),
            capacity: self.subframes.cap().get(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}
