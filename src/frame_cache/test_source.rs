/*
This file is part of the OpenMap tools library.
Created: 18/10/2026
Last Modified: 18/10/2026
License: MIT

Notes: In-memory frame source used by the unit tests.
*/
use super::source::{CoverageBox, FrameSource, RawImage, SubframeKey};
use super::view_attributes::ViewAttributes;
use super::FrameError;
use crate::structures::LatLonPoint;
use std::io::{Error, ErrorKind};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Default)]
pub struct MockSource {
    pub decodes: AtomicUsize,
    pub out_of_memory: AtomicBool,
    pub fail_encode: AtomicBool,
}

impl FrameSource for MockSource {
    fn open(data_paths: &[String]) -> Result<MockSource, FrameError> {
        if data_paths.iter().any(|p| p.contains("missing")) {
            return Err(FrameError::Io(Error::new(ErrorKind::NotFound, "no A.TOC found")));
        }
        Ok(MockSource::default())
    }

    fn coverage(
        &self,
        upper_left: &LatLonPoint,
        lower_right: &LatLonPoint,
        scale: f32,
        _view: &ViewAttributes,
    ) -> Result<Vec<CoverageBox>, FrameError> {
        let make = |chart_code: &str, zone: char| CoverageBox {
            upper_left: *upper_left,
            lower_right: *lower_right,
            subframe_lat_interval: 0.01,
            subframe_lon_interval: 0.01,
            chart_code: chart_code.to_string(),
            zone: zone,
            scale: scale,
            percent_coverage: 100.0,
            toc_number: 0,
            entry_number: 0,
        };
        Ok(vec![make("TLM", '2'), make("JNC", '3')])
    }

    fn decode_subframe(&self, key: &SubframeKey, view: &ViewAttributes) -> Result<RawImage, FrameError> {
        if self.out_of_memory.load(Ordering::SeqCst) {
            return Err(FrameError::OutOfMemory);
        }
        self.decodes.fetch_add(1, Ordering::SeqCst);
        Ok(RawImage {
            colortable: vec![view.opaqueness as u32; view.number_of_colors as usize],
            image_data: vec![key.x as u8; 16],
        })
    }

    fn encode_jpeg(&self, image: &RawImage, _quality: f32) -> Result<Vec<u8>, FrameError> {
        if self.fail_encode.load(Ordering::SeqCst) {
            return Err(FrameError::Encode("bad colortable".to_string()));
        }
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend_from_slice(&image.image_data);
        Ok(bytes)
    }

    fn subframe_attributes(&self, key: &SubframeKey) -> Result<String, FrameError> {
        Ok(format!("toc {} entry {}", key.toc_number, key.entry_number))
    }
}
