/*
This file is part of the OpenMap tools library.
Created: 17/10/2026
Last Modified: 18/10/2026
License: MIT

Notes: RPF frames are divided into a 6 x 6 grid of 256 x 256 pixel subframes.
Reading the table of contents, decoding subframes and JPEG compression are
left to a `FrameSource` implementation.
*/
use super::view_attributes::ViewAttributes;
use super::FrameError;
use crate::structures::LatLonPoint;
use serde::{Deserialize, Serialize};

pub const SUBFRAMES_PER_FRAME: i32 = 6;
pub const SUBFRAME_PIXELS: usize = 256;

/// Coverage of one RPF zone/chart within a requested area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverageBox {
    pub upper_left: LatLonPoint,
    pub lower_right: LatLonPoint,
    pub subframe_lat_interval: f64,
    pub subframe_lon_interval: f64,
    pub chart_code: String,
    pub zone: char,
    pub scale: f32,
    /// Share of the requested area covered, 0 to 100.
    pub percent_coverage: f32,
    /// Table of contents this box came from.
    pub toc_number: i32,
    pub entry_number: i32,
}

/// Identifies one subframe of one frame file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubframeKey {
    pub toc_number: i32,
    pub entry_number: i32,
    pub x: i32,
    pub y: i32,
}

impl SubframeKey {
    pub fn new(toc_number: i32, entry_number: i32, x: i32, y: i32) -> SubframeKey {
        SubframeKey {
            toc_number: toc_number,
            entry_number: entry_number,
            x: x,
            y: y,
        }
    }

    pub fn validate(&self) -> Result<(), FrameError> {
        if self.toc_number < 0 || self.entry_number < 0 {
            return Err(FrameError::InvalidFrame(format!(
                "negative toc {} or entry {}",
                self.toc_number, self.entry_number
            )));
        }
        if !(0..SUBFRAMES_PER_FRAME).contains(&self.x) || !(0..SUBFRAMES_PER_FRAME).contains(&self.y) {
            return Err(FrameError::InvalidFrame(format!(
                "subframe ({}, {}) outside the {}x{} grid",
                self.x, self.y, SUBFRAMES_PER_FRAME, SUBFRAMES_PER_FRAME
            )));
        }
        Ok(())
    }
}

/// A decoded, color-indexed subframe.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawImage {
    /// ARGB colors.
    pub colortable: Vec<u32>,
    /// One colortable index per pixel, row major.
    pub image_data: Vec<u8>,
}

impl RawImage {
    pub fn is_empty(&self) -> bool {
        self.image_data.is_empty()
    }
}

/// Access to RPF data on disk.
pub trait FrameSource: Send + Sync + 'static {
    /// Opens the RPF directories given in the server settings.
    fn open(data_paths: &[String]) -> Result<Self, FrameError>
    where
        Self: Sized;

    fn coverage(
        &self,
        upper_left: &LatLonPoint,
        lower_right: &LatLonPoint,
        scale: f32,
        view: &ViewAttributes,
    ) -> Result<Vec<CoverageBox>, FrameError>;

    fn decode_subframe(&self, key: &SubframeKey, view: &ViewAttributes) -> Result<RawImage, FrameError>;

    /// Compresses a decoded subframe; `quality` is in 0.0 to 1.0.
    fn encode_jpeg(&self, image: &RawImage, quality: f32) -> Result<Vec<u8>, FrameError>;

    /// Attribute text (source, edition, dates) for the subframe's frame.
    fn subframe_attributes(&self, key: &SubframeKey) -> Result<String, FrameError>;
}

#[cfg(test)]
mod test {
    use super::SubframeKey;

    #[test]
    fn test_subframe_key_bounds() {
        assert!(SubframeKey::new(0, 3, 0, 5).validate().is_ok());
        assert!(SubframeKey::new(0, 3, 6, 0).validate().is_err());
        assert!(SubframeKey::new(0, 3, 0, -1).validate().is_err());
        assert!(SubframeKey::new(-1, 3, 0, 0).validate().is_err());
    }
}
