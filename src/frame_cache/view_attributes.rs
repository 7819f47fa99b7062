/*
This file is part of the OpenMap tools library.
Created: 17/10/2026
Last Modified: 17/10/2026
License: MIT
*/
use serde::{Deserialize, Serialize};

/// Per-client rendering preferences applied when subframes are decoded.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewAttributes {
    pub number_of_colors: u32,
    /// 0 is fully transparent, 255 opaque.
    pub opaqueness: u8,
    pub scale_images: bool,
    pub image_scale_factor: f32,
    /// Chart series code to restrict coverage to, or "ANY".
    pub chart_series: String,
}

impl Default for ViewAttributes {
    fn default() -> ViewAttributes {
        ViewAttributes {
            number_of_colors: 216,
            opaqueness: 255,
            scale_images: true,
            image_scale_factor: 4.0,
            chart_series: ANY_SERIES.to_string(),
        }
    }
}

pub const ANY_SERIES: &str = "ANY";

impl ViewAttributes {
    pub fn accepts_series(&self, chart_code: &str) -> bool {
        self.chart_series == ANY_SERIES || self.chart_series.eq_ignore_ascii_case(chart_code)
    }
}

#[cfg(test)]
mod test {
    use super::ViewAttributes;

    #[test]
    fn test_defaults_and_series_filter() {
        let va: ViewAttributes = serde_json::from_str(r#"{ "opaqueness": 128 }"#).unwrap();
        assert_eq!(va.opaqueness, 128);
        assert_eq!(va.number_of_colors, 216);
        assert!(va.accepts_series("TLM"));

        let va = ViewAttributes {
            chart_series: "JNC".to_string(),
            ..Default::default()
        };
        assert!(va.accepts_series("jnc"));
        assert!(!va.accepts_series("ONC"));
    }
}
