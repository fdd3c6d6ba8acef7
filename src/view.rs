//! Static dashboard layout
//!
//! Describes the page once at startup: the launch site dropdown, the payload
//! range slider and the two chart slots. The frontend renders controls from
//! this description; nothing here changes after construction.

use serde::Serialize;

use crate::aggregate::PayloadRange;
use crate::binder::{ChartId, Control};
use crate::dataset::{ALL_SITES, LaunchDataset};

pub const PAGE_TITLE: &str = "SpaceX Launch Dashboard";

/// Marks are only emitted when the slider has at most this many steps
const MAX_SLIDER_MARKS: usize = 50;

/// How the payload slider's bounds are chosen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliderBounds {
    /// Fixed bounds regardless of the data
    Fixed { min: f64, max: f64 },
    /// Observed payload extent, rounded outward to the step
    Dataset,
}

/// Payload slider settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSettings {
    pub bounds: SliderBounds,
    pub step: f64,
}

impl Default for SliderSettings {
    fn default() -> Self {
        Self {
            bounds: SliderBounds::Fixed {
                min: 0.0,
                max: 10000.0,
            },
            step: 1000.0,
        }
    }
}

/// Single-choice dropdown control
#[derive(Debug, Clone, Serialize)]
pub struct Dropdown {
    pub id: &'static str,
    pub options: Vec<String>,
    pub value: String,
    pub placeholder: &'static str,
    pub searchable: bool,
}

/// Two-handle range slider control
#[derive(Debug, Clone, Serialize)]
pub struct RangeSlider {
    pub id: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    /// Default handle positions (observed payload extent)
    pub value: PayloadRange,
    pub marks: Vec<f64>,
}

/// Placeholder region a chart is rendered into
#[derive(Debug, Clone, Serialize)]
pub struct ChartSlot {
    pub id: &'static str,
}

/// Complete page description
#[derive(Debug, Clone, Serialize)]
pub struct DashboardLayout {
    pub title: &'static str,
    pub site_dropdown: Dropdown,
    pub payload_slider: RangeSlider,
    pub pie_chart: ChartSlot,
    pub scatter_chart: ChartSlot,
}

impl DashboardLayout {
    /// Build the layout from the loaded dataset
    pub fn build(dataset: &LaunchDataset, slider: &SliderSettings) -> Self {
        let extent = dataset.payload_extent();

        let (min, max) = match slider.bounds {
            SliderBounds::Fixed { min, max } => (min, max),
            SliderBounds::Dataset => (
                (extent.min / slider.step).floor() * slider.step,
                (extent.max / slider.step).ceil() * slider.step,
            ),
        };

        Self {
            title: PAGE_TITLE,
            site_dropdown: Dropdown {
                id: Control::SiteDropdown.dom_id(),
                options: dataset.distinct_sites(),
                value: ALL_SITES.to_string(),
                placeholder: "Select a Launch Site here",
                searchable: true,
            },
            payload_slider: RangeSlider {
                id: Control::PayloadSlider.dom_id(),
                min,
                max,
                step: slider.step,
                value: extent,
                marks: slider_marks(min, max, slider.step),
            },
            pie_chart: ChartSlot {
                id: ChartId::SuccessPie.dom_id(),
            },
            scatter_chart: ChartSlot {
                id: ChartId::PayloadScatter.dom_id(),
            },
        }
    }

    /// Default slider handle positions
    pub fn default_payload(&self) -> PayloadRange {
        self.payload_slider.value
    }
}

fn slider_marks(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || min > max {
        return Vec::new();
    }
    let steps = ((max - min) / step).floor() as usize;
    if steps > MAX_SLIDER_MARKS {
        return vec![min, max];
    }
    (0..=steps).map(|i| min + step * i as f64).collect()
}
