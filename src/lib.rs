//! # spacex-launch-dash - SpaceX Launch Records Dashboard
//!
//! Loads a CSV of SpaceX launch records and serves an interactive dashboard
//! with two charts:
//!
//! 1. **Success pie chart** - successful launches per site, or the
//!    success/failure split for one selected site
//! 2. **Payload scatter chart** - payload mass against launch outcome,
//!    coloured by booster version category, filtered by site and payload range
//!
//! ## Usage
//!
//! ```bash
//! # Serve the dashboard (reads ./spacex_launch_dash.csv)
//! spacex-dash
//!
//! # Print a per-site summary instead of serving
//! spacex-dash --summary
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! CSV ──> LaunchDataset ──> DashboardLayout
//!               │                  │
//!               └──> Session (Selection) ──> ChartUpdate (pie / scatter)
//! ```
//!
//! The dataset and layout are built once and shared read-only; each browser
//! session owns its own selection.

pub mod aggregate;
pub mod binder;
pub mod config;
pub mod dataset;
pub mod report;
pub mod session;
pub mod view;
pub mod web;

pub use aggregate::{
    PayloadRange, SiteFilter, filter_for_scatter, outcome_counts_for_site, success_counts_by_site,
};
pub use binder::{
    BINDINGS, ChartId, ChartUpdate, Control, ControlEvent, Figure, PieFigure, PieSlice,
    ScatterFigure, ScatterPoint, Selection, Session, charts_affected_by, pie_figure, render_chart,
    scatter_figure,
};
pub use config::{
    BoundsMode, ConfigError, DEFAULT_DATA_PATH, DashConfig, find_config_file, load_config,
    load_config_file,
};
pub use dataset::{ALL_SITES, IngestError, LaunchDataset, LaunchRecord, Outcome};
pub use report::write_summary;
pub use session::{SessionId, SessionRegistry};
pub use view::{DashboardLayout, SliderBounds, SliderSettings};
