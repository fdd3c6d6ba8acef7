//! Reactive wiring between controls and charts
//!
//! Each chart is bound to the set of controls it depends on through an
//! explicit dependency table. A control change updates the session's
//! [`Selection`] and recomputes exactly the charts bound to that control;
//! every recomputation is a pure function of the dataset and the selection.
//!
//! ```text
//! site-dropdown  ──┬──> success-pie-chart
//!                  └──> success-payload-scatter-chart
//! payload-slider ─────> success-payload-scatter-chart
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{
    PayloadRange, SiteFilter, filter_for_scatter, outcome_counts_for_site, success_counts_by_site,
};
use crate::dataset::{COL_BOOSTER_CATEGORY, COL_CLASS, COL_LAUNCH_SITE, COL_PAYLOAD_MASS};
use crate::dataset::{LaunchDataset, Outcome};
use crate::view::DashboardLayout;

/// Input controls on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    SiteDropdown,
    PayloadSlider,
}

impl Control {
    pub fn dom_id(&self) -> &'static str {
        match self {
            Control::SiteDropdown => "site-dropdown",
            Control::PayloadSlider => "payload-slider",
        }
    }
}

/// Output chart regions on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ChartId {
    #[serde(rename = "success-pie-chart")]
    SuccessPie,
    #[serde(rename = "success-payload-scatter-chart")]
    PayloadScatter,
}

impl ChartId {
    pub fn dom_id(&self) -> &'static str {
        match self {
            ChartId::SuccessPie => "success-pie-chart",
            ChartId::PayloadScatter => "success-payload-scatter-chart",
        }
    }
}

/// Which controls each chart is recomputed on
pub const BINDINGS: &[(ChartId, &[Control])] = &[
    (ChartId::SuccessPie, &[Control::SiteDropdown]),
    (
        ChartId::PayloadScatter,
        &[Control::SiteDropdown, Control::PayloadSlider],
    ),
];

/// Charts that must be recomputed when `control` changes, in table order
pub fn charts_affected_by(control: Control) -> Vec<ChartId> {
    BINDINGS
        .iter()
        .filter(|(_, inputs)| inputs.contains(&control))
        .map(|(chart, _)| *chart)
        .collect()
}

/// Current control values for one session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub site: SiteFilter,
    pub payload: PayloadRange,
}

impl Selection {
    /// Initial selection: all sites, observed payload extent
    pub fn from_layout(layout: &DashboardLayout) -> Self {
        Self {
            site: SiteFilter::All,
            payload: layout.default_payload(),
        }
    }
}

/// A single UI change event
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "control", content = "value")]
pub enum ControlEvent {
    #[serde(rename = "site-dropdown")]
    SiteChanged(SiteFilter),
    #[serde(rename = "payload-slider")]
    PayloadChanged(PayloadRange),
}

impl ControlEvent {
    pub fn control(&self) -> Control {
        match self {
            ControlEvent::SiteChanged(_) => Control::SiteDropdown,
            ControlEvent::PayloadChanged(_) => Control::PayloadSlider,
        }
    }
}

/// One slice of the pie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
}

/// Render-ready pie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieFigure {
    pub title: String,
    /// Column the slices are named by
    pub category: &'static str,
    pub slices: Vec<PieSlice>,
}

/// One launch plotted on the scatter chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub class: Outcome,
    pub booster_version_category: String,
    pub booster_version: String,
    pub launch_site: String,
}

/// Render-ready scatter chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterFigure {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub color_label: &'static str,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Figure {
    Pie(PieFigure),
    Scatter(ScatterFigure),
}

/// New figure for one chart region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartUpdate {
    pub chart: ChartId,
    pub figure: Figure,
}

/// Pie chart: success counts per site, or success/failure split for one site
pub fn pie_figure(dataset: &LaunchDataset, site: &SiteFilter) -> PieFigure {
    match site {
        SiteFilter::All => PieFigure {
            title: "Total Success Launches By Site".to_string(),
            category: COL_LAUNCH_SITE,
            slices: success_counts_by_site(dataset.records())
                .into_iter()
                .map(|(label, count)| PieSlice { label, count })
                .collect(),
        },
        SiteFilter::Site(name) => PieFigure {
            title: format!("Success Launches for {}", name),
            category: COL_CLASS,
            slices: outcome_counts_for_site(dataset.records(), name)
                .into_iter()
                .map(|(outcome, count)| PieSlice {
                    label: outcome.to_string(),
                    count,
                })
                .collect(),
        },
    }
}

/// Scatter chart: payload mass vs outcome for the selected site and range
pub fn scatter_figure(dataset: &LaunchDataset, selection: &Selection) -> ScatterFigure {
    let title = match &selection.site {
        SiteFilter::All => "Correlation between Payload and Success for all Sites".to_string(),
        SiteFilter::Site(name) => format!("Correlation between Payload and Success for {}", name),
    };

    let points = filter_for_scatter(dataset.records(), &selection.site, selection.payload)
        .into_iter()
        .map(|r| ScatterPoint {
            payload_mass_kg: r.payload_mass_kg,
            class: r.outcome,
            booster_version_category: r.booster_version_category.clone(),
            booster_version: r.booster_version.clone(),
            launch_site: r.launch_site.clone(),
        })
        .collect();

    ScatterFigure {
        title,
        x_label: COL_PAYLOAD_MASS,
        y_label: COL_CLASS,
        color_label: COL_BOOSTER_CATEGORY,
        points,
    }
}

/// Recompute a single chart for a selection
pub fn render_chart(dataset: &LaunchDataset, selection: &Selection, chart: ChartId) -> ChartUpdate {
    let figure = match chart {
        ChartId::SuccessPie => Figure::Pie(pie_figure(dataset, &selection.site)),
        ChartId::PayloadScatter => Figure::Scatter(scatter_figure(dataset, selection)),
    };
    ChartUpdate { chart, figure }
}

/// Per-user reactive state: the current selection
#[derive(Debug, Clone)]
pub struct Session {
    selection: Selection,
}

impl Session {
    pub fn new(layout: &DashboardLayout) -> Self {
        Self {
            selection: Selection::from_layout(layout),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Render every chart (initial page load)
    pub fn render_all(&self, dataset: &LaunchDataset) -> Vec<ChartUpdate> {
        BINDINGS
            .iter()
            .map(|(chart, _)| render_chart(dataset, &self.selection, *chart))
            .collect()
    }

    /// Apply a control change and recompute the charts bound to it
    pub fn handle(&mut self, dataset: &LaunchDataset, event: ControlEvent) -> Vec<ChartUpdate> {
        let control = event.control();
        match event {
            ControlEvent::SiteChanged(site) => self.selection.site = site,
            ControlEvent::PayloadChanged(range) => self.selection.payload = range,
        }

        let charts = charts_affected_by(control);
        debug!(
            control = control.dom_id(),
            site = %self.selection.site,
            payload = %self.selection.payload,
            charts = charts.len(),
            "recomputing charts"
        );

        charts
            .into_iter()
            .map(|chart| render_chart(dataset, &self.selection, chart))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::LaunchRecord;
    use crate::view::SliderSettings;

    fn record(site: &str, payload: f64, outcome: Outcome, category: &str) -> LaunchRecord {
        LaunchRecord {
            launch_site: site.to_string(),
            booster_version: format!("F9 {category}"),
            booster_version_category: category.to_string(),
            payload_mass_kg: payload,
            outcome,
        }
    }

    fn dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            record("A", 500.0, Outcome::Success, "v1.0"),
            record("A", 1500.0, Outcome::Failure, "v1.1"),
            record("B", 3000.0, Outcome::Success, "FT"),
        ])
        .unwrap()
    }

    fn session(dataset: &LaunchDataset) -> Session {
        Session::new(&DashboardLayout::build(dataset, &SliderSettings::default()))
    }

    fn pie(update: &ChartUpdate) -> &PieFigure {
        match &update.figure {
            Figure::Pie(p) => p,
            other => panic!("expected pie, got {:?}", other),
        }
    }

    fn scatter(update: &ChartUpdate) -> &ScatterFigure {
        match &update.figure {
            Figure::Scatter(s) => s,
            other => panic!("expected scatter, got {:?}", other),
        }
    }

    #[test]
    fn test_bindings_table() {
        assert_eq!(
            charts_affected_by(Control::SiteDropdown),
            vec![ChartId::SuccessPie, ChartId::PayloadScatter]
        );
        assert_eq!(
            charts_affected_by(Control::PayloadSlider),
            vec![ChartId::PayloadScatter]
        );
    }

    #[test]
    fn test_initial_render() {
        let dataset = dataset();
        let session = session(&dataset);
        assert_eq!(session.selection().site, SiteFilter::All);
        assert_eq!(session.selection().payload, PayloadRange::new(500.0, 3000.0));

        let updates = session.render_all(&dataset);
        assert_eq!(updates.len(), 2);

        let pie = pie(&updates[0]);
        assert_eq!(pie.title, "Total Success Launches By Site");
        assert_eq!(pie.category, "Launch Site");
        assert_eq!(
            pie.slices,
            vec![
                PieSlice { label: "A".to_string(), count: 1 },
                PieSlice { label: "B".to_string(), count: 1 },
            ]
        );

        let scatter = scatter(&updates[1]);
        assert_eq!(
            scatter.title,
            "Correlation between Payload and Success for all Sites"
        );
        assert_eq!(scatter.points.len(), 3);
    }

    #[test]
    fn test_site_change_updates_both_charts() {
        let dataset = dataset();
        let mut session = session(&dataset);

        let updates = session.handle(&dataset, ControlEvent::SiteChanged(SiteFilter::parse("A")));
        assert_eq!(updates.len(), 2);

        let pie = pie(&updates[0]);
        assert_eq!(pie.title, "Success Launches for A");
        assert_eq!(pie.category, "class");
        assert_eq!(
            pie.slices,
            vec![
                PieSlice { label: "1".to_string(), count: 1 },
                PieSlice { label: "0".to_string(), count: 1 },
            ]
        );

        let scatter = scatter(&updates[1]);
        assert_eq!(scatter.title, "Correlation between Payload and Success for A");
        assert!(scatter.points.iter().all(|p| p.launch_site == "A"));
    }

    #[test]
    fn test_payload_change_updates_scatter_only() {
        let dataset = dataset();
        let mut session = session(&dataset);

        let updates = session.handle(
            &dataset,
            ControlEvent::PayloadChanged(PayloadRange::new(0.0, 1000.0)),
        );
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].chart, ChartId::PayloadScatter);

        let points = &scatter(&updates[0]).points;
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].launch_site, "A");
        assert_eq!(points[0].payload_mass_kg, 500.0);
        assert_eq!(points[0].class, Outcome::Success);
    }

    #[test]
    fn test_selection_persists_between_events() {
        let dataset = dataset();
        let mut session = session(&dataset);

        session.handle(
            &dataset,
            ControlEvent::PayloadChanged(PayloadRange::new(1000.0, 2000.0)),
        );
        let updates = session.handle(&dataset, ControlEvent::SiteChanged(SiteFilter::parse("B")));

        // B has no launch within 1000..=2000 kg
        assert!(scatter(&updates[1]).points.is_empty());
        assert_eq!(session.selection().payload, PayloadRange::new(1000.0, 2000.0));
    }

    #[test]
    fn test_inverted_range_renders_empty() {
        let dataset = dataset();
        let mut session = session(&dataset);
        let updates = session.handle(
            &dataset,
            ControlEvent::PayloadChanged(PayloadRange::new(5000.0, 0.0)),
        );
        assert!(scatter(&updates[0]).points.is_empty());
    }

    #[test]
    fn test_unknown_site_renders_empty() {
        let dataset = dataset();
        let mut session = session(&dataset);
        let updates = session.handle(
            &dataset,
            ControlEvent::SiteChanged(SiteFilter::parse("Boca Chica")),
        );
        assert!(pie(&updates[0]).slices.is_empty());
        assert!(scatter(&updates[1]).points.is_empty());
    }

    #[test]
    fn test_control_event_json() {
        let site: ControlEvent =
            serde_json::from_str(r#"{"control":"site-dropdown","value":"ALL"}"#).unwrap();
        assert_eq!(site, ControlEvent::SiteChanged(SiteFilter::All));

        let payload: ControlEvent =
            serde_json::from_str(r#"{"control":"payload-slider","value":[0,5000]}"#).unwrap();
        assert_eq!(
            payload,
            ControlEvent::PayloadChanged(PayloadRange::new(0.0, 5000.0))
        );

        assert!(serde_json::from_str::<ControlEvent>(r#"{"control":"nope","value":1}"#).is_err());
    }

    #[test]
    fn test_update_json_shape() {
        let dataset = dataset();
        let session = session(&dataset);
        let json = serde_json::to_value(session.render_all(&dataset)).unwrap();
        assert_eq!(json[0]["chart"], "success-pie-chart");
        assert_eq!(json[0]["figure"]["kind"], "pie");
        assert_eq!(json[1]["chart"], "success-payload-scatter-chart");
        assert_eq!(json[1]["figure"]["kind"], "scatter");
        assert_eq!(json[1]["figure"]["points"][0]["class"], 1);
    }
}
