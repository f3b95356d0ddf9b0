//! Dashboard Summary Module
//! One full pipeline evaluation bundled for the presentation layer.

use std::collections::HashMap;

use crate::config::DashboardConfig;
use crate::data::{columns, Catalog, MapPoint};
use crate::stats::aggregator::{self, AggregateError, StrongestEvent};

pub const STATUS_VERIFIED: &str = "VERIFICADO";
pub const STATUS_REVIEWED: &str = "REVISADO";

/// Every aggregate the dashboard renders, computed in one pass over the
/// catalog. The record grid is projected separately via
/// [`Catalog::records`] since it pages over the full table.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total: usize,
    pub verified: u32,
    pub reviewed: u32,
    pub status_counts: HashMap<String, u32>,
    pub modal_state: String,
    pub modal_locality: String,
    pub modal_weekday: String,
    pub modal_year: i32,
    pub strongest: StrongestEvent,
    pub yearly: Vec<(i32, u32)>,
    pub state_yearly: Vec<(i32, u32)>,
    pub monthly: Vec<(u32, u32)>,
    pub top_states: Vec<(String, u32)>,
    pub top_localities: Vec<(String, u32)>,
    pub map_points: Vec<MapPoint>,
}

impl DashboardSummary {
    /// Evaluate the whole aggregation pipeline. Pure function of the
    /// catalog and the configuration; no caching, no hidden state.
    pub fn build(
        catalog: &Catalog,
        config: &DashboardConfig,
    ) -> Result<Self, AggregateError> {
        let status_counts = aggregator::status_counts(catalog)?;
        let verified = aggregator::status_count(&status_counts, STATUS_VERIFIED);
        let reviewed = aggregator::status_count(&status_counts, STATUS_REVIEWED);

        Ok(Self {
            total: aggregator::total_count(catalog),
            verified,
            reviewed,
            status_counts,
            modal_state: aggregator::modal_text(catalog, columns::ESTADO)?,
            modal_locality: aggregator::modal_text(catalog, columns::LOCALIDAD)?,
            modal_weekday: aggregator::modal_text(catalog, columns::DIA_SEMANA)?,
            modal_year: aggregator::modal_year(catalog)?,
            strongest: aggregator::magnitude_extremum(catalog)?,
            yearly: aggregator::yearly_series(catalog)?,
            state_yearly: aggregator::state_yearly_series(catalog, &config.reference_state)?,
            monthly: aggregator::monthly_series(catalog, config.reference_year)?,
            top_states: aggregator::top_frequencies(
                catalog,
                columns::ESTADO,
                config.top_states,
            )?,
            top_localities: aggregator::top_frequencies(
                catalog,
                columns::LOCALIDAD,
                config.top_localities,
            )?,
            map_points: catalog.map_points(config.map_tail)?,
        })
    }
}
