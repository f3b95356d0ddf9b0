//! Aggregation Pipeline Module
//! Pure frequency, ranking and extremum computations over the catalog.

use chrono::Datelike;
use polars::prelude::PolarsError;
use std::collections::HashMap;
use std::hash::Hash;
use thiserror::Error;

use crate::data::{columns, parse_date, Catalog};

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Column access failed: {0}")]
    Column(#[from] PolarsError),
    #[error("Catalog is empty")]
    EmptyCatalog,
    #[error("Catalog has no parseable magnitude")]
    NoMagnitude,
    #[error("No values to rank in column '{0}'")]
    NoModalValue(String),
}

/// The record with the globally maximum coerced magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct StrongestEvent {
    pub estado: String,
    pub localidad: String,
    pub fecha: String,
    pub magnitud: f64,
}

/// Count occurrences of each value and rank them by descending count.
/// Values tied on count keep first-occurrence order, so the ranking is
/// deterministic for any input order.
fn ranked_counts<T>(values: impl IntoIterator<Item = Option<T>>) -> Vec<(T, u32)>
where
    T: Eq + Hash,
{
    let mut counts: HashMap<T, (u32, usize)> = HashMap::new();
    for (idx, value) in values.into_iter().enumerate() {
        let Some(value) = value else { continue };
        counts.entry(value).or_insert((0, idx)).0 += 1;
    }

    let mut ranked: Vec<(T, (u32, usize))> = counts.into_iter().collect();
    ranked.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
        count_b.cmp(count_a).then(first_a.cmp(first_b))
    });
    ranked
        .into_iter()
        .map(|(value, (count, _))| (value, count))
        .collect()
}

/// Number of records in the catalog.
pub fn total_count(catalog: &Catalog) -> usize {
    catalog.height()
}

/// Occurrence count per distinct `Estatus` value.
pub fn status_counts(catalog: &Catalog) -> Result<HashMap<String, u32>, AggregateError> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for status in catalog.text_values(columns::ESTATUS)?.into_iter().flatten() {
        *counts.entry(status).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Count of one status value; an absent key is zero, never an error.
pub fn status_count(counts: &HashMap<String, u32>, status: &str) -> u32 {
    counts.get(status).copied().unwrap_or(0)
}

/// Most frequent value of a text column. Ties go to the value whose first
/// occurrence appears earliest in catalog order.
pub fn modal_text(catalog: &Catalog, column: &str) -> Result<String, AggregateError> {
    ranked_counts(catalog.text_values(column)?)
        .into_iter()
        .next()
        .map(|(value, _)| value)
        .ok_or_else(|| AggregateError::NoModalValue(column.to_string()))
}

/// Most frequent `Año` value, same tie-break as `modal_text`.
pub fn modal_year(catalog: &Catalog) -> Result<i32, AggregateError> {
    ranked_counts(catalog.year_values()?)
        .into_iter()
        .next()
        .map(|(year, _)| year)
        .ok_or_else(|| AggregateError::NoModalValue(columns::ANIO.to_string()))
}

/// Distinct values of a text column ranked by descending count, truncated
/// to `k` entries.
pub fn top_frequencies(
    catalog: &Catalog,
    column: &str,
    k: usize,
) -> Result<Vec<(String, u32)>, AggregateError> {
    let mut ranked = ranked_counts(catalog.text_values(column)?);
    ranked.truncate(k);
    Ok(ranked)
}

/// The record with the maximum coerced magnitude; the earliest row wins
/// ties. Rows without a parseable magnitude are never selected.
pub fn magnitude_extremum(catalog: &Catalog) -> Result<StrongestEvent, AggregateError> {
    if catalog.height() == 0 {
        return Err(AggregateError::EmptyCatalog);
    }

    let mut best: Option<(usize, f64)> = None;
    for (idx, magnitude) in catalog.magnitudes()?.into_iter().enumerate() {
        let Some(magnitude) = magnitude else { continue };
        // strictly greater keeps the earliest row on ties
        if best.map_or(true, |(_, current)| magnitude > current) {
            best = Some((idx, magnitude));
        }
    }
    let (idx, magnitud) = best.ok_or(AggregateError::NoMagnitude)?;

    Ok(StrongestEvent {
        estado: catalog.text_at(columns::ESTADO, idx)?.unwrap_or_default(),
        localidad: catalog
            .text_at(columns::LOCALIDAD, idx)?
            .unwrap_or_default(),
        fecha: catalog.text_at(columns::FECHA, idx)?.unwrap_or_default(),
        magnitud,
    })
}

/// Record count per `Año`, ascending by year.
pub fn yearly_series(catalog: &Catalog) -> Result<Vec<(i32, u32)>, AggregateError> {
    let mut counts: HashMap<i32, u32> = HashMap::new();
    for year in catalog.year_values()?.into_iter().flatten() {
        *counts.entry(year).or_insert(0) += 1;
    }
    Ok(sorted_series(counts))
}

/// Record count per calendar year parsed from `Fecha`, restricted to one
/// state, ascending by year.
pub fn state_yearly_series(
    catalog: &Catalog,
    state: &str,
) -> Result<Vec<(i32, u32)>, AggregateError> {
    let states = catalog.text_values(columns::ESTADO)?;
    let dates = catalog.text_values(columns::FECHA)?;

    let mut counts: HashMap<i32, u32> = HashMap::new();
    for (row_state, date) in states.iter().zip(&dates) {
        if row_state.as_deref() != Some(state) {
            continue;
        }
        if let Some(parsed) = date.as_deref().and_then(parse_date) {
            *counts.entry(parsed.year()).or_insert(0) += 1;
        }
    }
    Ok(sorted_series(counts))
}

/// Record count per calendar month parsed from `Fecha`, restricted to one
/// `Año`, ascending by month.
pub fn monthly_series(catalog: &Catalog, year: i32) -> Result<Vec<(u32, u32)>, AggregateError> {
    let years = catalog.year_values()?;
    let dates = catalog.text_values(columns::FECHA)?;

    let mut counts: HashMap<u32, u32> = HashMap::new();
    for (row_year, date) in years.iter().zip(&dates) {
        if *row_year != Some(year) {
            continue;
        }
        if let Some(parsed) = date.as_deref().and_then(parse_date) {
            *counts.entry(parsed.month()).or_insert(0) += 1;
        }
    }
    Ok(sorted_series(counts))
}

fn sorted_series<K: Ord + Copy>(counts: HashMap<K, u32>) -> Vec<(K, u32)> {
    let mut series: Vec<(K, u32)> = counts.into_iter().collect();
    series.sort_by_key(|(period, _)| *period);
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_catalog;
    use polars::prelude::*;

    fn catalog_with_columns(cols: Vec<Column>) -> Catalog {
        Catalog::new(DataFrame::new(cols).unwrap())
    }

    #[test]
    fn total_count_is_the_catalog_height() {
        let catalog = sample_catalog();
        assert_eq!(total_count(&catalog), 4);
    }

    #[test]
    fn status_counts_sum_to_the_total() {
        let catalog = sample_catalog();
        let counts = status_counts(&catalog).unwrap();
        assert_eq!(counts.values().sum::<u32>() as usize, total_count(&catalog));
        assert_eq!(status_count(&counts, "VERIFICADO"), 3);
        assert_eq!(status_count(&counts, "REVISADO"), 1);
    }

    #[test]
    fn absent_status_key_reads_as_zero() {
        let catalog = sample_catalog();
        let counts = status_counts(&catalog).unwrap();
        assert_eq!(status_count(&counts, "PENDIENTE"), 0);
    }

    #[test]
    fn modal_state_is_the_most_frequent() {
        let catalog = sample_catalog();
        assert_eq!(modal_text(&catalog, columns::ESTADO).unwrap(), "OAX");
        assert_eq!(
            modal_text(&catalog, columns::DIA_SEMANA).unwrap(),
            "Viernes"
        );
    }

    #[test]
    fn modal_tie_breaks_on_first_occurrence() {
        let catalog = catalog_with_columns(vec![Column::new(
            columns::ESTADO.into(),
            vec!["GRO", "OAX", "OAX", "GRO", "CHIS"],
        )]);
        // GRO and OAX both count 2; GRO appears first in row order.
        assert_eq!(modal_text(&catalog, columns::ESTADO).unwrap(), "GRO");
    }

    #[test]
    fn modal_of_an_all_null_column_is_an_error() {
        let catalog = catalog_with_columns(vec![Column::new(
            columns::ESTADO.into(),
            vec![None::<&str>, None, None],
        )]);
        assert!(matches!(
            modal_text(&catalog, columns::ESTADO),
            Err(AggregateError::NoModalValue(_))
        ));
    }

    #[test]
    fn modal_year_counts_the_year_column() {
        let catalog = sample_catalog();
        // 2023 and 2024 both count 2; 2023 occurs first.
        assert_eq!(modal_year(&catalog).unwrap(), 2023);
    }

    #[test]
    fn top_frequencies_rank_descending_and_truncate() {
        let catalog = catalog_with_columns(vec![Column::new(
            columns::ESTADO.into(),
            vec!["OAX", "OAX", "OAX", "CHIS", "CHIS", "GRO", "JAL"],
        )]);

        let top = top_frequencies(&catalog, columns::ESTADO, 3).unwrap();
        assert_eq!(
            top,
            vec![
                ("OAX".to_string(), 3),
                ("CHIS".to_string(), 2),
                ("GRO".to_string(), 1),
            ]
        );
        for pair in top.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn top_frequencies_with_k_above_cardinality_returns_everything() {
        let catalog = sample_catalog();
        let top = top_frequencies(&catalog, columns::LOCALIDAD, 50).unwrap();
        assert_eq!(top.len(), 4);
    }

    #[test]
    fn extremum_picks_the_maximum_magnitude() {
        let catalog = sample_catalog();
        let strongest = magnitude_extremum(&catalog).unwrap();
        assert_eq!(strongest.magnitud, 7.1);
        assert_eq!(strongest.estado, "OAX");
        assert_eq!(strongest.localidad, "Pinotepa");
        assert_eq!(strongest.fecha, "2024-03-15");
    }

    #[test]
    fn extremum_never_selects_an_unparseable_magnitude() {
        let catalog = catalog_with_columns(vec![
            Column::new(columns::FECHA.into(), vec!["2020-01-01", "2020-01-02"]),
            Column::new(columns::ESTADO.into(), vec!["OAX", "CHIS"]),
            Column::new(columns::LOCALIDAD.into(), vec!["A", "B"]),
            Column::new(columns::MAGNITUD.into(), vec!["8.9e999", "2.0"]),
        ]);
        // The first cell parses to infinity, which coerces to missing.
        let strongest = magnitude_extremum(&catalog).unwrap();
        assert_eq!(strongest.magnitud, 2.0);
        assert_eq!(strongest.estado, "CHIS");
    }

    #[test]
    fn extremum_tie_keeps_the_earliest_row() {
        let catalog = catalog_with_columns(vec![
            Column::new(columns::FECHA.into(), vec!["2020-01-01", "2020-01-02"]),
            Column::new(columns::ESTADO.into(), vec!["OAX", "CHIS"]),
            Column::new(columns::LOCALIDAD.into(), vec!["A", "B"]),
            Column::new(columns::MAGNITUD.into(), vec!["5.0", "5.0"]),
        ]);
        assert_eq!(magnitude_extremum(&catalog).unwrap().estado, "OAX");
    }

    #[test]
    fn extremum_on_empty_catalog_fails_fast() {
        let catalog = catalog_with_columns(vec![Column::new(
            columns::MAGNITUD.into(),
            Vec::<String>::new(),
        )]);
        assert!(matches!(
            magnitude_extremum(&catalog),
            Err(AggregateError::EmptyCatalog)
        ));
    }

    #[test]
    fn extremum_without_parseable_magnitudes_fails_fast() {
        let catalog = catalog_with_columns(vec![Column::new(
            columns::MAGNITUD.into(),
            vec!["no calculable", "n/a"],
        )]);
        assert!(matches!(
            magnitude_extremum(&catalog),
            Err(AggregateError::NoMagnitude)
        ));
    }

    #[test]
    fn yearly_series_is_ascending_and_sums_to_total() {
        let catalog = sample_catalog();
        let series = yearly_series(&catalog).unwrap();
        assert_eq!(series, vec![(2023, 2), (2024, 2)]);
        assert_eq!(
            series.iter().map(|(_, n)| *n).sum::<u32>() as usize,
            total_count(&catalog)
        );
    }

    #[test]
    fn state_yearly_series_filters_and_groups_by_date_year() {
        let catalog = sample_catalog();
        let series = state_yearly_series(&catalog, "OAX").unwrap();
        assert_eq!(series, vec![(2023, 1), (2024, 1)]);
        assert!(state_yearly_series(&catalog, "BCS").unwrap().is_empty());
    }

    #[test]
    fn monthly_series_filters_one_year_and_groups_by_month() {
        let catalog = sample_catalog();
        let series = monthly_series(&catalog, 2024).unwrap();
        assert_eq!(series, vec![(3, 1), (4, 1)]);
        assert!(monthly_series(&catalog, 1900).unwrap().is_empty());
    }

    #[test]
    fn pipeline_is_idempotent_over_an_immutable_catalog() {
        let catalog = sample_catalog();
        assert_eq!(
            yearly_series(&catalog).unwrap(),
            yearly_series(&catalog).unwrap()
        );
        assert_eq!(
            status_counts(&catalog).unwrap(),
            status_counts(&catalog).unwrap()
        );
        assert_eq!(
            top_frequencies(&catalog, columns::ESTADO, 7).unwrap(),
            top_frequencies(&catalog, columns::ESTADO, 7).unwrap()
        );
        assert_eq!(
            magnitude_extremum(&catalog).unwrap(),
            magnitude_extremum(&catalog).unwrap()
        );
    }
}
