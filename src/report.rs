//! Dashboard Report Module
//! Renders the summary and record grid as a plain-text dashboard.

use std::fmt::Write;

use crate::config::DashboardConfig;
use crate::data::CatalogRecord;
use crate::format::format_abbreviated;
use crate::stats::DashboardSummary;

/// How many rows of the record grid the report previews.
const GRID_PREVIEW_ROWS: usize = 10;

/// Render the full dashboard report. Pure string assembly; the caller
/// decides where it goes.
pub fn render(
    summary: &DashboardSummary,
    records: &[CatalogRecord],
    config: &DashboardConfig,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Sismos: Mexico (1925 - 2025)");
    let _ = writeln!(out, "============================");
    let _ = writeln!(out);

    let _ = writeln!(out, "Estadisticas generales");
    metric(
        &mut out,
        "No. total de sismos",
        format_abbreviated(summary.total as u64),
    );
    metric(
        &mut out,
        "Verificados",
        format_abbreviated(u64::from(summary.verified)),
    );
    metric(
        &mut out,
        "Revisados",
        format_abbreviated(u64::from(summary.reviewed)),
    );
    metric(&mut out, "Estado mas activo", &summary.modal_state);
    metric(&mut out, "Localidad mas activa", &summary.modal_locality);
    metric(&mut out, "Dia mas activo", &summary.modal_weekday);
    metric(&mut out, "Año de mayor actividad", summary.modal_year);
    metric(
        &mut out,
        "Mayor magnitud",
        format!(
            "{} ({}, {}, {})",
            summary.strongest.magnitud,
            summary.strongest.estado,
            summary.strongest.localidad,
            summary.strongest.fecha
        ),
    );
    let _ = writeln!(out);

    ranking_section(&mut out, "Top estados", &summary.top_states);
    ranking_section(&mut out, "Top localidades", &summary.top_localities);

    series_section(&mut out, "Actividad por año", &summary.yearly);
    series_section(
        &mut out,
        &format!("Actividad en {} por año", config.reference_state),
        &summary.state_yearly,
    );
    series_section(
        &mut out,
        &format!("Actividad en {} por mes", config.reference_year),
        &summary.monthly,
    );

    let _ = writeln!(
        out,
        "Mapa: {} puntos (ultimos {} eventos)",
        summary.map_points.len(),
        config.map_tail
    );
    if let Some(extent) = map_extent(summary) {
        let _ = writeln!(
            out,
            "  lat {:.2} a {:.2}, lon {:.2} a {:.2}",
            extent.0, extent.1, extent.2, extent.3
        );
    }
    let _ = writeln!(out);

    grid_section(&mut out, records);
    out
}

fn metric(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "  {label:<22} {value}");
}

fn ranking_section(out: &mut String, title: &str, table: &[(String, u32)]) {
    let _ = writeln!(out, "{title}");
    for (rank, (value, count)) in table.iter().enumerate() {
        let _ = writeln!(out, "  {}. {:<24} {}", rank + 1, value, count);
    }
    let _ = writeln!(out);
}

fn series_section<P: std::fmt::Display + Copy>(
    out: &mut String,
    title: &str,
    series: &[(P, u32)],
) {
    let _ = write!(out, "{title}: ");
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => {
            // first max wins, matching the pipeline's tie rule
            let peak = series
                .iter()
                .fold(first, |best, entry| if entry.1 > best.1 { entry } else { best });
            let _ = writeln!(
                out,
                "{} periodos ({} a {}), pico {} con {} sismos",
                series.len(),
                first.0,
                last.0,
                peak.0,
                peak.1
            );
        }
        _ => {
            let _ = writeln!(out, "sin datos");
        }
    }
    let _ = writeln!(out);
}

fn map_extent(summary: &DashboardSummary) -> Option<(f64, f64, f64, f64)> {
    let first = summary.map_points.first()?;
    let mut extent = (first.lat, first.lat, first.lon, first.lon);
    for point in &summary.map_points {
        extent.0 = extent.0.min(point.lat);
        extent.1 = extent.1.max(point.lat);
        extent.2 = extent.2.min(point.lon);
        extent.3 = extent.3.max(point.lon);
    }
    Some(extent)
}

fn grid_section(out: &mut String, records: &[CatalogRecord]) {
    let _ = writeln!(out, "Registro historico ({} filas)", records.len());
    let _ = writeln!(
        out,
        "  {:<12} {:<6} {:<20} {:>8} {:<4} {:>5} {:>6}  {}",
        "Fecha", "Estado", "Localidad", "Dist KM", "Dir", "Mag", "Prof", "Estatus"
    );
    for record in records.iter().take(GRID_PREVIEW_ROWS) {
        let _ = writeln!(
            out,
            "  {:<12} {:<6} {:<20} {:>8} {:<4} {:>5} {:>6}  {}",
            record.fecha,
            record.estado,
            record.localidad,
            opt_num(record.distancia_km),
            record.direccion_cardinal,
            opt_num(record.magnitud),
            opt_num(record.profundidad),
            record.estatus
        );
    }
    if records.len() > GRID_PREVIEW_ROWS {
        let _ = writeln!(out, "  ... {} filas mas", records.len() - GRID_PREVIEW_ROWS);
    }
}

fn opt_num(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_catalog;

    #[test]
    fn report_carries_metrics_tables_and_grid() {
        let catalog = sample_catalog();
        let config = DashboardConfig::default();
        let summary = DashboardSummary::build(&catalog, &config).unwrap();
        let records = catalog.records().unwrap();

        let report = render(&summary, &records, &config);
        assert!(report.contains(&format!("{:<22} {}", "No. total de sismos", "0 K")));
        assert!(report.contains(&format!("{:<22} {}", "Estado mas activo", "OAX")));
        assert!(report.contains(&format!(
            "{:<22} {}",
            "Mayor magnitud", "7.1 (OAX, Pinotepa, 2024-03-15)"
        )));
        assert!(report.contains("Top estados"));
        assert!(report.contains("1. OAX"));
        assert!(report.contains("Registro historico (4 filas)"));
        assert!(report.contains("Crucecita"));
    }

    #[test]
    fn empty_series_render_without_panicking() {
        let mut out = String::new();
        series_section::<i32>(&mut out, "Serie vacia", &[]);
        assert!(out.contains("sin datos"));
    }
}
