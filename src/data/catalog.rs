//! Seismic Catalog Module
//! Immutable DataFrame wrapper with typed row and map projections.

use chrono::NaiveDate;
use polars::prelude::*;

/// Column names of the catalog CSV. Case- and accent-sensitive.
pub mod columns {
    pub const FECHA: &str = "Fecha";
    pub const ESTADO: &str = "Estado";
    pub const LOCALIDAD: &str = "Localidad";
    pub const DISTANCIA_KM: &str = "Distancia KM";
    pub const DIRECCION_CARDINAL: &str = "Direccion Cardinal";
    pub const MAGNITUD: &str = "Magnitud";
    pub const PROFUNDIDAD: &str = "Profundidad";
    pub const ESTATUS: &str = "Estatus";
    pub const DIA_SEMANA: &str = "Dia Semana";
    pub const ANIO: &str = "Año";
    pub const LATITUD: &str = "Latitud";
    pub const LONGITUD: &str = "Longitud";

    /// Every column a catalog must provide.
    pub const REQUIRED: [&str; 12] = [
        FECHA,
        ESTADO,
        LOCALIDAD,
        DISTANCIA_KM,
        DIRECCION_CARDINAL,
        MAGNITUD,
        PROFUNDIDAD,
        ESTATUS,
        DIA_SEMANA,
        ANIO,
        LATITUD,
        LONGITUD,
    ];
}

/// Parse a magnitude cell. Unparseable or non-finite text is "missing",
/// never an error and never zero.
pub fn parse_magnitude(text: &str) -> Option<f64> {
    let value = text.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

/// Parse a `Fecha` cell into a calendar date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%d/%m/%Y"))
        .ok()
}

/// One row of the catalog, restricted to the columns of the record grid.
/// Magnitude is the coerced numeric value, not the raw cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    pub fecha: String,
    pub estado: String,
    pub localidad: String,
    pub distancia_km: Option<f64>,
    pub direccion_cardinal: String,
    pub magnitud: Option<f64>,
    pub profundidad: Option<f64>,
    pub estatus: String,
}

/// A geographic point for the activity map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    pub lat: f64,
    pub lon: f64,
}

/// The loaded catalog. Immutable after construction; every aggregate is a
/// pure function of it.
pub struct Catalog {
    df: DataFrame,
}

impl Catalog {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    /// Number of records in the catalog.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// All values of a text column in row order, nulls as `None`.
    pub fn text_values(&self, column: &str) -> Result<Vec<Option<String>>, PolarsError> {
        let series = self.df.column(column)?.as_materialized_series();
        Ok((0..series.len())
            .map(|i| match series.get(i) {
                Ok(val) if !val.is_null() => {
                    Some(val.to_string().trim_matches('"').to_string())
                }
                _ => None,
            })
            .collect())
    }

    /// One value of a text column, null as `None`.
    pub fn text_at(&self, column: &str, idx: usize) -> Result<Option<String>, PolarsError> {
        let series = self.df.column(column)?.as_materialized_series();
        let val = series.get(idx)?;
        if val.is_null() {
            Ok(None)
        } else {
            Ok(Some(val.to_string().trim_matches('"').to_string()))
        }
    }

    /// All values of a numeric column in row order, nulls as `None`.
    /// String-typed columns are coerced cell by cell; unparseable cells
    /// become `None`.
    pub fn float_values(&self, column: &str) -> Result<Vec<Option<f64>>, PolarsError> {
        let col = self.df.column(column)?;
        let casted = col.cast(&DataType::Float64)?;
        let ca = casted.f64()?;
        Ok(ca.into_iter().collect())
    }

    /// All values of the `Año` column in row order.
    pub fn year_values(&self) -> Result<Vec<Option<i32>>, PolarsError> {
        let col = self.df.column(columns::ANIO)?;
        let casted = col.cast(&DataType::Int32)?;
        let ca = casted.i32()?;
        Ok(ca.into_iter().collect())
    }

    /// Coerced magnitudes in row order. Cells that fail to parse, and
    /// non-finite values, are `None` and never reach the extremum search.
    pub fn magnitudes(&self) -> Result<Vec<Option<f64>>, PolarsError> {
        let col = self.df.column(columns::MAGNITUD)?;
        match col.dtype() {
            DataType::String => {
                let series = col.as_materialized_series();
                Ok((0..series.len())
                    .map(|i| match series.get(i) {
                        Ok(val) if !val.is_null() => {
                            parse_magnitude(val.to_string().trim_matches('"'))
                        }
                        _ => None,
                    })
                    .collect())
            }
            _ => {
                let casted = col.cast(&DataType::Float64)?;
                let ca = casted.f64()?;
                Ok(ca
                    .into_iter()
                    .map(|v| v.filter(|m| m.is_finite()))
                    .collect())
            }
        }
    }

    /// The trailing `tail` rows projected to map points, row order kept.
    /// Rows missing either coordinate are skipped.
    pub fn map_points(&self, tail: usize) -> Result<Vec<MapPoint>, PolarsError> {
        let lat = self.float_values(columns::LATITUD)?;
        let lon = self.float_values(columns::LONGITUD)?;
        let start = self.height().saturating_sub(tail);
        Ok(lat[start..]
            .iter()
            .zip(&lon[start..])
            .filter_map(|(lat, lon)| {
                Some(MapPoint {
                    lat: (*lat)?,
                    lon: (*lon)?,
                })
            })
            .collect())
    }

    /// Row-for-row projection of the whole catalog onto the record grid
    /// columns, in catalog order.
    pub fn records(&self) -> Result<Vec<CatalogRecord>, PolarsError> {
        let fecha = self.text_values(columns::FECHA)?;
        let estado = self.text_values(columns::ESTADO)?;
        let localidad = self.text_values(columns::LOCALIDAD)?;
        let distancia_km = self.float_values(columns::DISTANCIA_KM)?;
        let direccion_cardinal = self.text_values(columns::DIRECCION_CARDINAL)?;
        let magnitud = self.magnitudes()?;
        let profundidad = self.float_values(columns::PROFUNDIDAD)?;
        let estatus = self.text_values(columns::ESTATUS)?;

        let mut records = Vec::with_capacity(self.height());
        for i in 0..self.height() {
            records.push(CatalogRecord {
                fecha: fecha[i].clone().unwrap_or_default(),
                estado: estado[i].clone().unwrap_or_default(),
                localidad: localidad[i].clone().unwrap_or_default(),
                distancia_km: distancia_km[i],
                direccion_cardinal: direccion_cardinal[i].clone().unwrap_or_default(),
                magnitud: magnitud[i],
                profundidad: profundidad[i],
                estatus: estatus[i].clone().unwrap_or_default(),
            });
        }
        Ok(records)
    }
}

/// A small four-row catalog used across the test suites.
#[cfg(test)]
pub(crate) fn sample_catalog() -> Catalog {
    let df = DataFrame::new(vec![
        Column::new(
            columns::FECHA.into(),
            vec!["2023-01-05", "2023-02-10", "2024-03-15", "2024-04-20"],
        ),
        Column::new(columns::ESTADO.into(), vec!["OAX", "CHIS", "OAX", "GRO"]),
        Column::new(
            columns::LOCALIDAD.into(),
            vec!["Crucecita", "Tonala", "Pinotepa", "Acapulco"],
        ),
        Column::new(
            columns::DISTANCIA_KM.into(),
            vec![Some(12.0), None, Some(48.0), Some(7.5)],
        ),
        Column::new(
            columns::DIRECCION_CARDINAL.into(),
            vec!["SE", "SO", "NE", "SE"],
        ),
        Column::new(columns::MAGNITUD.into(), vec!["4.5", "no calculable", "7.1", "3.9"]),
        Column::new(
            columns::PROFUNDIDAD.into(),
            vec![Some(10.0), Some(33.0), Some(16.0), Some(5.0)],
        ),
        Column::new(
            columns::ESTATUS.into(),
            vec!["VERIFICADO", "REVISADO", "VERIFICADO", "VERIFICADO"],
        ),
        Column::new(
            columns::DIA_SEMANA.into(),
            vec!["Jueves", "Viernes", "Viernes", "Sabado"],
        ),
        Column::new(columns::ANIO.into(), vec![2023i32, 2023, 2024, 2024]),
        Column::new(
            columns::LATITUD.into(),
            vec![Some(15.7), Some(16.1), Some(16.3), Some(16.8)],
        ),
        Column::new(
            columns::LONGITUD.into(),
            vec![Some(-96.1), Some(-93.7), Some(-98.0), Some(-99.9)],
        ),
    ])
    .unwrap();
    Catalog::new(df)
}
