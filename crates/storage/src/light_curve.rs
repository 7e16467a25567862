//! Light-Curve Table Reader
//!
//! Reads a CSV table with a required `flux` column and an optional `flux_err`
//! column. Other columns (`time`, quality flags, ...) are ignored.

use crate::StorageError;
use feature_engine::LightCurveSample;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

const FLUX_COLUMN: &str = "flux";
const FLUX_ERR_COLUMN: &str = "flux_err";

/// Conventional location of a star's light curve inside a data directory
pub fn light_curve_path(dir: &Path, kepid: u64) -> PathBuf {
    dir.join(format!("kepler_{}_lightcurve.csv", kepid))
}

/// Read a light curve from a CSV file
pub fn read_light_curve_file(path: &Path) -> Result<LightCurveSample, StorageError> {
    debug!("Reading light curve from {}", path.display());
    read_light_curve(File::open(path)?)
}

/// Read a light curve from any CSV source
pub fn read_light_curve<R: Read>(reader: R) -> Result<LightCurveSample, StorageError> {
    let mut rdr = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let flux_idx = headers
        .iter()
        .position(|h| h == FLUX_COLUMN)
        .ok_or(StorageError::MissingColumn(FLUX_COLUMN))?;
    let flux_err_idx = headers.iter().position(|h| h == FLUX_ERR_COLUMN);

    let mut flux = Vec::new();
    let mut flux_err = flux_err_idx.map(|_| Vec::new());

    for record in rdr.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        flux.push(parse_cell(record.get(flux_idx), line, FLUX_COLUMN)?);
        if let (Some(idx), Some(errs)) = (flux_err_idx, flux_err.as_mut()) {
            errs.push(parse_cell(record.get(idx), line, FLUX_ERR_COLUMN)?);
        }
    }

    debug!("Read {} light curve samples", flux.len());
    Ok(LightCurveSample::new(flux, flux_err)?)
}

/// Empty cells read as `NaN`, matching how the training tables were loaded
fn parse_cell(cell: Option<&str>, line: u64, column: &'static str) -> Result<f64, StorageError> {
    match cell {
        None | Some("") => Ok(f64::NAN),
        Some(text) => text.parse().map_err(|_| StorageError::InvalidValue {
            line,
            column,
            value: text.to_string(),
        }),
    }
}
