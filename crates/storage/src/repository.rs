//! Catalog Repository Implementation

use crate::StorageError;
use feature_engine::CatalogRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// Columns every catalog row must provide
const REQUIRED_COLUMNS: [&str; 3] = ["kepid", "koi_disposition", "koi_prad"];

/// Read-only, in-memory KOI catalog keyed by `kepid`
#[derive(Debug, Default)]
pub struct CatalogRepository {
    /// Records in file order
    records: Vec<CatalogRecord>,
    /// kepid -> index of its first record
    index: HashMap<u64, usize>,
}

impl CatalogRepository {
    /// Build a repository from already-loaded records; the first record per kepid wins
    pub fn from_records(records: impl IntoIterator<Item = CatalogRecord>) -> Self {
        let mut repository = Self::default();
        for record in records {
            repository.insert(record);
        }
        repository
    }

    /// Load the NASA cumulative KOI table (`#` lines are comments)
    pub fn from_path(path: &Path) -> Result<Self, StorageError> {
        info!("Loading KOI catalog from {}", path.display());
        Self::from_reader(File::open(path)?)
    }

    /// Load a KOI table from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, StorageError> {
        let mut rdr = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(StorageError::MissingColumn(column));
            }
        }

        let mut repository = Self::default();
        let mut skipped = 0usize;
        for row in rdr.deserialize::<CatalogRecord>() {
            match row {
                Ok(record) => repository.insert(record),
                Err(e) => {
                    skipped += 1;
                    debug!("Skipping malformed catalog row: {}", e);
                }
            }
        }

        if skipped > 0 {
            warn!("Skipped {} malformed catalog rows", skipped);
        }
        info!("Loaded {} catalog records", repository.len());
        Ok(repository)
    }

    fn insert(&mut self, record: CatalogRecord) {
        if self.index.contains_key(&record.kepid) {
            debug!("Duplicate kepid {} ignored", record.kepid);
            return;
        }
        self.index.insert(record.kepid, self.records.len());
        self.records.push(record);
    }

    /// Look up a record by kepid
    pub fn get(&self, kepid: u64) -> Option<&CatalogRecord> {
        self.index.get(&kepid).map(|&i| &self.records[i])
    }

    /// All records in file order
    pub fn records(&self) -> impl Iterator<Item = &CatalogRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::Disposition;
    use std::io::Write;

    const KOI_TABLE: &str = "\
# This file was produced by the NASA Exoplanet Archive
# COLUMN kepid: KepID
kepid,kepoi_name,koi_disposition,koi_period,koi_prad,koi_teq,koi_srad
10797460,K00752.01,CONFIRMED,9.488,2.26,793,0.927
10811496,K00753.01,CANDIDATE,19.899,2.0,,0.9
10848459,K00754.01,FALSE POSITIVE,1.737,33.46,1395,0.791
10811496,K00753.02,CONFIRMED,1.0,9.9,100,1.0
";

    #[test]
    fn test_load_koi_table() {
        let repository = CatalogRepository::from_reader(KOI_TABLE.as_bytes()).unwrap();
        assert_eq!(repository.len(), 3);

        let record = repository.get(10811496).unwrap();
        assert_eq!(record.disposition, Disposition::Candidate);
        assert_eq!(record.planet_radius, Some(2.0));
        assert_eq!(record.equilibrium_temperature, None);
        assert_eq!(record.stellar_radius, Some(0.9));
        assert_eq!(record.semi_major_axis, None);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let repository = CatalogRepository::from_reader(KOI_TABLE.as_bytes()).unwrap();
        assert_eq!(repository.get(10811496).unwrap().planet_radius, Some(2.0));
    }

    #[test]
    fn test_unknown_kepid() {
        let repository = CatalogRepository::from_reader(KOI_TABLE.as_bytes()).unwrap();
        assert!(repository.get(1).is_none());
    }

    #[test]
    fn test_semi_major_axis_column_read_when_present() {
        let table = "kepid,koi_disposition,koi_sma,koi_prad,koi_srad\n42,CONFIRMED,0.0853,1.1,0.8\n";
        let repository = CatalogRepository::from_reader(table.as_bytes()).unwrap();
        assert_eq!(repository.get(42).unwrap().semi_major_axis, Some(0.0853));
    }

    #[test]
    fn test_missing_disposition_column() {
        let table = "kepid,koi_prad\n1,2.0\n";
        assert!(matches!(
            CatalogRepository::from_reader(table.as_bytes()),
            Err(StorageError::MissingColumn("koi_disposition"))
        ));
    }

    #[test]
    fn test_missing_planet_radius_column() {
        let table = "kepid,koi_disposition,koi_srad\n42,CANDIDATE,0.9\n";
        assert!(matches!(
            CatalogRepository::from_reader(table.as_bytes()),
            Err(StorageError::MissingColumn("koi_prad"))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(KOI_TABLE.as_bytes()).unwrap();
        let repository = CatalogRepository::from_path(file.path()).unwrap();
        assert_eq!(repository.records().count(), 3);
    }
}
