/*!
Pairwise transfer tables.

The inference stage writes one CSV per tested layer pair, named
`<Source>_to_<Target>.csv` with the human-readable layer names, plus a
summary CSV counting significant links per layer pair. All tables are
headerless and wider than we need; the column constants below pin the
positions this stage consumes.
*/

use std::fs;
use std::path::{Path, PathBuf};

use tenet_structures::{
    LayerMatrix, LayerScheme, LayerTag, PairwiseRecord, TenetError, TenetResult,
};

/// Transfer magnitude before surrogate correction.
pub const COL_RAW_MAGNITUDE: usize = 2;
/// Surrogate-corrected transfer magnitude.
pub const COL_CORRECTED_MAGNITUDE: usize = 3;
/// p-value of the significance test.
pub const COL_P_VALUE: usize = 4;
/// Spike count of the source unit.
pub const COL_SOURCE_SPIKES: usize = 6;
/// Spike count of the target unit.
pub const COL_TARGET_SPIKES: usize = 8;
/// Observation window length in seconds.
pub const COL_WINDOW_SECS: usize = 10;
/// Narrowest row we accept; anything shorter is corrupt.
pub const MIN_COLUMNS: usize = 11;

const SUMMARY_COL_SOURCE: usize = 0;
const SUMMARY_COL_TARGET: usize = 1;
const SUMMARY_COL_SIGNIFICANT: usize = 4;
const SUMMARY_MIN_COLUMNS: usize = 5;

/// Path of the pairwise table for one (source, target) layer pair. The
/// filenames carry the display names verbatim, spaces included.
pub fn table_path(dir: &Path, source: LayerTag, target: LayerTag) -> PathBuf {
    dir.join(format!(
        "{}_to_{}.csv",
        source.display_name(),
        target.display_name()
    ))
}

/// One parsed pairwise table with its layer-pair attribution.
#[derive(Debug, Clone)]
pub struct PairTable {
    pub source: LayerTag,
    pub target: LayerTag,
    pub path: PathBuf,
    pub records: Vec<PairwiseRecord>,
}

/// Every pairwise table found for one run, all under one scheme.
#[derive(Debug, Clone)]
pub struct PairTableSet {
    scheme: LayerScheme,
    tables: Vec<PairTable>,
}

impl PairTableSet {
    pub fn new(scheme: LayerScheme, tables: Vec<PairTable>) -> PairTableSet {
        PairTableSet { scheme, tables }
    }

    pub fn scheme(&self) -> LayerScheme {
        self.scheme
    }

    pub fn tables(&self) -> &[PairTable] {
        &self.tables
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total rows across all tables.
    pub fn record_count(&self) -> usize {
        self.tables.iter().map(|t| t.records.len()).sum()
    }
}

/// Loads every pair table the scheme admits from `dir`.
///
/// Pairs without a table were simply not tested and contribute nothing.
/// Discovery enumerates the scheme's layer pairs rather than globbing the
/// directory, so a stray table for a foreign layer can never leak into the
/// matrices.
pub fn load_pair_tables(dir: &Path, scheme: LayerScheme) -> TenetResult<PairTableSet> {
    let mut tables = Vec::new();
    for &source in scheme.tags() {
        for &target in scheme.tags() {
            let path = table_path(dir, source, target);
            if !path.is_file() {
                continue;
            }
            let records = parse_pair_table(&path)?;
            tables.push(PairTable {
                source,
                target,
                path,
                records,
            });
        }
    }
    Ok(PairTableSet::new(scheme, tables))
}

/// Parses one pairwise table. Any malformed row aborts the run: a table
/// with holes in it would silently skew every mean built from it.
pub fn parse_pair_table(path: &Path) -> TenetResult<Vec<PairwiseRecord>> {
    let content = fs::read_to_string(path).map_err(|e| TenetError::from_io(path, e))?;
    let mut records = Vec::new();
    for (i, row) in content.lines().enumerate() {
        let line = i + 1;
        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() < MIN_COLUMNS {
            return Err(TenetError::MalformedRecord {
                path: path.to_path_buf(),
                line,
                reason: format!(
                    "expected at least {} columns, found {}",
                    MIN_COLUMNS,
                    fields.len()
                ),
            });
        }
        records.push(PairwiseRecord {
            raw_magnitude: parse_field(&fields, COL_RAW_MAGNITUDE, path, line)?,
            corrected_magnitude: parse_field(&fields, COL_CORRECTED_MAGNITUDE, path, line)?,
            p_value: parse_field(&fields, COL_P_VALUE, path, line)?,
            source_spike_count: parse_field(&fields, COL_SOURCE_SPIKES, path, line)?,
            target_spike_count: parse_field(&fields, COL_TARGET_SPIKES, path, line)?,
            window_length_secs: parse_field(&fields, COL_WINDOW_SECS, path, line)?,
        });
    }
    Ok(records)
}

/// Parses the summary table into a matrix of significant-link counts. A
/// row naming a layer outside the scheme is fatal: it means the scheme and
/// the data disagree about what was recorded.
pub fn parse_summary_table(path: &Path, scheme: LayerScheme) -> TenetResult<LayerMatrix> {
    let content = fs::read_to_string(path).map_err(|e| TenetError::from_io(path, e))?;
    let mut counts = LayerMatrix::zeros(scheme);
    for (i, row) in content.lines().enumerate() {
        let line = i + 1;
        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() < SUMMARY_MIN_COLUMNS {
            return Err(TenetError::MalformedRecord {
                path: path.to_path_buf(),
                line,
                reason: format!(
                    "expected at least {} columns, found {}",
                    SUMMARY_MIN_COLUMNS,
                    fields.len()
                ),
            });
        }
        let source = parse_layer_name(fields[SUMMARY_COL_SOURCE], path, line)?;
        let target = parse_layer_name(fields[SUMMARY_COL_TARGET], path, line)?;
        let significant: u64 = fields[SUMMARY_COL_SIGNIFICANT].trim().parse().map_err(|_| {
            TenetError::MalformedRecord {
                path: path.to_path_buf(),
                line,
                reason: format!(
                    "column {}: cannot parse '{}' as a count",
                    SUMMARY_COL_SIGNIFICANT, fields[SUMMARY_COL_SIGNIFICANT]
                ),
            }
        })?;
        counts.set(source, target, significant as f64)?;
    }
    Ok(counts)
}

fn parse_field(fields: &[&str], index: usize, path: &Path, line: usize) -> TenetResult<f64> {
    let text = fields[index].trim();
    text.parse().map_err(|_| TenetError::MalformedRecord {
        path: path.to_path_buf(),
        line,
        reason: format!("column {}: cannot parse '{}' as a number", index, text),
    })
}

fn parse_layer_name(name: &str, path: &Path, line: usize) -> TenetResult<LayerTag> {
    let trimmed = name.trim();
    LayerTag::from_display_name(trimmed).ok_or_else(|| TenetError::MalformedRecord {
        path: path.to_path_buf(),
        line,
        reason: format!("unknown layer name '{}'", trimmed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn table_row(
        raw: f64,
        corrected: f64,
        p: f64,
        source_spikes: f64,
        target_spikes: f64,
        window: f64,
    ) -> String {
        format!(
            "u_a,u_b,{},{},{},0,{},0,{},0,{}",
            raw, corrected, p, source_spikes, target_spikes, window
        )
    }

    fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_table_path_keeps_spaces_in_layer_names() {
        let path = table_path(Path::new("/tables"), LayerTag::L23, LayerTag::ThalamusCore);
        assert_eq!(
            path,
            PathBuf::from("/tables/Layer 23_to_Thalamus co.csv")
        );
    }

    #[test]
    fn test_parse_pair_table_reads_the_pinned_columns() {
        let dir = tempdir().unwrap();
        let body = format!(
            "{}\n{}\n",
            table_row(0.04, 0.03, 0.01, 120.0, 95.0, 600.0),
            table_row(0.02, -0.01, 0.2, 80.0, 60.0, 600.0),
        );
        let path = write_file(dir.path(), "t.csv", &body);

        let records = parse_pair_table(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].raw_magnitude, 0.04);
        assert_eq!(records[0].corrected_magnitude, 0.03);
        assert_eq!(records[0].p_value, 0.01);
        assert_eq!(records[0].source_spike_count, 120.0);
        assert_eq!(records[0].target_spike_count, 95.0);
        assert_eq!(records[0].window_length_secs, 600.0);
        assert_eq!(records[1].corrected_magnitude, -0.01);
    }

    #[test]
    fn test_short_row_is_fatal() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "t.csv", "a,b,c\n");
        match parse_pair_table(&path) {
            Err(TenetError::MalformedRecord { line, .. }) => assert_eq!(line, 1),
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_field_is_fatal_with_line_number() {
        let dir = tempdir().unwrap();
        let body = format!(
            "{}\nu_a,u_b,oops,0.03,0.01,0,120,0,95,0,600\n",
            table_row(0.04, 0.03, 0.01, 120.0, 95.0, 600.0)
        );
        let path = write_file(dir.path(), "t.csv", &body);
        match parse_pair_table(&path) {
            Err(TenetError::MalformedRecord { line, reason, .. }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("oops"));
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_table_is_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            parse_pair_table(&dir.path().join("absent.csv")),
            Err(TenetError::MissingFile { .. })
        ));
    }

    #[test]
    fn test_load_skips_absent_pairs_and_foreign_layers() {
        let dir = tempdir().unwrap();
        let row = table_row(0.04, 0.03, 0.01, 120.0, 95.0, 600.0);
        write_file(dir.path(), "Layer 23_to_Layer 4.csv", &format!("{}\n", row));
        write_file(dir.path(), "Layer 5_to_Layer 5.csv", &format!("{}\n", row));
        // Thalamic table present on disk, but the scheme is cortical.
        write_file(
            dir.path(),
            "Thalamus co_to_Layer 4.csv",
            &format!("{}\n", row),
        );

        let set = load_pair_tables(dir.path(), LayerScheme::Cortical).unwrap();
        assert_eq!(set.tables().len(), 2);
        assert_eq!(set.record_count(), 2);
        assert_eq!(set.tables()[0].source, LayerTag::L23);
        assert_eq!(set.tables()[0].target, LayerTag::L4);
        assert_eq!(set.tables()[1].source, LayerTag::L5);
        assert_eq!(set.tables()[1].target, LayerTag::L5);
    }

    #[test]
    fn test_load_empty_directory_yields_empty_set() {
        let dir = tempdir().unwrap();
        let set = load_pair_tables(dir.path(), LayerScheme::CorticalThalamic).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.scheme(), LayerScheme::CorticalThalamic);
    }

    #[test]
    fn test_parse_summary_counts() {
        let dir = tempdir().unwrap();
        let body = "Layer 23,Layer 4,x,x,14,extra\nLayer 4,Layer 4,x,x,3\n";
        let path = write_file(dir.path(), "pairwise_summary.csv", body);

        let counts = parse_summary_table(&path, LayerScheme::Cortical).unwrap();
        assert_eq!(counts.get(LayerTag::L23, LayerTag::L4).unwrap(), 14.0);
        assert_eq!(counts.get(LayerTag::L4, LayerTag::L4).unwrap(), 3.0);
        assert_eq!(counts.get(LayerTag::L5, LayerTag::L6).unwrap(), 0.0);
    }

    #[test]
    fn test_summary_unknown_layer_is_fatal() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "s.csv", "Layer 99,Layer 4,x,x,2\n");
        match parse_summary_table(&path, LayerScheme::Cortical) {
            Err(TenetError::MalformedRecord { reason, .. }) => {
                assert!(reason.contains("Layer 99"))
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_summary_thalamic_row_fails_under_cortical_scheme() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "s.csv", "Thalamus co,Layer 4,x,x,2\n");
        assert!(matches!(
            parse_summary_table(&path, LayerScheme::Cortical),
            Err(TenetError::LayerNotInScheme { .. })
        ));
    }

    #[test]
    fn test_summary_bad_count_is_fatal() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "s.csv", "Layer 23,Layer 4,x,x,2.5\n");
        assert!(matches!(
            parse_summary_table(&path, LayerScheme::Cortical),
            Err(TenetError::MalformedRecord { .. })
        ));
    }
}
