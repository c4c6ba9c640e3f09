//! Reader for the experimental R ratio dataset
//!
//! The dataset is a whitespace-separated text table. Lines containing a `*`
//! are comments. A data row carries the center-of-mass energy in column 0,
//! the measured R in column 3 and the statistical errors in columns 4 (upper)
//! and 5 (lower). It is followed by a possibly empty block of systematic
//! error lines `+X -Y`, in percent of R, which add up in quadrature. The
//! block ends on the first line whose first token does not start with `+`.

use crate::numeric::{functions::sqr, Float};
use log::{debug, info};
use prefix_num_ops::real::*;
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Energy cutoff used when none is requested (GeV)
pub const DEFAULT_MAX_ENERGY: Float = 4.8;

/// Conversion of a squared percentage into a squared fraction
const SQUARED_PERCENT: Float = 1e-4;

/// Failure to read the dataset
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be read
    #[error("Failed to read dataset {}", path.display())]
    Io {
        /// Location of the dataset
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The dataset does not follow the expected layout
    #[error("Malformed dataset at line {line}: {reason}")]
    Malformed {
        /// Line number, counting from 1
        line: usize,
        /// What is wrong with it
        reason: String,
    },
}

/// Measurement of R with asymmetric errors
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DataPoint {
    /// Center-of-mass energy (GeV)
    pub energy: Float,

    /// Measured R ratio
    pub r: Float,

    /// Total error below the measured value
    pub error_low: Float,

    /// Total error above the measured value
    pub error_high: Float,
}
//
impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "√s = {} GeV: R = {} -{} +{}",
            self.energy, self.r, self.error_low, self.error_high
        )
    }
}

/// Read the dataset at `path`, keeping rows up to `max_energy`
pub fn read_dataset(path: impl AsRef<Path>, max_energy: Float) -> Result<Vec<DataPoint>, DatasetError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_owned(),
        source,
    })?;
    let points = parse_dataset(&text, max_energy)?;
    info!("Read {} data points from {}", points.len(), path.display());
    Ok(points)
}

/// Parse dataset text, keeping rows up to `max_energy`, in file order
pub fn parse_dataset(text: &str, max_energy: Float) -> Result<Vec<DataPoint>, DatasetError> {
    let lines = text.lines().collect::<Vec<_>>();
    let mut points = Vec::new();

    // The row cursor looks for data rows. Every data row hands over to a
    // systematics scan, which always runs to the end of its block, and the
    // row cursor then resumes on the line which terminated that block.
    let mut row_idx = 0;
    while row_idx < lines.len() {
        let Some(row) = StatRow::parse(lines[row_idx], row_idx)? else {
            debug!("Skipping line {}: {:?}", row_idx + 1, lines[row_idx]);
            row_idx += 1;
            continue;
        };

        let (syst, block_end) = systematics(&lines, row_idx + 1)?;
        if row.energy > max_energy {
            debug!(
                "Skipping line {}: energy {} GeV is above the {} GeV cutoff",
                row_idx + 1,
                row.energy,
                max_energy
            );
        } else {
            points.push(row.combine(syst));
        }
        row_idx = block_end;
    }

    Ok(points)
}

/// Data row, with statistical errors only
struct StatRow {
    energy: Float,
    r: Float,
    stat_upper: Float,
    stat_lower: Float,
}
//
impl StatRow {
    /// Decode the line at index `idx`, or return None if it is not a data row
    ///
    /// Lines whose first five tokens are numbers are data rows. Such a row
    /// must also carry a numerical lower statistical error in column 5.
    ///
    fn parse(line: &str, idx: usize) -> Result<Option<Self>, DatasetError> {
        if line.contains('*') {
            return Ok(None);
        }
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        if tokens.len() < 5 {
            return Ok(None);
        }
        let Some(numbers) = tokens[..5]
            .iter()
            .map(|token| token.parse::<Float>().ok())
            .collect::<Option<Vec<_>>>()
        else {
            return Ok(None);
        };
        let stat_lower = tokens
            .get(5)
            .and_then(|token| token.parse::<Float>().ok())
            .ok_or_else(|| DatasetError::Malformed {
                line: idx + 1,
                reason: "data row lacks a numerical lower statistical error".to_owned(),
            })?;
        Ok(Some(Self {
            energy: numbers[0],
            r: numbers[3],
            stat_upper: abs(numbers[4]),
            stat_lower: abs(stat_lower),
        }))
    }

    /// Combine statistical and systematic errors into a data point
    fn combine(self, syst: Systematics) -> DataPoint {
        let total = |stat: Float, syst_percent: Float| {
            sqrt(sqr(stat) + SQUARED_PERCENT * sqr(syst_percent) * sqr(self.r))
        };
        DataPoint {
            energy: self.energy,
            r: self.r,
            error_low: total(self.stat_lower, syst.lower),
            error_high: total(self.stat_upper, syst.upper),
        }
    }
}

/// Systematic errors of one data row, in percent of R
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Systematics {
    upper: Float,
    lower: Float,
}

/// Accumulate the systematics block starting at line index `first`
///
/// Returns the errors and the index of the first line past the block. A row
/// followed directly by the end of the file has no systematics, but a block
/// must be terminated by a line before the end of the file.
///
fn systematics(lines: &[&str], first: usize) -> Result<(Systematics, usize), DatasetError> {
    let malformed = |idx: usize, reason: &str| DatasetError::Malformed {
        line: idx + 1,
        reason: reason.to_owned(),
    };

    let (mut upper_sq, mut lower_sq) = (0., 0.);
    let mut cursor = first;
    loop {
        let Some(line) = lines.get(cursor) else {
            if cursor == first {
                break;
            }
            return Err(malformed(first, "systematics block is not terminated"));
        };

        let mut tokens = line.split_whitespace();
        let upper = match tokens.next() {
            Some(token) if token.starts_with('+') => token,
            _ => break,
        };
        let lower = tokens
            .next()
            .ok_or_else(|| malformed(cursor, "systematic error line lacks a lower error"))?;
        let parse = |token: &str| {
            token
                .parse::<Float>()
                .map_err(|_| malformed(cursor, &format!("invalid systematic error {:?}", token)))
        };
        upper_sq += sqr(parse(upper)?);
        lower_sq += sqr(parse(lower)?);
        cursor += 1;
    }

    let syst = Systematics {
        upper: sqrt(upper_sq),
        lower: sqrt(lower_sq),
    };
    Ok((syst, cursor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::{prelude::*, NamedTempFile};
    use float_cmp::assert_approx_eq;

    const BASIC: &str = "* header
10.0  0  0  1.234  0.05  0.04
+0.02 -0.01
+0.03 -0.02
20.0  0  0  2.0    0.1   0.1
";

    fn expected_error(stat: Float, syst: &[Float], r: Float) -> Float {
        let syst = sqrt(syst.iter().map(|x| x * x).sum::<Float>());
        sqrt(stat * stat + 1e-4 * syst * syst * r * r)
    }

    #[test]
    fn single_point_below_cutoff() {
        let points = parse_dataset(BASIC, 15.).unwrap();
        assert_eq!(points.len(), 1);
        let point = points[0];
        assert_eq!(point.energy, 10.);
        assert_eq!(point.r, 1.234);
        assert_approx_eq!(Float, point.error_low, expected_error(0.04, &[0.01, 0.02], 1.234), epsilon = 1e-15);
        assert_approx_eq!(Float, point.error_high, expected_error(0.05, &[0.02, 0.03], 1.234), epsilon = 1e-15);
    }

    #[test]
    fn excluded_rows_still_consume_their_block() {
        let text = format!("{}+5.0 -5.0\n+1.0 -1.0\n12.0 0 0 1.5 -0.2 0.3\n", BASIC);
        let points = parse_dataset(&text, 15.).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].energy, 10.);
        assert_eq!(points[1].energy, 12.);
        assert_eq!(points[1].r, 1.5);
        assert_eq!(points[1].error_high, 0.2);
        assert_eq!(points[1].error_low, 0.3);
    }

    #[test]
    fn rows_above_cutoff_hide_their_block_from_the_row_scan() {
        // This block line has six numerical tokens: read as a row, it would
        // yield a point at 12 GeV
        let text = "20.0 0 0 2.0 0.1 0.1\n+12.0 0 0 9.9 0.1 0.1\n* end\n";
        let points = parse_dataset(text, 15.).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn rows_above_cutoff_still_need_a_terminated_block() {
        let text = "10.0 0 0 1.0 0.1 0.1\n* end\n20.0 0 0 2.0 0.1 0.1\n+1.0 -1.0\n";
        assert!(matches!(
            parse_dataset(text, 15.),
            Err(DatasetError::Malformed { line: 4, .. })
        ));
    }

    #[test]
    fn data_rows_need_a_lower_statistical_error() {
        let text = "1.0 0 0 2.0 0.1 x\n";
        assert!(matches!(
            parse_dataset(text, 10.),
            Err(DatasetError::Malformed { line: 1, .. })
        ));
        let text = "* header\n1.0 0 0 2.0 0.1\n";
        assert!(matches!(
            parse_dataset(text, 10.),
            Err(DatasetError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn default_cutoff() {
        let points = parse_dataset(BASIC, DEFAULT_MAX_ENERGY).unwrap();
        assert!(points.is_empty());
        let points = parse_dataset(BASIC, 160.).unwrap();
        assert_eq!(points.iter().map(|p| p.energy).collect::<Vec<_>>(), vec![10., 20.]);
    }

    #[test]
    fn non_numeric_rows_are_skipped() {
        let text = "GeV  -  -  R  +stat  -stat
1.0  1.0  1.0  2.5  0.1  0.1

   2.0  x  2.0  2.6  0.1  0.1
3.0  3.0  2.7
4.0  4.0  4.0  2.8  0.2  0.2  extra columns
";
        let points = parse_dataset(text, 10.).unwrap();
        assert_eq!(points.iter().map(|p| p.energy).collect::<Vec<_>>(), vec![1., 4.]);
    }

    #[test]
    fn comments_terminate_blocks() {
        let text = "1.0 0 0 2.0 0.1 0.1
+10.0 -10.0
* comment
2.0 0 0 2.0 0.1 0.1
";
        let points = parse_dataset(text, 10.).unwrap();
        assert_eq!(points.len(), 2);
        assert_approx_eq!(Float, points[0].error_low, expected_error(0.1, &[10.], 2.), epsilon = 1e-15);
        assert_eq!(points[1].error_low, 0.1);
    }

    #[test]
    fn truncated_block_is_malformed() {
        let text = "1.0 0 0 2.0 0.1 0.1\n+1.0 -1.0\n+2.0 -2.0\n";
        match parse_dataset(text, 10.) {
            Err(DatasetError::Malformed { line, .. }) => assert_eq!(line, 2),
            other => panic!("Unexpected result {:?}", other),
        }
    }

    #[test]
    fn incomplete_systematics_are_malformed() {
        let text = "1.0 0 0 2.0 0.1 0.1\n+1.0\n3.0 0 0 2.0 0.1 0.1\n";
        assert!(matches!(
            parse_dataset(text, 10.),
            Err(DatasetError::Malformed { line: 2, .. })
        ));
        let text = "1.0 0 0 2.0 0.1 0.1\n+1.0 -abc\n3.0 0 0 2.0 0.1 0.1\n";
        assert!(matches!(
            parse_dataset(text, 10.),
            Err(DatasetError::Malformed { line: 2, .. })
        ));
    }

    #[test]
    fn reads_from_disk() {
        let file = NamedTempFile::new("hadronic_r.dat").unwrap();
        file.write_str(BASIC).unwrap();
        let points = read_dataset(file.path(), 15.).unwrap();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = assert_fs::TempDir::new().unwrap();
        let path = dir.child("missing.dat");
        let err = read_dataset(path.path(), 15.).unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
        assert!(err.to_string().contains("missing.dat"));
    }
}
