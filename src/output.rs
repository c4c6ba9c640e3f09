//! This module is in charge of outputting the final study results to the
//! standard output and, optionally, to flat text files

use crate::{
    config::Configuration,
    dataset::DataPoint,
    numeric::{floats, Float},
    sweep::{Curve, SweepResults},
};

use eyre::{Result, WrapErr};
use log::info;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
    time::Duration,
};

// Number of significant digits in output, one less than the machine precision
const SIG_DIGITS: usize = (floats::DIGITS - 1) as usize;

/// R ratio curve computed for a given value of sin²θW
pub struct WeinbergVariation {
    /// Square sine of Weinberg's Theta used for the curve
    pub sin2_w: Float,

    /// Resulting R ratio
    pub r_ratio: Curve,
}

/// Output the study results to the console and, if requested, to disk
pub fn dump_results(
    cfg: &Configuration,
    results: &SweepResults,
    variations: &[WeinbergVariation],
    data: &[DataPoint],
    elapsed_time: Duration,
) -> Result<()> {
    // Print out a summary on stdout
    {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_summary(&mut out, cfg, results, variations, data, elapsed_time)?;
    }

    // Write down the curves for the plotting tools
    if cfg.write_curves {
        write_curves(&cfg.output_dir, results, variations, data)
            .wrap_err_with(|| format!("Failed to write curves to {}", cfg.output_dir.display()))?;
    }

    Ok(())
}

/// Human-readable digest of the results
fn write_summary(
    out: &mut impl Write,
    cfg: &Configuration,
    results: &SweepResults,
    variations: &[WeinbergVariation],
    data: &[DataPoint],
    elapsed_time: Duration,
) -> io::Result<()> {
    writeln!(out)?;
    writeln_3p(out, ("Evaluation time (s)", elapsed_time.as_secs_f64() as Float))?;
    writeln_3p(out, ("Sampled energies", cfg.sweep.len()))?;
    writeln_3p(out, ("... with open hadron channels", results.r_ratio.len()))?;
    writeln_3p(out, ("Experimental data points", data.len()))?;
    writeln_3p(out, "---------------------------------------------")?;
    if let Some(peak) = results.r_ratio.maximum() {
        writeln_3p(out, ("R ratio maximum", peak.value))?;
        writeln_3p(out, ("... at sqrt(s)            (GeV)", peak.sqrt_s))?;
    }
    if let Some(last) = results.r_ratio.points().last() {
        writeln_3p(out, ("R ratio at last energy", last.value))?;
    }
    if let (Some(min), Some(max)) = (results.afb.minimum(), results.afb.maximum()) {
        writeln_3p(out, ("AFB minimum", min.value))?;
        writeln_3p(out, ("... at sqrt(s)            (GeV)", min.sqrt_s))?;
        writeln_3p(out, ("AFB maximum", max.value))?;
        writeln_3p(out, ("... at sqrt(s)            (GeV)", max.sqrt_s))?;
    }
    for variation in variations {
        if let Some(peak) = variation.r_ratio.maximum() {
            let label = format!("R maximum, sin2(thetaW) = {}", variation.sin2_w);
            writeln_3p(out, (&label[..], peak.value))?;
        }
    }
    if let Some(point) = data.last() {
        writeln_3p(out, "---------------------------------------------")?;
        writeln!(out, " Last data point: {}", point)?;
    }
    writeln!(out)
}

/// Write every curve and the experimental data into `dir`
pub fn write_curves(
    dir: &Path,
    results: &SweepResults,
    variations: &[WeinbergVariation],
    data: &[DataPoint],
) -> Result<()> {
    fs::create_dir_all(dir)?;
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;

    let curves = [
        ("r_ratio", &results.r_ratio),
        ("interference", &results.interference),
        ("afb", &results.afb),
        ("muon_rate", &results.muon_rate),
        ("muon_rate_qed", &results.muon_rate_qed),
        ("hadron_rate", &results.hadron_rate),
    ];
    for (name, curve) in curves {
        write_curve(&dir.join(format!("{}.dat", name)), name, &timestamp, curve)?;
    }
    for variation in variations {
        let name = format!("r_ratio_sin2w_{}", variation.sin2_w);
        let path = dir.join(format!("{}.dat", name));
        write_curve(&path, &name, &timestamp, &variation.r_ratio)?;
    }

    let path = dir.join("data.dat");
    let mut file = BufWriter::new(File::create(&path)?);
    writeln!(file, "# data (energy R error_low error_high), written {}", timestamp)?;
    for point in data {
        write_engineering(&mut file, point.energy, SIG_DIGITS)?;
        for value in [point.r, point.error_low, point.error_high] {
            write!(file, " ")?;
            write_engineering(&mut file, value, SIG_DIGITS)?;
        }
        writeln!(file)?;
    }
    file.flush()?;

    info!("Wrote {} curves to {}", curves.len() + variations.len(), dir.display());
    Ok(())
}

/// Write one curve as "sqrt_s value" lines below a header
fn write_curve(path: &Path, name: &str, timestamp: &str, curve: &Curve) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "# {} (sqrt_s value), written {}", name, timestamp)?;
    for point in curve.points() {
        write_engineering(&mut file, point.sqrt_s, SIG_DIGITS)?;
        write!(file, " ")?;
        write_engineering(&mut file, point.value, SIG_DIGITS)?;
        writeln!(file)?;
    }
    file.flush()
}

/// Text output facility with fixed-size key columns
fn writeln_3p(out: &mut impl Write, data: impl Write3p) -> io::Result<()> {
    write!(out, " ")?;
    data.write(out)?;
    writeln!(out)
}

/// Trait implemented by things which can be printed in the summary
trait Write3p: Sized {
    /// Write down `self` to the output
    fn write(self, out: &mut impl Write) -> io::Result<()>;
}

impl Write3p for &str {
    // Strings work in the usual way
    fn write(self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "{}", self)
    }
}

impl Write3p for usize {
    // Integers work in the usual way too
    fn write(self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "{}", self)
    }
}

impl Write3p for Float {
    // Floats use a close approximation of printf's %g
    fn write(self, out: &mut impl Write) -> io::Result<()> {
        write_engineering(out, self, SIG_DIGITS)
    }
}

impl<T: Write3p> Write3p for (&str, T) {
    // Key-value output that uses fixed-size columns for better readability
    fn write(self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "{:<31}: ", self.0)?;
        self.1.write(out)
    }
}

/// Write a floating-point number using "engineering" notation
///
/// Analogous to the %g format of the C printf function, this method switches
/// between naive and scientific notation for floating-point numbers when the
/// number being printed becomes so small that printing leading zeroes could end
/// up larger than the scientific notation, or so large that we would be forced
/// to print more significant digits than requested.
///
fn write_engineering(writer: &mut impl Write, x: Float, sig_digits: usize) -> io::Result<()> {
    let mut precision = sig_digits - 1;
    if x == 0. {
        // Zero is special because you can't take its log
        write!(writer, "0")
    } else {
        // Otherwise, use log to evaluate order of magnitude
        let log_x = x.abs().log10();
        if log_x >= -3. && log_x <= (sig_digits as Float) {
            // Print using naive notation
            //
            // Since Rust's precision controls number of digits after the
            // decimal point, we must adjust it depending on magnitude in order
            // to operate at a constant number of significant digits.
            // At exactly sig_digits orders of magnitude, no decimal is left.
            precision = (precision as isize - log_x.trunc() as isize).max(0) as usize;

            // Numbers smaller than 1 must get one extra digit since the leading
            // zero does not count as a significant digit.
            if log_x < 0. {
                precision += 1
            }

            // People don't normally expect trailing zeros or decimal point in
            // naive notation, but be careful with integer numbers...
            let str_with_zeros = format!("{:.1$}", x, precision);
            if str_with_zeros.contains('.') {
                write!(
                    writer,
                    "{}",
                    str_with_zeros.trim_end_matches('0').trim_end_matches('.')
                )
            } else {
                write!(writer, "{}", str_with_zeros)
            }
        } else {
            // Print using scientific notation
            write!(writer, "{:.1$e}", x, precision)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{coupling::ElectroweakParameters, sweep::EnergySweep};
    use assert_fs::{prelude::*, TempDir};

    fn engineering(x: Float) -> String {
        let mut buf = Vec::new();
        write_engineering(&mut buf, x, 6).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn engineering_notation() {
        assert_eq!(engineering(0.), "0");
        assert_eq!(engineering(100.), "100");
        assert_eq!(engineering(1234.5), "1234.5");
        assert_eq!(engineering(0.5), "0.5");
        assert_eq!(engineering(-0.25), "-0.25");
        assert_eq!(engineering(1e-5), "1.00000e-5");
        assert_eq!(engineering(1.5e9), "1.50000e9");
        assert_eq!(engineering(1e6), "1000000");
        assert_eq!(engineering(-2e6), "-2000000");
    }

    #[test]
    fn key_value_columns() {
        let mut buf = Vec::new();
        writeln_3p(&mut buf, ("Experimental data points", 3usize)).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert_eq!(line, format!(" {:<31}: 3\n", "Experimental data points"));
    }

    #[test]
    fn curves_land_on_disk() {
        let params = ElectroweakParameters::default();
        let sweep = EnergySweep::new(1., 1., 11.).unwrap();
        let results = SweepResults::compute(&params, &sweep);
        let variations = [WeinbergVariation {
            sin2_w: 0.25,
            r_ratio: results.r_ratio.clone(),
        }];
        let data = [DataPoint {
            energy: 3.,
            r: 2.,
            error_low: 0.5,
            error_high: 0.25,
        }];

        let dir = TempDir::new().unwrap();
        let out = dir.child("curves");
        write_curves(out.path(), &results, &variations, &data).unwrap();

        let r_ratio = fs::read_to_string(out.child("r_ratio.dat").path()).unwrap();
        let mut lines = r_ratio.lines();
        assert!(lines.next().unwrap().starts_with("# r_ratio"));
        assert_eq!(lines.count(), 10);
        assert!(out.child("r_ratio_sin2w_0.25.dat").path().exists());
        let data_file = fs::read_to_string(out.child("data.dat").path()).unwrap();
        assert_eq!(data_file.lines().nth(1), Some("3 2 0.5 0.25"));
    }
}
