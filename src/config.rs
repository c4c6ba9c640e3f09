//! Mechanism for loading and sharing the study configuration

use crate::{
    coupling::{AlphaRunning, ElectroweakParameters},
    numeric::Float,
    sweep::EnergySweep,
};

use eyre::{ensure, eyre, Result, WrapErr};
use log::info;

use std::{fs, path::PathBuf, str::FromStr};

/// Configuration file which is read when none is specified
pub const DEFAULT_CONFIG_FILE: &str = "valeurs";

/// Study configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Experimental dataset to be compared with the model
    pub dataset: PathBuf,

    /// Dataset rows above this center-of-mass energy are ignored (GeV)
    pub max_energy: Float,

    /// Center-of-mass energies at which the model is evaluated
    pub sweep: EnergySweep,

    /// Electroweak constants of the model
    pub params: ElectroweakParameters,

    /// Square sine of Weinberg's Theta for the comparison curve
    pub sin2_w_alt: Float,

    /// Whether the curves should be written down as flat files
    pub write_curves: bool,

    /// Directory receiving the flat files
    pub output_dir: PathBuf,
}
//
impl Configuration {
    /// Load the configuration from a file, check it, and print it out
    pub fn load(file_name: &str) -> Result<Self> {
        let config_str = fs::read_to_string(file_name)
            .wrap_err_with(|| format!("Could not read configuration file {}", file_name))?;
        let config = Self::parse(&config_str)?;
        info!("Loaded configuration from {}", file_name);

        // Display it so that the output of a run documents its inputs
        config.print();
        Ok(config)
    }

    /// Decode and check the contents of a configuration file
    pub fn parse(config_str: &str) -> Result<Self> {
        // We will iterate over the configuration items. These should be the
        // first non-whitespace chunk of text on each line. We will ignore
        // blank lines.
        let mut config_iter = config_str
            .lines()
            .filter_map(|line| line.split_whitespace().next());

        // This closure fetches the next configuration item, tagging it with
        // the name of the configuration field which it is supposed to fill to
        // ease error reporting, and handling unexpected end-of-file too.
        let mut next_item = |name: &'static str| -> Result<ConfigItem> {
            config_iter
                .next()
                .map(|data| ConfigItem::new(name, data))
                .ok_or_else(|| eyre!("Missing configuration of {}", name))
        };

        // Decode the configuration items into concrete values
        let dataset = PathBuf::from(next_item("dataset")?.data);
        let max_energy = next_item("max_energy")?.parse::<Float>()?;
        let sweep = EnergySweep {
            start: next_item("sqrt_s_min")?.parse::<Float>()?,
            step: next_item("sqrt_s_step")?.parse::<Float>()?,
            end: next_item("sqrt_s_max")?.parse::<Float>()?,
        }
        .validated()
        .wrap_err("Invalid energy sweep")?;
        let alpha_z = next_item("alpha_z")?.parse::<Float>()?;
        let sin2_w = next_item("sin2_w")?.parse::<Float>()?;
        let m_z0 = next_item("m_z0")?.parse::<Float>()?;
        let g_z0 = next_item("g_z0")?.parse::<Float>()?;
        let sin2_w_alt = next_item("sin2_w_alt")?.parse::<Float>()?;
        let alpha_running = if next_item("physical_alpha")?.parse_bool()? {
            AlphaRunning::Physical
        } else {
            AlphaRunning::Literal
        };
        let write_curves = next_item("write_curves")?.parse_bool()?;
        let output_dir = PathBuf::from(next_item("output_dir")?.data);

        let config = Configuration {
            dataset,
            max_energy,
            sweep,
            params: ElectroweakParameters {
                alpha_z,
                sin2_w,
                m_z0,
                g_z0,
                alpha_running,
            },
            sin2_w_alt,
            write_curves,
            output_dir,
        };

        // Check that the physics makes sense
        ensure!(config.max_energy > 0., "Dataset energy cutoff must be positive");
        ensure!(alpha_z > 0., "Fine structure constant must be positive");
        for &sin2 in &[sin2_w, sin2_w_alt] {
            ensure!(
                sin2 > 0. && sin2 < 1.,
                "Square sine of Weinberg's Theta must lie in ]0, 1[, got {}",
                sin2
            );
        }
        ensure!(m_z0 > 0. && g_z0 > 0., "Z⁰ mass and width must be positive");

        // If nothing bad occured, we can now return the configuration
        Ok(config)
    }

    /// Display the configuration
    pub fn print(&self) {
        println!("DATASET        : {}", self.dataset.display());
        println!("EMAX           : {}", self.max_energy);
        println!("SQRTS_MIN      : {}", self.sweep.start);
        println!("SQRTS_STEP     : {}", self.sweep.step);
        println!("SQRTS_MAX      : {}", self.sweep.end);
        println!("ALPHAZ         : {}", self.params.alpha_z);
        println!("SIN2W          : {}", self.params.sin2_w);
        println!("MZ0            : {}", self.params.m_z0);
        println!("GZ0            : {}", self.params.g_z0);
        println!("SIN2W_ALT      : {}", self.sin2_w_alt);
        println!("ALPHA_RUNNING  : {:?}", self.params.alpha_running);
        println!("WRITE_CURVES   : {}", self.write_curves);
        println!("OUTPUT_DIR     : {}", self.output_dir.display());
    }
}

/// A value from the configuration file, tagged with the struct field which it
/// is supposed to map for error reporting purposes.
struct ConfigItem<'data> {
    name: &'static str,
    data: &'data str,
}
//
impl<'data> ConfigItem<'data> {
    /// Build a config item from a struct field tag and raw iterator data
    fn new(name: &'static str, data: &'data str) -> Self {
        Self { name, data }
    }

    /// Parse this data using Rust's standard parsing logic
    fn parse<T: FromStr>(self) -> Result<T>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        self.data
            .parse::<T>()
            .wrap_err_with(|| format!("Could not parse configuration of {}", self.name))
    }

    /// Parse this data using special logic which handles Fortran's bool syntax
    fn parse_bool(self) -> Result<bool> {
        match self.data.to_lowercase().as_str() {
            // Handle FORTRAN booleans as a special case
            ".true." => Ok(true),
            ".false." => Ok(false),
            // Delegate other booleans to the standard Rust parser
            _ => self.parse::<bool>(),
        }
    }
}
