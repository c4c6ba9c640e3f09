//! Driver of the R ratio study: evaluates the model, reads the measurements
//! and hands both over to the output stage

use eyre::WrapErr;
use log::info;

use rratio::{
    config::{Configuration, DEFAULT_CONFIG_FILE},
    dataset,
    output::{self, WeinbergVariation},
    particle::{ELECTRON, MUON, NUM_COLORS, QUARKS},
    sweep::{self, SweepResults},
};

use std::{env, time::Instant};

/// We'll use eyre's type-erased result type throughout the application
type Result<T> = eyre::Result<T>;

/// This will act as our main function, with suitable error handling
fn main() -> Result<()> {
    env_logger::init();

    // ### CONFIGURATION READOUT ###

    let config_file = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_owned());
    let cfg = Configuration::load(&config_file).wrap_err("Failed to load the configuration")?;

    // Display the particle content of the model
    println!();
    for fermion in [ELECTRON, MUON].iter().chain(QUARKS.iter()) {
        println!("{}", fermion.properties(&cfg.params));
    }

    // ### MODEL EVALUATION ###

    // We start the clock after configuration I/O, to avoid IO-induced timing
    // fluctuations
    let saved_time = Instant::now();

    // Evaluate every observable over the energy sweep
    info!("Evaluating {} energies", cfg.sweep.len());
    let results = SweepResults::compute(&cfg.params, &cfg.sweep);

    // Compare the R ratio for two values of the Weinberg angle. Each curve
    // gets its own copy of the electroweak parameters.
    let variations = [cfg.params.sin2_w, cfg.sin2_w_alt]
        .iter()
        .map(|&sin2_w| {
            let params = cfg.params.with_sin2_weinberg(sin2_w);
            WeinbergVariation {
                sin2_w,
                r_ratio: sweep::ratio_curve(&params, &cfg.sweep, &ELECTRON, &QUARKS, NUM_COLORS),
            }
        })
        .collect::<Vec<_>>();

    let elapsed_time = saved_time.elapsed();

    // ### EXPERIMENTAL DATA ###

    let data = dataset::read_dataset(&cfg.dataset, cfg.max_energy)
        .wrap_err("Failed to read the experimental dataset")?;

    // ### RESULTS DISPLAY AND STORAGE ###

    output::dump_results(&cfg, &results, &variations, &data, elapsed_time)
        .wrap_err("Failed to output the results")?;

    // ...and we're done
    Ok(())
}
