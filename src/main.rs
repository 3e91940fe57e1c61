use clap::Parser;
use cog_flame as cog;
use cog::plot::{self, PlotTarget};
use cog::sweep::{self, heating_value, report};
use cog::{CaseConfig, Gas};

/// Equivalence-ratio sweep of a fuel gas burnt with air: adiabatic flame temperature,
/// equilibrium emissions, enthalpy change and heating values
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Mechanism file with species thermo data
    #[arg(short, long, default_value = "data/gri30_cog.json")]
    mechanism: String,

    /// Case file (.json); the coke-oven gas case is used when omitted
    #[arg(short, long)]
    case: Option<String>,

    /// Save the charts to this file (.png or .svg) instead of opening a window
    #[arg(short, long)]
    plot: Option<String>,

    /// Do not draw the charts
    #[arg(long, conflicts_with = "plot")]
    no_plot: bool,

    /// Write the sweep results as tab-separated values
    #[arg(short, long)]
    output: Option<String>,
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> cog::Result<()> {
    let mut gas = Gas::new(&cli.mechanism)?;
    log::info!("loaded mechanism {} with {} species", gas.name(), gas.species().len());

    let case = match &cli.case {
        Some(file) => CaseConfig::from_file(file)?,
        None => CaseConfig::default(),
    };
    log::debug!("{:?}", case);

    report::print_header();
    let results = sweep::run_sweep(&mut gas, &case, |outcome| {
        println!("{}", report::format_outcome(outcome))
    })?;
    if let Some(file) = &cli.output {
        report::write_to_file(&results, file)?;
    }

    let values = heating_value::heating_values(&mut gas, &case.fuel, &case.oxidizer)?;
    report::print_heating_values(&values);

    if !cli.no_plot {
        let target = match &cli.plot {
            Some(file) => PlotTarget::from_path(file),
            None => PlotTarget::Window,
        };
        plot::plot_sweep(&results, &target)?;
    }
    Ok(())
}
