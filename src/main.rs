use std::error::Error;
use std::process::ExitCode;

use heatpump::{
    BarChart, FailureSummary, RefpropOracle, ReportSection, capacity_chart, config,
    cop_chart, evaluate_fleet,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[heatpump] error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = config::load()?;
    let oracle = RefpropOracle::from_env()?;
    eprintln!("[heatpump] REFPROP loaded from {}", oracle.path().display());

    let fleet = evaluate_fleet(&config, &oracle, |outcome| match outcome {
        Ok(result) => println!("\n{}", ReportSection(result)),
        Err(e) => eprintln!("[heatpump] skipping {e}"),
    });

    println!("\n=== End of Simulation for All Refrigerants ===");
    if !fleet.failures().is_empty() {
        eprintln!("\n{}", FailureSummary(fleet.failures()));
    }
    if fleet.is_empty() {
        eprintln!("[heatpump] warning: no refrigerant completed, charts are empty");
    }

    show_charts(&[cop_chart(&fleet), capacity_chart(&fleet)]);
    Ok(())
}

#[cfg(feature = "plot")]
fn show_charts(charts: &[BarChart]) {
    if let Err(e) = heatpump::plot::show(charts) {
        eprintln!("[heatpump] warning: cannot open chart window ({e}), printing instead");
        print_charts(charts);
    }
}

#[cfg(not(feature = "plot"))]
fn show_charts(charts: &[BarChart]) {
    print_charts(charts);
}

fn print_charts(charts: &[BarChart]) {
    for chart in charts {
        println!("\n{chart}");
    }
}
