use clap::{Parser, Subcommand};
use rlc_app::{
    AppError, AppResult, ScenarioReport, builtin_scenario, load_scenario, run_scenario,
    sweep_resistance,
};
use rlc_circuit::Complex;
use rlc_project::{CircuitDef, InitialStateDef, InputDef, Scenario, TimeDef};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rlc-cli")]
#[command(about = "Series RLC transient analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in underdamped step scenario
    Default,
    /// Run a scenario file (YAML or JSON)
    Run {
        /// Path to the scenario file
        scenario_path: PathBuf,
    },
    /// Validate a scenario file
    Validate {
        /// Path to the scenario file
        scenario_path: PathBuf,
    },
    /// Analyze and simulate a circuit given on the command line
    Analyze {
        /// Resistance (ohm)
        #[arg(long)]
        r: f64,
        /// Inductance (H)
        #[arg(long)]
        l: f64,
        /// Capacitance (F)
        #[arg(long)]
        c: f64,
        /// Input type: zero, step or sinusoidal
        #[arg(long, default_value = "step")]
        input: String,
        /// Input amplitude (V)
        #[arg(long, default_value_t = 10.0)]
        amplitude: f64,
        /// Sinusoid frequency (Hz)
        #[arg(long, default_value_t = 1.0)]
        frequency: f64,
        /// Sinusoid phase (rad)
        #[arg(long, default_value_t = 0.0)]
        phase: f64,
        /// Initial capacitor voltage (V)
        #[arg(long, default_value_t = 0.0)]
        v0: f64,
        /// Initial inductor current (A)
        #[arg(long, default_value_t = 0.0)]
        i0: f64,
        /// End time in seconds
        #[arg(long, default_value_t = 5.0)]
        t_end: f64,
        /// Number of output samples
        #[arg(long, default_value_t = 500)]
        num_points: usize,
    },
    /// Re-run a scenario for several resistance values
    Sweep {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Comma-separated resistance values (ohm)
        #[arg(long, value_delimiter = ',', required = true)]
        r: Vec<f64>,
    },
    /// Export the time series of a scenario as CSV
    Export {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Default => cmd_run_scenario(&builtin_scenario()),
        Commands::Run { scenario_path } => cmd_run_scenario(&load_scenario(&scenario_path)?),
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Analyze {
            r,
            l,
            c,
            input,
            amplitude,
            frequency,
            phase,
            v0,
            i0,
            t_end,
            num_points,
        } => {
            let scenario = Scenario {
                name: "command line".to_string(),
                circuit: CircuitDef {
                    resistance_ohm: r,
                    inductance_h: l,
                    capacitance_f: c,
                },
                initial_state: InitialStateDef { v_c: v0, i_l: i0 },
                time: TimeDef {
                    t_start: 0.0,
                    t_end,
                    num_points,
                },
                input: InputDef {
                    kind: input,
                    amplitude,
                    frequency,
                    phase,
                },
                ..Scenario::default()
            };
            cmd_run_scenario(&scenario)
        }
        Commands::Sweep { scenario_path, r } => cmd_sweep(&scenario_path, &r),
        Commands::Export {
            scenario_path,
            output,
        } => cmd_export(&scenario_path, output.as_deref()),
    }
}

fn fmt_complex(z: &Complex<f64>) -> String {
    let sign = if z.im < 0.0 { '-' } else { '+' };
    format!("{:.4}{}{:.4}j", z.re, sign, z.im.abs())
}

fn cmd_run_scenario(scenario: &Scenario) -> AppResult<()> {
    let c = &scenario.circuit;
    println!("--- RLC System Simulation Started ---");
    println!(
        "Parameters: R={}Ω, L={}H, C={}F",
        c.resistance_ohm, c.inductance_h, c.capacitance_f
    );

    let report = run_scenario(scenario)?;
    print_report(&report);

    println!("\n--- RLC System Simulation Finished ---");
    Ok(())
}

fn print_report(report: &ScenarioReport) {
    let analysis = &report.analysis;
    let [l1, l2] = &analysis.eigen.eigenvalues;

    println!("\n--- Analysis Results ---");
    println!("Input: {}", report.input);
    println!("Damping Type: {}", analysis.damping);
    println!("Eigenvalues (λ): [{}, {}]", fmt_complex(l1), fmt_complex(l2));
    println!(
        "ω₀ = {:.4} rad/s, α = {:.4} 1/s, ζ = {:.4}",
        analysis.params.natural_frequency(),
        analysis.params.alpha_frequency(),
        analysis.params.damping_ratio()
    );

    match &report.simulation {
        Ok(run) => {
            let summary = &run.summary;
            println!("\n--- Numerical Check ---");
            match analysis.steady_state {
                Some(x_ss) => println!(
                    "Final Voltage (Expected {:.3}V): {:.3} V",
                    x_ss[0], summary.final_state[0]
                ),
                None => println!("Final Voltage: {:.3} V", summary.final_state[0]),
            }
            println!("Max Voltage (Overshoot): {:.3} V", summary.peak_voltage);
            println!("Stored Energy (end): {:.4} J", summary.final_energy);
            println!(
                "Steps: {} accepted, {} rejected, {} RHS evaluations",
                summary.stats.accepted_steps,
                summary.stats.rejected_steps,
                summary.stats.rhs_evaluations
            );
        }
        Err(message) => println!("\nSimulation Error: {}", message),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = load_scenario(scenario_path)?;
    println!("✓ Scenario '{}' is valid", scenario.name);
    Ok(())
}

fn cmd_sweep(scenario_path: &Path, resistances: &[f64]) -> AppResult<()> {
    let scenario = load_scenario(scenario_path)?;
    println!("Resistance sweep for '{}':", scenario.name);

    let rows = sweep_resistance(&scenario, resistances)?;
    println!(
        "{:>12}  {:<18}  {:>24}  {:>12}",
        "R (Ω)", "damping", "λ₁", "v_C(end)"
    );
    for row in rows {
        let final_voltage = match &row.summary {
            Ok(summary) => format!("{:.4}", summary.final_state[0]),
            Err(message) => format!("failed: {}", message),
        };
        println!(
            "{:>12}  {:<18}  {:>24}  {:>12}",
            row.resistance,
            row.damping.label(),
            fmt_complex(&row.eigen.eigenvalues[0]),
            final_voltage
        );
    }
    Ok(())
}

fn cmd_export(scenario_path: &Path, output: Option<&Path>) -> AppResult<()> {
    let scenario = load_scenario(scenario_path)?;
    let report = run_scenario(&scenario)?;
    let run = report.simulation.map_err(AppError::Simulation)?;

    let ts = run.trajectory.time_series();
    let energy = run.trajectory.energy(&report.analysis.params);

    // Build CSV
    let mut csv = String::from("time_s,v_c,i_l,energy_j\n");
    for (i, t) in ts.time.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            t, ts.v_c[i], ts.i_l[i], energy.total[i]
        ));
    }

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} samples to {}",
            ts.time.len(),
            path.display()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}
