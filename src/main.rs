//! Gridsolve - numerical solvers and power flow from the command line.
//!
//! # Usage
//!
//! ```bash
//! gridsolve linear system.csv --method lu --pivot
//! gridsolve roots --function trig --x0 0 --x1 5
//! gridsolve dc case.json
//! gridsolve ac case.json --tol 1e-6 --json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use gridsolve_core::{
    ac_power_flow, dc_power_flow,
    error::Result,
    io::{read_linear_system_file, read_network_file},
    LinearMethod, LinearSolver, Network, Pivoting, PowerFlowConfig, PowerFlowSolution,
    RootFinder, RootMethod,
};

/// Linear, nonlinear and power-flow solvers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Logging level for solver diagnostics (written to stderr)
    #[arg(long, default_value = "info", global = true)]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve an augmented linear system read from a CSV file
    Linear {
        /// CSV file with one header line followed by rows of [A | b]
        #[arg(value_name = "SYSTEM_FILE")]
        file: PathBuf,

        /// Method to use (every method when omitted)
        #[arg(short, long)]
        method: Option<LinearMethod>,

        /// Convergence tolerance
        #[arg(long, default_value_t = gridsolve_core::linear::DEFAULT_TOLERANCE)]
        tol: f64,

        /// Iteration cap for iterative methods
        #[arg(long, default_value_t = gridsolve_core::linear::DEFAULT_MAX_ITERATIONS)]
        max_iter: usize,

        /// Use partial pivoting in Gauss and LU
        #[arg(long)]
        pivot: bool,
    },

    /// Find a root of a built-in function
    Roots {
        /// Function to solve
        #[arg(short, long, value_enum, default_value_t = Function::Trig)]
        function: Function,

        /// First point (lower bracket for bisection)
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        x0: f64,

        /// Second point (upper bracket for bisection)
        #[arg(long, default_value_t = 5.0, allow_hyphen_values = true)]
        x1: f64,

        /// Method to use (every method when omitted)
        #[arg(short, long)]
        method: Option<RootMethod>,

        /// Tolerance on |f(x)|
        #[arg(long, default_value_t = gridsolve_core::nonlinear::DEFAULT_TOLERANCE)]
        tol: f64,

        /// Iteration cap
        #[arg(long, default_value_t = gridsolve_core::nonlinear::DEFAULT_MAX_ITERATIONS)]
        max_iter: usize,
    },

    /// Linearized (DC) power flow
    Dc {
        /// Network case in JSON
        #[arg(value_name = "CASE_FILE")]
        case: PathBuf,

        /// Print the annotated network as JSON
        #[arg(long)]
        json: bool,
    },

    /// AC power flow by Newton-Raphson
    Ac {
        /// Network case in JSON
        #[arg(value_name = "CASE_FILE")]
        case: PathBuf,

        /// Mismatch tolerance (per-unit)
        #[arg(long, default_value_t = gridsolve_core::powerflow::DEFAULT_TOLERANCE)]
        tol: f64,

        /// Iteration cap
        #[arg(long, default_value_t = gridsolve_core::powerflow::DEFAULT_MAX_ITERATIONS)]
        max_iter: usize,

        /// Print the annotated network as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Built-in test functions for root finding.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Function {
    /// 5cos²(x) - 3sin(3x)
    Trig,
    /// x³ - 2x - 5
    Cubic,
}

impl Function {
    fn eval(self, x: f64) -> f64 {
        match self {
            Function::Trig => 5.0 * x.cos().powi(2) - 3.0 * (3.0 * x).sin(),
            Function::Cubic => x.powi(3) - 2.0 * x - 5.0,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Linear {
            file,
            method,
            tol,
            max_iter,
            pivot,
        } => {
            let system = read_linear_system_file(&file)?;
            let pivoting = if pivot { Pivoting::Partial } else { Pivoting::None };
            let solver = LinearSolver::new()
                .with_tolerance(tol)
                .with_max_iterations(max_iter)
                .with_pivoting(pivoting);

            println!("{}", system.a());
            let methods = method.map_or(LinearMethod::ALL.to_vec(), |m| vec![m]);
            for method in methods {
                let solution = solver.solve(&system, method)?;
                println!(
                    "{:<14} x = {}  iterations = {:<4} residual = {:.2e}  converged = {}",
                    method,
                    solution.x,
                    solution.state.iterations,
                    solution.state.residual,
                    solution.state.converged
                );
            }
        }

        Command::Roots {
            function,
            x0,
            x1,
            method,
            tol,
            max_iter,
        } => {
            let finder = RootFinder::with_config(tol, max_iter);
            let methods = method.map_or(RootMethod::ALL.to_vec(), |m| vec![m]);
            for method in methods {
                let solution = finder.find(|x| function.eval(x), x0, x1, method)?;
                println!(
                    "{:<16} x = {:<22} iterations = {:<4} |f(x)| = {:.2e}  converged = {}",
                    method,
                    solution.root,
                    solution.state.iterations,
                    function.eval(solution.root).abs(),
                    solution.state.converged
                );
            }
        }

        Command::Dc { case, json } => {
            let network = read_network_file(&case)?;
            let solution = dc_power_flow(&network, &PowerFlowConfig::default())?;
            print_solution(&solution, json)?;
        }

        Command::Ac {
            case,
            tol,
            max_iter,
            json,
        } => {
            let network = read_network_file(&case)?;
            let config = PowerFlowConfig::default()
                .with_tolerance(tol)
                .with_max_iterations(max_iter);
            let solution = ac_power_flow(&network, &config)?;
            print_solution(&solution, json)?;
        }
    }

    Ok(())
}

fn print_solution(solution: &PowerFlowSolution, json: bool) -> Result<()> {
    if json {
        let (buses, branches) = solution.network.clone().into_parts();
        let value = serde_json::json!({ "buses": buses, "branches": branches });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "Status: {} after {} iterations (mismatch {:.2e})",
        solution.status, solution.state.iterations, solution.state.residual
    );
    print_network(&solution.network);
    Ok(())
}

fn print_network(network: &Network) {
    println!();
    println!(
        "{:>4} {:>6} {:>10} {:>10} {:>9} {:>10}",
        "Bus", "Type", "P (pu)", "Q (pu)", "V (pu)", "Angle (°)"
    );
    for bus in network.buses() {
        println!(
            "{:>4} {:>6} {:>10.4} {:>10.4} {:>9.4} {:>10.4}",
            bus.id, bus.kind, bus.p, bus.q, bus.voltage, bus.angle
        );
    }

    println!();
    println!(
        "{:>4} {:>4} {:>12} {:>12}",
        "From", "To", "P flow (pu)", "Q flow (pu)"
    );
    for branch in network.branches() {
        let q = branch
            .q_flow
            .map_or_else(|| "-".to_string(), |q| format!("{:.4}", q));
        println!(
            "{:>4} {:>4} {:>12.4} {:>12}",
            branch.from,
            branch.to,
            branch.p_flow.unwrap_or(0.0),
            q
        );
    }
}
