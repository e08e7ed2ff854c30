//! PBVI command line solver.
//!
//! Usage:
//!   cargo run --release --bin pbvi -- solve [OPTIONS]
//!   cargo run --release --bin pbvi -- validate --model <FILE>
//!
//! Without `--model` the built-in tiger problem is solved.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pbvi_solver::models::tabular::TabularPomdp;
use pbvi_solver::models::tiger::tiger_pomdp;
use pbvi_solver::pomdp::{
    BeliefState, ExpansionRule, Horizon, PbviConfig, PbviSolver, PbviStats, Pomdp, ValueIteration,
};

#[derive(Parser)]
#[command(name = "pbvi")]
#[command(version)]
#[command(about = "Point-based value iteration for finite POMDPs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a model and write the policy as JSON
    Solve {
        /// Model JSON file (default: the tiger problem)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Solver configuration JSON file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Finite horizon length for the tiger problem
        #[arg(long, conflicts_with = "model")]
        horizon: Option<usize>,

        /// Discount factor for the tiger problem
        #[arg(long, default_value = "0.95", conflicts_with = "model")]
        discount: f64,

        /// Expansion rule, e.g. random_belief_selection
        #[arg(short, long)]
        rule: Option<ExpansionRule>,

        /// Sweeps per expansion round
        #[arg(short, long)]
        updates: Option<usize>,

        /// Number of expansion rounds
        #[arg(short, long)]
        expansions: Option<usize>,

        /// Derive the sweep count from this convergence threshold
        #[arg(long, conflicts_with = "updates")]
        epsilon: Option<f64>,

        /// Number of threads (0 or 1: sequential; default: all cores)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Random seed
        #[arg(short, long)]
        seed: Option<u64>,

        /// Use exact value iteration instead of PBVI
        #[arg(long)]
        exact: bool,

        /// Output file
        #[arg(short, long, default_value = "policy.json")]
        output: PathBuf,
    },

    /// Check that a model file is a valid POMDP
    Validate {
        /// Model JSON file
        #[arg(short, long)]
        model: PathBuf,
    },
}

fn setup_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_model(path: Option<&PathBuf>, horizon: Option<usize>, discount: f64) -> Result<TabularPomdp> {
    match path {
        Some(path) => TabularPomdp::from_json_file(path)
            .with_context(|| format!("Failed to load model from {:?}", path)),
        None => {
            let horizon = match horizon {
                Some(length) => Horizon::finite(length),
                None => Horizon::infinite(discount),
            };
            let model = tiger_pomdp(horizon);
            model.validate()?;
            Ok(model)
        }
    }
}

/// Uniform belief plus one point belief per state.
fn default_beliefs(num_states: usize) -> Vec<BeliefState> {
    let mut beliefs = vec![BeliefState::uniform(num_states)];
    beliefs.extend((0..num_states).map(|s| BeliefState::point(num_states, s)));
    beliefs
}

fn total_sweeps(horizon: Horizon, config: &PbviConfig) -> u64 {
    match horizon.length() {
        Some(length) => length as u64,
        None => (config.effective_update_iterations() as u64)
            .saturating_mul(config.effective_expansion_iterations() as u64),
    }
}

fn print_summary<M: Pomdp>(model: &M, policy: &pbvi_solver::PolicyAlphaVectors) {
    let uniform = BeliefState::uniform(model.num_states());
    println!();
    println!("Stages:  {}", policy.num_stages());
    println!("Vectors: {}", policy.num_vectors());
    if let Some(value) = policy.value(&uniform) {
        println!("Value at uniform belief: {:.4}", value);
    }
    if let Some(action) = policy.action_for_time_step(&uniform, 0) {
        println!("First action at uniform belief: {}", model.action_name(action));
    }
}

#[allow(clippy::too_many_arguments)]
fn run_solve(
    model_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    horizon: Option<usize>,
    discount: f64,
    rule: Option<ExpansionRule>,
    updates: Option<usize>,
    expansions: Option<usize>,
    epsilon: Option<f64>,
    threads: Option<usize>,
    seed: Option<u64>,
    exact: bool,
    output: PathBuf,
) -> Result<()> {
    let model = load_model(model_path.as_ref(), horizon, discount)?;
    let model_horizon = model.horizon();

    info!(
        states = model.num_states(),
        actions = model.num_actions(),
        observations = model.num_observations(),
        horizon = %model_horizon,
        "Model loaded"
    );

    let start_time = Instant::now();

    let policy = if exact {
        let iterations = updates.unwrap_or(10);
        ValueIteration::new(iterations)
            .solve(&model)
            .context("Value iteration failed")?
    } else {
        let mut config = match &config_path {
            Some(path) => PbviConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => PbviConfig::default(),
        };
        if let Some(rule) = rule {
            config = config.with_expansion_rule(rule);
        }
        if let Some(updates) = updates {
            config = config.with_update_iterations(updates);
        }
        if let Some(expansions) = expansions {
            config = config.with_expansion_iterations(expansions);
        }
        if let Some(threads) = threads {
            config = config.with_threads(threads);
        }
        if let Some(seed) = seed {
            config = config.with_seed(seed);
        }

        let mut solver = PbviSolver::new(config);
        if let Some(epsilon) = epsilon {
            let updates = solver
                .compute_update_iterations(&model, epsilon)
                .context("Cannot derive update count")?;
            info!(epsilon, updates, "Derived sweep count");
        }
        solver.set_initial_beliefs(default_beliefs(model.num_states()));

        let total = total_sweeps(model_horizon, solver.config());
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} sweeps {msg}")
                .context("Invalid progress template")?
                .progress_chars("##-"),
        );

        let result = solver.solve_with_callback(&model, |stats: &PbviStats| {
            pb.set_position(stats.sweeps);
            pb.set_message(format!(
                "| beliefs {} | vectors {}",
                stats.belief_points, stats.gamma_size
            ));
        });
        pb.finish_and_clear();
        let policy = result.context("PBVI solve failed")?;

        let stats = solver.stats();
        info!(
            sweeps = stats.sweeps,
            expansions = stats.expansions,
            beliefs = stats.belief_points,
            sweeps_per_second = stats.sweeps_per_second,
            "Solve complete"
        );
        policy
    };

    println!("Total time: {:.2}s", start_time.elapsed().as_secs_f64());
    print_summary(&model, &policy);

    policy
        .save_json(&output)
        .with_context(|| format!("Failed to write policy to {:?}", output))?;
    println!("Policy saved to {}", output.display());

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            model,
            config,
            horizon,
            discount,
            rule,
            updates,
            expansions,
            epsilon,
            threads,
            seed,
            exact,
            output,
        } => run_solve(
            model, config, horizon, discount, rule, updates, expansions, epsilon, threads, seed,
            exact, output,
        ),

        Commands::Validate { model } => {
            let model = TabularPomdp::from_json_file(&model)
                .with_context(|| format!("Failed to load model from {:?}", model))?;
            info!("Model is valid");
            info!("  States:       {}", model.num_states());
            info!("  Actions:      {}", model.num_actions());
            info!("  Observations: {}", model.num_observations());
            info!("  Horizon:      {}", model.horizon());
            info!(
                "  Rewards:      [{}, {}]",
                model.reward_min(),
                model.reward_max()
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_sweeps_saturates() {
        let config = PbviConfig::new()
            .with_update_iterations(usize::MAX)
            .with_expansion_iterations(usize::MAX);
        assert_eq!(total_sweeps(Horizon::infinite(0.95), &config), u64::MAX);
        assert_eq!(total_sweeps(Horizon::finite(4), &config), 4);

        let config = PbviConfig::new()
            .with_update_iterations(10)
            .with_expansion_iterations(3);
        assert_eq!(total_sweeps(Horizon::infinite(0.95), &config), 30);
    }
}
