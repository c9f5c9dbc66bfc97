use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use nettree::{config_loader, scenario, Address, Network};

/// Build, query and merge tree-shaped IPv4 network topologies
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a YAML scenario of networks and steps
    Run {
        /// Path to the scenario file
        #[arg(short, long)]
        config: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show nodes, height and levels of a tree
    Inspect {
        /// Tree in bracket notation
        #[arg(short, long)]
        tree: String,

        /// Node to look from (defaults to the lowest address)
        #[arg(short, long)]
        root: Option<Address>,
    },
    /// Print the route between two nodes of a tree
    Route {
        /// Tree in bracket notation
        #[arg(short, long)]
        tree: String,

        #[arg(long)]
        from: Address,

        #[arg(long)]
        to: Address,
    },
}

fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();
}

fn parse_tree(tree: &str) -> Result<Network> {
    Network::from_bracket_notation(tree).wrap_err_with(|| format!("Invalid tree '{}'", tree))
}

fn join(addresses: &[Address]) -> String {
    addresses.iter().map(Address::to_string).collect::<Vec<_>>().join(" ")
}

fn run_scenario(config: PathBuf, json: bool) -> Result<()> {
    let level = config_loader::peek_log_level(&config);
    init_logging(level.as_deref().unwrap_or("info"));
    let config = config_loader::load_config(&config)?;
    info!(
        "Loaded scenario with {} networks and {} steps",
        config.networks.len(),
        config.steps.len()
    );

    let report = scenario::run(&config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for step in &report.steps {
        println!("{:>3} {:<10} {:<12} {}", step.index, step.op, step.network, step.outcome);
    }
    for (name, notation) in &report.networks {
        println!("{}: {}", name, notation);
    }
    Ok(())
}

fn inspect(tree: &str, root: Option<Address>) -> Result<()> {
    let network = parse_tree(tree)?;
    let root = match root {
        Some(root) if network.contains(root) => root,
        Some(root) => return Err(eyre!("Node {} is not part of the tree", root)),
        None => network
            .list()
            .first()
            .copied()
            .ok_or_else(|| eyre!("Tree has no nodes"))?,
    };

    println!("nodes:  {}", join(&network.list()));
    println!("height: {}", network.height(root));
    for (depth, level) in network.levels(root).iter().enumerate() {
        println!("level {}: {}", depth, join(level));
    }
    println!("tree:   {}", network.to_bracket_notation(root));
    Ok(())
}

fn route(tree: &str, from: Address, to: Address) -> Result<()> {
    let network = parse_tree(tree)?;
    let path = network.route(from, to);
    if path.is_empty() {
        return Err(eyre!("No route from {} to {}", from, to));
    }
    println!("{}", join(&path));
    Ok(())
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    match args.command {
        Command::Run { config, json } => run_scenario(config, json),
        Command::Inspect { tree, root } => {
            init_logging("info");
            inspect(&tree, root)
        }
        Command::Route { tree, from, to } => {
            init_logging("info");
            route(&tree, from, to)
        }
    }
}
