//! Scenario runner.
//!
//! Builds every network a [`Config`] defines and applies its steps in order,
//! recording one outcome per step. Construction failures abort the run;
//! mutations that are refused are ordinary outcomes, not errors.

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::config::{Config, Step};
use crate::ip::Address;
use crate::topology::Network;

/// Result of a single step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Nodes(Vec<Address>),
    Contains(bool),
    Height(usize),
    Levels(Vec<Vec<Address>>),
    Route(Vec<Address>),
    Notation(String),
    Applied(bool),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Nodes(nodes) | Outcome::Route(nodes) => write!(f, "{}", join(nodes)),
            Outcome::Contains(found) | Outcome::Applied(found) => write!(f, "{}", found),
            Outcome::Height(height) => write!(f, "{}", height),
            Outcome::Levels(levels) => {
                let groups: Vec<String> = levels.iter().map(|level| format!("[{}]", join(level))).collect();
                write!(f, "{}", groups.join(" "))
            }
            Outcome::Notation(notation) => write!(f, "{}", notation),
        }
    }
}

fn join(addresses: &[Address]) -> String {
    addresses.iter().map(Address::to_string).collect::<Vec<_>>().join(" ")
}

/// One executed step
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub op: String,
    pub network: String,
    pub outcome: Outcome,
}

/// Everything a scenario run produced
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub steps: Vec<StepOutcome>,
    /// Final bracket notation of every network, rendered from its lowest address
    pub networks: BTreeMap<String, String>,
}

/// Build the networks of `config` and run its steps
pub fn run(config: &Config) -> Result<ScenarioReport> {
    let mut networks = build_networks(config)?;

    let mut steps = Vec::with_capacity(config.steps.len());
    for (index, step) in config.steps.iter().enumerate() {
        let outcome = apply(&mut networks, step)
            .wrap_err_with(|| format!("Step {} ({}) failed", index + 1, step.op()))?;
        debug!("Step {} {} on '{}': {}", index + 1, step.op(), step.network(), outcome);
        steps.push(StepOutcome {
            index: index + 1,
            op: step.op().to_string(),
            network: step.network().to_string(),
            outcome,
        });
    }

    let networks = networks
        .iter()
        .map(|(name, network)| {
            let notation = network
                .list()
                .first()
                .map(|&root| network.to_bracket_notation(root))
                .unwrap_or_default();
            (name.clone(), notation)
        })
        .collect();

    info!("Scenario completed: {} steps applied", steps.len());
    Ok(ScenarioReport { steps, networks })
}

/// Construct every defined network, keyed by name
pub fn build_networks(config: &Config) -> Result<BTreeMap<String, Network>> {
    let mut networks = BTreeMap::new();
    for definition in &config.networks {
        let network = definition
            .build()
            .wrap_err_with(|| format!("Failed to build network '{}'", definition.name))?;
        info!("Built network '{}' with {} nodes", definition.name, network.len());
        networks.insert(definition.name.clone(), network);
    }
    Ok(networks)
}

fn lookup<'a>(networks: &'a BTreeMap<String, Network>, name: &str) -> Result<&'a Network> {
    networks.get(name).ok_or_else(|| eyre!("Unknown network '{}'", name))
}

fn lookup_mut<'a>(networks: &'a mut BTreeMap<String, Network>, name: &str) -> Result<&'a mut Network> {
    networks.get_mut(name).ok_or_else(|| eyre!("Unknown network '{}'", name))
}

/// Apply a single step
pub fn apply(networks: &mut BTreeMap<String, Network>, step: &Step) -> Result<Outcome> {
    let outcome = match step {
        Step::List { network } => Outcome::Nodes(lookup(networks, network)?.list()),
        Step::Contains { network, address } => {
            Outcome::Contains(lookup(networks, network)?.contains(*address))
        }
        Step::Height { network, root } => Outcome::Height(lookup(networks, network)?.height(*root)),
        Step::Levels { network, root } => Outcome::Levels(lookup(networks, network)?.levels(*root)),
        Step::Route { network, from, to } => {
            Outcome::Route(lookup(networks, network)?.route(*from, *to))
        }
        Step::Print { network, root } => {
            Outcome::Notation(lookup(networks, network)?.to_bracket_notation(*root))
        }
        Step::Connect { network, a, b } => {
            Outcome::Applied(lookup_mut(networks, network)?.connect(*a, *b))
        }
        Step::Disconnect { network, a, b } => {
            Outcome::Applied(lookup_mut(networks, network)?.disconnect(*a, *b))
        }
        Step::Add { network, other } => {
            let other = lookup(networks, other)?.clone();
            Outcome::Applied(lookup_mut(networks, network)?.add(&other))
        }
    };
    Ok(outcome)
}
