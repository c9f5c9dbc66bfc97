use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::TopologyError;
use crate::ip::Address;
use crate::topology::Network;

/// Scenario configuration: named networks and the steps applied to them
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    pub networks: Vec<NetworkDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
}

/// General settings
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// A named network, built either from bracket notation or as a star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bracket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Address>>,
}

impl NetworkDefinition {
    /// Construct the network this definition describes
    pub fn build(&self) -> Result<Network, TopologyError> {
        match (&self.bracket, self.root, &self.children) {
            (Some(notation), None, None) => Network::from_bracket_notation(notation),
            (None, Some(root), Some(children)) => Network::new(root, children),
            _ => Err(TopologyError::InvalidArgument(format!(
                "network '{}' must define either 'bracket' or 'root' with 'children'",
                self.name
            ))),
        }
    }
}

/// One operation applied to a named network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    List { network: String },
    Contains { network: String, address: Address },
    Height { network: String, root: Address },
    Levels { network: String, root: Address },
    Route { network: String, from: Address, to: Address },
    Print { network: String, root: Address },
    Connect { network: String, a: Address, b: Address },
    Disconnect { network: String, a: Address, b: Address },
    Add { network: String, other: String },
}

impl Step {
    /// Name of the operation as written in the scenario file
    pub fn op(&self) -> &'static str {
        match self {
            Step::List { .. } => "list",
            Step::Contains { .. } => "contains",
            Step::Height { .. } => "height",
            Step::Levels { .. } => "levels",
            Step::Route { .. } => "route",
            Step::Print { .. } => "print",
            Step::Connect { .. } => "connect",
            Step::Disconnect { .. } => "disconnect",
            Step::Add { .. } => "add",
        }
    }

    /// The network the step operates on
    pub fn network(&self) -> &str {
        match self {
            Step::List { network }
            | Step::Contains { network, .. }
            | Step::Height { network, .. }
            | Step::Levels { network, .. }
            | Step::Route { network, .. }
            | Step::Print { network, .. }
            | Step::Connect { network, .. }
            | Step::Disconnect { network, .. }
            | Step::Add { network, .. } => network,
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(level) = &self.general.log_level {
            if level.parse::<LevelFilter>().is_err() {
                return Err(ValidationError::InvalidGeneral(format!(
                    "unknown log_level '{}'",
                    level
                )));
            }
        }

        if self.networks.is_empty() {
            return Err(ValidationError::InvalidNetwork(
                "at least one network must be defined".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for definition in &self.networks {
            if definition.name.is_empty() {
                return Err(ValidationError::InvalidNetwork(
                    "network name cannot be empty".to_string(),
                ));
            }
            if !names.insert(definition.name.as_str()) {
                return Err(ValidationError::InvalidNetwork(format!(
                    "network '{}' is defined more than once",
                    definition.name
                )));
            }
            Self::validate_definition(definition)?;
        }

        for (index, step) in self.steps.iter().enumerate() {
            if !names.contains(step.network()) {
                return Err(ValidationError::InvalidStep(format!(
                    "step {} ({}) refers to unknown network '{}'",
                    index + 1,
                    step.op(),
                    step.network()
                )));
            }
            if let Step::Add { other, .. } = step {
                if !names.contains(other.as_str()) {
                    return Err(ValidationError::InvalidStep(format!(
                        "step {} (add) refers to unknown network '{}'",
                        index + 1,
                        other
                    )));
                }
            }
        }

        Ok(())
    }

    /// Validate that a definition uses exactly one construction form
    fn validate_definition(definition: &NetworkDefinition) -> Result<(), ValidationError> {
        let name = &definition.name;
        match (&definition.bracket, &definition.root, &definition.children) {
            (Some(notation), None, None) => {
                if notation.trim().is_empty() {
                    return Err(ValidationError::InvalidNetwork(format!(
                        "bracket notation of network '{}' cannot be empty",
                        name
                    )));
                }
            }
            (None, Some(_), Some(children)) => {
                if children.is_empty() {
                    return Err(ValidationError::InvalidNetwork(format!(
                        "children of network '{}' cannot be empty",
                        name
                    )));
                }
            }
            (Some(_), _, _) => {
                return Err(ValidationError::InvalidNetwork(format!(
                    "network '{}' mixes 'bracket' with 'root'/'children'",
                    name
                )));
            }
            _ => {
                return Err(ValidationError::InvalidNetwork(format!(
                    "network '{}' needs either 'bracket' or both 'root' and 'children'",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid step: {0}")]
    InvalidStep(String),
}
