use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::algorithm::BoundaryNodeRule;
use crate::error::ModelError;
use crate::index::DEFAULT_NODE_CAPACITY;

/// Strategy used to find candidate segment pairs while noding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectorKind {
    /// Monotone chains indexed in an STR tree.
    #[default]
    StrTree,
    /// Every segment against every other segment.
    Simple,
}

impl IntersectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrTree => "str_tree",
            Self::Simple => "simple",
        }
    }
}

impl fmt::Display for IntersectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntersectorKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "str_tree" | "strtree" => Ok(Self::StrTree),
            "simple" => Ok(Self::Simple),
            other => Err(ModelError::Config(format!("unknown intersector: {other}"))),
        }
    }
}

/// Tunables shared by the index, the noder and the relate engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Maximum number of children per STR tree node.
    pub node_capacity: usize,
    /// Decides which endpoints of linear components lie on the boundary.
    pub boundary_node_rule: BoundaryNodeRule,
    pub intersector: IntersectorKind,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            node_capacity: DEFAULT_NODE_CAPACITY,
            boundary_node_rule: BoundaryNodeRule::default(),
            intersector: IntersectorKind::default(),
        }
    }
}

impl TopologyConfig {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.node_capacity < 2 {
            return Err(ModelError::InvalidNodeCapacity(self.node_capacity));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.  Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let config: TopologyConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
