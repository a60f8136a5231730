//! Small closed vocabularies used throughout the host.
//!
//! Every type here parses from and displays as the exact strings that appear
//! in configuration files, log lines and CLI flags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ============================================================================
// BuildMode
// ============================================================================

/// Build mode of the current run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Development,
    Production,
}

impl BuildMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown build mode '{other}' (expected development or production)"
            ))),
        }
    }
}

// ============================================================================
// BuildTarget
// ============================================================================

/// What a configuration is being resolved for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
    /// Browser bundle.
    #[default]
    Web,
    /// Server-side render bundle.
    Node,
    /// Component workbench bundle.
    Storybook,
}

impl BuildTarget {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Node => "node",
            Self::Storybook => "storybook",
        }
    }

    /// Targets that run in a browser.
    pub const fn is_browser(self) -> bool {
        matches!(self, Self::Web | Self::Storybook)
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildTarget {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "web" | "client" => Ok(Self::Web),
            "node" | "server" => Ok(Self::Node),
            "storybook" => Ok(Self::Storybook),
            other => Err(DomainError::InvalidConfig(format!(
                "unknown build target '{other}' (expected web, node or storybook)"
            ))),
        }
    }
}

// ============================================================================
// Provenance
// ============================================================================

/// Where a plugin came from.
///
/// Tiers are applied in declaration order, so the first tier that registers
/// a plugin name owns it for the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provenance {
    /// Shipped with the tool.
    BuildIn,
    /// Declared in the project configuration.
    Custom,
    /// Installed machine-wide through `plugin add`.
    Global,
}

impl Provenance {
    pub const ALL: [Provenance; 3] = [Self::BuildIn, Self::Custom, Self::Global];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BuildIn => "build-in",
            Self::Custom => "custom",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DependencyScope
// ============================================================================

/// Which manifest dependency maps a dependency query looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DependencyScope {
    #[default]
    All,
    Prod,
    Dev,
}

impl fmt::Display for DependencyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Prod => write!(f, "prod"),
            Self::Dev => write!(f, "dev"),
        }
    }
}

impl FromStr for DependencyScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "prod" => Ok(Self::Prod),
            "dev" => Ok(Self::Dev),
            other => Err(DomainError::UnknownScope(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parses_known_values() {
        assert_eq!("all".parse::<DependencyScope>().unwrap(), DependencyScope::All);
        assert_eq!("prod".parse::<DependencyScope>().unwrap(), DependencyScope::Prod);
        assert_eq!("dev".parse::<DependencyScope>().unwrap(), DependencyScope::Dev);
    }

    #[test]
    fn scope_rejects_everything_else() {
        let err = "peer".parse::<DependencyScope>().unwrap_err();
        assert_eq!(err, DomainError::UnknownScope("peer".into()));
        // exact match only
        assert!("Dev".parse::<DependencyScope>().is_err());
    }

    #[test]
    fn provenance_labels() {
        assert_eq!(Provenance::BuildIn.to_string(), "build-in");
        assert_eq!(Provenance::Custom.to_string(), "custom");
        assert_eq!(Provenance::Global.to_string(), "global");
    }

    #[test]
    fn mode_and_target_round_trip_through_strings() {
        assert_eq!("production".parse::<BuildMode>().unwrap(), BuildMode::Production);
        assert_eq!(BuildMode::default().to_string(), "development");
        assert_eq!("server".parse::<BuildTarget>().unwrap(), BuildTarget::Node);
        assert!("desktop".parse::<BuildTarget>().is_err());
    }
}
