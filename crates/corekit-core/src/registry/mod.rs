//! Platform registry and name resolution
//!
//! The registry holds every buildable platform configuration together with
//! the named groups that expand to filtered subsets of it. Resolution keeps
//! registry insertion order, so the same registry always yields the same
//! expansion.

mod data;

pub use data::{PLATFORM_GROUPS, PLATFORM_REGISTRY};

use crate::error::{Error, Result};
use crate::types::{PlatformConfig, ProtocolStack};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Predicate over `(protocol_stack, prebuild, ai_capable)`
///
/// Unset fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlatformFilter {
    pub protocol_stack: Option<ProtocolStack>,
    pub prebuild: Option<bool>,
    pub ai_capable: Option<bool>,
}

impl PlatformFilter {
    /// Check whether a platform satisfies the filter
    pub fn matches(&self, platform: &PlatformConfig) -> bool {
        self.protocol_stack
            .map_or(true, |stack| platform.protocol_stack == stack)
            && self.prebuild.map_or(true, |prebuild| platform.prebuild == prebuild)
            && self
                .ai_capable
                .map_or(true, |ai_capable| platform.ai_capable == ai_capable)
    }
}

/// Named meta-entry expanding to a filtered subset of the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformGroup {
    /// Group name (e.g., "matter_precomp_all")
    pub name: &'static str,

    /// Human-readable description
    pub description: &'static str,

    /// Filter selecting the group's members
    pub filter: PlatformFilter,
}

/// What to do when a group expands to no platforms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyGroupPolicy {
    /// Treat the empty expansion as a successful no-op
    #[default]
    Allow,
    /// Fail with [`Error::EmptyGroup`]
    Reject,
}

/// Result of resolving a name against the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// A single platform configuration
    Single(&'a PlatformConfig),
    /// A group expansion, in registry order
    Group {
        group: &'a PlatformGroup,
        platforms: Vec<&'a PlatformConfig>,
    },
}

impl<'a> Resolution<'a> {
    /// Platforms to process, in order
    pub fn platforms(&self) -> Vec<&'a PlatformConfig> {
        match self {
            Self::Single(platform) => vec![*platform],
            Self::Group { platforms, .. } => platforms.clone(),
        }
    }
}

/// Validated collection of platform configurations and groups
#[derive(Debug, Clone)]
pub struct Registry {
    platforms: Vec<PlatformConfig>,
    groups: Vec<PlatformGroup>,
}

impl Registry {
    /// Build a registry, checking the data-model invariants
    ///
    /// Names must be unique across platforms and groups, and a platform
    /// carries Matter settings exactly when its stack is Matter.
    pub fn new(platforms: Vec<PlatformConfig>, groups: Vec<PlatformGroup>) -> Result<Self> {
        let mut seen = HashSet::new();

        for group in &groups {
            if !seen.insert(group.name) {
                return Err(Error::DuplicatePlatform {
                    name: group.name.to_string(),
                });
            }
        }

        for platform in &platforms {
            if !seen.insert(platform.name) {
                return Err(Error::DuplicatePlatform {
                    name: platform.name.to_string(),
                });
            }

            match (platform.is_matter(), platform.matter.is_some()) {
                (true, false) => {
                    return Err(Error::invalid_platform(
                        platform.name,
                        "matter protocol stack requires matter settings",
                    ))
                }
                (false, true) => {
                    return Err(Error::invalid_platform(
                        platform.name,
                        "matter settings given for a non-matter protocol stack",
                    ))
                }
                _ => {}
            }
        }

        debug!(
            "Registry built with {} platforms and {} groups",
            platforms.len(),
            groups.len()
        );

        Ok(Self { platforms, groups })
    }

    /// The built-in registry shipped with corekit
    pub fn builtin() -> Result<Self> {
        Self::new(PLATFORM_REGISTRY.to_vec(), PLATFORM_GROUPS.to_vec())
    }

    /// All platforms in insertion order
    pub fn platforms(&self) -> &[PlatformConfig] {
        &self.platforms
    }

    /// All groups in insertion order
    pub fn groups(&self) -> &[PlatformGroup] {
        &self.groups
    }

    /// Get a platform by name
    pub fn get(&self, name: &str) -> Option<&PlatformConfig> {
        self.platforms.iter().find(|p| p.name == name)
    }

    /// Every resolvable name, groups first, then platforms
    pub fn names(&self) -> Vec<String> {
        self.groups
            .iter()
            .map(|g| g.name.to_string())
            .chain(self.platforms.iter().map(|p| p.name.to_string()))
            .collect()
    }

    /// Expand a filter over the registry, preserving insertion order
    pub fn filter(&self, filter: &PlatformFilter) -> Vec<&PlatformConfig> {
        self.platforms.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Resolve a platform or group name
    pub fn resolve(&self, name: &str, policy: EmptyGroupPolicy) -> Result<Resolution<'_>> {
        if let Some(group) = self.groups.iter().find(|g| g.name == name) {
            let platforms = self.filter(&group.filter);
            debug!("Group '{}' expanded to {} platforms", name, platforms.len());

            if platforms.is_empty() && policy == EmptyGroupPolicy::Reject {
                return Err(Error::EmptyGroup {
                    group: name.to_string(),
                });
            }

            return Ok(Resolution::Group { group, platforms });
        }

        self.get(name)
            .map(Resolution::Single)
            .ok_or_else(|| Error::PlatformNotFound {
                name: name.to_string(),
                available: self.names(),
            })
    }
}
