//! Operator configuration of the protocol versions a node offers.
//!
//! ```toml
//! [[application]]
//! identifier = "raft"
//! versions = [1, 2]
//!
//! [[modifier]]
//! identifier = "compression"
//! ```

use std::collections::BTreeSet;
use std::fs::{read_to_string, write};

use camino::Utf8Path;
use eyre::{Result as EyreResult, WrapErr};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::Protocol;
use crate::repository::ProtocolRepository;
use crate::selection::{Negotiator, SupportedProtocols};

pub const HANDSHAKE_CONFIG_FILE: &str = "handshake.toml";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("identifier `{identifier}` configured more than once in `{section}`")]
    DuplicateIdentifier {
        section: &'static str,
        identifier: String,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[non_exhaustive]
pub struct HandshakeConfig {
    #[serde(default)]
    pub application: Vec<SupportedProtocols>,
    #[serde(default)]
    pub modifier: Vec<SupportedProtocols>,
}

impl HandshakeConfig {
    #[must_use]
    pub const fn new(
        application: Vec<SupportedProtocols>,
        modifier: Vec<SupportedProtocols>,
    ) -> Self {
        Self {
            application,
            modifier,
        }
    }

    #[must_use]
    pub fn exists(dir: &Utf8Path) -> bool {
        dir.join(HANDSHAKE_CONFIG_FILE).is_file()
    }

    pub fn load(dir: &Utf8Path) -> EyreResult<Self> {
        let path = dir.join(HANDSHAKE_CONFIG_FILE);
        let content = read_to_string(&path)
            .wrap_err_with(|| format!("failed to read handshake configuration from {path:?}"))?;

        Self::from_toml_str(&content)
    }

    pub fn save(&self, dir: &Utf8Path) -> EyreResult<()> {
        let path = dir.join(HANDSHAKE_CONFIG_FILE);
        let content = toml::to_string_pretty(self)?;

        write(&path, content)
            .wrap_err_with(|| format!("failed to write handshake configuration to {path:?}"))?;

        Ok(())
    }

    pub fn from_toml_str(content: &str) -> EyreResult<Self> {
        let config: Self =
            toml::from_str(content).wrap_err("failed to parse handshake configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Rejects sections that list the same identifier twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unique("application", &self.application)?;
        check_unique("modifier", &self.modifier)
    }

    #[must_use]
    pub fn application_negotiator<'a, P: Protocol>(
        &'a self,
        repository: &'a ProtocolRepository<P>,
    ) -> Negotiator<'a, P> {
        Negotiator::new(repository, &self.application)
    }

    #[must_use]
    pub fn modifier_negotiator<'a, P: Protocol>(
        &'a self,
        repository: &'a ProtocolRepository<P>,
    ) -> Negotiator<'a, P> {
        Negotiator::new(repository, &self.modifier)
    }
}

fn check_unique(
    section: &'static str,
    entries: &[SupportedProtocols],
) -> Result<(), ConfigError> {
    let mut seen = BTreeSet::new();

    for entry in entries {
        if !seen.insert(entry.identifier.as_str()) {
            return Err(ConfigError::DuplicateIdentifier {
                section,
                identifier: entry.identifier.clone(),
            });
        }
    }

    Ok(())
}
