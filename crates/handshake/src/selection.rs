//! Version proposals exchanged during the handshake and the operator
//! restrictions applied to them.

use std::collections::BTreeSet;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::protocol::{Protocol, Version};
use crate::repository::ProtocolRepository;

/// The versions a node proposes for one protocol identifier.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct ProtocolSelection {
    pub identifier: String,
    pub versions: BTreeSet<Version>,
}

impl ProtocolSelection {
    #[must_use]
    pub fn new(identifier: impl Into<String>, versions: BTreeSet<Version>) -> Self {
        Self {
            identifier: identifier.into(),
            versions,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Newest proposed version.
    #[must_use]
    pub fn highest(&self) -> Option<Version> {
        self.versions.last().copied()
    }
}

/// Operator restriction on the versions offered and accepted for an identifier.
///
/// An empty `versions` list permits every registered version.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedProtocols {
    pub identifier: String,
    #[serde(default)]
    pub versions: Vec<Version>,
}

impl SupportedProtocols {
    #[must_use]
    pub fn new(identifier: impl Into<String>, versions: Vec<Version>) -> Self {
        Self {
            identifier: identifier.into(),
            versions,
        }
    }

    /// Permits every registered version of `identifier`.
    #[must_use]
    pub fn all(identifier: impl Into<String>) -> Self {
        Self::new(identifier, Vec::new())
    }

    #[must_use]
    pub fn permits(&self, version: Version) -> bool {
        self.versions.is_empty() || self.versions.contains(&version)
    }
}

/// Answers a peer's proposal using the local repository and the node's
/// configured restrictions.
///
/// Identifiers without a [`SupportedProtocols`] entry are unrestricted.
#[derive(Clone, Copy, Debug)]
pub struct Negotiator<'a, P> {
    repository: &'a ProtocolRepository<P>,
    supported: &'a [SupportedProtocols],
}

impl<'a, P: Protocol> Negotiator<'a, P> {
    #[must_use]
    pub const fn new(
        repository: &'a ProtocolRepository<P>,
        supported: &'a [SupportedProtocols],
    ) -> Self {
        Self {
            repository,
            supported,
        }
    }

    fn restriction(&self, identifier: &str) -> Option<&'a SupportedProtocols> {
        self.supported
            .iter()
            .find(|entry| entry.identifier == identifier)
    }

    /// What this node offers for `identifier`.
    #[must_use]
    pub fn proposal(&self, identifier: &str) -> ProtocolSelection {
        let supported = self
            .restriction(identifier)
            .map(|entry| entry.versions.as_slice())
            .unwrap_or_default();

        self.repository.get_all(identifier, supported)
    }

    /// Highest protocol that the peer proposed and this node both implements
    /// and is configured to accept.
    #[must_use]
    pub fn negotiate(&self, peer: &ProtocolSelection) -> Option<&'a P> {
        let restriction = self.restriction(&peer.identifier);

        let candidates = peer
            .versions
            .iter()
            .filter(|version| restriction.map_or(true, |entry| entry.permits(**version)));

        let negotiated = self
            .repository
            .select_highest(&peer.identifier, candidates);

        if negotiated.is_none() {
            debug!(
                identifier = %peer.identifier,
                proposed = ?peer.versions,
                "Negotiation failed, no acceptable version"
            );
        }

        negotiated
    }
}
