//! Immutable catalog of locally implemented protocols.
//!
//! The repository is built once at startup from the full list of protocols
//! the node implements and answers version selection queries for the
//! handshake layer. It is never mutated after construction, so a single
//! instance can be shared across concurrent handshake sessions.

use core::borrow::Borrow;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::{debug, warn};

use crate::protocol::{Protocol, Version};
use crate::selection::ProtocolSelection;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RepositoryError {
    /// Two catalog entries share the same `(identifier, version)` key.
    ///
    /// This is a defect in the static protocol catalog and must abort startup.
    #[error("multiple protocols registered as {identifier}/v{version}")]
    DuplicateProtocol { identifier: String, version: Version },
}

/// Protocols indexed by identifier, then by version.
#[derive(Clone, Debug)]
pub struct ProtocolRepository<P> {
    protocols: BTreeMap<String, BTreeMap<Version, P>>,
}

impl<P: Protocol> ProtocolRepository<P> {
    /// Builds the repository, rejecting any duplicate `(identifier, version)`.
    pub fn new<I>(protocols: I) -> Result<Self, RepositoryError>
    where
        I: IntoIterator<Item = P>,
    {
        let mut index: BTreeMap<String, BTreeMap<Version, P>> = BTreeMap::new();
        let mut count = 0_usize;

        for protocol in protocols {
            let versions = index.entry(protocol.identifier().to_owned()).or_default();

            match versions.entry(protocol.version()) {
                Entry::Occupied(_) => {
                    warn!(
                        identifier = %protocol.identifier(),
                        version = protocol.version(),
                        "Duplicate protocol supplied to repository"
                    );
                    return Err(RepositoryError::DuplicateProtocol {
                        identifier: protocol.identifier().to_owned(),
                        version: protocol.version(),
                    });
                }
                Entry::Vacant(slot) => {
                    let _ = slot.insert(protocol);
                    count = count.saturating_add(1);
                }
            }
        }

        debug!(
            identifiers = index.len(),
            protocols = count,
            "Protocol repository built"
        );

        Ok(Self { protocols: index })
    }

    /// Returns the protocol registered under exactly `(identifier, version)`.
    #[must_use]
    pub fn select(&self, identifier: &str, version: Version) -> Option<&P> {
        self.protocols.get(identifier)?.get(&version)
    }

    /// Returns the protocol with the highest version that is both registered
    /// for `identifier` and present in `candidates`.
    ///
    /// Unregistered candidates are ignored. `None` when nothing overlaps,
    /// which includes an unknown identifier and an empty candidate set.
    #[must_use]
    pub fn select_highest<I>(&self, identifier: &str, candidates: I) -> Option<&P>
    where
        I: IntoIterator,
        I::Item: Borrow<Version>,
    {
        let Some(registered) = self.protocols.get(identifier) else {
            debug!(%identifier, "No protocols registered for identifier");
            return None;
        };

        let selected = candidates
            .into_iter()
            .filter_map(|candidate| {
                let version: &Version = candidate.borrow();
                registered.get(version)
            })
            .max_by_key(|protocol| protocol.version());

        match selected {
            Some(protocol) => {
                debug!(%identifier, version = protocol.version(), "Selected protocol version");
            }
            None => debug!(%identifier, "No common protocol version"),
        }

        selected
    }

    /// Registered versions for `identifier`, ascending. Empty if unknown.
    #[must_use]
    pub fn versions(&self, identifier: &str) -> BTreeSet<Version> {
        self.protocols
            .get(identifier)
            .map(|registered| registered.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Everything the node can offer for `identifier`.
    ///
    /// A non-empty `supported` list restricts the offer to those versions.
    #[must_use]
    pub fn get_all(&self, identifier: &str, supported: &[Version]) -> ProtocolSelection {
        let versions = self
            .versions(identifier)
            .into_iter()
            .filter(|version| supported.is_empty() || supported.contains(version))
            .collect();

        ProtocolSelection::new(identifier, versions)
    }

    #[must_use]
    pub fn contains_identifier(&self, identifier: &str) -> bool {
        self.protocols.contains_key(identifier)
    }

    /// All registered protocols, ordered by identifier then version.
    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.protocols.values().flat_map(BTreeMap::values)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.protocols.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }
}
