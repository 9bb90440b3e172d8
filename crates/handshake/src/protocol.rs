//! Protocol descriptors and the built-in protocol catalogs.
//!
//! A protocol is identified by its `(identifier, version)` pair and nothing
//! else. The catalogs are closed enums: each variant is one concrete
//! protocol generation the node knows how to speak.

use core::fmt::{self, Display, Formatter};

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::repository::{ProtocolRepository, RepositoryError};

/// Protocol generation within one identifier. Higher is newer and preferred.
///
/// Signed because versions proposed by a peer are decoded as-is and are not
/// validated before lookup.
pub type Version = i32;

/// A concrete, versioned protocol implementation.
pub trait Protocol {
    /// Logical protocol family, e.g. `"raft"`.
    fn identifier(&self) -> &str;

    /// Generation of this protocol within its family.
    fn version(&self) -> Version;

    /// Owned `(identifier, version)` key of this protocol.
    fn id(&self) -> ProtocolId {
        ProtocolId::new(self.identifier(), self.version())
    }
}

/// Owned `(identifier, version)` pair.
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct ProtocolId {
    pub identifier: String,
    pub version: Version,
}

impl ProtocolId {
    #[must_use]
    pub fn new(identifier: impl Into<String>, version: Version) -> Self {
        Self {
            identifier: identifier.into(),
            version,
        }
    }
}

impl Display for ProtocolId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/v{}", self.identifier, self.version)
    }
}

impl Protocol for ProtocolId {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn version(&self) -> Version {
        self.version
    }
}

/// Protocol families known to the node.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolCategory {
    /// Consensus log replication.
    Raft,
    /// State transfer for lagging or fresh members.
    Catchup,
    /// Stream compression, negotiated as a modifier.
    Compression,
}

impl ProtocolCategory {
    /// Identifier string used on the wire for this family.
    #[must_use]
    pub const fn canonical_name(self) -> &'static str {
        match self {
            Self::Raft => "raft",
            Self::Catchup => "catchup",
            Self::Compression => "compression",
        }
    }
}

impl Display for ProtocolCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Application protocols: the data channel spoken once the handshake completes.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub enum ApplicationProtocol {
    Raft1,
    Raft2,
    Catchup1,
    Catchup2,
}

impl ApplicationProtocol {
    pub const ALL: [Self; 4] = [Self::Raft1, Self::Raft2, Self::Catchup1, Self::Catchup2];

    /// Repository over every application protocol this build implements.
    pub fn repository() -> Result<ProtocolRepository<Self>, RepositoryError> {
        ProtocolRepository::new(Self::ALL)
    }

    #[must_use]
    pub const fn category(self) -> ProtocolCategory {
        match self {
            Self::Raft1 | Self::Raft2 => ProtocolCategory::Raft,
            Self::Catchup1 | Self::Catchup2 => ProtocolCategory::Catchup,
        }
    }
}

impl Protocol for ApplicationProtocol {
    fn identifier(&self) -> &str {
        self.category().canonical_name()
    }

    fn version(&self) -> Version {
        match self {
            Self::Raft1 | Self::Catchup1 => 1,
            Self::Raft2 | Self::Catchup2 => 2,
        }
    }
}

/// Modifier protocols applied on top of an application protocol stream.
///
/// Every compression codec is its own generation of the `compression` family,
/// so the variants carry distinct versions.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub enum ModifierProtocol {
    Gzip1,
    Snappy1,
    Lz4Validating1,
}

impl ModifierProtocol {
    pub const ALL: [Self; 3] = [Self::Gzip1, Self::Snappy1, Self::Lz4Validating1];

    /// Repository over every modifier protocol this build implements.
    pub fn repository() -> Result<ProtocolRepository<Self>, RepositoryError> {
        ProtocolRepository::new(Self::ALL)
    }

    #[must_use]
    pub const fn category(self) -> ProtocolCategory {
        ProtocolCategory::Compression
    }

    /// Codec name, for logs and operator-facing output.
    #[must_use]
    pub const fn codec(self) -> &'static str {
        match self {
            Self::Gzip1 => "gzip",
            Self::Snappy1 => "snappy",
            Self::Lz4Validating1 => "lz4_validating",
        }
    }
}

impl Protocol for ModifierProtocol {
    fn identifier(&self) -> &str {
        self.category().canonical_name()
    }

    fn version(&self) -> Version {
        match self {
            Self::Gzip1 => 1,
            Self::Snappy1 => 2,
            Self::Lz4Validating1 => 3,
        }
    }
}
