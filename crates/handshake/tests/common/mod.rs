//! Shared fixtures for handshake integration tests

#![allow(dead_code, reason = "Not every test binary uses every fixture")]

use calimero_handshake::{Protocol, ProtocolRepository, Version};

/// Catalog mirroring a node that implements raft v1-v3 and catchup v1-v2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TestProtocols {
    Raft1,
    Raft2,
    Raft3,
    Catchup1,
    Catchup2,
}

impl TestProtocols {
    pub const ALL: [Self; 5] = [
        Self::Raft1,
        Self::Raft2,
        Self::Raft3,
        Self::Catchup1,
        Self::Catchup2,
    ];
}

impl Protocol for TestProtocols {
    fn identifier(&self) -> &str {
        match self {
            Self::Raft1 | Self::Raft2 | Self::Raft3 => RAFT,
            Self::Catchup1 | Self::Catchup2 => CATCHUP,
        }
    }

    fn version(&self) -> Version {
        match self {
            Self::Raft1 | Self::Catchup1 => 1,
            Self::Raft2 | Self::Catchup2 => 2,
            Self::Raft3 => 3,
        }
    }
}

pub const RAFT: &str = "raft";
pub const CATCHUP: &str = "catchup";

pub fn test_repository() -> ProtocolRepository<TestProtocols> {
    ProtocolRepository::new(TestProtocols::ALL).expect("test catalog has no duplicates")
}

/// Every subset of `universe`, including the empty one.
pub fn subsets(universe: &[Version]) -> Vec<Vec<Version>> {
    (0..1_u32 << universe.len())
        .map(|mask| {
            universe
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, version)| *version)
                .collect()
        })
        .collect()
}
