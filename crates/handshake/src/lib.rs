//! Protocol-version negotiation for node handshakes.
//!
//! Before two nodes open a data channel they agree on exactly one concrete
//! version of each protocol they intend to speak. This crate holds the
//! catalog of locally implemented protocols and the selection policy: for a
//! protocol identifier and the versions a peer offered, pick the highest
//! version both sides support, or report that there is none.
//!
//! # Modules
//!
//! - [`protocol`]: the [`Protocol`] trait and the built-in catalogs
//! - [`repository`]: the immutable [`ProtocolRepository`] and its queries
//! - [`selection`]: proposals and operator restrictions applied to them
//! - [`config`]: TOML configuration of the versions a node offers
//!
//! # Example
//!
//! ```rust,ignore
//! use calimero_handshake::{ApplicationProtocol, ProtocolRepository};
//!
//! let repository = ProtocolRepository::new(ApplicationProtocol::ALL)?;
//!
//! match repository.select_highest("raft", peer_versions) {
//!     Some(protocol) => open_channel(*protocol),
//!     None => reject_handshake(),
//! }
//! ```
//!
//! Framing of handshake messages and the transport that carries them live in
//! the network layer.

pub mod config;
pub mod protocol;
pub mod repository;
pub mod selection;

pub use config::{ConfigError, HandshakeConfig};
pub use protocol::{
    ApplicationProtocol, ModifierProtocol, Protocol, ProtocolCategory, ProtocolId, Version,
};
pub use repository::{ProtocolRepository, RepositoryError};
pub use selection::{Negotiator, ProtocolSelection, SupportedProtocols};
