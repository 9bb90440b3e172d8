//! End-to-end negotiation between two nodes with different catalogs
//!
//! Proposals travel borsh-encoded, the way the handshake layer carries them.

mod common;

use std::collections::BTreeSet;

use calimero_handshake::{
    ApplicationProtocol, HandshakeConfig, ModifierProtocol, Negotiator, Protocol, ProtocolId,
    ProtocolRepository, ProtocolSelection, SupportedProtocols,
};
use claims::{assert_none, assert_some_eq};
use common::{test_repository, TestProtocols, RAFT};

fn over_the_wire(selection: &ProtocolSelection) -> ProtocolSelection {
    let bytes = borsh::to_vec(selection).unwrap();
    borsh::from_slice(&bytes).unwrap()
}

#[test]
fn test_old_and_new_node_settle_on_common_version() {
    let old =
        ProtocolRepository::new([ProtocolId::new(RAFT, 1), ProtocolId::new(RAFT, 2)]).unwrap();
    let new = test_repository();

    let initiator = Negotiator::new(&old, &[]);
    let responder = Negotiator::new(&new, &[]);

    let proposal = over_the_wire(&initiator.proposal(RAFT));
    assert_eq!(proposal.versions, BTreeSet::from([1, 2]));

    let agreed = responder.negotiate(&proposal).unwrap();
    assert_eq!(*agreed, TestProtocols::Raft2);

    // the initiator confirms the same protocol it will speak
    assert_some_eq!(old.select(RAFT, agreed.version()), &ProtocolId::new(RAFT, 2));
}

#[test]
fn test_disjoint_catalogs_fail_negotiation() {
    let old = ProtocolRepository::new([ProtocolId::new(RAFT, 0)]).unwrap();
    let new = test_repository();

    let proposal = over_the_wire(&Negotiator::new(&old, &[]).proposal(RAFT));

    assert_none!(Negotiator::new(&new, &[]).negotiate(&proposal));
}

#[test]
fn test_unsupported_family_fails_negotiation() {
    let repository = test_repository();
    let peer = ProtocolSelection::new("compression", BTreeSet::from([1, 2, 3]));

    assert_none!(Negotiator::new(&repository, &[]).negotiate(&peer));
}

#[test]
fn test_operator_pins_version_on_both_sides() {
    let repository = ApplicationProtocol::repository().unwrap();
    let pinned = [SupportedProtocols::new(RAFT, vec![1])];

    let initiator = Negotiator::new(&repository, &pinned);
    let responder = Negotiator::new(&repository, &[]);

    let proposal = over_the_wire(&initiator.proposal(RAFT));

    assert_some_eq!(responder.negotiate(&proposal), &ApplicationProtocol::Raft1);
}

#[test]
fn test_configured_application_and_modifier_negotiation() {
    let config = HandshakeConfig::from_toml_str(
        r#"
[[application]]
identifier = "raft"

[[modifier]]
identifier = "compression"
versions = [1]
"#,
    )
    .unwrap();

    let application = ApplicationProtocol::repository().unwrap();
    let modifier = ModifierProtocol::repository().unwrap();

    let peer_application = ProtocolSelection::new(RAFT, BTreeSet::from([1, 2, 3]));
    let peer_modifier = ProtocolSelection::new("compression", BTreeSet::from([2, 3]));

    assert_some_eq!(
        config.application_negotiator(&application).negotiate(&peer_application),
        &ApplicationProtocol::Raft2
    );
    assert_none!(config.modifier_negotiator(&modifier).negotiate(&peer_modifier));

    let peer_modifier = ProtocolSelection::new("compression", BTreeSet::from([1, 3]));
    let agreed = config
        .modifier_negotiator(&modifier)
        .negotiate(&peer_modifier)
        .unwrap();
    assert_eq!(agreed.codec(), "gzip");
}

#[test]
fn test_proposal_json_shape() {
    let proposal = Negotiator::new(&test_repository(), &[]).proposal(RAFT);

    let json = serde_json::to_value(&proposal).unwrap();

    assert_eq!(
        json,
        serde_json::json!({ "identifier": "raft", "versions": [1, 2, 3] })
    );
}
