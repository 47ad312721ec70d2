use mintboard_registry::*;

// Test actor IDs
const ADA: ActorId = [1u8; 32];
const BEN: ActorId = [2u8; 32];
const CARA: ActorId = [3u8; 32];

fn ether(s: &str) -> Amount {
    Amount::parse_decimal(s).unwrap()
}

fn mint_test_contract(registry: &mut ArtifactRegistry<InMemoryArtifactStore>, caller: ActorId) -> ArtifactId {
    registry
        .mint(
            "Test Contract",
            "This is a test contract",
            "ipfs://test-ipfs-url",
            caller,
        )
        .unwrap()
        .value
}

// ----------------------------------------------------------------------------
// Minting
// ----------------------------------------------------------------------------

#[test]
fn test_new_registry_starts_at_zero() {
    let registry = ArtifactRegistry::in_memory();
    assert_eq!(registry.next_id().unwrap(), 0);
    assert!(registry.list().unwrap().is_empty());
}

#[test]
fn test_mint_ids_are_dense_and_ordered() {
    let mut registry = ArtifactRegistry::in_memory();
    for expected in 0..10u64 {
        let caller = if expected % 2 == 0 { ADA } else { BEN };
        let id = registry
            .mint(&format!("c{expected}"), "desc", "ipfs://x", caller)
            .unwrap()
            .value;
        assert_eq!(id, ArtifactId(expected));
    }
    assert_eq!(registry.next_id().unwrap(), 10);

    let ids: Vec<u64> = registry.list().unwrap().iter().map(|r| r.id.value()).collect();
    assert_eq!(ids, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_get_after_mint_returns_exact_record() {
    let mut registry = ArtifactRegistry::in_memory();
    let id = mint_test_contract(&mut registry, BEN);

    let record = registry.get(id).unwrap();
    assert_eq!(record.id, ArtifactId(0));
    assert_eq!(record.name, "Test Contract");
    assert_eq!(record.description, "This is a test contract");
    assert_eq!(record.content_pointer.as_str(), "ipfs://test-ipfs-url");
    assert_eq!(record.owner, BEN);
    assert_eq!(record.total_donations, Amount::ZERO);
}

#[test]
fn test_mint_emits_minted_event() {
    let mut registry = ArtifactRegistry::in_memory();
    let outcome = registry
        .mint("Test Contract", "This is a test contract", "ipfs://test-ipfs-url", BEN)
        .unwrap();

    assert_eq!(
        outcome.events,
        vec![RegistryEvent::Minted {
            id: ArtifactId(0),
            owner: BEN,
            content_pointer: ContentPointer::new("ipfs://test-ipfs-url").unwrap(),
        }]
    );
}

// ----------------------------------------------------------------------------
// Donations
// ----------------------------------------------------------------------------

#[test]
fn test_donation_increases_total() {
    let mut registry = ArtifactRegistry::in_memory();
    let id = mint_test_contract(&mut registry, BEN);

    registry.donate(id, ether("1.0"), CARA).unwrap();
    assert_eq!(registry.get(id).unwrap().total_donations, ether("1.0"));
}

#[test]
fn test_donations_accumulate() {
    let mut registry = ArtifactRegistry::in_memory();
    let id = mint_test_contract(&mut registry, BEN);

    registry.donate(id, ether("0.25"), CARA).unwrap();
    registry.donate(id, ether("0.0001"), ADA).unwrap();
    assert_eq!(registry.get(id).unwrap().total_donations, ether("0.2501"));
}

#[test]
fn test_owner_may_donate_to_own_artifact() {
    let mut registry = ArtifactRegistry::in_memory();
    let id = mint_test_contract(&mut registry, BEN);
    let receipt = registry.donate(id, ether("2"), BEN).unwrap().value;
    assert_eq!(receipt.payee, BEN);
    assert_eq!(receipt.donor, BEN);
}

#[test]
fn test_donation_emits_event() {
    let mut registry = ArtifactRegistry::in_memory();
    let id = mint_test_contract(&mut registry, BEN);

    let outcome = registry.donate(id, ether("1.0"), CARA).unwrap();
    assert_eq!(
        outcome.events,
        vec![RegistryEvent::DonationReceived {
            id,
            donor: CARA,
            amount: ether("1.0"),
        }]
    );
}

#[test]
fn test_zero_and_negative_donations_rejected() {
    let mut registry = ArtifactRegistry::in_memory();
    let id = mint_test_contract(&mut registry, BEN);

    for bad in ["0", "0.0", "-1", "-0.000000000000000001"] {
        let err = registry.donate(id, ether(bad), CARA).unwrap_err();
        assert!(
            matches!(err, RegistryError::InvalidAmount(_)),
            "{bad} should be rejected, got {err:?}"
        );
    }
    assert_eq!(registry.get(id).unwrap().total_donations, Amount::ZERO);
}

#[test]
fn test_donation_to_missing_artifact_rejected() {
    let mut registry = ArtifactRegistry::in_memory();
    mint_test_contract(&mut registry, BEN);

    let err = registry.donate(ArtifactId(1), ether("1.0"), CARA).unwrap_err();
    assert!(matches!(err, RegistryError::ArtifactNotFound(ArtifactId(1))));
    assert!(err.is_not_found());

    let err = registry.donate(ArtifactId(u64::MAX), ether("1.0"), CARA).unwrap_err();
    assert!(err.is_not_found());
}

// ----------------------------------------------------------------------------
// Lookup
// ----------------------------------------------------------------------------

#[test]
fn test_get_on_empty_registry_is_not_found() {
    let registry = ArtifactRegistry::in_memory();
    assert!(matches!(
        registry.get(ArtifactId(0)),
        Err(RegistryError::ArtifactNotFound(_))
    ));
}

#[test]
fn test_get_past_end_is_not_found() {
    let mut registry = ArtifactRegistry::in_memory();
    mint_test_contract(&mut registry, ADA);
    assert!(registry.get(ArtifactId(0)).is_ok());
    assert!(registry.get(ArtifactId(1)).unwrap_err().is_not_found());
}

#[test]
fn test_search_is_case_insensitive_over_name_and_description() {
    let mut registry = ArtifactRegistry::in_memory();
    registry.mint("Escrow", "Holds funds", "ipfs://a", ADA).unwrap();
    registry.mint("Voting", "DAO ballot with escrow refund", "ipfs://b", BEN).unwrap();
    registry.mint("Token", "ERC-20 style", "ipfs://c", CARA).unwrap();

    let hits: Vec<u64> = registry
        .search("ESCROW")
        .unwrap()
        .iter()
        .map(|r| r.id.value())
        .collect();
    assert_eq!(hits, vec![0, 1]);

    assert_eq!(registry.search("").unwrap().len(), 3);
    assert!(registry.search("nothing").unwrap().is_empty());
}

#[test]
fn test_by_owner() {
    let mut registry = ArtifactRegistry::in_memory();
    registry.mint("a", "a", "ipfs://a", ADA).unwrap();
    registry.mint("b", "b", "ipfs://b", BEN).unwrap();
    registry.mint("c", "c", "ipfs://c", ADA).unwrap();

    let ada: Vec<u64> = registry.by_owner(&ADA).unwrap().iter().map(|r| r.id.value()).collect();
    assert_eq!(ada, vec![0, 2]);
    assert!(registry.by_owner(&CARA).unwrap().is_empty());
}

// ----------------------------------------------------------------------------
// Discussion log
// ----------------------------------------------------------------------------

#[test]
fn test_append_increments_count_and_preserves_order() {
    let mut log = DiscussionLog::in_memory();
    let messages = [(ADA, "first"), (BEN, "second"), (ADA, "third")];

    for (i, (author, text)) in messages.iter().enumerate() {
        assert_eq!(log.count().unwrap(), i as u64);
        let index = log.append(text, *author).unwrap().value;
        assert_eq!(index, i as u64);
    }
    assert_eq!(log.count().unwrap(), 3);

    for (i, (author, text)) in messages.iter().enumerate() {
        let post = log.get(i as u64).unwrap();
        assert_eq!(post.index, i as u64);
        assert_eq!(&post.author, author);
        assert_eq!(post.text, *text);
    }
}

#[test]
fn test_append_emits_post_added() {
    let mut log = DiscussionLog::in_memory();
    log.append("gm", ADA).unwrap();
    let outcome = log.append("gm gm", BEN).unwrap();
    assert_eq!(
        outcome.events,
        vec![RegistryEvent::PostAdded {
            index: 1,
            author: BEN,
        }]
    );
}

#[test]
fn test_get_post_out_of_range() {
    let mut log = DiscussionLog::in_memory();
    assert!(matches!(log.get(0), Err(RegistryError::PostNotFound(0))));
    log.append("hello", CARA).unwrap();
    assert!(log.get(0).is_ok());
    assert!(log.get(1).unwrap_err().is_not_found());
}

#[test]
fn test_open_posting_by_default() {
    let mut log = DiscussionLog::in_memory();
    assert!(!log.requires_verification());
    assert!(log.append("anyone can post", CARA).is_ok());
}

// ----------------------------------------------------------------------------
// End-to-end scenario
// ----------------------------------------------------------------------------

#[test]
fn test_marketplace_scenario() {
    let mut registry = ArtifactRegistry::in_memory();

    let id = registry
        .mint(
            "Test Contract",
            "This is a test contract",
            "ipfs://test-ipfs-url",
            ADA,
        )
        .unwrap()
        .value;
    assert_eq!(id, ArtifactId(0));

    let record = registry.get(ArtifactId(0)).unwrap();
    assert_eq!(record.owner, ADA);
    assert_eq!(record.total_donations, Amount::ZERO);

    registry.donate(ArtifactId(0), ether("1.0"), BEN).unwrap();
    assert_eq!(
        registry.get(ArtifactId(0)).unwrap().total_donations.to_string(),
        "1.0"
    );

    assert!(registry
        .donate(ArtifactId(1), ether("1.0"), BEN)
        .unwrap_err()
        .is_not_found());
    assert!(matches!(
        registry.donate(ArtifactId(0), Amount::ZERO, BEN),
        Err(RegistryError::InvalidAmount(_))
    ));

    // failed operations leave the books untouched
    assert_eq!(registry.next_id().unwrap(), 1);
    assert_eq!(registry.get(ArtifactId(0)).unwrap().total_donations, ether("1.0"));
}

#[test]
fn test_event_json_shape() {
    let event = RegistryEvent::PostAdded {
        index: 4,
        author: ADA,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "post_added");
    assert_eq!(json["index"], 4);
    assert_eq!(event.kind(), "post_added");
}
