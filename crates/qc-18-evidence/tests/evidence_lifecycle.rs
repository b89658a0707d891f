//! # Evidence Lifecycle Tests (qc-18)
//!
//! End-to-end runs through the module API against in-memory staking and
//! slashing subsystems.
//!
//! ## Test Categories
//!
//! 1. **Adjudication** - Fresh double-sign, tombstone absorption, age gate, unknown validators
//! 2. **Submission Rules** - Stateless rejections, duplicate hashes, atomic rollback
//! 3. **Begin-Block** - Consensus reports, unknown report types
//! 4. **Genesis & Queries** - Round trip, deterministic order, pagination

use qc_18_evidence::domain::{
    double_sign_jail_end_time, EvidenceParams, Infraction, MisbehaviorValidator,
};
use qc_18_evidence::ports::inbound::{
    BlockInfo, EvidenceApi, EvidenceQueryApi, QueryAllEvidenceRequest, QueryEvidenceRequest,
};
use qc_18_evidence::test_utils::*;
use qc_18_evidence::{
    ConsensusParams, Equivocation, Evidence, EvidenceConfig, EvidenceError, EvidenceModule,
    EvidenceRecord, GenesisState, InMemoryKVStore, Misbehavior, MisbehaviorType,
    MsgSubmitEvidence,
};
use shared_types::{Dec, PageRequest, U256};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// TEST HELPERS
// =============================================================================

const NOW: i64 = 1_704_067_200;

type TestModule = EvidenceModule<InMemoryKVStore, MockStakingKeeper, MockSlashingKeeper>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("qc_18_evidence=debug")
        .try_init();
}

fn setup() -> (MockKeepers, TestModule) {
    init_tracing();
    let keepers = MockKeepers::new();
    let module = EvidenceModule::new(
        EvidenceConfig::default(),
        InMemoryKVStore::new(),
        Arc::clone(&keepers.staking),
        Arc::clone(&keepers.slashing),
    )
    .expect("default config is valid");
    (keepers, module)
}

fn block(height: i64) -> BlockInfo {
    block_info(
        height,
        timestamp(NOW),
        ConsensusParams::with_evidence(EvidenceParams::default()),
    )
}

fn submit(module: &TestModule, block: &BlockInfo, evidence: Equivocation) -> Result<(), EvidenceError> {
    module
        .deliver_submit_evidence(block, &MsgSubmitEvidence::new(account_bech32(9), evidence))
        .map(|_| ())
}

fn stored(module: &TestModule) -> Vec<Evidence> {
    module
        .export_genesis()
        .expect("export succeeds")
        .evidence
}

// =============================================================================
// ADJUDICATION
// =============================================================================

#[test]
fn test_fresh_double_sign_is_punished() {
    let (keepers, module) = setup();
    let validator = keepers.add_bonded_validator(1, 100);
    let evidence = equivocation(5, timestamp(NOW - 1), 100, 1);

    let result = module
        .deliver_submit_evidence(
            &block(10),
            &MsgSubmitEvidence::new(account_bech32(9), evidence.clone()),
        )
        .unwrap();

    let slashes = keepers.slashing.slashes();
    assert_eq!(slashes.len(), 1);
    assert_eq!(slashes[0].address, validator);
    assert_eq!(slashes[0].fraction, Dec::new_with_prec(5, 2).unwrap());
    assert_eq!(slashes[0].power, 100);
    assert_eq!(slashes[0].distribution_height, 4);
    assert_eq!(slashes[0].infraction, Infraction::DoubleSign);
    assert_eq!(keepers.tokens(&validator), U256::from(95_000_000u64));

    assert!(keepers.staking.validator(&validator).unwrap().jailed);
    let info = keepers.slashing.signing_info(&validator).unwrap();
    assert!(info.tombstoned);
    assert_eq!(info.jailed_until, Some(double_sign_jail_end_time()));

    let record: Evidence = evidence.into();
    assert_eq!(stored(&module), vec![record.clone()]);

    let submitted = &result.events[0];
    assert_eq!(submitted.kind, "submit_evidence");
    assert_eq!(submitted.attribute("evidence_hash"), Some(record.hash_hex().as_str()));
}

#[test]
fn test_tombstone_absorbs_second_record() {
    let (keepers, module) = setup();
    let validator = keepers.add_bonded_validator(1, 100);

    submit(&module, &block(10), equivocation(5, timestamp(NOW - 1), 100, 1)).unwrap();
    let after_first = keepers.tokens(&validator);

    submit(&module, &block(11), equivocation(6, timestamp(NOW - 1), 100, 1)).unwrap();

    assert_eq!(keepers.slashing.slashes().len(), 1);
    assert_eq!(keepers.tokens(&validator), after_first);
    assert_eq!(stored(&module).len(), 2);
}

#[test]
fn test_stale_evidence_is_ignored() {
    let (keepers, module) = setup();
    let validator = keepers.add_bonded_validator(1, 100);
    let params = ConsensusParams::with_evidence(EvidenceParams {
        max_age_num_blocks: 100,
        max_age_duration: Duration::from_secs(60 * 60),
        ..Default::default()
    });
    let block = block_info(10_000, timestamp(NOW), params);

    submit(&module, &block, equivocation(5, timestamp(NOW - 2 * 60 * 60), 100, 1)).unwrap();

    assert!(keepers.slashing.slashes().is_empty());
    assert!(!keepers.staking.validator(&validator).unwrap().jailed);
    assert!(!keepers.slashing.signing_info(&validator).unwrap().tombstoned);
}

#[test]
fn test_old_in_blocks_but_recent_in_time_is_punished() {
    let (keepers, module) = setup();
    keepers.add_bonded_validator(1, 100);
    let params = ConsensusParams::with_evidence(EvidenceParams {
        max_age_num_blocks: 100,
        max_age_duration: Duration::from_secs(60 * 60),
        ..Default::default()
    });
    let block = block_info(10_000, timestamp(NOW), params);

    submit(&module, &block, equivocation(5, timestamp(NOW - 60), 100, 1)).unwrap();

    assert_eq!(keepers.slashing.slashes().len(), 1);
}

#[test]
fn test_unknown_validator_is_silent_success() {
    let (keepers, module) = setup();

    submit(&module, &block(10), equivocation(5, timestamp(NOW - 1), 100, 7)).unwrap();

    assert!(keepers.slashing.slashes().is_empty());
    assert_eq!(stored(&module).len(), 1);
}

// =============================================================================
// SUBMISSION RULES
// =============================================================================

#[test]
fn test_stateless_rejections() {
    let (keepers, module) = setup();
    keepers.add_bonded_validator(1, 100);
    let good = equivocation(5, timestamp(NOW - 1), 100, 1);

    let mut zero_height = good.clone();
    zero_height.height = 0;
    let mut zero_power = good.clone();
    zero_power.power = 0;
    let mut zero_time = good.clone();
    zero_time.time = timestamp(0);
    let mut no_address = good;
    no_address.consensus_address = String::new();

    for bad in [zero_height, zero_power, zero_time, no_address] {
        let err = submit(&module, &block(10), bad).unwrap_err();
        assert!(matches!(err, EvidenceError::InvalidEvidence { .. }), "{err}");
        assert_eq!(err.code(), 3);
    }

    assert!(module.store().read().is_empty());
    assert!(keepers.slashing.slashes().is_empty());
}

#[test]
fn test_second_submission_of_same_record_is_rejected() {
    let (keepers, module) = setup();
    keepers.add_bonded_validator(1, 100);
    let evidence = equivocation(5, timestamp(NOW - 1), 100, 1);

    submit(&module, &block(10), evidence.clone()).unwrap();
    let err = submit(&module, &block(11), evidence.clone()).unwrap_err();

    let hash = Evidence::from(evidence).hash_hex();
    assert_eq!(err, EvidenceError::EvidenceExists { hash: hash.clone() });
    assert!(err.to_string().contains(&hash));
    assert_eq!(stored(&module).len(), 1);
}

#[test]
fn test_fatal_handler_error_rolls_back() {
    let (keepers, module) = setup();
    keepers.add_bonded_validator(1, 100);
    keepers.slashing.fail_slashing(true);

    let err = submit(&module, &block(10), equivocation(5, timestamp(NOW - 1), 100, 1)).unwrap_err();

    assert!(err.is_fatal());
    assert!(module.store().read().is_empty());
}

// =============================================================================
// BEGIN-BLOCK
// =============================================================================

fn report(kind: MisbehaviorType, byte: u8, height: i64) -> Misbehavior {
    Misbehavior {
        kind,
        validator: MisbehaviorValidator {
            address: vec![byte; 20],
            power: 100,
        },
        height,
        time: timestamp(NOW - 30),
        total_voting_power: 300,
    }
}

#[test]
fn test_begin_block_reports_are_adjudicated_in_order() {
    let (keepers, module) = setup();
    let first = keepers.add_bonded_validator(1, 100);
    let second = keepers.add_bonded_validator(2, 100);

    let result = module
        .begin_block(
            &block(20),
            &[
                report(MisbehaviorType::LightClientAttack, 2, 18),
                report(MisbehaviorType::Unknown(42), 1, 18),
                report(MisbehaviorType::DuplicateVote, 1, 19),
            ],
        )
        .unwrap();

    assert_eq!(result.outcomes.len(), 2);
    let slashed: Vec<_> = keepers
        .slashing
        .slashes()
        .into_iter()
        .map(|s| s.address)
        .collect();
    assert_eq!(slashed, vec![second, first]);
    assert_eq!(stored(&module).len(), 2);
}

#[test]
fn test_begin_block_without_reports_is_a_no_op() {
    let (_, module) = setup();
    let result = module.begin_block(&block(20), &[]).unwrap();
    assert!(result.outcomes.is_empty());
    assert!(result.events.is_empty());
}

// =============================================================================
// GENESIS & QUERIES
// =============================================================================

#[test]
fn test_genesis_round_trip_in_hash_order() {
    let (_, module) = setup();
    let records: Vec<Evidence> = (1..=6u8)
        .map(|i| equivocation(i as i64, timestamp(NOW - i as i64), 10, i).into())
        .collect();

    module
        .init_genesis(&block(1), &GenesisState::new(records.clone()))
        .unwrap();
    let exported = module.export_genesis().unwrap();

    let mut expected = records;
    expected.sort_by_key(|e| e.hash());
    assert_eq!(exported.evidence, expected);
    assert_eq!(module.export_genesis().unwrap(), exported);

    let (_, fresh) = setup();
    fresh.init_genesis(&block(1), &exported).unwrap();
    assert_eq!(fresh.export_genesis().unwrap(), exported);
}

#[test]
fn test_genesis_json_round_trip() {
    let genesis = GenesisState::new(vec![equivocation(3, timestamp(NOW), 10, 1).into()]);
    let json = serde_json::to_string(&genesis).unwrap();
    assert!(json.contains("\"@type\":\"equivocation\""));
    let back: GenesisState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, genesis);
}

#[test]
fn test_query_pagination_walks_every_record() {
    let (_, module) = setup();
    let records: Vec<Evidence> = (1..=7u8)
        .map(|i| equivocation(i as i64, timestamp(NOW), 10, i).into())
        .collect();
    module
        .init_genesis(&block(1), &GenesisState::new(records))
        .unwrap();

    let mut seen = Vec::new();
    let mut key = Vec::new();
    loop {
        let page = module
            .all_evidence(&QueryAllEvidenceRequest {
                pagination: Some(PageRequest {
                    key: key.clone(),
                    limit: 3,
                    ..Default::default()
                }),
            })
            .unwrap();
        seen.extend(page.evidence);
        match page.pagination.next_key {
            Some(next) => key = next,
            None => break,
        }
    }

    assert_eq!(seen, module.export_genesis().unwrap().evidence);
}

#[test]
fn test_query_errors() {
    let (_, module) = setup();

    let err = module
        .evidence(&QueryEvidenceRequest { hash: String::new() })
        .unwrap_err();
    assert!(matches!(err, EvidenceError::InvalidRequest { .. }));

    let hash = "0".repeat(64);
    let err = module
        .evidence(&QueryEvidenceRequest { hash: hash.clone() })
        .unwrap_err();
    assert_eq!(err, EvidenceError::NoEvidenceExists { hash });
    assert_eq!(err.code(), 4);
}
