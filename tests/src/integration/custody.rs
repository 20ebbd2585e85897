//! # Custody Flows
//!
//! Stake and unstake round trips against the live in-memory registry,
//! checking that custody actually moves in the registry and that provenance
//! records track the original depositor.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mint_vault::{
        AdminApi, Address, Caller, DropApi, DropConfig, DropError, DropService,
        InMemoryItemRegistry, RecordingPaymentOutlet, SalePhase, StakeOutcome,
    };

    const ADMIN: Address = [0xAD; 20];
    const ALICE: Address = [0x01; 20];
    const BOB: Address = [0x02; 20];

    struct Harness {
        service: DropService,
        registry: Arc<InMemoryItemRegistry>,
        vault_address: Address,
    }

    /// Service with live adapters, public sale open, and `ALICE` holding two
    /// freshly minted items with the vault approved as her operator.
    fn staking_harness() -> (Harness, Vec<u64>) {
        let config = DropConfig::for_testing();
        let vault_address = config.vault_address;
        let registry = Arc::new(InMemoryItemRegistry::new());
        let payments = Arc::new(RecordingPaymentOutlet::new());
        let service = DropService::new(
            ADMIN,
            config,
            Arc::clone(&registry) as Arc<_>,
            payments as Arc<_>,
        );
        service.set_sale_phase(ADMIN, SalePhase::Public).unwrap();
        let items = service
            .issue_public(Caller::direct(ALICE), 2, 200)
            .unwrap();
        registry.set_operator(ALICE, vault_address, true);
        (
            Harness {
                service,
                registry,
                vault_address,
            },
            items,
        )
    }

    /// Deposit moves custody to the vault and records provenance; withdrawal
    /// reverses both.
    #[test]
    fn test_stake_unstake_round_trip() {
        crate::init_tracing();
        let (h, items) = staking_harness();

        let outcomes = h.service.deposit_many(ALICE, &items).unwrap();
        assert!(outcomes.iter().all(StakeOutcome::is_processed));
        assert_eq!(h.registry.items_of(h.vault_address), items);
        assert!(h.registry.items_of(ALICE).is_empty());

        let record = h.service.stake_record(items[0]).unwrap().unwrap();
        assert_eq!(record.depositor, ALICE);
        assert!(record.deposited_at >= 1);

        let outcomes = h.service.withdraw_many(ALICE, &items).unwrap();
        assert!(outcomes.iter().all(StakeOutcome::is_processed));
        assert_eq!(h.registry.items_of(ALICE), items);
        assert!(h.service.stake_record(items[0]).unwrap().is_none());
        assert_eq!(h.service.stats().unwrap().staked_count, 0);
    }

    /// Without operator approval for the vault, deposits are refused
    /// outright.
    #[test]
    fn test_deposit_requires_operator_approval() {
        let (h, items) = staking_harness();
        h.registry.set_operator(ALICE, h.vault_address, false);

        assert_eq!(
            h.service.deposit_many(ALICE, &items),
            Err(DropError::NotAuthorized)
        );
        assert_eq!(h.registry.items_of(ALICE), items);
    }

    /// Toggling staking off closes the deposit door but leaves withdrawal
    /// open for existing stakes.
    #[test]
    fn test_staking_toggle_blocks_deposits_not_withdrawals() {
        let (h, items) = staking_harness();
        h.service.deposit_many(ALICE, &[items[0]]).unwrap();

        assert!(!h.service.toggle_staking(ADMIN).unwrap());
        assert_eq!(
            h.service.deposit_many(ALICE, &[items[1]]),
            Err(DropError::StakingDisabled)
        );

        let outcomes = h.service.withdraw_many(ALICE, &[items[0]]).unwrap();
        assert!(outcomes[0].is_processed());
        assert_eq!(h.registry.items_of(ALICE), items);
    }

    /// Items the caller does not hold are skipped, not errors.
    #[test]
    fn test_deposit_skips_foreign_items() {
        let (h, items) = staking_harness();
        h.service.issue_public(Caller::direct(BOB), 1, 100).unwrap();
        let bob_item = h.registry.items_of(BOB)[0];

        let outcomes = h.service.deposit_many(ALICE, &[items[0], bob_item]).unwrap();
        assert!(outcomes[0].is_processed());
        assert_eq!(outcomes[1], StakeOutcome::Skipped { item: bob_item });
        assert_eq!(h.registry.items_of(BOB), vec![bob_item]);
    }

    /// Only the depositor may reclaim a staked item.
    #[test]
    fn test_withdraw_by_non_depositor_is_skipped() {
        let (h, items) = staking_harness();
        h.service.deposit_many(ALICE, &items).unwrap();

        let outcomes = h.service.withdraw_many(BOB, &items).unwrap();
        assert!(outcomes.iter().all(|o| !o.is_processed()));
        assert_eq!(h.registry.items_of(h.vault_address), items);
    }

    /// Forced withdrawal is admin-gated and returns custody to the original
    /// depositor, never the caller.
    #[test]
    fn test_force_withdraw_returns_to_depositor() {
        let (h, items) = staking_harness();
        h.service.deposit_many(ALICE, &items).unwrap();

        assert_eq!(
            h.service.force_withdraw_many(BOB, &items),
            Err(DropError::NotAuthorized)
        );

        let outcomes = h.service.force_withdraw_many(ADMIN, &items).unwrap();
        assert!(outcomes.iter().all(StakeOutcome::is_processed));
        assert_eq!(h.registry.items_of(ALICE), items);
        assert!(h.registry.items_of(ADMIN).is_empty());
        assert!(h.service.stake_record(items[0]).unwrap().is_none());
    }
}
