//! # Supply Properties
//!
//! Random operation sequences against the drop service, asserting the caps
//! that must hold no matter what order of mints, phase flips, and failures
//! the sequence produces:
//!
//! - issuance never exceeds capacity
//! - allowlist issuance never exceeds the allocation
//! - no holder exceeds a per-phase quota
//! - the balance equals the sum of accepted payments

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use mint_vault::{
        build_membership_proof, compute_allowlist_root, AdminApi, Address, Amount, Caller,
        DropApi, DropConfig, DropService, InMemoryItemRegistry, MembershipProof,
        RecordingPaymentOutlet, SalePhase,
    };

    const ADMIN: Address = [0xAD; 20];

    /// A step in a randomized drop session.
    #[derive(Debug, Clone)]
    enum Op {
        SetPhase(SalePhase),
        IssuePublic { holder: usize, amount: u64 },
        IssueAllowlist { holder: usize, amount: u64 },
    }

    fn holder_address(index: usize) -> Address {
        [index as u8 + 1; 20]
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            prop_oneof![
                Just(SalePhase::Closed),
                Just(SalePhase::Allowlist),
                Just(SalePhase::Public),
            ]
            .prop_map(Op::SetPhase),
            (0usize..4, 0u64..5).prop_map(|(holder, amount)| Op::IssuePublic { holder, amount }),
            (0usize..4, 0u64..5)
                .prop_map(|(holder, amount)| Op::IssueAllowlist { holder, amount }),
        ]
    }

    struct Session {
        service: DropService,
        members: Vec<Address>,
        proofs: Vec<MembershipProof>,
        config: DropConfig,
    }

    /// Service over live adapters with every test holder on the allowlist.
    fn session() -> Session {
        let members: Vec<Address> = (0..4).map(holder_address).collect();
        let mut config = DropConfig::for_testing();
        config.allowlist_root = compute_allowlist_root(&members);
        let proofs = (0..members.len())
            .map(|i| build_membership_proof(&members, i).unwrap())
            .collect();
        let service = DropService::new(
            ADMIN,
            config.clone(),
            Arc::new(InMemoryItemRegistry::new()) as Arc<_>,
            Arc::new(RecordingPaymentOutlet::new()) as Arc<_>,
        );
        Session {
            service,
            members,
            proofs,
            config,
        }
    }

    proptest! {
        #[test]
        fn caps_hold_over_arbitrary_sequences(ops in prop::collection::vec(op_strategy(), 1..40)) {
            let s = session();
            let mut allowlist_total: u64 = 0;
            let mut accepted: Amount = 0;

            for op in ops {
                match op {
                    Op::SetPhase(phase) => {
                        s.service.set_sale_phase(ADMIN, phase).unwrap();
                    }
                    Op::IssuePublic { holder, amount } => {
                        let payment = s.config.public_price * amount as Amount;
                        let caller = Caller::direct(s.members[holder]);
                        if s.service.issue_public(caller, amount, payment).is_ok() {
                            accepted += payment;
                        }
                    }
                    Op::IssueAllowlist { holder, amount } => {
                        let payment = s.config.allowlist_price * amount as Amount;
                        let caller = Caller::direct(s.members[holder]);
                        let result = s.service.issue_allowlist(
                            caller,
                            amount,
                            payment,
                            &s.proofs[holder],
                        );
                        if result.is_ok() {
                            allowlist_total += amount;
                            accepted += payment;
                        }
                    }
                }

                let stats = s.service.stats().unwrap();
                prop_assert!(stats.issued_count <= stats.capacity);
                prop_assert!(allowlist_total <= stats.allowlist_allocation);
                prop_assert_eq!(s.service.balance().unwrap(), accepted);

                for member in &s.members {
                    let record = s.service.holder_record(*member).unwrap();
                    prop_assert!(record.public_issued <= s.config.public_max_per_holder);
                    prop_assert!(record.allowlist_issued <= s.config.allowlist_max_per_holder);
                }
            }
        }

        /// Every member of a random allowlist proves membership; a stranger
        /// never does.
        #[test]
        fn membership_proofs_are_sound(size in 1usize..24, stranger in 50u8..255) {
            let members: Vec<Address> = (0..size).map(holder_address).collect();
            let root = compute_allowlist_root(&members);

            for (i, member) in members.iter().enumerate() {
                let proof = build_membership_proof(&members, i).unwrap();
                prop_assert!(mint_vault::verify_membership(
                    &mint_vault::leaf_hash(member),
                    &proof,
                    &root
                ));
            }

            let outsider = [stranger; 20];
            let proof = build_membership_proof(&members, 0).unwrap();
            prop_assert!(!mint_vault::verify_membership(
                &mint_vault::leaf_hash(&outsider),
                &proof,
                &root
            ));
        }
    }
}
