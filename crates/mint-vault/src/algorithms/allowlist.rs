//! # Merkle Allowlist
//!
//! Membership verification against a committed allowlist root, without
//! storing the full member set.
//!
//! # Algorithm
//!
//! 1. Start with the claimant's identity leaf as current hash
//! 2. For each node in the proof path:
//!    - If sibling is on left: hash = SHA256(sibling || current)
//!    - If sibling is on right: hash = SHA256(current || sibling)
//! 3. Final hash should equal the committed root
//!
//! # Time Complexity: O(log n)
//! # Space Complexity: O(1)

use crate::domain::{Address, DropError, Hash, MembershipProof, Position, ProofNode};
use sha2::{Digest, Sha256};

/// Hash an identity into an allowlist leaf.
///
/// The leaf commits to the claimant address only — no amount or nonce is
/// bound into it. A valid proof therefore authorizes any number of claims
/// up to the holder's quota, not a specific amount. This is a deliberate,
/// documented limitation of the scheme.
pub fn leaf_hash(member: &Address) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(member);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash two nodes together.
fn hash_concat(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Verify a membership proof for `leaf` against `expected_root`.
///
/// Pure function: verification always happens against whichever root is
/// passed in, so rotating the committed root invalidates proofs built
/// against the old one.
pub fn verify_membership(leaf: &Hash, proof: &MembershipProof, expected_root: &Hash) -> bool {
    // Edge case: empty path is valid only for a single-member set
    if proof.path.is_empty() {
        return leaf == expected_root;
    }

    let mut current = *leaf;

    for node in &proof.path {
        current = match node.position {
            Position::Left => hash_concat(&node.hash, &current),
            Position::Right => hash_concat(&current, &node.hash),
        };
    }

    current == *expected_root
}

/// Compute the allowlist root for a member set.
///
/// Returns the all-zero hash for an empty set (a root no proof verifies
/// against).
pub fn compute_allowlist_root(members: &[Address]) -> Hash {
    if members.is_empty() {
        return [0u8; 32];
    }

    let mut level: Vec<Hash> = members.iter().map(leaf_hash).collect();

    while level.len() > 1 {
        let mut next_level = Vec::with_capacity((level.len() + 1) / 2);

        for chunk in level.chunks(2) {
            let left = &chunk[0];
            let right = chunk.get(1).unwrap_or(left); // Duplicate last if odd
            next_level.push(hash_concat(left, right));
        }

        level = next_level;
    }

    level[0]
}

/// Build a membership proof for the member at `index`.
pub fn build_membership_proof(
    members: &[Address],
    index: usize,
) -> Result<MembershipProof, DropError> {
    if index >= members.len() {
        return Err(DropError::InvalidMembershipProof);
    }

    if members.len() == 1 {
        return Ok(MembershipProof::empty());
    }

    let mut path = Vec::new();
    let mut level: Vec<Hash> = members.iter().map(leaf_hash).collect();
    let mut index = index;

    while level.len() > 1 {
        let sibling_index = if index % 2 == 0 { index + 1 } else { index - 1 };

        if sibling_index < level.len() {
            let position = if index % 2 == 0 {
                Position::Right // Sibling is on the right
            } else {
                Position::Left // Sibling is on the left
            };
            path.push(ProofNode {
                hash: level[sibling_index],
                position,
            });
        } else if index + 1 == level.len() {
            // Last element with no pair - duplicate self
            path.push(ProofNode {
                hash: level[index],
                position: Position::Right,
            });
        }

        // Move to next level
        let mut next_level = Vec::with_capacity((level.len() + 1) / 2);
        for chunk in level.chunks(2) {
            let left = &chunk[0];
            let right = chunk.get(1).unwrap_or(left);
            next_level.push(hash_concat(left, right));
        }
        level = next_level;
        index /= 2;
    }

    Ok(MembershipProof::new(path))
}
