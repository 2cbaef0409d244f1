// src/verification/aggregator.rs

//! Bottom-up verification status, computed on demand. Pure conjunctions with
//! no caching and no invalidation to manage; `Iterator::all` short-circuits
//! on the first falsifying child.

use super::types::{ProofObligation, ProofStatus};

/// A verification file is verified iff every one of its proof obligations is
/// Verified.
///
/// NOTE: this is vacuously true for an empty obligation set. That is
/// intentional; see the pinned test below before changing it.
pub fn verification_file_verified(obligations: &[ProofObligation]) -> bool {
    obligations
        .iter()
        .all(|po| po.status == ProofStatus::Verified)
}

/// A source file is verified iff it has at least one verification file and
/// every one of them is verified. Zero verification files is never verified.
pub fn project_file_verified<I>(verification_files: I) -> bool
where
    I: IntoIterator<Item = bool>,
{
    let mut any = false;
    for verified in verification_files {
        if !verified {
            return false;
        }
        any = true;
    }
    any
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn obligation(status: ProofStatus) -> ProofObligation {
        ProofObligation {
            id: "po".to_string(),
            verification_file_id: "vf".to_string(),
            goal: "forall x. x = x".to_string(),
            strategy: None,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn all_verified_obligations_verify_the_file() {
        let obligations = vec![
            obligation(ProofStatus::Verified),
            obligation(ProofStatus::Verified),
        ];
        assert!(verification_file_verified(&obligations));
    }

    #[test]
    fn one_falsifying_obligation_blocks_verification() {
        let obligations = vec![
            obligation(ProofStatus::Verified),
            obligation(ProofStatus::NotVerified),
        ];
        assert!(!verification_file_verified(&obligations));

        let undetermined = vec![obligation(ProofStatus::Undetermined)];
        assert!(!verification_file_verified(&undetermined));
    }

    // Pins the vacuous-truth edge case: a verification file with zero
    // obligations counts as verified. Intentional-but-surprising; this test
    // exists so the behavior cannot change silently.
    #[test]
    fn empty_obligation_set_is_vacuously_verified() {
        assert!(verification_file_verified(&[]));
    }

    #[test]
    fn source_file_with_no_verification_files_is_never_verified() {
        assert!(!project_file_verified(std::iter::empty()));
    }

    #[test]
    fn source_file_requires_all_verification_files_verified() {
        assert!(project_file_verified([true, true]));
        assert!(!project_file_verified([true, false]));
    }
}
