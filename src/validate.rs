use std::collections::{HashMap, HashSet};

use crate::assign::AssignmentMap;

/// A single invariant violation found in an assignment map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{user} has {actual} reviewers, expected {expected}")]
    WrongReviewerCount {
        user: String,
        expected: usize,
        actual: usize,
    },

    #[error("{user} lists {reviewer} as a reviewer more than once")]
    DuplicateReviewer { user: String, reviewer: String },

    #[error("{user} is assigned to review their own repository")]
    SelfReview { user: String },

    #[error("{user} serves as reviewer {actual} times, expected {expected}")]
    LoadImbalance {
        user: String,
        expected: usize,
        actual: usize,
    },

    #[error("assignment covers a different user set: {detail}")]
    UserSetMismatch { detail: String },
}

/// Enumerate every invariant violation in `map`.
///
/// The checks re-derive the generator's guarantees from scratch so a buggy
/// or alternate generator is caught before any side effect is dispatched.
pub fn violations(
    map: &AssignmentMap,
    users: &HashSet<String>,
    num_reviewers: usize,
) -> Vec<ValidationError> {
    let mut found = Vec::new();

    for a in map.entries() {
        if a.reviewers.len() != num_reviewers {
            found.push(ValidationError::WrongReviewerCount {
                user: a.reviewee.clone(),
                expected: num_reviewers,
                actual: a.reviewers.len(),
            });
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for r in &a.reviewers {
            if !seen.insert(r.as_str()) {
                found.push(ValidationError::DuplicateReviewer {
                    user: a.reviewee.clone(),
                    reviewer: r.clone(),
                });
            }
        }
        if a.reviewers.contains(&a.reviewee) {
            found.push(ValidationError::SelfReview {
                user: a.reviewee.clone(),
            });
        }
    }

    let mut load: HashMap<&str, usize> = HashMap::new();
    for a in map.entries() {
        for r in &a.reviewers {
            *load.entry(r.as_str()).or_default() += 1;
        }
    }
    let mut sorted_users: Vec<&String> = users.iter().collect();
    sorted_users.sort();
    for user in sorted_users {
        let actual = load.get(user.as_str()).copied().unwrap_or(0);
        if actual != num_reviewers {
            found.push(ValidationError::LoadImbalance {
                user: user.clone(),
                expected: num_reviewers,
                actual,
            });
        }
    }

    let reviewees: HashSet<&str> = map.entries().iter().map(|a| a.reviewee.as_str()).collect();
    let expected: HashSet<&str> = users.iter().map(String::as_str).collect();
    let mut missing: Vec<&str> = expected.difference(&reviewees).copied().collect();
    let mut unexpected: Vec<&str> = reviewees.difference(&expected).copied().collect();
    missing.sort_unstable();
    unexpected.sort_unstable();
    if !missing.is_empty() || !unexpected.is_empty() {
        found.push(ValidationError::UserSetMismatch {
            detail: format!("missing reviewees {missing:?}, unexpected reviewees {unexpected:?}"),
        });
    }
    let mut unknown: Vec<&str> = load
        .keys()
        .copied()
        .filter(|r| !expected.contains(r))
        .collect();
    unknown.sort_unstable();
    if !unknown.is_empty() {
        found.push(ValidationError::UserSetMismatch {
            detail: format!("reviewers outside the user set {unknown:?}"),
        });
    }

    found
}

/// Check all assignment invariants, failing on the first violation found.
pub fn validate(
    map: &AssignmentMap,
    users: &HashSet<String>,
    num_reviewers: usize,
) -> Result<(), ValidationError> {
    match violations(map, users, num_reviewers).into_iter().next() {
        Some(v) => Err(v),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assign::{Assignment, generate};

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn user_set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn entry(reviewee: &str, reviewers: &[&str]) -> Assignment {
        Assignment {
            reviewee: reviewee.to_string(),
            reviewers: reviewers.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_accepts_generated_assignments() {
        for m in 2..8usize {
            for k in 0..m {
                let list: Vec<String> = (0..m).map(|i| format!("user{i}")).collect();
                let map = generate(&list, k, &mut StdRng::seed_from_u64(99)).unwrap();
                let users: HashSet<String> = list.iter().cloned().collect();
                assert_eq!(validate(&map, &users, k), Ok(()), "m={m} k={k}");
            }
        }
    }

    #[test]
    fn test_rejects_wrong_reviewer_count() {
        let map = AssignmentMap::new(vec![
            entry("alice", &["bob"]),
            entry("bob", &["alice", "alice"]),
        ]);
        let err = validate(&map, &user_set(&["alice", "bob"]), 1).unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongReviewerCount {
                user: "bob".to_string(),
                expected: 1,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_rejects_duplicate_reviewer() {
        let map = AssignmentMap::new(vec![
            entry("alice", &["bob", "bob"]),
            entry("bob", &["alice", "carol"]),
            entry("carol", &["alice", "bob"]),
        ]);
        let users = user_set(&["alice", "bob", "carol"]);
        let err = validate(&map, &users, 2).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateReviewer {
                user: "alice".to_string(),
                reviewer: "bob".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_self_review() {
        let map = AssignmentMap::new(vec![
            entry("alice", &["alice"]),
            entry("bob", &["alice"]),
        ]);
        let err = validate(&map, &user_set(&["alice", "bob"]), 1).unwrap_err();
        assert_eq!(
            err,
            ValidationError::SelfReview {
                user: "alice".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_unbalanced_load() {
        // carol reviews twice, alice never
        let map = AssignmentMap::new(vec![
            entry("alice", &["carol"]),
            entry("bob", &["carol"]),
            entry("carol", &["bob"]),
        ]);
        let users = user_set(&["alice", "bob", "carol"]);
        let err = validate(&map, &users, 1).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LoadImbalance {
                user: "alice".to_string(),
                expected: 1,
                actual: 0,
            }
        );
    }

    #[test]
    fn test_rejects_missing_reviewee() {
        let map = AssignmentMap::new(vec![entry("alice", &["bob"]), entry("bob", &["alice"])]);
        let users = user_set(&["alice", "bob", "carol"]);
        let vs = violations(&map, &users, 1);
        assert!(vs
            .iter()
            .any(|v| matches!(v, ValidationError::UserSetMismatch { .. })));
    }

    #[test]
    fn test_rejects_reviewer_outside_user_set() {
        let map = AssignmentMap::new(vec![
            entry("alice", &["mallory"]),
            entry("bob", &["alice"]),
        ]);
        let users = user_set(&["alice", "bob"]);
        let vs = violations(&map, &users, 1);
        assert!(vs.iter().any(|v| matches!(
            v,
            ValidationError::UserSetMismatch { detail } if detail.contains("mallory")
        )));
    }

    #[test]
    fn test_enumerates_multiple_violations() {
        let map = AssignmentMap::new(vec![
            entry("alice", &["alice"]),
            entry("bob", &[]),
        ]);
        let vs = violations(&map, &user_set(&["alice", "bob"]), 1);
        assert!(vs.len() >= 2);
        assert!(vs
            .iter()
            .any(|v| matches!(v, ValidationError::SelfReview { .. })));
        assert!(vs
            .iter()
            .any(|v| matches!(v, ValidationError::WrongReviewerCount { .. })));
    }

    #[test]
    fn test_accepts_empty_reviewers_when_k_is_zero() {
        let map = AssignmentMap::new(vec![entry("alice", &[]), entry("bob", &[])]);
        assert_eq!(validate(&map, &user_set(&["alice", "bob"]), 0), Ok(()));
    }
}
