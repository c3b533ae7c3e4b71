use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::error::{Error, Result};

/// One reviewee together with the reviewers assigned to their repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub reviewee: String,
    pub reviewers: Vec<String>,
}

/// Reviewer assignment for a whole run.
///
/// Entry order is the shuffled user order; the orchestrator dispatches side
/// effects in this order. Never mutated after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentMap {
    entries: Vec<Assignment>,
}

impl AssignmentMap {
    pub fn new(entries: Vec<Assignment>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Assignment] {
        &self.entries
    }

    pub fn reviewers_of(&self, user: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|a| a.reviewee == user)
            .map(|a| a.reviewers.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Assign `num_reviewers` reviewers to every user.
///
/// The user list is shuffled with `rng`, then entry `n` receives the next
/// `num_reviewers` users cyclically after position `n`. Each user ends up as
/// the i-th neighbor of exactly one other user for every offset i, so the
/// balance and no-self-review invariants hold for any permutation.
pub fn generate<R: Rng + ?Sized>(
    users: &[String],
    num_reviewers: usize,
    rng: &mut R,
) -> Result<AssignmentMap> {
    let distinct: HashSet<&str> = users.iter().map(String::as_str).collect();
    if distinct.len() != users.len() {
        return Err(Error::Assignment("duplicate user in user list".to_string()));
    }
    if users.len() <= num_reviewers {
        return Err(Error::Assignment(format!(
            "need more than {num_reviewers} users to assign {num_reviewers} reviewers, got {}",
            users.len()
        )));
    }

    let mut order: Vec<String> = users.to_vec();
    order.shuffle(rng);

    let entries = (0..order.len())
        .map(|n| Assignment {
            reviewee: order[n].clone(),
            reviewers: (1..=num_reviewers)
                .map(|i| order[(n + i) % order.len()].clone())
                .collect(),
        })
        .collect();

    Ok(AssignmentMap { entries })
}
