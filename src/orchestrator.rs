use std::collections::{HashMap, HashSet};

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::assign::{self, AssignmentMap};
use crate::config::Config;
use crate::directory::{NewIssue, Repo, RepositoryDirectory};
use crate::error::{Error, Result};
use crate::template;
use crate::validate;

/// Whether a side-effect request was actually sent to the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dispatch {
    Dispatched,
    Simulated,
}

/// Outcome of the two side effects for one (reviewee, reviewer) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairReport {
    pub reviewee: String,
    pub reviewer: String,
    pub repo: String,
    pub issue_title: String,
    pub collaborator: Dispatch,
    pub issue: Dispatch,
}

/// Summary of a completed run: the validated assignment plus one record per
/// (reviewee, reviewer) pair.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub assignment: AssignmentMap,
    pub pairs: Vec<PairReport>,
    pub dry_run: bool,
}

pub struct ReviewOrchestrator<D> {
    directory: D,
    config: Config,
}

impl<D: RepositoryDirectory> ReviewOrchestrator<D> {
    pub fn new(directory: D, config: Config) -> Self {
        Self { directory, config }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Derive the working user set, compute and verify the assignment, then
    /// dispatch (or simulate) the per-pair side effects.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<RunReport> {
        let config = &self.config;

        // The template gates every side effect; resolve it before touching
        // the directory so misconfiguration never costs an API call.
        let review_template = template::resolve_review_template(
            config.template_file.as_deref(),
            config.template_text.as_deref(),
        )?;
        // Probe render: a malformed title template must fail the run here,
        // not halfway through dispatching.
        template::render_title(&config.title_template, "reviewer", "reviewee")?;

        let repos = self.directory.list_repositories(&config.org)?;
        info!(org = %config.org, count = repos.len(), "listed organization repositories");

        let mut repos_by_user: HashMap<String, Repo> = HashMap::new();
        for repo in repos {
            if let Some(user) = repo.name.strip_prefix(&config.repo_prefix) {
                repos_by_user.insert(user.to_string(), repo);
            }
        }
        info!(
            prefix = %config.repo_prefix,
            count = repos_by_user.len(),
            "matched assignment repositories"
        );

        for skip in &config.skip_users {
            if repos_by_user.remove(skip).is_some() {
                info!(user = %skip, "skipping user repo");
            }
        }

        let mut users: Vec<String> = repos_by_user.keys().cloned().collect();
        // Stable input order so a fixed seed reproduces the run.
        users.sort();

        if users.len() < config.num_reviewers + 1 {
            return Err(Error::ConfigValidation(format!(
                "{} repositories remain after skips, need at least {} for {} reviewers",
                users.len(),
                config.num_reviewers + 1,
                config.num_reviewers
            )));
        }

        let map = assign::generate(&users, config.num_reviewers, rng)?;
        let user_set: HashSet<String> = users.iter().cloned().collect();
        let violations = validate::violations(&map, &user_set, config.num_reviewers);
        for violation in &violations {
            warn!(%violation, "assignment invariant violated");
        }
        if let Some(first) = violations.into_iter().next() {
            return Err(first.into());
        }

        for a in map.entries() {
            info!(reviewee = %a.reviewee, reviewers = ?a.reviewers, "assigned reviewers");
        }

        let mut pairs = Vec::new();
        for a in map.entries() {
            let repo = repos_by_user.get(&a.reviewee).ok_or_else(|| {
                Error::Assignment(format!("no repository for reviewee {}", a.reviewee))
            })?;
            for reviewer in &a.reviewers {
                let title = template::render_title(&config.title_template, reviewer, &a.reviewee)?;
                let dispatch = if config.dry_run {
                    Dispatch::Simulated
                } else {
                    Dispatch::Dispatched
                };

                info!(
                    repo = %repo.full_name(),
                    user = %reviewer,
                    dry_run = config.dry_run,
                    "add collaborator"
                );
                if !config.dry_run {
                    self.directory.grant_collaborator(repo, reviewer)?;
                }

                info!(
                    repo = %repo.full_name(),
                    title = %title,
                    dry_run = config.dry_run,
                    "create review issue"
                );
                if !config.dry_run {
                    let issue = NewIssue {
                        title: title.clone(),
                        body: review_template.clone(),
                        labels: vec!["peer_review".to_string()],
                        assignee: reviewer.clone(),
                    };
                    self.directory.create_issue(repo, &issue)?;
                }

                pairs.push(PairReport {
                    reviewee: a.reviewee.clone(),
                    reviewer: reviewer.clone(),
                    repo: repo.full_name(),
                    issue_title: title,
                    collaborator: dispatch,
                    issue: dispatch,
                });
            }
        }

        Ok(RunReport {
            assignment: map,
            pairs,
            dry_run: config.dry_run,
        })
    }
}
