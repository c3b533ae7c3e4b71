#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashSet;

use peerset::config::Config;
use peerset::directory::{DirectoryError, IssueHandle, NewIssue, Repo, RepositoryDirectory};

/// One recorded request against the mock directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryCall {
    List {
        org: String,
    },
    Grant {
        repo: String,
        user: String,
    },
    Issue {
        repo: String,
        title: String,
        body: String,
        labels: Vec<String>,
        assignee: String,
    },
}

/// In-memory directory that records every request it receives.
pub struct RecordingDirectory {
    repos: Vec<Repo>,
    pub calls: RefCell<Vec<DirectoryCall>>,
    issues_created: RefCell<usize>,
    fail_issue_at: Option<usize>,
}

impl RecordingDirectory {
    pub fn with_repos(org: &str, names: &[&str]) -> Self {
        Self {
            repos: names.iter().map(|n| Repo::new(org, *n)).collect(),
            calls: RefCell::new(Vec::new()),
            issues_created: RefCell::new(0),
            fail_issue_at: None,
        }
    }

    /// Fail the n-th (zero-based) create_issue request with a permission error.
    pub fn failing_issue_at(mut self, n: usize) -> Self {
        self.fail_issue_at = Some(n);
        self
    }

    pub fn grant_calls(&self) -> Vec<DirectoryCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, DirectoryCall::Grant { .. }))
            .cloned()
            .collect()
    }

    pub fn issue_calls(&self) -> Vec<DirectoryCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, DirectoryCall::Issue { .. }))
            .cloned()
            .collect()
    }

    pub fn list_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, DirectoryCall::List { .. }))
            .count()
    }
}

impl RepositoryDirectory for RecordingDirectory {
    fn list_repositories(&self, org: &str) -> Result<Vec<Repo>, DirectoryError> {
        self.calls.borrow_mut().push(DirectoryCall::List {
            org: org.to_string(),
        });
        Ok(self.repos.clone())
    }

    fn grant_collaborator(&self, repo: &Repo, user: &str) -> Result<(), DirectoryError> {
        self.calls.borrow_mut().push(DirectoryCall::Grant {
            repo: repo.full_name(),
            user: user.to_string(),
        });
        Ok(())
    }

    fn create_issue(&self, repo: &Repo, issue: &NewIssue) -> Result<IssueHandle, DirectoryError> {
        let n = *self.issues_created.borrow();
        if self.fail_issue_at == Some(n) {
            return Err(DirectoryError::Permission(
                "issues are disabled on this repository".to_string(),
            ));
        }
        *self.issues_created.borrow_mut() += 1;
        self.calls.borrow_mut().push(DirectoryCall::Issue {
            repo: repo.full_name(),
            title: issue.title.clone(),
            body: issue.body.clone(),
            labels: issue.labels.clone(),
            assignee: issue.assignee.clone(),
        });
        Ok(IssueHandle {
            number: (n + 1) as u64,
            url: format!("https://github.com/{}/issues/{}", repo.full_name(), n + 1),
        })
    }
}

/// Sensible default `Config` for tests. Callers override fields via struct
/// update syntax.
pub fn test_config(prefix: &str, num_reviewers: usize) -> Config {
    Config {
        org: "classroom".to_string(),
        repo_prefix: prefix.to_string(),
        skip_users: HashSet::new(),
        num_reviewers,
        title_template: "Peer Review: {{reviewer}}".to_string(),
        template_file: None,
        template_text: Some("## Review checklist".to_string()),
        dry_run: false,
        seed: None,
        json: false,
    }
}
