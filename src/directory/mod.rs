pub mod github;

use serde::Serialize;

/// A repository in the classroom organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repo {
    pub org: String,
    pub name: String,
}

impl Repo {
    pub fn new(org: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            name: name.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.org, self.name)
    }
}

/// Issue to file against a reviewee's repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub assignee: String,
}

/// Handle of an issue created in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueHandle {
    pub number: u64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    Permission(String),

    #[error("request failed: {0}")]
    Request(String),
}

/// Directory of per-student repositories plus the two mutations a review
/// run performs against them.
pub trait RepositoryDirectory {
    /// List all repositories in the organization.
    fn list_repositories(&self, org: &str) -> Result<Vec<Repo>, DirectoryError>;

    /// Give `user` read/write access to `repo`.
    fn grant_collaborator(&self, repo: &Repo, user: &str) -> Result<(), DirectoryError>;

    /// File a tracking issue on `repo`.
    fn create_issue(&self, repo: &Repo, issue: &NewIssue) -> Result<IssueHandle, DirectoryError>;
}
