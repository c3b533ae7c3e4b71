use std::process::Command;
use std::thread;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{DirectoryError, IssueHandle, NewIssue, Repo, RepositoryDirectory};

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

#[derive(Debug, Deserialize)]
struct GhRepo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GhIssue {
    number: u64,
    html_url: String,
}

/// Abstraction over `gh` CLI execution for testability.
pub trait GhClient {
    fn run(&self, args: &[&str]) -> Result<String, DirectoryError>;
}

/// Real `gh` CLI client with retry and exponential backoff.
///
/// Only transport-level failures are retried; authentication, missing-object
/// and permission responses fail immediately.
struct DefaultGhClient;

impl GhClient for DefaultGhClient {
    fn run(&self, args: &[&str]) -> Result<String, DirectoryError> {
        retry_with_backoff(|| {
            let output = Command::new("gh")
                .args(args)
                .output()
                .map_err(|e| DirectoryError::Request(format!("failed to run gh: {e}")))?;

            if output.status.success() {
                String::from_utf8(output.stdout)
                    .map_err(|e| DirectoryError::Request(format!("invalid utf8 from gh: {e}")))
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(classify_gh_failure(&stderr))
            }
        })
    }
}

/// Map a failed `gh` invocation's stderr onto the directory error taxonomy.
fn classify_gh_failure(stderr: &str) -> DirectoryError {
    let message = stderr.trim().to_string();
    let lower = message.to_ascii_lowercase();
    if lower.contains("http 401") || lower.contains("bad credentials") {
        DirectoryError::Auth(message)
    } else if lower.contains("http 404") || lower.contains("not found") {
        DirectoryError::NotFound(message)
    } else if lower.contains("http 403") || lower.contains("forbidden") {
        DirectoryError::Permission(message)
    } else {
        DirectoryError::Request(message)
    }
}

/// GitHub-backed repository directory driven through the `gh` CLI.
pub struct GhDirectory {
    client: Box<dyn GhClient>,
}

impl GhDirectory {
    pub fn new() -> Self {
        Self {
            client: Box::new(DefaultGhClient),
        }
    }

    #[cfg(test)]
    fn with_client(client: Box<dyn GhClient>) -> Self {
        Self { client }
    }
}

impl Default for GhDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryDirectory for GhDirectory {
    fn list_repositories(&self, org: &str) -> Result<Vec<Repo>, DirectoryError> {
        let json = self
            .client
            .run(&["repo", "list", org, "--json", "name", "--limit", "1000"])?;

        let repos: Vec<GhRepo> = serde_json::from_str(&json)
            .map_err(|e| DirectoryError::Request(format!("failed to parse repo list: {e}")))?;

        debug!(org, count = repos.len(), "listed repositories");
        Ok(repos
            .into_iter()
            .map(|r| Repo::new(org, r.name))
            .collect())
    }

    fn grant_collaborator(&self, repo: &Repo, user: &str) -> Result<(), DirectoryError> {
        let path = format!("repos/{}/{}/collaborators/{user}", repo.org, repo.name);
        self.client.run(&[
            "api",
            "-X",
            "PUT",
            path.as_str(),
            "-f",
            "permission=push",
            "--silent",
        ])?;
        debug!(repo = %repo.full_name(), user, "granted collaborator");
        Ok(())
    }

    fn create_issue(&self, repo: &Repo, issue: &NewIssue) -> Result<IssueHandle, DirectoryError> {
        let path = format!("repos/{}/{}/issues", repo.org, repo.name);
        let title = format!("title={}", issue.title);
        let body = format!("body={}", issue.body);
        let assignee = format!("assignees[]={}", issue.assignee);
        let labels: Vec<String> = issue
            .labels
            .iter()
            .map(|l| format!("labels[]={l}"))
            .collect();

        let mut args: Vec<&str> = vec![
            "api",
            "-X",
            "POST",
            path.as_str(),
            "-f",
            title.as_str(),
            "-f",
            body.as_str(),
        ];
        for label in &labels {
            args.push("-f");
            args.push(label.as_str());
        }
        args.push("-f");
        args.push(assignee.as_str());

        let json = self.client.run(&args)?;
        let created: GhIssue = serde_json::from_str(&json)
            .map_err(|e| DirectoryError::Request(format!("failed to parse created issue: {e}")))?;

        debug!(repo = %repo.full_name(), number = created.number, "created issue");
        Ok(IssueHandle {
            number: created.number,
            url: created.html_url,
        })
    }
}

fn retry_with_backoff<F, T>(f: F) -> Result<T, DirectoryError>
where
    F: Fn() -> Result<T, DirectoryError>,
{
    retry_with_backoff_ms(f, INITIAL_BACKOFF_MS, MAX_RETRIES)
}

fn retry_with_backoff_ms<F, T>(
    f: F,
    initial_backoff_ms: u64,
    max_retries: u32,
) -> Result<T, DirectoryError>
where
    F: Fn() -> Result<T, DirectoryError>,
{
    let mut backoff_ms = initial_backoff_ms;

    for attempt in 1..=max_retries {
        match f() {
            Ok(val) => return Ok(val),
            Err(DirectoryError::Request(e)) if attempt < max_retries => {
                warn!(attempt, error = %e, backoff_ms, "retrying after transient error");
                thread::sleep(Duration::from_millis(backoff_ms));
                backoff_ms *= 2;
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!()
}
