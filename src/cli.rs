use clap::Parser;

/// peerset: classroom peer-review assignment
#[derive(Parser, Debug, Clone)]
#[command(name = "peerset", version, about)]
pub struct Cli {
    /// Classroom organization whose repositories get peer reviews
    #[arg(long)]
    pub org: Option<String>,

    /// Assignment repository prefix, e.g. "hw1-"; the name after the prefix
    /// is the owning student's username
    #[arg(long)]
    pub repo_prefix: Option<String>,

    /// Skip this user's repository, e.g. instructor or example repos (repeatable)
    #[arg(long = "skip-user")]
    pub skip_users: Vec<String>,

    /// Number of reviewers assigned per repository
    #[arg(long)]
    pub reviewers: Option<usize>,

    /// Issue title template, rendered with {{reviewer}} and {{reviewee}}
    #[arg(long)]
    pub title_template: Option<String>,

    /// File containing the markdown review template for issue bodies
    #[arg(long)]
    pub template_file: Option<String>,

    /// Inline markdown review template for issue bodies
    #[arg(long)]
    pub template_text: Option<String>,

    /// Perform the access grants and issue creation (default is a dry run)
    #[arg(long)]
    pub no_dry_run: bool,

    /// Seed the shuffle for a reproducible assignment
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Path to config file
    #[arg(long)]
    pub config: Option<String>,
}
