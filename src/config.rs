use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};

pub const DEFAULT_TITLE_TEMPLATE: &str = "Peer Review: {{reviewer}}";
pub const DEFAULT_CONFIG_FILE: &str = "peerset.toml";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub org: Option<String>,
    pub repo_prefix: Option<String>,
    pub skip_users: Option<Vec<String>>,
    pub num_reviewers: Option<usize>,
    pub title_template: Option<String>,
    pub template_file: Option<String>,
    pub template_text: Option<String>,
    pub dry_run: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub org: String,
    pub repo_prefix: String,
    pub skip_users: HashSet<String>,
    pub num_reviewers: usize,
    pub title_template: String,
    pub template_file: Option<String>,
    pub template_text: Option<String>,
    pub dry_run: bool,
    pub seed: Option<u64>,
    pub json: bool,
}

impl Config {
    /// Load the config file (explicit path, or `peerset.toml` when present),
    /// merge CLI overrides on top, then validate the result.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file_config = match &cli.config {
            Some(path) => {
                let path = Path::new(path);
                if !path.exists() {
                    return Err(Error::ConfigNotFound(path.to_path_buf()));
                }
                parse_config(&std::fs::read_to_string(path)?)?
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    parse_config(&std::fs::read_to_string(path)?)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let config = merge(file_config, cli);
        validate(&config)?;
        Ok(config)
    }
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

fn validate(config: &Config) -> Result<()> {
    if config.org.is_empty() {
        return Err(Error::ConfigValidation(
            "org is required (set it in the config file or pass --org)".to_string(),
        ));
    }
    match (&config.template_file, &config.template_text) {
        (Some(_), Some(_)) => Err(Error::ConfigValidation(
            "both template_file and template_text supplied, expected exactly one".to_string(),
        )),
        (None, None) => Err(Error::ConfigValidation(
            "no review template configured, supply template_file or template_text".to_string(),
        )),
        _ => Ok(()),
    }
}

pub fn merge(file: ConfigFile, cli: &Cli) -> Config {
    let mut skip_users: HashSet<String> =
        file.skip_users.unwrap_or_default().into_iter().collect();
    skip_users.extend(cli.skip_users.iter().cloned());

    Config {
        org: cli.org.clone().or(file.org).unwrap_or_default(),
        repo_prefix: cli
            .repo_prefix
            .clone()
            .or(file.repo_prefix)
            .unwrap_or_default(),
        skip_users,
        num_reviewers: cli.reviewers.or(file.num_reviewers).unwrap_or(2),
        title_template: cli
            .title_template
            .clone()
            .or(file.title_template)
            .unwrap_or_else(|| DEFAULT_TITLE_TEMPLATE.to_string()),
        template_file: cli.template_file.clone().or(file.template_file),
        template_text: cli.template_text.clone().or(file.template_text),
        // Side effects require an explicit opt-in.
        dry_run: if cli.no_dry_run {
            false
        } else {
            file.dry_run.unwrap_or(true)
        },
        seed: cli.seed,
        json: cli.json,
    }
}
