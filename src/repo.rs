//! Repository paths (`owner/repo`).
//!
//! The content script hands over the page URL; sites need `owner/repo`.
//! Routes that live at the top level of github.com but are not user or
//! organization names are rejected.

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static GITHUB_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?github\.com/([^/?#]+)/([^/?#]+)")
        .expect("GitHub URL pattern is valid")
});

static OWNER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]*)$").expect("owner pattern is valid")
});

static REPO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("repo pattern is valid"));

/// First path segments on github.com that are not owners.
const RESERVED_OWNERS: &[&str] = &[
    "about",
    "account",
    "apps",
    "codespaces",
    "collections",
    "customer-stories",
    "dashboard",
    "enterprise",
    "explore",
    "features",
    "issues",
    "join",
    "login",
    "logout",
    "marketplace",
    "new",
    "notifications",
    "orgs",
    "organizations",
    "pricing",
    "pulls",
    "search",
    "security",
    "settings",
    "signup",
    "site",
    "sponsors",
    "topics",
    "trending",
    "users",
];

/// A GitHub repository identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoPath {
    pub owner: String,
    pub repo: String,
}

impl RepoPath {
    /// Parse either a github.com URL or a bare `owner/repo`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (owner, repo) = if input.starts_with("http://") || input.starts_with("https://") {
            let caps = GITHUB_URL_RE.captures(input).ok_or_else(|| {
                Error::Validation(format!("not a GitHub repository URL: {}", input))
            })?;
            (caps[1].to_string(), caps[2].to_string())
        } else {
            let trimmed = input.trim_matches('/');
            match trimmed.split_once('/') {
                Some((owner, repo)) if !repo.contains('/') => (owner.to_string(), repo.to_string()),
                _ => {
                    return Err(Error::Validation(format!(
                        "expected owner/repo, got: {}",
                        input
                    )));
                }
            }
        };
        Self::new(&owner, &repo)
    }

    /// Build from parts, validating both.
    pub fn new(owner: &str, repo: &str) -> Result<Self> {
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if RESERVED_OWNERS.contains(&owner.to_lowercase().as_str()) {
            return Err(Error::Validation(format!(
                "'{}' is a GitHub page, not a repository owner",
                owner
            )));
        }
        if !OWNER_RE.is_match(owner) {
            return Err(Error::Validation(format!("invalid owner: {}", owner)));
        }
        if !REPO_RE.is_match(repo) || repo == "." || repo == ".." {
            return Err(Error::Validation(format!("invalid repository name: {}", repo)));
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// `owner/repo`, as substituted into URL templates.
    pub fn as_path(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl std::fmt::Display for RepoPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl std::str::FromStr for RepoPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
