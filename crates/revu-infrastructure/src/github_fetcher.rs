//! GitHub-backed ChangeFetcher implementation.
//!
//! Talks to the GitHub REST API: pull-request metadata for the head
//! revision, the changed-files listing, and the contents API for file
//! bodies (base64). Removed files are skipped; a file whose content
//! cannot be retrieved is still analyzed from its patch, matching how a
//! reviewer would treat an unreadable blob.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::StatusCode;
use revu_core::{ChangeFetcher, ChangedFile, FetchErrorKind, Result, RevuError};
use serde::Deserialize;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const ACCEPT_JSON: &str = "application/vnd.github.v3+json";

#[derive(Debug, Deserialize)]
struct PullRequest {
    head: PullRequestHead,
}

#[derive(Debug, Deserialize)]
struct PullRequestHead {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestFile {
    filename: String,
    status: String,
    #[serde(default)]
    patch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Contents {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

/// Fetches changed files from the GitHub REST API.
pub struct GitHubChangeFetcher {
    client: reqwest::Client,
    api_base: String,
}

impl GitHubChangeFetcher {
    pub fn new() -> Self {
        Self::with_api_base(DEFAULT_API_BASE)
    }

    /// Points the fetcher at a different API root (GitHub Enterprise,
    /// or a local stub in tests).
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Extracts `(owner, repo)` from a repository URL.
    ///
    /// Accepts `https://github.com/owner/repo` with or without a `.git`
    /// suffix or trailing path segments.
    pub fn parse_repo_url(repo_url: &str) -> Result<(String, String)> {
        let without_scheme = repo_url
            .strip_prefix("https://")
            .or_else(|| repo_url.strip_prefix("http://"))
            .ok_or_else(|| {
                RevuError::invalid_input(format!("repository URL '{}' is not http(s)", repo_url))
            })?;

        let mut segments = without_scheme.split('/').filter(|s| !s.is_empty());
        let _host = segments.next();
        let owner = segments.next();
        let repo = segments.next();

        match (owner, repo) {
            (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => Ok((
                owner.to_string(),
                repo.trim_end_matches(".git").to_string(),
            )),
            _ => Err(RevuError::invalid_input(format!(
                "repository URL '{}' has no owner/repo path",
                repo_url
            ))),
        }
    }

    fn map_status(status: StatusCode) -> FetchErrorKind {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchErrorKind::Auth,
            StatusCode::NOT_FOUND => FetchErrorKind::NotFound,
            _ => FetchErrorKind::Network,
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<T> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", ACCEPT_JSON)
            .header("User-Agent", "revu");
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RevuError::fetch(FetchErrorKind::Network, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RevuError::fetch(
                Self::map_status(status),
                format!("GET {} returned {}", url, status),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RevuError::fetch(FetchErrorKind::Network, e.to_string()))
    }

    async fn file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        rev: &str,
        token: Option<&str>,
    ) -> Result<String> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}?ref={}",
            self.api_base, owner, repo, path, rev
        );
        let contents: Contents = self.get_json(&url, token).await?;

        match (contents.encoding.as_deref(), contents.content) {
            (Some("base64"), Some(content)) => {
                // GitHub wraps base64 payloads in newlines.
                let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
                let bytes = BASE64.decode(compact.as_bytes()).map_err(|e| {
                    RevuError::fetch(
                        FetchErrorKind::Network,
                        format!("invalid base64 for {}: {}", path, e),
                    )
                })?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            (_, Some(content)) => Ok(content),
            (_, None) => Ok(String::new()),
        }
    }
}

impl Default for GitHubChangeFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChangeFetcher for GitHubChangeFetcher {
    async fn fetch_changed_files(
        &self,
        repo_url: &str,
        pr_number: u64,
        token: Option<&str>,
    ) -> Result<Vec<ChangedFile>> {
        let (owner, repo) = Self::parse_repo_url(repo_url)?;

        let pr_url = format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_base, owner, repo, pr_number
        );
        let pr: PullRequest = self.get_json(&pr_url, token).await?;

        let files_url = format!("{}/files", pr_url);
        let pr_files: Vec<PullRequestFile> = self.get_json(&files_url, token).await?;
        tracing::info!(
            owner = %owner,
            repo = %repo,
            pr = pr_number,
            files = pr_files.len(),
            "fetched pull request file listing"
        );

        let mut changed = Vec::with_capacity(pr_files.len());
        for file in pr_files {
            if file.status == "removed" {
                continue;
            }

            let content = match self
                .file_content(&owner, &repo, &file.filename, &pr.head.sha, token)
                .await
            {
                Ok(content) => content,
                Err(e) => {
                    // An unreadable blob still gets analyzed from its patch.
                    tracing::warn!(path = %file.filename, error = %e, "failed to fetch file content");
                    String::new()
                }
            };

            let mut changed_file = ChangedFile::new(file.filename, content);
            if let Some(patch) = file.patch {
                changed_file = changed_file.with_patch(patch);
            }
            changed.push(changed_file);
        }

        Ok(changed)
    }
}
