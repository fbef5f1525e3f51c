//! Validation of user-supplied onboarding inputs: repository URLs, the
//! project name derived from them, and maintainer e-mail addresses.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::error::CoreError;
use crate::types::ProjectId;

const ALLOWED_HOSTS: &[&str] = &["github.com", "gitlab.com"];

/// OSS-Fuzz project names never contain a `.`; anything that does is
/// treated as a repository URL.
pub fn looks_like_url(repo: &str) -> bool {
    repo.contains('.')
}

/// Check that `url` is an HTTPS GitHub or GitLab URL. Returns it trimmed.
pub fn sanitize_repo(url: &str) -> Result<String, CoreError> {
    let trimmed = url.trim();
    let invalid = |reason: &str| CoreError::InvalidRepoUrl {
        url: trimmed.to_string(),
        reason: reason.to_string(),
    };
    let parsed = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if parsed.scheme() != "https" {
        return Err(invalid("not HTTPS"));
    }
    let host = parsed.host_str().unwrap_or_default();
    let allowed = ALLOWED_HOSTS
        .iter()
        .any(|h| host == *h || host.ends_with(&format!(".{h}")));
    if !allowed {
        return Err(invalid("not GitHub or GitLab"));
    }
    Ok(trimmed.to_string())
}

/// Derive the project id from a repository URL: last path segment, `.git`
/// removed, lowercased.
pub fn repo_name(url: &str) -> Result<ProjectId, CoreError> {
    let last = url
        .trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let name = last.replace(".git", "").trim().to_lowercase();
    if name.is_empty() {
        return Err(CoreError::InvalidRepoUrl {
            url: url.to_string(),
            reason: "could not parse repository name".to_string(),
        });
    }
    ProjectId::new(name)
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$").expect("valid email regex")
    })
}

/// Validate a maintainer e-mail address. Returns it trimmed.
pub fn check_email(email: &str) -> Result<String, CoreError> {
    let trimmed = email.trim();
    if email_regex().is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(CoreError::InvalidEmail(trimmed.to_string()))
    }
}
