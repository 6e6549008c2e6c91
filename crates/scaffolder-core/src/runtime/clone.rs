//! Repository cloning via the git CLI

use crate::error::CloneError;
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use url::Url;

const ALLOWED_SCHEMES: &[&str] = &["http", "https", "ssh", "git", "file"];

/// Check that `raw` is something git can clone from.
///
/// Accepts URLs with a known transport scheme and scp-like `user@host:path`.
pub fn validate_url(raw: &str) -> Result<(), CloneError> {
    let invalid = |reason: &str| CloneError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid("URL is empty"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid("URL must not start with '-'"));
    }

    if is_scp_like(trimmed) {
        return Ok(());
    }

    let url = Url::parse(trimmed).map_err(|e| invalid(&e.to_string()))?;
    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(invalid(&format!(
            "unsupported scheme '{}' (expected one of {})",
            url.scheme(),
            ALLOWED_SCHEMES.join(", ")
        )));
    }
    if url.scheme() != "file" && url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("URL has no host"));
    }

    Ok(())
}

/// `git@github.com:owner/repo.git` style addresses
fn is_scp_like(raw: &str) -> bool {
    if raw.contains("://") {
        return false;
    }
    let Some((host_part, path)) = raw.split_once(':') else {
        return false;
    };
    let Some((user, host)) = host_part.split_once('@') else {
        return false;
    };
    !user.is_empty()
        && !host.is_empty()
        && !path.is_empty()
        && !host.contains('/')
        && !user.contains('/')
}

/// Clone `url` into `dest`.
///
/// Nothing touches the filesystem until the URL has been validated and `dest`
/// is known not to exist. If git fails after creating `dest`, it is removed.
pub async fn clone_repository(
    url: &str,
    dest: &Path,
    limit: Option<Duration>,
) -> Result<(), CloneError> {
    validate_url(url)?;

    if dest.exists() {
        return Err(CloneError::DestinationExists(dest.to_path_buf()));
    }

    println!(
        "{} {}",
        "Running:".dimmed(),
        format!("git clone --progress -- {} {}", url.trim(), dest.display()).yellow()
    );

    let mut child = TokioCommand::new("git")
        .arg("clone")
        .arg("--progress")
        .arg("--")
        .arg(url.trim())
        .arg(dest)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .map_err(CloneError::GitUnavailable)?;

    let waited = match limit {
        Some(limit) => timeout(limit, child.wait()).await,
        None => Ok(child.wait().await),
    };

    let outcome = match waited {
        Ok(Ok(status)) if status.success() => Ok(()),
        Ok(Ok(status)) => Err(CloneError::GitFailed {
            code: status.code(),
        }),
        Ok(Err(e)) => Err(CloneError::GitUnavailable(e)),
        Err(_) => {
            let _ = child.kill().await;
            Err(CloneError::TimedOut(
                limit.map(|l| l.as_secs()).unwrap_or_default(),
            ))
        }
    };

    if outcome.is_err() && dest.exists() {
        let _ = tokio::fs::remove_dir_all(dest).await;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;
    use tempfile::TempDir;

    #[test]
    fn test_accepts_common_git_urls() {
        for ok in [
            "https://github.com/ollama/ollama.git",
            "http://example.com/repo",
            "ssh://git@example.com/owner/repo.git",
            "git://example.com/repo.git",
            "file:///tmp/repo",
            "git@github.com:owner/repo.git",
        ] {
            assert!(validate_url(ok).is_ok(), "rejected {}", ok);
        }
    }

    #[test]
    fn test_rejects_unknown_schemes_and_garbage() {
        for bad in [
            "",
            "bad://url",
            "ftp://example.com/repo",
            "not a url",
            "https://",
            "--template=evil@host:path",
            "-uevil@host:path",
        ] {
            assert!(validate_url(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[tokio::test]
    async fn test_bad_url_does_not_create_destination() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("dest");

        let err = clone_repository("bad://url", &dest, None).await.unwrap_err();

        assert!(matches!(err, CloneError::InvalidUrl { .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_option_like_url_never_reaches_git() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("dest");

        let err = clone_repository("--template=evil@host:path", &dest, None)
            .await
            .unwrap_err();

        assert!(matches!(err, CloneError::InvalidUrl { .. }));
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn test_existing_destination_is_rejected() {
        let tmp = TempDir::new().unwrap();

        let err = clone_repository("https://example.com/repo.git", tmp.path(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, CloneError::DestinationExists(_)));
    }

    fn git(dir: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .current_dir(dir)
            .args(args)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_clones_local_repository() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        std::fs::create_dir(&source).unwrap();

        if !git(&source, &["init", "-q"]) {
            // git isn't installed here
            return;
        }
        std::fs::write(source.join("README.md"), "# hi\n").unwrap();
        assert!(git(&source, &["add", "."]));
        assert!(git(
            &source,
            &[
                "-c",
                "user.email=test@example.com",
                "-c",
                "user.name=Test",
                "commit",
                "-q",
                "-m",
                "init"
            ]
        ));

        let url = Url::from_directory_path(&source).unwrap();
        let dest = tmp.path().join("copy");
        clone_repository(url.as_str(), &dest, Some(Duration::from_secs(30)))
            .await
            .unwrap();

        assert!(dest.join("README.md").is_file());
    }

    #[tokio::test]
    async fn test_failed_clone_cleans_up() {
        let tmp = TempDir::new().unwrap();
        if !git(tmp.path(), &["--version"]) {
            return;
        }
        let missing = Url::from_directory_path(tmp.path().join("missing")).unwrap();
        let dest = tmp.path().join("copy");

        let err = clone_repository(missing.as_str(), &dest, Some(Duration::from_secs(30)))
            .await
            .unwrap_err();

        assert!(matches!(err, CloneError::GitFailed { .. }));
        assert!(!dest.exists());
    }
}
