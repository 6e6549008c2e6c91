//! Writes resolved template files under a project root

use crate::error::{Result, ScaffoldError, WriteFailure};
use crate::templates::registry::TemplateFile;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files written by a successful [`materialize`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    pub root: PathBuf,
    pub written: Vec<String>,
}

/// Write `files` under `root`, in order.
///
/// Refuses to touch a root that already exists with content. Individual write
/// failures don't stop the remaining writes; they are collected and returned
/// as [`ScaffoldError::PartialFailure`].
pub async fn materialize(root: &Path, files: &[TemplateFile]) -> Result<WriteReport> {
    ensure_root_available(root).await?;

    fs::create_dir_all(root)
        .await
        .map_err(|source| ScaffoldError::CreateDir {
            path: root.to_path_buf(),
            source,
        })?;

    let mut written = Vec::new();
    let mut failed = Vec::new();

    for file in files {
        let target = root.join(file.path.as_str());
        match write_file(&target, &file.content).await {
            Ok(()) => written.push(file.path.to_string()),
            Err(e) => failed.push(WriteFailure {
                path: file.path.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    if failed.is_empty() {
        Ok(WriteReport {
            root: root.to_path_buf(),
            written,
        })
    } else {
        Err(ScaffoldError::PartialFailure { written, failed })
    }
}

async fn ensure_root_available(root: &Path) -> Result<()> {
    let conflict = || ScaffoldError::PathConflict {
        root: root.to_path_buf(),
    };

    // Follows symlinks, so a link to an empty directory is usable
    let metadata = match fs::metadata(root).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(ScaffoldError::CreateDir {
                path: root.to_path_buf(),
                source,
            })
        }
    };

    if !metadata.is_dir() {
        return Err(conflict());
    }

    let mut entries = fs::read_dir(root)
        .await
        .map_err(|source| ScaffoldError::CreateDir {
            path: root.to_path_buf(),
            source,
        })?;
    match entries.next_entry().await {
        Ok(None) => Ok(()),
        Ok(Some(_)) => Err(conflict()),
        Err(source) => Err(ScaffoldError::CreateDir {
            path: root.to_path_buf(),
            source,
        }),
    }
}

async fn write_file(target: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(target, content).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Feature, ProjectName, ScaffoldRequest, StackKind, TestFramework};
    use crate::templates::registry::{resolve_templates, TemplatePath};
    use tempfile::TempDir;
    use walkdir::WalkDir;

    fn file(path: &str, content: &str) -> TemplateFile {
        TemplateFile {
            path: TemplatePath::parse(path).unwrap(),
            content: content.to_string(),
        }
    }

    fn tree(root: &Path) -> Vec<String> {
        let mut entries: Vec<String> = WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| {
                e.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        entries.sort();
        entries
    }

    #[tokio::test]
    async fn test_writes_nested_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("proj");

        let report = materialize(&root, &[file("a/b/c.txt", "hi"), file("top.txt", "")])
            .await
            .unwrap();

        assert_eq!(report.written, vec!["a/b/c.txt", "top.txt"]);
        assert_eq!(std::fs::read_to_string(root.join("a/b/c.txt")).unwrap(), "hi");
        assert!(root.join("top.txt").is_file());
    }

    #[tokio::test]
    async fn test_empty_existing_root_is_fine() {
        let tmp = TempDir::new().unwrap();
        materialize(tmp.path(), &[file("x.txt", "x")]).await.unwrap();
        assert!(tmp.path().join("x.txt").exists());
    }

    #[tokio::test]
    async fn test_non_empty_root_conflicts_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("keep.txt"), "mine").unwrap();

        let err = materialize(tmp.path(), &[file("new.txt", "x"), file("d/e.txt", "y")])
            .await
            .unwrap_err();

        assert!(matches!(err, ScaffoldError::PathConflict { .. }));
        assert_eq!(tree(tmp.path()), vec!["keep.txt"]);
    }

    #[tokio::test]
    async fn test_root_that_is_a_file_conflicts() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("proj");
        std::fs::write(&root, "not a dir").unwrap();

        let err = materialize(&root, &[file("x.txt", "x")]).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::PathConflict { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_to_empty_directory_is_usable() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("real");
        std::fs::create_dir(&target).unwrap();
        let root = tmp.path().join("link");
        std::os::unix::fs::symlink(&target, &root).unwrap();

        materialize(&root, &[file("x.txt", "x")]).await.unwrap();
        assert!(target.join("x.txt").is_file());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_to_non_empty_directory_conflicts() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("real");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep.txt"), "mine").unwrap();
        let root = tmp.path().join("link");
        std::os::unix::fs::symlink(&target, &root).unwrap();

        let err = materialize(&root, &[file("x.txt", "x")]).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::PathConflict { .. }));
    }

    #[tokio::test]
    async fn test_failed_write_does_not_stop_later_writes() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("proj");

        // "a" is written as a file, so "a/b.txt" can't get its parent directory
        let err = materialize(
            &root,
            &[file("a", "file"), file("a/b.txt", "x"), file("c.txt", "y")],
        )
        .await
        .unwrap_err();

        match err {
            ScaffoldError::PartialFailure { written, failed } => {
                assert_eq!(written, vec!["a", "c.txt"]);
                assert_eq!(failed.len(), 1);
                assert_eq!(failed[0].path, "a/b.txt");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(root.join("c.txt").is_file());
    }

    #[tokio::test]
    async fn test_flask_pytest_skeleton_on_disk() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("svc");
        let request = ScaffoldRequest::new(
            ProjectName::parse("svc").unwrap(),
            StackKind::FlaskApp,
            [Feature::TestFramework(TestFramework::Pytest)],
        )
        .unwrap();

        let files = resolve_templates(&request).unwrap();
        materialize(&root, &files).await.unwrap();

        for path in [
            "app/main.py",
            "app/models.py",
            "app/schemas.py",
            "app/routes.py",
            "requirements.txt",
            "tests/test_main.py",
        ] {
            let content = std::fs::read_to_string(root.join(path)).unwrap();
            assert!(!content.is_empty(), "{} is empty", path);
        }

        let requirements = std::fs::read_to_string(root.join("requirements.txt")).unwrap();
        assert!(requirements.contains("flask"));
        assert!(requirements.contains("pytest"));
    }
}
