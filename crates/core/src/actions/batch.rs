//! Batch actions over a selection.
//!
//! A batch larger than the confirmation threshold runs only after `confirm`
//! agrees. Per-item failures are collected, not fatal. The progress callback
//! is consulted before each item; cancelling stops the remaining items and
//! keeps the completed ones.

use serde::Serialize;

use super::ActionError;
use super::media::{add_tags, delete_media, remove_tags};
use crate::index::{Progress, ProgressCallback, ResourceIndex};
use crate::vault::Vault;

/// Outcome of a batch action.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    /// `(path, error message)` per failed item.
    pub failed: Vec<(String, String)>,
    /// Items not attempted because the batch was cancelled.
    pub skipped: usize,
    pub cancelled: bool,
}

fn run_batch<F>(
    paths: &[String],
    confirm_threshold: usize,
    confirm: impl FnOnce(usize) -> bool,
    mut progress: Option<ProgressCallback>,
    mut action: F,
) -> Result<BatchReport, ActionError>
where
    F: FnMut(&str) -> Result<(), ActionError>,
{
    if paths.len() > confirm_threshold && !confirm(paths.len()) {
        return Err(ActionError::Declined(paths.len()));
    }

    let mut report = BatchReport::default();
    for (i, path) in paths.iter().enumerate() {
        if let Some(cb) = progress.as_mut()
            && cb(i + 1, paths.len(), path) == Progress::Cancel
        {
            report.cancelled = true;
            report.skipped = paths.len() - i;
            tracing::info!("batch cancelled with {} items left", report.skipped);
            break;
        }
        match action(path) {
            Ok(()) => report.succeeded.push(path.clone()),
            Err(e) => {
                tracing::warn!("batch item {path} failed: {e}");
                report.failed.push((path.clone(), e.to_string()));
            }
        }
    }
    Ok(report)
}

/// Delete media files together with their metadata notes.
pub fn batch_delete(
    vault: &Vault,
    index: &mut ResourceIndex,
    paths: &[String],
    confirm_threshold: usize,
    confirm: impl FnOnce(usize) -> bool,
    progress: Option<ProgressCallback>,
) -> Result<BatchReport, ActionError> {
    index.ensure_ready()?;
    run_batch(paths, confirm_threshold, confirm, progress, |path| {
        let note = index.meta_note_for(path).map(str::to_string);
        delete_media(vault, index, path)?;
        if let Some(note) = note
            && vault.exists(&note)
        {
            vault.delete(&note)?;
            index.on_delete(&note);
        }
        Ok(())
    })
}

/// Tags to add and remove in one batch.
#[derive(Debug, Clone, Default)]
pub struct TagChanges {
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

impl TagChanges {
    pub fn add(tags: &[&str]) -> Self {
        Self { add: tags.iter().map(|t| t.to_string()).collect(), remove: Vec::new() }
    }
}

/// Add and remove tags on every file of the selection.
pub fn batch_tag(
    vault: &Vault,
    index: &mut ResourceIndex,
    paths: &[String],
    changes: &TagChanges,
    confirm_threshold: usize,
    confirm: impl FnOnce(usize) -> bool,
    progress: Option<ProgressCallback>,
) -> Result<BatchReport, ActionError> {
    index.ensure_ready()?;
    run_batch(paths, confirm_threshold, confirm, progress, |path| {
        if !changes.add.is_empty() {
            add_tags(vault, index, path, &changes.add)?;
        }
        if !changes.remove.is_empty() {
            remove_tags(vault, index, path, &changes.remove)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup(count: usize) -> (TempDir, Vault, ResourceIndex, Vec<String>) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("art")).unwrap();
        let mut paths = Vec::new();
        for i in 0..count {
            fs::write(dir.path().join(format!("art/img{i}.png")), b"png").unwrap();
            paths.push(format!("art/img{i}.png"));
        }
        let vault = Vault::new(dir.path());
        let mut index = ResourceIndex::new(Some("meta".into()));
        index.rebuild(&vault, None).unwrap();
        (dir, vault, index, paths)
    }

    #[test]
    fn delete_removes_media_and_notes() {
        let (_dir, vault, mut index, paths) = setup(2);
        batch_tag(&vault, &mut index, &paths, &TagChanges::add(&["x"]), 10, |_| true, None).unwrap();
        assert!(vault.exists("meta/img0.md"));

        let report = batch_delete(&vault, &mut index, &paths, 10, |_| true, None).unwrap();

        assert_eq!(report.succeeded.len(), 2);
        assert!(!vault.exists("art/img0.png"));
        assert!(!vault.exists("meta/img0.md"));
        assert!(index.is_empty());
        assert!(index.meta_note_for("art/img0.png").is_none());
    }

    #[test]
    fn over_threshold_asks_and_declined_does_nothing() {
        let (_dir, vault, mut index, paths) = setup(3);
        let mut asked = None;
        let err = batch_delete(&vault, &mut index, &paths, 2, |n| {
            asked = Some(n);
            false
        }, None)
        .unwrap_err();

        assert!(matches!(err, ActionError::Declined(3)));
        assert_eq!(asked, Some(3));
        assert!(vault.exists("art/img0.png"));
    }

    #[test]
    fn failures_do_not_abort() {
        let (_dir, vault, mut index, mut paths) = setup(2);
        paths.insert(1, "art/missing.png".into());

        let report = batch_delete(&vault, &mut index, &paths, 10, |_| true, None).unwrap();

        assert_eq!(report.succeeded, vec!["art/img0.png", "art/img1.png"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "art/missing.png");
    }

    #[test]
    fn cancel_keeps_completed_items() {
        let (_dir, vault, mut index, paths) = setup(4);
        let cb: ProgressCallback =
            Box::new(|current: usize, _: usize, _: &str| if current == 3 { Progress::Cancel } else { Progress::Continue });

        let changes = TagChanges::add(&["x"]);
        let report =
            batch_tag(&vault, &mut index, &paths, &changes, 10, |_| true, Some(cb)).unwrap();

        assert!(report.cancelled);
        assert_eq!(report.succeeded.len(), 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(index.metadata_for("art/img1.png").unwrap().tags, vec!["x"]);
        assert!(index.metadata_for("art/img2.png").is_none());
    }
}
