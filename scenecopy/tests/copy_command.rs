use std::path::{Path, PathBuf};

use scenecopy::cli::CopyArgs;
use scenecopy::commands::handle_copy;
use scenecopy::display::Progress;
use scenecopy_core::scene::SceneDocument;
use tempfile::tempdir;
use tokio::fs;

const SOURCE: &str = r#"{"assets":[{"id":"5e0c2a4b-1111-4c3d-8e9f-000000000001","name":"Main Camera","typeId":"6a05ecf3-1501-4cab-b9d7-84131b881a29"},{"id":"5e0c2a4b-1111-4c3d-8e9f-000000000002","name":"道具","typeId":"945f0112-8ebe-4c5e-bda2-700925489a57"}],"assetHierarchy":{"collapsed":false,"key":"","children":[{"collapsed":false,"key":"Props","children":[{"collapsed":false,"key":"5e0c2a4b-1111-4c3d-8e9f-000000000002","children":null}]}]}}"#;
const TARGET: &str = r#"{"assets":[]}"#;

async fn setup(dir: &Path) -> (PathBuf, PathBuf) {
    let source = dir.join("source.json");
    let target = dir.join("target.json");
    fs::write(&source, SOURCE).await.expect("Test helper: Failed to write source");
    fs::write(&target, TARGET).await.expect("Test helper: Failed to write target");
    (source, target)
}

fn silent() -> Progress<Vec<u8>> {
    Progress::new(Vec::new(), true)
}

fn args(source: &Path, target: &Path, names: &[&str], dry_run: bool) -> CopyArgs {
    CopyArgs {
        source: source.to_path_buf(),
        target: target.to_path_buf(),
        names: names.iter().map(|n| n.to_string()).collect(),
        dry_run,
    }
}

#[tokio::test]
async fn copy_command_saves_target() {
    let dir = tempdir().unwrap();
    let (source, target) = setup(dir.path()).await;

    handle_copy(args(&source, &target, &["道具", "Main Camera"], false), &mut silent()).await.expect("Copy should succeed");

    let saved = SceneDocument::open(&target).await.unwrap();
    let rows: Vec<_> = saved.list_assets().into_iter().map(|e| (e.name, e.hierarchy.to_string())).collect();
    assert_eq!(rows, vec![
        ("道具".to_string(), "Props".to_string()),
        ("Main Camera".to_string(), String::new()),
    ]);
}

#[tokio::test]
async fn copy_command_does_not_save_partial_batches() {
    let dir = tempdir().unwrap();
    let (source, target) = setup(dir.path()).await;

    let result = handle_copy(args(&source, &target, &["道具", "Missing"], false), &mut silent()).await;
    let err = result.expect_err("A missing asset should fail the batch");
    assert!(err.to_string().contains("Missing"));
    assert_eq!(fs::read_to_string(&target).await.unwrap(), TARGET);
}

#[tokio::test]
async fn copy_command_dry_run_leaves_target() {
    let dir = tempdir().unwrap();
    let (source, target) = setup(dir.path()).await;

    handle_copy(args(&source, &target, &["道具"], true), &mut silent()).await.unwrap();
    assert_eq!(fs::read_to_string(&target).await.unwrap(), TARGET);
}

#[tokio::test]
async fn copy_command_reports_load_errors() {
    let dir = tempdir().unwrap();
    let (source, _) = setup(dir.path()).await;

    let err = handle_copy(args(&source, &dir.path().join("nope.json"), &["道具"], false), &mut silent()).await.unwrap_err();
    assert!(err.to_string().contains("Failed to load target scene"));
}

#[tokio::test]
async fn copy_command_progress_respects_quiet() {
    let dir = tempdir().unwrap();
    let (source, target) = setup(dir.path()).await;

    let mut loud = Progress::new(Vec::new(), false);
    handle_copy(args(&source, &target, &["道具"], true), &mut loud).await.unwrap();
    let printed = String::from_utf8(loud.into_inner()).unwrap();
    assert!(printed.contains("Copied: 道具 -> 道具 (in Props)"));
    assert!(printed.contains("Dry run"));

    let mut quiet = silent();
    handle_copy(args(&source, &target, &["道具"], false), &mut quiet).await.unwrap();
    assert!(quiet.into_inner().is_empty());
}
