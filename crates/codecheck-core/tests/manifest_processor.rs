//! ManifestProcessor against a real directory tree.

use std::fs;
use std::path::Path;

use codecheck_core::manifest::{CopyOptions, ManifestProcessor};
use codecheck_core::model::ManifestEntry;
use tempfile::TempDir;

fn entry(file: &str, size: Option<u64>) -> ManifestEntry {
    ManifestEntry {
        file: Some(file.to_string()),
        comment: Some(format!("about {file}")),
        size,
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Base directory with `figures/plot1.png` (10 bytes) and `data.csv` (6 bytes) at the top level.
fn setup() -> (TempDir, ManifestProcessor) {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("figures/plot1.png"), "0123456789");
    write(&dir.path().join("data.csv"), "a,b\n1,");
    let processor = ManifestProcessor::new(
        vec![
            entry("figures/plot1.png", Some(10)),
            entry("data.csv", Some(100)),
        ],
        dir.path(),
    );
    (dir, processor)
}

#[test]
fn copy_then_outputs_exist() {
    let (_dir, processor) = setup();
    assert!(!processor.validate_output_files_exist().0);

    let outcome = processor
        .copy_manifest_files(None, CopyOptions::default())
        .unwrap();
    assert_eq!(outcome.copied.len(), 2);
    assert!(outcome.failed.is_empty());
    assert!(processor.outputs_dir().join("figures/plot1.png").exists());

    assert_eq!(processor.validate_output_files_exist(), (true, vec![]));
}

#[test]
fn source_existence_uses_base_or_override() {
    let (dir, processor) = setup();
    assert_eq!(processor.validate_files_exist(None), (true, vec![]));

    let empty = dir.path().join("elsewhere");
    fs::create_dir_all(&empty).unwrap();
    let (all_exist, missing) = processor.validate_files_exist(Some(empty.as_path()));
    assert!(!all_exist);
    assert_eq!(missing, vec!["figures/plot1.png", "data.csv"]);
}

#[test]
fn flattened_copy_uses_file_name() {
    let (_dir, processor) = setup();
    let outcome = processor
        .copy_manifest_files(
            None,
            CopyOptions {
                keep_full_path: false,
                ..CopyOptions::default()
            },
        )
        .unwrap();
    assert_eq!(outcome.copied.len(), 2);
    assert!(processor.outputs_dir().join("plot1.png").exists());
    assert!(!processor.outputs_dir().join("figures").exists());
}

#[test]
fn dry_run_writes_nothing() {
    let (_dir, processor) = setup();
    let outcome = processor
        .copy_manifest_files(
            None,
            CopyOptions {
                dry_run: true,
                ..CopyOptions::default()
            },
        )
        .unwrap();

    assert_eq!(outcome.copied.len(), 2);
    assert_eq!(outcome.copied[0].size, 10);
    assert!(!outcome.copied[0].destination.exists());
    assert!(!processor.outputs_dir().exists());
}

#[test]
fn no_overwrite_skips_existing_destination() {
    let (_dir, processor) = setup();
    write(&processor.outputs_dir().join("data.csv"), "keep me");

    let outcome = processor
        .copy_manifest_files(
            None,
            CopyOptions {
                overwrite: false,
                ..CopyOptions::default()
            },
        )
        .unwrap();

    let copied: Vec<_> = outcome.copied.iter().map(|c| c.file.as_str()).collect();
    assert_eq!(copied, vec!["figures/plot1.png"]);
    assert_eq!(
        fs::read_to_string(processor.outputs_dir().join("data.csv")).unwrap(),
        "keep me"
    );
}

#[test]
fn missing_sources_are_skipped() {
    let dir = TempDir::new().unwrap();
    write(&dir.path().join("present.txt"), "x");
    let processor = ManifestProcessor::new(
        vec![entry("absent.txt", None), entry("present.txt", None)],
        dir.path(),
    );
    let outcome = processor
        .copy_manifest_files(None, CopyOptions::default())
        .unwrap();
    assert_eq!(outcome.copied.len(), 1);
    assert_eq!(outcome.copied[0].file, "present.txt");
    assert_eq!(outcome.copied[0].comment, "about present.txt");
}

#[test]
fn size_comparison_is_idempotent() {
    let (_dir, processor) = setup();
    assert!(processor.compare_sizes().is_empty());

    processor
        .copy_manifest_files(None, CopyOptions::default())
        .unwrap();
    let first = processor.compare_sizes();
    let second = processor.compare_sizes();
    assert_eq!(first, second);

    assert_eq!(first.len(), 1);
    assert_eq!(first[0].file, "data.csv");
    assert_eq!(first[0].declared, 100);
    assert_eq!(first[0].actual, 6);
    assert_eq!(first[0].difference, -94);
}

#[test]
fn file_sizes_omit_absent_files() {
    let (_dir, processor) = setup();
    assert!(processor.file_sizes(true).is_empty());

    let sizes = processor.file_sizes(false);
    assert_eq!(sizes.get("figures/plot1.png"), Some(&10));
    assert_eq!(sizes.get("data.csv"), Some(&6));
}

#[test]
fn summary_counts_outputs() {
    let (_dir, processor) = setup();
    processor
        .copy_manifest_files(None, CopyOptions::default())
        .unwrap();

    let summary = processor.summary();
    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.total_size, 16);
    assert_eq!(summary.total_size_mb, 0.0);
    assert_eq!(summary.has_comments, 2);
    assert_eq!(summary.file_types.get(".png"), Some(&1));
}

#[test]
fn path_safety() {
    let dir = TempDir::new().unwrap();
    let processor = ManifestProcessor::new(
        vec![
            entry("../../../etc/passwd", None),
            entry("/etc/passwd", None),
            entry("figures/plot1.png", None),
            entry("..\\..\\etc\\passwd", None),
            entry("figs\\..\\..\\x", None),
        ],
        dir.path(),
    );
    let (all_safe, unsafe_paths) = processor.validate_paths();
    assert!(!all_safe);
    assert_eq!(
        unsafe_paths,
        vec![
            "../../../etc/passwd",
            "/etc/passwd",
            "..\\..\\etc\\passwd",
            "figs\\..\\..\\x",
        ]
    );

    let safe = ManifestProcessor::new(vec![entry("figures/plot1.png", None)], dir.path());
    assert_eq!(safe.validate_paths(), (true, vec![]));
}

#[test]
fn copy_onto_itself_keeps_content() {
    let dir = TempDir::new().unwrap();
    let outputs = dir.path().join("codecheck/outputs");
    write(&outputs.join("a.txt"), "important data");
    let processor = ManifestProcessor::new(vec![entry("a.txt", None)], dir.path());

    let outcome = processor
        .copy_manifest_files(Some(&outputs), CopyOptions::default())
        .unwrap();

    assert!(outcome.copied.is_empty());
    assert_eq!(outcome.failed.len(), 1);
    assert_eq!(outcome.failed[0].file, "a.txt");
    assert!(outcome.failed[0].message.contains("same file"));
    assert_eq!(
        fs::read_to_string(outputs.join("a.txt")).unwrap(),
        "important data"
    );
}
