use codecheck_core::{CopyOptions, ManifestEntry, ManifestProcessor};
use serde_json::json;

use super::{exit_codes, load_document, plural};
use crate::cli::args::{ManifestArgs, ManifestFormat, ManifestSub};

pub fn run(args: ManifestArgs) -> anyhow::Result<i32> {
    let doc = match load_document(&args.config.config) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("✖ {}", e);
            return Ok(exit_codes::CONFIG_ERROR);
        }
    };
    let Some(manifest) = doc.get("manifest") else {
        eprintln!(
            "✖ No manifest found in {}",
            args.config.config.display()
        );
        return Ok(exit_codes::CONFIG_ERROR);
    };
    let base_dir = args
        .config
        .base_dir
        .clone()
        .unwrap_or_else(|| doc.base_dir());
    let processor = ManifestProcessor::new(ManifestEntry::collect(manifest), base_dir);
    let json = args.format == ManifestFormat::Json;

    match args.cmd {
        ManifestSub::Check { source, source_dir } => {
            let (ok, missing) = if source || source_dir.is_some() {
                processor.validate_files_exist(source_dir.as_deref())
            } else {
                processor.validate_output_files_exist()
            };
            if json {
                print_json(&json!({ "ok": ok, "missing": missing }))?;
            } else if ok {
                eprintln!("✔ All manifest files present");
            } else {
                for file in &missing {
                    println!("{}", file);
                }
                eprintln!(
                    "✖ {} manifest file{} missing",
                    missing.len(),
                    plural(missing.len())
                );
            }
            Ok(exit_for(ok))
        }
        ManifestSub::Sizes { source } => {
            let sizes = processor.file_sizes(!source);
            if json {
                print_json(&json!(sizes))?;
            } else {
                for (file, size) in &sizes {
                    println!("{}\t{}", file, size);
                }
            }
            Ok(exit_codes::OK)
        }
        ManifestSub::Compare => {
            let mismatches = processor.compare_sizes();
            if json {
                print_json(&json!(mismatches))?;
            } else if mismatches.is_empty() {
                eprintln!("✔ Declared sizes match");
            } else {
                for m in &mismatches {
                    println!(
                        "{}\tdeclared {}\tactual {}\t{:+}",
                        m.file, m.declared, m.actual, m.difference
                    );
                }
                eprintln!(
                    "✖ {} size mismatch{}",
                    mismatches.len(),
                    if mismatches.len() == 1 { "" } else { "es" }
                );
            }
            Ok(exit_for(mismatches.is_empty()))
        }
        ManifestSub::Copy {
            source_dir,
            flatten,
            no_overwrite,
            dry_run,
        } => {
            let options = CopyOptions {
                keep_full_path: !flatten,
                overwrite: !no_overwrite,
                dry_run,
            };
            let outcome = processor.copy_manifest_files(source_dir.as_deref(), options)?;
            if json {
                print_json(&json!(outcome))?;
            } else {
                for copied in &outcome.copied {
                    println!("{} -> {}", copied.source.display(), copied.destination.display());
                }
                for failure in &outcome.failed {
                    eprintln!("✖ {}: {}", failure.file, failure.message);
                }
                let verb = if dry_run { "Would copy" } else { "Copied" };
                eprintln!(
                    "{} {} file{}, {} failed",
                    verb,
                    outcome.copied.len(),
                    plural(outcome.copied.len()),
                    outcome.failed.len()
                );
            }
            Ok(exit_for(outcome.failed.is_empty()))
        }
        ManifestSub::Summary => {
            let summary = processor.summary();
            if json {
                print_json(&json!(summary))?;
            } else {
                println!("Files: {}", summary.total_files);
                println!(
                    "Total size: {} bytes ({:.2} MB)",
                    summary.total_size, summary.total_size_mb
                );
                println!("With comments: {}", summary.has_comments);
                for (ext, count) in &summary.file_types {
                    let ext = if ext.is_empty() { "(none)" } else { ext.as_str() };
                    println!("  {}: {}", ext, count);
                }
            }
            Ok(exit_codes::OK)
        }
        ManifestSub::Paths => {
            let (ok, unsafe_paths) = processor.validate_paths();
            if json {
                print_json(&json!({ "ok": ok, "unsafe": unsafe_paths }))?;
            } else if ok {
                eprintln!("✔ All manifest paths are safe");
            } else {
                for file in &unsafe_paths {
                    println!("{}", file);
                }
                eprintln!(
                    "✖ {} unsafe path{}",
                    unsafe_paths.len(),
                    plural(unsafe_paths.len())
                );
            }
            Ok(exit_for(ok))
        }
    }
}

fn exit_for(ok: bool) -> i32 {
    if ok {
        exit_codes::OK
    } else {
        exit_codes::FAILED
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
