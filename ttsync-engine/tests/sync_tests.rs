//! End-to-end pipeline tests for `ttsync-engine`.
//!
//! Each test seeds its own tree in an isolated `TempDir` and drives the full
//! scan → index → rewrite pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tempfile::TempDir;
use ttsync_core::{KeyPolicy, RunWarning};
use ttsync_engine::pipeline::{run, RunOptions};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(&path, content).expect("write fixture");
    path
}

fn manifest(packages: &[(&str, &str)]) -> String {
    let mut body = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<packages>\n");
    for (id, version) in packages {
        body.push_str(&format!(
            "  <package id=\"{id}\" version=\"{version}\" targetFramework=\"net48\" />\n",
        ));
    }
    body.push_str("</packages>\n");
    body
}

fn assembly_directive(fragment: &str) -> String {
    format!(r#"<#@ assembly Name="$(SolutionDir)packages{fragment}lib\net48\Gen.dll" #>"#)
}

// ---------------------------------------------------------------------------
// Rewriting
// ---------------------------------------------------------------------------

#[test]
fn stale_reference_is_updated_end_to_end() {
    init_logging();
    let tmp = TempDir::new().unwrap();
    write_file(
        tmp.path(),
        "BDB1/packages.config",
        &manifest(&[("Foo", "1.2.3.4")]),
    );
    let template = write_file(
        tmp.path(),
        "BDB1/Templates/gen.tt",
        &format!(
            "<#@ template language=\"C#\" #>\n{}\n<# /* body */ #>\n",
            assembly_directive(r"\Foo.1.0.0.0\"),
        ),
    );

    let report = run(tmp.path(), &RunOptions::default()).expect("run");
    assert_eq!(report.files_changed, 1);
    assert_eq!(report.references_changed, 1);
    assert_eq!(report.changed_files, vec![template.clone()]);
    assert!(report.warnings.is_empty(), "got: {:?}", report.warnings);

    let on_disk = fs::read_to_string(&template).unwrap();
    assert!(on_disk.contains(r"\Foo.1.2.3.4\"), "got: {on_disk}");
    // Lines around the directive are untouched, character for character.
    assert!(on_disk.starts_with("<#@ template language=\"C#\" #>\n"));
    assert!(on_disk.ends_with("<# /* body */ #>\n"));
}

#[test]
fn matching_reference_leaves_file_unreported_and_untouched() {
    let tmp = TempDir::new().unwrap();
    write_file(
        tmp.path(),
        "BDB1/packages.config",
        &manifest(&[("Foo", "1.0.0.0")]),
    );
    let template = write_file(
        tmp.path(),
        "BDB1/gen.tt",
        &format!("{}\n", assembly_directive(r"\Foo.1.0.0.0\")),
    );
    let before = fs::read_to_string(&template).unwrap();

    let report = run(tmp.path(), &RunOptions::default()).expect("run");
    assert_eq!(report.files_changed, 0);
    assert_eq!(report.references_changed, 0);
    assert_eq!(fs::read_to_string(&template).unwrap(), before);
}

#[test]
fn second_run_is_a_no_op_with_stable_mtimes() {
    init_logging();
    let tmp = TempDir::new().unwrap();
    write_file(
        tmp.path(),
        "BDB1/packages.config",
        &manifest(&[("Foo", "2.0.0.0"), ("Bar", "4.4.4.4")]),
    );
    let template = write_file(
        tmp.path(),
        "BDB1/gen.tt",
        &format!(
            "{}\n{}\n",
            assembly_directive(r"\Foo.1.0.0.0\"),
            assembly_directive(r"\Bar.4.0.0.0\"),
        ),
    );

    let first = run(tmp.path(), &RunOptions::default()).expect("first run");
    assert_eq!(first.files_changed, 1);
    assert_eq!(first.references_changed, 2);

    // Pin a recognizable mtime, then prove the second run never writes.
    let epoch = FileTime::from_unix_time(1_000_000_000, 0);
    filetime::set_file_mtime(&template, epoch).expect("set mtime");

    let second = run(tmp.path(), &RunOptions::default()).expect("second run");
    assert_eq!(second.files_changed, 0);
    assert_eq!(second.references_changed, 0);

    let mtime = FileTime::from_last_modification_time(&fs::metadata(&template).unwrap());
    assert_eq!(mtime, epoch, "no-op run must not rewrite the file");
}

#[test]
fn dry_run_counts_but_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    write_file(
        tmp.path(),
        "BDB1/packages.config",
        &manifest(&[("Foo", "2.0.0.0")]),
    );
    let template = write_file(
        tmp.path(),
        "BDB1/gen.tt",
        &format!("{}\n", assembly_directive(r"\Foo.1.0.0.0\")),
    );
    let before = fs::read_to_string(&template).unwrap();

    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };
    let report = run(tmp.path(), &options).expect("run");
    assert!(report.dry_run);
    assert_eq!(report.files_changed, 1);
    assert_eq!(report.references_changed, 1);
    assert_eq!(fs::read_to_string(&template).unwrap(), before);
}

// ---------------------------------------------------------------------------
// Scoping
// ---------------------------------------------------------------------------

#[test]
fn keyless_template_is_never_modified() {
    let tmp = TempDir::new().unwrap();
    write_file(
        tmp.path(),
        "BDB1/packages.config",
        &manifest(&[("Foo", "2.0.0.0")]),
    );
    let orphan = write_file(
        tmp.path(),
        "shared/gen.tt",
        &format!("{}\n", assembly_directive(r"\Foo.1.0.0.0\")),
    );
    let before = fs::read_to_string(&orphan).unwrap();

    let report = run(tmp.path(), &RunOptions::default()).expect("run");
    assert_eq!(report.files_changed, 0);
    assert_eq!(fs::read_to_string(&orphan).unwrap(), before);
}

#[test]
fn template_under_other_project_key_uses_its_own_manifest() {
    let tmp = TempDir::new().unwrap();
    write_file(
        tmp.path(),
        "BDB1/packages.config",
        &manifest(&[("Foo", "2.0.0.0")]),
    );
    write_file(
        tmp.path(),
        "BDB2/packages.config",
        &manifest(&[("Foo", "5.5.5.5")]),
    );
    let t1 = write_file(
        tmp.path(),
        "BDB1/gen.tt",
        &format!("{}\n", assembly_directive(r"\Foo.1.0.0.0\")),
    );
    let t2 = write_file(
        tmp.path(),
        "BDB2/gen.tt",
        &format!("{}\n", assembly_directive(r"\Foo.1.0.0.0\")),
    );

    let report = run(tmp.path(), &RunOptions::default()).expect("run");
    assert_eq!(report.files_changed, 2);
    assert!(fs::read_to_string(&t1).unwrap().contains(r"\Foo.2.0.0.0\"));
    assert!(fs::read_to_string(&t2).unwrap().contains(r"\Foo.5.5.5.5\"));
}

#[test]
fn vendored_templates_are_not_rewritten() {
    let tmp = TempDir::new().unwrap();
    write_file(
        tmp.path(),
        "BDB1/packages.config",
        &manifest(&[("Foo", "2.0.0.0")]),
    );
    let vendored = write_file(
        tmp.path(),
        "BDB1/packages/Foo.1.0.0.0/tools/install.tt",
        &format!("{}\n", assembly_directive(r"\Foo.1.0.0.0\")),
    );
    let before = fs::read_to_string(&vendored).unwrap();

    let report = run(tmp.path(), &RunOptions::default()).expect("run");
    assert_eq!(report.templates_seen, 0);
    assert_eq!(fs::read_to_string(&vendored).unwrap(), before);
}

#[test]
fn custom_prefix_policy_applies_to_both_sides() {
    let tmp = TempDir::new().unwrap();
    write_file(
        tmp.path(),
        "ProjA-BDB1/packages.config",
        &manifest(&[("Foo", "1.2.3.4")]),
    );
    let template = write_file(
        tmp.path(),
        "ProjA-BDB1/Templates/gen.tt",
        &format!("{}\n", assembly_directive(r"\Foo.1.0.0.0\")),
    );

    let options = RunOptions {
        key_policy: KeyPolicy::new("Proj"),
        ..RunOptions::default()
    };
    let report = run(tmp.path(), &options).expect("run");
    assert_eq!(report.files_changed, 1);
    assert_eq!(report.references_changed, 1);
    assert!(fs::read_to_string(&template).unwrap().contains(r"\Foo.1.2.3.4\"));
}

// ---------------------------------------------------------------------------
// Collisions
// ---------------------------------------------------------------------------

#[test]
fn later_manifest_determines_lookups_and_is_flagged() {
    init_logging();
    let tmp = TempDir::new().unwrap();
    // Two manifests resolving to the same key "BDB1".
    write_file(
        tmp.path(),
        "BDB1/packages.config",
        &manifest(&[("Foo", "2.0.0.0")]),
    );
    write_file(
        tmp.path(),
        "BDB1/legacy/BDB1/packages.config",
        &manifest(&[("Foo", "7.7.7.7")]),
    );
    let template = write_file(
        tmp.path(),
        "BDB1/gen.tt",
        &format!("{}\n", assembly_directive(r"\Foo.1.0.0.0\")),
    );

    let report = run(tmp.path(), &RunOptions::default()).expect("run");
    assert!(
        matches!(report.warnings.as_slice(), [RunWarning::ManifestCollision { .. }]),
        "collision must be surfaced, got: {:?}",
        report.warnings,
    );

    // Whichever manifest was folded last fully determines the lookup — the
    // template ends up on exactly one of the two declared versions.
    assert_eq!(report.files_changed, 1);
    let on_disk = fs::read_to_string(&template).unwrap();
    assert!(
        on_disk.contains(r"\Foo.2.0.0.0\") || on_disk.contains(r"\Foo.7.7.7.7\"),
        "got: {on_disk}",
    );
    assert!(!on_disk.contains(r"\Foo.1.0.0.0\"));
}
