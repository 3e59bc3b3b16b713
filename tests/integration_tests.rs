//! Integration tests for primer.
//!
//! These drive the CLI end-to-end against temporary project directories.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a primer Command
fn primer() -> Command {
    cargo_bin_cmd!("primer")
}

/// Helper to create a small project with one source file
fn create_temp_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(
        src.join("main.ts"),
        "export function boot(port: number): void { console.log(port); }\n",
    )
    .unwrap();
    fs::write(
        src.join("models.ts"),
        "export interface User { id: string; name: string; }\n",
    )
    .unwrap();
    fs::write(dir.path().join("README.md"), "# Demo\n").unwrap();
    dir
}

// =============================================================================
// Basic CLI Tests
// =============================================================================

mod cli_basics {
    use super::*;

    #[test]
    fn test_primer_help() {
        primer().arg("--help").assert().success();
    }

    #[test]
    fn test_primer_version() {
        primer().arg("--version").assert().success();
    }

    #[test]
    fn test_unknown_subcommand_fails() {
        primer().arg("frobnicate").assert().failure();
    }
}

// =============================================================================
// Generate Tests
// =============================================================================

mod generate {
    use super::*;

    #[test]
    fn test_generate_stdout_contains_all_sections() {
        let dir = create_temp_project();

        primer()
            .current_dir(dir.path())
            .args(["generate", "--dry-run", "--stdout"])
            .assert()
            .success()
            .stdout(predicate::str::contains("## Overview"))
            .stdout(predicate::str::contains("## Structure"))
            .stdout(predicate::str::contains("## Key Files"))
            .stdout(predicate::str::contains("## Code Map"))
            .stdout(predicate::str::contains("## Knowledge"));
    }

    #[test]
    fn test_generate_extracts_signatures_without_bodies() {
        let dir = create_temp_project();

        primer()
            .current_dir(dir.path())
            .args(["generate", "--dry-run", "--stdout"])
            .assert()
            .success()
            .stdout(predicate::str::contains("boot(port: number)"))
            .stdout(predicate::str::contains("console.log").not());
    }

    #[test]
    fn test_generate_summary_reports_totals() {
        let dir = create_temp_project();

        primer()
            .current_dir(dir.path())
            .args(["generate", "--dry-run"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Context generated"))
            .stdout(predicate::str::contains("code_map"))
            .stdout(predicate::str::contains("Total:"));
    }

    #[test]
    fn test_generate_json_metadata() {
        let dir = create_temp_project();

        primer()
            .current_dir(dir.path())
            .args(["generate", "--dry-run", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"total_tokens\""))
            .stdout(predicate::str::contains("\"truncated_files\""));
    }

    #[test]
    fn test_generate_budget_out_of_range_fails() {
        let dir = create_temp_project();

        primer()
            .current_dir(dir.path())
            .args(["generate", "--dry-run", "--budget", "10"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("out of range"));
    }

    #[test]
    fn test_generate_persists_under_home() {
        let dir = create_temp_project();
        let fake_home = TempDir::new().unwrap();

        primer()
            .current_dir(dir.path())
            .env("HOME", fake_home.path())
            .arg("generate")
            .assert()
            .success()
            .stdout(predicate::str::contains("Saved to"));

        let contexts = fake_home.path().join(".primer/contexts");
        let entries: Vec<_> = fs::read_dir(&contexts).unwrap().flatten().collect();
        assert_eq!(entries.len(), 1);
        let written = fs::read_to_string(entries[0].path()).unwrap();
        assert!(written.contains("Generated by primer"));
        assert!(written.contains("## Code Map"));
    }

    #[test]
    fn test_generate_dry_run_does_not_write() {
        let dir = create_temp_project();
        let fake_home = TempDir::new().unwrap();

        primer()
            .current_dir(dir.path())
            .env("HOME", fake_home.path())
            .args(["generate", "--dry-run"])
            .assert()
            .success();

        assert!(!fake_home.path().join(".primer/contexts").exists());
    }

    #[test]
    fn test_generate_ignores_default_noise_directories() {
        let dir = create_temp_project();
        let dep = dir.path().join("node_modules").join("dep");
        fs::create_dir_all(&dep).unwrap();
        fs::write(dep.join("index.ts"), "export function hidden(): void {}\n").unwrap();

        primer()
            .current_dir(dir.path())
            .args(["generate", "--dry-run", "--stdout"])
            .assert()
            .success()
            .stdout(predicate::str::contains("node_modules").not())
            .stdout(predicate::str::contains("hidden").not());
    }

    #[test]
    fn test_generate_missing_project_dir_fails() {
        primer()
            .args(["--project-dir", "/nonexistent/missing", "generate", "--dry-run"])
            .assert()
            .failure();
    }
}

// =============================================================================
// Config Tests
// =============================================================================

mod config {
    use super::*;

    #[test]
    fn test_config_shows_defaults() {
        let dir = create_temp_project();

        primer()
            .current_dir(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("budget = 12000"))
            .stdout(predicate::str::contains("signature_depth = \"exports\""));
    }

    #[test]
    fn test_config_invalid_budget_falls_back_to_default() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join(".primer")).unwrap();
        fs::write(dir.path().join(".primer/config.toml"), "budget = 7\n").unwrap();

        primer()
            .current_dir(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("budget = 12000"));
    }

    #[test]
    fn test_config_reads_project_file() {
        let dir = create_temp_project();
        fs::create_dir_all(dir.path().join(".primer")).unwrap();
        fs::write(
            dir.path().join(".primer/config.toml"),
            "budget = 30000\nsignature_depth = \"all\"\n",
        )
        .unwrap();

        primer()
            .current_dir(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("budget = 30000"))
            .stdout(predicate::str::contains("signature_depth = \"all\""));
    }
}

// =============================================================================
// Knowledge Tests
// =============================================================================

mod knowledge {
    use super::*;

    #[test]
    fn test_knowledge_documents_included_verbatim() {
        let dir = create_temp_project();
        let knowledge = dir.path().join(".primer/knowledge");
        fs::create_dir_all(&knowledge).unwrap();
        fs::write(knowledge.join("conventions.md"), "Always use tabs.\n").unwrap();

        primer()
            .current_dir(dir.path())
            .args(["generate", "--dry-run", "--stdout"])
            .assert()
            .success()
            .stdout(predicate::str::contains("### conventions"))
            .stdout(predicate::str::contains("Always use tabs."));
    }
}
