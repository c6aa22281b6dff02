//! Command-line tests over OCR text files; no OCR models needed.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const RECEIPT: &str = "TOKO MAJU\n\
Jl. Melati 7\n\
Telp 0812 3456 789\n\
Kasir: Ani\n\
01/02/2026 10:15\n\
Kopi Rp 10.000\n\
Total Rp 23.500\n";

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("scantext").unwrap();
        cmd.arg("-c").arg(self.path("config.json"));
        cmd
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn scan_text_file_prints_document() {
    let ws = Workspace::new();
    let input = ws.write("struk.txt", RECEIPT);

    ws.cmd()
        .args(["scan", arg(&input)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nama Toko   : TOKO MAJU"))
        .stdout(predicate::str::contains("Tanggal     : 01/02/2026"))
        .stdout(predicate::str::contains("Telepon     : 08123456789"))
        .stdout(predicate::str::contains("Total Harga : Rp 23.500"))
        .stdout(predicate::str::contains("Sumber: struk.txt"));
}

#[test]
fn scan_csv_in_english() {
    let ws = Workspace::new();
    let input = ws.write("struk.txt", RECEIPT);

    ws.cmd()
        .args(["scan", arg(&input), "--format", "csv", "--lang", "en"])
        .assert()
        .success()
        .stdout(
            "Field,Value\n\
             Store Name,TOKO MAJU\n\
             Date,01/02/2026\n\
             Phone,08123456789\n\
             Total Price,Rp 23.500\n",
        );
}

#[test]
fn scan_json_has_tagged_fields_and_parsed_values() {
    let ws = Workspace::new();
    let input = ws.write("struk.txt", "toko kecil\nterima kasih\n");

    let output = ws
        .cmd()
        .args(["scan", arg(&input), "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["source"], "struk.txt");
    assert_eq!(json["result"]["store_name"]["status"], "not_found");
    assert_eq!(json["result"]["total"]["status"], "not_found");
    assert!(json["parsed"]["total"].is_null());
    assert!(json.get("explanation").is_none());
}

#[test]
fn scan_json_parses_date_and_total() {
    let ws = Workspace::new();
    let input = ws.write("struk.txt", RECEIPT);

    let output = ws
        .cmd()
        .args(["scan", arg(&input), "-f", "json", "--explain"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["result"]["total"]["value"], "Rp 23.500");
    assert_eq!(json["parsed"]["date"], "2026-02-01");
    assert_eq!(json["parsed"]["total"], "23500");
    assert_eq!(json["explanation"].as_array().unwrap().len(), 4);
}

#[test]
fn scan_reads_stdin() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["scan", "-", "--format", "csv"])
        .write_stdin("WARUNG BU SRI\nTotal 15000\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nama Toko,WARUNG BU SRI"))
        .stdout(predicate::str::contains("Total Harga,Rp 15.000"))
        .stdout(predicate::str::contains("Telepon,Tidak ditemukan"));
}

#[test]
fn scan_rejects_unsupported_input() {
    let ws = Workspace::new();
    let input = ws.write("struk.docx", RECEIPT);

    ws.cmd()
        .args(["scan", arg(&input)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn scan_missing_file_fails() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["scan", arg(&ws.path("missing.txt"))])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn recorded_scans_show_up_in_history() {
    let ws = Workspace::new();
    let history = ws.path("history.jsonl");
    let first = ws.write("satu.txt", RECEIPT);
    let second = ws.write("dua.txt", "WARUNG BU SRI\nRp 7.000\n");

    for input in [&first, &second] {
        ws.cmd()
            .args(["scan", arg(input), "--record", "--history-file", arg(&history)])
            .assert()
            .success();
    }

    ws.cmd()
        .args(["history", "--file", arg(&history), "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("satu.txt"))
        .stdout(predicate::str::contains("WARUNG BU SRI"))
        .stdout(predicate::str::contains("Rp 7.000"));

    ws.cmd()
        .args(["history", "--file", arg(&history), "show", "2", "--lang", "en"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Source: dua.txt"))
        .stdout(predicate::str::contains("Date        : Not found"));

    ws.cmd()
        .args(["history", "--file", arg(&history), "show", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No scan #3"));
}

#[test]
fn history_show_uses_configured_language() {
    let ws = Workspace::new();
    fs::write(ws.path("config.json"), r#"{ "output": { "language": "en" } }"#).unwrap();
    let history = ws.path("history.jsonl");
    let input = ws.write("satu.txt", RECEIPT);

    ws.cmd()
        .args(["scan", arg(&input), "--record", "--history-file", arg(&history)])
        .assert()
        .success();

    ws.cmd()
        .args(["history", "--file", arg(&history), "show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Store Name  : TOKO MAJU"));

    ws.cmd()
        .args(["history", "--file", arg(&history), "show", "1", "--lang", "id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nama Toko   : TOKO MAJU"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let ws = Workspace::new();
    ws.write("in/a.txt", RECEIPT);
    ws.write("in/b.txt", "TOKO DUA\nBayar Rp 1.500\n");
    ws.write("in/notes.md", "ignored");
    let out = ws.path("out");
    let pattern = format!("{}/*", ws.path("in").display());

    ws.cmd()
        .args(["batch", &pattern, "-o", arg(&out), "--summary"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Found 2 files"));

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());
    assert!(!out.join("notes.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("filename,status,store_name,date,date_iso"));
    assert!(lines[1].starts_with("a.txt,success,TOKO MAJU,01/02/2026,2026-02-01,08123456789,Rp 23.500,23500,"));
    assert!(lines[2].starts_with("b.txt,success,TOKO DUA,,,,Rp 1.500,1500,"));
}

#[test]
fn batch_reports_overflowing_sum_instead_of_crashing() {
    let ws = Workspace::new();
    ws.write("in/a.txt", "TOKO BESAR\nRp 79.228.162.514.264.337.593.543.950.335\n");
    ws.write("in/b.txt", "TOKO BESAR\nRp 79.228.162.514.264.337.593.543.950.335\n");
    let pattern = format!("{}/*", ws.path("in").display());

    ws.cmd()
        .args(["batch", &pattern])
        .assert()
        .success()
        .stderr(predicate::str::contains("2 successful"))
        .stderr(predicate::str::contains("sum overflows"));
}

#[test]
fn batch_keeps_outputs_apart_when_stems_collide() {
    let ws = Workspace::new();
    ws.write("in/a.txt", "TOKO SATU\nRp 1.000\n");
    ws.write("in/a.text", "TOKO DUA\nRp 2.000\n");
    ws.write("in/b.txt", "TOKO TIGA\nRp 3.000\n");
    let out = ws.path("out");
    let pattern = format!("{}/*", ws.path("in").display());

    ws.cmd()
        .args(["batch", &pattern, "-o", arg(&out)])
        .assert()
        .success();

    let first = fs::read_to_string(out.join("a.txt.json")).unwrap();
    let second = fs::read_to_string(out.join("a.text.json")).unwrap();
    assert!(first.contains("TOKO SATU"));
    assert!(second.contains("TOKO DUA"));
    assert!(out.join("b.json").exists());
    assert!(!out.join("a.json").exists());
}

#[test]
fn batch_without_matches_fails() {
    let ws = Workspace::new();
    let pattern = format!("{}/*.txt", ws.path("empty").display());

    ws.cmd()
        .args(["batch", &pattern])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_set_validates_and_persists() {
    let ws = Workspace::new();

    ws.cmd()
        .args(["config", "set", "extraction.currency_symbol", "IDR"])
        .assert()
        .success();

    ws.cmd()
        .args(["config", "get", "extraction.currency_symbol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"IDR\""));

    ws.cmd()
        .args(["config", "set", "extraction.phone_prefixes", "[]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("phone_prefixes must not be empty"));

    ws.cmd()
        .args(["config", "set", "extraction.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}

#[test]
fn custom_currency_from_config_changes_fallback_format() {
    let ws = Workspace::new();
    fs::write(
        ws.path("config.json"),
        r#"{ "extraction": { "currency_symbol": "IDR" } }"#,
    )
    .unwrap();
    let input = ws.write("struk.txt", "TOKO\nJumlah 45.000\n");

    ws.cmd()
        .args(["scan", arg(&input), "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Harga,IDR 45.000"));
}

#[test]
fn rust_log_overrides_default_verbosity() {
    let ws = Workspace::new();
    let input = ws.write("struk.txt", RECEIPT);

    ws.cmd()
        .env_remove("RUST_LOG")
        .args(["scan", arg(&input)])
        .assert()
        .success()
        .stderr(predicate::str::contains("Total processing time").not());

    ws.cmd()
        .env("RUST_LOG", "debug")
        .args(["scan", arg(&input)])
        .assert()
        .success()
        .stderr(predicate::str::contains("Total processing time"));
}
