use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const PASSPHRASE: &str = "correct-horse";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_vault"))
}

/// A config with a cheap KDF and one template, plus an initialized store.
struct TestVault {
    dir: TempDir,
    config: PathBuf,
}

impl TestVault {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = dir.path().join("config.toml");
        let store = dir.path().join("records.sqlite");
        let contents = format!(
            r#"[vault]
owner_id = "u1"
store_path = "{}"

[kdf]
memory_kib = 8
iterations = 1
parallelism = 1

[[templates]]
id = "weekly"
title = "Weekly check-in"

[[templates.questions]]
id = "mood"
text = "How was your mood?"
answer_type = {{ type = "scale", min = 1, max = 5 }}

[[templates.questions]]
id = "note"
text = "Anything else?"
answer_type = {{ type = "free_text" }}
"#,
            store.to_string_lossy().replace('\\', "\\\\")
        );
        std::fs::write(&config, contents).expect("write config");

        let vault = Self { dir, config };
        let output = vault.run(&["init", "--force"], None);
        assert_success(&output);
        vault
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self, args: &[&str], passphrase: Option<&str>) -> Command {
        let mut cmd = Command::new(bin());
        cmd.args(args)
            .env("VAULT_CONFIG", &self.config)
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path())
            .env("XDG_DATA_HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .env_remove("VAULT_PASSPHRASE")
            .current_dir(self.dir.path())
            .stdin(Stdio::null());
        if let Some(passphrase) = passphrase {
            cmd.env("VAULT_PASSPHRASE", passphrase);
        }
        cmd
    }

    fn run(&self, args: &[&str], passphrase: Option<&str>) -> Output {
        self.command(args, passphrase).output().expect("run vault")
    }

    /// Add a journal entry and return its id.
    fn add_entry(&self, body: &str) -> String {
        let output = self.run(&["-q", "add", "--body", body], Some(PASSPHRASE));
        assert_success(&output);
        stdout(&output).trim().to_string()
    }

    fn list_json(&self, passphrase: &str) -> Vec<serde_json::Value> {
        let output = self.run(&["list", "--json"], Some(passphrase));
        assert_success(&output);
        serde_json::from_str(&stdout(&output)).expect("list output is JSON")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "command failed ({:?})\nstdout: {}\nstderr: {}",
        output.status.code(),
        stdout(output),
        stderr(output)
    );
}

fn assert_exit_code(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "stdout: {}\nstderr: {}",
        stdout(output),
        stderr(output)
    );
}

#[test]
fn test_init_writes_config_under_xdg_home() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = dir.path().join("data").join("records.sqlite");
    let run = |args: &[&str]| {
        Command::new(bin())
            .args(args)
            .env_remove("VAULT_CONFIG")
            .env("HOME", dir.path())
            .env("XDG_CONFIG_HOME", dir.path().join("config"))
            .stdin(Stdio::null())
            .output()
            .expect("run vault")
    };

    let output = run(&["init", "--store", store.to_str().expect("utf-8 path")]);
    assert_success(&output);

    let config_path = dir.path().join("config").join("vault").join("config.toml");
    let contents = std::fs::read_to_string(&config_path).expect("config written");
    assert!(contents.contains("owner_id"));
    assert!(contents.contains("daily-checkin"));
    assert!(store.exists());

    let again = run(&["init", "--store", store.to_str().expect("utf-8 path")]);
    assert_exit_code(&again, 4);
}

#[test]
fn test_init_force_keeps_owner() {
    let vault = TestVault::new();
    let output = vault.run(&["init", "--force"], None);
    assert_success(&output);

    let contents = std::fs::read_to_string(&vault.config).expect("config");
    assert!(contents.contains("owner_id = \"u1\""));
    assert!(contents.contains("memory_kib = 8"));
    let config: toml::Value = toml::from_str(&contents).expect("config is TOML");
    assert_eq!(
        config["vault"]["store_path"].as_str(),
        vault.path("records.sqlite").to_str()
    );
}

#[test]
fn test_init_force_keeps_custom_store() {
    let vault = TestVault::new();
    let store = vault.path("elsewhere").join("custom.sqlite");
    let store = store.to_str().expect("utf-8 path");
    let output = vault.run(&["init", "--force", "--store", store], None);
    assert_success(&output);
    let id = vault.add_entry("kept across init");

    let output = vault.run(&["init", "--force"], None);
    assert_success(&output);

    let records = vault.list_json(PASSPHRASE);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], id.as_str());
    assert!(vault.path("elsewhere").join("custom.sqlite").exists());
}

#[test]
fn test_init_force_refuses_unreadable_config() {
    let vault = TestVault::new();
    let mut contents = std::fs::read_to_string(&vault.config).expect("config");
    contents.push_str("\nstray = [\n");
    std::fs::write(&vault.config, &contents).expect("write config");

    let output = vault.run(&["init", "--force"], None);
    assert!(!output.status.success());

    let after = std::fs::read_to_string(&vault.config).expect("config");
    assert_eq!(after, contents);
    assert!(after.contains("owner_id = \"u1\""));
}

#[test]
fn test_missing_config_is_not_found() {
    let vault = TestVault::new();
    let output = vault
        .command(&["list"], Some(PASSPHRASE))
        .env("VAULT_CONFIG", vault.path("nope.toml"))
        .output()
        .expect("run vault");
    assert_exit_code(&output, 3);
    assert!(stderr(&output).contains("vault init"));
}

#[test]
fn test_add_then_list_with_correct_and_wrong_passphrase() {
    let vault = TestVault::new();
    let id = vault.add_entry("Today was hard");

    let records = vault.list_json(PASSPHRASE);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], id.as_str());
    assert_eq!(records[0]["content"], "Today was hard");
    assert_eq!(records[0]["decryption_failed"], false);

    let output = vault.run(&["list", "--json"], Some("wrong-pass"));
    assert_success(&output);
    assert!(stderr(&output).contains("none of the 1 records could be decrypted"));
    let records: Vec<serde_json::Value> =
        serde_json::from_str(&stdout(&output)).expect("list output is JSON");
    assert_eq!(records[0]["decryption_failed"], true);
    assert!(records[0].get("content").is_none());
    assert!(!stdout(&output).contains("Today was hard"));
}

#[test]
fn test_list_table_marks_unreadable_records() {
    let vault = TestVault::new();
    vault.add_entry("first line\nsecond line");

    let output = vault.run(&["list"], Some(PASSPHRASE));
    assert_success(&output);
    assert!(stdout(&output).contains("first line"));
    assert!(!stdout(&output).contains("second line"));

    let output = vault.run(&["list"], Some("wrong-pass"));
    assert_success(&output);
    assert!(stdout(&output).contains("[unreadable]"));
}

#[test]
fn test_first_record_requires_strong_passphrase() {
    let vault = TestVault::new();
    let output = vault.run(&["add", "--body", "hi"], Some("short"));
    assert_exit_code(&output, 4);

    let output = vault.run(&["add", "--body", "hi"], None);
    assert_exit_code(&output, 4);
    assert!(stderr(&output).contains("VAULT_PASSPHRASE"));
}

#[test]
fn test_add_with_wrong_passphrase_writes_nothing() {
    let vault = TestVault::new();
    vault.add_entry("sealed under the right key");

    let output = vault.run(&["add", "--body", "should not land"], Some("wrong-pass"));
    assert_exit_code(&output, 5);

    assert_eq!(vault.list_json(PASSPHRASE).len(), 1);
}

#[test]
fn test_add_reads_body_from_stdin() {
    use std::io::Write;

    let vault = TestVault::new();
    let mut child = vault
        .command(&["-q", "add"], Some(PASSPHRASE))
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn vault");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"piped entry\n")
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");
    assert_success(&output);

    let records = vault.list_json(PASSPHRASE);
    assert_eq!(records[0]["content"], "piped entry");
}

#[test]
fn test_add_with_custom_date_orders_list() {
    let vault = TestVault::new();
    let output = vault.run(
        &["add", "--body", "older", "--date", "2020-01-01"],
        Some(PASSPHRASE),
    );
    assert_success(&output);
    vault.add_entry("newer");

    let records = vault.list_json(PASSPHRASE);
    assert_eq!(records[0]["content"], "newer");
    assert_eq!(records[1]["content"], "older");
    assert!(records[1]["created_at"]
        .as_str()
        .expect("timestamp")
        .starts_with("2020-01-01"));

    let output = vault.run(&["add", "--body", "x", "--date", "soon"], Some(PASSPHRASE));
    assert_exit_code(&output, 4);
}

#[test]
fn test_show_by_prefix() {
    let vault = TestVault::new();
    let id = vault.add_entry("Today was hard");

    let output = vault.run(&["show", &id[..8]], Some(PASSPHRASE));
    assert_success(&output);
    assert!(stdout(&output).contains("Today was hard"));
    assert!(stdout(&output).contains(&id));

    let output = vault.run(&["show", &id], Some("wrong-pass"));
    assert_exit_code(&output, 5);
    assert!(!stdout(&output).contains("Today was hard"));

    let output = vault.run(&["show", "ffffffff"], Some(PASSPHRASE));
    assert_exit_code(&output, 3);
}

#[test]
fn test_assessment_add_and_show() {
    let vault = TestVault::new();
    let output = vault.run(
        &["-q", "add", "-t", "weekly", "-a", "mood=2"],
        Some(PASSPHRASE),
    );
    assert_success(&output);
    let id = stdout(&output).trim().to_string();

    let output = vault.run(&["show", &id], Some(PASSPHRASE));
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("Weekly check-in"));
    assert!(text.contains("2 / 5"));
    assert!(text.contains("unanswered"));

    let records = vault.list_json(PASSPHRASE);
    assert_eq!(records[0]["kind"], "assessment_response");
    assert_eq!(records[0]["template_id"], "weekly");
    assert_eq!(records[0]["answers"]["mood"], 2);
}

#[test]
fn test_show_blank_note_reads_unanswered() {
    let vault = TestVault::new();
    let output = vault.run(
        &["-q", "add", "-t", "weekly", "-a", "mood=4", "-a", "note=   "],
        Some(PASSPHRASE),
    );
    assert_success(&output);
    let id = stdout(&output).trim().to_string();

    let output = vault.run(&["show", &id], Some(PASSPHRASE));
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("4 / 5"));
    assert!(text.contains("   unanswered"));
}

#[test]
fn test_assessment_validation() {
    let vault = TestVault::new();

    let output = vault.run(&["add", "-t", "weekly", "-a", "mood=9"], Some(PASSPHRASE));
    assert_exit_code(&output, 4);

    let output = vault.run(&["add", "-t", "weekly", "-a", "sleep=8"], Some(PASSPHRASE));
    assert_exit_code(&output, 4);

    let output = vault.run(&["add", "-t", "monthly", "-a", "mood=3"], Some(PASSPHRASE));
    assert_exit_code(&output, 3);

    let output = vault.run(&["add", "-t", "weekly", "--no-input"], Some(PASSPHRASE));
    assert_exit_code(&output, 4);
}

#[test]
fn test_export_selected_entries_only() {
    let vault = TestVault::new();
    let keep = vault.add_entry("entry-bravo");
    vault.add_entry("entry-alpha");
    vault.add_entry("entry-charlie");

    let target = vault.path("out.txt");
    let output = vault.run(
        &[
            "export",
            "--select",
            &keep,
            "--output",
            target.to_str().expect("utf-8 path"),
        ],
        Some(PASSPHRASE),
    );
    assert_success(&output);
    assert!(stderr(&output).contains("NOT encrypted"));

    let text = std::fs::read_to_string(&target).expect("export written");
    assert!(text.contains("entry-bravo"));
    assert!(!text.contains("entry-alpha"));
    assert!(!text.contains("entry-charlie"));
    assert!(text.contains("Page 1 of 1"));

    let again = vault.run(
        &["export", "-s", &keep, "-o", target.to_str().expect("utf-8 path")],
        Some(PASSPHRASE),
    );
    assert_exit_code(&again, 4);
}

#[test]
fn test_export_interchange_to_stdout() {
    let vault = TestVault::new();
    vault.add_entry("one");
    vault.add_entry("two");

    let output = vault.run(
        &["export", "--all", "--format", "interchange", "--output", "-"],
        Some(PASSPHRASE),
    );
    assert_success(&output);
    let snapshot: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("interchange is JSON");
    assert_eq!(snapshot["format"], "journal-vault-export");
    assert_eq!(snapshot["version"], 1);
    assert_eq!(snapshot["entries"].as_array().map(Vec::len), Some(2));
    assert!(snapshot["notice"]
        .as_str()
        .expect("notice")
        .contains("not encrypted"));
}

#[test]
fn test_export_default_file_name() {
    let vault = TestVault::new();
    vault.add_entry("one");

    let output = vault.run(&["export", "--all"], Some(PASSPHRASE));
    assert_success(&output);

    let exported: Vec<_> = std::fs::read_dir(vault.dir.path())
        .expect("read dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("journal-export-") && name.ends_with(".txt"))
        .collect();
    assert_eq!(exported.len(), 1);
}

#[test]
fn test_export_with_wrong_passphrase_selects_nothing() {
    let vault = TestVault::new();
    let id = vault.add_entry("secret");

    let output = vault.run(&["export", "--all", "-o", "-"], Some("wrong-pass"));
    assert_exit_code(&output, 4);
    assert!(!stdout(&output).contains("secret"));

    let output = vault.run(&["export", "-s", &id, "-o", "-"], Some("wrong-pass"));
    assert_exit_code(&output, 4);
    assert!(!stdout(&output).contains("secret"));
}

#[test]
fn test_delete_flow() {
    let vault = TestVault::new();
    let id = vault.add_entry("to be removed");
    vault.add_entry("stays");

    let output = vault.run(&["delete", &id], None);
    assert_exit_code(&output, 4);

    let output = vault.run(&["delete", "--yes", &id], None);
    assert_success(&output);

    let records = vault.list_json(PASSPHRASE);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["content"], "stays");

    let output = vault.run(&["delete", "--yes", &id], None);
    assert_exit_code(&output, 3);
}

#[test]
fn test_templates_listing() {
    let vault = TestVault::new();

    let output = vault.run(&["templates"], None);
    assert_success(&output);
    assert!(stdout(&output).contains("weekly"));
    assert!(stdout(&output).contains("Weekly check-in"));

    let output = vault.run(&["templates", "weekly"], None);
    assert_success(&output);
    assert!(stdout(&output).contains("scale 1-5"));

    let output = vault.run(&["templates", "nope"], None);
    assert_exit_code(&output, 3);
}

#[test]
fn test_completions_generate() {
    let vault = TestVault::new();
    let output = vault.run(&["completions", "bash"], None);
    assert_success(&output);
    assert!(stdout(&output).contains("vault"));
}

#[test]
fn test_store_file_holds_no_plaintext() {
    let vault = TestVault::new();
    vault.add_entry("a very distinctive sentence");

    let bytes = std::fs::read(vault.path("records.sqlite")).expect("read store");
    let kind = b"journal_entry";
    assert!(bytes.windows(kind.len()).any(|window| window == kind));
    let needle = b"distinctive";
    assert!(!bytes.windows(needle.len()).any(|window| window == needle));
}
