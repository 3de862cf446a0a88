use envseal_crypto::{MasterKey, encode_key};
use envseal_env::env_file::{
    ensure_file, is_variable_set, parse, parse_line, read_lines, update_lines, update_variable,
    write_lines,
};
use envseal_env::{EnvError, EnvFile};
use pretty_assertions::assert_eq;
use serial_test::serial;
use std::fs;

// ── Parsing ─────────────────────────────────────────────────────

#[test]
fn parse_keeps_file_order_and_duplicates() {
    let text = "\
# comment
A=1

export B = two
not a pair
A=3
C='x y'
";
    let pairs = parse(text);
    let expected: Vec<(String, String)> = [("A", "1"), ("B", "two"), ("A", "3"), ("C", "x y")]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    assert_eq!(pairs, expected);
}

#[test]
fn crlf_line_endings_are_accepted() {
    let file = EnvFile::from_contents("T", "t", "A=1\r\nB=2\r\n", false);
    assert_eq!(file.raw_value("A"), Some("1"));
    assert_eq!(file.raw_value("B"), Some("2"));
}

#[test]
fn base64_padding_survives_parsing() {
    assert_eq!(parse_line("K=YWJjZA=="), Some(("K", "YWJjZA==")));
}

// ── Lookups ─────────────────────────────────────────────────────

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env.dev");
    fs::write(&path, "PORT=8080\nNAME=svc\n").unwrap();

    let file = EnvFile::load("DEV", &path, false).unwrap();
    assert_eq!(file.name(), "DEV");
    assert_eq!(file.path(), path.as_path());
    assert_eq!(file.len(), 2);
    assert_eq!(file.get_property("NAME").unwrap(), "svc");
}

#[test]
fn load_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.env");
    match EnvFile::load("DEV", &path, false).unwrap_err() {
        EnvError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn typed_and_defaulted_lookups() {
    let file = EnvFile::from_contents("T", "t", "PORT= 8080 \nDEBUG=true\nBAD=eighty\n", false);

    assert_eq!(file.get_parsed::<u16>("PORT"), Some(8080));
    assert_eq!(file.get_parsed::<bool>("DEBUG"), Some(true));
    assert_eq!(file.get_parsed::<u16>("BAD"), None);
    assert_eq!(file.get_parsed::<u16>("MISSING"), None);
    assert_eq!(file.get_property_or("MISSING", "fallback"), "fallback");
    assert_eq!(file.get_property_or("PORT", "fallback"), "8080");
}

#[test]
fn missing_key_names_the_configuration() {
    let file = EnvFile::from_contents("UAT", "t", "", false);
    assert!(file.is_empty());
    let err = file.get_property("DB_HOST").unwrap_err();
    assert_eq!(err.to_string(), "DB_HOST not found in UAT configuration");
}

#[test]
fn master_key_decodes_base64() {
    let key = MasterKey::from_bytes(vec![5u8; 32]).unwrap();
    let text = format!("DEV_SECRET_KEY={}\n", encode_key(&key).unwrap());
    let file = EnvFile::from_contents("BASE", ".env", &text, false);
    assert_eq!(file.master_key("DEV_SECRET_KEY").unwrap(), key);
}

#[test]
fn master_key_with_bad_base64_is_invalid_argument() {
    let file = EnvFile::from_contents("BASE", ".env", "DEV_SECRET_KEY=not base64!\n", false);
    let err = file.master_key("DEV_SECRET_KEY").unwrap_err();
    assert!(matches!(err, EnvError::InvalidArgument(_)));
}

#[test]
fn reload_picks_up_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, "A=1\n").unwrap();
    let file = EnvFile::load("BASE", &path, false).unwrap();

    fs::write(&path, "A=2\n").unwrap();
    assert_eq!(file.raw_value("A"), Some("1"));
    assert_eq!(file.reload().unwrap().raw_value("A"), Some("2"));
}

#[test]
#[serial]
fn process_env_precedence() {
    let file_on = EnvFile::from_contents("T", "t", "ENVSEAL_TEST_LOOKUP=file\n", true);
    let file_off = EnvFile::from_contents("T", "t", "ENVSEAL_TEST_LOOKUP=file\n", false);

    // SAFETY: serialized with every other test that touches the environment.
    unsafe { std::env::set_var("ENVSEAL_TEST_LOOKUP", "process") };
    let on = file_on.get_property("ENVSEAL_TEST_LOOKUP").unwrap();
    let off = file_off.get_property("ENVSEAL_TEST_LOOKUP").unwrap();
    let raw = file_on.raw_value("ENVSEAL_TEST_LOOKUP").map(str::to_string);
    unsafe { std::env::set_var("ENVSEAL_TEST_LOOKUP", "") };
    let empty_env = file_on.get_property("ENVSEAL_TEST_LOOKUP").unwrap();
    unsafe { std::env::remove_var("ENVSEAL_TEST_LOOKUP") };

    assert_eq!(on, "process");
    assert_eq!(off, "file");
    assert_eq!(raw.as_deref(), Some("file"));
    assert_eq!(empty_env, "file");
}

// ── File helpers ────────────────────────────────────────────────

#[test]
fn ensure_file_is_non_destructive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a/b/.env");

    ensure_file(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    fs::write(&path, "KEEP=1\n").unwrap();
    ensure_file(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "KEEP=1\n");
}

#[test]
fn write_lines_replaces_whole_file_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env.dev");
    fs::write(&path, "OLD=1\nSTALE=2\n").unwrap();

    write_lines(&path, &["NEW=1".to_string()]).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "NEW=1\n");
    assert!(!dir.path().join(".env.dev.tmp").exists());
    assert_eq!(read_lines(&path).unwrap(), vec!["NEW=1"]);
}

#[test]
fn update_variable_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, "A=1\nB=2").unwrap();

    update_variable(&path, "B", "20").unwrap();
    update_variable(&path, "C", "30").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "A=1\nB=20\nC=30\n");
}

#[test]
fn is_variable_set_requires_a_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    fs::write(&path, "EMPTY=\nQUOTED_EMPTY=\"\"\nSET=x\n# COMMENTED=y\n").unwrap();

    assert!(!is_variable_set(&path, "EMPTY").unwrap());
    assert!(!is_variable_set(&path, "QUOTED_EMPTY").unwrap());
    assert!(is_variable_set(&path, "SET").unwrap());
    assert!(!is_variable_set(&path, "COMMENTED").unwrap());
    assert!(!is_variable_set(&path, "ABSENT").unwrap());
}

// Property-based tests
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn updated_value_reads_back(
            existing in proptest::collection::vec("[A-Z]{1,4}=[a-z0-9]{0,8}", 0..8),
            key in "[A-Z]{1,4}",
            value in "[A-Za-z0-9+/]{1,40}={0,2}",
        ) {
            let updated = update_lines(&existing, &key, &value);
            let file = EnvFile::from_contents("T", "t", &updated.join("\n"), false);
            prop_assert_eq!(file.raw_value(&key), Some(value.as_str()));
            prop_assert!(updated.len() == existing.len() || updated.len() == existing.len() + 1);
        }
    }
}
