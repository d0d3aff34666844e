use std::process::{Command, Output};

use clap::Parser as _;
use sermo_cli::{config::CliConfig, run::run};
use sermo_dal::{SampleRepository, SampleStore as _};
use serde_json::Value;

const VALID: &str = r#"{"text": "1200", "number": 7, "is_something": "yes",
    "email": "15000@1500.com", "slug": "abc", "real": 12.5, "password": "123456"}"#;

async fn exec(db_url: &str, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["sermo-cli", args[0], "--database-url", db_url];
    argv.extend_from_slice(&args[1..]);
    run(CliConfig::try_parse_from(argv)?).await
}

#[tokio::test]
async fn test_create_update_show() {
    let dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

    exec(&db_url, &["create", "--data", VALID]).await.unwrap();
    exec(&db_url, &["count"]).await.unwrap();

    let invalid = VALID.replace("\"abc\"", "\"not_an_slug./$\"");
    assert!(exec(&db_url, &["create", "--data", &invalid]).await.is_err());
    assert!(exec(&db_url, &["create", "--data", "not json"]).await.is_err());

    let updated = VALID.replace("\"abc\"", "\"xyz\"");
    exec(&db_url, &["update", "--id", "1", "--data", &updated])
        .await
        .unwrap();
    exec(&db_url, &["show", "--id", "1"]).await.unwrap();
    assert!(exec(&db_url, &["show", "--id", "2"]).await.is_err());

    let pool = sermo_dal::new_pool(&db_url).await.unwrap();
    let repo = SampleRepository::new(pool);
    assert_eq!(repo.count().await.unwrap(), 1);
    let sample = repo.get(1).await.unwrap();
    assert_eq!(sample.generated, "xyz:7");
    assert!(sample.is_something);
}

fn cli(db_url: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sermo-cli"))
        .arg(args[0])
        .args(["--database-url", db_url])
        .args(&args[1..])
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_printed_json() {
    let dir = tempfile::tempdir().unwrap();
    let db_url = format!("sqlite://{}?mode=rwc", dir.path().join("out.db").display());

    let out = cli(&db_url, &["create", "--data", VALID]);
    assert!(out.status.success());
    let created: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert!(created.get("password").is_none());
    assert_eq!(created["generated"], "abc:7");
    assert_eq!(created["is_something"], true);
    assert_eq!(created["id"], 1);

    let out = cli(&db_url, &["show", "--id", "1"]);
    assert!(out.status.success());
    let shown: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(shown, created);

    let invalid = VALID
        .replace("\"abc\"", "\"not_an_slug./$\"")
        .replace("\"15000@1500.com\"", "\"user@domain\"");
    let out = cli(&db_url, &["create", "--data", &invalid]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8(out.stderr).unwrap();
    let report = stderr.split("Error:").next().unwrap();
    let errors: Value = serde_json::from_str(report.trim()).unwrap();
    let errors = errors.as_object().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors["slug"].as_array().is_some_and(|m| !m.is_empty()));
    assert!(errors["email"].as_array().is_some_and(|m| !m.is_empty()));
}
