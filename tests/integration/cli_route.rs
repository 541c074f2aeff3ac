//! CLI route tests: commands executed against a run context

use super::test_utils::{authority, spawn_stub, DEV_TOKEN};
use slothframe::cli::{Commands, QueryArgs, RunContext};
use slothframe::config::SlothConfig;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_rows(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("rows.json");
    std::fs::write(
        &path,
        r#"[{"id": 1, "team": "core"}, {"id": 2, "team": "infra"}, {"id": 3, "team": "core"}]"#,
    )
    .unwrap();
    path
}

fn query(input: PathBuf, filters: &[&str], select: Option<&str>) -> QueryArgs {
    QueryArgs {
        input,
        filters: filters.iter().map(|f| f.to_string()).collect(),
        select: select.map(str::to_string),
        select_first: false,
    }
}

#[tokio::test]
async fn test_estimate_json() {
    let dir = TempDir::new().unwrap();
    let ctx = RunContext::with_authority(SlothConfig::default(), authority(Some("dev"), None, 5));

    let out = ctx
        .execute(&Commands::Estimate {
            query: query(write_rows(&dir), &["team==core"], Some("id")),
            format: "json".to_string(),
        })
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["estimated_rows"], 3);
    assert_eq!(value["complexity"], 3.0);
}

#[tokio::test]
async fn test_plan_orders_select_first_when_asked() {
    let dir = TempDir::new().unwrap();
    let ctx = RunContext::with_authority(SlothConfig::default(), authority(Some("dev"), None, 5));
    let mut q = query(write_rows(&dir), &["team==core"], Some("id"));
    q.select_first = true;

    let out = ctx
        .execute(&Commands::Plan {
            query: q,
            format: "json".to_string(),
        })
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value[0]["op"], "select");
    assert_eq!(value[1]["op"], "filter");
}

#[tokio::test]
async fn test_export_with_dev_token() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let ctx = RunContext::with_authority(SlothConfig::default(), authority(Some("dev"), None, 5));

    let out = ctx
        .execute(&Commands::Export {
            query: query(write_rows(&dir), &["team==core"], None),
            output: output.clone(),
            token: Some(DEV_TOKEN.to_string()),
        })
        .await
        .unwrap();

    assert!(out.contains("Success"));
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "id,team\r\n1,core\r\n3,core\r\n"
    );
}

#[tokio::test]
async fn test_export_rejected_token_falls_back_to_safe_mode() {
    let stub = spawn_stub(401).await;
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let ctx = RunContext::with_authority(
        SlothConfig::default(),
        authority(Some("prod"), Some(stub.url.clone()), 5),
    );

    let out = ctx
        .execute(&Commands::Export {
            query: query(write_rows(&dir), &["team==core"], None),
            output: output.clone(),
            token: Some("bad".to_string()),
        })
        .await
        .unwrap();

    assert!(out.contains("SafeMode (Metadata Only)"));
    assert_eq!(stub.hits(), 1);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "id,team\r\n");
}

#[tokio::test]
async fn test_export_unknown_environment_falls_back_to_safe_mode() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.csv");
    let ctx = RunContext::with_authority(SlothConfig::default(), authority(Some("qa"), None, 5));

    let out = ctx
        .execute(&Commands::Export {
            query: query(write_rows(&dir), &[], Some("id")),
            output: output.clone(),
            token: Some(DEV_TOKEN.to_string()),
        })
        .await
        .unwrap();

    assert!(out.contains("SafeMode"));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "id,team\r\n");
}
