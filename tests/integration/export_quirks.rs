//! Export header and sink behavior

use super::test_utils::{authority, people, DEV_TOKEN};
use slothframe::export::{ExportStatus, RowSink};
use slothframe::{Frame, FrameError, Row};
use tempfile::TempDir;

/// Sink that records what it was given.
#[derive(Default)]
struct RecordingSink {
    header: Option<Vec<String>>,
    rows: Vec<Row>,
    finished: bool,
}

impl RowSink for RecordingSink {
    fn write_header(&mut self, header: &[String]) -> Result<(), FrameError> {
        self.header = Some(header.to_vec());
        Ok(())
    }

    fn write_row(&mut self, _header: &[String], row: &Row) -> Result<(), FrameError> {
        self.rows.push(row.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), FrameError> {
        self.finished = true;
        Ok(())
    }
}

#[tokio::test]
async fn test_header_comes_from_original_schema() {
    let rows = vec![Row::new().with("id", 1).with("name", "x")];
    let mut frame = Frame::new(rows, authority(Some("dev"), None, 5));
    frame.select(["id"]);
    frame.unlock(DEV_TOKEN).await.unwrap();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");
    let report = frame.save_csv(&path).unwrap();

    assert_eq!(report.status, ExportStatus::Success);
    assert_eq!(report.header, vec!["id", "name"]);
    assert_eq!(report.rows_written, 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "id,name\r\n1,\r\n");
    assert_eq!(
        report.summary(&path.display().to_string()),
        format!("Export completed: {} [Success]", path.display())
    );
}

#[tokio::test]
async fn test_custom_sink_receives_materialized_rows() {
    let mut frame = Frame::new(people(), authority(Some("dev"), None, 5));
    frame.filter_rows("team", "==", "infra").select(["name"]);
    frame.unlock(DEV_TOKEN).await.unwrap();

    let mut sink = RecordingSink::default();
    frame.export(&mut sink).unwrap();

    assert_eq!(
        sink.header,
        Some(vec!["id".to_string(), "name".to_string(), "team".to_string()])
    );
    assert_eq!(sink.rows, vec![Row::new().with("name", "grace")]);
    assert!(sink.finished);
}

#[test]
fn test_locked_save_overwrites_with_header_only() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");
    std::fs::write(&path, "stale contents\n").unwrap();

    let mut frame = Frame::new(people(), authority(Some("dev"), None, 5));
    let report = frame.save_csv(&path).unwrap();

    assert_eq!(report.status, ExportStatus::SafeMode);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "id,name,team\r\n");
}

#[tokio::test]
async fn test_unsupported_operator_writes_nothing() {
    let mut frame = Frame::new(people(), authority(Some("dev"), None, 5));
    frame.filter_rows("id", "in", serde_json::json!([1, 2]));
    frame.unlock(DEV_TOKEN).await.unwrap();

    let mut sink = RecordingSink::default();
    let err = frame.export(&mut sink).unwrap_err();
    assert!(matches!(err, FrameError::UnsupportedOperator(op) if op == "in"));
    assert!(sink.header.is_none());
    assert!(frame.materialized().is_empty());
}

#[tokio::test]
async fn test_failed_save_keeps_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");
    std::fs::write(&path, "id\r\n1\r\n").unwrap();

    let mut frame = Frame::new(people(), authority(Some("dev"), None, 5));
    frame.filter_rows("id", ">", 0);
    frame.unlock(DEV_TOKEN).await.unwrap();

    let err = frame.save_csv(&path).unwrap_err();
    assert!(matches!(err, FrameError::UnsupportedOperator(op) if op == ">"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "id\r\n1\r\n");
}

#[tokio::test]
async fn test_failed_save_does_not_create_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out.csv");

    let mut frame = Frame::new(people(), authority(Some("dev"), None, 5));
    frame.filter_rows("id", "!=", 2);
    frame.unlock(DEV_TOKEN).await.unwrap();

    assert!(frame.save_csv(&path).is_err());
    assert!(!path.exists());
}
