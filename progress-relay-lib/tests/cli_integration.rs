//! Integration tests driving the command-line entry point through a captured host.

use progress_relay_lib::Host;
use serde_json::Value;

/// Test host that captures output to in-memory buffers.
struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
    exit_code: Option<i32>,
}

impl TestHost {
    const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
            exit_code: None,
        }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call CreateIoCompletionPort")]
async fn test_demo_writes_ndjson() {
    let mut host = TestHost::new();
    let result = progress_relay_lib::run(
        &mut host,
        ["progress-relay", "demo", "--pages", "4", "--page-delay", "5ms", "--poll-interval", "0.01"],
    )
    .await;

    assert!(result.is_ok(), "demo should succeed: {result:?}");

    let output = host.output_str();
    assert!(output.ends_with('\n'));

    let messages: Vec<Value> = output.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    let types: Vec<&str> = messages.iter().map(|m| m["type"].as_str().unwrap()).collect();

    assert_eq!(types.last(), Some(&"result"));
    assert_eq!(types.iter().filter(|t| **t == "result").count(), 1);
    assert!(types[..types.len() - 1].iter().all(|t| *t == "progress"));

    let completed = &messages[messages.len() - 2];
    assert_eq!(completed["data"]["status"], "completed");
    assert_eq!(completed["data"]["percentage"], 100.0);
    assert_eq!(messages[messages.len() - 1]["data"]["pages_processed"], 4);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_init_then_validate() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("relay.toml");
    let path = path.to_str().unwrap();

    let mut host = TestHost::new();
    progress_relay_lib::run(&mut host, ["progress-relay", "init", path]).await.unwrap();
    assert!(host.output_str().contains("Generated default configuration file"));

    let mut host = TestHost::new();
    progress_relay_lib::run(&mut host, ["progress-relay", "validate", "--config", path]).await.unwrap();
    assert!(host.output_str().contains("Configuration file is valid"));
    assert_eq!(host.exit_code, None);
}

#[tokio::test]
#[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
async fn test_validate_reports_bad_config() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("bad.toml");
    std::fs::write(&path, "poll_interval = \"soon\"\n").unwrap();

    let mut host = TestHost::new();
    let result = progress_relay_lib::run(&mut host, ["progress-relay", "validate", "-c", path.to_str().unwrap()]).await;

    assert!(result.is_err());
    assert_eq!(host.exit_code, Some(1));
    assert!(host.error_str().contains("Configuration validation failed"));
}
