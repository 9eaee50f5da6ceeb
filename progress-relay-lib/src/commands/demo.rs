use super::Host;
use super::common::{LogLevel, init_logging};
use super::config::Config;
use super::ndjson::encode_records;
use super::workload::{JobSpec, run_job};
use crate::Result;
use crate::registry;
use crate::runner::{RunOptions, run_with_global_progress};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use core::time::Duration;
use humantime_serde::re::humantime::parse_duration;
use ohno::IntoAppError;
use std::io::Write;
use tokio::sync::mpsc;

/// Log target for the demo command
const LOG_TARGET: &str = "      demo";

/// Lines buffered between the encoder and the output writer
const LINE_BUFFER: usize = 64;

#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Number of pages in the simulated document
    #[arg(long, default_value_t = 20, value_name = "COUNT")]
    pub pages: u64,

    /// Time spent on each page in each processing phase (e.g. `100ms`, `1s`)
    #[arg(long, default_value = "100ms", value_parser = parse_duration, value_name = "DURATION")]
    pub page_delay: Duration,

    /// Make layout detection fail on this page
    #[arg(long, value_name = "PAGE")]
    pub fail_at: Option<u64>,

    /// Seconds between two progress messages (overrides the configuration file)
    #[arg(long, env = "POLL_INTERVAL", value_name = "SECONDS")]
    pub poll_interval: Option<f64>,

    /// Path to configuration file (default is `relay.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

/// Run the simulated job and stream its progress as NDJSON to the host's output.
pub async fn run_demo<H: Host>(host: &mut H, args: &DemoArgs) -> Result<()> {
    init_logging(args.log_level);

    let config = Config::load(Utf8Path::new("."), args.config.as_ref())?;
    let options = match args.poll_interval {
        Some(seconds) => RunOptions::from_secs_f64(seconds),
        None => RunOptions::new(config.poll_interval),
    }
    .into_app_err("invalid poll interval")?;

    log::debug!(target: LOG_TARGET, "Polling every {:?}", options.poll_interval());

    // Bars are resolved per call by the job, but patch before starting it anyway.
    let _ = registry::patch();

    let spec = JobSpec {
        pages: args.pages,
        page_delay: args.page_delay,
        fail_at: args.fail_at,
    };

    let mut stream = run_with_global_progress(options, move || run_job(spec)).into_app_err("starting the job")?;

    let (tx, mut rx) = mpsc::channel::<String>(LINE_BUFFER);
    let abandon_timeout = config.abandon_timeout;

    let encoder = tokio::task::spawn_blocking(move || {
        let outcome = encode_records(stream.by_ref(), |line| tx.blocking_send(line).into_app_err("output stream closed"));

        if !stream.is_finished()
            && let Err(e) = stream.abandon(abandon_timeout)
        {
            log::warn!(target: LOG_TARGET, "{e}");
        }

        outcome
    });

    let written = write_lines(host, &mut rx).await;

    // a failed write leaves the encoder to notice the closed channel and abandon the run
    drop(rx);
    let encoded = encoder.await.into_app_err("progress encoder terminated abnormally")?;

    written?;
    encoded
}

async fn write_lines<H: Host>(host: &mut H, rx: &mut mpsc::Receiver<String>) -> Result<()> {
    while let Some(line) = rx.recv().await {
        let mut output = host.output();
        output.write_all(line.as_bytes()).into_app_err("writing progress message")?;
        output.flush().into_app_err("flushing progress message")?;
    }

    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::commands::host::TestHost;
    use serde_json::Value;

    fn args(pages: u64, fail_at: Option<u64>) -> DemoArgs {
        DemoArgs {
            pages,
            page_delay: Duration::from_millis(2),
            fail_at,
            poll_interval: Some(0.005),
            config: None,
            log_level: LogLevel::None,
        }
    }

    fn messages(host: &TestHost) -> Vec<Value> {
        host.output_str().lines().map(|line| serde_json::from_str(line).unwrap()).collect()
    }

    #[tokio::test]
    #[expect(clippy::await_holding_lock, reason = "serializes access to the process-wide registry")]
    async fn test_demo_streams_progress_then_result() {
        let _guard = registry::test_guard();

        let mut host = TestHost::new();
        run_demo(&mut host, &args(5, None)).await.unwrap();
        registry::unpatch();

        let messages = messages(&host);
        assert!(messages.len() >= 2);
        assert!(host.output_str().ends_with('\n'));

        let (last, rest) = messages.split_last().unwrap();
        assert_eq!(last["type"], "result");
        assert_eq!(last["data"]["pages_processed"], 5);

        let completed = rest.last().unwrap();
        assert_eq!(completed["type"], "progress");
        assert_eq!(completed["data"]["status"], "completed");
        assert_eq!(completed["data"]["current"], 5);

        for message in rest {
            assert_eq!(message["type"], "progress");
        }
    }

    #[tokio::test]
    #[expect(clippy::await_holding_lock, reason = "serializes access to the process-wide registry")]
    async fn test_demo_reports_failure() {
        let _guard = registry::test_guard();

        let mut host = TestHost::new();
        let outcome = run_demo(&mut host, &args(6, Some(2))).await;
        registry::unpatch();

        assert!(outcome.is_err());

        let messages = messages(&host);
        let last = messages.last().unwrap();
        assert_eq!(last["type"], "error");
        assert_eq!(last["data"]["message"], "page 2 could not be analyzed");
        assert!(messages.iter().all(|m| m["type"] != "result"));
    }

    #[tokio::test]
    #[expect(clippy::await_holding_lock, reason = "serializes access to the process-wide registry")]
    async fn test_demo_rejects_non_positive_poll_interval() {
        let _guard = registry::test_guard();

        let mut host = TestHost::new();
        let demo_args = DemoArgs {
            poll_interval: Some(0.0),
            ..args(1, None)
        };

        assert!(run_demo(&mut host, &demo_args).await.is_err());
        assert!(host.output_buf.is_empty());
    }

    /// Host whose output always fails, like a closed pipe.
    struct ClosedOutputHost;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    impl Host for ClosedOutputHost {
        fn output(&mut self) -> impl Write {
            ClosedPipe
        }

        fn error(&mut self) -> impl Write {
            ClosedPipe
        }

        fn exit(&mut self, _code: i32) {}
    }

    #[tokio::test]
    #[expect(clippy::await_holding_lock, reason = "serializes access to the process-wide registry")]
    async fn test_failed_write_waits_for_the_run_to_be_released() {
        let _guard = registry::test_guard();

        let outcome = run_demo(&mut ClosedOutputHost, &args(3, None)).await;
        let monitor = registry::get_monitor().unwrap();
        registry::unpatch();

        assert!(outcome.is_err());
        assert!(!monitor.is_busy());
    }

    #[test]
    fn test_page_delay_parsing() {
        let parsed = DemoArgs::try_parse_from(["demo", "--pages", "3", "--page-delay", "250ms", "--poll-interval", "0.5"]).unwrap();
        assert_eq!(parsed.pages, 3);
        assert_eq!(parsed.page_delay, Duration::from_millis(250));
        assert_eq!(parsed.poll_interval, Some(0.5));

        assert!(DemoArgs::try_parse_from(["demo", "--page-delay", "soon"]).is_err());
    }
}
