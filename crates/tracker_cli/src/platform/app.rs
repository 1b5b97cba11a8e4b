use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracker_core::{JobOutcome, JobRequest};
use tracker_engine::{PollingOrchestrator, ReqwestJobClient};
use tracker_logging::{tracker_info, tracker_warn};

use super::config::{self, Overrides};
use super::logging::{self, LogDestination};
use super::render::TerminalSink;

/// Submit an article for reliability analysis and follow it to completion.
#[derive(Debug, Parser)]
#[command(name = "tracker", version)]
struct Args {
    /// Article URL (http or https).
    url: String,

    /// Number of reference articles to compare against (1, 3, 5, 7 or 10).
    #[arg(short = 'r', long)]
    max_references: Option<u32>,

    /// Only consider references published within this many days.
    #[arg(short = 'd', long)]
    days_old: Option<u32>,

    /// RON config file. Defaults to ./tracker.ron when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root URL of the analysis service.
    #[arg(long)]
    base_url: Option<String>,

    /// Delay between status checks, in milliseconds.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Status checks before giving up.
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Log level: off, error, warn, info, debug or trace.
    #[arg(long)]
    log_level: Option<String>,

    /// Also write the log to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            poll_interval_ms: self.interval_ms,
            max_attempts: self.max_attempts,
            log_level: self.log_level.clone(),
            log_file: self.log_file.clone(),
        }
    }

    fn job_request(&self) -> JobRequest {
        let mut request = JobRequest::new(self.url.clone());
        if let Some(max_references) = self.max_references {
            request = request.with_max_references(max_references);
        }
        if let Some(days_old) = self.days_old {
            request = request.with_days_old(days_old);
        }
        request
    }
}

pub async fn run_app() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let mut file_config = config::load(args.config.as_deref())?;
    file_config.apply(args.overrides());
    let settings = file_config.into_settings()?;

    logging::initialize(
        LogDestination::from_file(settings.log_file.as_deref()),
        settings.log_level,
    );
    tracker_info!(
        "service {}, checking every {:?}, at most {} checks",
        settings.client.base_url,
        settings.poll.interval,
        settings.poll.max_attempts
    );

    let client = ReqwestJobClient::new(settings.client.clone())
        .with_context(|| format!("cannot use service URL {}", settings.client.base_url))?;
    let sink = Arc::new(TerminalSink::stdout());
    let mut tracker = PollingOrchestrator::new(Arc::new(client), sink, settings.poll);

    tracker.start(args.job_request());
    let finished = tokio::select! {
        outcome = tracker.wait() => Some(outcome),
        _ = tokio::signal::ctrl_c() => None,
    };

    let outcome = match finished {
        Some(outcome) => outcome,
        None => {
            tracker_warn!("interrupted; stopping");
            tracker.stop();
            eprintln!("Interrupted.");
            None
        }
    };

    Ok(match outcome {
        Some(JobOutcome::Succeeded) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tracker_core::JobRequest;

    #[test]
    fn flags_map_to_request_and_overrides() {
        let args = Args::try_parse_from([
            "tracker",
            "https://news.example/story",
            "--max-references",
            "5",
            "-d",
            "7",
            "--interval-ms",
            "250",
            "--base-url",
            "http://127.0.0.1:9000",
        ])
        .unwrap();

        assert_eq!(
            args.job_request(),
            JobRequest::new("https://news.example/story")
                .with_max_references(5)
                .with_days_old(7)
        );
        let overrides = args.overrides();
        assert_eq!(overrides.poll_interval_ms, Some(250));
        assert_eq!(overrides.base_url.as_deref(), Some("http://127.0.0.1:9000"));
        assert_eq!(overrides.max_attempts, None);
    }

    #[test]
    fn url_is_required() {
        assert!(Args::try_parse_from(["tracker"]).is_err());
    }

    #[test]
    fn breadth_is_left_to_the_tracker() {
        let args = Args::try_parse_from(["tracker", "https://a.example", "-r", "4"]).unwrap();
        assert_eq!(args.job_request().max_references, Some(4));
    }
}
