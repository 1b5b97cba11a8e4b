use std::sync::{Arc, Once};
use std::time::Duration;

use serde_json::json;
use tracker_core::{JobOutcome, JobRequest, TrackerEvent};
use tracker_engine::{
    ChannelSink, ClientSettings, PollSettings, PollingOrchestrator, ReqwestJobClient,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(tracker_logging::initialize_for_tests);
}

async fn analysis_service() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analyse-start"))
        .and(query_param("max_references", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "analysis_id": "e2e",
            "url": "https://example.com/story",
            "status": {"progress": 0, "message": "Analysis queued", "step_name": "Initialisation", "step": 0}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/analyse-status/e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://example.com/story",
            "status": {"progress": 35, "message": "Generated article summary", "step_name": "Summary Generation", "step": 2},
            "log_messages": ["[10:00:00] Analysis queued", "[10:00:03] Generated article summary"],
            "complete": false
        })))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/analyse-status/e2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://example.com/story",
            "status": {"progress": 100, "message": "Analysis complete", "step_name": "Complete", "step": 5},
            "log_messages": [
                "[10:00:00] Analysis queued",
                "[10:00:03] Generated article summary",
                "[10:00:09] Analysis complete"
            ],
            "complete": true,
            "success": true,
            "result": {
                "url": "https://example.com/story",
                "article": {"headline": "Story", "author": "Reporter", "claims": ["c1"]},
                "reference_processing": {
                    "successful": [{"url": "https://www.wire.com/s", "snippet": "short"}],
                    "skipped": []
                },
                "cross_reference": {"isMisleading": false, "confidence": 0.9}
            }
        })))
        .with_priority(2)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn tracks_remote_job_end_to_end() {
    init_logging();
    let server = analysis_service().await;
    let client = ReqwestJobClient::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client");
    let (sink, mut rx) = ChannelSink::channel();
    let settings = PollSettings {
        interval: Duration::from_millis(20),
        max_attempts: 20,
    };
    let mut tracker = PollingOrchestrator::new(Arc::new(client), Arc::new(sink), settings);

    tracker.start(JobRequest::new("https://example.com/story").with_max_references(3));
    let outcome = tracker.wait().await;
    assert_eq!(outcome, Some(JobOutcome::Succeeded));

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    let logged: Vec<String> = events
        .iter()
        .filter_map(|event| match event {
            TrackerEvent::Log(delta) => Some(delta.lines.clone()),
            _ => None,
        })
        .flatten()
        .map(|line| line.text)
        .collect();
    assert_eq!(
        logged,
        vec![
            "[10:00:00] Analysis queued",
            "[10:00:03] Generated article summary",
            "[10:00:09] Analysis complete",
        ]
    );
    assert!(events.iter().any(|event| matches!(
        event,
        TrackerEvent::Notice(line) if line.text == "Analysis started with ID: e2e"
    )));

    let result = events
        .iter()
        .find_map(|event| match event {
            TrackerEvent::Result(result) => Some(result),
            _ => None,
        })
        .expect("result");
    assert_eq!(result.article.title, "Story");
    assert_eq!(result.claims, vec!["c1".to_string()]);
    assert_eq!(result.references[0].source, "wire.com");
    assert_eq!(result.references[0].summary, "short");
    assert_eq!(result.verdict.confidence, Some(0.9));
    assert!(matches!(events.last(), Some(TrackerEvent::Finished(JobOutcome::Succeeded))));
}
