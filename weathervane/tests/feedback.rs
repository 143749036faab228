//! Feedback sinks

use std::fs;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use weathervane::{FeedbackSink, JsonlFeedbackSink, Weather};

fn nizbor() -> Weather {
    Weather {
        description: "Clouds".into(),
        icon_code: "04d".into(),
        temperature: 3.72,
        location: "Nizbor".into(),
    }
}

#[tokio::test]
async fn jsonl_sink_appends_one_line_per_tap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("feedback.jsonl");

    let sink = JsonlFeedbackSink::open(&path).unwrap();
    assert_eq!(sink.path(), path);
    sink.record(&nizbor(), true);
    sink.record(&nizbor(), false);
    sink.close().await;

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["liked"], true);
    assert_eq!(lines[1]["liked"], false);
    assert_eq!(lines[0]["location"], "Nizbor");
    assert_eq!(lines[0]["description"], "Clouds");
    assert_eq!(lines[0]["icon_code"], "04d");
    assert_eq!(lines[0]["temperature"], 3.72);

    let recorded_at = lines[0]["recorded_at"].as_str().unwrap();
    assert!(recorded_at.parse::<DateTime<Utc>>().is_ok());
}

#[tokio::test]
async fn jsonl_sink_keeps_earlier_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.jsonl");

    for _ in 0..2 {
        let sink = JsonlFeedbackSink::open(&path).unwrap();
        sink.record(&nizbor(), true);
        sink.close().await;
    }

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
}

#[tokio::test]
async fn jsonl_sink_writes_queued_taps_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.jsonl");

    let sink = JsonlFeedbackSink::open(&path).unwrap();
    for liked in [true, false, true] {
        sink.record(&nizbor(), liked);
    }
    sink.close().await;

    let liked: Vec<bool> = fs::read_to_string(&path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap()["liked"] == true)
        .collect();
    assert_eq!(liked, vec![true, false, true]);
}

#[test]
fn closures_are_sinks() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let seen = seen.clone();
        move |weather: &Weather, liked: bool| {
            seen.lock().push((weather.location.clone(), liked));
        }
    };

    FeedbackSink::record(&sink, &nizbor(), false);
    assert_eq!(*seen.lock(), vec![("Nizbor".to_string(), false)]);
}
