//! Integration tests for the Tokio tick source, run on a paused clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use workout_core::{
    Exercise, SessionPlan, SessionRunner, SessionSegment, TimerController, TimerPhase,
};

fn plan(durations: &[u32]) -> SessionPlan {
    let segments: Vec<SessionSegment> = durations
        .iter()
        .enumerate()
        .map(|(i, &d)| SessionSegment::new(Exercise::new(format!("E{i}"), 1.0), d))
        .collect();
    let total = durations.iter().sum();
    SessionPlan::new(segments, total)
}

fn runner(durations: &[u32]) -> SessionRunner {
    let mut runner = SessionRunner::new(TimerController::new(), Duration::from_secs(1));
    runner.load(plan(durations)).unwrap();
    runner
}

#[tokio::test(start_paused = true)]
async fn runs_to_completion_on_one_second_ticks() {
    let mut runner = runner(&[3, 2]);
    runner.start().unwrap();

    tokio::time::timeout(Duration::from_secs(60), runner.wait_finished())
        .await
        .expect("session should finish");

    let state = runner.state().unwrap();
    assert_eq!(state.phase, TimerPhase::Completed);
    assert_eq!(state.total_elapsed_seconds, 5);
    assert!(!runner.is_ticking());
}

#[tokio::test(start_paused = true)]
async fn pause_stops_ticks_until_resumed() {
    let mut runner = runner(&[30]);
    runner.start().unwrap();
    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(runner.state().unwrap().total_elapsed_seconds, 2);

    assert!(runner.pause());
    assert!(!runner.is_ticking());
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(runner.state().unwrap().remaining_seconds, 28);

    runner.start().unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert_eq!(runner.state().unwrap().remaining_seconds, 27);
}

#[tokio::test(start_paused = true)]
async fn restart_stops_ticking_and_resets() {
    let mut runner = runner(&[10, 10]);
    runner.start().unwrap();
    tokio::time::sleep(Duration::from_millis(4_500)).await;

    runner.restart().unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;
    let state = runner.state().unwrap();
    assert_eq!(state.phase, TimerPhase::NotStarted);
    assert_eq!(state.remaining_seconds, 10);
    assert_eq!(state.total_elapsed_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn skipping_last_segment_finishes() {
    let mut runner = runner(&[5, 5]);
    let ticks = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&ticks);
    runner.with_controller(|timer| timer.on_tick(move |_| *counter.lock().unwrap() += 1));

    runner.start().unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    assert!(runner.skip().unwrap());
    assert_eq!(runner.state().unwrap().remaining_seconds, 9);
    assert!(runner.skip().unwrap());

    tokio::time::timeout(Duration::from_secs(1), runner.wait_finished())
        .await
        .expect("skip on last segment completes");
    assert!(!runner.is_ticking());
    assert_eq!(*ticks.lock().unwrap(), 1);
}
