// End-to-end DLQ screen behavior against a scripted client, driven on a
// paused clock.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;

use opsdeck_core::ErrorKind;
use opsdeck_screens::model::{PurgeReport, ReplayReport};
use opsdeck_screens::{DlqApi, DlqScreen};

const POLL_INTERVAL: Duration = Duration::from_millis(5_000);

/// Serves a scripted sequence of topic lists (the last one repeats),
/// fixed per-topic counts, and deterministic peeks.
struct ScriptedDlq {
    lists: Mutex<VecDeque<Result<Vec<String>, ErrorKind>>>,
    peek_delay: Arc<Mutex<Duration>>,
}

impl ScriptedDlq {
    fn new(lists: Vec<Result<Vec<String>, ErrorKind>>) -> Self {
        Self {
            lists: Mutex::new(lists.into_iter().collect()),
            peek_delay: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    fn next_list(&self) -> Result<Vec<String>, ErrorKind> {
        let mut lists = self.lists.lock().expect("stub lock");
        if lists.len() > 1 {
            lists.pop_front().expect("non-empty script")
        } else {
            lists.front().cloned().expect("non-empty script")
        }
    }
}

impl DlqApi for ScriptedDlq {
    async fn list_topics(&self) -> Result<Vec<String>, ErrorKind> {
        self.next_list()
    }

    async fn message_count(&self, topic: &str) -> Result<u64, ErrorKind> {
        match topic {
            "t2" => Err(ErrorKind::ServerError {
                status: 500,
                message: "count failed".into(),
            }),
            "t1" => Ok(7),
            "orders-topic" => Ok(5),
            _ => Ok(2),
        }
    }

    async fn peek_messages(&self, topic: &str, limit: usize) -> Result<Vec<String>, ErrorKind> {
        let delay = *self.peek_delay.lock().expect("stub lock");
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok((0..2.min(limit)).map(|n| format!("{topic}#{n}")).collect())
    }

    async fn replay_topic(&self, _topic: &str) -> Result<ReplayReport, ErrorKind> {
        Ok(ReplayReport { replayed: 5 })
    }

    async fn purge_topic(&self, _topic: &str) -> Result<PurgeReport, ErrorKind> {
        Ok(PurgeReport { purged: 5 })
    }
}

fn topics(names: &[&str]) -> Result<Vec<String>, ErrorKind> {
    Ok(names.iter().map(|&n| n.to_owned()).collect())
}

#[tokio::test(start_paused = true)]
async fn one_bad_count_degrades_its_row_not_the_batch() {
    let screen = DlqScreen::new(
        ScriptedDlq::new(vec![topics(&["t1", "t2"])]),
        POLL_INTERVAL,
    );
    screen.start().expect("start");

    tokio::time::sleep(Duration::from_millis(10)).await;
    let state = screen.topics().latest();
    let batch = state.value().expect("first tick published");

    assert_eq!(batch.len(), 2);
    assert_eq!(
        batch.entries(),
        &[
            ("t1".to_owned(), Ok(7)),
            (
                "t2".to_owned(),
                Err(ErrorKind::ServerError {
                    status: 500,
                    message: "count failed".into(),
                })
            ),
        ]
    );

    screen.stop().await;
}

#[tokio::test(start_paused = true)]
async fn selection_follows_polls_and_is_cleared_one_way() {
    let screen = DlqScreen::new(
        ScriptedDlq::new(vec![
            topics(&["orders-topic", "payments-topic"]), // tick 0
            topics(&["orders-topic", "payments-topic"]), // tick 1: retained
            topics(&["payments-topic"]),                 // tick 2: cleared
            topics(&["orders-topic", "payments-topic"]), // tick 3+: not restored
        ]),
        POLL_INTERVAL,
    );
    screen.start().expect("start");
    tokio::time::sleep(Duration::from_millis(10)).await;

    screen.select("orders-topic").await.expect("select");
    assert_eq!(screen.selected(), Some(("orders-topic".to_owned(), 5)));
    assert_eq!(
        *screen.messages().borrow().clone(),
        vec!["orders-topic#0".to_owned(), "orders-topic#1".to_owned()]
    );

    // Tick 1: topic still present -- focus retained, detail refreshed.
    tokio::time::sleep(POLL_INTERVAL).await;
    assert_eq!(screen.selected(), Some(("orders-topic".to_owned(), 5)));
    assert_eq!(screen.messages().borrow().len(), 2);

    // Tick 2: topic gone -- focus and messages cleared.
    tokio::time::sleep(POLL_INTERVAL).await;
    assert_eq!(screen.selected(), None);
    assert!(screen.messages().borrow().is_empty());

    // Tick 3: topic back -- focus stays cleared until re-selected.
    tokio::time::sleep(POLL_INTERVAL).await;
    assert_eq!(screen.selected(), None);

    screen.stop().await;
}

#[tokio::test(start_paused = true)]
async fn whole_source_failure_is_one_error_state_and_the_next_tick_retries() {
    let screen = DlqScreen::new(
        ScriptedDlq::new(vec![
            Err(ErrorKind::TransportUnavailable),
            topics(&["orders-topic"]),
        ]),
        POLL_INTERVAL,
    );
    screen.start().expect("start");

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(
        screen.topics().latest().error(),
        Some(&ErrorKind::TransportUnavailable)
    );

    tokio::time::sleep(POLL_INTERVAL).await;
    let state = screen.topics().latest();
    assert_eq!(state.value().map(opsdeck_core::AggregatedBatch::len), Some(1));

    screen.stop().await;
}

#[tokio::test(start_paused = true)]
async fn slow_message_peek_does_not_hold_up_the_topic_batch() {
    let stub = ScriptedDlq::new(vec![topics(&["orders-topic"])]);
    let peek_delay = Arc::clone(&stub.peek_delay);
    let screen = DlqScreen::new(stub, POLL_INTERVAL);
    screen.start().expect("start");
    tokio::time::sleep(Duration::from_millis(10)).await;

    screen.select("orders-topic").await.expect("select");
    assert_eq!(screen.messages().borrow().len(), 2);

    // From now on every peek takes longer than two poll intervals.
    *peek_delay.lock().expect("stub lock") = Duration::from_secs(12);

    // One interval later the fresh batch is out even though the message
    // refresh it triggered is still in flight.
    tokio::time::sleep(POLL_INTERVAL).await;
    let state = screen.topics().latest();
    assert_eq!(state.tick(), Some(1), "batch publication waited on the peek");
    assert_eq!(screen.selected(), Some(("orders-topic".to_owned(), 5)));

    // The refresh lands once its peek completes; focus never moved, so
    // it is admitted.
    tokio::time::sleep(Duration::from_secs(12)).await;
    assert_eq!(screen.messages().borrow().len(), 2);

    screen.stop().await;
}

#[tokio::test(start_paused = true)]
async fn replay_clears_the_selection() {
    let screen = DlqScreen::new(
        ScriptedDlq::new(vec![topics(&["orders-topic"])]),
        POLL_INTERVAL,
    );
    screen.start().expect("start");
    tokio::time::sleep(Duration::from_millis(10)).await;

    screen.select("orders-topic").await.expect("select");
    assert!(screen.selected().is_some());

    let report = screen.replay("orders-topic").await.expect("replay");
    assert_eq!(report.replayed, 5);
    assert_eq!(screen.selected(), None);
    assert!(screen.messages().borrow().is_empty());

    screen.stop().await;
}
