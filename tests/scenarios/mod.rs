//! End-to-end scenarios with stubbed models.

use std::{collections::HashMap, thread, time::Duration};

use choice_eval_rs::{Answer, Error, INVALID_ANSWER, InferenceRequest, SnapshotKind};
use proptest::prelude::*;

use crate::{dataset, row_of, run, test_config};

#[test]
fn always_a_on_three_records() {
    let model = |_: &InferenceRequest| -> Result<String, Error> { Ok("A".to_string()) };

    let (summary, _) = run(&dataset(&["0", "1", "0"]), &model, &test_config());

    assert_eq!(summary.total, 3);
    assert_eq!(summary.correct, 2);
    assert_eq!(summary.invalid, 0);
    assert_eq!(format!("{:.2}", summary.valid_accuracy()), "66.67");
}

#[test]
fn correct_records_are_the_ones_labelled_a() {
    let model = |_: &InferenceRequest| -> Result<String, Error> { Ok("A".to_string()) };

    let (_, sink) = run(&dataset(&["0", "1", "0"]), &model, &test_config());

    let mut correct: Vec<&str> = sink
        .results()
        .filter(|r| r.is_correct)
        .map(|r| r.premise.as_str())
        .collect();
    correct.sort_unstable();
    assert_eq!(correct, vec!["premise 0", "premise 2"]);
}

#[test]
fn unparseable_completions_are_all_invalid() {
    let model =
        |_: &InferenceRequest| -> Result<String, Error> { Ok("I cannot decide.".to_string()) };

    let (summary, sink) = run(&dataset(&["0", "1", "1", "0"]), &model, &test_config());

    assert_eq!(summary.invalid, summary.total);
    assert_eq!(summary.correct, 0);
    assert!(sink.results().all(|r| r.model_answer == Answer::Invalid));
    assert!(sink.results().all(|r| r.model_completion == "I cannot decide."));
}

#[test]
fn failing_calls_are_recorded_with_the_sentinel() {
    let model = |_: &InferenceRequest| -> Result<String, Error> {
        Err(Error::Inference("503 Service Unavailable".to_string()))
    };

    let (summary, sink) = run(&dataset(&["0", "1", "1"]), &model, &test_config());

    assert_eq!(summary.total, 3);
    assert_eq!(summary.invalid, 3);
    assert_eq!(summary.correct, 0);
    assert_eq!(sink.results().count(), 3);
    assert!(sink.results().all(|r| r.model_completion == INVALID_ANSWER && r.is_invalid));
}

#[test]
fn reruns_with_a_deterministic_model_yield_identical_counts() {
    let labels: Vec<&str> = (0..40).map(|i| if i % 3 == 0 { "1" } else { "0" }).collect();
    let input = dataset(&labels);
    let model = |request: &InferenceRequest| -> Result<String, Error> {
        let reply = match row_of(request) % 4 {
            0 => "A",
            1 => "B",
            2 => "The answer is B",
            _ => "unsure",
        };
        Ok(reply.to_string())
    };

    let (first, _) = run(&input, &model, &test_config());
    let (second, _) = run(&input, &model, &test_config().with_worker_count(7));

    assert_eq!(
        (first.total, first.correct, first.invalid),
        (second.total, second.correct, second.invalid)
    );
    assert_eq!(first.total, 40);
    assert_eq!(first.invalid, 10);
}

#[test]
fn timer_writes_progress_snapshots_while_workers_run() {
    let model = |request: &InferenceRequest| -> Result<String, Error> {
        thread::sleep(Duration::from_millis(30));
        Ok(if row_of(request) % 5 == 0 { "unsure" } else { "A" }.to_string())
    };
    let labels = ["0"; 20];
    let config = test_config()
        .with_worker_count(2)
        .with_expected_total(20)
        .with_progress_interval(Duration::from_millis(50));

    let (summary, sink) = run(&dataset(&labels), &model, &config);

    assert_eq!(summary.total, 20);
    let (last, periodic) = sink.snapshots.split_last().expect("final snapshot written");
    assert_eq!(last.kind, SnapshotKind::Final);
    assert_eq!(last.total_questions, 20);
    assert!(!periodic.is_empty(), "timer never fired during a ~300ms run");
    assert!(periodic.iter().all(|s| s.kind == SnapshotKind::Progress));
    for snapshot in &sink.snapshots {
        assert!(snapshot.correct_num + snapshot.invalid_answers <= snapshot.total_questions);
    }
}

#[derive(Debug, Clone, Copy)]
enum Reply {
    A,
    B,
    Garbage,
    Failure,
}

fn reply_strategy() -> impl Strategy<Value = Reply> {
    prop_oneof![
        Just(Reply::A),
        Just(Reply::B),
        Just(Reply::Garbage),
        Just(Reply::Failure)
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn counts_partition_the_processed_records(
        rows in prop::collection::vec((any::<bool>(), reply_strategy()), 0..30),
        workers in 1usize..6,
        batch_size in 1usize..8,
    ) {
        let labels: Vec<&str> = rows.iter().map(|(b, _)| if *b { "1" } else { "0" }).collect();
        let replies: HashMap<usize, Reply> =
            rows.iter().enumerate().map(|(i, (_, reply))| (i, *reply)).collect();
        let model = |request: &InferenceRequest| -> Result<String, Error> {
            match replies[&row_of(request)] {
                Reply::A => Ok("A".to_string()),
                Reply::B => Ok("B".to_string()),
                Reply::Garbage => Ok("neither".to_string()),
                Reply::Failure => Err(Error::Inference("boom".to_string())),
            }
        };
        let config = test_config().with_worker_count(workers).with_batch_size(batch_size);

        let (summary, sink) = run(&dataset(&labels), &model, &config);

        let expected_correct = rows
            .iter()
            .filter(|(label_b, reply)| matches!((label_b, reply), (false, Reply::A) | (true, Reply::B)))
            .count() as u64;
        let expected_invalid = rows
            .iter()
            .filter(|(_, reply)| matches!(reply, Reply::Garbage | Reply::Failure))
            .count() as u64;

        prop_assert_eq!(summary.total, rows.len() as u64);
        prop_assert_eq!(summary.correct, expected_correct);
        prop_assert_eq!(summary.invalid, expected_invalid);
        prop_assert!(summary.correct + summary.invalid <= summary.total);
        prop_assert!(sink.results().all(|r| !(r.is_correct && r.is_invalid)));

        let remainder = rows.len() % batch_size;
        let sizes: Vec<usize> = sink.batches.iter().map(Vec::len).collect();
        prop_assert_eq!(sizes.len(), rows.len().div_ceil(batch_size));
        for (i, size) in sizes.iter().enumerate() {
            let expected = if i + 1 == sizes.len() && remainder != 0 { remainder } else { batch_size };
            prop_assert_eq!(*size, expected);
        }
    }
}
