use std::{cell::RefCell, fs, io, path::PathBuf};

use docgrade::{
    DocCheckError, ErrorKind, RunConfig,
    collect::SourceFile,
    discover,
    dispatch::{Dispatcher, EvaluationRequest, Evaluator, TEMPERATURE},
    grade,
};
use uuid::Uuid;

const RUBRIC: &str = "Rate the documentation from 0 to 8.";

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    model:        String,
    instructions: String,
    content:      String,
    temperature:  f32,
}

/// Records every request and answers with a canned verdict, optionally
/// failing on one call.
#[derive(Default)]
struct RecordingEvaluator {
    calls:   RefCell<Vec<Recorded>>,
    fail_on: Option<usize>,
}

impl RecordingEvaluator {
    fn failing_on(index: usize) -> Self {
        Self {
            calls:   RefCell::default(),
            fail_on: Some(index),
        }
    }

    fn calls(&self) -> Vec<Recorded> {
        self.calls.borrow().clone()
    }
}

impl Evaluator for RecordingEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest<'_>) -> Result<String, DocCheckError> {
        let index = {
            let mut calls = self.calls.borrow_mut();
            calls.push(Recorded {
                model:        request.model().to_string(),
                instructions: request.instructions().to_string(),
                content:      request.content().to_string(),
                temperature:  request.temperature(),
            });
            calls.len() - 1
        };

        if self.fail_on == Some(index) {
            return Err(DocCheckError::Service("rate limited".into()));
        }
        Ok(format!("verdict for {}", request.content()))
    }
}

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("docgrade-dispatch-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

fn run_config(root: PathBuf, suffix: &str) -> RunConfig {
    RunConfig {
        root,
        suffix: suffix.to_string(),
        model: "test-model".to_string(),
        rubric: RUBRIC.to_string(),
    }
}

#[tokio::test]
async fn one_call_and_block_per_file() {
    let root = temp_root();
    fs::create_dir_all(root.join("sub")).expect("create sub");
    fs::write(root.join("A.txt"), "alpha").expect("write A");
    fs::write(root.join("sub/B.txt"), "beta").expect("write B");
    fs::write(root.join("C.log"), "gamma").expect("write C");

    let evaluator = RecordingEvaluator::default();
    let mut out = Vec::new();
    let report = grade(&run_config(root.clone(), ".txt"), &evaluator, &mut out)
        .await
        .expect("grading should succeed");

    assert_eq!(report.dispatched, 2);
    let calls = evaluator.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls.iter().map(|c| c.content.as_str()).collect::<Vec<_>>(),
        vec!["alpha", "beta"]
    );

    let output = String::from_utf8(out).expect("utf8 output");
    assert_eq!(output, "verdict for alpha\n\nverdict for beta\n\n");

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn every_request_carries_rubric_model_and_zero_temperature() {
    let root = temp_root();
    for name in ["One.java", "Two.java", "Three.java"] {
        fs::write(root.join(name), format!("class {name} {{}}")).expect("write file");
    }

    let evaluator = RecordingEvaluator::default();
    let mut out = Vec::new();
    grade(&run_config(root.clone(), ".java"), &evaluator, &mut out)
        .await
        .expect("grading should succeed");

    let calls = evaluator.calls();
    assert_eq!(calls.len(), 3);
    for call in calls {
        assert_eq!(call.instructions, RUBRIC);
        assert_eq!(call.model, "test-model");
        assert_eq!(call.temperature, TEMPERATURE);
        assert_eq!(call.temperature, 0.0);
    }

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn empty_root_makes_no_calls() {
    let root = temp_root();

    let evaluator = RecordingEvaluator::default();
    let mut out = Vec::new();
    let report = grade(&run_config(root.clone(), ".java"), &evaluator, &mut out)
        .await
        .expect("grading should succeed");

    assert_eq!(report.dispatched, 0);
    assert!(evaluator.calls().is_empty());
    assert!(out.is_empty());

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn read_failure_stops_before_later_calls() {
    let root = temp_root();
    fs::write(root.join("a.java"), "first").expect("write a");
    fs::write(root.join("b.java"), [0xff, 0xfe]).expect("write b");
    fs::write(root.join("c.java"), "third").expect("write c");

    let evaluator = RecordingEvaluator::default();
    let mut out = Vec::new();
    let err = grade(&run_config(root.clone(), ".java"), &evaluator, &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(evaluator.calls().len(), 1);
    assert_eq!(String::from_utf8(out).expect("utf8 output"), "verdict for first\n\n");

    let _ = fs::remove_dir_all(root);
}

#[tokio::test]
async fn service_failure_is_fatal() {
    let files = vec![
        Ok(SourceFile::new("a.java", "first")),
        Ok(SourceFile::new("b.java", "second")),
        Ok(SourceFile::new("c.java", "third")),
    ];

    let evaluator = RecordingEvaluator::failing_on(1);
    let dispatcher = Dispatcher::new(&evaluator, "test-model", RUBRIC);
    let mut out = Vec::new();
    let err = dispatcher.dispatch(files, &mut out).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Service);
    assert!(err.to_string().starts_with("External service error"));
    assert_eq!(evaluator.calls().len(), 2);
    assert_eq!(String::from_utf8(out).expect("utf8 output"), "verdict for first\n\n");
}

/// Output stream that rejects every write.
struct ClosedOutput;

impl io::Write for ClosedOutput {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn output_failure_is_fatal() {
    let files = vec![
        Ok(SourceFile::new("a.java", "first")),
        Ok(SourceFile::new("b.java", "second")),
    ];

    let evaluator = RecordingEvaluator::default();
    let dispatcher = Dispatcher::new(&evaluator, "test-model", RUBRIC);
    let err = dispatcher
        .dispatch(files, &mut ClosedOutput)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().contains("could not write evaluation"));
    assert_eq!(evaluator.calls().len(), 1);
}

#[tokio::test]
async fn missing_root_reads_nothing() {
    let root = std::env::temp_dir().join(format!("docgrade-missing-{}", Uuid::new_v4()));

    let evaluator = RecordingEvaluator::default();
    let mut out = Vec::new();
    let err = grade(&run_config(root, ".java"), &evaluator, &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Input);
    assert!(evaluator.calls().is_empty());
    assert!(out.is_empty());
}

#[test]
fn discover_lists_matches_with_sizes() {
    let root = temp_root();
    fs::write(root.join("Main.java"), "class Main {}").expect("write main");
    fs::write(root.join("notes.md"), "notes").expect("write notes");

    let files = discover(&run_config(root.clone(), ".java")).expect("discover should succeed");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, root.join("Main.java"));
    assert_eq!(files[0].bytes, "class Main {}".len() as u64);

    let _ = fs::remove_dir_all(root);
}
