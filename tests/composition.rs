// Composition tests — the full run loop against scripted collaborators.
//
// A scripted LanguageModel replays canned responses and counts calls; a
// scripted WaitPolicy replays escalation answers. Backoffs are set to zero
// so the retry paths run instantly. No network, no filesystem.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use placard::error::Error;
use placard::inference::params::ModelConfig;
use placard::inference::traits::LanguageModel;
use placard::pipeline::detect::FailurePatterns;
use placard::pipeline::labeler::{label_topics, RunOptions};
use placard::pipeline::policy::WaitPolicy;
use placard::prompt::{PromptSpec, PromptStyle};
use placard::record::TopicLabels;
use placard::terms::input::TermInput;

const RATE_LIMIT_TEXT: &str = "Rate limit reached. You reached free usage limit.";
const AUTH_TEXT: &str = "Please log in or use a HF access token";

/// Replays canned responses in order and counts how often it was called.
struct ScriptedModel {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(
        &self,
        _model: &str,
        _params: &Map<String, Value>,
        _prompt: &str,
        _token: Option<&str>,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted model ran out of responses"))
    }
}

/// Replays escalation answers in order and counts consultations.
struct ScriptedPolicy {
    answers: Mutex<VecDeque<u64>>,
    calls: AtomicUsize,
}

impl ScriptedPolicy {
    fn new(answers: &[u64]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl WaitPolicy for ScriptedPolicy {
    fn additional_wait_minutes(&self, _topic_index: usize, _waited_minutes: u64) -> u64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted policy ran out of answers")
    }
}

/// Options with instant backoffs and no progress bar.
fn test_options(style: PromptStyle) -> RunOptions {
    RunOptions {
        prompt_spec: PromptSpec::new(style, "; ", "", 5).unwrap(),
        model: ModelConfig::new("test/model", &Map::new(), None),
        progress: false,
        short_backoff: Duration::ZERO,
        long_backoff: Duration::ZERO,
        ..RunOptions::default()
    }
}

fn topics(lists: &[&[&str]]) -> TermInput {
    TermInput::Topics(
        lists
            .iter()
            .map(|terms| terms.iter().map(|t| t.to_string()).collect())
            .collect(),
    )
}

// ============================================================
// Happy path and ordering
// ============================================================

#[tokio::test]
async fn labels_come_back_in_input_order() {
    // Intentionally not alphabetical in either direction.
    let model = ScriptedModel::new(&[
        r#"{"label": "World Football"}"#,
        r#"{"label": "Energy"}"#,
        r#"{"label": "Cinema"}"#,
    ]);
    let policy = ScriptedPolicy::new(&[]);

    let record = label_topics(
        &model,
        &policy,
        topics(&[
            &["zidane", "figo", "kroos"],
            &["gas", "power", "wind"],
            &["actor", "movie", "scene"],
        ]),
        &test_options(PromptStyle::Json),
    )
    .await
    .unwrap();

    assert_eq!(record.labels, vec!["World Football", "Energy", "Cinema"]);
    assert_eq!(record.terms[1], vec!["gas", "power", "wind"]);
    assert_eq!(record.prompts.len(), 3);
    assert_eq!(model.calls(), 3);
    assert_eq!(policy.calls(), 0);
}

#[tokio::test]
async fn plain_style_runs_end_to_end() {
    let model = ScriptedModel::new(&["  \"Energy\"\n"]);
    let policy = ScriptedPolicy::new(&[]);

    let record = label_topics(
        &model,
        &policy,
        topics(&[&["gas", "power", "wind"]]),
        &test_options(PromptStyle::Plain),
    )
    .await
    .unwrap();

    assert_eq!(record.labels, vec!["Energy"]);
    assert_eq!(record.responses[0], "  \"Energy\"\n");
}

#[tokio::test]
async fn record_carries_model_params_and_token_flag() {
    let model = ScriptedModel::new(&[r#"{"label": "Energy"}"#]);
    let policy = ScriptedPolicy::new(&[]);

    let mut overrides = Map::new();
    overrides.insert("max_new_tokens".to_string(), Value::from(42));

    let options = RunOptions {
        model: ModelConfig::new("test/model", &overrides, Some("secret".to_string())),
        ..test_options(PromptStyle::Json)
    };

    let record = label_topics(
        &model,
        &policy,
        topics(&[&["gas", "power", "wind"]]),
        &options,
    )
    .await
    .unwrap();

    assert_eq!(record.model, "test/model");
    assert!(record.with_token);
    assert_eq!(record.params["max_new_tokens"], 42);
    assert_eq!(record.params["return_full_text"], false);
}

// ============================================================
// Soft failures, escalation and abort
// ============================================================

#[tokio::test]
async fn rate_limit_escalates_once_then_retries() {
    let model = ScriptedModel::new(&[RATE_LIMIT_TEXT, r#"{"label": "World Football"}"#]);
    let policy = ScriptedPolicy::new(&[30]);

    // max_wait_minutes = 0: the first soft failure escalates immediately.
    let record = label_topics(
        &model,
        &policy,
        topics(&[&["zidane", "figo", "kroos"]]),
        &test_options(PromptStyle::Json),
    )
    .await
    .unwrap();

    assert_eq!(policy.calls(), 1);
    assert_eq!(model.calls(), 2);
    assert_eq!(record.labels, vec!["World Football"]);
}

#[tokio::test]
async fn auth_required_text_is_a_soft_failure_too() {
    let model = ScriptedModel::new(&[AUTH_TEXT, r#"{"label": "Energy"}"#]);
    let policy = ScriptedPolicy::new(&[5]);

    let record = label_topics(
        &model,
        &policy,
        topics(&[&["gas", "power", "wind"]]),
        &test_options(PromptStyle::Json),
    )
    .await
    .unwrap();

    assert_eq!(policy.calls(), 1);
    assert_eq!(record.labels, vec!["Energy"]);
}

#[tokio::test]
async fn granted_wait_suppresses_the_next_escalation() {
    // Three rate limits in a row. The first escalates (threshold 0); the
    // grant of 30 minutes then keeps the next two in the short-backoff
    // path, so the policy is consulted exactly once.
    let model = ScriptedModel::new(&[
        RATE_LIMIT_TEXT,
        RATE_LIMIT_TEXT,
        RATE_LIMIT_TEXT,
        r#"{"label": "Energy"}"#,
    ]);
    let policy = ScriptedPolicy::new(&[30]);

    let record = label_topics(
        &model,
        &policy,
        topics(&[&["gas", "power", "wind"]]),
        &test_options(PromptStyle::Json),
    )
    .await
    .unwrap();

    assert_eq!(policy.calls(), 1);
    assert_eq!(model.calls(), 4);
    assert_eq!(record.labels, vec!["Energy"]);
}

#[tokio::test]
async fn zero_from_the_policy_aborts_with_a_partial_record() {
    let model = ScriptedModel::new(&[r#"{"label": "World Football"}"#, RATE_LIMIT_TEXT]);
    let policy = ScriptedPolicy::new(&[0]);

    let record = label_topics(
        &model,
        &policy,
        topics(&[
            &["zidane", "figo", "kroos"],
            &["gas", "power", "wind"],
            &["actor", "movie", "scene"],
        ]),
        &test_options(PromptStyle::Json),
    )
    .await
    .unwrap();

    // The run is a valid record, not an error: the finished topic keeps
    // its output, the pending one and everything after it stay empty.
    assert_eq!(record.len(), 3);
    assert_eq!(record.labels[0], "World Football");
    assert_eq!(record.labels[1], "");
    assert_eq!(record.labels[2], "");
    assert_eq!(record.responses[1], "");
    assert_eq!(record.responses[2], "");
    assert_eq!(model.calls(), 2);
    assert_eq!(policy.calls(), 1);
}

#[tokio::test]
async fn custom_patterns_drive_classification() {
    let model = ScriptedModel::new(&["quota exceeded, come back later", r#"{"label": "Energy"}"#]);
    let policy = ScriptedPolicy::new(&[10]);

    let options = RunOptions {
        patterns: FailurePatterns {
            rate_limit: vec!["quota exceeded".to_string()],
            auth: vec![],
        },
        ..test_options(PromptStyle::Json)
    };

    let record = label_topics(
        &model,
        &policy,
        topics(&[&["gas", "power", "wind"]]),
        &options,
    )
    .await
    .unwrap();

    assert_eq!(policy.calls(), 1);
    assert_eq!(record.labels, vec!["Energy"]);
}

// ============================================================
// Fail-fast validation
// ============================================================

#[tokio::test]
async fn invalid_input_fails_before_any_request() {
    let model = ScriptedModel::new(&[]);
    let policy = ScriptedPolicy::new(&[]);

    let err = label_topics(
        &model,
        &policy,
        topics(&[&["gas", "", "wind"]]),
        &test_options(PromptStyle::Json),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InvalidInput(_))
    ));
    assert_eq!(model.calls(), 0);
}

// ============================================================
// Result aggregation
// ============================================================

#[test]
#[should_panic(expected = "prompt count diverged")]
fn mismatched_lengths_are_a_programming_error() {
    TopicLabels::new(
        vec![vec!["gas".to_string()], vec!["wind".to_string()]],
        vec!["one prompt".to_string()],
        "test/model".to_string(),
        Map::new(),
        false,
        0.0,
        vec![String::new(), String::new()],
        vec![String::new(), String::new()],
    );
}
