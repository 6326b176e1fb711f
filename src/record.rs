// The immutable result record of one labeling run.

use serde::Serialize;
use serde_json::{Map, Value};

/// Everything one run produced: per-topic terms, prompts, raw outputs and
/// labels, plus the model id, effective parameters, token-presence flag
/// and elapsed wall time. Built once at the end of a run (or at the
/// abort point) and never mutated afterward.
#[derive(Debug, Clone, Serialize)]
pub struct TopicLabels {
    pub terms: Vec<Vec<String>>,
    pub prompts: Vec<String>,
    pub model: String,
    pub params: Map<String, Value>,
    pub with_token: bool,
    pub minutes_elapsed: f64,
    /// Raw model outputs, one per topic; empty for topics an aborted run
    /// never reached.
    pub responses: Vec<String>,
    /// Extracted labels, aligned with `responses`.
    pub labels: Vec<String>,
}

impl TopicLabels {
    /// Assemble the record. All per-topic vectors must share the same
    /// length k; a mismatch is a bug in the pipeline, not user input, so
    /// it panics.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        terms: Vec<Vec<String>>,
        prompts: Vec<String>,
        model: String,
        params: Map<String, Value>,
        with_token: bool,
        minutes_elapsed: f64,
        responses: Vec<String>,
        labels: Vec<String>,
    ) -> Self {
        let k = terms.len();
        assert_eq!(prompts.len(), k, "prompt count diverged from topic count");
        assert_eq!(responses.len(), k, "response count diverged from topic count");
        assert_eq!(labels.len(), k, "label count diverged from topic count");
        Self {
            terms,
            prompts,
            model,
            params,
            with_token,
            minutes_elapsed,
            responses,
            labels,
        }
    }

    /// Number of topics in the batch.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
