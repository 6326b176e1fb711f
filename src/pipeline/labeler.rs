// The per-topic request loop with rate-limit backoff.
//
// One topic at a time, in input order. A response that matches a soft-
// failure pattern is never an error: the loop sleeps and retries, and once
// accumulated waiting passes the threshold it consults the wait policy.
// A zero answer from the policy ends the run with a partial record:
// topics not yet reached keep empty output and empty label.

use std::time::{Duration, Instant};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::extract::extract_label;
use crate::inference::params::ModelConfig;
use crate::inference::traits::LanguageModel;
use crate::prompt::{build_prompt, PromptSpec};
use crate::record::TopicLabels;
use crate::terms::input::TermInput;
use crate::terms::normalize::normalize;

use super::detect::FailurePatterns;
use super::policy::WaitPolicy;

/// Knobs for one labeling run.
pub struct RunOptions {
    pub prompt_spec: PromptSpec,
    pub model: ModelConfig,
    /// Minutes of accumulated waiting before the policy is consulted.
    /// The default of 0 escalates on the first soft failure.
    pub max_wait_minutes: u64,
    /// Show a per-topic progress bar.
    pub progress: bool,
    pub patterns: FailurePatterns,
    /// Sleep between retries while under the escalation threshold.
    pub short_backoff: Duration,
    /// Sleep after the policy grants more waiting time.
    pub long_backoff: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            prompt_spec: PromptSpec::default(),
            model: ModelConfig::default(),
            max_wait_minutes: 0,
            progress: true,
            patterns: FailurePatterns::default(),
            short_backoff: Duration::from_secs(60),
            long_backoff: Duration::from_secs(300),
        }
    }
}

/// Label every topic in `input` and return the assembled run record.
///
/// Input and configuration problems fail before the first request.
/// Transport errors from the collaborator propagate unhandled. An abort
/// through the wait policy returns a valid partial record instead.
pub async fn label_topics(
    lm: &dyn LanguageModel,
    policy: &dyn WaitPolicy,
    input: TermInput,
    options: &RunOptions,
) -> Result<TopicLabels> {
    let topics = normalize(input)?;
    let prompts: Vec<String> = topics
        .iter()
        .map(|terms| build_prompt(terms, &options.prompt_spec))
        .collect();

    let with_token = options.model.token.is_some();
    info!(
        topics = topics.len(),
        model = %options.model.model,
        with_token,
        "Starting labeling run"
    );

    let started = Instant::now();
    let mut responses = vec![String::new(); topics.len()];
    let mut labels = vec![String::new(); topics.len()];
    let mut aborted = false;

    let pb = if options.progress {
        let pb = ProgressBar::new(topics.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Topics [{bar:30}] {pos}/{len} ({elapsed} elapsed, eta {eta})")
                .unwrap(),
        );
        Some(pb)
    } else {
        None
    };

    // Wait state spans the whole run: the escalation clock keeps counting
    // across topics until a policy answer resets it.
    let mut max_wait = options.max_wait_minutes;
    let mut waited: u64 = 0;

    'topics: for (i, prompt) in prompts.iter().enumerate() {
        let response = loop {
            let raw = lm
                .generate(
                    &options.model.model,
                    &options.model.params,
                    prompt,
                    options.model.token.as_deref(),
                )
                .await?;

            let Some(failure) = options.patterns.classify(&raw) else {
                break raw;
            };

            warn!(
                topic = i + 1,
                kind = ?failure,
                response = %raw.trim(),
                "Model reported a soft failure"
            );

            if waited >= max_wait {
                let granted = policy.additional_wait_minutes(i, waited);
                if granted == 0 {
                    info!(
                        completed = i,
                        total = topics.len(),
                        "Run aborted by wait policy"
                    );
                    aborted = true;
                    break 'topics;
                }
                max_wait = granted;
                waited = 0;
                tokio::time::sleep(options.long_backoff).await;
                waited += 5;
            } else {
                tokio::time::sleep(options.short_backoff).await;
                waited += 1;
            }
        };

        labels[i] = extract_label(&response, options.prompt_spec.style);
        responses[i] = response;
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    let minutes_elapsed = started.elapsed().as_secs_f64() / 60.0;
    if !aborted {
        info!(
            topics = topics.len(),
            minutes = minutes_elapsed,
            "Labeling run complete"
        );
    }

    Ok(TopicLabels::new(
        topics,
        prompts,
        options.model.model.clone(),
        options.model.params.clone(),
        with_token,
        minutes_elapsed,
        responses,
        labels,
    ))
}
