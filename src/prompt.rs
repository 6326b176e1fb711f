// Prompt construction — pure text assembly, no I/O.
//
// A prompt embeds the topic's joined terms, the optional background
// context and the label word budget. The style decides how the model is
// told to answer: bare text, a JSON object, or the same JSON instruction
// wrapped in instruction-tuned chat role delimiters.

use crate::error::Error;

/// The textual convention used to request the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// Answer with the label text only.
    Plain,
    /// Answer as a JSON object with a single `label` field.
    Json,
    /// The JSON instruction wrapped in `[INST] ... [/INST]` role markers,
    /// matching instruction-tuned chat model conventions.
    JsonRoles,
}

impl std::str::FromStr for PromptStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "json-roles" => Ok(Self::JsonRoles),
            other => Err(Error::Configuration(format!(
                "unknown prompt style '{other}' (expected plain, json or json-roles)"
            ))),
        }
    }
}

/// Configuration for prompt construction. Immutable once built.
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub style: PromptStyle,
    /// Separator the topic's terms are joined with.
    pub separator: String,
    /// Background context mentioned in every prompt; empty = omitted.
    pub context: String,
    /// Maximum label length in words.
    pub max_label_words: usize,
}

impl PromptSpec {
    pub fn new(
        style: PromptStyle,
        separator: impl Into<String>,
        context: impl Into<String>,
        max_label_words: usize,
    ) -> Result<Self, Error> {
        if max_label_words == 0 {
            return Err(Error::Configuration(
                "maximum label length must be at least one word".to_string(),
            ));
        }
        Ok(Self {
            style,
            separator: separator.into(),
            context: context.into(),
            max_label_words,
        })
    }
}

impl Default for PromptSpec {
    fn default() -> Self {
        Self {
            style: PromptStyle::Json,
            separator: "; ".to_string(),
            context: String::new(),
            max_label_words: 5,
        }
    }
}

/// Build the prompt for one topic. Deterministic: same inputs, same string.
pub fn build_prompt(terms: &[String], spec: &PromptSpec) -> String {
    let term_list = terms.join(&spec.separator);

    let mut instruction = format!(
        "A topic from a topic model is described by the following terms: {term_list}."
    );
    if !spec.context.is_empty() {
        instruction.push_str(&format!(
            " The topics are related to the following context: {}.",
            spec.context
        ));
    }
    instruction.push_str(&format!(
        " Find a short label for this topic consisting of at most {} words.",
        spec.max_label_words
    ));

    match spec.style {
        PromptStyle::Plain => {
            format!("{instruction} Answer with the label only, without any further text.")
        }
        PromptStyle::Json => format!("{instruction} {}", json_answer_clause()),
        PromptStyle::JsonRoles => format!("[INST] {instruction} {} [/INST]", json_answer_clause()),
    }
}

fn json_answer_clause() -> &'static str {
    "Answer with a JSON object containing a single field \"label\" that holds the label, and nothing else."
}
