// The closed set of supported term-input shapes.
//
// Every shape a run can start from is a variant here, resolved once from
// the caller (or from a JSON file via from_json) before the pipeline runs.
// Nothing downstream inspects raw input again.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// Which labeled matrix of a structural topic model to read terms from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StmWeighting {
    /// Highest-probability terms per topic
    #[default]
    Prob,
    /// FREX-weighted terms (frequency x exclusivity)
    Frex,
    /// Lift-weighted terms
    Lift,
    /// Score-weighted terms
    Score,
}

impl std::str::FromStr for StmWeighting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "prob" => Ok(Self::Prob),
            "frex" => Ok(Self::Frex),
            "lift" => Ok(Self::Lift),
            "score" => Ok(Self::Score),
            other => Err(Error::Configuration(format!(
                "unknown STM weighting '{other}' (expected prob, frex, lift or score)"
            ))),
        }
    }
}

/// One topic from a biterm-style model: parallel token and probability lists.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenProbTopic {
    #[serde(rename = "token")]
    pub tokens: Vec<String>,
    #[serde(rename = "probability")]
    pub probabilities: Vec<f64>,
}

/// The labeled term matrices an STM fit exposes, one row per topic.
/// Whichever matrices the export carried are present; the weighting tag
/// selects which one to read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StmLabels {
    #[serde(default)]
    pub prob: Option<Vec<Vec<String>>>,
    #[serde(default)]
    pub frex: Option<Vec<Vec<String>>>,
    #[serde(default)]
    pub lift: Option<Vec<Vec<String>>>,
    #[serde(default)]
    pub score: Option<Vec<Vec<String>>>,
}

impl StmLabels {
    /// The matrix selected by `weighting`, if the export carried it.
    pub fn matrix(&self, weighting: StmWeighting) -> Option<&Vec<Vec<String>>> {
        match weighting {
            StmWeighting::Prob => self.prob.as_ref(),
            StmWeighting::Frex => self.frex.as_ref(),
            StmWeighting::Lift => self.lift.as_ref(),
            StmWeighting::Score => self.score.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prob.is_none() && self.frex.is_none() && self.lift.is_none() && self.score.is_none()
    }
}

/// A term input in one of the supported shapes.
#[derive(Debug, Clone)]
pub enum TermInput {
    /// One term list per topic, used as-is.
    Topics(Vec<Vec<String>>),
    /// A single flat term list treated as one topic.
    Flat(Vec<String>),
    /// Rows of a term matrix; each column becomes one topic's term list.
    Matrix(Vec<Vec<String>>),
    /// Biterm-style token/probability records, one record per topic.
    TokenProbability(Vec<TokenProbTopic>),
    /// STM labeled matrices plus the weighting that selects one of them.
    Stm(StmLabels, StmWeighting),
}

impl TermInput {
    /// Classify a JSON value into a supported shape.
    ///
    /// Array of string arrays -> Topics, array of strings -> Flat, array of
    /// token/probability objects -> TokenProbability, object keyed by
    /// weighting names -> Stm. JSON nulls among the terms count as missing
    /// values and are rejected here, before any request is sent.
    pub fn from_json(value: &Value, weighting: StmWeighting) -> Result<Self, Error> {
        match value {
            Value::Object(_) => {
                let labels: StmLabels = serde_json::from_value(value.clone()).map_err(|e| {
                    Error::InvalidInput(format!("unrecognized labeled-matrix object: {e}"))
                })?;
                if labels.is_empty() {
                    return Err(Error::InvalidInput(
                        "labeled-matrix object has none of the fields prob, frex, lift, score"
                            .to_string(),
                    ));
                }
                Ok(Self::Stm(labels, weighting))
            }
            Value::Array(items) => {
                if items.is_empty() {
                    Err(Error::InvalidInput("input contains no topics".to_string()))
                } else if items.iter().all(Value::is_string) {
                    let terms = serde_json::from_value(value.clone())
                        .map_err(|e| Error::InvalidInput(e.to_string()))?;
                    Ok(Self::Flat(terms))
                } else if items.iter().all(Value::is_array) {
                    let topics = serde_json::from_value(value.clone()).map_err(|e| {
                        Error::InvalidInput(format!("term lists must hold only strings: {e}"))
                    })?;
                    Ok(Self::Topics(topics))
                } else if items.iter().all(Value::is_object) {
                    let records = serde_json::from_value(value.clone()).map_err(|e| {
                        Error::InvalidInput(format!(
                            "records must carry token and probability lists: {e}"
                        ))
                    })?;
                    Ok(Self::TokenProbability(records))
                } else {
                    Err(Error::InvalidInput(
                        "mixed or unsupported element types in term array".to_string(),
                    ))
                }
            }
            _ => Err(Error::InvalidInput(
                "expected a JSON array or object holding topic terms".to_string(),
            )),
        }
    }
}
