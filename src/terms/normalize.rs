// Normalization of term inputs into one ordered list of term lists.
//
// Token/probability records and STM rows deliberately collapse into a
// single comma-separated string per topic: those shapes describe a topic
// as a whole rather than as separate top terms, and the prompt reads
// better with the original ordering kept intact.

use crate::error::Error;

use super::input::{StmWeighting, TermInput};

/// Turn any supported input shape into k ordered term lists, one per topic.
///
/// Fails with `Error::InvalidInput` on empty topics, missing values or
/// ragged matrices, before any network activity happens.
pub fn normalize(input: TermInput) -> Result<Vec<Vec<String>>, Error> {
    let topics = match input {
        TermInput::Topics(topics) => topics,
        TermInput::Flat(terms) => vec![terms],
        TermInput::Matrix(rows) => transpose(rows)?,
        TermInput::TokenProbability(records) => {
            let mut topics = Vec::with_capacity(records.len());
            for (i, record) in records.iter().enumerate() {
                if record.tokens.len() != record.probabilities.len() {
                    return Err(Error::InvalidInput(format!(
                        "topic {}: {} tokens but {} probabilities",
                        i + 1,
                        record.tokens.len(),
                        record.probabilities.len()
                    )));
                }
                topics.push(vec![record.tokens.join(", ")]);
            }
            topics
        }
        TermInput::Stm(labels, weighting) => {
            let matrix = labels.matrix(weighting).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "labeled-matrix object carries no {} matrix",
                    weighting_name(weighting)
                ))
            })?;
            matrix.iter().map(|row| vec![row.join(", ")]).collect()
        }
    };

    validate(&topics)?;
    Ok(topics)
}

/// Matrix rows -> per-column term lists. All rows must have the same width.
fn transpose(rows: Vec<Vec<String>>) -> Result<Vec<Vec<String>>, Error> {
    let Some(width) = rows.first().map(Vec::len) else {
        return Err(Error::InvalidInput("term matrix has no rows".to_string()));
    };
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(Error::InvalidInput(format!(
            "term matrix is ragged: row {} has {} entries, expected {}",
            i + 1,
            row.len(),
            width
        )));
    }

    let mut topics = vec![Vec::with_capacity(rows.len()); width];
    for row in rows {
        for (column, term) in row.into_iter().enumerate() {
            topics[column].push(term);
        }
    }
    Ok(topics)
}

fn validate(topics: &[Vec<String>]) -> Result<(), Error> {
    if topics.is_empty() {
        return Err(Error::InvalidInput("input contains no topics".to_string()));
    }
    for (i, topic) in topics.iter().enumerate() {
        if topic.is_empty() {
            return Err(Error::InvalidInput(format!("topic {} has no terms", i + 1)));
        }
        if topic.iter().any(|term| term.trim().is_empty()) {
            return Err(Error::InvalidInput(format!(
                "topic {} contains a missing or empty term",
                i + 1
            )));
        }
    }
    Ok(())
}

fn weighting_name(weighting: StmWeighting) -> &'static str {
    match weighting {
        StmWeighting::Prob => "prob",
        StmWeighting::Frex => "frex",
        StmWeighting::Lift => "lift",
        StmWeighting::Score => "score",
    }
}
