// Soft-failure detection in model output.
//
// The hosted API reports rate limiting and missing authentication as plain
// text inside an otherwise ordinary response. The exact phrasings are an
// external contract that changes between API versions, so the patterns are
// data on a struct rather than constants baked into the run loop.

/// Which soft-failure family a response matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftFailure {
    RateLimited,
    Unauthorized,
}

/// Case-insensitive substring patterns identifying soft failures.
#[derive(Debug, Clone)]
pub struct FailurePatterns {
    pub rate_limit: Vec<String>,
    pub auth: Vec<String>,
}

impl Default for FailurePatterns {
    fn default() -> Self {
        Self {
            rate_limit: vec![
                "rate limit reached".to_string(),
                "too many requests".to_string(),
            ],
            auth: vec![
                "use a hf access token".to_string(),
                "please log in".to_string(),
                "authorization header is correct".to_string(),
            ],
        }
    }
}

impl FailurePatterns {
    /// Classify a response: `None` means the text is a real model answer.
    pub fn classify(&self, response: &str) -> Option<SoftFailure> {
        let lower = response.to_lowercase();
        if matches_any(&lower, &self.auth) {
            return Some(SoftFailure::Unauthorized);
        }
        if matches_any(&lower, &self.rate_limit) {
            return Some(SoftFailure::RateLimited);
        }
        None
    }
}

fn matches_any(lower: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|pattern| lower.contains(&pattern.to_lowercase()))
}
