// Continuation policies for rate-limit escalations.
//
// When accumulated waiting passes the configured threshold, the run loop
// asks a policy how many more minutes to keep waiting. The interactive
// policy blocks on stdin; automated policies answer without a human so the
// loop works in scripts and tests. Returning 0 aborts the run.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicU32, Ordering};

/// Strategy consulted when a rate-limit escalation fires.
pub trait WaitPolicy: Send + Sync {
    /// How many more minutes to keep waiting for `topic_index`.
    /// 0 aborts the run, keeping the results gathered so far.
    fn additional_wait_minutes(&self, topic_index: usize, waited_minutes: u64) -> u64;
}

/// Blocking stdin prompt — the default for terminal runs.
pub struct InteractivePolicy;

impl WaitPolicy for InteractivePolicy {
    fn additional_wait_minutes(&self, topic_index: usize, waited_minutes: u64) -> u64 {
        println!(
            "\nTopic {} is still rate limited after {} minute(s) of waiting.",
            topic_index + 1,
            waited_minutes
        );
        print!("How many more minutes should I keep waiting? (0 aborts the run) ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return 0;
        }
        // Anything unparseable counts as "stop"; the operator gets asked
        // again on the next escalation if they mistyped a positive answer.
        line.trim().parse().unwrap_or(0)
    }
}

/// Automated policy: grant a fixed extension a limited number of times,
/// then abort. Suited to unattended runs.
pub struct FixedWaitPolicy {
    grant_minutes: u64,
    remaining: AtomicU32,
}

impl FixedWaitPolicy {
    pub fn new(grant_minutes: u64, max_escalations: u32) -> Self {
        Self {
            grant_minutes,
            remaining: AtomicU32::new(max_escalations),
        }
    }
}

impl WaitPolicy for FixedWaitPolicy {
    fn additional_wait_minutes(&self, _topic_index: usize, _waited_minutes: u64) -> u64 {
        let granted = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if granted {
            self.grant_minutes
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_policy_grants_then_aborts() {
        let policy = FixedWaitPolicy::new(10, 2);
        assert_eq!(policy.additional_wait_minutes(0, 0), 10);
        assert_eq!(policy.additional_wait_minutes(0, 10), 10);
        assert_eq!(policy.additional_wait_minutes(0, 20), 0);
        assert_eq!(policy.additional_wait_minutes(1, 0), 0);
    }
}
