//! Process exit codes
//!
//! - 0: Success
//! - 1: Hard failure (path conflict, clone error, invalid input)
//! - 2: Finished, but some steps failed (template writes or follow-up commands)
//! - 130: Cancelled by the user

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Hard failure: the run was aborted.
pub const FAILURE: i32 = 1;

/// The run finished but the summary contains failed steps.
pub const COMPLETED_WITH_FAILURES: i32 = 2;

/// Prompt aborted or Ctrl+C received (128 + SIGINT).
pub const CANCELLED: i32 = 130;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [SUCCESS, FAILURE, COMPLETED_WITH_FAILURES, CANCELLED];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
