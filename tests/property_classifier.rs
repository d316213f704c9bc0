//! Property tests for classifier totality and priority.

use proptest::prelude::*;

use prooforge::domain::models::Status;
use prooforge::services::FeedbackClassifier;

proptest! {
    /// Every output maps to exactly one status, and the intended success
    /// invariant holds for classifier-produced results.
    #[test]
    fn classification_is_total(
        stdout in ".{0,400}",
        stderr in ".{0,400}",
        exit_code in proptest::option::of(-2i32..=2),
    ) {
        let result = FeedbackClassifier::new().classify(&stdout, &stderr, exit_code);

        prop_assert_eq!(result.status == Status::Ok, exit_code == Some(0));
        if result.status == Status::Ok {
            prop_assert_eq!(result.unsolved_goal_count, 0);
        }
        if result.status == Status::ErrLogical {
            prop_assert!(result.unsolved_goal_count >= 1);
        }
        prop_assert!(!result.summary.is_empty());
        prop_assert!(!result.feedback.is_empty());
    }

    /// A tool indicator anywhere in a failing output forces ErrTool, even
    /// when logical-error markers are present too.
    #[test]
    fn tool_indicators_outrank_logical_markers(
        prefix in "[a-z ]{0,40}",
        suffix in "[a-z ]{0,40}",
        indicator in prop_oneof![
            Just("timeout"),
            Just("deadline"),
            Just("out of memory"),
            Just("segmentation fault"),
            Just("unknown package"),
            Just("no such file"),
        ],
    ) {
        let stderr = format!("error: type mismatch\n{prefix}{indicator}{suffix}");
        let result = FeedbackClassifier::new().classify("", &stderr, Some(1));
        prop_assert_eq!(result.status, Status::ErrTool);
    }

    /// Outputs announcing unsolved goals always report at least one, and the
    /// case count wins when it is larger.
    #[test]
    fn goal_count_lower_bound(case_count in 0usize..6) {
        let cases: String = (0..case_count)
            .map(|i| format!("case g{i}\n  h : True\n"))
            .collect();
        let stdout = format!("error: unsolved goals\n{cases}");
        let result = FeedbackClassifier::new().classify(&stdout, "", Some(1));

        prop_assert_eq!(result.status, Status::ErrLogical);
        prop_assert!(result.unsolved_goal_count >= 1);
        if case_count > 1 {
            prop_assert_eq!(result.unsolved_goal_count as usize, case_count);
        }
    }
}
