use chrono::{TimeZone, Utc};
use clawdebate_core::{
    Argument, ArgumentLimits, Debate, DebateStatus, DenyReason, Side, Stage, VoteCounts,
};
use clawdebate_rules::{
    calculate_vote_results, can_submit_argument, Admission, ArgumentProposal, Winner,
};
use proptest::prelude::*;
use uuid::Uuid;

fn active_stage() -> (Debate, Stage) {
    let mut debate = Debate::new("Lobsters are immortal", "science", Utc::now());
    debate.status = DebateStatus::Active;
    let mut stage = Stage::new(debate.id, 0, "Opening");
    stage.active = true;
    (debate, stage)
}

fn admit(len: usize) -> Admission {
    let (debate, stage) = active_stage();
    let body = "x".repeat(len);
    let proposal = ArgumentProposal {
        agent_id: Uuid::new_v4(),
        side: Side::For,
        body: &body,
    };
    let none: Vec<Argument> = Vec::new();
    can_submit_argument(
        &debate,
        &stage,
        &proposal,
        &none,
        Utc::now(),
        &ArgumentLimits::default(),
    )
}

#[test]
fn test_length_bounds_are_inclusive() {
    assert_eq!(
        admit(499).reason(),
        Some(&DenyReason::ContentTooShort {
            actual: 499,
            min: 500
        })
    );
    assert!(admit(500).is_allowed());
    assert!(admit(3000).is_allowed());
    assert_eq!(
        admit(3001).reason(),
        Some(&DenyReason::ContentTooLong {
            actual: 3001,
            max: 3000
        })
    );
}

#[test]
fn test_day_boundary_is_utc_midnight() {
    let (debate, stage) = active_stage();
    let agent_id = Uuid::new_v4();
    let late = Utc.with_ymd_and_hms(2026, 5, 1, 23, 59, 59).unwrap();
    let existing = vec![Argument {
        id: Uuid::new_v4(),
        debate_id: debate.id,
        stage_id: stage.id,
        agent_id,
        side: Side::For,
        content: "x".repeat(600),
        model: "m".to_string(),
        created_at: late,
    }];
    let body = "y".repeat(600);
    let proposal = ArgumentProposal {
        agent_id,
        side: Side::Against,
        body: &body,
    };
    let limits = ArgumentLimits::default();

    let same_day = can_submit_argument(&debate, &stage, &proposal, &existing, late, &limits);
    assert!(!same_day.is_allowed());

    let midnight = Utc.with_ymd_and_hms(2026, 5, 2, 0, 0, 0).unwrap();
    let next_day = can_submit_argument(&debate, &stage, &proposal, &existing, midnight, &limits);
    assert!(next_day.is_allowed());
}

proptest! {
    #[test]
    fn prop_equal_counts_tie(n in 1u64..10_000) {
        let results = calculate_vote_results(VoteCounts::new(n, n));
        prop_assert_eq!(results.winner, Winner::Tie);
        prop_assert_eq!(results.for_percentage, 50.0);
        prop_assert_eq!(results.against_percentage, 50.0);
    }

    #[test]
    fn prop_winner_matches_majority(f in 0u64..10_000, a in 0u64..10_000) {
        let results = calculate_vote_results(VoteCounts::new(f, a));
        prop_assert_eq!(results.total, f + a);
        let expected = if f + a == 0 {
            Winner::None
        } else if f > a {
            Winner::For
        } else if a > f {
            Winner::Against
        } else {
            Winner::Tie
        };
        prop_assert_eq!(results.winner, expected);
    }

    #[test]
    fn prop_percentages_sum_to_about_100(f in 0u64..10_000, a in 0u64..10_000) {
        prop_assume!(f + a > 0);
        let results = calculate_vote_results(VoteCounts::new(f, a));
        let sum = results.for_percentage + results.against_percentage;
        prop_assert!((sum - 100.0).abs() <= 0.1 + 1e-9, "sum was {}", sum);
        prop_assert!((0.0..=100.0).contains(&results.for_percentage));
    }

    #[test]
    fn prop_length_admission_matches_limits(len in 400usize..3100) {
        let allowed = admit(len).is_allowed();
        prop_assert_eq!(allowed, (500..=3000).contains(&len));
    }
}
