use chrono::{Duration, TimeZone, Utc};
use clawdebate_core::{
    Agent, AnonymousVoteUsage, Argument, ArgumentLimits, CastVoteInput, Challenge, CreateDebateInput,
    DebateError, DebateEvent, DebateSnapshot, DebateStatus, DenyReason, MemoryPublisher,
    NullPublisher, Operation, RulesConfig, Side, SubmitArgumentInput, VoteCounts, VoterIdentity,
};
use clawdebate_rules::{
    agent_performance, debate_stats, leaderboard, DebateEngine, LeaderboardQuery, TimeWindow,
    Winner,
};
use std::sync::Arc;
use uuid::Uuid;

fn body(len: usize) -> String {
    "Automated reasoning scales. ".repeat(len / 28 + 1)[..len].to_string()
}

#[test]
fn test_full_debate_lifecycle() {
    let publisher = Arc::new(MemoryPublisher::new());
    let engine = DebateEngine::new(RulesConfig::default(), publisher.clone()).unwrap();
    let day_one = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();

    let input = CreateDebateInput {
        title: "  Open weights make AI safer  ".to_string(),
        description: Some("Round one of the spring league".to_string()),
        category: "Technology".to_string(),
        stages: vec![],
    };
    let (mut debate, mut stages) = engine.create_debate(&input, day_one).unwrap();
    assert_eq!(debate.title, "Open weights make AI safer");
    assert_eq!(debate.category, "technology");
    assert_eq!(debate.status, DebateStatus::Pending);
    assert_eq!(stages.len(), 3);

    engine
        .advance_status(&mut debate, &mut stages, DebateStatus::Active, day_one)
        .unwrap();
    let opening = engine
        .advance_stage(&debate, &mut stages, day_one)
        .unwrap()
        .unwrap();

    let agent_for = Agent {
        id: Uuid::new_v4(),
        name: "Clawde".to_string(),
        model: Some("claude".to_string()),
    };
    let agent_against = Agent {
        id: Uuid::new_v4(),
        name: "Pinchy".to_string(),
        model: None,
    };

    let mut arguments: Vec<Argument> = Vec::new();
    for (agent, side) in [(&agent_for, Side::For), (&agent_against, Side::Against)] {
        let challenge = Challenge::from_parts(6, 7, Operation::Subtract).unwrap();
        let input = SubmitArgumentInput {
            debate_id: debate.id,
            stage_id: opening.id,
            agent_id: agent.id,
            side,
            content: body(900),
            model: "model-x".to_string(),
        };
        let argument = engine
            .submit_argument(&debate, &opening, &arguments, &input, &challenge, "-1", day_one)
            .unwrap();
        arguments.push(argument);
    }

    // same agent, same stage, same UTC day
    let again = SubmitArgumentInput {
        debate_id: debate.id,
        stage_id: opening.id,
        agent_id: agent_for.id,
        side: Side::Against,
        content: body(900),
        model: "model-x".to_string(),
    };
    let challenge = Challenge::from_parts(2, 2, Operation::Add).unwrap();
    let err = engine
        .submit_argument(
            &debate,
            &opening,
            &arguments,
            &again,
            &challenge,
            "4",
            day_one + Duration::hours(3),
        )
        .unwrap_err();
    assert!(matches!(
        err.deny_reason(),
        Some(DenyReason::AlreadySubmittedToday { .. })
    ));

    // the next UTC day is fine
    let next_day = day_one + Duration::days(1);
    let argument = engine
        .submit_argument(&debate, &opening, &arguments, &again, &challenge, "4", next_day)
        .unwrap();
    arguments.push(argument);

    engine
        .advance_status(&mut debate, &mut stages, DebateStatus::Voting, next_day)
        .unwrap();
    assert!(stages.iter().all(|s| !s.active));
    debate.voting_deadline = Some(next_day + Duration::days(2));

    let mut votes = Vec::new();
    for (i, side) in [Side::For, Side::For, Side::Against].into_iter().enumerate() {
        let input = CastVoteInput {
            debate_id: debate.id,
            voter: VoterIdentity::anonymous(format!("session-{i}")),
            side,
        };
        let usage = AnonymousVoteUsage::default();
        votes.push(
            engine
                .cast_vote(&debate, &input, None, Some(&usage), next_day)
                .unwrap(),
        );
    }

    assert!(!engine.close_voting_if_due(&mut debate, next_day));
    assert!(engine.close_voting_if_due(&mut debate, next_day + Duration::days(3)));
    assert_eq!(debate.status, DebateStatus::Completed);

    let results = engine.results(VoteCounts::tally(&votes));
    assert_eq!(results.for_percentage, 66.7);
    assert_eq!(results.against_percentage, 33.3);
    assert_eq!(results.winner, Winner::For);

    let snapshot = DebateSnapshot {
        debates: vec![debate.clone()],
        stages: stages.clone(),
        arguments,
        votes,
        agents: vec![agent_for.clone(), agent_against.clone()],
    };

    let stats = debate_stats(&snapshot, debate.id, 1).unwrap();
    assert_eq!(stats.participants, 2);
    assert_eq!(stats.arguments_for, 1);
    assert_eq!(stats.arguments_against, 2);
    assert_eq!(stats.arguments_per_stage[0].arguments, 3);
    assert_eq!(stats.average_argument_length, 900.0);

    let later = next_day + Duration::days(5);
    let winner = agent_performance(&snapshot, agent_for.id, TimeWindow::All, later, 1).unwrap();
    assert_eq!(winner.wins, 1);
    assert_eq!(winner.win_rate, 100.0);
    assert_eq!(winner.total_votes, 2);
    assert_eq!(winner.average_quality, 66.7);

    let board = leaderboard(&snapshot, &LeaderboardQuery::default(), later, 1);
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].name, "Clawde");
    assert_eq!(board[1].name, "Pinchy");

    let kinds: Vec<&str> = publisher.events().iter().map(DebateEvent::kind).collect();
    assert_eq!(
        kinds,
        vec![
            "debate_created",
            "status_changed",
            "stage_activated",
            "argument_submitted",
            "argument_submitted",
            "argument_submitted",
            "status_changed",
            "vote_cast",
            "vote_cast",
            "vote_cast",
            "status_changed",
        ]
    );
}

#[test]
fn test_anonymous_caps_block_before_persisting() {
    let engine: DebateEngine = DebateEngine::default();
    let now = Utc::now();
    let input = CreateDebateInput {
        title: "Crustaceans are underrated".to_string(),
        description: None,
        category: "science".to_string(),
        stages: vec!["Only".to_string()],
    };
    let (mut debate, mut stages) = engine.create_debate(&input, now).unwrap();
    engine
        .advance_status(&mut debate, &mut stages, DebateStatus::Voting, now)
        .unwrap();

    let vote = CastVoteInput {
        debate_id: debate.id,
        voter: VoterIdentity::anonymous("cookie"),
        side: Side::Against,
    };
    let usage = AnonymousVoteUsage {
        session_votes: 2,
        address_votes: 5,
    };
    let err = engine
        .cast_vote(&debate, &vote, None, Some(&usage), now)
        .unwrap_err();
    assert_eq!(
        err.deny_reason(),
        Some(&DenyReason::AddressLimitReached { limit: 5 })
    );

    // signed-in users are not subject to anonymous caps
    let user_vote = CastVoteInput {
        voter: VoterIdentity::user(Uuid::new_v4()),
        ..vote
    };
    assert!(engine
        .cast_vote(&debate, &user_vote, None, Some(&usage), now)
        .is_ok());
}

#[test]
fn test_invalid_input_reports_every_field() {
    let engine: DebateEngine = DebateEngine::default();
    let input = CreateDebateInput {
        title: "Hm".to_string(),
        description: None,
        category: "x".to_string(),
        stages: vec![],
    };
    match engine.create_debate(&input, Utc::now()) {
        Err(DebateError::Validation(errors)) => {
            assert!(errors.has_field("title"));
            assert!(errors.has_field("category"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_engine_refuses_inconsistent_config() {
    let config = RulesConfig {
        percentage_decimals: 40,
        ..RulesConfig::default()
    };
    assert!(DebateEngine::new(config, NullPublisher).is_err());

    let inverted = RulesConfig {
        arguments: ArgumentLimits {
            min_chars: 3000,
            max_chars: 500,
        },
        ..RulesConfig::default()
    };
    assert!(DebateEngine::new(inverted, NullPublisher).is_err());
}

#[test]
fn test_status_never_moves_backwards() {
    let engine: DebateEngine = DebateEngine::default();
    let now = Utc::now();
    let input = CreateDebateInput {
        title: "Backwards compatibility is overrated".to_string(),
        description: None,
        category: "technology".to_string(),
        stages: vec![],
    };
    let (mut debate, mut stages) = engine.create_debate(&input, now).unwrap();
    engine
        .advance_status(&mut debate, &mut stages, DebateStatus::Completed, now)
        .unwrap();

    let err = engine
        .advance_status(&mut debate, &mut stages, DebateStatus::Active, now)
        .unwrap_err();
    assert!(matches!(err, DebateError::InvalidTransition { .. }));
}
