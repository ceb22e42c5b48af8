use super::ConversationManager;
use crate::domain::models::Answer;
use crate::domain::models::Citation;
use crate::domain::models::ClientError;
use crate::domain::models::Question;
use crate::domain::models::Role;
use crate::domain::models::TurnStatus;

fn answer(text: &str) -> Answer {
    return Answer {
        text: text.to_string(),
        sources: vec![],
    };
}

#[test]
fn it_ignores_blank_questions() {
    let mut manager = ConversationManager::default();

    assert_eq!(manager.ask(""), Ok(None));
    assert_eq!(manager.ask("   \n\t"), Ok(None));
    assert!(manager.turns().is_empty());
    assert!(!manager.is_busy());
}

#[test]
fn it_appends_user_and_pending_assistant_turns() {
    let mut manager = ConversationManager::default();
    let question = manager.ask("  Is skiing covered?  ").unwrap().unwrap();

    assert_eq!(
        question,
        Question {
            turn_id: 2,
            text: "Is skiing covered?".to_string(),
        }
    );

    let turns = manager.turns();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].id, 1);
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].text, "Is skiing covered?");
    assert_eq!(turns[1].id, 2);
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[1].status, TurnStatus::Pending);
    assert!(manager.is_busy());
}

#[test]
fn it_resolves_the_pending_turn() {
    let mut manager = ConversationManager::default();
    let question = manager.ask("What does the policy cover?").unwrap().unwrap();

    let applied = manager.complete(
        question.turn_id,
        Ok(Answer {
            text: "Coverage includes X.".to_string(),
            sources: vec![Citation::new("policy.pdf", "3.2")],
        }),
    );

    assert!(applied);
    assert!(!manager.is_busy());

    let turn = manager.turn(question.turn_id).unwrap();
    assert_eq!(turn.status, TurnStatus::Resolved);
    assert_eq!(turn.text, "Coverage includes X.");
    assert_eq!(turn.sources, vec![Citation::new("policy.pdf", "3.2")]);
}

#[test]
fn it_resolves_with_empty_sources() {
    let mut manager = ConversationManager::default();
    let question = manager.ask("Is skiing covered?").unwrap().unwrap();
    manager.complete(question.turn_id, Ok(answer("Yes, up to $5,000.")));

    let turn = manager.turn(question.turn_id).unwrap();
    assert_eq!(turn.status, TurnStatus::Resolved);
    assert!(turn.sources.is_empty());
}

#[test]
fn it_errors_with_backend_detail() {
    let mut manager = ConversationManager::default();
    let question = manager.ask("Is skiing covered?").unwrap().unwrap();
    manager.complete(
        question.turn_id,
        Err(ClientError::BackendError("index not loaded".to_string())),
    );

    let turn = manager.turn(question.turn_id).unwrap();
    assert_eq!(turn.status, TurnStatus::Errored);
    assert!(turn.sources.is_empty());
    insta::assert_snapshot!(turn.text, @"Sorry, I encountered an error: index not loaded");
    assert!(!manager.is_busy());
}

#[test]
fn it_errors_on_blank_answers() {
    let mut manager = ConversationManager::default();
    let question = manager.ask("Is skiing covered?").unwrap().unwrap();
    manager.complete(question.turn_id, Ok(answer("  ")));

    let turn = manager.turn(question.turn_id).unwrap();
    assert_eq!(turn.status, TurnStatus::Errored);
    insta::assert_snapshot!(turn.text, @"Sorry, I encountered an error: Failed to get a response from the server");
}

#[test]
fn it_rejects_questions_while_pending() {
    let mut manager = ConversationManager::default();
    manager.ask("First?").unwrap();

    assert_eq!(manager.ask("Second?"), Err(ClientError::QuestionPending));
    assert_eq!(manager.turns().len(), 2);

    // Blank input stays a no-op even while busy.
    assert_eq!(manager.ask(" "), Ok(None));
}

#[test]
fn it_keeps_strict_submission_order() {
    let mut manager = ConversationManager::default();
    let questions = ["One?", "Two?", "Three?", "Four?"];
    for (idx, text) in questions.iter().enumerate() {
        let question = manager.ask(text).unwrap().unwrap();
        manager.complete(question.turn_id, Ok(answer(&format!("Answer {idx}"))));
    }

    let turns = manager.turns();
    assert_eq!(turns.len(), questions.len() * 2);
    for (idx, pair) in turns.chunks(2).enumerate() {
        assert_eq!(pair[0].role, Role::User);
        assert_eq!(pair[0].text, questions[idx]);
        assert_eq!(pair[1].role, Role::Assistant);
        assert_eq!(pair[1].status, TurnStatus::Resolved);
        assert_eq!(pair[1].text, format!("Answer {idx}"));
    }

    let ids = turns.iter().map(|turn| return turn.id).collect::<Vec<u64>>();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn it_matches_responses_by_turn_id() {
    let mut manager = ConversationManager::default();
    let first = manager.ask("First?").unwrap().unwrap();
    manager.complete(first.turn_id, Ok(answer("First answer")));
    let second = manager.ask("Second?").unwrap().unwrap();

    // A late duplicate for the first question must not land on the second.
    assert!(!manager.complete(first.turn_id, Ok(answer("Late answer"))));
    assert_eq!(
        manager.turn(first.turn_id).unwrap().text,
        "First answer".to_string()
    );
    assert!(manager.turn(second.turn_id).unwrap().is_pending());

    // User turns and unknown ids never take answers.
    assert!(!manager.complete(second.turn_id - 1, Ok(answer("Wrong turn"))));
    assert!(!manager.complete(99, Ok(answer("Nobody asked"))));
    assert!(manager.is_busy());

    assert!(manager.complete(second.turn_id, Ok(answer("Second answer"))));
    assert_eq!(
        manager.turn(second.turn_id).unwrap().text,
        "Second answer".to_string()
    );
}

#[test]
fn it_cancels_the_pending_question() {
    let mut manager = ConversationManager::default();
    assert_eq!(manager.cancel(), None);

    let question = manager.ask("Is skiing covered?").unwrap().unwrap();
    assert_eq!(manager.cancel(), Some(question.turn_id));
    assert!(!manager.is_busy());

    let turn = manager.turn(question.turn_id).unwrap();
    assert_eq!(turn.status, TurnStatus::Errored);
    insta::assert_snapshot!(turn.text, @"Sorry, I encountered an error: Request cancelled.");

    // The aborted request can still race in, it's dropped.
    assert!(!manager.complete(question.turn_id, Ok(answer("Too late"))));
}
