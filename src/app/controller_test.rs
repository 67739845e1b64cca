use std::sync::{Arc, Mutex};

use super::*;
use crate::backend::{MockCompletion, MockNarration};
use crate::models::{Conversation, Role, StoryPrompt};

type Prompts = Arc<Mutex<Vec<StoryPrompt>>>;

/// A completion double answering with `replies` in order. `None` simulates a
/// failed request.
fn completion_with(replies: Vec<Option<&'static str>>) -> (MockCompletion, Prompts) {
    let prompts: Prompts = Arc::new(Mutex::new(vec![]));
    let seen = Arc::clone(&prompts);
    let mut replies = replies.into_iter();

    let mut completion = MockCompletion::new();
    completion.expect_generate().returning(move |prompt| {
        seen.lock().unwrap().push(prompt);
        let reply = replies.next().expect("unexpected completion request");
        Box::pin(async move {
            match reply {
                Some(text) => Ok(text.to_string()),
                None => Err(eyre::eyre!("connection refused")),
            }
        })
    });
    (completion, prompts)
}

fn idle_completion() -> MockCompletion {
    let mut completion = MockCompletion::new();
    completion.expect_generate().never();
    completion
}

fn idle_narration() -> MockNarration {
    let mut narration = MockNarration::new();
    narration.expect_synthesize().never();
    narration
}

fn controller(completion: MockCompletion, narration: MockNarration) -> Controller {
    Controller::new(Arc::new(completion), Arc::new(narration))
}

fn rome_session() -> Session {
    let mut convo = Conversation::new().with_turns(vec![
        Turn::user("Tell me about Rome"),
        Turn::assistant("Once upon a time in Rome..."),
    ]);
    convo.record_story("Once upon a time in Rome...");
    Session::new().with_conversation(convo)
}

fn long_session() -> Session {
    let mut convo = Conversation::new().with_turns(vec![
        Turn::user("Tell me about Rome"),
        Turn::assistant("Once upon a time in Rome..."),
        Turn::user("What about the emperors?"),
        Turn::assistant("Long ago, an emperor named Augustus..."),
    ]);
    convo.record_story("Once upon a time in Rome...");
    convo.record_story("Long ago, an emperor named Augustus...");
    Session::new().with_conversation(convo)
}

fn contents(session: &Session) -> Vec<(Role, String)> {
    session
        .conversation()
        .turns()
        .iter()
        .map(|turn| (turn.role(), turn.content().to_string()))
        .collect()
}

#[tokio::test]
async fn test_submit_on_empty_conversation() {
    let (completion, prompts) = completion_with(vec![Some("Hi there! Want a story?")]);
    let controller = controller(completion, idle_narration());
    let mut session = Session::new();

    let reply = controller
        .submit(&mut session, "Hello")
        .await
        .expect("failed to submit");

    assert_eq!(reply, "Hi there! Want a story?");
    assert_eq!(
        contents(&session),
        vec![
            (Role::User, "Hello".to_string()),
            (Role::Assistant, "Hi there! Want a story?".to_string()),
        ]
    );
    let archive = session.conversation().archive();
    assert_eq!(archive.len(), 1);
    assert_eq!(archive.last().unwrap().text(), "Hi there! Want a story?");

    let prompts = prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].instruction(), StoryConfig::default().system_prompt);
    assert_eq!(prompts[0].turns().len(), 1);
    assert_eq!(prompts[0].turns()[0].content(), "Hello");
}

#[tokio::test]
async fn test_submit_sends_whole_conversation() {
    let (completion, prompts) = completion_with(vec![Some("Once upon a time, a senator...")]);
    let controller = controller(completion, idle_narration());
    let mut session = long_session();

    controller
        .submit(&mut session, "And the senate?")
        .await
        .expect("failed to submit");

    assert_eq!(session.conversation().len(), 6);
    assert!(session.conversation().is_alternating());
    assert_eq!(session.conversation().archive().len(), 3);

    let prompts = prompts.lock().unwrap();
    let turns = prompts[0].turns();
    assert_eq!(turns.len(), 5);
    assert_eq!(turns[0].content(), "Tell me about Rome");
    assert_eq!(turns[4].content(), "And the senate?");
}

#[tokio::test]
async fn test_edit_and_regenerate() {
    let (completion, prompts) = completion_with(vec![Some("Once upon a time in Egypt...")]);
    let controller = controller(completion, idle_narration());
    let mut session = rome_session();

    controller.edit(&mut session, 0).expect("failed to edit");
    assert_eq!(session.state(), EditState::Editing(0));
    assert_eq!(session.edit_cursor(), Some(0));

    let reply = controller
        .confirm(&mut session, "Tell me about Egypt")
        .await
        .expect("failed to regenerate");

    assert_eq!(reply, "Once upon a time in Egypt...");
    assert_eq!(session.state(), EditState::Idle);
    assert_eq!(
        contents(&session),
        vec![
            (Role::User, "Tell me about Egypt".to_string()),
            (Role::Assistant, "Once upon a time in Egypt...".to_string()),
        ]
    );

    let stories = session.conversation().archive().stories();
    assert_eq!(stories.len(), 2);
    assert_eq!(stories[0].text(), "Once upon a time in Rome...");
    assert_eq!(stories[1].text(), "Once upon a time in Egypt...");

    let prompts = prompts.lock().unwrap();
    assert_eq!(
        prompts[0].instruction(),
        StoryConfig::default().regenerate_prompt
    );
    assert_eq!(prompts[0].turns().len(), 1);
    assert_eq!(prompts[0].turns()[0].content(), "Tell me about Egypt");
}

#[tokio::test]
async fn test_regenerate_truncates_later_turns() {
    let (completion, prompts) = completion_with(vec![Some("Once upon a time, a gladiator...")]);
    let controller = controller(completion, idle_narration());
    let mut session = long_session();

    controller.edit(&mut session, 2).expect("failed to edit");
    controller
        .confirm(&mut session, "What about the gladiators?")
        .await
        .expect("failed to regenerate");

    assert_eq!(
        contents(&session),
        vec![
            (Role::User, "Tell me about Rome".to_string()),
            (Role::Assistant, "Once upon a time in Rome...".to_string()),
            (Role::User, "What about the gladiators?".to_string()),
            (Role::Assistant, "Once upon a time, a gladiator...".to_string()),
        ]
    );
    assert_eq!(session.conversation().archive().len(), 3);
    assert_eq!(prompts.lock().unwrap()[0].turns().len(), 3);
}

#[tokio::test]
async fn test_edit_invalid_index() {
    let controller = controller(idle_completion(), idle_narration());
    let mut session = rome_session();

    let err = controller.edit(&mut session, 1).unwrap_err();
    assert!(matches!(err, StoryError::InvalidIndex(1)));
    let err = controller.edit(&mut session, 2).unwrap_err();
    assert!(matches!(err, StoryError::InvalidIndex(2)));

    assert_eq!(session.state(), EditState::Idle);
    assert_eq!(session.conversation().len(), 2);
}

#[tokio::test]
async fn test_single_edit_at_a_time() {
    let controller = controller(idle_completion(), idle_narration());
    let mut session = long_session();

    controller.edit(&mut session, 0).expect("failed to edit");
    let err = controller.edit(&mut session, 2).unwrap_err();
    assert!(matches!(err, StoryError::EditInProgress(0)));
    assert_eq!(session.state(), EditState::Editing(0));

    let err = controller.submit(&mut session, "Hello").await.unwrap_err();
    assert!(matches!(err, StoryError::EditInProgress(0)));
    let err = controller.retry(&mut session).await.unwrap_err();
    assert!(matches!(err, StoryError::EditInProgress(0)));
    assert_eq!(session.conversation().len(), 4);
}

#[tokio::test]
async fn test_cancel_never_mutates() {
    let controller = controller(idle_completion(), idle_narration());
    let mut session = long_session();
    let before = contents(&session);

    controller.edit(&mut session, 2).expect("failed to edit");
    controller.cancel(&mut session).expect("failed to cancel");

    assert_eq!(session.state(), EditState::Idle);
    assert_eq!(session.edit_cursor(), None);
    assert_eq!(contents(&session), before);
    assert_eq!(session.conversation().archive().len(), 2);
}

#[tokio::test]
async fn test_not_editing() {
    let controller = controller(idle_completion(), idle_narration());
    let mut session = rome_session();

    assert!(matches!(
        controller.cancel(&mut session).unwrap_err(),
        StoryError::NotEditing
    ));
    assert!(matches!(
        controller.confirm(&mut session, "Egypt").await.unwrap_err(),
        StoryError::NotEditing
    ));
    assert_eq!(session.conversation().turns()[0].content(), "Tell me about Rome");
}

#[tokio::test]
async fn test_regenerate_failure_keeps_truncation() {
    let (completion, _) = completion_with(vec![None, Some("Once upon a time in Egypt...")]);
    let controller = controller(completion, idle_narration());
    let mut session = long_session();

    controller.edit(&mut session, 0).expect("failed to edit");
    let err = controller
        .confirm(&mut session, "Tell me about Egypt")
        .await
        .unwrap_err();

    assert!(err.is_service_failure());
    assert!(err.to_string().contains("connection refused"));
    assert_eq!(
        contents(&session),
        vec![(Role::User, "Tell me about Egypt".to_string())]
    );
    assert_eq!(session.conversation().archive().len(), 2);
    assert_eq!(session.state(), EditState::Editing(0));

    controller
        .confirm(&mut session, "Tell me about Egypt")
        .await
        .expect("failed to regenerate");
    assert_eq!(session.state(), EditState::Idle);
    assert_eq!(session.conversation().len(), 2);
    assert_eq!(session.conversation().archive().len(), 3);
}

#[tokio::test]
async fn test_submit_failure_then_resubmit() {
    let (completion, prompts) = completion_with(vec![None, Some("Hello friend!")]);
    let controller = controller(completion, idle_narration());
    let mut session = Session::new();

    let err = controller.submit(&mut session, "Helo").await.unwrap_err();
    assert!(err.is_service_failure());
    assert_eq!(contents(&session), vec![(Role::User, "Helo".to_string())]);
    assert!(session.conversation().archive().is_empty());

    controller
        .submit(&mut session, "Hello")
        .await
        .expect("failed to submit");
    assert_eq!(
        contents(&session),
        vec![
            (Role::User, "Hello".to_string()),
            (Role::Assistant, "Hello friend!".to_string()),
        ]
    );
    assert_eq!(prompts.lock().unwrap()[1].turns().len(), 1);
}

#[tokio::test]
async fn test_retry() {
    let (completion, _) = completion_with(vec![None, Some("Once upon a time...")]);
    let controller = controller(completion, idle_narration());
    let mut session = rome_session();

    assert!(matches!(
        controller.retry(&mut session).await.unwrap_err(),
        StoryError::NothingToRetry
    ));

    controller
        .submit(&mut session, "Another one")
        .await
        .unwrap_err();
    let reply = controller
        .retry(&mut session)
        .await
        .expect("failed to retry");

    assert_eq!(reply, "Once upon a time...");
    assert_eq!(session.conversation().len(), 4);
    assert!(session.conversation().is_alternating());
    assert_eq!(session.conversation().archive().len(), 2);
}

#[tokio::test]
async fn test_retry_after_cancelled_regenerate() {
    let (completion, prompts) =
        completion_with(vec![None, Some("Once upon a time in Egypt...")]);
    let controller = controller(completion, idle_narration());
    let mut session = long_session();

    controller.edit(&mut session, 0).expect("failed to edit");
    controller
        .confirm(&mut session, "Tell me about Egypt")
        .await
        .unwrap_err();
    assert_eq!(session.pending(), Some(Instruction::Regenerate));

    controller.cancel(&mut session).expect("failed to cancel");
    assert_eq!(session.state(), EditState::Idle);
    assert!(session.conversation().is_awaiting_reply());

    controller
        .retry(&mut session)
        .await
        .expect("failed to retry");

    let prompts = prompts.lock().unwrap();
    assert_eq!(prompts.len(), 2);
    assert_eq!(
        prompts[1].instruction(),
        StoryConfig::default().regenerate_prompt
    );
    assert_eq!(session.pending(), None);
    assert!(session.conversation().is_alternating());
}

#[tokio::test]
async fn test_retry_after_failed_submit_tells_a_story() {
    let (completion, prompts) = completion_with(vec![None, Some("Once upon a time...")]);
    let controller = controller(completion, idle_narration());
    let mut session = rome_session();

    controller
        .submit(&mut session, "Another one")
        .await
        .unwrap_err();
    assert_eq!(session.pending(), Some(Instruction::Story));

    controller
        .retry(&mut session)
        .await
        .expect("failed to retry");
    assert_eq!(
        prompts.lock().unwrap()[1].instruction(),
        StoryConfig::default().system_prompt
    );
    assert_eq!(session.pending(), None);
}

#[tokio::test]
async fn test_listen() {
    let mut narration = MockNarration::new();
    narration
        .expect_synthesize()
        .times(1)
        .returning(|text| Box::pin(async move { Ok(text.into_bytes()) }));
    let controller = controller(idle_completion(), narration);
    let session = rome_session();

    let audio = controller
        .listen(&session, 1)
        .await
        .expect("failed to narrate");
    assert_eq!(audio, b"Once upon a time in Rome...".to_vec());

    let err = controller.listen(&session, 0).await.unwrap_err();
    assert!(matches!(err, StoryError::InvalidIndex(0)));
    let err = controller.listen(&session, 9).await.unwrap_err();
    assert!(matches!(err, StoryError::InvalidIndex(9)));
}

#[tokio::test]
async fn test_listen_failure() {
    let mut narration = MockNarration::new();
    narration
        .expect_synthesize()
        .returning(|_| Box::pin(async move { Err(eyre::eyre!("invalid api key")) }));
    let controller = controller(idle_completion(), narration);
    let session = rome_session();

    let err = controller.listen(&session, 1).await.unwrap_err();
    assert!(err.is_service_failure());
    assert_eq!(session.conversation().len(), 2);
}

#[tokio::test]
async fn test_dispatch_keeps_roles_alternating() {
    let (completion, _) = completion_with(vec![
        Some("Once upon a time in Rome..."),
        Some("Long ago, a pharaoh..."),
        None,
        Some("Once upon a time in Egypt..."),
        Some("Once upon a time on the Nile..."),
    ]);
    let mut narration = MockNarration::new();
    narration
        .expect_synthesize()
        .returning(|_| Box::pin(async move { Ok(vec![1, 2, 3]) }));
    let controller = controller(completion, narration);
    let mut session = Session::new();

    let actions = vec![
        Action::Submit("Tell me about Rome".to_string()),
        Action::Submit("And Egypt?".to_string()),
        Action::Edit(2),
        Action::Cancel,
        Action::Edit(0),
        Action::Confirm("Tell me about Egypt".to_string()),
        Action::Confirm("Tell me about Egypt".to_string()),
        Action::Listen(1),
        Action::Submit("And the Nile?".to_string()),
    ];

    let mut results = vec![];
    for action in actions {
        results.push(controller.dispatch(&mut session, action).await);
        assert!(session.conversation().is_alternating());
        if let Some(index) = session.edit_cursor() {
            assert!(session.conversation().get(index).unwrap().is_user());
        }
    }

    assert!(matches!(results[0], Ok(Outcome::Reply(_))));
    assert!(matches!(results[2], Ok(Outcome::Updated)));
    assert!(matches!(results[5], Err(StoryError::ServiceFailure(_))));
    assert_eq!(
        results[6].as_ref().unwrap(),
        &Outcome::Reply("Once upon a time in Egypt...".to_string())
    );
    assert_eq!(results[7].as_ref().unwrap(), &Outcome::Audio(vec![1, 2, 3]));

    assert_eq!(
        contents(&session),
        vec![
            (Role::User, "Tell me about Egypt".to_string()),
            (Role::Assistant, "Once upon a time in Egypt...".to_string()),
            (Role::User, "And the Nile?".to_string()),
            (Role::Assistant, "Once upon a time on the Nile...".to_string()),
        ]
    );
    assert_eq!(session.conversation().archive().len(), 4);
    assert_eq!(session.state(), EditState::Idle);
}
