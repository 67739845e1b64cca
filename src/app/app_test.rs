use std::sync::Arc;

use ratatui::backend::TestBackend;
use tui_textarea::Input;

use super::*;
use crate::backend::{MockCompletion, MockNarration};
use crate::app::ui::NoticeLevel;
use crate::models::Role;

fn completion_with(replies: Vec<Option<&'static str>>) -> MockCompletion {
    let mut replies = replies.into_iter();
    let mut completion = MockCompletion::new();
    completion.expect_generate().returning(move |_| {
        let reply = replies.next().expect("unexpected completion request");
        Box::pin(async move {
            match reply {
                Some(text) => Ok(text.to_string()),
                None => Err(eyre::eyre!("connection refused")),
            }
        })
    });
    completion
}

fn app(completion: MockCompletion, narration: MockNarration, output_dir: &str) -> App {
    let controller = Controller::new(Arc::new(completion), Arc::new(narration));
    let narration = NarrationConfig {
        output_dir: output_dir.to_string(),
        ..Default::default()
    };
    App::new(controller, narration)
}

fn key(key: Key) -> Event {
    Event::KeyboardCharInput(Input {
        key,
        ..Default::default()
    })
}

fn ctrl(c: char) -> Event {
    Event::KeyboardCharInput(Input {
        key: Key::Char(c),
        ctrl: true,
        ..Default::default()
    })
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        assert_eq!(app.handle_event(key(Key::Char(c))), Flow::Continue);
    }
}

// Empty the edit box: cursor to the line head, then delete to its end.
fn clear_line(app: &mut App) {
    app.handle_event(key(Key::Home));
    app.handle_event(ctrl('k'));
}

/// Handle one event and run the action it produced, if any.
async fn press(app: &mut App, event: Event) -> Flow {
    let flow = app.handle_event(event);
    if let Flow::Dispatch(action) = &flow {
        app.perform(action.clone()).await;
    }
    flow
}

#[tokio::test]
async fn test_tell_and_edit() {
    let completion = completion_with(vec![
        Some("Once upon a time in Rome..."),
        Some("Once upon a time in Egypt..."),
    ]);
    let mut app = app(completion, MockNarration::new(), "/tmp/storyteller");

    type_text(&mut app, "Tell me about Rome");
    assert_eq!(
        press(&mut app, Event::KeyboardEnter).await,
        Flow::Dispatch(Action::Submit("Tell me about Rome".to_string()))
    );
    assert_eq!(app.session().conversation().len(), 2);
    assert!(app.screen().input.is_empty());

    assert_eq!(
        press(&mut app, Event::KeyboardCtrlE).await,
        Flow::Dispatch(Action::Edit(0))
    );
    assert_eq!(app.screen().edit_box.index(), Some(0));
    assert_eq!(app.screen().edit_box.text(), "Tell me about Rome");

    clear_line(&mut app);
    type_text(&mut app, "Tell me about Egypt");
    assert_eq!(
        press(&mut app, Event::KeyboardEnter).await,
        Flow::Dispatch(Action::Confirm("Tell me about Egypt".to_string()))
    );

    let convo = app.session().conversation();
    assert_eq!(convo.len(), 2);
    assert_eq!(convo.turns()[0].content(), "Tell me about Egypt");
    assert_eq!(convo.turns()[1].role(), Role::Assistant);
    assert_eq!(convo.turns()[1].content(), "Once upon a time in Egypt...");
    assert_eq!(convo.archive().len(), 2);
    assert!(!app.session().is_editing());
    assert_eq!(app.screen().edit_box.index(), None);
}

#[tokio::test]
async fn test_empty_edit_keeps_query() {
    let completion = completion_with(vec![
        Some("Once upon a time in Rome..."),
        Some("Another time in Rome..."),
    ]);
    let mut app = app(completion, MockNarration::new(), "/tmp/storyteller");

    type_text(&mut app, "Tell me about Rome");
    press(&mut app, Event::KeyboardEnter).await;
    press(&mut app, Event::KeyboardCtrlE).await;
    clear_line(&mut app);
    assert_eq!(app.screen().edit_box.text(), "");

    assert_eq!(
        press(&mut app, Event::KeyboardEnter).await,
        Flow::Dispatch(Action::Confirm("Tell me about Rome".to_string()))
    );
    assert_eq!(
        app.session().conversation().turns()[1].content(),
        "Another time in Rome..."
    );
}

#[tokio::test]
async fn test_slash_text_is_plain_text() {
    let completion = completion_with(vec![Some("Once upon a time...")]);
    let mut app = app(completion, MockNarration::new(), "/tmp/storyteller");

    type_text(&mut app, "/edit 0 foo");
    assert_eq!(
        press(&mut app, Event::KeyboardEnter).await,
        Flow::Dispatch(Action::Submit("/edit 0 foo".to_string()))
    );
    assert_eq!(app.session().conversation().turns()[0].content(), "/edit 0 foo");

    press(&mut app, Event::KeyboardCtrlE).await;
    clear_line(&mut app);
    type_text(&mut app, "/cancel");
    assert_eq!(
        app.handle_event(Event::KeyboardEnter),
        Flow::Dispatch(Action::Confirm("/cancel".to_string()))
    );
}

#[tokio::test]
async fn test_errors_are_reported() {
    let completion = completion_with(vec![Some("Once upon a time..."), None]);
    let mut app = app(completion, MockNarration::new(), "/tmp/storyteller");

    type_text(&mut app, "Hello");
    press(&mut app, Event::KeyboardEnter).await;

    // The story turn is selected, which is not an editable query.
    app.handle_event(Event::UiScrollUp);
    assert_eq!(app.screen().selected, Some(1));
    press(&mut app, Event::KeyboardCtrlE).await;
    let notice = app.screen().notice.clone().expect("no notice");
    assert_eq!(notice.level(), NoticeLevel::Error);
    assert_eq!(notice.message(), "turn 1 does not exist or has the wrong role");
    assert!(!app.session().is_editing());

    type_text(&mut app, "Another one");
    press(&mut app, Event::KeyboardEnter).await;
    let notice = app.screen().notice.clone().expect("no notice");
    assert_eq!(notice.message(), "service failure: connection refused");
    assert!(app.session().conversation().is_awaiting_reply());
    assert_eq!(app.session().conversation().archive().len(), 1);

    // Any key drops the notice.
    app.handle_event(key(Key::Char('a')));
    assert_eq!(app.screen().notice, None);
}

#[tokio::test]
async fn test_retry_key() {
    let completion = completion_with(vec![None, Some("Once upon a time...")]);
    let mut app = app(completion, MockNarration::new(), "/tmp/storyteller");

    type_text(&mut app, "Tell me a story");
    press(&mut app, Event::KeyboardEnter).await;
    assert!(app.session().conversation().is_awaiting_reply());

    assert_eq!(
        press(&mut app, Event::KeyboardCtrlR).await,
        Flow::Dispatch(Action::Retry)
    );
    assert!(app.session().conversation().is_alternating());
    assert_eq!(app.session().conversation().archive().len(), 1);
}

#[tokio::test]
async fn test_cancel_edit() {
    let completion = completion_with(vec![Some("Once upon a time...")]);
    let mut app = app(completion, MockNarration::new(), "/tmp/storyteller");

    type_text(&mut app, "Tell me a story");
    press(&mut app, Event::KeyboardEnter).await;
    press(&mut app, Event::KeyboardCtrlE).await;
    type_text(&mut app, " about dragons");

    assert_eq!(
        press(&mut app, Event::KeyboardEsc).await,
        Flow::Dispatch(Action::Cancel)
    );

    let session = app.session();
    assert!(!session.is_editing());
    assert_eq!(session.conversation().turns()[0].content(), "Tell me a story");
    assert_eq!(session.conversation().archive().len(), 1);
    assert_eq!(app.screen().edit_box.index(), None);
}

#[tokio::test]
async fn test_input_disabled_while_editing() {
    let completion = completion_with(vec![Some("Once upon a time...")]);
    let mut app = app(completion, MockNarration::new(), "/tmp/storyteller");

    type_text(&mut app, "Tell me a story");
    press(&mut app, Event::KeyboardEnter).await;
    press(&mut app, Event::KeyboardCtrlE).await;

    type_text(&mut app, "!");
    app.handle_event(Event::KeyboardPaste(" Please.".to_string()));
    assert!(app.screen().input.is_empty());
    assert_eq!(app.screen().edit_box.text(), "Tell me a story! Please.");

    // A second edit is refused while this one is open.
    press(&mut app, Event::KeyboardCtrlE).await;
    let notice = app.screen().notice.clone().expect("no notice");
    assert_eq!(notice.message(), "turn 0 is already being edited");
    assert_eq!(app.screen().edit_box.text(), "Tell me a story! Please.");
}

#[tokio::test]
async fn test_listen_saves_audio() {
    let dir = std::env::temp_dir().join(format!("storyteller-{}", uuid::Uuid::new_v4()));

    let completion = completion_with(vec![Some("Once upon a time...")]);
    let mut narration = MockNarration::new();
    narration
        .expect_synthesize()
        .times(1)
        .returning(|_| Box::pin(async move { Ok(b"ID3".to_vec()) }));
    let mut app = app(completion, narration, &dir.to_string_lossy());

    assert_eq!(app.handle_event(Event::KeyboardCtrlL), Flow::Continue);
    assert_eq!(
        app.screen().notice.as_ref().map(|notice| notice.message()),
        Some("No story to listen to yet.")
    );

    type_text(&mut app, "Tell me a story");
    press(&mut app, Event::KeyboardEnter).await;
    assert_eq!(
        press(&mut app, Event::KeyboardCtrlL).await,
        Flow::Dispatch(Action::Listen(1))
    );
    let notice = app.screen().notice.clone().expect("no notice");
    assert_eq!(notice.level(), NoticeLevel::Info);
    assert!(notice.message().contains("Narration saved to"));

    let mut entries = tokio::fs::read_dir(&dir).await.expect("no audio directory");
    let entry = entries
        .next_entry()
        .await
        .unwrap()
        .expect("no audio file written");
    assert_eq!(tokio::fs::read(entry.path()).await.unwrap(), b"ID3".to_vec());

    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn test_history_screen() {
    let completion = completion_with(vec![Some("Once upon a time...")]);
    let mut app = app(completion, MockNarration::new(), "/tmp/storyteller");

    type_text(&mut app, "Tell me a story");
    press(&mut app, Event::KeyboardEnter).await;

    app.handle_event(Event::KeyboardCtrlH);
    assert_eq!(app.screen().history.selected(), Some(0));

    // Keys stay in the popup.
    assert_eq!(app.handle_event(Event::KeyboardEnter), Flow::Continue);
    app.handle_event(key(Key::Char('x')));
    assert!(app.screen().input.is_empty());

    app.handle_event(Event::KeyboardEsc);
    assert!(!app.screen().history.showing());
}

#[tokio::test]
async fn test_render() {
    let completion = completion_with(vec![Some("Once upon a time...")]);
    let mut app = app(completion, MockNarration::new(), "/tmp/storyteller");
    type_text(&mut app, "Tell me a story");
    press(&mut app, Event::KeyboardEnter).await;

    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    app.render(&mut terminal).expect("failed to render");

    let buffer = terminal.backend().buffer();
    let text = buffer
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect::<String>();
    assert!(text.contains("Tell me a story"));
    assert!(text.contains("Once upon a time..."));
}

#[test]
fn test_quit() {
    let mut app = app(
        completion_with(vec![]),
        MockNarration::new(),
        "/tmp/storyteller",
    );
    assert_eq!(app.handle_event(Event::Quit), Flow::Quit);
    assert_eq!(app.handle_event(Event::UiResize), Flow::Continue);
}
