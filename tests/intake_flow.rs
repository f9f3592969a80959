//! End-to-end intake flows through the application layer.

use std::io::Write;
use std::sync::Arc;

use symptom_triage::adapters::ai::MockAIProvider;
use symptom_triage::adapters::memory::InMemoryChatRepository;
use symptom_triage::application::handlers::chat::{
    SendMessageCommand, SendMessageHandler, StartChatCommand, StartChatHandler,
};
use symptom_triage::application::DiagnosisGenerator;
use symptom_triage::config::IntakeConfig;
use symptom_triage::domain::foundation::{ChatId, UserId};
use symptom_triage::domain::intake::{
    ChatMessage, IntakeState, QuestionSequencer, Sender, DEFAULT_QUESTIONS,
};
use symptom_triage::ports::ChatRepository;

fn user() -> UserId {
    UserId::new("patient-1").unwrap()
}

fn say(chat_id: ChatId, text: &str) -> SendMessageCommand {
    SendMessageCommand {
        user_id: user(),
        chat_id,
        sender: Sender::User,
        text: text.to_string(),
        timestamp: None,
    }
}

async fn new_chat(chats: &Arc<InMemoryChatRepository>) -> ChatId {
    let chat = StartChatHandler::new(chats.clone())
        .handle(StartChatCommand {
            user_id: user(),
            title: None,
        })
        .await
        .unwrap();
    *chat.id()
}

#[tokio::test]
async fn yaml_question_list_drives_the_conversation() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "questions:\n  - Where does it hurt?\n  - Since when?").unwrap();
    let questions = IntakeConfig {
        questions_file: Some(file.path().to_path_buf()),
    }
    .load_questions()
    .unwrap();

    let chats = Arc::new(InMemoryChatRepository::new());
    let provider = MockAIProvider::new().with_response("Likely a sprain.");
    let handler = SendMessageHandler::new(
        chats.clone(),
        QuestionSequencer::new(Arc::new(questions)),
        DiagnosisGenerator::new(Arc::new(provider.clone())),
    );
    let chat_id = new_chat(&chats).await;

    let first = handler.handle(say(chat_id, "my ankle")).await.unwrap();
    assert_eq!(first.bot_message.text(), "Where does it hurt?");
    assert_eq!(first.state, IntakeState::Collecting { asked: 1, total: 2 });

    let second = handler.handle(say(chat_id, "left ankle")).await.unwrap();
    assert_eq!(second.bot_message.text(), "Since when?");
    assert!(second.state.is_concluded());

    let report = handler.handle(say(chat_id, "yesterday")).await.unwrap();
    assert_eq!(report.bot_message.text(), "Likely a sprain.");

    let prompt = provider.get_calls()[0].messages[0].content.clone();
    assert!(prompt.contains("Patient reported symptoms: my ankle"));
    assert!(prompt.contains("Where does it hurt? left ankle\nSince when? yesterday"));
}

#[tokio::test]
async fn non_alternating_history_pairs_positionally() {
    let chats = Arc::new(InMemoryChatRepository::new());
    let provider = MockAIProvider::new();
    let handler = SendMessageHandler::new(
        chats.clone(),
        QuestionSequencer::new(Arc::new(Default::default())),
        DiagnosisGenerator::new(Arc::new(provider.clone())),
    );
    let chat_id = new_chat(&chats).await;

    // Two bot messages in a row, the second injected out of band.
    handler.handle(say(chat_id, "fever")).await.unwrap();
    chats
        .append_message(&chat_id, &ChatMessage::bot(DEFAULT_QUESTIONS[1]))
        .await
        .unwrap();
    for text in ["cough", "no", "no"] {
        handler.handle(say(chat_id, text)).await.unwrap();
    }

    assert_eq!(provider.call_count(), 1);
    let prompt = provider.get_calls()[0].messages[0].content.clone();
    assert!(prompt.contains(&format!(
        "{} {}",
        DEFAULT_QUESTIONS[0], DEFAULT_QUESTIONS[1]
    )));
    assert!(prompt.contains(&format!("{} cough", DEFAULT_QUESTIONS[1])));
}

#[tokio::test]
async fn concurrent_chats_do_not_interfere() {
    let chats = Arc::new(InMemoryChatRepository::new());
    let handler = Arc::new(SendMessageHandler::new(
        chats.clone(),
        QuestionSequencer::new(Arc::new(Default::default())),
        DiagnosisGenerator::new(Arc::new(MockAIProvider::new())),
    ));

    let mut ids = Vec::new();
    for _ in 0..8 {
        ids.push(new_chat(&chats).await);
    }

    let mut tasks = Vec::new();
    for id in ids.clone() {
        let handler = handler.clone();
        tasks.push(tokio::spawn(async move {
            for text in ["fever", "2 days", "none", "no", "no"] {
                handler.handle(say(id, text)).await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for id in ids {
        let history = chats.read_all(&id).await.unwrap();
        assert_eq!(history.len(), 10);
        assert!(history
            .iter()
            .enumerate()
            .all(|(i, m)| m.is_from_user() == (i % 2 == 0)));
    }
}
