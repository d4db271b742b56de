//! Chat service composition tests

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use dobbs_assistant::application::chat::{ChatService, FallbackResponder, StaticFallback, FALLBACK_ANSWER};
use dobbs_assistant::core::knowledge::{Entry, KnowledgeBase};
use dobbs_assistant::domain::{ChatResponse, ReplySource};
use dobbs_assistant::infrastructure::logger;

/// Fallback that records every call
#[derive(Default)]
struct RecordingFallback {
    calls: Mutex<Vec<(String, bool)>>,
}

#[async_trait]
impl FallbackResponder for RecordingFallback {
    async fn respond(&self, message: &str, scheduling_intent: bool) -> String {
        self.calls
            .lock()
            .unwrap()
            .push((message.to_string(), scheduling_intent));
        "recorded".to_string()
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

#[tokio::test]
async fn test_knowledge_base_answer_without_intent() {
    common::setup();
    let service = ChatService::new(common::builtin_kb(), Arc::new(StaticFallback));

    let reply = service.handle("what are your hours").await;

    assert_eq!(reply.source, ReplySource::KnowledgeBase);
    assert!(reply.answer.starts_with("Most Dobbs locations are open"));
    assert!(!reply.is_scheduling_intent);
    assert!(reply.intent.is_none());
    assert_eq!(reply.metadata["score"], 0.375);
}

#[tokio::test]
async fn test_knowledge_base_answer_with_intent() {
    let service = ChatService::new(common::builtin_kb(), Arc::new(StaticFallback));

    let reply = service.handle("Book an appointment").await;

    assert_eq!(reply.source, ReplySource::KnowledgeBase);
    assert_eq!(reply.metadata["question"], "How do I schedule an appointment?");
    assert!(reply.is_scheduling_intent);
    assert_eq!(reply.intent.as_deref(), Some("schedule"));
}

#[tokio::test]
async fn test_intent_is_independent_of_matched_entry() {
    let kb = KnowledgeBase::new(vec![Entry::new("Brakes?", "We fix brakes.", &["brake"])]).unwrap();
    let service = ChatService::new(Arc::new(kb), Arc::new(StaticFallback));

    let reply = service.handle("book a brake job").await;
    assert_eq!(reply.answer, "We fix brakes.");
    assert!(reply.is_scheduling_intent);
}

#[tokio::test]
async fn test_fallback_receives_original_message_and_flag() {
    let kb = KnowledgeBase::new(vec![Entry::new("Hours?", "7 to 6", &["hours"])]).unwrap();
    let fallback = Arc::new(RecordingFallback::default());
    let service = ChatService::new(Arc::new(kb), fallback.clone());

    let booking = service.handle("Please BOOK me in for Tuesday").await;
    let plain = service.handle("xyz").await;

    assert_eq!(booking.answer, "recorded");
    assert!(booking.is_scheduling_intent);
    assert_eq!(plain.source, ReplySource::Fallback);
    assert!(!plain.is_scheduling_intent);

    let calls = fallback.calls.lock().unwrap();
    assert_eq!(
        *calls,
        vec![
            ("Please BOOK me in for Tuesday".to_string(), true),
            ("xyz".to_string(), false),
        ]
    );
}

#[tokio::test]
async fn test_fallback_not_called_on_match() {
    let fallback = Arc::new(RecordingFallback::default());
    let service = ChatService::new(common::builtin_kb(), fallback.clone());

    service.handle("my brakes are squeaking").await;
    assert!(fallback.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_threshold_is_configurable() {
    let query = "I need to schedule an appointment for an oil change";

    let default = ChatService::new(common::builtin_kb(), Arc::new(StaticFallback));
    let reply = default.handle(query).await;
    assert_eq!(reply.answer, FALLBACK_ANSWER);
    assert!(reply.is_scheduling_intent);

    let lowered = ChatService::new(common::builtin_kb(), Arc::new(StaticFallback)).with_threshold(0.25);
    let reply = lowered.handle(query).await;
    assert_eq!(reply.metadata["question"], "How do I schedule an appointment?");
    assert!(reply.is_scheduling_intent);
}

#[tokio::test]
async fn test_reply_converts_to_wire_response() {
    let service = ChatService::new(common::builtin_kb(), Arc::new(StaticFallback));
    let response: ChatResponse = service.handle("xyz").await.into();

    assert_eq!(response.text, FALLBACK_ANSWER);
    assert_eq!(response.answer.as_deref(), Some(FALLBACK_ANSWER));
    assert!(response.should_speak);
    assert_eq!(response.metadata["source"], "fallback");
}

#[test]
fn test_shared_setup_installs_the_service_logger() {
    common::setup();
    common::setup();

    // the subscriber is already in place
    assert!(!logger::try_init());
}
