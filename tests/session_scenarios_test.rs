use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use testcase_gen::core::{ModelLoader, TextGenerator};
use testcase_gen::{GenerationError, ModelService, Outcome, PromptBuilder, SessionController};

const LOGIN_STORY: &str = "As a user, I should be able to log in using email and password.";

/// 回傳固定結果並記錄呼叫次數的後端替身
struct StubModel {
    reply: Result<String, String>,
    generations: Arc<AtomicUsize>,
}

#[async_trait]
impl TextGenerator for StubModel {
    async fn generate(&self, prompt: &str, max_new_tokens: usize) -> Result<String, GenerationError> {
        self.generations.fetch_add(1, Ordering::SeqCst);
        assert_eq!(prompt, PromptBuilder::build(LOGIN_STORY));
        assert_eq!(max_new_tokens, 700);
        self.reply.clone().map_err(GenerationError::Runtime)
    }
}

struct StubLoader {
    reply: Result<String, String>,
    loads: Arc<AtomicUsize>,
    generations: Arc<AtomicUsize>,
}

#[async_trait]
impl ModelLoader for StubLoader {
    type Model = StubModel;

    fn model_id(&self) -> &str {
        "google/flan-t5-large"
    }

    async fn load(&self) -> Result<StubModel, GenerationError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(StubModel {
            reply: self.reply.clone(),
            generations: self.generations.clone(),
        })
    }
}

struct Harness {
    session: SessionController<StubLoader>,
    loads: Arc<AtomicUsize>,
    generations: Arc<AtomicUsize>,
}

fn harness(reply: Result<&str, &str>) -> Harness {
    let loads = Arc::new(AtomicUsize::new(0));
    let generations = Arc::new(AtomicUsize::new(0));
    let loader = StubLoader {
        reply: reply.map(str::to_string).map_err(str::to_string),
        loads: loads.clone(),
        generations: generations.clone(),
    };
    Harness {
        session: SessionController::new(Arc::new(ModelService::new(loader))),
        loads,
        generations,
    }
}

#[tokio::test]
async fn test_login_story_succeeds() {
    let mut h = harness(Ok("Scenario 1: ..."));

    let outcome = h.session.handle_request(LOGIN_STORY).await;

    assert_eq!(outcome, Outcome::Success("Scenario 1: ...".to_string()));
    assert_eq!(h.generations.load(Ordering::SeqCst), 1);
    assert_eq!(h.session.export().unwrap().content, "Scenario 1: ...");
}

#[tokio::test]
async fn test_empty_input_is_warning_and_model_untouched() {
    let mut h = harness(Ok("Scenario 1: ..."));

    let outcome = h.session.handle_request("").await;

    assert!(matches!(outcome, Outcome::ValidationWarning(_)));
    assert_eq!(h.loads.load(Ordering::SeqCst), 0);
    assert_eq!(h.generations.load(Ordering::SeqCst), 0);
    assert!(h.session.export().is_none());
}

#[tokio::test]
async fn test_oom_is_reported_as_failure() {
    let mut h = harness(Err("OOM"));

    let outcome = h.session.handle_request(LOGIN_STORY).await;

    match outcome {
        Outcome::Failure(message) => assert!(message.contains("OOM")),
        other => panic!("expected failure, got {:?}", other),
    }

    // 同一個 handle 可繼續服務
    let _ = h.session.handle_request(LOGIN_STORY).await;
    assert_eq!(h.loads.load(Ordering::SeqCst), 1);
    assert_eq!(h.generations.load(Ordering::SeqCst), 2);
}
