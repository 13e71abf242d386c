//! Axum-based gateway for the mentor support chatbot. Config-driven via CoreConfig.

mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use mentor_core::{
    gemini_api_key, load_knowledge_base, CoreConfig, FallbackResponder, KnowledgeBase, Orchestrator,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) orchestrator: Arc<Orchestrator>,
}

/// Wires the knowledge base and the (optional) model into the request orchestrator.
fn build_orchestrator(config: &CoreConfig, knowledge: KnowledgeBase) -> Orchestrator {
    let model = mentor_skills::route_model(config, gemini_api_key());
    let responder = FallbackResponder::new(
        model,
        config.app_name.clone(),
        knowledge.context().to_vec(),
        config.model_timeout(),
    );
    Orchestrator::new(Arc::new(knowledge), responder)
}

fn build_app(state: AppState) -> Router {
    // Widget is embedded on arbitrary intranet pages: any origin, method and header.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::status::root))
        .route("/health", get(handlers::status::health))
        .route("/chat", post(handlers::chat::chat))
        .with_state(state)
        .layer(cors)
}

/// Pre-flight check: config loads, knowledge base validates, port is available.
fn run_verify() -> Result<(), String> {
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    print!("Checking knowledge base... ");
    let knowledge = load_knowledge_base(&config).map_err(|e| format!("Knowledge base invalid: {}", e))?;
    println!(
        "OK ({} terms, {} questions)",
        knowledge.terms().len(),
        knowledge.questions().len()
    );

    print!("Checking model... ");
    match mentor_skills::route_model(&config, gemini_api_key()) {
        Some(model) => println!("OK ({})", model.name()),
        None => println!("DISABLED (static fallback only)"),
    }

    let addr = config.bind_addr();
    print!("Checking {}... ", addr);
    match std::net::TcpListener::bind(&addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => return Err(format!("{} BLOCKED: {}", addr, e)),
    }

    println!("\nSUCCESS: ready to start gateway.");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[mentor-gateway] .env not loaded: {} (using system environment)", e);
    }

    if std::env::args().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match CoreConfig::load() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            tracing::error!("Config load failed: {}", e);
            std::process::exit(1);
        }
    };

    let knowledge = match load_knowledge_base(&config) {
        Ok(kb) => kb,
        Err(e) => {
            tracing::error!("Knowledge base load failed: {}", e);
            std::process::exit(1);
        }
    };

    let orchestrator = Arc::new(build_orchestrator(&config, knowledge));
    tracing::info!(
        gemini_available = orchestrator.model_available(),
        entries = orchestrator.knowledge().entry_count(),
        "Orchestrator ready"
    );

    let app = build_app(AppState {
        config: Arc::clone(&config),
        orchestrator,
    });

    let addr = config.bind_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("mentor-gateway listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use mentor_core::{
        bundled_knowledge_base, ModelClient, ModelError, RandomSource, FALLBACK_RESPONSES,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    struct FixedIndex(usize);

    impl RandomSource for FixedIndex {
        fn pick(&self, _len: usize) -> usize {
            self.0
        }
    }

    struct ScriptedModel {
        reply: Result<&'static str, ()>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl ModelClient for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .map_err(|_| ModelError::Request("connection reset".to_string()))
        }
    }

    fn test_config() -> CoreConfig {
        CoreConfig {
            app_name: "Test Company".to_string(),
            ..CoreConfig::default()
        }
    }

    fn app_with(knowledge: KnowledgeBase, model: Option<Arc<dyn ModelClient>>) -> Router {
        let config = test_config();
        let responder = FallbackResponder::new(
            model,
            config.app_name.clone(),
            knowledge.context().to_vec(),
            Duration::from_secs(1),
        )
        .with_random(Arc::new(FixedIndex(1)));
        build_app(AppState {
            config: Arc::new(config),
            orchestrator: Arc::new(Orchestrator::new(Arc::new(knowledge), responder)),
        })
    }

    async fn post_chat(app: Router, text: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "text": text }).to_string()))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(app: Router, uri: &str) -> serde_json::Value {
        let req = Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_chat_greeting_returns_default() {
        let kb = bundled_knowledge_base().unwrap();
        let greeting = kb.greeting().to_string();
        let (status, json) = post_chat(app_with(kb, None), "Привет!").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], greeting);
    }

    #[tokio::test]
    async fn test_chat_term_is_formatted() {
        let kb = bundled_knowledge_base().unwrap();
        let definition = kb.terms().iter().find(|t| t.term == "ос").unwrap().definition.clone();
        let (_, json) = post_chat(app_with(kb, None), "Напомни, что значит ОС").await;
        assert_eq!(json["response"], format!("📚 ОС: {}", definition));
    }

    #[tokio::test]
    async fn test_chat_capabilities() {
        let (_, json) = post_chat(app_with(bundled_knowledge_base().unwrap(), None), "Что ты умеешь?").await;
        assert_eq!(json["response"], mentor_core::CAPABILITIES_ANSWER);
    }

    #[tokio::test]
    async fn test_chat_miss_without_model_returns_fallback() {
        let (status, json) = post_chat(app_with(bundled_knowledge_base().unwrap(), None), "погода завтра").await;
        assert_eq!(status, StatusCode::OK);
        let response = json["response"].as_str().unwrap();
        assert!(FALLBACK_RESPONSES.contains(&response));
        assert_eq!(response, FALLBACK_RESPONSES[1]);
    }

    #[tokio::test]
    async fn test_chat_miss_with_model_returns_model_text() {
        let model = Arc::new(ScriptedModel {
            reply: Ok("Ответ от модели"),
            calls: AtomicUsize::new(0),
        });
        let app = app_with(bundled_knowledge_base().unwrap(), Some(model.clone()));
        let (_, json) = post_chat(app.clone(), "погода завтра").await;
        assert_eq!(json["response"], "Ответ от модели");

        // Knowledge base answers never reach the model.
        let (_, json) = post_chat(app, "hi").await;
        assert_ne!(json["response"], "Ответ от модели");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chat_model_failure_is_still_200() {
        let model = Arc::new(ScriptedModel {
            reply: Err(()),
            calls: AtomicUsize::new(0),
        });
        let (status, json) = post_chat(app_with(bundled_knowledge_base().unwrap(), Some(model)), "погода завтра").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["response"], FALLBACK_RESPONSES[1]);
    }

    #[tokio::test]
    async fn test_chat_malformed_body_is_rejected() {
        let app = app_with(KnowledgeBase::empty("hi"), None);
        let req = Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message":"no text field"}"#))
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert!(res.status().is_client_error());
    }

    #[tokio::test]
    async fn test_health_reports_model_and_entries() {
        let kb = bundled_knowledge_base().unwrap();
        let entries = kb.entry_count();
        let model: Arc<dyn ModelClient> = Arc::new(ScriptedModel {
            reply: Ok("x"),
            calls: AtomicUsize::new(0),
        });
        let json = get_json(app_with(kb, Some(model)), "/health").await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["gemini_available"], true);
        assert_eq!(json["knowledge_base_entries"], entries);
    }

    #[tokio::test]
    async fn test_health_empty_knowledge_base() {
        let json = get_json(app_with(KnowledgeBase::empty("hi"), None), "/health").await;
        assert_eq!(json["gemini_available"], false);
        assert_eq!(json["knowledge_base_entries"], 0);
    }

    #[tokio::test]
    async fn test_root_banner() {
        let json = get_json(app_with(KnowledgeBase::empty("hi"), None), "/").await;
        assert_eq!(json["message"], "Chat API for Test Company is running");
        assert_eq!(json["version"], "1.0");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let app = app_with(KnowledgeBase::empty("hi"), None);
        let req = Request::builder()
            .method("GET")
            .uri("/health")
            .header("origin", "https://intranet.example.com")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(
            res.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
