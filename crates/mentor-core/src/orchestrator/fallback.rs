//! Fallback responder: one model call, then a random canned apology.

use super::prompt::build_prompt;
use super::ModelClient;
use crate::error::ModelError;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Canned replies used when the model is absent, fails, or returns nothing.
pub const FALLBACK_RESPONSES: &[&str] = &[
    "Извините, я не нашел ответа на этот вопрос в базе знаний. Попробуйте переформулировать вопрос или обратитесь к кураторам в бот.",
    "Этот вопрос пока не добавлен в мою базу знаний. Вы можете задать его кураторам через бот.",
    "К сожалению, я не могу ответить на этот вопрос. Обратитесь, пожалуйста, к кураторам для получения помощи.",
];

/// Source of randomness for picking a fallback reply. Injected so tests can pin the choice.
pub trait RandomSource: Send + Sync {
    /// Returns an index in `0..len`. `len` is always at least 1.
    fn pick(&self, len: usize) -> usize;
}

/// Uniform choice from the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// How a fallback reply was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// Model text, returned verbatim.
    Model(String),
    /// Canned reply from [`FALLBACK_RESPONSES`].
    Static(String),
}

impl FallbackOutcome {
    pub fn into_text(self) -> String {
        match self {
            FallbackOutcome::Model(s) | FallbackOutcome::Static(s) => s,
        }
    }
}

/// Calls the model once when one is configured; any failure ends in a static reply.
pub struct FallbackResponder {
    model: Option<Arc<dyn ModelClient>>,
    random: Arc<dyn RandomSource>,
    app_name: String,
    context: Vec<String>,
    timeout: Duration,
}

impl FallbackResponder {
    pub fn new(
        model: Option<Arc<dyn ModelClient>>,
        app_name: impl Into<String>,
        context: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            model,
            random: Arc::new(ThreadRandom),
            app_name: app_name.into(),
            context,
            timeout,
        }
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// True when a model client is configured.
    pub fn model_available(&self) -> bool {
        self.model.is_some()
    }

    pub async fn respond(&self, raw_text: &str) -> String {
        self.resolve(raw_text).await.into_text()
    }

    pub async fn resolve(&self, raw_text: &str) -> FallbackOutcome {
        let Some(model) = self.model.as_ref() else {
            tracing::debug!("No model configured, using static fallback");
            return FallbackOutcome::Static(self.static_reply());
        };

        tracing::info!(model = model.name(), "Using model to generate answer");
        match self.call_model(model.as_ref(), raw_text).await {
            Ok(text) => {
                tracing::info!(model = model.name(), "Model answered");
                FallbackOutcome::Model(text)
            }
            Err(ModelError::Empty) => {
                tracing::warn!(model = model.name(), "Model returned empty text, using static fallback");
                FallbackOutcome::Static(self.static_reply())
            }
            Err(e) => {
                tracing::error!(model = model.name(), error = %e, "Model call failed, using static fallback");
                FallbackOutcome::Static(self.static_reply())
            }
        }
    }

    async fn call_model(&self, model: &dyn ModelClient, raw_text: &str) -> Result<String, ModelError> {
        let prompt = build_prompt(&self.app_name, &self.context, raw_text);
        let text = tokio::time::timeout(self.timeout, model.generate(&prompt))
            .await
            .map_err(|_| ModelError::Timeout(self.timeout))??;
        if text.is_empty() {
            return Err(ModelError::Empty);
        }
        Ok(text)
    }

    fn static_reply(&self) -> String {
        let idx = self.random.pick(FALLBACK_RESPONSES.len()) % FALLBACK_RESPONSES.len();
        FALLBACK_RESPONSES[idx].to_string()
    }
}
