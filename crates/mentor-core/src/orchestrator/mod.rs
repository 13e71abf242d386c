//! Answer resolution: knowledge base first, generative fallback second.

mod fallback;
mod prompt;

pub use fallback::{FallbackOutcome, FallbackResponder, RandomSource, ThreadRandom, FALLBACK_RESPONSES};
pub use prompt::build_prompt;

use crate::error::ModelError;
use crate::knowledge::{find_answer, KnowledgeBase, MatchTier};
use std::fmt;
use std::sync::Arc;

/// Opaque generative model: prompt in, text out, or failure.
#[async_trait::async_trait]
pub trait ModelClient: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    Knowledge(MatchTier),
    Model,
    Fallback,
}

impl fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerSource::Knowledge(tier) => write!(f, "knowledge:{}", tier),
            AnswerSource::Model => f.write_str("model"),
            AnswerSource::Fallback => f.write_str("fallback"),
        }
    }
}

/// Final reply for one chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub text: String,
    pub source: AnswerSource,
}

/// Routes each message through the matcher and, on a miss, the fallback responder.
pub struct Orchestrator {
    knowledge: Arc<KnowledgeBase>,
    responder: FallbackResponder,
}

impl Orchestrator {
    pub fn new(knowledge: Arc<KnowledgeBase>, responder: FallbackResponder) -> Self {
        Self { knowledge, responder }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn model_available(&self) -> bool {
        self.responder.model_available()
    }

    /// Knowledge base answers always win; the model is only consulted on a miss.
    pub async fn resolve(&self, message: &str) -> Resolution {
        if let Some(hit) = find_answer(message, &self.knowledge) {
            return Resolution {
                text: hit.answer,
                source: AnswerSource::Knowledge(hit.tier),
            };
        }

        match self.responder.resolve(message).await {
            FallbackOutcome::Model(text) => Resolution {
                text,
                source: AnswerSource::Model,
            },
            FallbackOutcome::Static(text) => Resolution {
                text,
                source: AnswerSource::Fallback,
            },
        }
    }

    pub async fn handle(&self, message: &str) -> String {
        self.resolve(message).await.text
    }
}
