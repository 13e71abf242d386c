//! mentor-core: answer resolution for the mentor support chatbot.
//!
//! A message is matched against a read-only knowledge base first; only on a miss is the
//! optional generative model consulted, and a canned apology covers every model failure.

mod error;
mod knowledge;
mod orchestrator;
mod shared;

pub use error::{KnowledgeError, ModelError};

pub use shared::{gemini_api_key, CoreConfig, API_VERSION, GEMINI_API_KEY_ENV};

pub use knowledge::{
    bundled_knowledge_base, find_answer, format_term, load_knowledge_base, normalize, KnowledgeBase,
    KnowledgeMatch, MatchTier, QuestionEntry, TermEntry, CAPABILITIES_ANSWER, CAPABILITY_PHRASES,
    GREETING_WORDS,
};

pub use orchestrator::{
    build_prompt, AnswerSource, FallbackOutcome, FallbackResponder, ModelClient, Orchestrator,
    RandomSource, Resolution, ThreadRandom, FALLBACK_RESPONSES,
};
