//! Static knowledge base and the tiered matcher that reads it.
//!
//! | Tier | Rule                                                  |
//! |------|-------------------------------------------------------|
//! | 1    | Greeting word in a message of fewer than 4 tokens     |
//! | 2    | "What can you do" phrase anywhere in the message      |
//! | 3    | Glossary term as a substring (first term wins)        |
//! | 4    | Stored question with the largest word overlap         |

mod bootstrap;
mod matcher;
mod normalize;
mod store;

pub use bootstrap::{bundled_knowledge_base, load_knowledge_base};
pub use matcher::{
    find_answer, format_term, KnowledgeMatch, MatchTier, CAPABILITIES_ANSWER, CAPABILITY_PHRASES,
    GREETING_WORDS,
};
pub use normalize::normalize;
pub use store::{KnowledgeBase, QuestionEntry, TermEntry};
