//! Startup loading: configured file on disk, or the document bundled into the binary.

use super::store::KnowledgeBase;
use crate::error::KnowledgeError;
use crate::shared::CoreConfig;

const BUNDLED_KNOWLEDGE_BASE: &str = include_str!("../../data/knowledge_base.json");

/// The knowledge base shipped with the crate.
pub fn bundled_knowledge_base() -> Result<KnowledgeBase, KnowledgeError> {
    KnowledgeBase::from_json_str(BUNDLED_KNOWLEDGE_BASE)
}

/// Loads the knowledge base named by `config.knowledge_base_path`, falling back to the bundled one.
pub fn load_knowledge_base(config: &CoreConfig) -> Result<KnowledgeBase, KnowledgeError> {
    let kb = match config.knowledge_base_path.as_deref() {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading knowledge base from file");
            KnowledgeBase::open_path(path)?
        }
        None => bundled_knowledge_base()?,
    };
    tracing::info!(
        terms = kb.terms().len(),
        questions = kb.questions().len(),
        "Knowledge base ready"
    );
    Ok(kb)
}
