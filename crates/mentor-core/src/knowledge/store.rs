//! Read-only knowledge base: greeting, glossary terms and canned question/answer pairs.

use super::normalize::{is_normalized_key, is_term_key};
use crate::error::KnowledgeError;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// One glossary entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TermEntry {
    pub term: String,
    pub definition: String,
}

/// One canonical question with its answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionEntry {
    pub question: String,
    pub answer: String,
}

/// On-disk shape of the knowledge base JSON.
#[derive(Debug, Deserialize)]
struct KnowledgeDocument {
    greeting: String,
    #[serde(default)]
    context: Vec<String>,
    #[serde(default)]
    terms: Vec<TermEntry>,
    #[serde(default)]
    questions: Vec<QuestionEntry>,
}

/// Immutable knowledge base. Built once at startup, shared behind an `Arc`.
///
/// Terms and questions keep their source order; the matcher relies on it for
/// first-hit and tie-breaking rules.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    greeting: String,
    context: Vec<String>,
    terms: Vec<TermEntry>,
    questions: Vec<QuestionEntry>,
}

impl KnowledgeBase {
    /// Builds a validated knowledge base. Keys must be lower-case, single-spaced and unique
    /// within their category. Term keys must also be free of punctuation.
    pub fn new(
        greeting: impl Into<String>,
        context: Vec<String>,
        terms: Vec<TermEntry>,
        questions: Vec<QuestionEntry>,
    ) -> Result<Self, KnowledgeError> {
        validate_keys("term", terms.iter().map(|t| t.term.as_str()), is_term_key)?;
        validate_keys(
            "question",
            questions.iter().map(|q| q.question.as_str()),
            is_normalized_key,
        )?;
        Ok(Self {
            greeting: greeting.into(),
            context,
            terms,
            questions,
        })
    }

    /// Knowledge base with a greeting only; every non-greeting question falls through.
    pub fn empty(greeting: impl Into<String>) -> Self {
        Self {
            greeting: greeting.into(),
            context: Vec::new(),
            terms: Vec::new(),
            questions: Vec::new(),
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, KnowledgeError> {
        let doc: KnowledgeDocument = serde_json::from_str(json)?;
        Self::new(doc.greeting, doc.context, doc.terms, doc.questions)
    }

    /// Reads and validates a JSON document from disk.
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Static domain context lines embedded in the model prompt.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    pub fn terms(&self) -> &[TermEntry] {
        &self.terms
    }

    pub fn questions(&self) -> &[QuestionEntry] {
        &self.questions
    }

    /// Entry count reported by `/health`: terms plus questions. The greeting is not counted.
    pub fn entry_count(&self) -> usize {
        self.terms.len() + self.questions.len()
    }
}

fn validate_keys<'a>(
    category: &'static str,
    keys: impl Iterator<Item = &'a str>,
    is_valid: fn(&str) -> bool,
) -> Result<(), KnowledgeError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !is_valid(key) {
            return Err(KnowledgeError::InvalidKey {
                category,
                key: key.to_string(),
            });
        }
        if !seen.insert(key) {
            return Err(KnowledgeError::DuplicateKey {
                category,
                key: key.to_string(),
            });
        }
    }
    Ok(())
}
