//! Tiered knowledge base lookup: greeting → capabilities → term → fuzzy question.

use super::normalize::{normalize, tokens};
use super::store::KnowledgeBase;
use std::collections::HashSet;
use std::fmt;

/// Words that mark a message as a greeting when it is short enough.
pub const GREETING_WORDS: &[&str] = &[
    "привет",
    "здравствуй",
    "здравствуйте",
    "начать",
    "start",
    "hello",
    "hi",
];

/// A greeting must have fewer tokens than this.
const GREETING_MAX_TOKENS: usize = 4;

/// Substrings that ask what the bot can do.
pub const CAPABILITY_PHRASES: &[&str] = &["что ты умеешь", "что можешь", "твои возможности", "функции"];

pub const CAPABILITIES_ANSWER: &str = "Я могу отвечать на вопросы о работе наставника: термины, расписание, выплаты, Planfix, воркшопы и многое другое. Попробуйте спросить о чем-то конкретном!";

/// Which tier produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Greeting,
    Capabilities,
    Term,
    Question,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchTier::Greeting => "greeting",
            MatchTier::Capabilities => "capabilities",
            MatchTier::Term => "term",
            MatchTier::Question => "question",
        };
        f.write_str(s)
    }
}

/// A knowledge base hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeMatch {
    pub tier: MatchTier,
    pub answer: String,
}

/// Runs the tiers in order against `raw_text`. `None` means no tier matched.
pub fn find_answer(raw_text: &str, kb: &KnowledgeBase) -> Option<KnowledgeMatch> {
    let input = normalize(raw_text);
    let input_words: HashSet<&str> = tokens(&input).collect();

    if is_greeting(&input_words, tokens(&input).count()) {
        return Some(KnowledgeMatch {
            tier: MatchTier::Greeting,
            answer: kb.greeting().to_string(),
        });
    }

    if CAPABILITY_PHRASES.iter().any(|p| input.contains(p)) {
        return Some(KnowledgeMatch {
            tier: MatchTier::Capabilities,
            answer: CAPABILITIES_ANSWER.to_string(),
        });
    }

    // Plain substring scan in source order: a short term such as "ос" also hits inside
    // longer words ("вопрос"). Kept as-is; reorder or rename terms in the data to steer it.
    if let Some(entry) = kb.terms().iter().find(|t| input.contains(t.term.as_str())) {
        return Some(KnowledgeMatch {
            tier: MatchTier::Term,
            answer: format_term(&entry.term, &entry.definition),
        });
    }

    best_question(&input_words, kb).map(|answer| KnowledgeMatch {
        tier: MatchTier::Question,
        answer: answer.to_string(),
    })
}

/// `"📚 TERM: definition"`.
pub fn format_term(term: &str, definition: &str) -> String {
    format!("📚 {}: {}", term.to_uppercase(), definition)
}

fn is_greeting(input_words: &HashSet<&str>, token_count: usize) -> bool {
    token_count < GREETING_MAX_TOKENS && GREETING_WORDS.iter().any(|w| input_words.contains(w))
}

/// Highest word overlap wins; ties keep the earlier question.
fn best_question<'a>(input_words: &HashSet<&str>, kb: &'a KnowledgeBase) -> Option<&'a str> {
    let mut best: Option<&str> = None;
    let mut max_matches = 0usize;

    for entry in kb.questions() {
        let question = normalize(&entry.question);
        let matches = tokens(&question)
            .collect::<HashSet<_>>()
            .intersection(input_words)
            .count();
        if matches > max_matches {
            max_matches = matches;
            best = Some(entry.answer.as_str());
        }
    }
    best
}
