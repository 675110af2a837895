use crate::database::models::{TranscriptTurn, TurnRole};

const LEGAL_KEYWORDS: &[&str] = &[
    "contract",
    "tort",
    "criminal",
    "constitutional",
    "property",
    "equity",
    "human rights",
    "company law",
    "employment",
    "family law",
    "evidence",
    "jurisprudence",
    "administrative",
    "eu law",
    "land law",
    "trusts",
];

const STUDY_KEYWORDS: &[&str] = &[
    "essay",
    "exam",
    "revision",
    "assignment",
    "deadline",
    "study",
    "research",
    "notes",
    "lecture",
    "seminar",
    "tutorial",
    "reading",
    "module",
    "coursework",
];

const FALLBACK_TITLE: &str = "Durmah Conversation";

/// Title for a saved conversation, derived from the first user turn
pub fn generate_title(turns: &[TranscriptTurn]) -> String {
    if turns.is_empty() {
        return "Empty Conversation".to_string();
    }

    let first = turns
        .iter()
        .find(|t| t.role == TurnRole::User)
        .map(|t| t.content.trim())
        .unwrap_or_default();
    if first.is_empty() {
        return FALLBACK_TITLE.to_string();
    }

    let lower = first.to_lowercase();
    if let Some(keyword) = LEGAL_KEYWORDS
        .iter()
        .chain(STUDY_KEYWORDS.iter())
        .find(|k| lower.contains(*k))
    {
        return format!("{} Discussion", capitalize(keyword));
    }

    let title = first.split_whitespace().take(6).collect::<Vec<_>>().join(" ");
    if title.chars().count() > 50 {
        let cut: String = title.chars().take(47).collect();
        return format!("{}...", cut);
    }
    title
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
