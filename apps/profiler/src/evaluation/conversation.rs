//! Conversation reconstruction from stored interview session payloads.
//!
//! Session payloads come in several shapes. Strategies are tried in order and
//! the first one that yields at least one exchange wins:
//! 1. a list whose first element holds `session_data.conversation_history`
//! 2. an object with a conversation under one of `CONVERSATION_KEYS`
//! 3. an object with parallel `questions` / `answers` arrays

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const CONVERSATION_KEYS: &[&str] = &[
    "conversation",
    "chat_history",
    "messages",
    "qa_pairs",
    "dialogue",
    "conversation_history",
];
const ROLE_KEYS: &[&str] = &["role", "speaker", "type"];
const CONTENT_KEYS: &[&str] = &["message", "content", "text", "response"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Maps a stored speaker label onto a role. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Role> {
        match label.trim().to_lowercase().as_str() {
            "user" | "candidate" | "interviewee" | "human" => Some(Role::User),
            "assistant" | "interviewer" | "ai" | "bot" | "model" | "agent" | "ai_interviewer" => {
                Some(Role::Assistant)
            }
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationExchange {
    pub role: Role,
    pub content: String,
}

impl ConversationExchange {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Rebuilds the ordered transcript from `session_information`.
/// Returns an empty list when no strategy finds a usable exchange.
pub fn reconstruct(session_information: &Value) -> Vec<ConversationExchange> {
    let strategies: [fn(&Value) -> Vec<ConversationExchange>; 3] =
        [from_session_list, from_alias_key, from_question_answer_pairs];

    for (idx, strategy) in strategies.iter().enumerate() {
        let exchanges = strategy(session_information);
        if !exchanges.is_empty() {
            debug!(
                "Reconstructed {} exchanges (strategy {})",
                exchanges.len(),
                idx + 1
            );
            return exchanges;
        }
    }
    Vec::new()
}

fn from_session_list(value: &Value) -> Vec<ConversationExchange> {
    value
        .as_array()
        .and_then(|items| items.first())
        .and_then(|first| first.pointer("/session_data/conversation_history"))
        .map(exchanges_from_list)
        .unwrap_or_default()
}

fn from_alias_key(value: &Value) -> Vec<ConversationExchange> {
    let Some(object) = value.as_object() else {
        return Vec::new();
    };
    CONVERSATION_KEYS
        .iter()
        .find_map(|key| object.get(*key))
        .map(exchanges_from_list)
        .unwrap_or_default()
}

fn from_question_answer_pairs(value: &Value) -> Vec<ConversationExchange> {
    let questions = value.get("questions").and_then(Value::as_array);
    let answers = value.get("answers").and_then(Value::as_array);
    let (Some(questions), Some(answers)) = (questions, answers) else {
        return Vec::new();
    };

    questions
        .iter()
        .zip(answers)
        .flat_map(|(q, a)| {
            [
                ConversationExchange::new(Role::Assistant, text_of(q)),
                ConversationExchange::new(Role::User, text_of(a)),
            ]
        })
        .collect()
}

fn exchanges_from_list(list: &Value) -> Vec<ConversationExchange> {
    list.as_array()
        .map(|items| items.iter().filter_map(standardize).collect())
        .unwrap_or_default()
}

/// Reads one stored exchange. Unmappable roles and missing content drop it.
fn standardize(item: &Value) -> Option<ConversationExchange> {
    let Some(object) = item.as_object() else {
        debug!("Dropped exchange: not an object");
        return None;
    };
    let label = ROLE_KEYS
        .iter()
        .find_map(|key| object.get(*key))
        .and_then(Value::as_str);
    let Some(role) = label.and_then(Role::from_label) else {
        debug!("Dropped exchange: unmapped role {label:?}");
        return None;
    };
    let Some(content) = CONTENT_KEYS
        .iter()
        .find_map(|key| object.get(*key))
        .filter(|v| !v.is_null())
        .map(text_of)
    else {
        debug!("Dropped {role} exchange: no content");
        return None;
    };
    Some(ConversationExchange::new(role, content))
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_session_list_shape() {
        let info = json!([{
            "session_data": {
                "conversation_history": [
                    {"role": "interviewer", "message": "Tell me about Rust."},
                    {"speaker": "candidate", "content": "I like ownership."},
                    {"role": "narrator", "message": "dropped"},
                    {"role": "user"}
                ]
            }
        }]);

        assert_eq!(
            reconstruct(&info),
            vec![
                ConversationExchange::new(Role::Assistant, "Tell me about Rust."),
                ConversationExchange::new(Role::User, "I like ownership."),
            ]
        );
    }

    #[test]
    fn test_alias_keys_checked_in_order() {
        let info = json!({
            "messages": [{"type": "human", "text": "from messages"}],
            "chat_history": [{"type": "ai", "text": "from chat history"}]
        });
        assert_eq!(
            reconstruct(&info),
            vec![ConversationExchange::new(Role::Assistant, "from chat history")]
        );
    }

    #[test]
    fn test_questions_and_answers_are_zipped() {
        let info = json!({"questions": ["Q1"], "answers": ["A1"]});
        assert_eq!(
            reconstruct(&info),
            vec![
                ConversationExchange::new(Role::Assistant, "Q1"),
                ConversationExchange::new(Role::User, "A1"),
            ]
        );
    }

    #[test]
    fn test_empty_alias_falls_through_to_question_pairs() {
        let info = json!({"conversation": [], "questions": ["Q1", "Q2"], "answers": ["A1"]});
        assert_eq!(reconstruct(&info).len(), 2);
    }

    #[test]
    fn test_unrecognized_payload_is_empty() {
        assert!(reconstruct(&json!({"notes": "nothing here"})).is_empty());
        assert!(reconstruct(&json!([])).is_empty());
        assert!(reconstruct(&json!("plain text")).is_empty());
    }

    #[test]
    fn test_role_labels_are_case_insensitive() {
        assert_eq!(Role::from_label(" Candidate "), Some(Role::User));
        assert_eq!(Role::from_label("BOT"), Some(Role::Assistant));
        assert_eq!(Role::from_label("model"), Some(Role::Assistant));
        assert_eq!(Role::from_label("Agent"), Some(Role::Assistant));
        assert_eq!(Role::from_label("ai_interviewer"), Some(Role::Assistant));
        assert_eq!(Role::from_label("system"), None);
    }
}
