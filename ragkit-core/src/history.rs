//! Conversation history and its on-wire encoding
//!
//! The inferencing endpoint takes the whole conversation as one string
//! field, `history_data`, holding a JSON array of `{"role", "content"}`
//! objects. The field is always sent; an empty conversation is `[]`.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Role of the turn author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message (instructions)
    System,
    /// User message
    User,
    /// Assistant (AI) message
    Assistant,
}

impl Role {
    /// Role as written on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One prior exchange in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who wrote it
    pub role: Role,
    /// What was said
    pub content: String,
}

impl Turn {
    /// Create a turn
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
}

/// Ordered conversation history
///
/// Turns are only ever appended. Encoding keeps them in the order the
/// caller committed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    /// Empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Append a user question and the assistant reply
    pub fn record_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(Turn::user(question));
        self.turns.push(Turn::assistant(answer));
    }

    /// Turns in order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether there are no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Encode as the `history_data` string
    pub fn to_wire(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.turns)?)
    }

    /// Decode a `history_data` string
    pub fn from_wire(data: &str) -> Result<Self> {
        let turns: Vec<Turn> = serde_json::from_str(data)?;
        Ok(Self { turns })
    }
}

impl From<Vec<Turn>> for History {
    fn from(turns: Vec<Turn>) -> Self {
        Self { turns }
    }
}

impl FromIterator<Turn> for History {
    fn from_iter<I: IntoIterator<Item = Turn>>(iter: I) -> Self {
        Self {
            turns: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Turn;
    type IntoIter = std::slice::Iter<'a, Turn>;

    fn into_iter(self) -> Self::IntoIter {
        self.turns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history_encodes_as_empty_array() {
        assert_eq!(History::new().to_wire().unwrap(), "[]");
    }

    #[test]
    fn test_history_wire_format() {
        let history = History::from(vec![Turn::user("Hi"), Turn::assistant("Hello!")]);
        assert_eq!(
            history.to_wire().unwrap(),
            r#"[{"role":"user","content":"Hi"},{"role":"assistant","content":"Hello!"}]"#
        );
    }

    #[test]
    fn test_history_order_preserved() {
        let history: History = vec![
            Turn::system("Answer from the rules only"),
            Turn::user("A"),
            Turn::assistant("B"),
            Turn::user("C"),
        ]
        .into_iter()
        .collect();

        let decoded = History::from_wire(&history.to_wire().unwrap()).unwrap();
        assert_eq!(decoded, history);
        let contents: Vec<&str> = decoded.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["Answer from the rules only", "A", "B", "C"]);
    }

    #[test]
    fn test_record_exchange() {
        let mut history = History::new();
        history.record_exchange("When is the deadline?", "Sunday 18:00");
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].role, Role::User);
        assert_eq!(history.turns()[1].role, Role::Assistant);
    }

    #[test]
    fn test_from_wire_rejects_garbage() {
        assert!(History::from_wire("not json").is_err());
        assert!(History::from_wire(r#"[{"role":"robot","content":"x"}]"#).is_err());
    }
}
