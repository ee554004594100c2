//! Append-only chat transcript.

use octochat_types::chat::{ChatMessage, Sender};

/// Ordered log of exchanged messages. Entries are only ever appended.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent `n` messages, oldest first.
    pub fn tail(&self, n: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Number of messages from `sender`.
    pub fn count_from(&self, sender: Sender) -> usize {
        self.messages.iter().filter(|m| m.sender == sender).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());

        transcript.push(ChatMessage::user("hello"));
        transcript.push(ChatMessage::bot("hi"));
        transcript.push(ChatMessage::user("how are you?"));

        let texts: Vec<&str> = transcript.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "hi", "how are you?"]);
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.count_from(Sender::User), 2);
        assert_eq!(transcript.count_from(Sender::Bot), 1);
    }

    #[test]
    fn test_tail() {
        let mut transcript = Transcript::new();
        for i in 0..5 {
            transcript.push(ChatMessage::user(format!("m{i}")));
        }
        let tail: Vec<&str> = transcript.tail(2).iter().map(|m| m.text.as_str()).collect();
        assert_eq!(tail, vec!["m3", "m4"]);
        assert_eq!(transcript.tail(10).len(), 5);
    }
}
