//! Conversation history for a single session.

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Append-only, ordered history of turns. Nothing is ever removed or edited.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::assistant(text));
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The turns to send with the next request.
    ///
    /// With no cap this is the whole transcript. With `Some(n)` it is the
    /// most recent `n` turns, trimmed further so the window opens on a user
    /// turn, since the model service rejects conversations that start with
    /// a model message.
    pub fn context(&self, max_turns: Option<usize>) -> &[Turn] {
        let Some(max) = max_turns else {
            return &self.turns;
        };
        let mut start = self.turns.len().saturating_sub(max);
        while start < self.turns.len() && self.turns[start].role != Role::User {
            start += 1;
        }
        &self.turns[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(n: usize) -> Transcript {
        let mut transcript = Transcript::new();
        for i in 0..n {
            transcript.push_user(format!("question {i}"));
            transcript.push_assistant(format!("answer {i}"));
        }
        transcript
    }

    #[test]
    fn preserves_insertion_order() {
        let transcript = exchange(3);
        let roles: Vec<Role> = transcript.turns().iter().map(Turn::role).collect();
        assert_eq!(
            roles,
            [
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant,
                Role::User,
                Role::Assistant
            ]
        );
        assert_eq!(transcript.turns()[2].text(), "question 1");
    }

    #[test]
    fn uncapped_context_is_everything() {
        let transcript = exchange(4);
        assert_eq!(transcript.context(None), transcript.turns());
    }

    #[test]
    fn capped_context_opens_on_user_turn() {
        let mut transcript = exchange(3);
        transcript.push_user("latest");

        // Last 4 turns would open on "answer 1"; the window skips it.
        let window = transcript.context(Some(4));
        assert_eq!(window.len(), 3);
        assert_eq!(window[0], Turn::user("question 2"));
        assert_eq!(window.last().unwrap().text(), "latest");

        let window = transcript.context(Some(5));
        assert_eq!(window.len(), 5);
        assert_eq!(window[0].role(), Role::User);
    }

    #[test]
    fn cap_larger_than_transcript_returns_all() {
        let transcript = exchange(2);
        assert_eq!(transcript.context(Some(100)).len(), 4);
    }

    #[test]
    fn context_does_not_shrink_transcript() {
        let transcript = exchange(5);
        let _ = transcript.context(Some(1));
        assert_eq!(transcript.len(), 10);
    }
}
