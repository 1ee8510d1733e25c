//! Per-agent conversation memory

/// One user/assistant exchange
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

/// Append-only transcript of a single agent's conversation
///
/// Failed turns are never recorded, so the transcript only carries
/// exchanges that produced a real reply.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(Turn {
            user: user.into(),
            assistant: assistant.into(),
        });
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

    /// Render the most recent turns that fit in `max_bytes`, oldest first
    pub fn transcript(&self, max_bytes: usize) -> String {
        let mut picked = Vec::new();
        let mut used = 0usize;
        for turn in self.turns.iter().rev() {
            let rendered = format!("User: {}\nAssistant: {}\n", turn.user, turn.assistant);
            if used + rendered.len() > max_bytes {
                break;
            }
            used += rendered.len();
            picked.push(rendered);
        }
        picked.reverse();
        picked.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_order() {
        let mut memory = ConversationMemory::new();
        memory.record("first question", "first answer");
        memory.record("second question", "second answer");

        assert_eq!(memory.len(), 2);
        assert_eq!(memory.turns()[0].user, "first question");
        assert_eq!(memory.turns()[1].assistant, "second answer");
    }

    #[test]
    fn test_transcript_renders_oldest_first() {
        let mut memory = ConversationMemory::new();
        memory.record("a", "1");
        memory.record("b", "2");

        let transcript = memory.transcript(10_000);
        assert_eq!(transcript, "User: a\nAssistant: 1\nUser: b\nAssistant: 2\n");
    }

    #[test]
    fn test_transcript_drops_oldest_when_over_budget() {
        let mut memory = ConversationMemory::new();
        memory.record("old question that is quite long", "old answer that is quite long");
        memory.record("new", "yes");

        let one_turn = "User: new\nAssistant: yes\n".len();
        let transcript = memory.transcript(one_turn);
        assert_eq!(transcript, "User: new\nAssistant: yes\n");
    }

    #[test]
    fn test_empty_transcript() {
        let memory = ConversationMemory::new();
        assert!(memory.is_empty());
        assert_eq!(memory.transcript(1000), "");
    }
}
