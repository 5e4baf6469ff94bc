/// Prompt assembly for agent conversations
///
/// Formats the selected track into a compact context block that rides
/// along with every turn, so the backend agent always knows which song
/// the conversation is about.
use super::agents::AgentKind;
use super::types::ChatMessage;
use crate::music::types::Track;

/// Cap on history forwarded per turn; older turns are dropped first
const MAX_HISTORY_MESSAGES: usize = 40;

pub struct PromptBuilder;

impl PromptBuilder {
    /// Render the track into the context block sent with each turn
    pub fn build_track_context(track: &Track) -> String {
        let mut context = String::new();

        context.push_str("=== Selected Track ===\n");
        context.push_str(&format!("Title: {}\n", track.name));
        context.push_str(&format!("Artist: {}\n", track.artist_names()));
        context.push_str(&format!("Album: {}\n", track.album.name));
        if let Some(ref release_date) = track.album.release_date {
            context.push_str(&format!("Released: {}\n", release_date));
        }
        context.push_str(&format!("Duration: {}\n", track.duration_display()));
        if track.explicit {
            context.push_str("Explicit: yes\n");
        }

        context
    }

    /// Assemble the message list for one turn
    ///
    /// System prompt first, then the track context as a system message,
    /// then the trimmed conversation history.
    pub fn build_messages(
        agent: AgentKind,
        track: &Track,
        history: &[ChatMessage],
    ) -> Vec<ChatMessage> {
        let profile = agent.profile();

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(profile.system_prompt));
        messages.push(ChatMessage::system(Self::build_track_context(track)));

        let start = history.len().saturating_sub(MAX_HISTORY_MESSAGES);
        messages.extend_from_slice(&history[start..]);

        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::types::{Album, Artist};

    fn test_track() -> Track {
        Track {
            id: "t1".to_string(),
            name: "Karma Police".to_string(),
            artists: vec![Artist {
                id: "a1".to_string(),
                name: "Radiohead".to_string(),
            }],
            album: Album {
                id: "al1".to_string(),
                name: "OK Computer".to_string(),
                images: vec![],
                release_date: Some("1997-05-21".to_string()),
            },
            duration_ms: 264000,
            explicit: false,
            preview_url: None,
            external_url: None,
        }
    }

    #[test]
    fn test_track_context_carries_core_fields() {
        let context = PromptBuilder::build_track_context(&test_track());

        assert!(context.contains("Title: Karma Police"));
        assert!(context.contains("Artist: Radiohead"));
        assert!(context.contains("Album: OK Computer"));
        assert!(context.contains("Released: 1997-05-21"));
        assert!(context.contains("Duration: 4:24"));
        assert!(!context.contains("Explicit"));
    }

    #[test]
    fn test_messages_start_with_persona_and_context() {
        let history = vec![ChatMessage::user("What is this song about?")];
        let messages = PromptBuilder::build_messages(AgentKind::Lyricist, &test_track(), &history);

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, crate::chat::MessageRole::System);
        assert!(messages[0].content.contains("The Lyricist"));
        assert!(messages[1].content.contains("Karma Police"));
        assert_eq!(messages[2], history[0]);
    }

    #[test]
    fn test_long_history_is_trimmed_from_the_front() {
        let history: Vec<ChatMessage> = (0..60)
            .map(|i| ChatMessage::user(format!("message {}", i)))
            .collect();

        let messages = PromptBuilder::build_messages(AgentKind::Historian, &test_track(), &history);

        // 2 system messages + trimmed history
        assert_eq!(messages.len(), 2 + MAX_HISTORY_MESSAGES);
        assert_eq!(messages[2].content, "message 20");
        assert_eq!(messages.last().unwrap().content, "message 59");
    }
}
