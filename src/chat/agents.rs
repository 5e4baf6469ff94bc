/// Themed agent definitions
///
/// Each agent is a fixed persona with its own system prompt; the backend
/// runs the actual model call. Adding an agent means adding a variant
/// here and a prompt below.
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Historian,
    Lyricist,
    Theorist,
    MoodReader,
}

impl AgentKind {
    pub const ALL: [AgentKind; 4] = [
        AgentKind::Historian,
        AgentKind::Lyricist,
        AgentKind::Theorist,
        AgentKind::MoodReader,
    ];

    /// Wire identifier used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Historian => "historian",
            AgentKind::Lyricist => "lyricist",
            AgentKind::Theorist => "theorist",
            AgentKind::MoodReader => "mood_reader",
        }
    }

    /// Parse a user-supplied agent name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "historian" => Some(AgentKind::Historian),
            "lyricist" => Some(AgentKind::Lyricist),
            "theorist" => Some(AgentKind::Theorist),
            "mood_reader" | "moodreader" | "mood" => Some(AgentKind::MoodReader),
            _ => None,
        }
    }

    pub fn profile(&self) -> AgentProfile {
        match self {
            AgentKind::Historian => AgentProfile {
                kind: *self,
                display_name: "The Historian",
                description: "Backstory, recording sessions and release context",
                system_prompt: "You are The Historian, a music history companion. \
                    Discuss the backstory of the song the listener selected: how it was \
                    written and recorded, the era and scene it came from, its release and \
                    reception. Stay factual; say so when something is uncertain or disputed.",
            },
            AgentKind::Lyricist => AgentProfile {
                kind: *self,
                display_name: "The Lyricist",
                description: "Lyrics, imagery and themes",
                system_prompt: "You are The Lyricist, a close reader of song lyrics. \
                    Explore the imagery, themes and narrative voice of the selected song. \
                    Quote sparingly and never reproduce the full lyrics.",
            },
            AgentKind::Theorist => AgentProfile {
                kind: *self,
                display_name: "The Theorist",
                description: "Musical structure, harmony and production",
                system_prompt: "You are The Theorist, a musician explaining how the selected \
                    song works: form, harmony, rhythm, instrumentation and production choices. \
                    Keep the vocabulary accessible to a curious non-musician.",
            },
            AgentKind::MoodReader => AgentProfile {
                kind: *self,
                display_name: "The Mood Reader",
                description: "Mood, atmosphere and listening context",
                system_prompt: "You are The Mood Reader. Talk about the emotional color of \
                    the selected song, the situations it fits, and what the listener's history \
                    with it might say about how it lands.",
            },
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Static persona data for one agent
#[derive(Debug, Clone)]
pub struct AgentProfile {
    pub kind: AgentKind,
    pub display_name: &'static str,
    pub description: &'static str,
    pub system_prompt: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_ids_round_trip_through_parse() {
        for agent in AgentKind::ALL {
            assert_eq!(AgentKind::parse(agent.as_str()), Some(agent));
        }
        assert_eq!(AgentKind::parse("MOOD"), Some(AgentKind::MoodReader));
        assert_eq!(AgentKind::parse("unknown"), None);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&AgentKind::MoodReader).unwrap();
        assert_eq!(json, r#""mood_reader""#);
    }

    #[test]
    fn test_every_agent_has_a_prompt() {
        for agent in AgentKind::ALL {
            let profile = agent.profile();
            assert!(!profile.system_prompt.is_empty());
            assert!(!profile.display_name.is_empty());
        }
    }
}
