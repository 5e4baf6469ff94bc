/// Backend chat service client
///
/// One endpoint: POST /v1/chat. The request carries the agent id, the
/// assembled message list and the selected track id; the backend runs
/// the model call and answers with the agent's reply. Chat turns are
/// never cached.
use super::agents::AgentKind;
use super::prompts::PromptBuilder;
use super::types::{ChatMessage, ChatTurnReply};
use crate::api::{ApiClient, ApiError, HttpMethod, RequestOptions};
use crate::logger::{self, LogTag};
use crate::music::types::Track;
use serde::Serialize;
use std::sync::Arc;

const ENDPOINT_CHAT: &str = "/v1/chat";

/// Wire shape of a chat turn request
#[derive(Debug, Serialize)]
struct ChatTurnRequest<'a> {
    agent: &'a str,
    track_id: &'a str,
    messages: &'a [ChatMessage],
}

pub struct ChatClient {
    api: Arc<ApiClient>,
}

impl ChatClient {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// Send one conversation turn to an agent
    ///
    /// `history` is the prior conversation (user and assistant turns);
    /// the persona prompt and track context are prepended here.
    pub async fn send_turn(
        &self,
        agent: AgentKind,
        track: &Track,
        history: &[ChatMessage],
    ) -> Result<ChatTurnReply, ApiError> {
        let messages = PromptBuilder::build_messages(agent, track, history);

        logger::debug(
            LogTag::Chat,
            &format!(
                "Sending turn to {}: {} messages, track={}",
                agent,
                messages.len(),
                track.id
            ),
        );

        let request = ChatTurnRequest {
            agent: agent.as_str(),
            track_id: &track.id,
            messages: &messages,
        };
        let body = serde_json::to_value(&request).map_err(|e| ApiError::Schema {
            message: format!("Failed to serialize chat turn: {}", e),
        })?;

        let options = RequestOptions::new()
            .with_method(HttpMethod::Post)
            .with_body(body);

        self.api.request(ENDPOINT_CHAT, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HttpTransport, TransportResponse};
    use crate::auth::TokenProvider;
    use crate::music::types::{Album, Artist};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct CapturingTransport {
        bodies: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl HttpTransport for CapturingTransport {
        async fn execute(
            &self,
            method: HttpMethod,
            _url: &str,
            _headers: &HashMap<String, String>,
            body: Option<&Value>,
        ) -> Result<TransportResponse, String> {
            assert_eq!(method, HttpMethod::Post);
            self.bodies
                .lock()
                .unwrap()
                .push(body.cloned().unwrap_or(Value::Null));

            Ok(TransportResponse {
                status: 200,
                body: r#"{"reply":"It came out in 1997.","agent":"historian"}"#.to_string(),
            })
        }
    }

    struct FixedToken;

    #[async_trait]
    impl TokenProvider for FixedToken {
        async fn access_token(&self) -> Option<String> {
            Some("token".to_string())
        }

        async fn refresh(&self) -> Option<String> {
            None
        }
    }

    fn test_track() -> Track {
        Track {
            id: "t1".to_string(),
            name: "Paranoid Android".to_string(),
            artists: vec![Artist {
                id: "a1".to_string(),
                name: "Radiohead".to_string(),
            }],
            album: Album {
                id: "al1".to_string(),
                name: "OK Computer".to_string(),
                images: vec![],
                release_date: None,
            },
            duration_ms: 387000,
            explicit: false,
            preview_url: None,
            external_url: None,
        }
    }

    #[tokio::test]
    async fn test_send_turn_posts_persona_and_history() {
        let transport = Arc::new(CapturingTransport {
            bodies: Mutex::new(Vec::new()),
        });
        let api = ApiClient::new(
            "backend",
            "https://backend.test",
            transport.clone(),
            Arc::new(FixedToken),
        );
        let chat = ChatClient::new(Arc::new(api));

        let history = vec![ChatMessage::user("When was this released?")];
        let reply = chat
            .send_turn(AgentKind::Historian, &test_track(), &history)
            .await
            .unwrap();

        assert_eq!(reply.reply, "It came out in 1997.");
        assert_eq!(reply.agent, "historian");

        let bodies = transport.bodies.lock().unwrap();
        let body = &bodies[0];
        assert_eq!(body["agent"], "historian");
        assert_eq!(body["track_id"], "t1");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[2]["content"], "When was this released?");
    }
}
