use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "u8", into = "u8")]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
    Other(u8),
}

impl From<u8> for InteractionType {
    fn from(value: u8) -> Self {
        match value {
            1 => InteractionType::Ping,
            2 => InteractionType::ApplicationCommand,
            other => InteractionType::Other(other),
        }
    }
}

impl From<InteractionType> for u8 {
    fn from(value: InteractionType) -> Self {
        match value {
            InteractionType::Ping => 1,
            InteractionType::ApplicationCommand => 2,
            InteractionType::Other(other) => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "u8", into = "u8")]
pub enum InteractionResponseType {
    Pong,
    ChannelMessageWithSource,
    Other(u8),
}

impl From<u8> for InteractionResponseType {
    fn from(value: u8) -> Self {
        match value {
            1 => InteractionResponseType::Pong,
            4 => InteractionResponseType::ChannelMessageWithSource,
            other => InteractionResponseType::Other(other),
        }
    }
}

impl From<InteractionResponseType> for u8 {
    fn from(value: InteractionResponseType) -> Self {
        match value {
            InteractionResponseType::Pong => 1,
            InteractionResponseType::ChannelMessageWithSource => 4,
            InteractionResponseType::Other(other) => other,
        }
    }
}

/// Inbound interaction. Fields this service does not act on are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InteractionRequest {
    pub r#type: InteractionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CommandData>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InteractionResponse {
    pub r#type: InteractionResponseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionCallbackData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InteractionCallbackData {
    pub content: String,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        InteractionResponse {
            r#type: InteractionResponseType::Pong,
            data: None,
        }
    }

    pub fn channel_message(content: impl Into<String>) -> Self {
        InteractionResponse {
            r#type: InteractionResponseType::ChannelMessageWithSource,
            data: Some(InteractionCallbackData {
                content: content.into(),
            }),
        }
    }
}
