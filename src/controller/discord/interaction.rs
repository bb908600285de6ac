use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::{
    Json,
    response::{IntoResponse, Response},
};
use once_cell::sync::Lazy;

use crate::controller::discord::random_quote;
use crate::shared::structs::ErrorResponse;
use crate::shared::structs::discord::command::CommandDescriptor;
use crate::shared::structs::discord::interaction::{
    CommandData, InteractionRequest, InteractionResponse, InteractionType,
};

pub type CommandHandler = fn(&CommandData) -> InteractionResponse;

#[derive(Debug, Clone)]
pub struct RegisteredCommand {
    pub descriptor: CommandDescriptor,
    pub handler: CommandHandler,
}

/// Read-only lookup from lower-cased command name to its handler, plus the
/// catalog in declaration order.
#[derive(Debug)]
pub struct CommandRegistry {
    commands: Vec<RegisteredCommand>,
    by_name: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new(commands: Vec<RegisteredCommand>) -> Self {
        let by_name = commands
            .iter()
            .enumerate()
            .map(|(index, command)| (command.descriptor.name.to_lowercase(), index))
            .collect();

        CommandRegistry { commands, by_name }
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|index| &self.commands[*index])
    }

    pub fn catalog(&self) -> Vec<CommandDescriptor> {
        self.commands
            .iter()
            .map(|command| command.descriptor.clone())
            .collect()
    }
}

pub static COMMAND_REGISTRY: Lazy<CommandRegistry> =
    Lazy::new(|| CommandRegistry::new(vec![random_quote::command()]));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("Unknown Type")]
    UnknownType(u8),
    #[error("Unknown Type")]
    UnknownCommand(String),
    #[error("Invalid interaction payload")]
    MalformedPayload,
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(self.to_string())),
        )
            .into_response()
    }
}

pub async fn handle_interaction(request: Bytes) -> Response {
    match serde_json::from_slice::<InteractionRequest>(&request) {
        Ok(interaction) => {
            tracing::debug!("Received incoming interaction: {:?}", &interaction);
            match dispatch(&interaction, &COMMAND_REGISTRY) {
                Ok(response) => (StatusCode::OK, Json(response)).into_response(),
                Err(e) => e.into_response(),
            }
        }
        Err(e) => {
            let error_message = format!("Failed to deserialize incoming payload: {}", e);
            tracing::error!("{}", &error_message);
            DispatchError::MalformedPayload.into_response()
        }
    }
}

/// Produces the single response owed to `interaction`.
pub fn dispatch(
    interaction: &InteractionRequest,
    registry: &CommandRegistry,
) -> Result<InteractionResponse, DispatchError> {
    match interaction.r#type {
        InteractionType::Ping => {
            tracing::info!("Handling Ping request");
            Ok(InteractionResponse::pong())
        }
        InteractionType::ApplicationCommand => {
            let data = interaction
                .data
                .as_ref()
                .ok_or(DispatchError::MalformedPayload)?;

            match registry.get(&data.name) {
                Some(command) => Ok((command.handler)(data)),
                None => {
                    tracing::error!("Unknown Command: {}", &data.name);
                    Err(DispatchError::UnknownCommand(data.name.clone()))
                }
            }
        }
        InteractionType::Other(other) => {
            tracing::error!("Unknown Type: {}", other);
            Err(DispatchError::UnknownType(other))
        }
    }
}
