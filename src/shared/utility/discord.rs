use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;

use crate::shared::DISCORD_GLOBAL_COMMANDS_ENDPOINT;
use crate::shared::structs::discord::command::CommandDescriptor;

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("The DISCORD_TOKEN environment variable is required.")]
    MissingToken,
    #[error("The DISCORD_APPLICATION_ID environment variable is required.")]
    MissingApplicationId,
    #[error("Error registering commands")]
    Rejected { status: StatusCode },
    #[error("Failed to reach the command registration endpoint: {0}")]
    Transport(#[from] reqwest::Error),
}

impl RegistrationError {
    /// Whether the failure was anticipated: bad configuration or an upstream refusal.
    pub fn is_expected(&self) -> bool {
        !matches!(self, RegistrationError::Transport(_))
    }
}

/// Replaces every global command of `application_id` with `commands`.
pub async fn register_global_commands(
    client: &reqwest::Client,
    api_root: &str,
    application_id: &str,
    token: &str,
    commands: &[CommandDescriptor],
) -> Result<(), RegistrationError> {
    if token.is_empty() {
        return Err(RegistrationError::MissingToken);
    }
    if application_id.is_empty() {
        return Err(RegistrationError::MissingApplicationId);
    }

    let url = format!(
        "{}{}",
        api_root.trim_end_matches('/'),
        DISCORD_GLOBAL_COMMANDS_ENDPOINT.replace("$APPLICATION_ID", application_id)
    );

    register_commands(client, &url, token, commands).await
}

pub async fn register_commands(
    client: &reqwest::Client,
    url: &str,
    token: &str,
    commands: &[CommandDescriptor],
) -> Result<(), RegistrationError> {
    tracing::info!("Registering {} command(s) at {}", commands.len(), url);

    let response = client
        .put(url)
        .header(AUTHORIZATION, format!("Bot {token}"))
        .json(commands)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("Command registration rejected with {status}: {body}");
        return Err(RegistrationError::Rejected { status });
    }

    Ok(())
}
