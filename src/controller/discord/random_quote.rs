use crate::controller::discord::interaction::RegisteredCommand;
use crate::shared::quotes::random_quote;
use crate::shared::structs::discord::command::CommandDescriptor;
use crate::shared::structs::discord::interaction::{CommandData, InteractionResponse};

pub const COMMAND_NAME: &str = "randomquote";
const COMMAND_DESCRIPTION: &str = "Get a random inspirational quote.";

pub fn command() -> RegisteredCommand {
    RegisteredCommand {
        descriptor: CommandDescriptor::new(COMMAND_NAME, COMMAND_DESCRIPTION),
        handler: handle,
    }
}

fn handle(_data: &CommandData) -> InteractionResponse {
    InteractionResponse::channel_message(random_quote())
}
