pub mod middleware;
pub mod quotes;
pub mod structs;
pub mod utility;

pub const USER_AGENT: &str = concat!(
    "DiscordBot (https://github.com/quote-responder/quote-responder, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

pub const DISCORD_ROOT_ENDPOINT: &str = "https://discord.com/api/v10";
pub const DISCORD_GLOBAL_COMMANDS_ENDPOINT: &str = "/applications/$APPLICATION_ID/commands";
