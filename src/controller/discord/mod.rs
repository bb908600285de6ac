pub mod interaction;
pub mod random_quote;
