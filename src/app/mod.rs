mod commands;
mod host;
mod state;
mod types;

pub use state::say_goodbye_interrupted;
pub use types::App;
