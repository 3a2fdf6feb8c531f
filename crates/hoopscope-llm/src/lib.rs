pub mod client;
pub mod format;
pub mod prompt;
