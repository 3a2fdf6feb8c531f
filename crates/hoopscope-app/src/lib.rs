// Application layer: the analysis session and the event loop the TUI talks to.

pub mod app;
pub mod protocol;
