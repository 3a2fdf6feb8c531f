// Library root for the terminal front end, so the binary and tests share it.

pub mod tui;
