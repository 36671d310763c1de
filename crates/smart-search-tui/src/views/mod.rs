pub mod debug_console;
pub mod search;
