pub mod models;
pub mod ports;
pub mod prompts;
pub mod session;
pub mod text;
pub mod tool_descriptor;
