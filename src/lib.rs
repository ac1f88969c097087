pub mod backend;
pub mod catalog;
pub mod config;
pub mod credentials;
pub mod fetch;
pub mod output;
pub mod scoring;
pub mod share;
pub mod state;
pub mod stderr_buffer;
pub mod tui;
