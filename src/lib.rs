pub mod commands;
pub mod error;
pub mod http;
pub mod merchant;
