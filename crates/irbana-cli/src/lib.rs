//! Command-line front end for the IRBANA back-office API client.

pub mod commands;
pub mod navigator;
pub mod output;

pub use commands::Cli;
pub use navigator::CliNavigator;
pub use output::OutputFormat;
