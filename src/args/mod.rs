//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;


pub use cli::{
    AppendArgs, CliArgs, Command, CreateArgs, IngestArgs, LinkArgs, OverviewArgs, ReportArgs,
    RunArgs, SendArgs,
};
pub use types::HttpMethod;
