mod args;
mod config;
mod entry;
mod error;
mod http;
mod ingest;
mod logger;
mod report;
mod suite;
mod summary;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
