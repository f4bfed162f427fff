mod commands;

use clap::{CommandFactory, FromArgMatches};
use tracing::debug;

use crate::args::{CliArgs, Command};
use crate::config::load_config;
use crate::error::AppResult;

pub(crate) fn run() -> AppResult<()> {
    let matches = CliArgs::command().get_matches();
    let args = CliArgs::from_arg_matches(&matches)?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

async fn run_async(args: CliArgs) -> AppResult<()> {
    let config = load_config(args.config.as_deref())?;
    if config.is_some() {
        debug!("Config file loaded");
    }
    let config = config.as_ref();

    match args.command {
        Command::Create(create) => commands::create(&create, config).await,
        Command::Append(append) => commands::append(append).await,
        Command::Link(link) => commands::link(link).await,
        Command::Ingest(ingest) => commands::ingest(&ingest).await,
        Command::Overview(overview) => commands::overview(&overview).await,
        Command::Report(report) => commands::report(&report).await,
        Command::Send(send) => commands::send(&send, args.verbose, config).await,
        Command::Run(run) => commands::run(&run, args.verbose, config).await,
    }
}
