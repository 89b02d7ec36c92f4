mod app;
mod cli;

use chat_relay_core::config::Config;
use chat_relay_core::lifecycle::logging::init_logging;
use clap::Parser;
use cli::{Cli, Command, InvokeArgs, RunArgs};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Command::Run(RunArgs::default()));

    match command {
        Command::Run(args) => cmd_run(args),
        Command::Invoke(args) => cmd_invoke(args),
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    // Peek at config for logging settings before the subscriber exists
    let peeked = Config::load(&args.config).unwrap_or_default();
    let log_dir = peeked
        .logging_to_file
        .then(|| peeked.log_dir.clone().unwrap_or_else(|| "./logs".to_string()));
    let _guard = init_logging(&args.log_level, peeked.log_format, log_dir.as_deref());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let application = app::Application::build(&args)?;
        application.serve().await
    })
}

fn cmd_invoke(args: InvokeArgs) -> anyhow::Result<()> {
    let log_format = Config::load(&args.config)
        .map(|c| c.log_format)
        .unwrap_or_default();
    let _guard = init_logging(&args.log_level, log_format, None);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let envelope = runtime.block_on(app::invoke(&args))?;
    println!("{envelope}");
    Ok(())
}
