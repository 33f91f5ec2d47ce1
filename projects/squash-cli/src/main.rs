use clap::Parser;
use squash_cli::{SquashApplication, SquashCommands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> squash_types::Result<()> {
    let cli = SquashApplication::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "squash_analyzer={},squash_core={},squash_cli={}",
                    cli.log_level, cli.log_level, cli.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &cli.command {
        SquashCommands::Squash(args) => args.run(&cli.config)?,
        SquashCommands::Plan(args) => args.run(&cli.config)?,
        SquashCommands::Init(args) => args.run(&cli.config)?,
    }

    Ok(())
}
