use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "actlog-server")]
#[command(about = "Activity log server")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run database migrations
    Migrate,
    /// Print OpenAPI spec (optionally to a file)
    Openapi(OpenApiArgs),
}

#[derive(Args)]
struct OpenApiArgs {
    #[arg(long, short)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Server,
    Migrate,
    OpenApi { out: Option<PathBuf> },
}

impl From<Cli> for RunMode {
    fn from(cli: Cli) -> Self {
        match cli.command {
            None => Self::Server,
            Some(Command::Migrate) => Self::Migrate,
            Some(Command::Openapi(args)) => Self::OpenApi { out: args.out },
        }
    }
}

pub fn parse_args() -> RunMode {
    Cli::parse().into()
}
