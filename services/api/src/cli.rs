use crate::demo::{run_demo, run_view, DemoArgs, ViewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use exam_board::error::AppError;
use exam_board::postings::slug;

#[derive(Parser, Debug)]
#[command(
    name = "Exam Board",
    about = "Serve and inspect municipal civil-service exam postings",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Build a view model from a JSON file of exam records
    View(ViewArgs),
    /// Encode or decode detail-page slugs
    Slug {
        #[command(subcommand)]
        command: SlugCommand,
    },
    /// Walk through summary and detail views over bundled sample postings
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum SlugCommand {
    /// Print the percent-encoded slug for a municipality and exam type
    Encode {
        municipality: String,
        exam_type: String,
    },
    /// Split a slug or detail path back into municipality and exam type
    Decode { segment: String },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::View(args) => run_view(args),
        Command::Slug { command } => run_slug(command),
        Command::Demo(args) => run_demo(args).await,
    }
}

fn run_slug(command: SlugCommand) -> Result<(), AppError> {
    match command {
        SlugCommand::Encode {
            municipality,
            exam_type,
        } => {
            println!("{}", slug::encode(&municipality, &exam_type));
        }
        SlugCommand::Decode { segment } => {
            let parts = slug::decode(&segment)?;
            println!("municipality: {}", parts.municipality);
            println!("exam type:    {}", parts.exam_type);
        }
    }
    Ok(())
}
