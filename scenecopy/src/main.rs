use anyhow::Result;
use clap::Parser;
use scenecopy::cli::{Cli, Commands};
use scenecopy::display::Progress;
use scenecopy::{commands, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Match the command and call the appropriate handler function
    match cli.command {
        Commands::List(args) => {
            commands::handle_list(args).await?;
        }
        Commands::Copy(args) => {
            commands::handle_copy(args, &mut Progress::stdout(cli.quiet)).await?;
        }
        Commands::Session(args) => {
            commands::handle_session(args).await?;
        }
    }

    Ok(())
}
