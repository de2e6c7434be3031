use clap::{Parser, Subcommand};
use salt::commands::*;
use salt::core::print_error;
use std::env;

#[derive(Parser)]
#[command(name = "salt")]
#[command(about = "A branch-aware alternative to Git submodules")]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Print version information
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print extra detail
    #[arg(long, global = true)]
    verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty salt.conf in the current directory
    Init(InitArgs),
    /// Clone a submodule and register it
    Add(AddArgs),
    /// Materialize all submodules on their default branches
    Resolve(ResolveArgs),
    /// Check out the branches the current parent branch maps to
    Sync(SyncArgs),
    /// Fast-forward hidden clones and refresh the flat copies
    Pull(PullArgs),
    /// Commit and push flat-copy edits upstream
    Push(PushArgs),
    /// Show each submodule's sync status
    Status(StatusArgs),
    /// Remove a submodule from config, state and hidden clones
    Remove(RemoveArgs),
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "warn");
    }
    env_logger::init();

    let ctx = CommandContext {
        quiet: cli.quiet,
        verbose: cli.verbose,
    };

    let result = match cli.command {
        Commands::Init(args) => execute_init(ctx, args),
        Commands::Add(args) => execute_add(ctx, args),
        Commands::Resolve(args) => execute_resolve(ctx, args),
        Commands::Sync(args) => execute_sync(ctx, args),
        Commands::Pull(args) => execute_pull(ctx, args),
        Commands::Push(args) => execute_push(ctx, args),
        Commands::Status(args) => execute_status(ctx, args),
        Commands::Remove(args) => execute_remove(ctx, args),
    };

    if let Err(e) = result {
        print_error(&e.to_string());
        std::process::exit(e.exit_code());
    }
}
