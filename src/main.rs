// Copyright 2026 Prism Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use prism_client::cli::{self, output};

#[derive(Parser)]
#[command(
    name = "prism",
    about = "Prism — data access client for an embedding projector backend",
    version,
    after_help = "Run 'prism <command> --help' for details on each command."
)]
struct Cli {
    /// Backend route prefix, e.g. http://localhost:6006/data/plugin/projector
    #[arg(
        long,
        global = true,
        default_value = "http://localhost:6006/data/plugin/projector"
    )]
    endpoint: String,

    /// Auth token forwarded as token= on every request
    #[arg(long, global = true)]
    token: Option<String>,

    /// Page URL to lift the token= query parameter from
    #[arg(long, global = true)]
    page_url: Option<String>,

    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List runs available on the backend
    Runs,
    /// Show the projector config for a run
    Info {
        /// Run name (e.g. "train")
        run: String,
    },
    /// Fetch and summarize an embedding tensor
    Tensor {
        run: String,
        /// Tensor name from the run's config
        name: String,
    },
    /// Fetch sprite and metadata info for an embedding
    Metadata {
        run: String,
        name: String,
        /// Write the sprite image to this path
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List bookmarks saved for an embedding
    Bookmarks {
        run: String,
        name: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate for
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    output::set_json(args.json);
    output::set_quiet(args.quiet);

    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("prism_client=debug".parse().unwrap()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    let token = args
        .token
        .clone()
        .or_else(|| args.page_url.as_deref().and_then(cli::token_from_page_url))
        .or_else(|| std::env::var("PRISM_TOKEN").ok());
    let conn = cli::Connection {
        endpoint: args.endpoint.clone(),
        token,
    };

    let result: Result<()> = match &args.command {
        Commands::Runs => cli::runs_cmd::run(&conn).await,
        Commands::Info { run } => cli::info_cmd::run(&conn, run).await,
        Commands::Tensor { run, name } => cli::tensor_cmd::run(&conn, run, name).await,
        Commands::Metadata { run, name, out } => {
            cli::metadata_cmd::run(&conn, run, name, out.as_deref()).await
        }
        Commands::Bookmarks { run, name } => cli::bookmarks_cmd::run(&conn, run, name).await,
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "prism", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("  error: {err:#}");
        std::process::exit(1);
    }
}
