//! ofgo — onboard projects into OSS-Fuzz and generate fuzz harnesses.
//!
//! # Usage
//!
//! ```text
//! ofgo [--base <dir>] [--verbose] default --repo <url|name> [--email <e>] [--language <l>] [--model <m>] [--temperature <t>]
//! ofgo template --repo <url> --email <e> --language <l>
//! ofgo existing --project <name> [--model <m>] [--temperature <t>]
//! ofgo consolidate --project <name> [--sample <n>]
//! ofgo purge --project <name>
//! ofgo check --project <name>
//! ofgo status [--project <name>] [--json]
//! ```

mod commands;
mod external;
mod model;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    check::CheckArgs, consolidate::ConsolidateArgs, existing::ExistingArgs, onboard::OnboardArgs,
    purge::PurgeArgs, status::StatusArgs, template::TemplateArgs, Session,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ofgo",
    version,
    about = "Onboard projects into OSS-Fuzz and generate fuzz harnesses",
    long_about = None,
)]
struct Cli {
    /// Directory holding oss-fuzz/, oss-fuzz-gen/, gen-projects/ and scripts/.
    #[arg(long, global = true, default_value = ".")]
    base: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Full onboarding: scaffold or check the project, then generate harnesses.
    #[command(name = "default")]
    Onboard(OnboardArgs),

    /// Scaffold project.yaml, build.sh, Dockerfile and a starter fuzz target.
    Template(TemplateArgs),

    /// Generate harnesses for a project that already exists.
    Existing(ExistingArgs),

    /// Copy generated samples into numbered harness files.
    Consolidate(ConsolidateArgs),

    /// Delete a project's entries from the sample store.
    Purge(PurgeArgs),

    /// Build the project with OSS-Fuzz and smoke-run every fuzzer.
    Check(CheckArgs),

    /// Show projects, harnesses and stored samples.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut session = Session::open(&cli.base)?;
    match cli.command {
        Commands::Onboard(args) => args.run(&mut session),
        Commands::Template(args) => args.run(&session).map(|_| ()),
        Commands::Existing(args) => args.run(&mut session),
        Commands::Consolidate(args) => args.run(&session),
        Commands::Purge(args) => args.run(&session),
        Commands::Check(args) => args.run(&session),
        Commands::Status(args) => args.run(&session),
    }
}
