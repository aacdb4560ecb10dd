//! # QnA Intents CLI (`qna`)
//!
//! Builds the intent model from the question template catalog and matches
//! user questions against it.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `qna build` | Compile the catalog into a model file |
//! | `qna match --question "<q>"` | Print the best-matching key and its score |
//! | `qna merge --input <file>` | Merge Q/A records into the catalog |
//! | `qna stats` | Summarize a model file |
//! | `qna completions <shell>` | Print a shell completion script |
//!
//! ## Examples
//!
//! ```bash
//! qna build --output ./data/intents_model.json
//! qna match --question "Combien de sessions uniques ?"
//! qna match --question "statut commande" --model ./data/intents_model.json --explain
//! ```

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use qna_intents::progress::ProgressMode;
use qna_intents::{build_cmd, config, match_cmd, merge, stats};

/// QnA Intents — match free-text questions to known question templates.
///
/// Commands read an optional TOML configuration file (`--config`) for the
/// catalog and model paths; command-line flags take precedence.
#[derive(Parser)]
#[command(
    name = "qna",
    about = "QnA Intents — match free-text questions to known question templates",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/qna.toml`. A missing file means built-in
    /// defaults.
    #[arg(long, global = true, default_value = "./config/qna.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Build the intent model from the template catalog.
    ///
    /// Normalizes every template question, drops the ones that normalize to
    /// nothing, and writes `{ version, size, index }` as indented JSON.
    Build {
        /// Template catalog (JSON array). Overrides `[catalog].path`.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Model file to write. Overrides `[model].path`.
        #[arg(long)]
        output: Option<PathBuf>,

        /// Progress output on stderr.
        #[arg(long, value_enum, default_value = "auto")]
        progress: ProgressMode,
    },

    /// Match a question against the intent model.
    ///
    /// Prints `{ question, match: { key, score } }`. The score is the share
    /// of the matched key's tokens found in the question.
    Match {
        /// The user question.
        #[arg(
            long,
            allow_hyphen_values = true,
            value_parser = clap::builder::NonEmptyStringValueParser::new()
        )]
        question: String,

        /// Model file to read. Overrides `[model].path`.
        #[arg(long)]
        model: Option<PathBuf>,

        /// Also print the ranked top N candidates.
        #[arg(long)]
        top: Option<usize>,

        /// Include the scoring breakdown of the best match.
        #[arg(long)]
        explain: bool,
    },

    /// Merge question/answer records into the template catalog.
    Merge {
        /// JSON array of `{ question, categorie, champs, reponse }` records.
        #[arg(long)]
        input: PathBuf,

        /// Catalog file to update. Overrides `[catalog].path`.
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Print the merge report without writing the catalog.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show model version, key count, and keys per category.
    Stats {
        /// Model file to read. Overrides `[model].path`.
        #[arg(long)]
        model: Option<PathBuf>,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "qna", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Build {
            catalog,
            output,
            progress,
        } => {
            build_cmd::run_build(&cfg, catalog, output, progress)?;
        }
        Commands::Match {
            question,
            model,
            top,
            explain,
        } => {
            match_cmd::run_match(&cfg, &question, model, explain, top)?;
        }
        Commands::Merge {
            input,
            catalog,
            dry_run,
        } => {
            merge::run_merge(&cfg, &input, catalog, dry_run)?;
        }
        Commands::Stats { model } => {
            stats::run_stats(&cfg, model)?;
        }
        Commands::Completions { .. } => {
            // Handled above (before config loading)
            unreachable!()
        }
    }

    Ok(())
}
