//! CLI front end for the code-map core (design docs §10): a thin `clap` wrapper that
//! loads a [`RunConfig`], builds a [`RepoMap`], and prints the result.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use codemap_retrieval::repomap::ArgRecord;
use codemap_retrieval::{RepoMap, RunConfig};

#[derive(Parser)]
#[command(name = "retrieval", about = "Repo-aware code map and structural editor")]
struct Cli {
    /// Root directory of the repository to operate on.
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Optional TOML config file overlaying `RunConfig` defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a token-budgeted code map over the given (or all) files.
    Map {
        /// Files to treat as "in chat" (weighted highest in ranking).
        #[arg(long)]
        chat: Vec<PathBuf>,
        /// A free-text message to mine for mentioned files/identifiers.
        #[arg(long)]
        message: Option<String>,
    },
    /// Apply a structural search/replace edit to a single file.
    Edit {
        /// File to edit, relative to the root.
        file: String,
        /// Path to a file containing the SEARCH block.
        #[arg(long)]
        search: PathBuf,
        /// Path to a file containing the REPLACE block.
        #[arg(long)]
        replace: PathBuf,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<RunConfig> {
    match path {
        Some(path) => Ok(RunConfig::load(path)?),
        None => Ok(RunConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    let mut repo_map = RepoMap::new(cli.root.clone(), config)?;

    match cli.command {
        Command::Map { chat, message } => {
            let chat_fnames: HashSet<PathBuf> =
                chat.iter().map(|p| repo_map.file_group().abs_root_path(&p.to_string_lossy())).collect();
            let all_fnames: HashSet<PathBuf> =
                repo_map.file_group().get_all_filenames(false)?.into_iter().collect();

            let rendered = match message {
                Some(message) => {
                    repo_map.repo_map_from_message(&message, None, None, &chat_fnames, &all_fnames)?
                }
                None => {
                    let other_fnames: HashSet<PathBuf> =
                        all_fnames.difference(&chat_fnames).cloned().collect();
                    repo_map.get_repo_map(&chat_fnames, &other_fnames, &ArgRecord::new())?
                }
            };

            match rendered {
                Some(map) => println!("{map}"),
                None => eprintln!("(no code map to show)"),
            }
            repo_map.save_cache()?;
        }
        Command::Edit { file, search, replace } => {
            let search = std::fs::read_to_string(&search)?;
            let replace = std::fs::read_to_string(&replace)?;
            let abs = repo_map.file_group().abs_root_path(&file);
            let (applied, close_match) = codemap_apply_patch::edit_file(&abs, &search, &replace)?;
            if applied {
                println!("Successfully edited file {file}.");
            } else {
                println!("No exact match found in {file}.");
                if !close_match.is_empty() {
                    println!("Closest match:\n{close_match}");
                }
            }
        }
    }

    Ok(())
}
