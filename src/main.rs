//! mygit CLI - Command line interface for the mygit object store
//!
//! Mirrors the plumbing subset of git that deals with loose blobs:
//! `init`, `hash-object` and `cat-file`.

use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use mygit::{Config, Error, InitOutcome, ObjectKind, Repository};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mygit")]
#[command(about = "A content-addressed object store in git's loose object format")]
#[command(version)]
struct Cli {
    /// Path to the repository directory [default: .git]
    #[arg(long, env = "MYGIT_DIR", global = true)]
    git_dir: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    /// Enable verbose logging. Repeat for more (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty repository
    Init,

    /// Compute an object id, optionally storing the object
    HashObject {
        /// Write the object into the object store
        #[arg(short = 'w')]
        write: bool,
        /// Kind of object to create
        #[arg(short = 't', long = "type", default_value = "blob")]
        kind: String,
        /// Read the payload from stdin instead of a file
        #[arg(long, conflicts_with = "file")]
        stdin: bool,
        /// File whose contents become the payload
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,
    },

    /// Show the content, kind or size of a stored object
    #[command(group(
        ArgGroup::new("mode")
            .required(true)
            .args(["pretty", "kind", "size", "exists"])
    ))]
    CatFile {
        /// Print the payload
        #[arg(short = 'p')]
        pretty: bool,
        /// Print the object kind
        #[arg(short = 't')]
        kind: bool,
        /// Print the payload size in bytes
        #[arg(short = 's')]
        size: bool,
        /// Exit with zero status if the object exists, print nothing
        #[arg(short = 'e')]
        exists: bool,
        /// The full 40-character object id
        object: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Init => {
            let config = Config::load()?;
            let git_dir = resolve_git_dir(cli.git_dir, Some(&config))?;
            let outcome = Repository::init(&git_dir, &config)
                .with_context(|| format!("failed to initialize {}", git_dir.display()))?;
            let path = std::fs::canonicalize(&git_dir).unwrap_or_else(|_| git_dir.clone());
            let message = match outcome {
                InitOutcome::Created => "Initialized empty repository in",
                InitOutcome::Reinitialized => "Reinitialized existing repository in",
            };
            output(
                cli.format,
                &format!("{} {}", message, path.display()),
                &serde_json::json!({
                    "status": "ok",
                    "path": path.display().to_string(),
                    "reinitialized": outcome == InitOutcome::Reinitialized,
                }),
            )?;
        }

        Commands::HashObject {
            write,
            kind,
            stdin,
            file,
        } => {
            let kind: ObjectKind = kind.parse()?;
            let payload = read_payload(stdin, file.as_deref())?;

            let id = if write {
                let git_dir = resolve_git_dir(cli.git_dir, None)?;
                open_repo(&git_dir)?.hash_object(kind, &payload, true)?
            } else {
                mygit::FramedObject::new(kind, &payload).id()
            };

            output(
                cli.format,
                &id.to_hex(),
                &serde_json::json!({
                    "id": id.to_hex(),
                    "kind": kind,
                    "size": payload.len(),
                    "written": write,
                }),
            )?;
        }

        Commands::CatFile {
            pretty,
            kind,
            size,
            exists: _,
            object,
        } => {
            let git_dir = resolve_git_dir(cli.git_dir, None)?;
            let repo = open_repo(&git_dir)?;

            if !(pretty || kind || size) {
                let code = if repo.has_object(&object) {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                };
                return Ok(code);
            }

            let obj = repo.read_object(&object)?;
            match cli.format {
                OutputFormat::Json => {
                    let mut value = serde_json::json!({
                        "id": object.to_lowercase(),
                        "kind": obj.kind,
                        "size": obj.size(),
                    });
                    if pretty {
                        value["content"] = String::from_utf8_lossy(&obj.payload).into();
                    }
                    println!("{}", serde_json::to_string(&value)?);
                }
                OutputFormat::Text if pretty => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(&obj.payload)?;
                    stdout.flush()?;
                }
                OutputFormat::Text if kind => println!("{}", obj.kind),
                OutputFormat::Text => println!("{}", obj.size()),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// The flag/env value wins; the config file is only read when it is needed
fn resolve_git_dir(flag: Option<PathBuf>, config: Option<&Config>) -> anyhow::Result<PathBuf> {
    let git_dir = match (flag, config) {
        (Some(dir), _) => dir,
        (None, Some(config)) => config.git_dir.clone(),
        (None, None) => Config::load()?.git_dir,
    };
    tracing::debug!(git_dir = %git_dir.display(), "resolved repository");
    Ok(git_dir)
}

fn open_repo(git_dir: &Path) -> anyhow::Result<Repository> {
    match Repository::open(git_dir) {
        Err(Error::NotARepository(path)) => {
            anyhow::bail!(
                "not a repository: {} (run `mygit init` first)",
                path.display()
            )
        }
        other => Ok(other?),
    }
}

fn read_payload(stdin: bool, file: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    if stdin {
        let mut buf = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        return Ok(buf);
    }

    let path = file.context("no input file given")?;
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn output(format: OutputFormat, text: &str, value: &serde_json::Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", text),
        OutputFormat::Json => println!("{}", serde_json::to_string(value)?),
    }
    Ok(())
}
