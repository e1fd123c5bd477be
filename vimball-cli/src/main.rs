//! vimball - create and install vimballs without Vim.
//!
//! ```text
//! vimball [OPTIONS] vba RECIPE...
//! vimball [OPTIONS] install VIMBALL...
//! vimball [OPTIONS] list VIMBALL...
//! vimball [OPTIONS] foo.vba
//! ```

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vimball::archive::looks_like_vimball;

use commands::common::{load_settings, ConfigOverrides};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "vimball")]
#[command(version = vimball::VERSION)]
#[command(about = "Create and install vimballs without Vim")]
#[command(after_help = "A single argument ending in .vba or .vba.gz is installed.")]
struct Cli {
    #[command(flatten)]
    options: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Vimball to install when no command is given
    #[arg(value_name = "VIMBALL")]
    vimball: Option<String>,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Vimfiles directory
    #[arg(short = 'b', long, value_name = "DIR", global = true)]
    vimfiles: Option<PathBuf>,

    /// Config file
    #[arg(short = 'c', long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Destination directory for vimballs
    #[arg(short = 'd', long = "dir", value_name = "DIR", global = true)]
    outdir: Option<PathBuf>,

    /// Don't build the helptags file
    #[arg(long, global = true)]
    no_helptags: bool,

    /// Don't write anything; just log what would be done
    #[arg(short = 'n', long, global = true, overrides_with = "no_dry_run")]
    dry_run: bool,

    /// Write files even if the config file enables dry_run
    #[arg(long, global = true, overrides_with = "dry_run")]
    no_dry_run: bool,

    /// Print the configuration and exit
    #[arg(long, global = true)]
    print_config: bool,

    /// Print the plugin's current version number and exit
    #[arg(long, value_name = "NAME", global = true)]
    print_version: Option<String>,

    /// Print the plugin's vim.org script id and exit
    #[arg(long, value_name = "NAME", global = true)]
    print_script_id: Option<String>,

    /// On install, save the recipe in DIR/vimballs/recipes
    #[arg(short = 'R', long = "recipe", global = true, overrides_with = "no_save_recipes")]
    save_recipes: bool,

    /// Don't save recipes on install
    #[arg(long = "no-recipe", global = true, overrides_with = "save_recipes")]
    no_save_recipes: bool,

    /// Save a record in .VimballRecord
    #[arg(short = 'r', long, global = true, overrides_with = "no_record")]
    record: bool,

    /// Don't save a record in .VimballRecord
    #[arg(long, global = true, overrides_with = "record")]
    no_record: bool,

    /// Install each vimball as a single directory in a code repository
    #[arg(long, global = true, overrides_with = "no_repo")]
    repo: bool,

    /// Install into the vimfiles tree even if the config file enables repo
    #[arg(long, global = true, overrides_with = "repo")]
    no_repo: bool,

    /// Create a vimball only if it is outdated
    #[arg(short = 'u', long, global = true, overrides_with = "no_update")]
    update: bool,

    /// Always rebuild vimballs
    #[arg(long, global = true, overrides_with = "update")]
    no_update: bool,

    /// Save as vba.gz
    #[arg(short = 'z', long, global = true, overrides_with = "no_gzip")]
    gzip: bool,

    /// Save as plain vba
    #[arg(long, global = true, overrides_with = "gzip")]
    no_gzip: bool,

    /// Run verbosely
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Show debug messages
    #[arg(long, global = true)]
    debug: bool,
}

impl GlobalArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            vimfiles: self.vimfiles.clone(),
            config: self.config.clone(),
            outdir: self.outdir.clone(),
            dry_run: flag(self.dry_run, self.no_dry_run),
            no_helptags: self.no_helptags,
            record: flag(self.record, self.no_record),
            save_recipes: flag(self.save_recipes, self.no_save_recipes),
            repo: flag(self.repo, self.no_repo),
            update: flag(self.update, self.no_update),
            compress: flag(self.gzip, self.no_gzip),
        }
    }

    fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

/// Collapse a `--flag`/`--no-flag` pair; the last one given wins.
fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create vimballs from recipe files
    Vba {
        #[arg(value_name = "RECIPE")]
        recipes: Vec<PathBuf>,
    },

    /// Install vimballs
    Install {
        #[arg(value_name = "VIMBALL")]
        vimballs: Vec<PathBuf>,
    },

    /// List the files in vimballs
    List {
        #[arg(value_name = "VIMBALL")]
        vimballs: Vec<PathBuf>,
    },
}

impl Commands {
    fn files(&self) -> &[PathBuf] {
        match self {
            Commands::Vba { recipes } => recipes,
            Commands::Install { vimballs } | Commands::List { vimballs } => vimballs,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.options.log_level());

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

/// `RUST_LOG` wins over the level chosen by flags.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings(&cli.options.overrides())?;

    if cli.options.print_config {
        return commands::config::print_config(&settings);
    }
    if let Some(name) = &cli.options.print_version {
        return commands::config::print_version(&settings.config, name);
    }
    if let Some(name) = &cli.options.print_script_id {
        return commands::config::print_script_id(&settings.config, name);
    }

    let command = resolve_command(cli.command, cli.vimball)?;
    settings.require_vimfiles()?;
    if command.files().is_empty() {
        return Err(CliError::NoInputFiles);
    }

    let config = &settings.config;
    match command {
        Commands::Vba { recipes } => commands::pack::run(config, &recipes),
        Commands::Install { vimballs } => commands::install::run(config, &vimballs),
        Commands::List { vimballs } => commands::list::run(config, &vimballs),
    }
}

/// A lone vimball argument means `install`.
fn resolve_command(command: Option<Commands>, arg: Option<String>) -> Result<Commands, CliError> {
    match (command, arg) {
        (Some(command), _) => Ok(command),
        (None, Some(arg)) if looks_like_vimball(&arg) => Ok(Commands::Install {
            vimballs: vec![PathBuf::from(arg)],
        }),
        (None, Some(arg)) => Err(CliError::UnknownCommand(arg)),
        (None, None) => Err(CliError::NoInputFiles),
    }
}
