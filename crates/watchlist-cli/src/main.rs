use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::{basket, config, remove, show, Context};
use watchlist_config::{Config, PathManager};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchlist")]
#[command(about = "Watchlist - series, seasons and episodes you still want to watch")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// User document to read (overrides `store.user` from the config file)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the watchlist with episodes grouped into season baskets
    #[command(long_about = "Show the aggregated watchlist. Whole series and whole seasons are listed first, followed by one basket per season that has individually tracked episodes. A whole-season entry is hidden once any of its episodes is tracked.")]
    Show,

    /// List the episodes in one season basket
    Basket {
        /// Series id (numeric catalog id or stored string id)
        series: String,

        /// Season number
        season: u32,
    },

    /// Remove one entry from the watchlist
    #[command(long_about = "Remove an entry by its exact id and write the updated list back to the store. With --series and --season the matching basket is opened first, and it is reported as closed when its last episode goes.")]
    Remove {
        /// Entry id to remove
        entry_id: String,

        /// Series of the basket to open before removing
        #[arg(long, requires = "season")]
        series: Option<String>,

        /// Season of the basket to open before removing
        #[arg(long, requires = "series")]
        season: Option<u32>,
    },

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration and file locations
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();
    let mut config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    if let Some(user) = cli.user {
        config.store.user = user;
        config.validate().map_err(|e| eyre!("Invalid --user: {}", e))?;
    }

    logging::init_logging(cli.verbose, cli.quiet, &config.logging)
        .map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let ctx = Context::new(config, path_manager);

    match cli.command {
        Commands::Show => show::run_show(&ctx, &output).await,
        Commands::Basket { series, season } => basket::run_basket(&ctx, &series, season, &output).await,
        Commands::Remove {
            entry_id,
            series,
            season,
        } => remove::run_remove(&ctx, &entry_id, series.as_deref().zip(season), &output).await,
        Commands::Config { cmd } => match cmd.unwrap_or(ConfigCommands::Show) {
            ConfigCommands::Show => config::show_config(&ctx, &output),
            ConfigCommands::Init { force } => config::init_config(&ctx, force, &output),
        },
    }
}
