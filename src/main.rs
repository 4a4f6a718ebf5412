use anyhow::Result;
use clap::{Parser, Subcommand};

use repopulse::cli::{self, OutputFormat, Selection};
use repopulse::metrics::DateRange;
use repopulse::{config, logging, web};

#[derive(Debug, Parser)]
#[command(name = "repopulse")]
#[command(about = "Repository activity dashboard: commits, stars, forks, issues and more")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show headline cards with trends for the selected window
    Summary {
        /// Repository in owner/name form (default: from config)
        #[arg(long)]
        repo: Option<String>,
        /// Window length in days: 7, 14 or 30
        #[arg(long)]
        days: Option<DateRange>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Print the daily rows behind the dashboard
    Series {
        /// Repository in owner/name form (default: from config)
        #[arg(long)]
        repo: Option<String>,
        /// Window length in days: 7, 14 or 30
        #[arg(long)]
        days: Option<DateRange>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Interactive dashboard: switch windows by typing 7, 14 or 30
    Watch {
        /// Repository in owner/name form (default: from config)
        #[arg(long)]
        repo: Option<String>,
        /// Initial window length in days
        #[arg(long)]
        days: Option<DateRange>,
    },
    /// Launch the web dashboard
    Web {
        /// Address to bind (default: from config, 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
        /// Don't open the browser automatically
        #[arg(long)]
        no_open: bool,
    },
    /// Check config files and metrics endpoint reachability
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default global config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a value in the global config, e.g. `source.repo owner/name`
    Set { key: String, value: String },
    /// Restore the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let cfg = config::load();
    logging::init(&cfg.logging);

    match app.command {
        Commands::Summary { repo, days, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_summary(&cfg, Selection::resolve(&cfg, repo, days), fmt)
        }
        Commands::Series { repo, days, format } => {
            let fmt = OutputFormat::from_str_opt(Some(&format));
            cli::run_series(&cfg, Selection::resolve(&cfg, repo, days), fmt)
        }
        Commands::Watch { repo, days } => cli::run_watch(&cfg, Selection::resolve(&cfg, repo, days)),
        Commands::Web { addr, no_open } => {
            let addr = addr.unwrap_or_else(|| cfg.web.addr.clone());
            let open = cfg.web.open_browser && !no_open;
            web::serve(&web::WebContext::from_config(&cfg), &addr, open)
        }
        Commands::Health => cli::run_health(&cfg),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
