//! # taskpad
//!
//! A terminal task manager with a CLI for quick entry and a TUI with three
//! views: pending tasks, recently completed tasks, and a profile page with
//! daily statistics.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! ```bash
//! taskpad
//! # or explicitly
//! taskpad ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `Tab` / `Shift+Tab`: Switch between Pending, Completed and Profile
//! *   `a`: Add new task
//! *   `e`: Edit selected task (title, description, days)
//! *   `Space`: Mark selected task as Done
//! *   `d`: Delete selected task
//! *   `q`: Quit
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! taskpad add "Write report" --description "Quarterly numbers" --days 3
//! taskpad list
//! taskpad complete <ID>
//! taskpad completed
//! taskpad stats
//! taskpad profile set --name "Ada" --email ada@example.com --role Developer
//! ```
//!
//! ## Data Storage
//!
//! Tasks are saved as `tasks.json` (and the profile as `profile.json`) in
//! the local data directory, e.g. `~/.local/share/taskpad/` on Linux.
//! Override it with `TASKPAD_DATA_DIR` or `data_dir` in the config file
//! (`~/.config/taskpad/config.toml`, or `TASKPAD_CONFIG`).
//!
//! ## Logging
//!
//! Set `TASKPAD_LOG` (e.g. `debug`) to change verbosity. The CLI logs to
//! stderr, the TUI to `taskpad.log` in the data directory.

use std::fs::{self, OpenOptions};
use std::io;
use std::sync::Mutex;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use taskpad::commands::*;
use taskpad::config::Config;
use taskpad::error::exit_codes;
use taskpad::storage::TaskStore;
use taskpad::tui::run_tui;

#[derive(Parser)]
#[command(name = "taskpad")]
#[command(about = "Simple local task manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (at most 25 characters)
        title: String,
        /// What needs to be done
        #[arg(short, long)]
        description: String,
        /// Days until the deadline
        #[arg(short = 'D', long)]
        days: Option<u32>,
    },
    /// List pending tasks, earliest deadline first
    List,
    /// List the 20 most recently completed tasks
    Completed,
    /// Show a single task
    Show {
        id: u64,
    },
    /// Mark a task as complete
    Complete {
        id: u64,
    },
    /// Edit a pending task
    Edit {
        id: u64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New number of days, counted from creation
        #[arg(short = 'D', long, conflicts_with = "no_deadline")]
        days: Option<u32>,
        /// Remove the deadline
        #[arg(long)]
        no_deadline: bool,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Show today's statistics
    Stats,
    /// Show or update the profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Delete all tasks and the profile
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Print the profile
    Show,
    /// Update profile fields
    Set {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        #[arg(short, long)]
        role: Option<String>,
        /// Path or URI of the profile picture
        #[arg(short, long)]
        picture: Option<String>,
    },
}

fn init_logging(config: &Config, to_file: bool) {
    let filter = EnvFilter::try_new(&config.log).unwrap_or_else(|_| EnvFilter::new("warn"));

    if to_file {
        // Logging to stderr would draw over the TUI.
        let dir = config.resolve_data_dir();
        let file = fs::create_dir_all(&dir)
            .and_then(|_| OpenOptions::new().create(true).append(true).open(dir.join("taskpad.log")));
        if let Ok(file) = file {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(filter)
                .init();
        }
        return;
    }

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    };
    let interactive = matches!(cli.command, Some(Commands::Ui) | None);
    init_logging(&config, interactive);

    let store = TaskStore::from_config(&config);

    let result = match cli.command {
        Some(Commands::Add { title, description, days }) => cmd_add(&store, title, description, days),
        Some(Commands::List) => cmd_list(&store),
        Some(Commands::Completed) => cmd_completed(&store),
        Some(Commands::Show { id }) => cmd_show(&store, id),
        Some(Commands::Complete { id }) => cmd_complete(&store, id),
        Some(Commands::Edit { id, title, description, days, no_deadline }) => {
            cmd_edit(&store, id, title, description, days, no_deadline)
        }
        Some(Commands::Remove { id }) => cmd_remove(&store, id),
        Some(Commands::Stats) => cmd_stats(&store),
        Some(Commands::Profile { command }) => match command {
            ProfileCommands::Show => cmd_profile_show(&store),
            ProfileCommands::Set { name, email, role, picture } => {
                cmd_profile_set(&store, name, email, role, picture)
            }
        },
        Some(Commands::Reset { force }) => cmd_reset(&store, force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    std::process::exit(exit_codes::USER_ERROR);
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "taskpad", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui(store) {
                eprintln!("Error running TUI: {}", e);
                std::process::exit(exit_codes::OPERATION_FAILED);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if e.is_retryable() {
            eprintln!("Nothing was changed; try again.");
        }
        std::process::exit(e.exit_code());
    }
}
