//! Command-line front end for the ktech core.
//!
//! # Responsibility
//! - Map one subcommand to one `AppStore` action against the local database.
//! - Keep output plain and line-oriented for scripting.

use chrono::Local;
use clap::{Parser, Subcommand};
use ktech_core::db::open_db;
use ktech_core::model::settings::is_supported_language;
use ktech_core::{
    fetch_or_fallback, init_logging, AppConfig, AppError, AppStore, HttpDemoTodoSource,
    LogConfig, NewTask, Priority, Settings, SignupRequest, SqliteKvRepository, SystemClock, Task,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

/// Personal task manager.
#[derive(Parser)]
#[command(name = "ktech", version, about)]
struct Cli {
    /// Database file; overrides `KTECH_DB_PATH`.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check core linkage.
    Ping,
    /// Print the core version.
    Version,
    /// Create an account and sign in.
    Signup {
        username: String,
        email: String,
        password: String,
        /// Defaults to `password`.
        #[arg(long)]
        confirm: Option<String>,
    },
    /// Sign in with an existing account.
    Login { email: String, password: String },
    /// End the current session.
    Logout,
    /// Add a task.
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// low | medium | high
        #[arg(short, long, default_value = "medium", value_parser = parse_priority)]
        priority: Priority,
        /// `YYYY-MM-DD` or RFC 3339.
        #[arg(long, default_value = "")]
        due: String,
        #[arg(short, long, default_value = "personal")]
        category: String,
    },
    /// List tasks.
    List {
        /// Only favorites.
        #[arg(long)]
        favorites: bool,
    },
    /// Toggle a task's completed flag.
    Done { id: String },
    /// Toggle a task's favorite flag.
    Favorite { id: String },
    /// Delete a task.
    Delete { id: String },
    /// Show task statistics.
    Stats,
    /// Show generated notifications.
    Notifications,
    /// Show or change settings.
    Settings {
        #[arg(long)]
        toggle_notifications: bool,
        #[arg(long)]
        toggle_dark_mode: bool,
        #[arg(long)]
        language: Option<String>,
    },
    /// Show the demo todo feed.
    Feed,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_command module=cli status=error");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Command::Ping => {
            println!("ktech_core ping={}", ktech_core::ping());
            return Ok(());
        }
        Command::Version => {
            println!("ktech_core version={}", ktech_core::core_version());
            return Ok(());
        }
        _ => {}
    }

    let mut config = AppConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(log_dir) = &config.log_dir {
        let log_dir = std::env::current_dir()?.join(log_dir);
        let mut log_config = LogConfig::new(config.log_level, log_dir);
        log_config.duplicate_to_stderr = true;
        init_logging(&log_config)?;
    }

    if let Command::Feed = cli.command {
        let source = HttpDemoTodoSource::new(config.feed_url.clone());
        for todo in fetch_or_fallback(&source, config.feed_limit) {
            let mark = if todo.completed { "x" } else { " " };
            println!("[{mark}] {:>3} {}", todo.id, todo.title);
        }
        return Ok(());
    }

    let conn = open_db(&config.db_path)?;
    let repo = SqliteKvRepository::try_new(&conn)?;
    let mut store = AppStore::load(repo, SystemClock, &config)?;

    match cli.command {
        Command::Signup {
            username,
            email,
            password,
            confirm,
        } => {
            let request = SignupRequest {
                username,
                email,
                confirm_password: confirm.unwrap_or_else(|| password.clone()),
                password,
            };
            let user = store.signup(&request)?;
            println!("signed up as {} <{}>", user.username, user.email);
        }
        Command::Login { email, password } => {
            let user = store.login(&email, &password)?;
            println!("signed in as {} (member since {})", user.username, user.member_since());
        }
        Command::Logout => {
            store.logout()?;
            println!("signed out");
        }
        Command::Add {
            title,
            description,
            priority,
            due,
            category,
        } => {
            let id = store.add_task(NewTask {
                title,
                description,
                priority,
                due_date: due,
                category,
            })?;
            println!("{id}");
        }
        Command::List { favorites } => {
            let tasks: Vec<&Task> = if favorites {
                store.favorites()
            } else {
                store.tasks().iter().collect()
            };
            for task in tasks {
                print_task(task);
            }
        }
        Command::Done { id } => {
            let completed = store.toggle_completed(&id)?;
            println!("{id} completed={completed}");
        }
        Command::Favorite { id } => {
            let favorite = store.toggle_favorite(&id)?;
            println!("{id} favorite={favorite}");
        }
        Command::Delete { id } => {
            let removed = store.delete_task(&id)?;
            println!("deleted {}", removed.title);
        }
        Command::Stats => {
            let stats = store.stats();
            let favorites = store.favorite_stats();
            println!(
                "total={} completed={} pending={} overdue={} rate={}%",
                stats.total,
                stats.completed,
                stats.pending(),
                stats.overdue,
                stats.completion_rate()
            );
            println!(
                "favorites={} completed={} pending={} high_priority={}",
                favorites.total, favorites.completed, favorites.pending, favorites.high_priority
            );
        }
        Command::Notifications => {
            let feed = store.notifications();
            println!("unread={}", feed.unread_count());
            for item in feed.items() {
                println!(
                    "{} [{}] {}: {}",
                    item.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                    item.kind.as_str(),
                    item.title,
                    item.message
                );
            }
        }
        Command::Settings {
            toggle_notifications,
            toggle_dark_mode,
            language,
        } => {
            let change = SettingsChange {
                toggle_notifications,
                toggle_dark_mode,
                language,
            };
            if let Some(next) = change.apply_to(store.settings())? {
                store.update_settings(next)?;
            }
            let settings = store.settings();
            println!(
                "notifications={} dark_mode={} language={}",
                settings.notifications, settings.dark_mode, settings.language
            );
        }
        Command::Ping | Command::Version | Command::Feed => {}
    }
    Ok(())
}

/// Flags of the `settings` command, applied as a single update.
#[derive(Debug, Default)]
struct SettingsChange {
    toggle_notifications: bool,
    toggle_dark_mode: bool,
    language: Option<String>,
}

impl SettingsChange {
    /// Returns the settings to commit, or `None` when no flag was given.
    fn apply_to(&self, current: &Settings) -> Result<Option<Settings>, AppError> {
        if let Some(code) = &self.language {
            if !is_supported_language(code) {
                return Err(AppError::UnsupportedLanguage(code.clone()));
            }
        }
        if !self.toggle_notifications && !self.toggle_dark_mode && self.language.is_none() {
            return Ok(None);
        }

        let mut next = current.clone();
        if self.toggle_notifications {
            next.notifications = !next.notifications;
        }
        if self.toggle_dark_mode {
            next.dark_mode = !next.dark_mode;
        }
        if let Some(code) = &self.language {
            next.language = code.clone();
        }
        Ok(Some(next))
    }
}

fn print_task(task: &Task) {
    let done = if task.completed { "x" } else { " " };
    let star = if task.favorite { "*" } else { " " };
    let due = if task.due_date.is_empty() {
        String::new()
    } else {
        format!(" due={}", task.due_date)
    };
    println!(
        "[{done}]{star} {} {} ({}, {}){due}",
        task.id,
        task.title,
        task.priority.as_str(),
        task.category
    );
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::parse(value).ok_or_else(|| format!("unknown priority `{value}`"))
}
