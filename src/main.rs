use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use setting_controls::config::{self, Config};
use setting_controls::preferences::Preferences;
use setting_controls::tui;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

// Default Configuration Constants
/// Default log level when not specified
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file path (no logging to file)
const DEFAULT_LOG_FILE: &str = "/dev/null";

#[derive(Parser)]
#[command(name = "setting-controls")]
#[command(
    about = "Edit typed preferences",
    long_about = "Edit typed preferences\n\nIf no command is specified, the program starts the interactive editor."
)]
struct Cli {
    /// Set log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Log file path (default: /dev/null for no logging)
    #[arg(short = 'F', long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every preference with its current value
    Show,
    /// Parse and store a new value for a preference
    Set {
        /// Preference name (see `show`)
        name: String,
        /// Value in the preference's text form
        value: String,
    },
    /// Restore a preference to its default value
    Reset {
        /// Preference name (see `show`)
        name: String,
    },
    /// Display current configuration
    Config,
}

fn init_logging(log_level: &str, log_file: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_file, e);
            return;
        }
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Resolve log configuration from CLI args and config file
/// CLI arguments take precedence over config file
fn resolve_log_config<'a>(cli: &'a Cli, config: &'a Config) -> (&'a str, &'a str) {
    let log_level = if cli.log_level != DEFAULT_LOG_LEVEL {
        cli.log_level.as_str()
    } else {
        config.log_level.as_str()
    };

    let log_file = if cli.log_file != DEFAULT_LOG_FILE {
        cli.log_file.as_str()
    } else {
        config.log_file.as_str()
    };

    (log_level, log_file)
}

/// Handle the config command - display current configuration
fn handle_config_command(cfg: &Config) {
    let (path_str, exists) = match config::get_config_path() {
        Some(path) => {
            let exists = path.exists();
            (path.display().to_string(), exists)
        }
        None => ("Unable to determine config path".to_string(), false),
    };

    println!("Configuration File: {} (Exists: {})", path_str, if exists { "yes" } else { "no" });
    println!();
    println!("Current Configuration:");
    println!("=====================");
    println!("log_level: {}", cfg.log_level);
    println!("log_file: {}", cfg.log_file);
    println!("use_unicode: {}", cfg.use_unicode);
    println!();
    println!("[theme]");
    println!("selection_fg: {}", config::format_color(cfg.theme.selection_fg));
    println!("text_fg: {}", config::format_color(cfg.theme.text_fg));
    println!("error_bg: {}", config::format_color(cfg.theme.error_bg));
    println!(
        "disabled_fg: {}{}",
        config::format_color(cfg.theme.disabled_fg()),
        if cfg.theme.disabled_fg.is_none() { " (auto: 50% darker)" } else { "" }
    );
    println!();
    println!("[settings]");
    for (name, text) in &cfg.settings {
        println!("{}: {}", name, text.escape_debug());
    }
}

fn handle_show_command(prefs: &Preferences) {
    let settings = prefs.all();
    let name_width = settings.iter().map(|s| s.name().len()).max().unwrap_or(0);

    for setting in settings {
        let mut flags = Vec::new();
        if setting.is_default() {
            flags.push("default");
        }
        if setting.readonly() {
            flags.push("readonly");
        }
        let flags = if flags.is_empty() {
            String::new()
        } else {
            format!(" ({})", flags.join(", "))
        };
        println!(
            "{:<name_width$} = {}{}",
            setting.name(),
            setting.to_text().escape_debug(),
            flags,
            name_width = name_width,
        );
        println!(
            "{:<name_width$}   {} ({})",
            "",
            setting.description(),
            setting.type_name(),
            name_width = name_width,
        );
    }
}

/// Change one preference and persist the result
fn handle_set_command(
    prefs: &Preferences,
    cfg: &mut Config,
    name: &str,
    value: Option<&str>,
) -> anyhow::Result<()> {
    let Some(setting) = prefs.find(name) else {
        bail!("unknown setting {:?} (run `show` for the list)", name);
    };
    if setting.readonly() {
        bail!("setting {} is readonly", name);
    }

    let changed = match value {
        Some(text) => setting
            .set_text(text)
            .with_context(|| format!("cannot set {}", name))?,
        None => {
            let was_default = setting.is_default();
            setting.reset();
            !was_default
        }
    };
    tracing::info!("SETTING: {} = {:?} (changed: {})", name, setting.to_text(), changed);

    prefs.store(&mut cfg.settings);
    config::write(cfg).context("failed to save configuration")?;
    println!("{} = {}", name, setting.to_text().escape_debug());
    Ok(())
}

fn execute_command(prefs: &Preferences, cfg: &mut Config, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Show => {
            handle_show_command(prefs);
            Ok(())
        }
        Commands::Config => {
            handle_config_command(cfg);
            Ok(())
        }
        Commands::Set { name, value } => handle_set_command(prefs, cfg, &name, Some(&value)),
        Commands::Reset { name } => handle_set_command(prefs, cfg, &name, None),
    }
}

/// Run the interactive editor, then persist whatever was edited
fn run_tui_mode(prefs: &Preferences, cfg: &mut Config) -> anyhow::Result<()> {
    tui::run(prefs, cfg).context("error running editor")?;

    prefs.store(&mut cfg.settings);
    config::write(cfg).context("failed to save configuration")?;
    tracing::info!("CONFIG: saved {} stored settings", cfg.settings.len());
    Ok(())
}

fn main() {
    let (mut config, load_error) = match config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let cli = Cli::parse();

    // Resolve and initialize logging
    let (log_level, log_file) = resolve_log_config(&cli, &config);
    if log_file != DEFAULT_LOG_FILE {
        init_logging(log_level, log_file);
    }

    // Saving is refused later if the file exists but does not parse
    if let Some(e) = load_error {
        eprintln!("Warning: {}; using default configuration", e);
        tracing::warn!("CONFIG: using defaults: {}", e);
    }

    let prefs = Preferences::new();
    prefs.load(&config.settings);

    let result = match cli.command {
        None => run_tui_mode(&prefs, &mut config),
        Some(command) => execute_command(&prefs, &mut config, command),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
