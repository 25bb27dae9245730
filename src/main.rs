//! netconsole - run and explain vetted commands on network devices
//!
//! Opens a window where the operator fills in a connection profile, picks a
//! catalogued command (or types one), reads what it does and sends it over
//! SSH.

mod app;

use std::env;
use std::path::PathBuf;
use std::process;

use eframe::egui;
use tracing::{debug, error, info, warn};

use netconsole::config::Config;
use netconsole::error::Result;
use netconsole::security_audit;

use app::ConsoleApp;

/// Command line options
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
    /// Write the effective configuration here and exit
    write_config: Option<PathBuf>,
    /// Positional arguments, reported once logging is up
    ignored: Vec<String>,
}

impl AppArgs {
    fn parse() -> Result<Self> {
        Self::parse_from(env::args().skip(1))
    }

    fn parse_from(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut app_args = AppArgs::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => match args.next() {
                    Some(path) => app_args.config_path = Some(PathBuf::from(path)),
                    None => return Err("Missing config file path".into()),
                },
                "--debug" | "-d" => {
                    app_args.debug = true;
                }
                "--write-config" => match args.next() {
                    Some(path) => app_args.write_config = Some(PathBuf::from(path)),
                    None => return Err("Missing output path for --write-config".into()),
                },
                "--help" | "-?" => {
                    print_help();
                    process::exit(0);
                }
                "--version" | "-v" => {
                    println!("netconsole v{}", netconsole::VERSION);
                    process::exit(0);
                }
                other if other.starts_with('-') => {
                    return Err(format!("Unknown option: {}", other).into());
                }
                other => app_args.ignored.push(other.to_string()),
            }
        }

        Ok(app_args)
    }
}

fn print_help() {
    println!("netconsole - run and explain vetted commands on network devices");
    println!();
    println!("USAGE:");
    println!("    netconsole [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <PATH>    Path to configuration file");
    println!("    -d, --debug            Enable debug logging");
    println!("    --write-config <PATH>  Write the effective configuration to PATH and exit");
    println!("    -?, --help             Print this help message");
    println!("    -v, --version          Print version information");
    println!();
    println!("CONFIGURATION:");
    println!("    netconsole looks for configuration files in the following order:");
    println!("    1. Path specified with --config or NETCONSOLE_CONFIG");
    println!("    2. <config dir>/netconsole/config.toml");
    println!("    3. $XDG_CONFIG_HOME/netconsole/config.toml");
    println!("    4. ~/.netconsole/config.toml");
    println!("    5. ~/.config/netconsole/config.toml");
    println!("    6. ./.netconsole/config.toml");
    println!("    7. Built-in defaults");
    println!();
    println!("ENVIRONMENT:");
    println!("    NETCONSOLE_CONFIG      Path to configuration file");
    println!("    NETCONSOLE_DEBUG       Enable debug logging (1 or true)");
    println!("    RUST_LOG               Set logging level (error, warn, info, debug, trace)");
}

fn debug_requested(args: &AppArgs) -> bool {
    args.debug
        || env::var("NETCONSOLE_DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
}

fn main() -> Result<()> {
    let args = AppArgs::parse().unwrap_or_else(|e| {
        eprintln!("{}", e);
        print_help();
        process::exit(1);
    });

    let log_level = if debug_requested(&args) { "debug" } else { "info" };
    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from(env_filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    info!("Starting {} v{}", netconsole::NAME, netconsole::VERSION);
    debug!("Arguments: {:?}", args);
    for arg in &args.ignored {
        warn!("Ignoring positional argument: {}", arg);
    }

    let config = load_configuration(&args);

    if let Some(path) = &args.write_config {
        config.save_to_file(path)?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }
    let native_options = create_native_options();

    if let Err(e) = eframe::run_native(
        "netconsole",
        native_options,
        Box::new(move |cc| {
            let app = ConsoleApp::new(&config, cc.egui_ctx.clone())?;
            Ok(Box::new(app))
        }),
    ) {
        error!("Application failed: {}", e);
        process::exit(1);
    }

    info!("netconsole shutdown complete");
    Ok(())
}

/// Load configuration from file or search paths, falling back to defaults
fn load_configuration(args: &AppArgs) -> Config {
    let config_path = args
        .config_path
        .clone()
        .or_else(|| env::var("NETCONSOLE_CONFIG").ok().map(PathBuf::from));

    let loaded = match &config_path {
        Some(path) => {
            debug!("Loading config from: {}", path.display());
            Config::load_from_file(path)
        }
        None => Config::load(),
    };

    match loaded {
        Ok(config) => {
            debug!("Configuration loaded: {:?}", config);
            config
        }
        Err(e) => {
            warn!("Failed to load configuration: {}", e);
            security_audit::log_config_event(true, Some("falling back to defaults"));
            Config::default()
        }
    }
}

fn create_native_options() -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("netconsole")
            .with_app_id("netconsole")
            .with_inner_size([760.0, 560.0])
            .with_min_inner_size([480.0, 360.0]),
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    }
}
