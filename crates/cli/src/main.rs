mod generate;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use graphql_autoquery_config::{find_config, load_config, AutoqueryConfig};
use settings::{parse_header, Overrides, Settings};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "autoquery")]
#[command(
    about = "Generate GraphQL operations and fragments for every root field of a schema",
    long_about = None
)]
#[command(version)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Schema SDL file, or a GraphQL endpoint URL to introspect
    #[arg(value_name = "SCHEMA")]
    schema: Option<String>,

    /// Maximum selection depth, counting the root field
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    depth: Option<u32>,

    /// Output file path (writes to stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP header for introspection requests (can be specified multiple times)
    /// Format: "Header-Name: Header-Value"
    #[arg(long = "header", short = 'H', value_name = "HEADER", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Introspection request timeout in seconds (overrides config file)
    #[arg(long)]
    timeout: Option<u64>,

    /// Number of introspection retry attempts on failure (overrides config file)
    #[arg(long)]
    retry: Option<u32>,

    /// Path to config file (searched for from the current directory if not given)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Force colored output even when not a TTY
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    let config = load_project_config(cli.config.as_deref())?;
    let settings = Settings::resolve(
        Overrides {
            schema: cli.schema,
            depth: cli.depth.map(|depth| depth as usize),
            output: cli.output,
            headers: cli.headers,
            timeout: cli.timeout,
            retry: cli.retry,
        },
        config,
    )?;
    tracing::debug!(
        depth = settings.depth,
        output = ?settings.output,
        "Resolved settings"
    );

    let start_time = std::time::Instant::now();
    let output = generate::run(&settings).await?;

    if let Some(path) = &settings.output {
        generate::write_document(path, &output.document)?;

        if !cli.quiet {
            eprintln!(
                "{} Wrote {} operations and {} fragments to {}",
                "✓".green(),
                output.summary.operations,
                output.summary.fragments,
                path.display().to_string().cyan()
            );
            eprintln!(
                "  {} {:.2}s",
                "⏱".dimmed(),
                start_time.elapsed().as_secs_f64()
            );
        }
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.document.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

/// Loads the config named by `--config`, or the nearest one found by walking
/// up from the current directory.
fn load_project_config(explicit: Option<&Path>) -> Result<Option<AutoqueryConfig>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let current_dir = std::env::current_dir()?;
            match find_config(&current_dir).context("Failed to search for config")? {
                Some(path) => path,
                None => return Ok(None),
            }
        }
    };

    let config = load_config(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    Ok(Some(config))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn configure_colors(force_color: bool, no_color: bool) {
    let env = |name: &str| std::env::var_os(name);
    if let Some(enabled) = color_override(force_color, no_color, env) {
        colored::control::set_override(enabled);
    }
}

/// Decides whether to override TTY detection for colored output.
///
/// Flags win over the environment. `NO_COLOR` disables colors when present
/// with any value, `CLICOLOR_FORCE` forces them when set to anything but
/// empty or `0`, and `CLICOLOR=0` disables them. `None` leaves the decision
/// to the `colored` crate.
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn color_override<F>(force_color: bool, no_color: bool, env: F) -> Option<bool>
where
    F: Fn(&str) -> Option<std::ffi::OsString>,
{
    if force_color {
        return Some(true);
    }
    if no_color || env("NO_COLOR").is_some() {
        return Some(false);
    }
    if let Some(value) = env("CLICOLOR_FORCE") {
        return (!value.is_empty() && value != "0").then_some(true);
    }
    match env("CLICOLOR") {
        Some(value) if value == "0" => Some(false),
        _ => None,
    }
}
