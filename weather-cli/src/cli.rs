use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Confirm, Password, Select};
use weather_widget_core::{
    Config, FileSurface, Options, OutputSurface, RenderOutcome, StdoutSurface, WeatherWidget,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-widget", version, about = "Render local weather as an HTML snippet")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and display preferences in the config file.
    Configure,

    /// Look up the current location and render its weather.
    Show(ShowArgs),

    /// Print where the config file lives.
    ConfigPath,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Weatherbit API key; overrides the config file.
    #[arg(long)]
    key: Option<String>,

    /// Element the markup is written into, e.g. "#app".
    #[arg(long)]
    selector: Option<String>,

    /// Unit system: M (metric) or I (imperial).
    #[arg(long)]
    units: Option<String>,

    /// Message template, e.g. "It's {temperature} in {city}".
    #[arg(long)]
    message: Option<String>,

    /// Show the weather icon.
    #[arg(long)]
    icon: Option<bool>,

    /// Message shown when the weather can't be loaded.
    #[arg(long)]
    error: Option<String>,

    /// Write the markup to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Read options from this file instead of the default config location.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ShowArgs {
    fn overrides(&self) -> Options {
        Options {
            api_key: self.key.clone(),
            selector: self.selector.clone(),
            units: self.units.clone(),
            message: self.message.clone(),
            icon: self.icon,
            error: self.error.clone(),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show(args) => show(args).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if config.has_api_key() {
        println!("An API key is already configured; entering a new one replaces it.");
    }

    let api_key = Password::new("Weatherbit API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let units = Select::new("Units:", vec!["M (metric)", "I (imperial)"])
        .prompt()
        .context("Failed to read units")?;

    let icon = Confirm::new("Show the weather icon?")
        .with_default(config.widget.icon.unwrap_or(true))
        .prompt()
        .context("Failed to read icon preference")?;

    config.widget.api_key = Some(api_key.trim().to_string());
    config.widget.units = units.split_whitespace().next().map(str::to_string);
    config.widget.icon = Some(icon);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let options = config.widget.merge(args.overrides());
    let widget = WeatherWidget::new(options);

    let mut surface: Box<dyn OutputSurface> = match &args.output {
        Some(path) => Box::new(FileSurface::new(path)),
        None => Box::new(StdoutSurface::new()),
    };

    match widget.run(surface.as_mut()).await? {
        RenderOutcome::Rendered(observation) => {
            tracing::debug!(observed_at = %observation.observed_at, "Observation rendered");
        }
        RenderOutcome::Failed(e) if e.is_config_error() => {
            eprintln!("{e}");
            eprintln!("Hint: run `weather-widget configure` or pass the option as a flag.");
        }
        RenderOutcome::Failed(_) => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_flags_become_overrides() {
        let cli = Cli::parse_from([
            "weather-widget",
            "show",
            "--key",
            "K",
            "--units",
            "I",
            "--icon",
            "false",
        ]);

        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        let overrides = args.overrides();
        assert_eq!(overrides.api_key.as_deref(), Some("K"));
        assert_eq!(overrides.units.as_deref(), Some("I"));
        assert_eq!(overrides.icon, Some(false));
        assert_eq!(overrides.selector, None);
    }

    #[test]
    fn flags_override_config_file_per_field() {
        let file = Options {
            api_key: Some("FILE".into()),
            message: Some("{city}".into()),
            ..Options::default()
        };
        let cli = Cli::parse_from(["weather-widget", "show", "--message", "{temperature}"]);
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };

        let merged = file.merge(args.overrides());
        assert_eq!(merged.api_key.as_deref(), Some("FILE"));
        assert_eq!(merged.message.as_deref(), Some("{temperature}"));
    }
}
