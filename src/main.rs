//! copylink: a terminal page viewer with a copy-link button.
//!
//! This is the entry point of the application. It parses command-line arguments,
//! loads configuration, sets up logging and runs the event loop that drives the
//! copy-link widget.

mod app;
mod clipboard;
mod config;
mod events;
mod location;
mod tooltip;
mod tui;
mod widget;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use clap::builder::styling::{AnsiColor, Effects, Style};
use clap::builder::Styles;
use clap::{CommandFactory, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::app::{App, AppAction, Page};
use crate::clipboard::{ClipboardWriter, SystemClipboard};
use crate::config::Config;
use crate::events::Event;
use crate::location::Location;
use crate::tooltip::Placement;
use crate::widget::{CopyLinkWidget, TooltipOptions, TriggerId};

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(
    name = "copylink",
    version,
    about = "Terminal page viewer with a copy-link button",
    styles = help_styles(),
    color = clap::ColorChoice::Always,
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Path to copylink.toml configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Ignore any copylink.toml in the current directory.
    #[arg(long)]
    no_config: bool,
    /// Add a page by URL (repeatable).
    #[arg(long = "url")]
    urls: Vec<String>,
    /// How long the tooltip stays up after a copy (ms).
    #[arg(long)]
    hide_delay_ms: Option<u64>,
    /// Tooltip position relative to the button.
    #[arg(long, value_enum)]
    placement: Option<Placement>,
    /// Write logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Use plain ASCII in the TUI.
    #[arg(long)]
    no_symbols: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Copy a URL (or the first configured page) without starting the TUI.
    Copy { url: Option<String> },
    /// Show help information.
    Help,
    /// Show version information.
    Version,
}

/// Effective settings after merging the config file and CLI flags.
#[derive(Debug)]
struct Settings {
    tooltip: TooltipOptions,
    pages: Vec<Page>,
    log_file: Option<PathBuf>,
    use_symbols: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Some(Commands::Help) => {
            Cli::command().print_help()?;
            println!();
            return Ok(());
        }
        Some(Commands::Version) => {
            println!("copylink {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let settings = load_settings(&cli)?;
    let headless = matches!(cli.command, Some(Commands::Copy { .. }));
    init_logging(settings.log_file.as_deref(), headless)?;

    if let Some(Commands::Copy { url }) = cli.command {
        return run_copy(url, &settings, Arc::new(SystemClipboard)).await;
    }
    run_tui(settings).await
}

async fn run_tui(settings: Settings) -> Result<()> {
    if settings.pages.is_empty() {
        bail!("no pages defined (use copylink.toml or --url URL)");
    }

    let (event_tx, mut event_rx) = mpsc::channel(256);
    let mut terminal = tui::init_terminal().context("failed to initialize terminal")?;

    let location = Location::default();
    let reader = location.clone();
    let widget = CopyLinkWidget::initialize(
        settings.tooltip,
        &[TriggerId::HEADER, TriggerId::FOOTER],
        Arc::new(SystemClipboard),
        move || reader.href(),
    );
    let mut app = App::new(settings.pages, location, widget, settings.use_symbols);

    spawn_input_listener(event_tx.clone());
    spawn_signal_listener(event_tx.clone());

    let mut ticker = tokio::time::interval(Duration::from_millis(150));
    let mut result = Ok(());

    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => handle_event(event, &mut app, &event_tx),
            _ = ticker.tick() => {}
        }

        if let Err(err) = tui::draw(&mut app, &mut terminal) {
            result = Err(err.into());
            break;
        }
        if app.should_quit {
            break;
        }
    }

    tui::restore_terminal(terminal)?;
    info!("exiting");
    result
}

fn handle_event(event: Event, app: &mut App, event_tx: &mpsc::Sender<Event>) {
    match event {
        Event::CopyFinished { trigger, outcome } => app.widget.finish_copy(trigger, outcome, event_tx),
        Event::HideTooltip { trigger } => app.widget.hide(trigger),
        Event::Key(key) => {
            let action = app.handle_key(key);
            handle_app_action(action, app, event_tx);
        }
        Event::Mouse(mouse) => {
            let action = app.handle_mouse(mouse);
            handle_app_action(action, app, event_tx);
        }
        // Terminal::draw resizes on its own.
        Event::Resize => {}
        Event::Shutdown => app.should_quit = true,
    }
}

fn handle_app_action(action: AppAction, app: &mut App, event_tx: &mpsc::Sender<Event>) {
    match action {
        AppAction::Quit => app.should_quit = true,
        AppAction::Copy(trigger) => {
            app.widget.copy(trigger, event_tx);
        }
        AppAction::None => {}
    }
}

/// Copy once and report on stdout.
async fn run_copy(
    url: Option<String>,
    settings: &Settings,
    clipboard: Arc<dyn ClipboardWriter>,
) -> Result<()> {
    let text = match url {
        Some(url) => url,
        None => match settings.pages.first() {
            Some(page) => page.url.clone(),
            None => bail!("nothing to copy (pass a URL or configure a page)"),
        },
    };
    info!(url = %text, "copying");
    match clipboard::write_in_background(clipboard, text).await {
        Ok(()) => {
            println!("{}", settings.tooltip.success_message);
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "copy failed");
            bail!("{} ({})", settings.tooltip.failure_message, err)
        }
    }
}

fn spawn_input_listener(tx: mpsc::Sender<Event>) {
    std::thread::spawn(move || loop {
        if crossterm::event::poll(Duration::from_millis(100)).unwrap_or(false) {
            let event = match crossterm::event::read() {
                Ok(crossterm::event::Event::Key(key)) => Event::Key(key),
                Ok(crossterm::event::Event::Mouse(mouse)) => Event::Mouse(mouse),
                Ok(crossterm::event::Event::Resize(..)) => Event::Resize,
                _ => continue,
            };
            if tx.blocking_send(event).is_err() {
                break;
            }
        }
    });
}

fn spawn_signal_listener(tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(signal) => signal,
                Err(_) => return,
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }
        let _ = tx.send(Event::Shutdown).await;
    });
}

fn init_logging(log_file: Option<&Path>, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env("COPYLINK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None if headless => builder.with_writer(std::io::stderr).init(),
        // The TUI owns stdout and stderr.
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let config = if cli.no_config {
        Config::default()
    } else {
        match cli.config.clone().or_else(default_config_path) {
            Some(path) => config::load_config(&path)?,
            None => Config::default(),
        }
    };
    settings_from(cli, config)
}

fn settings_from(cli: &Cli, config: Config) -> Result<Settings> {
    let defaults = TooltipOptions::default();
    let hide_delay = cli
        .hide_delay_ms
        .or(config.hide_delay_ms)
        .map(Duration::from_millis)
        .unwrap_or(defaults.hide_delay);
    let tooltip = TooltipOptions {
        placement: cli.placement.or(config.placement).unwrap_or(defaults.placement),
        hide_delay,
        success_message: config.success_message.unwrap_or(defaults.success_message),
        failure_message: config.failure_message.unwrap_or(defaults.failure_message),
    };

    let mut pages = Vec::new();
    for page in config.pages {
        ensure!(!page.url.trim().is_empty(), "page with empty url in config");
        pages.push(Page::new(page.title, page.url, page.body));
    }
    for url in &cli.urls {
        ensure!(!url.trim().is_empty(), "empty --url");
        pages.push(Page::new(None, url.clone(), None));
    }

    Ok(Settings {
        tooltip,
        pages,
        log_file: cli.log_file.clone().or(config.log_file.map(PathBuf::from)),
        use_symbols: !cli.no_symbols,
    })
}

fn default_config_path() -> Option<PathBuf> {
    let path = Path::new("copylink.toml");
    if path.exists() {
        Some(path.to_path_buf())
    } else {
        None
    }
}

fn help_styles() -> Styles {
    Styles::styled()
        .header(
            Style::new()
                .fg_color(Some(AnsiColor::Cyan.into()))
                .effects(Effects::BOLD),
        )
        .usage(
            Style::new()
                .fg_color(Some(AnsiColor::Green.into()))
                .effects(Effects::BOLD),
        )
        .literal(Style::new().fg_color(Some(AnsiColor::Yellow.into())))
        .placeholder(Style::new().fg_color(Some(AnsiColor::Magenta.into())))
        .invalid(
            Style::new()
                .fg_color(Some(AnsiColor::Red.into()))
                .effects(Effects::BOLD),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::testing::FakeClipboard;
    use crate::config::PageConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["copylink"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn make_app(clipboard: Arc<FakeClipboard>) -> App {
        let cli = parse(&["--no-config", "--url", "https://example.com/a", "--url", "https://example.com/b"]);
        let settings = load_settings(&cli).unwrap();
        let location = Location::default();
        let reader = location.clone();
        let widget = CopyLinkWidget::initialize(
            settings.tooltip,
            &[TriggerId::HEADER, TriggerId::FOOTER],
            clipboard,
            move || reader.href(),
        );
        App::new(settings.pages, location, widget, true)
    }

    #[test]
    fn cli_flags_override_config() {
        let cli = parse(&["--hide-delay-ms", "250", "--placement", "top", "--url", "https://example.com/cli"]);
        let config = Config {
            hide_delay_ms: Some(2000),
            placement: Some(Placement::Bottom),
            success_message: Some("Done".to_string()),
            pages: vec![PageConfig {
                url: "https://example.com/file".to_string(),
                title: Some("File".to_string()),
                body: None,
            }],
            ..Config::default()
        };
        let settings = settings_from(&cli, config).unwrap();
        assert_eq!(settings.tooltip.hide_delay, Duration::from_millis(250));
        assert_eq!(settings.tooltip.placement, Placement::Top);
        assert_eq!(settings.tooltip.success_message, "Done");
        assert_eq!(settings.tooltip.failure_message, "Failed!");
        let urls: Vec<_> = settings.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/file", "https://example.com/cli"]);
    }

    #[test]
    fn defaults_without_config() {
        let settings = load_settings(&parse(&["--no-config"])).unwrap();
        assert_eq!(settings.tooltip.hide_delay, Duration::from_millis(1000));
        assert_eq!(settings.tooltip.placement, Placement::Bottom);
        assert!(settings.pages.is_empty());
        assert!(settings.use_symbols);
    }

    #[test]
    fn empty_url_is_rejected() {
        assert!(load_settings(&parse(&["--no-config", "--url", " "])).is_err());
    }

    #[test]
    fn loads_config_from_path() {
        let path = std::env::temp_dir().join(format!("copylink-test-{}.toml", std::process::id()));
        std::fs::write(&path, "hide_delay_ms = 400\n[[page]]\nurl = \"https://example.com/x\"\n").unwrap();
        let cli = parse(&["--config", path.to_str().unwrap()]);
        let settings = load_settings(&cli).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(settings.tooltip.hide_delay, Duration::from_millis(400));
        assert_eq!(settings.pages[0].url, "https://example.com/x");
    }

    #[tokio::test(start_paused = true)]
    async fn copy_key_flows_through_event_loop() {
        let clipboard = Arc::new(FakeClipboard::default());
        let mut app = make_app(clipboard.clone());
        let (tx, mut rx) = mpsc::channel(16);

        handle_event(Event::Key(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE)), &mut app, &tx);
        handle_event(Event::Key(KeyEvent::new(KeyCode::Char('y'), KeyModifiers::NONE)), &mut app, &tx);

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::CopyFinished { .. }));
        handle_event(event, &mut app, &tx);
        assert_eq!(clipboard.contents().as_deref(), Some("https://example.com/b"));
        assert_eq!(
            app.widget.tooltip(TriggerId::HEADER).unwrap().message(),
            Some("Copied!")
        );

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, Event::HideTooltip { .. }));
        handle_event(event, &mut app, &tx);
        assert!(!app.widget.tooltip(TriggerId::HEADER).unwrap().is_shown());
    }

    #[tokio::test]
    async fn shutdown_event_quits() {
        let mut app = make_app(Arc::new(FakeClipboard::default()));
        let (tx, _rx) = mpsc::channel(4);
        handle_event(Event::Shutdown, &mut app, &tx);
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn headless_copy_uses_first_page() {
        let clipboard = Arc::new(FakeClipboard::default());
        let settings = load_settings(&parse(&["--no-config", "--url", "https://example.com/a"])).unwrap();
        run_copy(None, &settings, clipboard.clone()).await.unwrap();
        assert_eq!(clipboard.contents().as_deref(), Some("https://example.com/a"));
    }

    #[tokio::test]
    async fn headless_copy_failure_is_an_error() {
        let clipboard = Arc::new(FakeClipboard::with_failures(vec![true]));
        let settings = load_settings(&parse(&["--no-config"])).unwrap();
        let err = run_copy(Some("https://example.com/".to_string()), &settings, clipboard.clone())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Failed!"));
        assert!(clipboard.contents().is_none());
    }

    #[test]
    fn no_symbols_flag_turns_off_unicode() {
        let settings = load_settings(&parse(&["--no-config", "--no-symbols"])).unwrap();
        assert!(!settings.use_symbols);
    }

    #[test]
    fn copy_subcommand_parses_url() {
        let cli = parse(&["copy", "https://example.com/"]);
        assert!(matches!(cli.command, Some(Commands::Copy { url: Some(_) })));
    }
}
