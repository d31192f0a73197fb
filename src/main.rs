mod app;
mod cli;
mod config;
mod datasources;
mod error;
mod logic;
mod models;
mod ui;

use anyhow::Context;
use app::App;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use datasources::{ConfiguredLocator, OpenMeteoClient, OpenMeteoGeocoder};
use logic::{AlertEngine, ForecastSession, SessionState};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use ui::screens::WeatherScreen;

const TICK: Duration = Duration::from_millis(50);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(Commands::Init) = cli.command {
        let (_, path) = Config::setup_interactive().context("Setup failed")?;
        println!("Run `agriweather check` to verify {}", path.display());
        return Ok(());
    }

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Run `agriweather init` or copy config/config.yaml.example to config/config.yaml");
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Check) => run_check(&config).await,
        Some(Commands::Lookup { query, json }) => {
            let session = ForecastSession::from_config(&config)?;
            session.lookup_by_text(&query).await;
            finish_one_shot(&session.snapshot().await, json)
        }
        Some(Commands::Locate { json }) => {
            let session = ForecastSession::from_config(&config)?;
            session.lookup_by_device().await;
            finish_one_shot(&session.snapshot().await, json)
        }
        Some(Commands::Init) | None => run_tui(config).await,
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    // Logs go to stderr so they never mix with report output or the TUI frame.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn finish_one_shot(state: &SessionState, json: bool) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(state).context("Failed to serialize forecast")?;
        println!("{}", out);
    } else {
        print_report(state);
    }

    if state.error().is_some() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(state: &SessionState) {
    if let Some(message) = state.error() {
        eprintln!("Error: {}", message);
        return;
    }
    let Some(view) = state.view() else {
        return;
    };

    println!(
        "{} ({:.2}, {:.2})",
        view.geo.display_name(),
        view.geo.latitude(),
        view.geo.longitude()
    );
    if let Some(current) = &view.current {
        println!(
            "Now: {:.0}°C, wind {:.0} km/h",
            current.temp_c, current.wind_speed_kmh
        );
    }
    if let (Some(rise), Some(set)) = (view.sunrise, view.sunset) {
        println!("Sunrise {}  Sunset {}", rise.format("%H:%M"), set.format("%H:%M"));
    }

    println!();
    for day in &view.daily {
        let condition = day.condition();
        println!(
            "{:<12} {} {:<14} {:<10} {}",
            day.day_label(),
            condition.symbol(),
            condition.as_str(),
            day.temp_range_label(),
            day.rain_label()
        );
    }

    println!();
    println!("Next {} hours", view.hourly_window.len());
    match &view.summaries {
        Some(s) => {
            let rows = [
                ("Hottest", s.hottest, "°C"),
                ("Coolest", s.coolest, "°C"),
                ("Rain chance", s.peak_rain_chance, "%"),
                ("Wind", s.peak_wind, " km/h"),
                ("Gusts", s.peak_gust, " km/h"),
            ];
            for (label, extreme, unit) in rows {
                println!(
                    "  {:<12} {:.0}{} at {}",
                    label,
                    extreme.value,
                    unit,
                    extreme.occurred_at.format("%a %H:%M")
                );
            }
        }
        None => println!("  No hourly data"),
    }

    println!();
    println!("Alerts");
    if view.alerts.is_empty() {
        println!("  No weather alerts");
    }
    for alert in &view.alerts {
        println!("  {} {}", alert.kind.symbol(), alert.message);
    }
}

async fn run_check(config: &Config) -> anyhow::Result<()> {
    println!("Config OK");
    println!("  Forecast days: {}", config.forecast_days);
    println!();

    let geocoder = OpenMeteoGeocoder::new(config)?;
    let geocoding_ok = geocoder.test_connection().await.unwrap_or(false);
    println!(
        "Geocoding ({}): {}",
        config.endpoints.geocoding_url,
        if geocoding_ok { "OK" } else { "OFFLINE" }
    );

    let forecast = OpenMeteoClient::new(config)?;
    let forecast_ok = forecast.test_connection().await.unwrap_or(false);
    println!(
        "Forecast ({}): {}",
        config.endpoints.forecast_url,
        if forecast_ok { "OK" } else { "OFFLINE" }
    );

    let locator = ConfiguredLocator::new(config.device.clone());
    println!(
        "Device location: {}",
        if locator.is_available() {
            "configured"
        } else {
            "unavailable"
        }
    );

    println!();
    println!("Alert rules:");
    let engine = AlertEngine::new(config.alerts.clone());
    for (id, name) in engine.list_rules() {
        println!("  {:<12} {}", id, name);
    }
    let t = engine.thresholds();
    println!(
        "  thresholds: rain >= {}mm/day, max >= {}°C, min <= {}°C, gusts >= {} km/h",
        t.heavy_rain_mm, t.heatwave_max_c, t.frost_min_c, t.high_wind_gust_kmh
    );

    if !(geocoding_ok && forecast_ok) {
        std::process::exit(1);
    }
    Ok(())
}

async fn run_tui(config: Config) -> anyhow::Result<()> {
    let mut app = App::new(&config)?;

    // Start with the default location
    app.search();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        app.sync().await;

        terminal.draw(|f| {
            let screen = WeatherScreen::new(&app.snapshot, &app.input)
                .with_status(app.status_message.as_deref());
            f.render_widget(screen, f.area());
        })?;

        // Never block the runtime: lookups run on this thread between frames.
        if event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                handle_key(app, key);
            }
        } else {
            tokio::time::sleep(TICK).await;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char('c') if ctrl => app.quit(),
        KeyCode::Char('l') if ctrl => app.locate(),
        KeyCode::Char('u') if ctrl => app.clear_input(),
        KeyCode::Enter => {
            app.search();
        }
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char(c) if !ctrl => app.push_char(c),
        _ => {}
    }
}
