use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ludiks_billing::format::{format_amount, format_events, format_percentage};
use ludiks_billing::prelude::*;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    DefaultTerminal, Frame,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod widgets;
use widgets::*;

const PREFERENCES_PATH: &str = "~/.config/ludiks/usage.json";
const RELOAD_INTERVAL: Duration = Duration::from_secs(5);
const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub enum PopupType {
    CostBreakdown,
}

#[derive(Parser, Debug)]
#[clap(author = "Ludiks", version, about)]
struct Args {
    #[arg(short = 'v')]
    verbose: bool,

    /// Organization payload exported from the Ludiks API
    #[arg(short = 'o', long = "organization")]
    organization: Option<String>,

    /// Billing configuration (defaults to the built-in rate card)
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Print the usage summary and exit instead of starting the dashboard
    #[arg(long = "once")]
    once: bool,

    /// Write logs here while the dashboard is running
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
struct UsagePreferences {
    organization: Option<String>,
    config: Option<String>,
}

fn get_preferences_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(PREFERENCES_PATH).as_ref())
}

fn load_preferences(path: &Path) -> Result<UsagePreferences> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences: {}", path.display()))?;
        let preferences: UsagePreferences = serde_json::from_str(&content)?;
        Ok(preferences)
    } else {
        Ok(UsagePreferences::default())
    }
}

fn save_preferences(path: &Path, preferences: &UsagePreferences) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(preferences)?;
    fs::write(path, content)?;
    Ok(())
}

/// Merges command-line paths into the remembered preferences and loads the
/// billing config. Preferences are only written once the config is valid.
fn resolve_settings(
    preferences_path: &Path,
    organization: Option<String>,
    config: Option<String>,
) -> Result<(BillingConfig, Option<PathBuf>)> {
    let mut preferences = load_preferences(preferences_path).unwrap_or_else(|e| {
        warn!(error = %e, "could not read preferences, using defaults");
        UsagePreferences::default()
    });

    let changed = organization.is_some() || config.is_some();
    if organization.is_some() {
        preferences.organization = organization;
    }
    if config.is_some() {
        preferences.config = config;
    }

    let billing_config = match &preferences.config {
        Some(path) => BillingConfig::from_file(path)?,
        None => BillingConfig::default(),
    };

    // Paths given on the command line become the new remembered defaults.
    if changed {
        if let Err(e) = save_preferences(preferences_path, &preferences) {
            warn!(error = %e, "could not save preferences");
        }
    }

    let organization_path = preferences.organization.map(PathBuf::from);
    Ok((billing_config, organization_path))
}

fn init_logging(args: &Args) -> Result<()> {
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if args.once {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else if let Some(path) = &args.log_file {
        // The terminal belongs to the dashboard, so logs only go to a file.
        let file = fs::File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    Ok(())
}

pub struct AppState {
    pub billing: BillingState,
    pub organization_path: Option<PathBuf>,
    pub last_update: DateTime<Utc>,
    pub is_loading: bool,
    pub spinner_state: usize,
    pub data_loaded: bool,
    pub error_message: Option<String>,
    pub active_popup: Option<PopupType>,
}

impl AppState {
    fn new(config: BillingConfig, organization_path: Option<PathBuf>) -> Self {
        Self {
            billing: BillingState::new(config),
            organization_path,
            last_update: Utc::now(),
            is_loading: false,
            spinner_state: 0,
            data_loaded: false,
            error_message: None,
            active_popup: None,
        }
    }

    fn load_data(&mut self) -> Result<()> {
        self.is_loading = true;
        self.error_message = None;

        let result = match &self.organization_path {
            Some(path) => self.billing.load_organization(path),
            None => Err(anyhow::anyhow!(
                "No organization file configured (use --organization <FILE>)"
            )),
        };

        match &result {
            Ok(_) => {
                self.data_loaded = true;
                self.error_message = None;
            }
            Err(e) => {
                warn!(error = %e, "organization reload failed");
                self.error_message = Some(e.to_string());
                // Keep showing the last good payload if we had one.
                self.data_loaded = self.billing.organization().is_some();
            }
        }

        self.is_loading = false;
        self.last_update = Utc::now();

        result
    }

    fn update_spinner(&mut self) {
        self.spinner_state = (self.spinner_state + 1) % 10;
    }

    pub fn get_spinner_char(&self) -> char {
        const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        FRAMES[self.spinner_state % FRAMES.len()]
    }

    pub fn summary(&self) -> UsageSummary {
        self.billing.summary()
    }

    pub fn banner(&self) -> Option<QuotaBanner> {
        self.billing.banner()
    }

    pub fn currency(&self) -> &str {
        self.billing.config().currency()
    }

    fn toggle_popup(&mut self, popup: PopupType) {
        self.active_popup = if self.active_popup.as_ref() == Some(&popup) {
            None
        } else {
            Some(popup)
        };
    }
}

pub struct App {
    state: Arc<Mutex<AppState>>,
    exit: bool,
}

impl App {
    pub fn new(config: BillingConfig, organization_path: Option<PathBuf>) -> Self {
        let mut app_state = AppState::new(config, organization_path);

        if let Err(e) = app_state.load_data() {
            app_state.error_message = Some(format!("Initial load failed: {}", e));
        }

        Self {
            state: Arc::new(Mutex::new(app_state)),
            exit: false,
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let state_clone = Arc::clone(&self.state);

        tokio::spawn(async move {
            let mut interval = interval(RELOAD_INTERVAL);
            loop {
                interval.tick().await;

                if let Ok(mut state) = state_clone.lock() {
                    let _ = state.load_data();
                }
            }
        });

        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            // Block on input until the next spinner frame is due.
            let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
            let ready = tokio::task::block_in_place(|| event::poll(timeout))?;
            if ready {
                let event = event::read()?;
                self.handle_event(event);
            }

            if last_tick.elapsed() >= TICK_RATE {
                if let Ok(mut state) = self.state.lock() {
                    state.update_spinner();
                }
                last_tick = Instant::now();
            }

            if self.exit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        if let Ok(state) = self.state.lock() {
            let banner_height = if state.banner().is_some() { 4 } else { 0 };

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(banner_height),
                    Constraint::Length(3),
                    Constraint::Length(7),
                    Constraint::Min(6),
                    Constraint::Length(1),
                ])
                .split(area);

            HeaderWidget::render(frame, chunks[0], &state);
            BannerWidget::render(frame, chunks[1], &state);
            ProgressBarsWidget::render(frame, chunks[2], &state);
            StatisticsWidget::render(frame, chunks[3], &state);
            RateCardWidget::render(frame, chunks[4], &state);
            ShortcutsWidget::render(frame, chunks[5], &state);

            match &state.active_popup {
                Some(PopupType::CostBreakdown) => {
                    PopupWidget::render(frame, area, &state);
                }
                None => {}
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key_event) = event {
            if key_event.kind == KeyEventKind::Press {
                match key_event.code {
                    KeyCode::Char('q') => self.exit = true,
                    KeyCode::Char('r') => {
                        if let Ok(mut state) = self.state.lock() {
                            let _ = state.load_data();
                        }
                    }
                    KeyCode::Char('d') => {
                        if let Ok(mut state) = self.state.lock() {
                            state.toggle_popup(PopupType::CostBreakdown);
                        }
                    }
                    KeyCode::Char('x') => {
                        if let Ok(mut state) = self.state.lock() {
                            debug!("quota banner dismissed");
                            state.billing.dismiss_banner();
                        }
                    }
                    KeyCode::Esc => {
                        if let Ok(mut state) = self.state.lock() {
                            state.active_popup = None;
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

fn print_summary(config: BillingConfig, organization_path: Option<&Path>) -> Result<()> {
    let mut billing = BillingState::new(config);
    let path = organization_path.ok_or_else(|| {
        anyhow::anyhow!("No organization file configured (use --organization <FILE>)")
    })?;
    billing.load_organization(path)?;

    let summary = billing.summary();
    let currency = billing.config().currency();
    let quota = summary.quota();

    println!(
        "Organization: {} ({})",
        summary.organization_name().unwrap_or("unknown"),
        summary.plan()
    );
    if quota.is_unlimited() {
        println!("Events: {} (unlimited)", format_events(summary.events_used()));
    } else {
        println!(
            "Events: {} / {} ({}, {} left)",
            format_events(summary.events_used()),
            format_events(quota.events_quota()),
            format_percentage(quota.percentage()),
            format_events(quota.remaining().unwrap_or(0))
        );
    }
    println!(
        "Estimated cost: {}",
        format_amount(summary.estimated_cost(), currency)
    );
    println!(
        "Charged amount: {}",
        format_amount(summary.charged_amount(), currency)
    );

    for charge in summary.breakdown() {
        println!(
            "  {:<22} {:>12} events  {}",
            charge.tier().label(),
            format_events(charge.events()),
            format_amount(charge.subtotal(), currency)
        );
    }

    if let Some(banner) = billing.banner() {
        println!();
        println!("{}: {}", banner.title(), banner.message());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let (config, organization_path) = resolve_settings(
        &get_preferences_path(),
        args.organization.clone(),
        args.config.clone(),
    )?;

    info!(
        organization = ?organization_path,
        free_tier_limit = config.free_tier_limit(),
        "starting ludiks-usage"
    );

    if args.once {
        return print_summary(config, organization_path.as_deref());
    }

    let mut terminal = ratatui::init();
    let mut app = App::new(config, organization_path);

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
