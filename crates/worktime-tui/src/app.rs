//! Application state for the WorkTime terminal front end.
//!
//! `App` holds the two input fields, the settings dialog draft and the status
//! of the background shell sync. Settings changes arrive through the
//! controller's watch channel; the shell sync reports through an mpsc channel
//! drained by `check_background_tasks`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use worktime_core::i18n::{dictionary, present, Dictionary, ResultView};
use worktime_core::offline::{
    DiskCacheStorage, HttpFetcher, OfflineWorker, ShellManifest, Startup,
};
use worktime_core::settings::KeyValueStore;
use worktime_core::{Config, Currency, Lang, Settings, SettingsController, Theme};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Maximum length of either input field
const MAX_INPUT_LENGTH: usize = 24;

// ============================================================================
// UI State Types
// ============================================================================

/// Which input field receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Wage,
    Price,
}

impl Field {
    pub fn toggle(&self) -> Self {
        match self {
            Field::Wage => Field::Price,
            Field::Price => Field::Wage,
        }
    }
}

/// Row selected in the settings dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Theme,
    Language,
    Currency,
}

impl SettingsRow {
    pub fn next(&self) -> Self {
        match self {
            SettingsRow::Theme => SettingsRow::Language,
            SettingsRow::Language => SettingsRow::Currency,
            SettingsRow::Currency => SettingsRow::Theme,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            SettingsRow::Theme => SettingsRow::Currency,
            SettingsRow::Language => SettingsRow::Theme,
            SettingsRow::Currency => SettingsRow::Language,
        }
    }
}

/// Unsaved values of the settings dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsDraft {
    pub row: SettingsRow,
    pub theme: Theme,
    pub lang: Lang,
    pub currency: Currency,
}

impl SettingsDraft {
    fn from_settings(settings: &Settings) -> Self {
        Self {
            row: SettingsRow::Theme,
            theme: settings.theme,
            lang: settings.lang,
            currency: settings.currency,
        }
    }

    /// Cycle the value of the selected row
    pub fn cycle(&mut self, forward: bool) {
        match (self.row, forward) {
            (SettingsRow::Theme, true) => self.theme = self.theme.next(),
            (SettingsRow::Theme, false) => self.theme = self.theme.prev(),
            // two languages: both directions toggle
            (SettingsRow::Language, _) => self.lang = self.lang.next(),
            (SettingsRow::Currency, true) => self.currency = self.currency.next(),
            (SettingsRow::Currency, false) => self.currency = self.currency.prev(),
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    EditingSettings,
    ShowingHelp,
    Quitting,
}

/// Progress of the offline shell sync shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellStatus {
    /// No shell origin configured
    Disabled,
    Syncing,
    Ready(Startup),
    Failed(String),
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Messages sent from the shell sync task back to the app.
#[derive(Debug)]
enum ShellEvent {
    Started(Startup),
    Failed(String),
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub config: Config,
    pub settings: SettingsController,
    settings_rx: watch::Receiver<Settings>,

    pub state: AppState,
    pub focus: Field,
    pub wage_input: String,
    pub price_input: String,
    pub draft: SettingsDraft,

    /// Result lines for the current inputs
    pub view: ResultView,

    pub shell_status: ShellStatus,

    shell_rx: mpsc::Receiver<ShellEvent>,
    shell_tx: mpsc::Sender<ShellEvent>,
}

impl App {
    /// Create the app around an already chosen settings store.
    pub fn new(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        let settings = SettingsController::load(store);
        let settings_rx = settings.subscribe();
        let current = settings.settings();
        let view = present(&settings.convert(""), current.lang);
        let (shell_tx, shell_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            settings_rx,
            state: AppState::Normal,
            focus: Field::Wage,
            wage_input: current.wage.clone(),
            price_input: String::new(),
            draft: SettingsDraft::from_settings(&current),
            view,
            shell_status: ShellStatus::Disabled,
            shell_rx,
            shell_tx,
            settings,
        }
    }

    pub fn current_settings(&self) -> Settings {
        self.settings.settings()
    }

    /// Strings for the active language
    pub fn dictionary(&self) -> &'static Dictionary {
        dictionary(self.current_settings().lang)
    }

    /// Recompute the result lines from the current price and stored wage.
    pub fn recompute(&mut self) {
        let lang = self.current_settings().lang;
        self.view = present(&self.settings.convert(&self.price_input), lang);
    }

    // =========================================================================
    // Input editing
    // =========================================================================

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggle();
    }

    fn focused_input(&mut self) -> &mut String {
        match self.focus {
            Field::Wage => &mut self.wage_input,
            Field::Price => &mut self.price_input,
        }
    }

    /// Append a character to the focused field if accepted.
    pub fn push_char(&mut self, c: char) {
        let input = self.focused_input();
        if !can_add_input_char(input.chars().count(), c) {
            return;
        }
        input.push(c);
        self.on_input_changed();
    }

    pub fn pop_char(&mut self) {
        if self.focused_input().pop().is_some() {
            self.on_input_changed();
        }
    }

    /// Empty the price field and move focus to it.
    pub fn clear_price(&mut self) {
        self.price_input.clear();
        self.focus = Field::Price;
        self.recompute();
    }

    fn on_input_changed(&mut self) {
        if self.focus == Field::Wage {
            // persisted on every edit; the watch notification triggers recompute
            self.settings.set_wage(self.wage_input.clone());
        }
        self.recompute();
    }

    // =========================================================================
    // Settings dialog
    // =========================================================================

    pub fn open_settings(&mut self) {
        self.draft = SettingsDraft::from_settings(&self.current_settings());
        self.state = AppState::EditingSettings;
    }

    pub fn close_settings(&mut self) {
        self.state = AppState::Normal;
    }

    /// Persist the draft and close the dialog.
    pub fn save_settings(&mut self) {
        let draft = self.draft;
        self.settings.apply(draft.theme, draft.lang, draft.currency);
        self.state = AppState::Normal;
        info!(
            theme = draft.theme.code(),
            lang = draft.lang.code(),
            currency = draft.currency.code(),
            "Settings saved"
        );
    }

    /// Re-render after settings changed. Returns true if there was a change.
    pub fn check_settings_changes(&mut self) -> bool {
        match self.settings_rx.has_changed() {
            Ok(true) => {
                self.settings_rx.borrow_and_update();
                self.recompute();
                true
            }
            _ => false,
        }
    }

    // =========================================================================
    // Offline shell
    // =========================================================================

    /// Spawn a background task bringing the offline shell up, if an origin
    /// is configured.
    pub fn start_shell_sync(&mut self) {
        let manifest = match self.config.shell_manifest() {
            Ok(Some(manifest)) => manifest,
            Ok(None) => {
                debug!("No shell origin configured");
                self.shell_status = ShellStatus::Disabled;
                return;
            }
            Err(e) => {
                warn!(error = %e, "Invalid shell configuration");
                self.shell_status = ShellStatus::Failed(e.to_string());
                return;
            }
        };

        let cache_dir = match self.config.cache_dir() {
            Ok(dir) => dir,
            Err(e) => {
                warn!(error = %e, "No cache directory available");
                self.shell_status = ShellStatus::Failed(e.to_string());
                return;
            }
        };

        let tx = self.shell_tx.clone();
        tokio::spawn(async move {
            let event = match sync_shell(manifest, cache_dir).await {
                Ok(startup) => ShellEvent::Started(startup),
                Err(e) => {
                    warn!(error = %e, "Offline shell sync failed");
                    ShellEvent::Failed(format!("{:#}", e))
                }
            };
            if tx.send(event).await.is_err() {
                debug!("App gone before shell sync finished");
            }
        });

        self.shell_status = ShellStatus::Syncing;
    }

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        while let Ok(event) = self.shell_rx.try_recv() {
            self.shell_status = match event {
                ShellEvent::Started(startup) => ShellStatus::Ready(startup),
                ShellEvent::Failed(message) => ShellStatus::Failed(message),
            };
        }
    }
}

/// Open the on-disk shell cache and restore or install it.
pub async fn sync_shell(manifest: ShellManifest, cache_dir: PathBuf) -> Result<Startup> {
    let worker = open_worker(manifest, cache_dir)?;
    let startup = worker.start().await?;
    Ok(startup)
}

/// Worker over the HTTP fetcher and the on-disk cache at `cache_dir`.
pub fn open_worker(
    manifest: ShellManifest,
    cache_dir: PathBuf,
) -> Result<OfflineWorker<HttpFetcher, DiskCacheStorage>> {
    let fetcher = HttpFetcher::new().context("Failed to create HTTP client")?;
    let caches = DiskCacheStorage::new(cache_dir.clone())
        .with_context(|| format!("Failed to open shell cache {}", cache_dir.display()))?;
    Ok(OfflineWorker::new(manifest, fetcher, caches))
}

// ============================================================================
// Input validation
// ============================================================================

/// Characters that can appear in a typed amount
pub fn is_valid_input_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ',' | '.' | ' ' | '-' | '+')
}

/// Check if a character should be accepted into an input field
pub fn can_add_input_char(current_len: usize, c: char) -> bool {
    current_len < MAX_INPUT_LENGTH && is_valid_input_char(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use worktime_core::settings::MemoryKeyValueStore;

    fn app() -> App {
        App::new(Config::default(), Arc::new(MemoryKeyValueStore::new()))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.push_char(c);
        }
    }

    #[test]
    fn test_new_app_shows_empty_result() {
        let app = app();
        assert_eq!(app.focus, Field::Wage);
        assert_eq!(app.view.sub, "Inserisci paga e prezzo");
        assert!(!app.view.is_error);
    }

    #[test]
    fn test_typing_wage_and_price_computes() {
        let mut app = app();
        type_text(&mut app, "12,50");
        app.toggle_focus();
        type_text(&mut app, "25");

        assert_eq!(app.current_settings().wage, "12,50");
        assert_eq!(app.view.main, "2h 0m");
        assert_eq!(app.view.sub, "≈ 2,00 ore");
    }

    #[test]
    fn test_invalid_wage_shows_error() {
        let mut app = app();
        type_text(&mut app, "0");
        app.toggle_focus();
        type_text(&mut app, "10");
        assert!(app.view.is_error);
    }

    #[test]
    fn test_rejected_chars_leave_input_unchanged() {
        let mut app = app();
        type_text(&mut app, "1a€2");
        assert_eq!(app.wage_input, "12");
    }

    #[test]
    fn test_pop_char_updates_wage() {
        let mut app = app();
        type_text(&mut app, "150");
        app.pop_char();
        assert_eq!(app.wage_input, "15");
        assert_eq!(app.current_settings().wage, "15");
    }

    #[test]
    fn test_clear_price_focuses_price() {
        let mut app = app();
        type_text(&mut app, "10");
        app.toggle_focus();
        type_text(&mut app, "5");
        app.toggle_focus();

        app.clear_price();
        assert_eq!(app.price_input, "");
        assert_eq!(app.focus, Field::Price);
        assert_eq!(app.wage_input, "10");
        assert!(!app.view.is_error);
        assert_eq!(app.view.sub, "Inserisci paga e prezzo");
    }

    #[test]
    fn test_wage_restored_from_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
        {
            let mut first = App::new(Config::default(), store.clone());
            type_text(&mut first, "9,5");
        }
        let second = App::new(Config::default(), store);
        assert_eq!(second.wage_input, "9,5");
    }

    #[test]
    fn test_settings_dialog_save() {
        let mut app = app();
        type_text(&mut app, "10");
        app.toggle_focus();
        type_text(&mut app, "25");

        app.open_settings();
        assert_eq!(app.state, AppState::EditingSettings);
        app.draft.row = SettingsRow::Language;
        app.draft.cycle(true);
        app.draft.row = app.draft.row.next();
        app.draft.cycle(true);
        app.save_settings();

        assert_eq!(app.state, AppState::Normal);
        let settings = app.current_settings();
        assert_eq!(settings.lang, Lang::En);
        assert_eq!(settings.currency, Currency::Usd);

        assert!(app.check_settings_changes());
        assert_eq!(app.view.sub, "≈ 2.50 hours");
        assert!(!app.check_settings_changes());
    }

    #[test]
    fn test_settings_dialog_cancel_discards_draft() {
        let mut app = app();
        app.open_settings();
        app.draft.cycle(true);
        app.close_settings();
        assert_eq!(app.current_settings().theme, Theme::System);

        app.open_settings();
        assert_eq!(app.draft.theme, Theme::System);
    }

    #[test]
    fn test_settings_row_cycling() {
        assert_eq!(SettingsRow::Currency.next(), SettingsRow::Theme);
        assert_eq!(SettingsRow::Theme.prev(), SettingsRow::Currency);
    }

    #[test]
    fn test_can_add_input_char() {
        assert!(can_add_input_char(0, '7'));
        assert!(can_add_input_char(0, ','));
        assert!(!can_add_input_char(MAX_INPUT_LENGTH, '7'));
        assert!(!can_add_input_char(0, 'x'));
        assert!(!can_add_input_char(0, '\n'));
    }

    #[test]
    fn test_shell_sync_disabled_without_origin() {
        let mut app = app();
        app.start_shell_sync();
        assert_eq!(app.shell_status, ShellStatus::Disabled);
    }

    #[test]
    fn test_shell_sync_invalid_origin() {
        let config = Config {
            shell_origin: Some("ftp://example.com/".to_string()),
            ..Config::default()
        };
        let mut app = App::new(config, Arc::new(MemoryKeyValueStore::new()));
        app.start_shell_sync();
        assert!(matches!(app.shell_status, ShellStatus::Failed(_)));
    }
}
