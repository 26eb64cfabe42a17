use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use worktime_core::i18n::{wage_suffix, Dictionary};
use worktime_core::offline::Startup;
use worktime_core::Settings;

use crate::app::{App, AppState, Field, SettingsRow, ShellStatus};

use super::styles::{self, Palette};

pub fn render(frame: &mut Frame, app: &App) {
    let settings = app.current_settings();
    let palette = Palette::for_theme(settings.theme);
    let dict = app.dictionary();

    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(4), // Wage
            Constraint::Length(3), // Price
            Constraint::Length(4), // Result
            Constraint::Min(2),    // Note
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, dict, chunks[0]);
    render_wage(frame, app, &settings, dict, palette, chunks[1]);
    render_price(frame, app, &settings, dict, palette, chunks[2]);
    render_result(frame, app, dict, chunks[3]);
    render_note(frame, dict, chunks[4]);
    render_status_bar(frame, app, palette, chunks[5]);

    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, palette),
        AppState::EditingSettings => render_settings_overlay(frame, app, dict, palette),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_title_bar(frame: &mut Frame, dict: &Dictionary, area: Rect) {
    let title = "  WorkTime";
    let help_hint = "[?] Help";
    let used = title.len() + dict.tagline.chars().count() + 3 + help_hint.len() + 2;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(format!(" · {}", dict.tagline), styles::muted_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

/// Input text with a cursor when focused, or the placeholder when empty
fn input_spans(value: &str, placeholder: &str, focused: bool, palette: Palette) -> Vec<Span<'static>> {
    let cursor = if focused { "▌" } else { "" };
    if value.is_empty() {
        vec![
            Span::raw(cursor.to_string()),
            Span::styled(placeholder.to_string(), styles::muted_style()),
        ]
    } else {
        vec![
            Span::styled(value.to_string(), palette.text()),
            Span::raw(cursor.to_string()),
        ]
    }
}

fn render_wage(
    frame: &mut Frame,
    app: &App,
    settings: &Settings,
    dict: &Dictionary,
    palette: Palette,
    area: Rect,
) {
    let focused = app.focus == Field::Wage;
    let mut spans = vec![Span::raw(" ")];
    spans.extend(input_spans(&app.wage_input, dict.wage_placeholder, focused, palette));
    spans.push(Span::styled(
        format!("  {}", wage_suffix(settings.currency)),
        styles::highlight_style(),
    ));

    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(format!(" {}", dict.hourly_wage_hint), styles::muted_style())),
    ];

    let block = Block::default()
        .title(format!(" {} ", dict.hourly_wage_label))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_price(
    frame: &mut Frame,
    app: &App,
    settings: &Settings,
    dict: &Dictionary,
    palette: Palette,
    area: Rect,
) {
    let focused = app.focus == Field::Price;
    let mut spans = vec![Span::styled(
        format!(" {} ", settings.currency.symbol()),
        styles::highlight_style(),
    )];
    spans.extend(input_spans(&app.price_input, dict.price_placeholder, focused, palette));

    let block = Block::default()
        .title(format!(" {} · {} ", dict.converter_title, dict.price_label))
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_result(frame: &mut Frame, app: &App, dict: &Dictionary, area: Rect) {
    let sub_style = if app.view.is_error {
        styles::error_style()
    } else {
        styles::muted_style()
    };

    let lines = vec![
        Line::from(Span::styled(format!(" {}", app.view.main), styles::result_style())),
        Line::from(Span::styled(format!(" {}", app.view.sub), sub_style)),
    ];

    let block = Block::default()
        .title(Span::styled(
            format!(" [Ctrl+L] {} ", dict.clear),
            styles::muted_style(),
        ))
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_note(frame: &mut Frame, dict: &Dictionary, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!(" {}", dict.note),
        styles::muted_style(),
    )))
    .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Short description of the offline shell state
fn shell_status_text(status: &ShellStatus) -> String {
    match status {
        ShellStatus::Disabled => String::new(),
        ShellStatus::Syncing => "Offline shell: syncing...".to_string(),
        ShellStatus::Ready(Startup::Restored) => "Offline shell: cached".to_string(),
        ShellStatus::Ready(Startup::Installed) => "Offline shell: installed".to_string(),
        ShellStatus::Failed(e) => format!("Offline shell: {}", e),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, palette: Palette, area: Rect) {
    let shortcuts = "[Tab] field | [s]ettings | [q]uit";
    let left_text = format!(" {} ", shell_status_text(&app.shell_status));
    let right_text = format!(" {} ", shortcuts);

    let left_style = match app.shell_status {
        ShellStatus::Failed(_) => styles::error_style(),
        ShellStatus::Ready(_) => styles::success_style(),
        ShellStatus::Disabled | ShellStatus::Syncing => styles::muted_style(),
    };

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(status_line).style(palette.status_bar()), area);
}

fn settings_row_line(
    label: &str,
    value: String,
    selected: bool,
    palette: Palette,
) -> Line<'static> {
    let marker = if selected { " ▶ " } else { "   " };
    let value_style = if selected { palette.selected() } else { palette.text() };
    Line::from(vec![
        Span::styled(marker.to_string(), styles::highlight_style()),
        Span::styled(format!("{:<10}", label), styles::muted_style()),
        Span::styled(format!("◀ {} ▶", value), value_style),
    ])
}

fn render_settings_overlay(frame: &mut Frame, app: &App, dict: &Dictionary, palette: Palette) {
    let area = centered_rect_fixed(46, 11, frame.area());
    frame.render_widget(Clear, area);

    let draft = &app.draft;
    let currency = format!("{} ({})", draft.currency.code(), draft.currency.symbol());

    let lines = vec![
        Line::from(""),
        settings_row_line(
            dict.theme_label,
            dict.theme_name(draft.theme).to_string(),
            draft.row == SettingsRow::Theme,
            palette,
        ),
        settings_row_line(
            dict.language_label,
            draft.lang.code().to_uppercase(),
            draft.row == SettingsRow::Language,
            palette,
        ),
        settings_row_line(
            dict.currency_label,
            currency,
            draft.row == SettingsRow::Currency,
            palette,
        ),
        Line::from(Span::styled(format!("   {}", dict.currency_hint), styles::muted_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("   [Enter] ", styles::help_key_style()),
            Span::styled(dict.save, palette.text()),
            Span::styled("   [Esc] ", styles::help_key_style()),
            Span::styled("✕", palette.text()),
        ]),
    ];

    let block = Block::default()
        .title(format!(" {} ", dict.settings_title))
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(palette.base());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame, palette: Palette) {
    let area = centered_rect_fixed(44, 14, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");
    let key_line = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(key, styles::help_key_style()),
            Span::styled(desc, palette.text()),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(format!("  WorkTime {}", version), styles::title_style())),
        Line::from(""),
        key_line("  0-9 , .   ", "Type an amount"),
        key_line("  Tab ↑/↓   ", "Switch wage / price"),
        key_line("  Backspace ", "Delete a character"),
        key_line("  Ctrl+L    ", "Clear the price"),
        key_line("  Esc       ", "Clear the price"),
        key_line("  s         ", "Settings"),
        key_line("  q         ", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(palette.base());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use worktime_core::settings::MemoryKeyValueStore;
    use worktime_core::Config;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        buffer_text(&terminal)
    }

    fn app() -> App {
        App::new(Config::default(), Arc::new(MemoryKeyValueStore::new()))
    }

    #[test]
    fn test_centered_rect_fixed() {
        let rect = centered_rect_fixed(40, 10, Rect::new(0, 0, 80, 24));
        assert_eq!(rect, Rect::new(20, 7, 40, 10));

        let clipped = centered_rect_fixed(100, 50, Rect::new(0, 0, 80, 24));
        assert_eq!(clipped.width, 80);
        assert_eq!(clipped.height, 24);
    }

    #[test]
    fn test_shell_status_text() {
        assert_eq!(shell_status_text(&ShellStatus::Disabled), "");
        assert_eq!(
            shell_status_text(&ShellStatus::Ready(Startup::Restored)),
            "Offline shell: cached"
        );
    }

    #[test]
    fn test_render_shows_result() {
        let mut app = app();
        for c in "12,50".chars() {
            app.push_char(c);
        }
        app.toggle_focus();
        for c in "25".chars() {
            app.push_char(c);
        }

        let text = draw(&app);
        assert!(text.contains("2h 0m"));
        assert!(text.contains("Paga oraria"));
        assert!(text.contains("€/h"));
    }

    #[test]
    fn test_render_settings_overlay() {
        let mut app = app();
        app.open_settings();
        let text = draw(&app);
        assert!(text.contains("Impostazioni"));
        assert!(text.contains("Sistema"));
    }
}
