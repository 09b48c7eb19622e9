//! UI rendering.

use crate::app::{App, Field, InputMode, Step};
use crate::log_buffer::LogLevel;
use crate::theme::Palette;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use seedwiz_core::{ANY_NETWORK_LABEL, KeypairType, WORD_COUNT_HINT};
use seedwiz_signer::format_for_network;

/// Height of the log pane including borders.
const LOG_PANE_HEIGHT: u16 = 8;

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),               // Header
        Constraint::Min(0),                  // Step content
        Constraint::Length(LOG_PANE_HEIGHT), // Log viewer
    ])
    .split(frame.area());

    render_header(frame, app, chunks[0]);
    match app.step {
        Step::SeedAndPath => render_seed_step(frame, app, chunks[1]),
        Step::Confirm => render_confirm_step(frame, app, chunks[1]),
    }
    render_logs(frame, app, chunks[2]);

    match app.input_mode {
        InputMode::NetworkMenu(index) => render_network_menu(frame, app, index),
        InputMode::KeypairMenu(index) => render_keypair_menu(frame, app, index),
        InputMode::Normal => {}
    }

    if app.showing_help {
        render_help_modal(frame, app);
    }
}

/// Centered rectangle of at most `width` x `height` inside `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Bordered block for a form field.
fn field_block<'a>(title: &'a str, focused: bool, invalid: bool, p: &Palette) -> Block<'a> {
    let border = if invalid {
        p.error
    } else if focused {
        p.focus
    } else {
        p.border
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}

/// Render the header with the current step.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let step_style = |active: bool| {
        if active {
            Style::default().fg(p.accent).bold()
        } else {
            Style::default().fg(p.muted)
        }
    };

    let network = match app.network() {
        Some(network) => format!("[{}] {}", network.token_symbol(), network),
        None => "any chain".to_string(),
    };

    let header_text = Line::from(vec![
        Span::styled("1. Seed", step_style(app.step == Step::SeedAndPath)),
        Span::raw("  ›  "),
        Span::styled("2. Confirm", step_style(app.step == Step::Confirm)),
        Span::raw("  │  "),
        Span::styled(network, Style::default().fg(p.primary)),
        Span::raw("  │  "),
        Span::raw(app.keypair_type.label()),
    ]);

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border))
                .title(" Import account from seed "),
        )
        .alignment(Alignment::Left);

    frame.render_widget(header, area);
}

/// Text shown in the seed box. Characters are masked unless revealed.
fn seed_display(seed: &str, reveal: bool) -> String {
    if reveal {
        seed.to_string()
    } else {
        seed.chars()
            .map(|c| if c.is_whitespace() { c } else { '•' })
            .collect()
    }
}

fn render_seed_step(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let form = &app.form;
    let advanced = form.is_advanced();
    let banner = form.show_error_banner();

    let mut constraints = vec![
        Constraint::Length(5), // Seed
        Constraint::Length(1), // Word count hint
        Constraint::Length(3), // Network
        Constraint::Length(1), // Advanced toggle
    ];
    if advanced {
        constraints.push(Constraint::Length(3)); // Path
        constraints.push(Constraint::Length(3)); // Keypair type
    }
    if banner {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(2)); // Address preview
    constraints.push(Constraint::Length(3)); // Next
    constraints.push(Constraint::Min(0));

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.border));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);
    let chunks = Layout::vertical(constraints).split(inner);
    let mut slot = chunks.iter().copied();
    let mut next = || slot.next().unwrap_or_default();

    // Seed
    let words = form.seed().split_whitespace().count();
    let seed_title = if words > 0 {
        format!(" Existing 12 or 24-word mnemonic seed ({} words) ", words)
    } else {
        " Existing 12 or 24-word mnemonic seed ".to_string()
    };
    let seed = Paragraph::new(seed_display(form.seed(), app.reveal_seed))
        .wrap(Wrap { trim: false })
        .block(field_block(
            &seed_title,
            app.focus == Field::Seed,
            banner,
            p,
        ));
    frame.render_widget(seed, next());

    let hint_area = next();
    if form.show_word_count_hint() {
        frame.render_widget(
            Paragraph::new(Span::styled(WORD_COUNT_HINT, Style::default().fg(p.warning))),
            hint_area,
        );
    }

    // Network
    let network_label = form
        .selected_network_index()
        .and_then(|i| form.network_options().get(i))
        .map(|o| o.text.as_str())
        .unwrap_or(ANY_NETWORK_LABEL);
    let network = Paragraph::new(Line::from(vec![
        Span::raw(network_label),
        Span::styled("  ▾", Style::default().fg(p.muted)),
    ]))
    .block(field_block(
        " Network ",
        app.focus == Field::Network,
        false,
        p,
    ));
    frame.render_widget(network, next());

    // Advanced toggle
    let marker = if advanced { "[x]" } else { "[ ]" };
    let toggle_style = if app.focus == Field::Advanced {
        Style::default().fg(p.focus).bold()
    } else {
        Style::default().fg(p.fg_dim)
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!("{} Advanced creation options", marker),
            toggle_style,
        )),
        next(),
    );

    if advanced {
        let path = Paragraph::new(form.path()).block(field_block(
            " Secret derivation path ",
            app.focus == Field::Path,
            form.path_has_error(),
            p,
        ));
        frame.render_widget(path, next());

        let keypair = Paragraph::new(Line::from(vec![
            Span::raw(app.keypair_type.label()),
            Span::styled("  ▾", Style::default().fg(p.muted)),
        ]))
        .block(field_block(
            " Keypair crypto type ",
            app.focus == Field::KeypairType,
            false,
            p,
        ));
        frame.render_widget(keypair, next());
    }

    if banner {
        let warning = Paragraph::new(Span::styled(
            format!("⚠ {}", form.error()),
            Style::default().fg(p.warning),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.warning)),
        );
        frame.render_widget(warning, next());
    }

    frame.render_widget(Paragraph::new(address_preview(app)), next());

    let next_style = if form.can_proceed() && !form.is_pending() {
        Style::default().fg(p.success).bold()
    } else {
        Style::default().fg(p.disabled).add_modifier(Modifier::DIM)
    };
    let button = Paragraph::new(Span::styled("Next ›", next_style))
        .alignment(Alignment::Center)
        .block(field_block("", app.focus == Field::Next, false, p));
    let slot = next();
    let width = 16.min(slot.width);
    let button_area = Rect::new(slot.x + (slot.width - width) / 2, slot.y, width, slot.height);
    frame.render_widget(button, button_area);
}

/// Derived address lines under the form.
fn address_preview(app: &App) -> Vec<Line<'_>> {
    let p = &app.palette;
    let form = &app.form;

    if form.is_pending() {
        return vec![Line::from(Span::styled(
            format!("{} Validating…", app.spinner_char()),
            Style::default().fg(p.muted),
        ))];
    }
    if form.address().is_empty() {
        return vec![Line::from("")];
    }

    let mut lines = vec![Line::from(vec![
        Span::styled("Address: ", Style::default().fg(p.muted)),
        Span::styled(form.address(), Style::default().fg(p.success)),
    ])];
    if let Some(network) = app.network()
        && let Ok(encoded) = format_for_network(form.address(), network)
    {
        lines.push(Line::from(vec![
            Span::styled(format!("On {}: ", network), Style::default().fg(p.muted)),
            Span::raw(encoded),
        ]));
    }
    lines
}

fn render_confirm_step(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let label = Style::default().fg(p.muted);
    let key_style = Style::default().fg(p.focus).bold();

    let mut lines = vec![Line::from("")];
    match &app.account {
        Some(account) => {
            lines.push(Line::from(vec![
                Span::styled("  Address    ", label),
                Span::styled(account.address.as_str(), Style::default().fg(p.success)),
            ]));
            let network = account.network();
            if let Some(network) = network
                && let Ok(encoded) = format_for_network(&account.address, network)
            {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<11}", network.to_string()), label),
                    Span::raw(encoded),
                ]));
            }
            lines.push(Line::from(vec![
                Span::styled("  Network    ", label),
                Span::raw(
                    network
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| ANY_NETWORK_LABEL.to_string()),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  Type       ", label),
                Span::raw(account.keypair_type.label()),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            "  No account derived",
            Style::default().fg(p.error),
        ))),
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("Enter", key_style),
        Span::raw(" save account   "),
        Span::styled("Esc", key_style),
        Span::raw(" back"),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.border))
            .title(" Confirm account "),
    );
    frame.render_widget(paragraph, area);
}

fn render_dropdown(frame: &mut Frame, app: &App, title: &str, items: Vec<String>, index: usize) {
    let p = &app.palette;
    let height = items.len() as u16 + 2;
    let area = centered(frame.area(), 40, height);
    frame.render_widget(Clear, area);

    let list = List::new(items.into_iter().map(ListItem::new))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.primary))
                .title(title),
        )
        .style(Style::default().bg(p.bg))
        .highlight_style(Style::default().fg(p.selection).bold())
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(Some(index));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_network_menu(frame: &mut Frame, app: &App, index: usize) {
    let items = app
        .form
        .network_options()
        .iter()
        .map(|o| o.text.clone())
        .collect();
    render_dropdown(frame, app, " Network ", items, index);
}

fn render_keypair_menu(frame: &mut Frame, app: &App, index: usize) {
    let items = KeypairType::all()
        .iter()
        .map(|t| t.label().to_string())
        .collect();
    render_dropdown(frame, app, " Keypair crypto type ", items, index);
}

fn render_help_modal(frame: &mut Frame, app: &App) {
    let pal = &app.palette;
    let modal_area = centered(frame.area(), 52, 20);
    frame.render_widget(Clear, modal_area);

    let key_style = Style::default().fg(pal.focus).bold();
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().fg(pal.primary).bold(),
        ))
    };
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", keys), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(""),
        section("  Seed step"),
        entry("Tab", "Next field"),
        entry("Shift+Tab", "Previous field"),
        entry("Enter/Space", "Open dropdown, toggle options"),
        entry("Ctrl+U", "Clear text field"),
        entry("Ctrl+R", "Show or hide the seed"),
        entry("Ctrl+N", "Next step"),
        Line::from(""),
        section("  Confirm step"),
        entry("Enter", "Save account and quit"),
        entry("Esc", "Back to the seed step"),
        Line::from(""),
        section("  Global"),
        entry("F1 / ?", "Toggle this help"),
        entry("PgUp/PgDn", "Scroll logs"),
        entry("Ctrl+C", "Quit"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(pal.success))
                .title(" Keyboard Shortcuts "),
        )
        .style(Style::default().bg(pal.bg));

    frame.render_widget(paragraph, modal_area);
}

/// Render the log viewer.
fn render_logs(frame: &mut Frame, app: &App, area: Rect) {
    let p = &app.palette;
    let visible_lines = area.height.saturating_sub(2) as usize;
    let logs = app.log_buffer.window(visible_lines, app.log_scroll);

    let mut display_lines: Vec<Line> = logs
        .iter()
        .map(|log| {
            let level_style = match log.level {
                LogLevel::Trace => Style::default().fg(p.muted),
                LogLevel::Debug => Style::default().fg(p.primary),
                LogLevel::Info => Style::default().fg(p.success),
                LogLevel::Warn => Style::default().fg(p.warning),
                LogLevel::Error => Style::default().fg(p.error),
            };

            // Shorten target if too long
            let target: String = if log.target.chars().count() > 20 {
                let tail: String = log.target.chars().rev().take(18).collect();
                format!("..{}", tail.chars().rev().collect::<String>())
            } else {
                log.target.clone()
            };

            Line::from(vec![
                Span::styled(format!("{:5} ", log.level.as_str()), level_style),
                Span::styled(format!("[{}] ", target), Style::default().fg(p.muted)),
                Span::raw(log.message.clone()),
            ])
        })
        .collect();

    // Pad with empty lines so the newest entry sits at the bottom.
    while display_lines.len() < visible_lines {
        display_lines.insert(0, Line::from(""));
    }

    let scroll_info = if app.log_scroll > 0 {
        format!(" [↑{}]", app.log_scroll)
    } else {
        String::new()
    };

    let title = Line::from(vec![
        Span::raw(" Logs "),
        Span::styled(
            format!("({}) ", app.log_buffer.len()),
            Style::default().fg(p.muted),
        ),
        Span::styled(scroll_info, Style::default().fg(p.muted)),
        Span::raw("│ PgUp/PgDn  F1:Help  Ctrl+C:Quit "),
    ]);

    let paragraph = Paragraph::new(display_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.border))
            .title(title),
    );

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::log_buffer::LogBuffer;
    use crate::theme::Theme;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use seedwiz_core::{Network, ValidatedSeed, ValidationError, ValidationResponse};

    const PHRASE: &str = "bottom drive obey lake curtain smoke basket hold race lonely fit walk";
    const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 45)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn app_with(network: Option<Network>) -> App {
        let mut app = App::new(KeypairType::Sr25519, network, LogBuffer::new(), Theme::Dark);
        app.start();
        app
    }

    fn respond(app: &mut App, action: Option<Action>, ok: bool) {
        let Some(Action::Validate(request)) = action else {
            panic!("expected a validation request");
        };
        let result = if ok {
            Ok(ValidatedSeed {
                address: ALICE.to_string(),
                suri: request.suri.clone(),
            })
        } else {
            Err(ValidationError::InvalidSecret("bad".to_string()))
        };
        app.handle_action(Action::ValidationDone(ValidationResponse {
            id: request.id,
            result,
        }));
    }

    #[test]
    fn test_seed_is_masked_by_default() {
        let mut app = app_with(None);
        app.handle_paste(PHRASE);
        let screen = draw(&app);
        assert!(!screen.contains("bottom"));
        assert!(screen.contains("(12 words)"));
        assert!(screen.contains("Validating"));

        app.reveal_seed = true;
        assert!(draw(&app).contains("bottom drive obey"));
    }

    #[test]
    fn test_address_preview_for_network() {
        let mut app = app_with(Some(Network::Polkadot));
        let action = app.handle_paste(PHRASE);
        respond(&mut app, action, true);

        let screen = draw(&app);
        assert!(screen.contains(ALICE));
        assert!(screen.contains("15oF4uVJwmo4TdGW7VfQxNLavjCXviqxT9S1MgbjMNHr6Sp5"));
    }

    #[test]
    fn test_error_banner_and_advanced_fields() {
        let mut app = app_with(None);
        app.form.toggle_advanced();
        let action = app.handle_paste("nonsense");
        respond(&mut app, action, false);

        let screen = draw(&app);
        assert!(screen.contains("Invalid mnemonic seed"));
        assert!(screen.contains("Secret derivation path"));
        assert!(screen.contains("Keypair crypto type"));
    }

    #[test]
    fn test_word_count_hint_after_clearing() {
        let mut app = app_with(None);
        let action = app.handle_paste("nonsense");
        respond(&mut app, action, false);
        app.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));

        assert_eq!(app.form.seed(), "");
        assert!(draw(&app).contains(WORD_COUNT_HINT));
    }

    #[test]
    fn test_confirm_step_and_help() {
        let mut app = app_with(Some(Network::Kusama));
        let action = app.handle_paste(PHRASE);
        respond(&mut app, action, true);
        app.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL));
        assert_eq!(app.step, Step::Confirm);

        let screen = draw(&app);
        assert!(screen.contains("Confirm account"));
        assert!(screen.contains("HNZata7iMYWmk5RvZRTiAsSDhV8366zq2YGb3tLH5Upf74F"));

        app.showing_help = true;
        assert!(draw(&app).contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_network_menu_lists_any_chain() {
        let mut app = app_with(None);
        app.input_mode = InputMode::NetworkMenu(0);
        let screen = draw(&app);
        assert!(screen.contains(ANY_NETWORK_LABEL));
        assert!(screen.contains("Westend"));
    }

    #[test]
    fn test_seed_display() {
        assert_eq!(seed_display("ab cd", false), "•• ••");
        assert_eq!(seed_display("ab cd", true), "ab cd");
    }
}
