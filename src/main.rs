//! LandChain TUI - Actor-based land-title registration demo
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Contract Layer (Tokio) - simulated contract calls with delays

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use landchain_tui::app::form::FieldKind;
use landchain_tui::app::state::Alert;
use landchain_tui::constants::{APP_NAME, APP_VERSION};
use landchain_tui::messages::ui_events::{key_to_ui_event, KeyContext, ModalKind, Panel, QUICK_ACTIONS};
use landchain_tui::models::{short_address, LandParcel};
use landchain_tui::ui::{self, centered_rect, focus_style, highlight_json, labeled, verification_badge};
use landchain_tui::{AppActor, Config, ContractActor, ContractCommand, ContractResponse, LandContract, RenderState, UiEvent};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", &config.log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    match &loaded {
        Ok(_) => tracing::info!(path = %Config::default_path().display(), "Configuration loaded"),
        Err(e) => {
            let error = format!("{:#}", e);
            tracing::warn!(%error, "Invalid configuration, using defaults");
        }
    }

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<ContractCommand>();
    let (resp_tx, resp_rx) = mpsc::unbounded_channel::<ContractResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn contract actor
    let contract_actor = ContractActor::new(LandContract::new(config.delays.clone()), resp_tx);
    tokio::spawn(contract_actor.run(cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(config, cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, current_state.context) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),  // Hero
            Constraint::Min(0),     // Dashboard
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_hero(f, state, main_chunks[0]);

    if state.wallet_address.is_some() {
        draw_dashboard(f, state, main_chunks[1]);
    } else {
        draw_landing(f, main_chunks[1]);
    }

    draw_status_bar(f, state, main_chunks[2]);

    // Popups
    if state.modal_kind != ModalKind::None {
        draw_modal(f, state, area);
    }

    if let Some(alert) = &state.alert {
        draw_alert(f, alert, area);
    }

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn draw_hero(f: &mut Frame, state: &RenderState, area: Rect) {
    let wallet_line = match &state.wallet_address {
        Some(address) => Line::from(vec![
            Span::styled("● ", Style::default().fg(Color::Green)),
            Span::styled(short_address(address), Style::default().fg(Color::White).bold()),
            Span::styled("   d: disconnect", Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(vec![
            Span::styled("○ ", Style::default().fg(Color::DarkGray)),
            Span::styled("Wallet not connected", Style::default().fg(Color::Gray)),
            Span::styled("   c: connect wallet", Style::default().fg(Color::Yellow)),
        ]),
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
            Span::styled(format!(" v{}", APP_VERSION), Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(Span::styled(
            "Digital land certificates: register, certify, transfer and verify parcels",
            Style::default().fg(Color::Gray),
        )),
        wallet_line,
    ];

    let hero = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(hero, area);
}

fn draw_landing(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Secure land registry on the blockchain", Style::default().bold())),
        Line::from(""),
        Line::from("  • Register land parcels with owner, area and location"),
        Line::from("  • Issue digital certificates (SHM, SHGB, SHP, SHU)"),
        Line::from("  • Transfer ownership and keep a history of changes"),
        Line::from("  • Verify parcels with one keystroke"),
        Line::from(""),
        Line::from(Span::styled(
            "Press 'c' to connect your wallet and open the dashboard.",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let landing = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(landing, centered_rect(80, 70, area));
}

fn draw_dashboard(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Stats
            Constraint::Min(5),     // Actions + parcels
        ])
        .split(area);

    draw_stats(f, state, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(36), Constraint::Min(30)])
        .split(chunks[1]);

    draw_quick_actions(f, state, body[0]);
    draw_parcels(f, state, body[1]);
}

fn draw_stats(f: &mut Frame, state: &RenderState, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let area_value = if state.stats.unparsed_area > 0 {
        format!("{} m² (+{} unparsed)", state.stats.area_m2, state.stats.unparsed_area)
    } else {
        format!("{} m²", state.stats.area_m2)
    };
    let entries = [
        ("Total Parcels", state.stats.total.to_string(), "registered properties"),
        ("Verified", state.stats.verified.to_string(), "active certificates"),
        ("Pending", state.stats.pending.to_string(), "awaiting verification"),
        ("Total Area", area_value, "property area"),
    ];

    for (i, (title, value, description)) in entries.into_iter().enumerate() {
        let color = ui::STAT_COLORS[i];
        let card = Paragraph::new(vec![
            Line::from(Span::styled(value, Style::default().fg(color).bold())),
            Line::from(Span::styled(description, Style::default().fg(Color::DarkGray))),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", title)),
        );
        f.render_widget(card, cards[i]);
    }
}

fn draw_quick_actions(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::QuickActions;

    let items: Vec<ListItem> = QUICK_ACTIONS
        .iter()
        .map(|kind| {
            let (key, label, description, color) = match kind {
                ModalKind::Register => ("r", "Register Parcel", "Add a new property", Color::Cyan),
                ModalKind::Certificate => ("c", "Issue Certificate", "Generate a digital certificate", Color::Yellow),
                ModalKind::Transfer => ("t", "Transfer Ownership", "Hand a parcel to a new owner", Color::Magenta),
                ModalKind::Info | ModalKind::None => ("i", "View Details", "Property details and history", Color::Green),
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("[{}] ", key), Style::default().fg(Color::DarkGray)),
                    Span::styled(label, Style::default().fg(color).bold()),
                ]),
                Line::from(Span::styled(format!("    {}", description), Style::default().fg(Color::Gray))),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_style(is_focused))
                .title(" ⚡ Quick Actions "),
        )
        .highlight_symbol(if is_focused { "▶ " } else { "  " })
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut list_state = ListState::default();
    if is_focused {
        list_state.select(Some(state.selected_action));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_parcels(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Parcels;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(is_focused))
        .title(" 📋 Parcels ")
        .title(Line::from(format!(" {} properties ", state.parcels.len())).right_aligned());

    if state.parcels.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No parcels registered yet", Style::default().bold())),
            Line::from(""),
            Line::from("Register your first parcel to get a digital certificate."),
            Line::from(Span::styled("Press 'r' to register", Style::default().fg(Color::Yellow))),
        ])
        .alignment(Alignment::Center)
        .block(block)
        .wrap(Wrap { trim: false });
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = state
        .parcels
        .iter()
        .map(|parcel| {
            let verifying = state.is_verifying(&parcel.id);
            let action = if parcel.verified {
                Span::styled("already verified", Style::default().fg(Color::DarkGray))
            } else if verifying {
                Span::styled("verifying…", Style::default().fg(Color::Cyan))
            } else {
                Span::styled("v: verify parcel", Style::default().fg(Color::Yellow))
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(parcel.id.clone(), Style::default().fg(Color::Magenta).bold()),
                    Span::raw("  "),
                    verification_badge(parcel, verifying),
                    Span::raw("  "),
                    action,
                ]),
                labeled("  Owner", &parcel.owner),
                Line::from(vec![
                    Span::styled(format!("{:<12}", "  Area"), Style::default().fg(Color::DarkGray)),
                    Span::styled(format!("{:<14}", parcel.area), Style::default().bold()),
                    Span::styled("Certificate ", Style::default().fg(Color::DarkGray)),
                    Span::styled(ui::certificate_text(parcel).to_string(), Style::default().bold()),
                ]),
                Line::from(vec![
                    Span::styled(format!("{:<12}", "  Location"), Style::default().fg(Color::DarkGray)),
                    Span::raw(parcel.location.clone()),
                ]),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(30, 41, 59)));

    let mut list_state = ListState::default();
    if is_focused {
        list_state.select(Some(state.selected_row));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hints = match state.context {
        KeyContext::Landing => " c:connect wallet | ?:help | q:quit ",
        KeyContext::Dashboard(Panel::QuickActions) => {
            " Tab:panel | ↑/↓:move | Enter:open | r/c/t/i:actions | d:disconnect | ?:help | q:quit "
        }
        KeyContext::Dashboard(Panel::Parcels) => {
            " Tab:panel | ↑/↓:move | v:verify | r/c/t/i:actions | d:disconnect | ?:help | q:quit "
        }
        KeyContext::Form if state.submitting => " Submitting... | Esc:cancel and close | Ctrl+X:cancel ",
        KeyContext::Form => " Tab/↑/↓:field | ←/→:cursor or choice | Enter:submit | Esc:close ",
        KeyContext::Picker => " ↑/↓:move | Enter:choose | Esc:close ",
        KeyContext::Details => " r:raw record | b:back | Esc:close ",
        KeyContext::Alert => " Press any key to continue ",
        KeyContext::Help => " Press any key to close help ",
    };

    let mut spans = vec![Span::styled(hints, Style::default().fg(Color::DarkGray))];
    if let Some(entry) = &state.latest_activity {
        spans.push(Span::styled(
            format!(" last: {} ({}) ", entry.message, entry.timestamp.format("%H:%M:%S")),
            Style::default().fg(Color::Gray),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ============================================================================
// Modals
// ============================================================================

fn draw_modal(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(70, 80, area);
    f.render_widget(Clear, popup_area);

    match (&state.form, &state.selected_parcel) {
        (Some(_), _) => draw_form_modal(f, state, popup_area),
        (None, Some(parcel)) => draw_details_modal(f, state, parcel, popup_area),
        (None, None) => draw_picker_modal(f, state, popup_area),
    }
}

fn draw_form_modal(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(form) = &state.form else {
        return;
    };

    let title = if state.submitting {
        format!("{}[submitting...] ", state.modal_kind.title())
    } else {
        state.modal_kind.title().to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(form.fields.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let subject = match &state.selected_parcel {
        Some(parcel) => Line::from(vec![
            Span::styled("Parcel: ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{} ({})", parcel.id, parcel.owner), Style::default().bold()),
        ]),
        None => Line::from(Span::styled(
            "Fields marked * are required",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(subject), rows[0]);

    for (i, field) in form.fields.iter().enumerate() {
        let is_focused = i == form.active;
        let row = rows[i + 1];
        f.render_widget(ui::render_field(field, is_focused, state.submitting), row);

        if is_focused && !state.submitting && field.kind == FieldKind::Text {
            let cursor_x = ui::cursor_column(&field.value, form.cursor, row);
            f.set_cursor_position(Position::new(cursor_x, row.y.saturating_add(1)));
        }
    }

    let footer = if state.submitting {
        Span::styled("Waiting for the contract...", Style::default().fg(Color::Cyan))
    } else {
        Span::styled("Enter: submit   Esc: cancel", Style::default().fg(Color::DarkGray))
    };
    if let Some(last) = rows.last() {
        f.render_widget(Paragraph::new(Line::from(footer)), *last);
    }
}

fn draw_picker_modal(f: &mut Frame, state: &RenderState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(state.modal_kind.picker_title())
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let prompt = format!("Choose the parcel to be {}:", state.modal_kind.action_label());
    f.render_widget(
        Paragraph::new(Span::styled(prompt, Style::default().fg(Color::Gray))),
        rows[0],
    );

    if state.parcels.is_empty() {
        f.render_widget(
            Paragraph::new("No parcels available. Register one first."),
            rows[1],
        );
        return;
    }

    let items: Vec<ListItem> = state
        .parcels
        .iter()
        .map(|parcel| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(parcel.id.clone(), Style::default().bold()),
                    Span::raw("  "),
                    verification_badge(parcel, state.is_verifying(&parcel.id)),
                ]),
                Line::from(Span::styled(
                    format!("  {} • {} • {}", parcel.owner, parcel.area, ui::certificate_text(parcel)),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .highlight_symbol("▶ ")
        .highlight_style(Style::default().fg(Color::Yellow).bold());
    let mut list_state = ListState::default();
    list_state.select(Some(state.picker_index));
    f.render_stateful_widget(list, rows[1], &mut list_state);
}

fn draw_details_modal(f: &mut Frame, state: &RenderState, parcel: &LandParcel, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(state.modal_kind.title())
        .title_bottom(Line::from(" r: raw record  b: back  Esc: close ").right_aligned())
        .style(Style::default().bg(Color::Black));

    if let Some(raw) = &state.raw_record {
        let json = Paragraph::new(highlight_json(raw))
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(json, area);
        return;
    }

    let status = if parcel.verified {
        Span::styled("✔ Verified", Style::default().fg(Color::Green).bold())
    } else if state.is_verifying(&parcel.id) {
        Span::styled("… Verifying", Style::default().fg(Color::Cyan).bold())
    } else {
        Span::styled("⏳ Awaiting verification", Style::default().fg(Color::Yellow).bold())
    };

    let mut lines = vec![
        Line::from(Span::styled(parcel.id.clone(), Style::default().fg(Color::Green).bold())),
        Line::from(Span::styled("Digital land certificate", Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(Span::styled("Basic information", Style::default().fg(Color::Cyan))),
        labeled("Owner", &parcel.owner),
        labeled("Area", &parcel.area),
        Line::from(vec![
            Span::styled(format!("{:<12}", "Status"), Style::default().fg(Color::DarkGray)),
            status,
        ]),
        Line::from(""),
        Line::from(Span::styled("Location", Style::default().fg(Color::Cyan))),
        Line::from(parcel.location.clone()),
        Line::from(""),
    ];

    if let Some(number) = &parcel.certificate_number {
        lines.push(Line::from(Span::styled("Certificate", Style::default().fg(Color::Cyan))));
        lines.push(labeled("Number", number));
        lines.push(labeled("Status", "Active"));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled("History", Style::default().fg(Color::Cyan))));
    if state.history.is_empty() {
        lines.push(Line::from(Span::styled(
            "No recorded changes in this session",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for entry in &state.history {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}  ", entry.timestamp.format("%Y-%m-%d %H:%M:%S")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(entry.message.clone()),
            ]));
        }
    }

    let details = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(details, area);
}

fn draw_alert(f: &mut Frame, alert: &Alert, area: Rect) {
    let popup_area = centered_rect(50, 20, area);
    let color = ui::alert_color(alert.kind);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(ui::alert_title(alert.kind))
        .title_bottom(Line::from(" any key to continue ").right_aligned())
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(alert.message.clone(), Style::default().fg(Color::White).bold())),
    ])
    .alignment(Alignment::Center)
    .block(block)
    .wrap(Wrap { trim: true });

    f.render_widget(Clear, popup_area);
    f.render_widget(text, popup_area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 LANDCHAIN - Keyboard Shortcuts

 WALLET
   c                  Connect wallet (landing screen)
   d                  Disconnect wallet

 DASHBOARD
   Tab / Shift+Tab    Switch between actions and parcels
   ↑ / ↓              Move selection
   Enter              Open action / verify parcel
   v                  Verify selected parcel
   r                  Register parcel
   c                  Issue certificate
   t                  Transfer ownership
   i                  View details

 FORMS
   Tab / ↑ / ↓        Next / previous field
   ← / →              Move cursor, or change certificate type
   Enter              Submit
   Esc                Close (cancels a pending submission)
   Ctrl+X             Cancel pending submission

 DETAILS
   r                  Toggle raw JSON record
   b                  Back to parcel list

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
