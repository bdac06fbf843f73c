use ratatui::{prelude::*, widgets::*};

use crate::app::form::{FieldKind, FormField};
use crate::app::state::AlertKind;
use crate::models::{CertificateKind, LandParcel};

/// Accent colours of the four stats cards, in display order
pub const STAT_COLORS: [Color; 4] = [Color::Cyan, Color::Green, Color::Yellow, Color::Magenta];

/// Border style for a focusable block
pub fn focus_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Verification badge shown on parcel cards
pub fn verification_badge(parcel: &LandParcel, verifying: bool) -> Span<'static> {
    if parcel.verified {
        Span::styled(" ✔ Verified ", Style::default().fg(Color::Black).bg(Color::Green).bold())
    } else if verifying {
        Span::styled(" … Verifying ", Style::default().fg(Color::Black).bg(Color::Cyan).bold())
    } else {
        Span::styled(" ⏳ Pending ", Style::default().fg(Color::Black).bg(Color::Yellow).bold())
    }
}

pub fn alert_color(kind: AlertKind) -> Color {
    match kind {
        AlertKind::Success => Color::Green,
        AlertKind::Error => Color::Red,
        AlertKind::Info => Color::Cyan,
    }
}

pub fn alert_title(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Success => " Success ",
        AlertKind::Error => " Error ",
        AlertKind::Info => " Notice ",
    }
}

/// Label + value row used on cards and in the detail view
pub fn labeled(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value.to_string(), Style::default().fg(Color::White).bold()),
    ])
}

/// Certificate number, or a placeholder when none was issued
pub fn certificate_text(parcel: &LandParcel) -> &str {
    parcel.certificate_number.as_deref().unwrap_or("None yet")
}

/// One bordered input box for a form field
pub fn render_field<'a>(field: &'a FormField, is_focused: bool, disabled: bool) -> Paragraph<'a> {
    let border_style = if disabled {
        Style::default().fg(Color::DarkGray)
    } else if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let marker = if field.required { " *" } else { "" };

    let content = match field.kind {
        FieldKind::CertificateKind => {
            let kind = CertificateKind::from_label(&field.value).unwrap_or_default();
            Line::from(vec![
                Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
                Span::styled(kind.description(), Style::default().fg(Color::White).bold()),
                Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
            ])
        }
        FieldKind::Text if field.value.is_empty() => Line::from(Span::styled(
            field.placeholder,
            Style::default().fg(Color::DarkGray).italic(),
        )),
        FieldKind::Text => Line::from(field.value.as_str()),
    };

    Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {}{} ", field.label, marker)),
    )
}

/// Terminal column of a byte cursor inside a bordered input box, clamped to the box
pub fn cursor_column(value: &str, cursor: usize, row: Rect) -> u16 {
    let typed = value.get(..cursor.min(value.len())).map_or(0, |s| s.chars().count());
    let typed = u16::try_from(typed).unwrap_or(u16::MAX);
    let max_x = row.x.saturating_add(row.width.saturating_sub(2));
    row.x.saturating_add(typed).saturating_add(1).min(max_x)
}

/// Pretty JSON with keys, strings, numbers and literals coloured
pub fn highlight_json(text: &str) -> Vec<Line<'static>> {
    text.lines().map(highlight_json_line).collect()
}

fn highlight_json_line(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut rest = line;

    while let Some(c) = rest.chars().next() {
        let (token, style) = if c == '"' {
            // Closing quote, skipping escaped ones
            let mut end = 1;
            let mut escaped = false;
            for (i, ch) in rest.char_indices().skip(1) {
                end = i + ch.len_utf8();
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    break;
                }
            }
            let is_key = rest[end..].trim_start().starts_with(':');
            let color = if is_key { Color::Cyan } else { Color::Green };
            (&rest[..end], Style::default().fg(color))
        } else if c.is_ascii_digit() || c == '-' {
            let end = rest
                .find(|ch: char| !(ch.is_ascii_digit() || matches!(ch, '-' | '.' | 'e' | 'E' | '+')))
                .unwrap_or(rest.len());
            (&rest[..end], Style::default().fg(Color::Yellow))
        } else if let Some(lit) = ["true", "false", "null"].iter().find(|l| rest.starts_with(*l)) {
            (&rest[..lit.len()], Style::default().fg(Color::Magenta))
        } else if matches!(c, '{' | '}' | '[' | ']') {
            (&rest[..1], Style::default().fg(Color::Yellow))
        } else {
            (&rest[..c.len_utf8()], Style::default())
        };

        spans.push(Span::styled(token.to_string(), style));
        rest = &rest[token.len()..];
    }

    Line::from(spans)
}

/// Rect of `percent_x` by `percent_y` centred in `r`
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colored(line: &Line, text: &str) -> Option<Color> {
        line.spans
            .iter()
            .find(|s| s.content == text)
            .and_then(|s| s.style.fg)
    }

    #[test]
    fn test_highlight_json_keys_and_values() {
        let line = highlight_json_line(r#"  "owner": "Budi \"B\" Santoso","#);
        assert_eq!(colored(&line, r#""owner""#), Some(Color::Cyan));
        assert_eq!(colored(&line, r#""Budi \"B\" Santoso""#), Some(Color::Green));

        let line = highlight_json_line(r#"  "verified": true"#);
        assert_eq!(colored(&line, "true"), Some(Color::Magenta));
    }

    #[test]
    fn test_highlight_json_keeps_text() {
        let source = "{\n  \"area\": \"500 m²\",\n  \"n\": -12.5\n}";
        let rendered: Vec<String> = highlight_json(source)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(rendered.join("\n"), source);
    }

    #[test]
    fn test_cursor_column_counts_chars_and_clamps() {
        let row = Rect::new(10, 0, 20, 3);
        assert_eq!(cursor_column("", 0, row), 11);
        assert_eq!(cursor_column("5m²", "5m²".len(), row), 14);

        let long = "x".repeat(70_000);
        assert_eq!(cursor_column(&long, long.len(), row), 28);

        let edge = Rect::new(u16::MAX - 5, 0, 10, 3);
        assert!(cursor_column(&long, long.len(), edge) > edge.x);
    }

    #[test]
    fn test_badge_prefers_verified() {
        let parcel = LandParcel::new("A", "b", "1 m²", "c").verified();
        assert!(verification_badge(&parcel, true).content.contains("Verified"));
        let pending = LandParcel::new("A", "b", "1 m²", "c");
        assert!(verification_badge(&pending, true).content.contains("Verifying"));
        assert!(verification_badge(&pending, false).content.contains("Pending"));
    }
}
