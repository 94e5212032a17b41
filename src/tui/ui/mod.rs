//! UI module: View components for the TUI.

pub mod form;
pub mod home;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::HeartwiseTheme;

/// Render the page navigation sidebar.
pub fn render_sidebar(f: &mut Frame, area: Rect, pages: &[&str], selected: usize) {
    let mut lines = vec![Line::from("")];
    for (i, page) in pages.iter().enumerate() {
        let line = if i == selected {
            Line::from(Span::styled(format!(" ▶ {page} "), HeartwiseTheme::sidebar_selected()))
        } else {
            Line::from(Span::styled(format!("   {page}"), HeartwiseTheme::label()))
        };
        lines.push(line);
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" [Tab] ", HeartwiseTheme::key()),
        Span::styled("Switch", HeartwiseTheme::key_action()),
    ]));
    lines.push(Line::from(vec![
        Span::styled(" [Ctrl+Q] ", HeartwiseTheme::key()),
        Span::styled("Quit", HeartwiseTheme::key_action()),
    ]));

    let block = Block::default()
        .title(Span::styled(" Navigation ", HeartwiseTheme::sidebar_title()))
        .borders(Borders::RIGHT)
        .border_style(HeartwiseTheme::frame(false));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(vec![Span::styled(
            "DISCLAIMER: This tool provides an estimation based on historical data and is not a substitute for clinical diagnosis.",
            HeartwiseTheme::faint(),
        )]),
        Line::from(vec![Span::styled(
            "Please consult a healthcare provider for any health concerns.",
            HeartwiseTheme::faint(),
        )]),
    ];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(HeartwiseTheme::frame(false));

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
