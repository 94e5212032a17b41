//! Home page: description, how it works, model status.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::HeartwiseTheme;

/// Home page state for rendering.
#[derive(Debug, Clone, Default)]
pub struct HomeState {
    pub model_loaded: bool,
    /// Whether a manifest vouched for the model files
    pub model_verified: bool,
    /// Status line from the prediction service
    pub model_status: String,
}

/// Render the home page.
pub fn render_home(f: &mut Frame, area: Rect, state: &HomeState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_main_content(f, chunks[1], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", HeartwiseTheme::body()),
        Span::styled("Heartwise", HeartwiseTheme::heading()),
        Span::styled(" │ ", HeartwiseTheme::faint()),
        Span::styled(
            "Welcome to the Heart Disease Prediction System",
            HeartwiseTheme::label(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(HeartwiseTheme::frame(false)),
    );

    f.render_widget(header, area);
}

fn render_main_content(f: &mut Frame, area: Rect, state: &HomeState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    render_about(f, chunks[0]);
    render_status_panels(f, chunks[1], state);
}

fn render_about(f: &mut Frame, area: Rect) {
    let bullet = |text: &'static str| {
        Line::from(vec![
            Span::styled("  • ", HeartwiseTheme::key()),
            Span::styled(text, HeartwiseTheme::body()),
        ])
    };

    let lines = vec![
        Line::from(Span::styled(
            "This application uses machine learning to predict the likelihood of heart disease based on patient data.",
            HeartwiseTheme::body(),
        )),
        Line::from(""),
        Line::from(Span::styled("How It Works", HeartwiseTheme::panel_title())),
        bullet("Enter patient information on the Heart Disease Prediction page."),
        bullet("The thirteen measurements are encoded into the feature vector the trained neural network expects."),
        bullet("The network estimates the probability of heart disease; 50% or more is reported as detected."),
        bullet("Built to assist early risk detection. It does not replace professional medical advice."),
        Line::from(""),
        Line::from(Span::styled("Disclaimer", HeartwiseTheme::panel_title())),
        Line::from(Span::styled(
            "This tool provides an estimation based on patterns from historical data and is not a substitute for clinical diagnosis. Please consult a healthcare provider for any health concerns.",
            HeartwiseTheme::label(),
        )),
    ];

    let block = Block::default()
        .title(Span::styled(" About ", HeartwiseTheme::panel_title()))
        .borders(Borders::ALL)
        .border_style(HeartwiseTheme::frame(false));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_status_panels(f: &mut Frame, area: Rect, state: &HomeState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Model status
            Constraint::Min(0),    // Quick actions
        ])
        .split(area);

    let status_items = vec![
        format_status_item("Model Loaded", state.model_loaded),
        format_status_item("Manifest Verified", state.model_verified),
        Line::from(Span::styled(
            format!("  {}", state.model_status),
            HeartwiseTheme::faint(),
        )),
    ];

    let status_block = Block::default()
        .title(Span::styled(" Model Status ", HeartwiseTheme::panel_title()))
        .borders(Borders::ALL)
        .border_style(HeartwiseTheme::frame(false));

    f.render_widget(
        Paragraph::new(status_items)
            .block(status_block)
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    let actions = vec![
        Line::from(vec![
            Span::styled("[Tab] ", HeartwiseTheme::key()),
            Span::styled("Heart Disease Prediction", HeartwiseTheme::key_action()),
        ]),
        Line::from(vec![
            Span::styled("[Q] ", HeartwiseTheme::key()),
            Span::styled("Quit", HeartwiseTheme::key_action()),
        ]),
    ];

    let actions_block = Block::default()
        .title(Span::styled(" Quick Actions ", HeartwiseTheme::panel_title()))
        .borders(Borders::ALL)
        .border_style(HeartwiseTheme::frame(false));

    f.render_widget(Paragraph::new(actions).block(actions_block), chunks[1]);
}

fn format_status_item(label: &str, ok: bool) -> Line<'static> {
    let (icon, style) = if ok {
        ("OK", HeartwiseTheme::status(true))
    } else {
        ("NO", HeartwiseTheme::status(false))
    };

    Line::from(vec![
        Span::styled(format!("  {icon} "), style),
        Span::styled(label.to_string(), HeartwiseTheme::body()),
    ])
}
