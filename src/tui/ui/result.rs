//! Prediction result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::application::PredictionStage;
use crate::domain::{Assessment, PredictionLabel};
use crate::tui::styles::HeartwiseTheme;

/// Result panel state
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// Worker running
    Running { stage: PredictionStage },
    /// Completed with result
    Complete { assessment: Box<Assessment> },
    /// Error occurred
    Error { message: String },
}

fn stage_progress(stage: PredictionStage) -> f64 {
    match stage {
        PredictionStage::Encoding => 0.2,
        PredictionStage::Scaling => 0.5,
        PredictionStage::Scoring => 0.8,
    }
}

/// Render the result panel
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    match state {
        ResultState::Idle => render_idle(f, area),
        ResultState::Running { stage } => render_progress(f, area, *stage),
        ResultState::Complete { assessment } => render_assessment(f, area, assessment),
        ResultState::Error { message } => render_error(f, area, message),
    }
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No prediction yet",
            HeartwiseTheme::label(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Fill in the form and press [Enter] to predict",
            HeartwiseTheme::faint(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(Span::styled(" Prediction Result ", HeartwiseTheme::panel_title()))
            .borders(Borders::ALL)
            .border_style(HeartwiseTheme::frame(false)),
    );

    f.render_widget(content, area);
}

fn render_progress(f: &mut Frame, area: Rect, stage: PredictionStage) {
    let block = Block::default()
        .title(Span::styled(" Prediction Result ", HeartwiseTheme::panel_title()))
        .borders(Borders::ALL)
        .border_style(HeartwiseTheme::frame(false));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let progress = stage_progress(stage);
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(HeartwiseTheme::frame(false)),
        )
        .gauge_style(HeartwiseTheme::gauge())
        .percent((progress * 100.0) as u16)
        .label(format!("{:.0}%", progress * 100.0));
    f.render_widget(gauge, chunks[0]);

    let desc = Paragraph::new(Line::from(Span::styled(
        stage.message(),
        HeartwiseTheme::faint(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(desc, chunks[1]);
}

fn render_assessment(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let block = Block::default()
        .title(Span::styled(" Prediction Result ", HeartwiseTheme::panel_title()))
        .borders(Borders::ALL)
        .border_style(HeartwiseTheme::frame(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Label
            Constraint::Length(3), // Probability
            Constraint::Min(0),    // Encoded vector
        ])
        .split(inner);

    let result = &assessment.result;
    let style = HeartwiseTheme::risk(result.label);
    let icon = match result.label {
        PredictionLabel::Negative => "OK",
        PredictionLabel::Positive => "!",
    };

    let label = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{icon} {}", result.label.description()),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Probability of Heart Disease: ", HeartwiseTheme::label()),
            Span::styled(result.percentage(), HeartwiseTheme::body()),
        ]),
    ])
    .alignment(Alignment::Center);
    f.render_widget(label, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(HeartwiseTheme::frame(false)),
        )
        .gauge_style(style)
        .ratio(result.probability.clamp(0.0, 1.0))
        .label(result.percentage());
    f.render_widget(gauge, chunks[1]);

    let mut lines = vec![Line::from(vec![
        Span::styled("Encoded features", HeartwiseTheme::field_active()),
        Span::styled(
            format!("  ({} scaling)", assessment.scaling),
            HeartwiseTheme::faint(),
        ),
    ])];
    for ((name, raw), scaled) in assessment
        .features
        .named()
        .zip(assessment.scaled.as_slice().iter())
    {
        lines.push(Line::from(vec![
            Span::styled(format!("  {name:<9}"), HeartwiseTheme::label()),
            Span::styled(format!("{raw:>7.1}"), HeartwiseTheme::body()),
            Span::styled(format!("  → {scaled:>8.3}"), HeartwiseTheme::faint()),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!(
            "Assessed {}",
            assessment.assessed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        HeartwiseTheme::faint(),
    )));

    f.render_widget(Paragraph::new(lines), chunks[2]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! An error occurred", HeartwiseTheme::alert())),
        Line::from(""),
        Line::from(Span::styled(message, HeartwiseTheme::body())),
        Line::from(""),
        Line::from(Span::styled(
            "Please ensure all inputs are valid and try again.",
            HeartwiseTheme::faint(),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(ratatui::widgets::Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Prediction Result ", HeartwiseTheme::panel_title()))
            .borders(Borders::ALL)
            .border_style(HeartwiseTheme::alert()),
    );

    f.render_widget(content, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{encode, FeatureScaling, PatientObservation, PredictionResult};
    use ratatui::{backend::TestBackend, Terminal};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_renders_label_and_percentage() {
        let features = encode(&PatientObservation::default());
        let scaled = FeatureScaling::PerRequest
            .apply(&features)
            .expect("per-request fit");
        let result = PredictionResult::from_probability(0.7321).expect("in range");
        let state = ResultState::Complete {
            assessment: Box::new(Assessment::new(features, scaled, result, "per-request")),
        };

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("terminal");
        terminal
            .draw(|f| render_result(f, f.area(), &state))
            .expect("draw");

        let text = buffer_text(&terminal);
        assert!(text.contains("Heart Disease Detected"));
        assert!(text.contains("73.21%"));
        assert!(text.contains("trestbps"));
    }

    #[test]
    fn test_renders_error_message() {
        let state = ResultState::Error {
            message: "Model unavailable: missing".into(),
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).expect("terminal");
        terminal
            .draw(|f| render_result(f, f.area(), &state))
            .expect("draw");
        assert!(buffer_text(&terminal).contains("Model unavailable"));
    }
}
