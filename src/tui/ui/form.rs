//! Heart disease prediction form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{FieldKind, ObservationField, PatientObservation, RawObservation};
use crate::tui::styles::HeartwiseTheme;

/// One form input
#[derive(Debug, Clone)]
pub struct FormField {
    pub field: ObservationField,
    pub value: String,
}

impl FormField {
    fn hint(&self) -> String {
        match self.field.kind() {
            FieldKind::Integer { min, max } => format!("{min:.0}-{max:.0}"),
            FieldKind::Decimal { min, max } => format!("{min:.1}-{max:.1}"),
            FieldKind::Choice(_) => "←/→ to choose".to_string(),
        }
    }
}

/// Prediction form state
pub struct PredictionFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
    /// Feature information panel visible
    pub show_info: bool,
}

impl Default for PredictionFormState {
    fn default() -> Self {
        let defaults = PatientObservation::default();
        Self {
            fields: ObservationField::ALL
                .into_iter()
                .map(|field| FormField {
                    field,
                    value: defaults.display_value(field),
                })
                .collect(),
            selected_field: 0,
            error_message: None,
            show_info: false,
        }
    }
}

impl PredictionFormState {
    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    fn current(&mut self) -> &mut FormField {
        &mut self.fields[self.selected_field]
    }

    /// Type into a numeric field
    pub fn input_char(&mut self, c: char) {
        let field = self.current();
        let accepted = match field.field.kind() {
            FieldKind::Integer { .. } => c.is_ascii_digit(),
            FieldKind::Decimal { .. } => c.is_ascii_digit() || (c == '.' && !field.value.contains('.')),
            FieldKind::Choice(_) => false,
        };
        if accepted {
            field.value.push(c);
            self.error_message = None;
        }
    }

    /// Delete the last character of a numeric field
    pub fn delete_char(&mut self) {
        let field = self.current();
        if !matches!(field.field.kind(), FieldKind::Choice(_)) {
            field.value.pop();
        }
    }

    /// Clear a numeric field
    pub fn clear_field(&mut self) {
        let field = self.current();
        if !matches!(field.field.kind(), FieldKind::Choice(_)) {
            field.value.zeroize();
        }
    }

    /// ←/→: cycle a choice, or step a number within its range.
    pub fn step(&mut self, forward: bool) {
        let field = self.current();
        match field.field.kind() {
            FieldKind::Choice(choices) => {
                let index = choices
                    .iter()
                    .position(|c| c.eq_ignore_ascii_case(&field.value))
                    .unwrap_or(0);
                let next = if forward {
                    (index + 1) % choices.len()
                } else {
                    (index + choices.len() - 1) % choices.len()
                };
                field.value = choices[next].to_string();
            }
            FieldKind::Integer { min, max } => {
                let current: f64 = field.value.parse().unwrap_or(min);
                let next = if forward { current + 1.0 } else { current - 1.0 };
                field.value = format!("{:.0}", next.clamp(min, max));
            }
            FieldKind::Decimal { min, max } => {
                let current: f64 = field.value.parse().unwrap_or(min);
                let next = if forward { current + 0.1 } else { current - 0.1 };
                let next = (next.clamp(min, max) * 100.0).round() / 100.0;
                field.value = format!("{next:?}");
            }
        }
        self.error_message = None;
    }

    pub fn toggle_info(&mut self) {
        self.show_info = !self.show_info;
    }

    /// Restore the default values.
    pub fn reset(&mut self) {
        let show_info = self.show_info;
        self.clear_sensitive();
        *self = Self {
            show_info,
            ..Self::default()
        };
    }

    /// Wipe all field buffers and restore the defaults.
    ///
    /// Called right after a submission is handed to the worker so typed
    /// values do not stay in the UI state.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            field.value.zeroize();
        }
        let defaults = PatientObservation::default();
        for field in self.fields.iter_mut() {
            field.value = defaults.display_value(field.field);
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Collect the form into a string-valued submission.
    #[must_use]
    pub fn to_raw(&self) -> RawObservation {
        let mut raw = RawObservation::new();
        for field in &self.fields {
            raw.set(field.field, field.value.clone());
        }
        raw
    }

    /// Parse and range-check the form.
    ///
    /// # Errors
    /// Returns a message listing every problem found.
    pub fn to_observation(&self) -> Result<PatientObservation, String> {
        let mut raw = self.to_raw();
        let parsed = PatientObservation::try_from(&raw);
        raw.clear();

        let observation = parsed.map_err(|e| e.to_string())?;
        observation.validate().map_err(|errors| {
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        })?;
        Ok(observation)
    }
}

/// Render the prediction form
pub fn render_prediction_form(f: &mut Frame, area: Rect, state: &PredictionFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", HeartwiseTheme::body()),
        Span::styled("Heart Disease Prediction", HeartwiseTheme::heading()),
        Span::styled(" │ Patient Data", HeartwiseTheme::label()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(HeartwiseTheme::frame(false)),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PredictionFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    // Six fields left, seven right.
    let mid = 6;
    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(field_height))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let border_style = HeartwiseTheme::frame(is_selected);
        let title_style = if is_selected {
            HeartwiseTheme::field_active()
        } else {
            HeartwiseTheme::label()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let is_choice = matches!(field.field.kind(), FieldKind::Choice(_));
        let mut spans = vec![Span::raw(" ")];
        if is_choice && is_selected {
            spans.push(Span::styled("◀ ", HeartwiseTheme::key()));
        }
        if field.value.is_empty() {
            spans.push(Span::styled(field.hint(), HeartwiseTheme::faint()));
        } else {
            spans.push(Span::styled(field.value.as_str(), HeartwiseTheme::body()));
        }
        if is_selected {
            if is_choice {
                spans.push(Span::styled(" ▶", HeartwiseTheme::key()));
            } else {
                spans.push(Span::styled("▌", HeartwiseTheme::cursor()));
                spans.push(Span::styled(
                    format!("  ({})", field.hint()),
                    HeartwiseTheme::faint(),
                ));
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PredictionFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", HeartwiseTheme::alert()),
            Span::styled(err.clone(), HeartwiseTheme::alert()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", HeartwiseTheme::key()),
            Span::styled("Navigate ", HeartwiseTheme::key_action()),
            Span::styled("[←→] ", HeartwiseTheme::key()),
            Span::styled("Change ", HeartwiseTheme::key_action()),
            Span::styled("[Enter] ", HeartwiseTheme::key()),
            Span::styled("Predict ", HeartwiseTheme::key_action()),
            Span::styled("[I] ", HeartwiseTheme::key()),
            Span::styled("Feature Info ", HeartwiseTheme::key_action()),
            Span::styled("[R] ", HeartwiseTheme::key()),
            Span::styled("Reset ", HeartwiseTheme::key_action()),
            Span::styled("[Tab] ", HeartwiseTheme::key()),
            Span::styled("Home", HeartwiseTheme::key_action()),
        ])
    };

    let footer = Paragraph::new(content).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(HeartwiseTheme::frame(false)),
    );

    f.render_widget(footer, area);
}

/// Render the feature information panel
pub fn render_feature_info(f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = ObservationField::ALL
        .iter()
        .map(|field| {
            Line::from(vec![
                Span::styled(format!("{}: ", field.label()), HeartwiseTheme::field_active()),
                Span::styled(field.description(), HeartwiseTheme::label()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(" Feature Information ", HeartwiseTheme::panel_title()))
        .borders(Borders::ALL)
        .border_style(HeartwiseTheme::frame(false));

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
