//! Main TUI application state machine.
//!
//! Handles:
//! - Page navigation (sidebar)
//! - Input event handling
//! - Model loading at startup
//! - Background prediction via worker

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::{load_artifacts, DenseNetwork};
use crate::application::PredictionService;
use crate::config::{ScalingMode, Settings};
use crate::domain::FeatureScaling;

use super::ui::{
    form::{render_feature_info, render_prediction_form, PredictionFormState},
    home::{render_home, HomeState},
    render_disclaimer, render_sidebar,
    result::{render_result, ResultState},
};
use super::worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};

/// Current page in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Prediction,
}

impl Screen {
    const ALL: [Self; 2] = [Self::Home, Self::Prediction];

    fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Prediction => "Heart Disease Prediction",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Home => 0,
            Self::Prediction => 1,
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Home => Self::Prediction,
            Self::Prediction => Self::Home,
        }
    }
}

/// Load the model directory and build the prediction service.
///
/// Never fails: a load error yields a service that reports
/// `ModelUnavailable` on every request. Returns whether a manifest verified
/// the files.
pub fn build_service(settings: &Settings) -> (PredictionService<DenseNetwork>, bool) {
    let artifacts = match load_artifacts(&settings.model_path, settings.require_manifest) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            tracing::error!("Failed to load model from {:?}: {}", settings.model_path, e);
            return (PredictionService::unavailable(e.to_string()), false);
        }
    };

    let scaling = match (settings.scaling, artifacts.reference_scaler) {
        (ScalingMode::PerRequest, _) => FeatureScaling::PerRequest,
        (ScalingMode::Reference, Some(scaler)) => FeatureScaling::Reference(scaler),
        (ScalingMode::Reference, None) => {
            let reason = format!(
                "reference scaling requires scaler.json in {:?}",
                artifacts.directory
            );
            tracing::error!("{}", reason);
            return (PredictionService::unavailable(reason), false);
        }
    };

    let service = PredictionService::new(Arc::new(artifacts.network), scaling)
        .with_timeout(settings.predict_timeout);
    (service, artifacts.verified)
}

/// Main application state
pub struct App {
    screen: Screen,

    should_quit: bool,

    /// Prediction service, shared read-only with workers
    service: Arc<PredictionService<DenseNetwork>>,

    home_state: HomeState,

    form_state: PredictionFormState,

    result_state: ResultState,

    /// Pending prediction worker (if running)
    pending_worker: Option<PredictionWorkerHandle>,
}

impl App {
    /// Create the application, loading the model named by `settings`.
    ///
    /// A model that fails to load does not stop startup; predictions then
    /// report it.
    ///
    /// # Errors
    /// Returns error if initialization fails.
    pub fn new(settings: &Settings) -> Result<Self> {
        let (service, verified) = build_service(settings);
        Self::with_dependencies(Arc::new(service), verified)
    }

    /// Create application with an injected service (Composition Root pattern).
    ///
    /// # Errors
    /// Returns error if initialization fails.
    pub fn with_dependencies(
        service: Arc<PredictionService<DenseNetwork>>,
        model_verified: bool,
    ) -> Result<Self> {
        let home_state = HomeState {
            model_loaded: service.is_ready(),
            model_verified,
            model_status: service.status(),
        };

        Ok(Self {
            screen: Screen::Home,
            should_quit: false,
            service,
            home_state,
            form_state: PredictionFormState::default(),
            result_state: ResultState::default(),
            pending_worker: None,
        })
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();

            terminal.draw(|f| {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)])
                    .split(f.area());

                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(30), Constraint::Min(0)])
                    .split(rows[0]);

                let pages = Screen::ALL.map(Screen::title);
                render_sidebar(f, columns[0], &pages, self.screen.index());

                match self.screen {
                    Screen::Home => render_home(f, columns[1], &self.home_state),
                    Screen::Prediction => {
                        let panes = Layout::default()
                            .direction(Direction::Horizontal)
                            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                            .split(columns[1]);
                        render_prediction_form(f, panes[0], &self.form_state);
                        if self.form_state.show_info {
                            render_feature_info(f, panes[1]);
                        } else {
                            render_result(f, panes[1], &self.result_state);
                        }
                    }
                }

                render_disclaimer(f, rows[1]);
            })?;

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Poll the background worker for progress updates.
    fn poll_worker(&mut self) {
        loop {
            let Some(progress) = self
                .pending_worker
                .as_ref()
                .and_then(PredictionWorkerHandle::try_recv)
            else {
                break;
            };

            match progress {
                PredictionProgress::Stage(stage) => {
                    self.result_state = ResultState::Running { stage };
                }
                PredictionProgress::Complete(assessment) => {
                    self.result_state = ResultState::Complete { assessment };
                    self.pending_worker = None;
                    break;
                }
                PredictionProgress::Error(message) => {
                    self.result_state = ResultState::Error { message };
                    self.pending_worker = None;
                    break;
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if matches!(key, KeyCode::Tab | KeyCode::BackTab) {
            self.screen = self.screen.next();
            return;
        }

        match self.screen {
            Screen::Home => self.handle_home_key(key),
            Screen::Prediction => self.handle_prediction_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => {
                self.screen = Screen::Prediction;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            _ => {}
        }
    }

    fn handle_prediction_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.screen = Screen::Home;
            }
            KeyCode::Up => self.form_state.prev_field(),
            KeyCode::Down => self.form_state.next_field(),
            KeyCode::Left => self.form_state.step(false),
            KeyCode::Right => self.form_state.step(true),
            KeyCode::Char('i') | KeyCode::Char('I') => self.form_state.toggle_info(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.form_state.reset();
                self.result_state = ResultState::Idle;
            }
            KeyCode::Char(c) => self.form_state.input_char(c),
            KeyCode::Backspace => self.form_state.delete_char(),
            KeyCode::Delete => self.form_state.clear_field(),
            KeyCode::Enter => self.submit_prediction_form(),
            _ => {}
        }
    }

    fn submit_prediction_form(&mut self) {
        if self.pending_worker.is_some() {
            return;
        }

        match self.form_state.to_observation() {
            Ok(observation) => {
                self.form_state.show_info = false;
                self.result_state = ResultState::Running {
                    stage: crate::application::PredictionStage::Encoding,
                };

                let worker = PredictionWorker::spawn(Arc::clone(&self.service), observation);
                self.pending_worker = Some(worker);

                // Clear typed buffers from the UI immediately.
                self.form_state.clear_sensitive();
            }
            Err(e) => {
                self.form_state.error_message = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::dense::tests::logistic;
    use crate::domain::{PatientObservation, StandardScaler, FEATURE_COUNT};
    use crate::ports::{Classifier, ClassifierError};
    use std::time::Instant;

    fn write_model(dir: &std::path::Path) {
        let mut weights = [0.0; FEATURE_COUNT];
        weights[0] = 0.05;
        let json = serde_json::to_vec(&logistic(weights, -2.0)).expect("serialize");
        std::fs::write(dir.join("model.json"), json).expect("write model");
    }

    fn settings_for(dir: &std::path::Path, scaling: ScalingMode) -> Settings {
        Settings {
            model_path: dir.to_path_buf(),
            scaling,
            ..Settings::default()
        }
    }

    fn wait_for_result(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.pending_worker.is_some() && Instant::now() < deadline {
            app.poll_worker();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_missing_model_still_starts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = App::new(&settings_for(dir.path(), ScalingMode::PerRequest)).expect("app");
        assert!(!app.home_state.model_loaded);

        app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.screen, Screen::Prediction);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        wait_for_result(&mut app);

        match &app.result_state {
            ResultState::Error { message } => assert!(message.contains("Model unavailable")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_reference_scaling_without_scaler_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_model(dir.path());
        let (service, _) = build_service(&settings_for(dir.path(), ScalingMode::Reference));
        assert!(!service.is_ready());
        assert!(service.status().contains("scaler.json"));
    }

    #[test]
    fn test_reference_scaling_with_scaler() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_model(dir.path());
        let scaler = StandardScaler {
            mean: vec![54.0; FEATURE_COUNT],
            scale: vec![9.0; FEATURE_COUNT],
        };
        std::fs::write(
            dir.path().join("scaler.json"),
            serde_json::to_vec(&scaler).expect("serialize"),
        )
        .expect("write scaler");

        let (service, verified) = build_service(&settings_for(dir.path(), ScalingMode::Reference));
        assert!(service.is_ready());
        assert!(!verified);
        assert_eq!(service.scaling_name(), "reference");
    }

    #[test]
    fn test_predict_from_form() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_model(dir.path());
        let mut app = App::new(&settings_for(dir.path(), ScalingMode::PerRequest)).expect("app");
        assert!(app.home_state.model_loaded);

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.screen, Screen::Prediction);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        wait_for_result(&mut app);

        match &app.result_state {
            ResultState::Complete { assessment } => {
                // All-zero scaled input leaves sigmoid(-2.0).
                let expected = 1.0 / (1.0 + 2.0f64.exp());
                assert!((assessment.result.probability - expected).abs() < 1e-12);
                assert_eq!(assessment.result.percentage(), "11.92%");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_invalid_form_does_not_spawn_worker() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_model(dir.path());
        let mut app = App::new(&settings_for(dir.path(), ScalingMode::PerRequest)).expect("app");
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE);

        // Age field: clear and leave empty.
        app.handle_key(KeyCode::Delete, KeyModifiers::NONE);
        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);

        assert!(app.pending_worker.is_none());
        assert!(app.form_state.error_message.is_some());
        assert!(matches!(app.result_state, ResultState::Idle));
    }

    #[test]
    fn test_navigation_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut app = App::new(&settings_for(dir.path(), ScalingMode::PerRequest)).expect("app");

        app.handle_key(KeyCode::Tab, KeyModifiers::NONE);
        app.handle_key(KeyCode::Char('i'), KeyModifiers::NONE);
        assert!(app.form_state.show_info);
        app.handle_key(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.screen, Screen::Home);

        app.handle_key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_form_accepts_resubmit_after_worker_panic() {
        struct Exploding;
        impl Classifier for Exploding {
            fn input_dim(&self) -> usize {
                FEATURE_COUNT
            }
            fn score(&self, _features: &[f64]) -> Result<f64, ClassifierError> {
                panic!("scoring blew up");
            }
            fn describe(&self) -> String {
                "exploding".into()
            }
        }

        let dir = tempfile::tempdir().expect("tempdir");
        write_model(dir.path());
        let mut app = App::new(&settings_for(dir.path(), ScalingMode::PerRequest)).expect("app");
        app.handle_key(KeyCode::Tab, KeyModifiers::NONE);

        let broken = Arc::new(PredictionService::new(
            Arc::new(Exploding),
            FeatureScaling::PerRequest,
        ));
        app.pending_worker = Some(PredictionWorker::spawn(
            broken,
            PatientObservation::default(),
        ));
        wait_for_result(&mut app);
        assert!(app.pending_worker.is_none());
        assert!(matches!(app.result_state, ResultState::Error { .. }));

        app.handle_key(KeyCode::Enter, KeyModifiers::NONE);
        wait_for_result(&mut app);
        assert!(matches!(app.result_state, ResultState::Complete { .. }));
    }
}
