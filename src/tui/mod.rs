//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a medical-themed interface with:
//! - Navigation sidebar (Home, Heart Disease Prediction)
//! - Home page with model status
//! - Prediction form, feature information and result view

mod app;
mod styles;
mod ui;
mod worker;

pub use app::{build_service, App};
pub use styles::HeartwiseTheme;
pub use worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};
