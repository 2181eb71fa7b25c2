//! Operator-facing phase progress on stderr.

use indicatif::{ProgressBar, ProgressStyle};
use lockgraph_store::{Phase, PhaseReporter, StoreError};
use std::fmt::Display;
use std::time::Duration;

/// Shows a spinner while a phase runs, then a ✔/✘ line when it ends.
#[derive(Default)]
pub struct SpinnerReporter {
    spinner: Option<ProgressBar>,
}

impl SpinnerReporter {
    pub fn begin(&mut self, label: impl Display) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("valid template"),
        );
        spinner.set_message(format!("{}...", capitalize(&label.to_string())));
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    pub fn ok(&mut self, label: impl Display) {
        self.clear();
        eprintln!("✔ {}", capitalize(&label.to_string()));
    }

    pub fn fail(&mut self, label: impl Display, error: &dyn Display) {
        self.clear();
        eprintln!("✘ {} failed: {}", capitalize(&label.to_string()), error);
    }

    fn clear(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl PhaseReporter for SpinnerReporter {
    fn started(&mut self, phase: Phase) {
        self.begin(phase);
    }

    fn succeeded(&mut self, phase: Phase) {
        self.ok(phase);
    }

    fn failed(&mut self, phase: Phase, error: &StoreError) {
        self.fail(phase, error);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
