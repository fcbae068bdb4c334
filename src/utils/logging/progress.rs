//! Spinner shown by the command-line tools while the pipeline runs

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner layout: elapsed time followed by the current message
pub const SPINNER_TEMPLATE: &str = "{spinner:.cyan} [{elapsed_precise}] {msg}";

const TICK: Duration = Duration::from_millis(120);

/// Start a spinner for work of unknown length
#[must_use]
pub fn create_spinner(message: Option<&str>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    match ProgressStyle::with_template(SPINNER_TEMPLATE) {
        Ok(style) => spinner.set_style(style),
        Err(e) => log::debug!("spinner template rejected: {e}"),
    }
    if let Some(message) = message {
        spinner.set_message(message.to_owned());
    }
    spinner.enable_steady_tick(TICK);
    spinner
}

/// Stop a spinner and remove it from the terminal
pub fn finish_and_clear(spinner: &ProgressBar) {
    spinner.finish_and_clear();
}
