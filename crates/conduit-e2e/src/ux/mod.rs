mod presenter;
mod progress;

pub use presenter::{format_outcome, format_summary};
pub use progress::ScenarioSpinner;

use console::style;

pub fn present_error(error: anyhow::Error) {
    let error_text = style("ERROR:").red().bold();
    eprintln!("\n{error_text} {error:#}");
}
