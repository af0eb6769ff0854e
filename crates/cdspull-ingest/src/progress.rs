//! Progress bar for batch runs

use indicatif::{ProgressBar, ProgressStyle};

const BATCH_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} species ({eta})";

/// Create a progress bar over `total` species
pub fn create_batch_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template(BATCH_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
