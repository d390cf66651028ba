//! Sector progress display.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar fed from the converter's `(sectors_done, sectors_total)` callback.
///
/// Starts as a spinner and switches to a bar the first time a total is known.
pub(crate) struct SectorProgress {
    pb: ProgressBar,
}

impl SectorProgress {
    pub(crate) fn new(hidden: bool) -> Self {
        let pb = if hidden {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("  {spinner:.cyan} Sector {pos} written")
                    .expect("static pattern")
                    .tick_chars("/-\\|"),
            );
            pb
        };
        Self { pb }
    }

    pub(crate) fn update(&self, done: u64, total: Option<u64>) {
        if let Some(total) = total
            && self.pb.length().is_none()
        {
            self.pb.set_length(total);
            self.pb.set_style(
                ProgressStyle::with_template(
                    "  [{bar:40.cyan/blue}] {pos}/{len} sectors ({percent}%, {eta})",
                )
                .expect("static pattern")
                .progress_chars("=> "),
            );
        }
        self.pb.set_position(done);
    }

    pub(crate) fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
