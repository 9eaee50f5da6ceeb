use super::{BarOptions, ProgressReport};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const DETERMINATE_TEMPLATE: &str = "{msg:>12.bold.cyan} [{bar:25}] {pos}/{len}";
const INDETERMINATE_TEMPLATE: &str = "{msg:>12.bold.cyan} [{spinner}] {pos}";

/// A regular progress bar that draws to stderr.
///
/// This is what code gets from the [`registry`](crate::registry) when no
/// interception is installed.
#[derive(Debug)]
pub struct TerminalBar {
    bar: ProgressBar,
}

impl TerminalBar {
    #[must_use]
    pub fn new(options: BarOptions) -> Self {
        let target = if options.disable {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        };

        let bar = ProgressBar::with_draw_target(options.total, target);
        bar.set_style(if options.total.is_some() { determinate_style() } else { indeterminate_style() });
        bar.set_message(options.description);

        Self { bar }
    }
}

fn determinate_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(DETERMINATE_TEMPLATE)
        .expect("could not create progress bar style")
        .progress_chars("=> ")
}

fn indeterminate_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(INDETERMINATE_TEMPLATE)
        .expect("could not create progress bar style")
}

impl ProgressReport for TerminalBar {
    fn advance(&self, n: u64) {
        self.bar.inc(n);
    }

    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_style(determinate_style());
    }

    fn set_description(&self, description: &str) {
        self.bar.set_message(description.to_string());
    }

    fn refresh(&self) {
        self.bar.tick();
    }

    fn close(&self) {
        if !self.bar.is_finished() {
            self.bar.finish();
        }
    }
}

impl Drop for TerminalBar {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_terminal_bar_is_hidden() {
        let bar = TerminalBar::new(BarOptions::new().with_total(3).disabled(true));
        assert!(bar.bar.is_hidden());
        bar.advance(2);
        assert_eq!(bar.bar.position(), 2);
    }

    #[test]
    fn test_close_finishes_once() {
        let bar = TerminalBar::new(BarOptions::new().with_total(3).disabled(true));
        bar.close();
        assert!(bar.bar.is_finished());
        bar.close();
    }

    #[test]
    fn test_set_total_on_spinner() {
        let bar = TerminalBar::new(BarOptions::new().disabled(true));
        assert_eq!(bar.bar.length(), None);
        bar.set_total(9);
        assert_eq!(bar.bar.length(), Some(9));
    }
}
