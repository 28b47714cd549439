use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use pkgbatch_core::batch::BatchEvent;
use tokio::sync::mpsc;

/// Visual progress monitor for a running batch.
///
/// Single consumer of the runner's event channel; worker tasks never touch
/// the terminal themselves.
pub struct ProgressMonitor {
    multi: MultiProgress,
    overall: ProgressBar,
    task_bars: HashMap<String, ProgressBar>,
    enabled: bool,
    ascii: bool,
}

impl ProgressMonitor {
    pub fn new(total_tasks: usize, label: &str, enabled: bool, ascii: bool) -> Self {
        if !enabled {
            return Self {
                multi: MultiProgress::new(),
                overall: ProgressBar::hidden(),
                task_bars: HashMap::new(),
                enabled: false,
                ascii,
            };
        }

        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total_tasks as u64));

        overall.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} packages {msg}")
                .unwrap()
                .progress_chars(if ascii { "#>-" } else { "█▓▒░  " }),
        );
        overall.set_message(format!("{label} packages..."));

        Self {
            multi,
            overall,
            task_bars: HashMap::new(),
            enabled: true,
            ascii,
        }
    }

    pub fn start_task(&mut self, package: &str) {
        if !self.enabled {
            return;
        }

        let bar = self.multi.add(ProgressBar::new_spinner());
        let style = ProgressStyle::default_spinner()
            .template("  {spinner:.green} {msg}")
            .unwrap();
        let style = if self.ascii {
            style.tick_strings(&["-", "\\", "|", "/"])
        } else {
            style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        };
        bar.set_style(style);
        bar.set_message(package.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        self.task_bars.insert(package.to_string(), bar);
    }

    pub fn finish_task(&mut self, package: &str, success: bool, duration_ms: u64) {
        if !self.enabled {
            return;
        }

        if let Some(bar) = self.task_bars.remove(package) {
            let icon = match (success, self.ascii) {
                (true, false) => "✅",
                (false, false) => "❌",
                (true, true) => "OK",
                (false, true) => "FAIL",
            };
            bar.finish_with_message(format!("{icon} {package} ({duration_ms}ms)"));
        }

        self.overall.inc(1);
    }

    pub fn set_message(&self, msg: &str) {
        if self.enabled {
            self.overall.set_message(msg.to_string());
        }
    }

    /// Remove everything so the summary prints on a clean terminal.
    pub fn clear(&mut self) {
        for (_, bar) in self.task_bars.drain() {
            bar.finish_and_clear();
        }
        if self.enabled {
            self.overall.finish_and_clear();
        }
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        for (_, bar) in self.task_bars.drain() {
            bar.finish_and_clear();
        }
    }
}

/// Drain the runner's event channel until it closes, then clear the display.
pub async fn drive(mut rx: mpsc::UnboundedReceiver<BatchEvent>, mut monitor: ProgressMonitor) {
    while let Some(event) = rx.recv().await {
        match event {
            BatchEvent::TaskStarted { package } => monitor.start_task(&package),
            BatchEvent::TaskFinished {
                package,
                success,
                duration_ms,
            } => monitor.finish_task(&package, success, duration_ms),
            BatchEvent::Finalizing => monitor.set_message("Applying changes..."),
        }
    }
    monitor.clear();
}
