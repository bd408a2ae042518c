//! Progress reporting for debate execution

use colored::Colorize;
use council_application::ports::progress::ProgressNotifier;
use council_domain::{ProviderId, Round};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports debate progress with progress bars
///
/// One bar per round counts settling participants; synthesis gets a
/// spinner since it is a single long call.
pub struct ProgressReporter {
    multi: MultiProgress,
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bar: Mutex::new(None),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_round_start(&self, number: u32, total_rounds: u32, participants: usize) {
        let pb = self.multi.add(ProgressBar::new(participants as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(format!("Round {number}/{total_rounds}"));
        pb.set_message("Consulting the council...");

        *self.bar.lock().unwrap() = Some(pb);
    }

    fn on_participant_complete(&self, _number: u32, id: ProviderId, success: bool) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), id.display_name())
            } else {
                format!("{} {}", "x".red(), id.display_name())
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_round_complete(&self, round: &Round) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            pb.finish_with_message(format!(
                "{} ({} of {} responded)",
                "complete".green(),
                round.success_count(),
                round.participants().len()
            ));
        }
    }

    fn on_synthesis_start(&self, synthesizer: ProviderId) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix("Synthesis");
        pb.set_message(format!("Waiting for {}...", synthesizer.display_name()));
        pb.enable_steady_tick(Duration::from_millis(120));

        *self.bar.lock().unwrap() = Some(pb);
    }

    fn on_synthesis_complete(&self, success: bool) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            if success {
                pb.finish_with_message(format!("{}", "verdict ready".green()));
            } else {
                pb.finish_with_message(format!("{}", "failed".red()));
            }
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_round_start(&self, number: u32, total_rounds: u32, participants: usize) {
        println!(
            "{} Round {}/{} ({} debaters)",
            "->".cyan(),
            number,
            total_rounds,
            participants
        );
    }

    fn on_participant_complete(&self, _number: u32, id: ProviderId, success: bool) {
        if success {
            println!("  {} {}", "v".green(), id.display_name());
        } else {
            println!("  {} {} (failed)", "x".red(), id.display_name());
        }
    }

    fn on_round_complete(&self, _round: &Round) {
        println!();
    }

    fn on_synthesis_start(&self, synthesizer: ProviderId) {
        println!(
            "{} Synthesis by {}",
            "->".cyan(),
            synthesizer.display_name()
        );
    }

    fn on_synthesis_complete(&self, _success: bool) {
        println!();
    }
}
