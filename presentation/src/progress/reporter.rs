//! Progress reporting for the provider fan-out

use colored::Colorize;
use fiesta_application::ProgressNotifier;
use fiesta_domain::ProviderKey;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner with a provider counter, one tick per answered provider
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {prefix:.bold.cyan} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_dispatch(&self, providers: &[ProviderKey]) {
        let pb = ProgressBar::new(providers.len() as u64);
        pb.set_style(Self::style());
        pb.set_prefix("Asking providers");
        pb.set_message("waiting...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_provider_complete(&self, provider: ProviderKey, success: bool) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), provider.display_name())
            } else {
                format!("{} {}", "x".red(), provider.display_name())
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_complete(&self) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_and_clear();
        }
    }
}

/// Line-per-event progress on stderr, for when stderr is not a terminal
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_dispatch(&self, providers: &[ProviderKey]) {
        eprintln!(
            "{} {} ({} providers)",
            "->".cyan(),
            "Asking providers".bold(),
            providers.len()
        );
    }

    fn on_provider_complete(&self, provider: ProviderKey, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), provider.display_name());
        } else {
            eprintln!("  {} {} (failed)", "x".red(), provider.display_name());
        }
    }

    fn on_complete(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_lifecycle() {
        let reporter = ProgressReporter::new();
        reporter.on_dispatch(&ProviderKey::ALL);
        reporter.on_provider_complete(ProviderKey::Gemini, true);
        reporter.on_provider_complete(ProviderKey::Groq, false);

        let position = reporter
            .bar
            .lock()
            .unwrap()
            .as_ref()
            .map(|pb| (pb.position(), pb.length()));
        assert_eq!(position, Some((2, Some(4))));

        reporter.on_complete();
        assert!(reporter.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_complete_without_dispatch_is_harmless() {
        let reporter = ProgressReporter::default();
        reporter.on_provider_complete(ProviderKey::Qwen, true);
        reporter.on_complete();
    }

    #[test]
    fn test_simple_progress_as_notifier() {
        let progress: Box<dyn ProgressNotifier> = Box::new(SimpleProgress);
        progress.on_dispatch(&ProviderKey::ALL);
        progress.on_provider_complete(ProviderKey::Gemini, true);
        progress.on_provider_complete(ProviderKey::Qwen, false);
        progress.on_complete();
    }
}
