//! Console output formatter for aggregate responses and session state

use colored::Colorize;
use fiesta_domain::{ChatCollection, ProviderKey, Quota, ResponseRecord};

const BAR_WIDTH: usize = 20;

/// Formats responses, quota and chat lists for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One section per provider, successes in yellow and failures in red
    pub fn format_record(record: &ResponseRecord) -> String {
        let responses = match record {
            ResponseRecord::Providers(responses) => responses,
            ResponseRecord::Error(message) => {
                return format!("{} {}\n", "Error:".red().bold(), message);
            }
        };

        let mut output = String::new();
        for (key, outcome) in responses.iter() {
            let title = format!("── {} ──", key.display_name());
            if outcome.is_success() {
                output.push_str(&format!("\n{}\n{}\n", title.yellow().bold(), outcome.as_text()));
            } else {
                output.push_str(&format!("\n{}\n{}\n", title.red().bold(), outcome.as_text()));
            }
        }
        output.push_str(&format!(
            "\n{}\n",
            format!(
                "{}/{} providers answered",
                responses.successes(),
                responses.len()
            )
            .dimmed()
        ));
        output
    }

    /// Format as JSON (the wire shape of the HTTP API)
    pub fn format_json(record: &ResponseRecord) -> String {
        serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string())
    }

    /// `Messages [##########----------] 1/3`
    pub fn format_quota(quota: Quota) -> String {
        let filled = ((quota.ratio() * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
        let bar = if quota.can_send() {
            bar.green()
        } else {
            bar.red()
        };
        format!("{} [{}] {}", "Messages".cyan().bold(), bar, quota)
    }

    pub fn format_limit_notice(quota: Quota) -> String {
        format!(
            "{} You have used all {} messages of this session.",
            "Limit reached.".red().bold(),
            quota.max()
        )
    }

    /// Chats in creation order, the active one marked with `*`
    pub fn format_chat_list(chats: &ChatCollection) -> String {
        let mut output = String::new();
        for chat in chats.chats() {
            let active = chat.id() == chats.active_id();
            let marker = if active { "*" } else { " " };
            let line = format!(
                "{} {}  {} ({} responses)",
                marker,
                chat.id(),
                chat.title(),
                chat.responses().len()
            );
            if active {
                output.push_str(&format!("{}\n", line.bold()));
            } else {
                output.push_str(&format!("{}\n", line));
            }
        }
        output
    }

    pub fn format_providers(providers: &[ProviderKey]) -> String {
        providers
            .iter()
            .map(|k| k.display_name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiesta_domain::{ProviderOutcome, ProviderResponses};
    use std::collections::BTreeMap;

    fn record() -> ResponseRecord {
        let mut outcomes = BTreeMap::new();
        outcomes.insert(ProviderKey::Gemini, ProviderOutcome::success("Hello there"));
        outcomes.insert(
            ProviderKey::Groq,
            ProviderOutcome::failure(ProviderKey::Groq, "HTTP 429: slow down"),
        );
        ResponseRecord::Providers(ProviderResponses::complete(
            &[ProviderKey::Gemini, ProviderKey::Groq],
            outcomes,
        ))
    }

    #[test]
    fn test_record_has_section_per_provider() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format_record(&record());
        assert!(output.contains("── Gemini ──\nHello there"));
        assert!(output.contains("── Groq ──\nGroq error: HTTP 429: slow down"));
        assert!(output.contains("1/2 providers answered"));
    }

    #[test]
    fn test_error_record() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format_record(&ResponseRecord::error("server down"));
        assert_eq!(output, "Error: server down\n");
    }

    #[test]
    fn test_json_matches_wire_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&record())).unwrap();
        assert_eq!(json["gemini"], "Hello there");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_quota_bar() {
        colored::control::set_override(false);
        let mut quota = Quota::new(4);
        quota.record_send();
        let output = ConsoleFormatter::format_quota(quota);
        assert!(output.contains("[#####---------------] 1/4"));
    }

    #[test]
    fn test_chat_list_marks_active() {
        colored::control::set_override(false);
        let mut chats = ChatCollection::new_at(1_000);
        chats.create_at(2_000);
        let output = ConsoleFormatter::format_chat_list(&chats);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1000"));
        assert!(lines[1].starts_with("* 2000"));
    }
}
