//! Terminal rendering. Pure string builders; `main` decides when to print.

use std::fmt::Write;

use crate::conversation::shortcuts::SHORTCUTS;
use crate::models::message::{Message, Role};
use crate::profile::display::ProfileDisplay;
use crate::profile::loader::ProfileStatus;
use crate::profile::skills::{PillKind, SkillPill};

pub const HELP: &str = "Type a question and press Enter. End a line with \\ to continue on the next line.
Commands: /1 to /6 shortcut questions, /retry reload the profile, /help, /quit";

/// Sidebar: header fields, contact, skill pills and a short CV summary.
pub fn render_sidebar(status: &ProfileStatus, display: &ProfileDisplay, pills: &[SkillPill]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "({}) {}", display.initials, display.name);
    let _ = writeln!(out, "    {} · {}", display.job_title, display.location);
    let _ = writeln!(out, "    Email: {}  Phone: {}", display.email, display.phone);
    let _ = writeln!(out, "    GitHub: {}  LinkedIn: {}", display.github, display.linkedin);

    match status {
        ProfileStatus::Loading => {
            let _ = writeln!(out, "    Loading profile…");
        }
        ProfileStatus::Unavailable(message) => {
            let _ = writeln!(out, "    {message} Type /retry to try again.");
        }
        ProfileStatus::Ready(loaded) => {
            for job in loaded.document.experience.iter().take(3) {
                let _ = writeln!(
                    out,
                    "    - {} at {} ({})",
                    job.role.as_deref().unwrap_or("Role"),
                    job.company.as_deref().unwrap_or("N/A"),
                    job.dates.as_deref().unwrap_or("dates not listed"),
                );
            }
            for project in loaded.document.projects.iter().take(3) {
                let _ = writeln!(
                    out,
                    "    - Project: {} {}",
                    project.name.as_deref().unwrap_or("Untitled"),
                    project.url.as_deref().unwrap_or_default(),
                );
            }
        }
    }

    if !pills.is_empty() {
        let line = pills.iter().map(render_pill).collect::<Vec<_>>().join(" ");
        let _ = writeln!(out, "    {line}");
    }
    out
}

fn render_pill(pill: &SkillPill) -> String {
    match pill.kind {
        PillKind::Highlight => format!("[*{}]", pill.label),
        _ => format!("[{}]", pill.label),
    }
}

pub fn render_message(message: &Message) -> String {
    let speaker = match message.role {
        Role::User => "You",
        Role::Assistant => "Assistant",
    };
    let time = message.timestamp.format("%H:%M");
    let body = message.content.replace('\n', "\n        ");
    format!("[{time}] {speaker}: {body}")
}

pub fn render_shortcuts(enabled: bool) -> String {
    if !enabled {
        return "Shortcuts are disabled while waiting for an answer.".to_string();
    }
    SHORTCUTS
        .iter()
        .enumerate()
        .map(|(i, s)| format!("/{} {}", i + 1, s.label))
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::profile::loader::LoadedProfile;

    #[test]
    fn test_sidebar_while_loading_has_no_pills() {
        let out = render_sidebar(&ProfileStatus::Loading, &ProfileDisplay::default(), &[]);
        assert!(out.starts_with("(?) Mayar Waleed Nawas"));
        assert!(out.contains("Loading profile"));
        assert!(!out.contains('['));
    }

    #[test]
    fn test_sidebar_ready_lists_experience_and_pills() {
        let document = serde_json::from_value(json!({
            "profile": { "name": "Mayar Waleed Nawas" },
            "experience": [{ "role": "Backend Engineer", "company": "Acme", "dates": "2023" }],
            "skills": { "important": ["Go"], "cloud": ["AWS"] }
        }))
        .unwrap();
        let loaded = LoadedProfile::new(document);
        let out = render_sidebar(
            &ProfileStatus::Ready(Arc::new(loaded.clone())),
            &loaded.display,
            &loaded.pills,
        );
        assert!(out.starts_with("(MN) "));
        assert!(out.contains("Backend Engineer at Acme (2023)"));
        assert!(out.contains("[*Go] [AWS]"));
    }

    #[test]
    fn test_sidebar_unavailable_offers_retry() {
        let status = ProfileStatus::Unavailable("Unable to load profile.".into());
        let out = render_sidebar(&status, &ProfileDisplay::default(), &[]);
        assert!(out.contains("Unable to load profile. Type /retry"));
    }

    #[test]
    fn test_message_indents_continuation_lines() {
        let out = render_message(&Message::user("line one\nline two"));
        assert!(out.ends_with("You: line one\n        line two"));
    }

    #[test]
    fn test_shortcuts_menu_toggles() {
        assert!(render_shortcuts(true).starts_with("/1 "));
        assert!(render_shortcuts(false).contains("disabled"));
    }
}
