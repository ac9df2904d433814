use crate::models::profile::ProfileDocument;

pub const DEFAULT_NAME: &str = "Mayar Waleed Nawas";
pub const DEFAULT_JOB_TITLE: &str = "Software Engineer";
pub const DEFAULT_LOCATION: &str = "Remote";
pub const NOT_PROVIDED: &str = "Not provided";

/// Sidebar header fields with defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDisplay {
    pub name: String,
    pub job_title: String,
    pub location: String,
    pub initials: String,
    pub email: String,
    pub phone: String,
    pub github: String,
    pub linkedin: String,
}

impl Default for ProfileDisplay {
    fn default() -> Self {
        Self::from_document(&ProfileDocument::default())
    }
}

impl ProfileDisplay {
    pub fn from_document(doc: &ProfileDocument) -> Self {
        let profile = &doc.profile;
        Self {
            name: or_default(&profile.name, DEFAULT_NAME),
            job_title: or_default(&profile.job_title, DEFAULT_JOB_TITLE),
            location: or_default(&profile.location, DEFAULT_LOCATION),
            // Initials follow the raw name, not the default one.
            initials: initials(profile.name.as_deref().unwrap_or_default()),
            email: or_default(&profile.contact.email, NOT_PROVIDED),
            phone: or_default(&profile.contact.phone, NOT_PROVIDED),
            github: or_default(&profile.links.github, NOT_PROVIDED),
            linkedin: or_default(&profile.links.linkedin, NOT_PROVIDED),
        }
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// "Mayar Waleed Nawas" → "MN", "Mayar" → "MA", "" → "?".
pub fn initials(name: &str) -> String {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    match tokens.as_slice() {
        [] => "?".to_string(),
        [only] => only.chars().take(2).flat_map(char::to_uppercase).collect(),
        [first, .., last] => first
            .chars()
            .take(1)
            .chain(last.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect(),
    }
}
