use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The CV document served by `GET <base>/cv`.
///
/// Every field is optional on the wire. Missing keys, `null`s and values of
/// the wrong type fall back to defaults instead of failing the whole load;
/// numbers in text fields are kept as their decimal text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDocument {
    #[serde(deserialize_with = "lenient")]
    pub profile: ProfileSection,
    #[serde(deserialize_with = "lenient_seq")]
    pub experience: Vec<ExperienceItem>,
    #[serde(deserialize_with = "lenient_seq")]
    pub projects: Vec<ProjectItem>,
    /// Not interpreted by the client; kept for completeness.
    #[serde(deserialize_with = "lenient_seq")]
    pub education: Vec<Value>,
    /// Category name → label list. Shape is validated by the skill ranker.
    pub skills: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileSection {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub job_title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub contact: ContactInfo,
    #[serde(deserialize_with = "lenient")]
    pub links: ProfileLinks,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileLinks {
    #[serde(deserialize_with = "lenient_text")]
    pub github: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub linkedin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceItem {
    #[serde(deserialize_with = "lenient_text")]
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub dates: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectItem {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
}

/// Strings as-is, numbers as text, anything else `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Falls back to `T::default()` when the value has the wrong shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Non-arrays become empty; array entries of the wrong shape are dropped.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| T::deserialize(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_document_parses() {
        let doc: ProfileDocument = serde_json::from_value(json!({
            "profile": {
                "name": "Mayar Waleed Nawas",
                "jobTitle": "Full-Stack Engineer",
                "location": "Cairo, Egypt",
                "contact": { "email": "mayar@example.com", "phone": "+20 100 000 0000" },
                "links": { "github": "https://github.com/mayar", "linkedin": "https://linkedin.com/in/mayar" }
            },
            "experience": [
                { "role": "Backend Engineer", "company": "Acme", "dates": "2022 – Present", "location": null }
            ],
            "projects": [
                { "name": "CV Assistant", "url": "https://cv.example.com", "description": "Chat with my CV" }
            ],
            "education": [{ "degree": "BSc Computer Science" }],
            "skills": { "important": ["Go"] }
        }))
        .unwrap();

        assert_eq!(doc.profile.job_title.as_deref(), Some("Full-Stack Engineer"));
        assert_eq!(doc.profile.links.github.as_deref(), Some("https://github.com/mayar"));
        assert_eq!(doc.experience[0].company.as_deref(), Some("Acme"));
        assert!(doc.experience[0].location.is_none());
        assert_eq!(doc.projects[0].name.as_deref(), Some("CV Assistant"));
        assert_eq!(doc.education.len(), 1);
        assert!(doc.skills.is_object());
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let doc: ProfileDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, ProfileDocument::default());
        assert!(doc.skills.is_null());
    }

    #[test]
    fn test_nulls_fall_back_to_defaults() {
        let doc: ProfileDocument = serde_json::from_value(json!({
            "profile": { "name": null, "contact": null, "links": null },
            "experience": null,
            "projects": null,
            "education": null,
            "skills": null
        }))
        .unwrap();
        assert!(doc.profile.name.is_none());
        assert!(doc.profile.contact.email.is_none());
        assert!(doc.experience.is_empty());
        assert!(doc.projects.is_empty());
    }

    #[test]
    fn test_wrongly_typed_leaves_do_not_reject_document() {
        let doc: ProfileDocument = serde_json::from_value(json!({
            "profile": { "name": "Mayar", "jobTitle": ["Engineer"], "contact": { "phone": 123 } },
            "experience": [{ "role": "Eng", "dates": 2022, "company": { "name": "Acme" } }],
            "skills": { "important": ["Go"] }
        }))
        .unwrap();
        assert_eq!(doc.profile.name.as_deref(), Some("Mayar"));
        assert!(doc.profile.job_title.is_none());
        assert_eq!(doc.profile.contact.phone.as_deref(), Some("123"));
        assert_eq!(doc.experience[0].role.as_deref(), Some("Eng"));
        assert_eq!(doc.experience[0].dates.as_deref(), Some("2022"));
        assert!(doc.experience[0].company.is_none());
        assert_eq!(doc.skills["important"], json!(["Go"]));
    }

    #[test]
    fn test_wrongly_shaped_sections_fall_back_to_empty() {
        let doc: ProfileDocument = serde_json::from_value(json!({
            "profile": "Mayar",
            "experience": { "role": "Eng" },
            "projects": ["CV Assistant", { "name": "Portfolio", "url": 7 }],
            "education": "BSc"
        }))
        .unwrap();
        assert_eq!(doc.profile, ProfileSection::default());
        assert!(doc.experience.is_empty());
        assert_eq!(doc.projects.len(), 1);
        assert_eq!(doc.projects[0].name.as_deref(), Some("Portfolio"));
        assert_eq!(doc.projects[0].url.as_deref(), Some("7"));
        assert!(doc.education.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let doc: ProfileDocument = serde_json::from_value(json!({
            "profile": { "name": "Mayar", "pronouns": "he/him" },
            "certifications": ["AWS"]
        }))
        .unwrap();
        assert_eq!(doc.profile.name.as_deref(), Some("Mayar"));
    }
}
