use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use crate::api_client::CvApi;
use crate::models::profile::ProfileDocument;
use crate::profile::display::ProfileDisplay;
use crate::profile::skills::{derive_pills, placeholder_pills, SkillPill};

/// A successfully fetched profile plus everything derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedProfile {
    pub document: ProfileDocument,
    pub display: ProfileDisplay,
    pub pills: Vec<SkillPill>,
}

impl LoadedProfile {
    pub fn new(document: ProfileDocument) -> Self {
        Self {
            display: ProfileDisplay::from_document(&document),
            pills: derive_pills(&document.skills),
            document,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileStatus {
    Loading,
    Ready(Arc<LoadedProfile>),
    /// Load failed; carries the translated, user-presentable message.
    Unavailable(String),
}

/// Fetches the profile document and holds the result for the session.
///
/// Cheap to clone; clones share the same status.
#[derive(Clone)]
pub struct ProfileLoader {
    api: Arc<dyn CvApi>,
    status: Arc<Mutex<ProfileStatus>>,
}

impl ProfileLoader {
    pub fn new(api: Arc<dyn CvApi>) -> Self {
        Self {
            api,
            status: Arc::new(Mutex::new(ProfileStatus::Loading)),
        }
    }

    pub fn status(&self) -> ProfileStatus {
        self.lock().clone()
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        matches!(*self.lock(), ProfileStatus::Loading)
    }

    /// Fetches the profile and replaces the current status with the outcome.
    /// Returns the translated message on failure.
    pub async fn load(&self) -> Result<Arc<LoadedProfile>, String> {
        *self.lock() = ProfileStatus::Loading;

        let outcome = match self.api.fetch_profile().await {
            Ok(document) => {
                let loaded = Arc::new(LoadedProfile::new(document));
                info!("Profile loaded ({} skill pills)", loaded.pills.len());
                Ok(loaded)
            }
            Err(e) => {
                warn!("Profile unavailable: {e}");
                Err(e.profile_message())
            }
        };

        *self.lock() = match &outcome {
            Ok(loaded) => ProfileStatus::Ready(Arc::clone(loaded)),
            Err(message) => ProfileStatus::Unavailable(message.clone()),
        };
        outcome
    }

    /// Manual retry after a failed load. Same request as `load`.
    pub async fn retry(&self) -> Result<Arc<LoadedProfile>, String> {
        self.load().await
    }

    pub fn display(&self) -> ProfileDisplay {
        match &*self.lock() {
            ProfileStatus::Ready(loaded) => loaded.display.clone(),
            _ => ProfileDisplay::default(),
        }
    }

    /// Pills to render right now.
    ///
    /// Nothing while a fetch is outstanding; the placeholders only once
    /// loading has finished with nothing derived.
    pub fn pills_for_display(&self) -> Vec<SkillPill> {
        match &*self.lock() {
            ProfileStatus::Loading => Vec::new(),
            ProfileStatus::Ready(loaded) if !loaded.pills.is_empty() => loaded.pills.clone(),
            ProfileStatus::Ready(_) | ProfileStatus::Unavailable(_) => placeholder_pills(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProfileStatus> {
        self.status.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Notify;

    use crate::api_client::{AskRequest, AskResponse};
    use crate::errors::RemoteError;

    /// Serves a fixed profile result; optionally waits for a release signal.
    struct FakeProfileApi {
        result: Result<ProfileDocument, RemoteError>,
        gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl FakeProfileApi {
        fn returning(result: Result<ProfileDocument, RemoteError>) -> Self {
            Self {
                result,
                gate: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CvApi for FakeProfileApi {
        async fn fetch_profile(&self) -> Result<ProfileDocument, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.result.clone()
        }

        async fn ask(&self, _request: &AskRequest) -> Result<AskResponse, RemoteError> {
            unreachable!("profile tests never ask")
        }
    }

    fn document_with_skills(skills: serde_json::Value) -> ProfileDocument {
        serde_json::from_value(json!({
            "profile": { "name": "Mayar Waleed Nawas", "jobTitle": "Full-Stack Engineer" },
            "skills": skills
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_successful_load_derives_pills_and_display() {
        let doc = document_with_skills(json!({ "important": ["Go"], "cloud": ["AWS"] }));
        let loader = ProfileLoader::new(Arc::new(FakeProfileApi::returning(Ok(doc))));

        let loaded = loader.load().await.unwrap();
        assert_eq!(loaded.pills.len(), 2);
        assert_eq!(loader.display().initials, "MN");
        assert_eq!(loader.display().job_title, "Full-Stack Engineer");
        assert_eq!(loader.pills_for_display(), loaded.pills);
    }

    #[tokio::test]
    async fn test_repeated_loads_are_identical() {
        let doc = document_with_skills(json!({
            "important": ["Rust"],
            "backend": ["Go", "Node.js", "Python"]
        }));
        let api = Arc::new(FakeProfileApi::returning(Ok(doc)));
        let loader = ProfileLoader::new(api.clone());

        let first = loader.load().await.unwrap();
        let second = loader.load().await.unwrap();
        assert_eq!(first.pills, second.pills);
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_pills_while_loading() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeProfileApi {
            result: Ok(document_with_skills(json!({}))),
            gate: Some(gate.clone()),
            calls: AtomicUsize::new(0),
        });
        let loader = ProfileLoader::new(api);
        assert!(loader.is_loading());
        assert!(loader.pills_for_display().is_empty());

        let pending = tokio::spawn({
            let loader = loader.clone();
            async move { loader.load().await }
        });
        tokio::task::yield_now().await;
        assert!(loader.pills_for_display().is_empty());

        gate.notify_one();
        pending.await.unwrap().unwrap();
        // Finished with empty skills: placeholders appear.
        assert_eq!(loader.pills_for_display(), placeholder_pills());
    }

    #[tokio::test]
    async fn test_failed_load_reports_message_and_shows_placeholders() {
        let api = Arc::new(FakeProfileApi::returning(Err(RemoteError::from_status(500, None))));
        let loader = ProfileLoader::new(api);

        let err = loader.load().await.unwrap_err();
        assert_eq!(
            err,
            "The service is temporarily unavailable. Please try again in a moment."
        );
        assert_eq!(loader.status(), ProfileStatus::Unavailable(err));
        assert_eq!(loader.pills_for_display().len(), 4);
        assert_eq!(loader.display().initials, "?");
    }

    #[tokio::test]
    async fn test_retry_repeats_the_fetch() {
        let api = Arc::new(FakeProfileApi::returning(Err(RemoteError::Transport(
            "connection refused".into(),
        ))));
        let loader = ProfileLoader::new(api.clone());

        assert!(loader.load().await.is_err());
        assert!(loader.retry().await.is_err());
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }
}
