use std::sync::Arc;

use crate::api_client::CvApi;
use crate::config::Config;
use crate::conversation::controller::ConversationController;
use crate::conversation::cues::CueSink;
use crate::profile::loader::ProfileLoader;

/// Everything one session owns, built fresh at startup and passed explicitly
/// to the view. The profile and the conversation share no mutable state.
#[derive(Clone)]
pub struct Session {
    pub config: Config,
    pub profile: ProfileLoader,
    pub conversation: ConversationController,
}

impl Session {
    pub fn new(config: Config, api: Arc<dyn CvApi>, cues: Arc<dyn CueSink>) -> Self {
        Self {
            profile: ProfileLoader::new(Arc::clone(&api)),
            conversation: ConversationController::new(api, cues),
            config,
        }
    }
}
