use std::sync::Arc;

use crate::config::Config;
use crate::db::SubmissionStore;
use crate::email::Mailer;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: Arc<dyn SubmissionStore>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Config,
}
