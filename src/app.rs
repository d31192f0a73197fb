use crate::config::Config;
use crate::error::Result;
use crate::logic::{ForecastSession, SessionState};
use std::sync::Arc;

pub struct App {
    pub session: Arc<ForecastSession>,
    pub snapshot: SessionState,
    pub input: String,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let session = Arc::new(ForecastSession::from_config(config)?);
        Ok(Self::with_session(config, session))
    }

    pub fn with_session(config: &Config, session: Arc<ForecastSession>) -> Self {
        Self {
            session,
            snapshot: SessionState::default(),
            input: config.default_location.clone(),
            status_message: None,
            should_quit: false,
        }
    }

    /// Copy the session state for the next frame
    pub async fn sync(&mut self) {
        self.snapshot = self.session.snapshot().await;
    }

    /// Start a text lookup for the current input. Returns false for blank input.
    pub fn search(&mut self) -> bool {
        let query = self.input.trim().to_string();
        if query.is_empty() {
            self.set_status("Type a place name first");
            return false;
        }

        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            session.lookup_by_text(&query).await;
        });
        self.clear_status();
        true
    }

    pub fn locate(&mut self) {
        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            session.lookup_by_device().await;
        });
        self.set_status("Using device location");
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
