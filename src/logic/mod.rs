pub mod rules;
pub mod session;
pub mod summary;
pub mod window;

pub use rules::{derive_alerts, AlertEngine};
pub use session::{ForecastSession, ForecastView, SessionPhase, SessionState};
pub use summary::summarize;
pub use window::slice_rolling_window;
