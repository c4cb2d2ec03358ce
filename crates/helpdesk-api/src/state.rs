use std::sync::Arc;
use std::time::Duration;

use helpdesk_llm::SupportAgent;
use helpdesk_persist::PersistenceClient;

use crate::config::Config;
use crate::rate_limit::{FixedWindowRateLimiter, RateLimiter};

/// Shared application state passed to all handlers
///
/// All resources are wrapped in Arc for sharing across async tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: Arc<dyn PersistenceClient>,
    pub agent: Arc<SupportAgent>,
    pub rate_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// State with the in-process fixed-window limiter from `config.rate_limit`
    pub fn new(config: Config, persist: Arc<dyn PersistenceClient>, agent: SupportAgent) -> Self {
        let rate_limiter = Arc::new(FixedWindowRateLimiter::new(
            Duration::from_secs(config.rate_limit.window_secs),
            config.rate_limit.max_requests,
        ));
        Self::with_rate_limiter(config, persist, agent, rate_limiter)
    }

    pub fn with_rate_limiter(
        config: Config,
        persist: Arc<dyn PersistenceClient>,
        agent: SupportAgent,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            persist,
            agent: Arc::new(agent),
            rate_limiter,
        }
    }
}
