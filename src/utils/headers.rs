use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderValue, REFERER, USER_AGENT};
use std::fs;
use tracing::{debug, warn};

use crate::config::{Config, HeaderMode};

/// Supplies the headers sent with every request.
pub trait HeaderProvider: Send + Sync {
    fn headers(&self) -> HeaderMap;
}

/// Always the same User-Agent and Referer.
#[derive(Debug, Clone)]
pub struct StaticHeaders {
    user_agent: String,
    referer: String,
}

impl StaticHeaders {
    pub fn new(user_agent: impl Into<String>, referer: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            referer: referer.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.static_user_agent.clone(), config.referer.clone())
    }
}

impl HeaderProvider for StaticHeaders {
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&self.user_agent) {
            Ok(value) => {
                headers.insert(USER_AGENT, value);
            }
            Err(e) => warn!("Static User-Agent is not a valid header value: {}", e),
        }
        match HeaderValue::from_str(&self.referer) {
            Ok(value) => {
                headers.insert(REFERER, value);
            }
            Err(e) => warn!("Referer is not a valid header value: {}", e),
        }
        headers
    }
}

/// Picks a random User-Agent from a pool for each request. Whenever no usable
/// value can be produced the static headers are sent instead.
#[derive(Debug, Clone)]
pub struct RandomHeaders {
    pool: Vec<String>,
    referer: String,
    fallback: StaticHeaders,
}

impl RandomHeaders {
    pub fn new(pool: Vec<String>, referer: impl Into<String>, fallback: StaticHeaders) -> Self {
        Self {
            pool,
            referer: referer.into(),
            fallback,
        }
    }

    /// Pool from `user_agents` plus every non-empty line of `user_agents_file`.
    pub fn from_config(config: &Config) -> Self {
        let mut pool = config.user_agents.clone();

        if let Some(path) = &config.user_agents_file {
            match fs::read_to_string(path) {
                Ok(content) => {
                    let before = pool.len();
                    pool.extend(
                        content
                            .lines()
                            .map(str::trim)
                            .filter(|line| !line.is_empty())
                            .map(String::from),
                    );
                    debug!("Loaded {} user agents from {}", pool.len() - before, path.display());
                }
                Err(e) => warn!("Could not read user agents from {}: {}", path.display(), e),
            }
        }

        Self::new(pool, config.referer.clone(), StaticHeaders::from_config(config))
    }

    fn generate(&self) -> Option<HeaderMap> {
        let user_agent = self.pool.choose(&mut rand::thread_rng())?;
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent).ok()?);
        headers.insert(REFERER, HeaderValue::from_str(&self.referer).ok()?);
        Some(headers)
    }
}

impl HeaderProvider for RandomHeaders {
    fn headers(&self) -> HeaderMap {
        self.generate().unwrap_or_else(|| {
            warn!("Not able to generate a User-Agent, sending static headers instead");
            self.fallback.headers()
        })
    }
}

pub fn header_provider(config: &Config) -> Box<dyn HeaderProvider> {
    match config.header_mode {
        HeaderMode::Static => Box::new(StaticHeaders::from_config(config)),
        HeaderMode::Generated => Box::new(RandomHeaders::from_config(config)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const UA: &str = "StaticAgent/1.0";
    const REF: &str = "https://www.google.com/";

    fn user_agent(headers: &HeaderMap) -> &str {
        headers.get(USER_AGENT).unwrap().to_str().unwrap()
    }

    #[test]
    fn static_headers_carry_agent_and_referer() {
        let headers = StaticHeaders::new(UA, REF).headers();
        assert_eq!(user_agent(&headers), UA);
        assert_eq!(headers.get(REFERER).unwrap(), REF);
    }

    #[test]
    fn random_headers_pick_from_pool() {
        let pool = vec!["AgentA/1".to_string(), "AgentB/2".to_string()];
        let provider = RandomHeaders::new(pool.clone(), REF, StaticHeaders::new(UA, REF));

        for _ in 0..20 {
            let headers = provider.headers();
            assert!(pool.iter().any(|agent| agent == user_agent(&headers)));
            assert_eq!(headers.get(REFERER).unwrap(), REF);
        }
    }

    #[test]
    fn empty_pool_falls_back_to_static() {
        let provider = RandomHeaders::new(Vec::new(), REF, StaticHeaders::new(UA, REF));
        assert_eq!(user_agent(&provider.headers()), UA);
    }

    #[test]
    fn unusable_agent_falls_back_to_static() {
        let pool = vec!["broken\nagent".to_string()];
        let provider = RandomHeaders::new(pool, REF, StaticHeaders::new(UA, REF));
        assert_eq!(user_agent(&provider.headers()), UA);
    }

    #[test]
    fn pool_is_extended_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "FileAgent/3\n\n  ").unwrap();

        let config = Config {
            user_agents: Vec::new(),
            user_agents_file: Some(file.path().to_path_buf()),
            ..Config::default()
        };
        let provider = RandomHeaders::from_config(&config);
        assert_eq!(user_agent(&provider.headers()), "FileAgent/3");
    }

    #[test]
    fn unreadable_file_keeps_configured_pool() {
        let config = Config {
            user_agents: Vec::new(),
            user_agents_file: Some("/nonexistent/agents.txt".into()),
            static_user_agent: UA.to_string(),
            ..Config::default()
        };
        let provider = header_provider(&config);
        assert_eq!(user_agent(&provider.headers()), UA);
    }

    #[test]
    fn mode_selects_provider() {
        let config = Config {
            header_mode: HeaderMode::Static,
            static_user_agent: UA.to_string(),
            ..Config::default()
        };
        assert_eq!(user_agent(&header_provider(&config).headers()), UA);
    }
}
