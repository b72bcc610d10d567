use std::{fmt, time::Duration};

#[derive(Clone, Default, PartialEq, Eq)]
pub enum Auth {
    #[default]
    None,
    Basic {
        username: String,
        password: Option<String>,
    },
    ApiKey(String),
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Auth::None => f.write_str("None"),
            Auth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Auth::ApiKey(_) => f.write_str("ApiKey(***)"),
        }
    }
}

/// Connection settings for an Elasticsearch cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElasticsearchConfig {
    /// Base URL including scheme and port, e.g. `http://localhost:9200`.
    pub url: String,
    pub auth: Auth,

    /// Transport-level timeout applied to every request.
    pub request_timeout: Option<Duration>,
}

impl ElasticsearchConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            auth: Auth::None,
            request_timeout: None,
        }
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}
