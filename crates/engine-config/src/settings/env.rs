use crate::settings::file::ClusterSection;
use tracing::debug;

pub const USERNAME_VAR: &str = "SCROLL_READER_USERNAME";
pub const PASSWORD_VAR: &str = "SCROLL_READER_PASSWORD";
pub const API_KEY_VAR: &str = "SCROLL_READER_API_KEY";

/// Overrides cluster credentials from the process environment.
pub fn apply_env_overrides(cluster: &mut ClusterSection) {
    apply_overrides(cluster, |name| std::env::var(name).ok());
}

/// Overrides cluster credentials from `lookup`. Empty values are ignored.
pub fn apply_overrides<F>(cluster: &mut ClusterSection, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(username) = get(USERNAME_VAR) {
        debug!(var = USERNAME_VAR, "Cluster username taken from environment.");
        cluster.username = Some(username);
    }
    if let Some(password) = get(PASSWORD_VAR) {
        debug!(var = PASSWORD_VAR, "Cluster password taken from environment.");
        cluster.password = Some(password);
    }
    if let Some(api_key) = get(API_KEY_VAR) {
        debug!(var = API_KEY_VAR, "Cluster API key taken from environment.");
        cluster.api_key = Some(api_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn environment_wins_over_file() {
        let env = HashMap::from([
            (USERNAME_VAR, "env-user".to_string()),
            (PASSWORD_VAR, "env-pass".to_string()),
            (API_KEY_VAR, " ".to_string()),
        ]);
        let mut cluster = ClusterSection {
            username: Some("file-user".to_string()),
            api_key: Some("file-key".to_string()),
            ..ClusterSection::default()
        };

        apply_overrides(&mut cluster, |name| env.get(name).cloned());

        assert_eq!(cluster.username.as_deref(), Some("env-user"));
        assert_eq!(cluster.password.as_deref(), Some("env-pass"));
        assert_eq!(cluster.api_key.as_deref(), Some("file-key"));
    }
}
