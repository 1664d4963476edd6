//! Environment-based configuration loading.
//!
//! `~/.beacon/.env.local` is loaded first (values already present in the
//! environment win), then the `BEACON_*` variables are folded into a
//! [`MonitorConfig`]. Absent variables keep their defaults; absence of a
//! transport's settings disables that transport.

use std::env;
use std::path::PathBuf;

use beacon_core::MonitorConfig;

const ENV_FILE: &str = ".beacon/.env.local";

/// Best-effort load of the user's env file; missing is fine.
pub fn load_env_file() {
    let Some(home) = dirs::home_dir() else {
        return;
    };
    let path = home.join(ENV_FILE);
    if path.exists() {
        if let Err(error) = dotenv::from_path(&path) {
            tracing::warn!(path = %path.display(), %error, "failed to load env file");
        }
    }
}

/// Builds the dispatcher configuration from `BEACON_*` variables.
pub fn from_env() -> MonitorConfig {
    let defaults = MonitorConfig::default();

    MonitorConfig {
        project: env::var("BEACON_PROJECT")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(project_from_cwd),
        character: env::var("BEACON_CHARACTER")
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.character),
        serial_enabled: env_flag("BEACON_SERIAL") || env::var("BEACON_SERIAL_PORT").is_ok(),
        serial_port: env::var("BEACON_SERIAL_PORT")
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from),
        http_endpoints: parse_url_list(env::var("BEACON_HTTP_URLS").ok().as_deref()),
        cloud_url: env::var("BEACON_API_URL")
            .ok()
            .filter(|value| !value.is_empty()),
        cloud_token: env::var("BEACON_API_TOKEN")
            .ok()
            .filter(|value| !value.is_empty()),
        auto_launch: env_flag("BEACON_AUTO_LAUNCH"),
        desktop_command: env::var("BEACON_DESKTOP_COMMAND")
            .ok()
            .filter(|value| !value.is_empty()),
        model_cache_path: env::var("BEACON_MODEL_CACHE")
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from),
        debug: env_flag("BEACON_DEBUG") || env_flag("DEBUG"),
    }
}

/// Comma-separated URL list; blanks are dropped, order preserved.
fn parse_url_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn env_flag(name: &str) -> bool {
    matches!(
        env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

/// The project defaults to the working directory's basename.
fn project_from_cwd() -> String {
    env::current_dir()
        .ok()
        .and_then(|cwd| {
            cwd.file_name()
                .map(|name| name.to_string_lossy().to_string())
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "default".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};

    // Env mutation is process-global; serialize these tests.
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    struct EnvGuard {
        key: &'static str,
        prior: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let prior = env::var(key).ok();
            env::set_var(key, value);
            Self { key, prior }
        }

        fn unset(key: &'static str) -> Self {
            let prior = env::var(key).ok();
            env::remove_var(key);
            Self { key, prior }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.prior {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    #[test]
    fn parses_comma_separated_url_list() {
        assert_eq!(
            parse_url_list(Some("http://a, http://b ,,http://c")),
            vec!["http://a", "http://b", "http://c"]
        );
        assert!(parse_url_list(None).is_empty());
        assert!(parse_url_list(Some("  ")).is_empty());
    }

    #[test]
    fn explicit_serial_port_implies_serial_enabled() {
        let _guard = env_lock();
        let _port = EnvGuard::set("BEACON_SERIAL_PORT", "/dev/ttyACM0");
        let _flag = EnvGuard::unset("BEACON_SERIAL");

        let config = from_env();
        assert!(config.serial_enabled);
        assert_eq!(config.serial_port, Some(PathBuf::from("/dev/ttyACM0")));
    }

    #[test]
    fn cloud_transport_requires_both_variables() {
        let _guard = env_lock();
        let _url = EnvGuard::set("BEACON_API_URL", "https://beacon.example.com");
        let _token = EnvGuard::unset("BEACON_API_TOKEN");

        let config = from_env();
        assert!(!config.cloud_enabled());
    }

    #[test]
    fn debug_accepts_either_variable() {
        let _guard = env_lock();
        let _beacon = EnvGuard::unset("BEACON_DEBUG");
        let _plain = EnvGuard::set("DEBUG", "1");
        assert!(from_env().debug);
    }

    #[test]
    fn empty_project_falls_back_to_cwd_basename() {
        let _guard = env_lock();
        let _project = EnvGuard::set("BEACON_PROJECT", "");
        let config = from_env();
        assert!(!config.project.is_empty());
    }
}
