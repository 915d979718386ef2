use std::ffi::OsString;
use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

const ENV_KEYS: &[&str] = &[
    "XDG_CONFIG_HOME",
    "ROOMIFY_UPLOAD__PROGRESS_STEP",
    "ROOMIFY_UPLOAD__PROGRESS_INTERVAL_MS",
    "ROOMIFY_UPLOAD__REDIRECT_DELAY_MS",
    "ROOMIFY_UPLOAD__MAX_FILE_SIZE_MB",
    "ROOMIFY_LOG__LEVEL",
];

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// Puts every touched variable back on drop, even if the test panics.
struct EnvRestore(Vec<(&'static str, Option<OsString>)>);

impl Drop for EnvRestore {
    fn drop(&mut self) {
        for (key, value) in self.0.drain(..) {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

fn write_config(temp_dir: &TempDir, contents: &str) {
    let app_config_dir = temp_dir.path().join("roomify");
    std::fs::create_dir_all(&app_config_dir).expect("create config dir");
    std::fs::write(app_config_dir.join("config.toml"), contents).expect("write config");
}

/// Run `f` with a private config dir holding `config_toml` and no
/// `ROOMIFY_*` variables set.
pub fn with_config_env<T>(config_toml: &str, f: impl FnOnce() -> T) -> T {
    let _guard = env_lock().lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().expect("temp dir");
    write_config(&temp_dir, config_toml);

    let _restore = EnvRestore(
        ENV_KEYS
            .iter()
            .map(|key| (*key, std::env::var_os(key)))
            .collect(),
    );

    std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    for key in &ENV_KEYS[1..] {
        std::env::remove_var(key);
    }

    f()
}
