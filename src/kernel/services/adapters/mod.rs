//! Service adapters: OS/runtime specific implementations (IO/async).

pub mod dirs;
pub mod search;
pub mod settings;

pub use dirs::{ensure_log_dir, get_config_dir, get_log_dir};
pub use search::{SearchRequest, SearchService, SearchTask};
pub use settings::{
    ensure_settings_file, get_settings_path, load_settings, load_settings_from, SettingsError,
};
