use std::fs;
use std::io;
use std::path::Path;
use std::process;

use tag_core::settings::SettingsError;

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Install `file` as the process-wide settings. Must run before anything
/// reads `settings()`.
pub fn init_settings_file(file: &Path) -> Result<(), ConfigFileError> {
    let content = fs::read_to_string(file)?;
    tag_core::settings::init_custom(content)?;
    Ok(())
}

pub fn use_settings(file: &str) {
    die!(init_settings_file(Path::new(file)), "Error loading settings {file}: {}");
}

pub fn settings_export() {
    print!("{}", tag_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(tag_core::settings::parse_settings_toml(&content), "Error: {}");
    println!(
        "OK: suggest.delay_ms={}, suggest.max_results={}, dictionary.path={}, fields={}",
        s.suggest.delay_ms,
        s.suggest.max_results,
        s.dictionary.path,
        s.fields.ids.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tag_core::settings::default_toml;

    #[test]
    fn settings_file_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(init_settings_file(&missing), Err(ConfigFileError::Io(_))));

        let invalid = dir.path().join("invalid.toml");
        let toml = default_toml().replace("max_results = 20", "max_results = 0");
        fs::write(&invalid, toml).unwrap();
        assert!(matches!(
            init_settings_file(&invalid),
            Err(ConfigFileError::Settings(SettingsError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn settings_file_is_installed_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let toml = default_toml().replace("max_results = 20", "max_results = 5");
        fs::write(&path, toml).unwrap();

        init_settings_file(&path).unwrap();
        assert!(matches!(
            init_settings_file(&path),
            Err(ConfigFileError::Settings(SettingsError::AlreadyInitialized))
        ));
    }
}
