//! Scenario loading and saving.

use std::path::Path;

use rlc_project::Scenario;

use crate::error::{AppError, AppResult};

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> AppResult<Format> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(AppError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load and validate a scenario; the format follows the file extension.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    if !path.exists() {
        return Err(AppError::ScenarioFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    }
    let scenario = match format_of(path)? {
        Format::Yaml => rlc_project::load_yaml(path)?,
        Format::Json => rlc_project::load_json(path)?,
    };
    Ok(scenario)
}

pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    match format_of(path)? {
        Format::Yaml => rlc_project::save_yaml(path, scenario)?,
        Format::Json => rlc_project::save_json(path, scenario)?,
    }
    Ok(())
}

/// The built-in underdamped step scenario.
pub fn builtin_scenario() -> Scenario {
    Scenario::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_selects_format() {
        assert!(matches!(format_of(Path::new("a.yaml")), Ok(Format::Yaml)));
        assert!(matches!(format_of(Path::new("a.YML")), Ok(Format::Yaml)));
        assert!(matches!(format_of(Path::new("a.json")), Ok(Format::Json)));
        assert!(format_of(Path::new("a.toml")).is_err());
        assert!(format_of(Path::new("noext")).is_err());
    }

    #[test]
    fn missing_file_reported_with_path() {
        let err = load_scenario(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, AppError::ScenarioFileRead { .. }));
    }
}
