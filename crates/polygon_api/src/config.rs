use std::{collections::HashMap, fs, path::Path};

use shared::protocol::{EventName, PolygonCommand};

pub const DEFAULT_SETTINGS_FILE: &str = "polygon.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolygonSettings {
    pub plugin_name: String,
    pub event_prefix: String,
}

impl Default for PolygonSettings {
    fn default() -> Self {
        Self {
            plugin_name: "polygon".into(),
            event_prefix: "POLYGON".into(),
        }
    }
}

impl PolygonSettings {
    pub fn command_prefix(&self) -> String {
        format!("plugin:{}|", self.plugin_name)
    }

    /// Full invocation name, e.g. `plugin:polygon|register`.
    pub fn command_name(&self, command: &PolygonCommand) -> String {
        format!("{}{}", self.command_prefix(), command.name())
    }

    /// Host channel for an event, e.g. `POLYGON_LEFT_CLICK`.
    pub fn channel(&self, name: EventName) -> String {
        format!("{}_{}", self.event_prefix, name.channel_suffix())
    }
}

pub fn load_settings() -> PolygonSettings {
    let mut settings = load_settings_from(Path::new(DEFAULT_SETTINGS_FILE));
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

/// Overlays `POLYGON_*` then `APP__*` variables, so the latter win. Blank
/// values are ignored.
pub fn apply_env_overrides(
    settings: &mut PolygonSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    for key in ["POLYGON_PLUGIN_NAME", "APP__PLUGIN_NAME"] {
        if let Some(v) = lookup(key) {
            set_if_present(&mut settings.plugin_name, &v);
        }
    }
    for key in ["POLYGON_EVENT_PREFIX", "APP__EVENT_PREFIX"] {
        if let Some(v) = lookup(key) {
            set_if_present(&mut settings.event_prefix, &v);
        }
    }
}

/// Defaults overlaid with whatever keys the file provides. A missing or
/// unparsable file yields the defaults.
pub fn load_settings_from(path: &Path) -> PolygonSettings {
    let mut settings = PolygonSettings::default();

    let Ok(raw) = fs::read_to_string(path) else {
        return settings;
    };
    match toml::from_str::<HashMap<String, String>>(&raw) {
        Ok(file_cfg) => {
            if let Some(v) = file_cfg.get("plugin_name") {
                set_if_present(&mut settings.plugin_name, v);
            }
            if let Some(v) = file_cfg.get("event_prefix") {
                set_if_present(&mut settings.event_prefix, v);
            }
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unparsable settings file");
        }
    }

    settings
}

fn set_if_present(slot: &mut String, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        *slot = value.to_string();
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
