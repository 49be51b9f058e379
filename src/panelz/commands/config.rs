use crate::commands::{CmdMessage, CmdResult, PanelzPaths};
use crate::config::PanelzConfig;
use crate::error::{PanelzError, Result};

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(paths: &PanelzPaths, action: ConfigAction) -> Result<CmdResult> {
    let dir = &paths.data;
    match action {
        ConfigAction::ShowAll => {
            let config = PanelzConfig::load(dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = PanelzConfig::load(dir)?;
            let value = config
                .get(&key)
                .ok_or_else(|| PanelzError::Api(format!("Unknown config key: {}", key)))?;
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(value));
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = PanelzConfig::load_or_default(dir);
            config.set(&key, &value)?;
            config.save(dir)?;
            let display_val = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!(
                "{} set to {}",
                key, display_val
            )));
            Ok(result)
        }
    }
}
