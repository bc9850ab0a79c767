use serde::{Deserialize, Serialize};

/// Text format of a stored config.
pub trait ConfigSerializer<TConfig> {
    fn format_name(&self) -> &'static str;
    fn serialize(&self, config: &TConfig) -> Result<String, String>;
    fn deserialize(&self, content: &str) -> Result<TConfig, String>;
}

#[derive(Default)]
pub struct YamlConfigSerializer;

impl<TConfig> ConfigSerializer<TConfig> for YamlConfigSerializer
where
    TConfig: for<'de> Deserialize<'de> + Serialize,
{
    fn format_name(&self) -> &'static str {
        "YAML"
    }

    fn serialize(&self, config: &TConfig) -> Result<String, String> {
        serde_yaml_ng::to_string(config).map_err(|e| format!("Cannot write YAML config: {}", e))
    }

    fn deserialize(&self, content: &str) -> Result<TConfig, String> {
        serde_yaml_ng::from_str(content).map_err(|e| format!("Cannot read YAML config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_serialized_config_lists_every_section() {
        let content = YamlConfigSerializer.serialize(&GameConfig::default()).unwrap();
        for key in [
            "board_size: 8",
            "palette_size: 6",
            "area_burst_on_cross: true",
            "combination_base: 200",
            "moves_allowed: 50",
        ] {
            assert!(content.contains(key), "missing {:?} in\n{}", key, content);
        }
        assert_eq!(ConfigSerializer::<GameConfig>::format_name(&YamlConfigSerializer), "YAML");
    }

    #[test]
    fn test_malformed_yaml_reports_format() {
        let result: Result<GameConfig, String> = YamlConfigSerializer.deserialize("board_size: [1, 2");
        let err = result.unwrap_err();
        assert!(err.starts_with("Cannot read YAML config"), "{}", err);
    }
}
