use crate::collab::ModelConfig;
use crate::layout::LayoutConfig;
use crate::theme::Theme;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfig>,
    model: Option<ModelConfigFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    fill_color: Option<String>,
    line_color: Option<String>,
    line_width: Option<f32>,
    font_size: Option<f32>,
    text_color: Option<String>,
    connector_color: Option<String>,
    connector_width: Option<f32>,
    title_font_size: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelConfigFile {
    api_url: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    max_input_chars: Option<usize>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("parsing config {}", path.display()))
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme {theme_name:?}"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        let theme = &mut config.theme;
        if let Some(v) = vars.fill_color {
            theme.shape.fill_color = v;
        }
        if let Some(v) = vars.line_color {
            theme.shape.line_color = v;
        }
        if let Some(v) = vars.line_width {
            theme.shape.line_width = v;
        }
        if let Some(v) = vars.font_size {
            theme.shape.font_size = v;
            theme.text.font_size = v;
        }
        if let Some(v) = vars.text_color {
            theme.shape.text_color = v;
        }
        if let Some(v) = vars.connector_color {
            theme.connector.line_color = v;
        }
        if let Some(v) = vars.connector_width {
            theme.connector.line_width = v;
        }
        if let Some(v) = vars.title_font_size {
            theme.title.font_size = v;
        }
    }

    if let Some(layout) = parsed.layout {
        config.layout = layout;
    }

    if let Some(model) = parsed.model {
        if let Some(v) = model.api_url {
            config.model.api_url = v;
        }
        if let Some(v) = model.model {
            config.model.model = v;
        }
        if model.api_key.is_some() {
            config.model.api_key = model.api_key;
        }
        if let Some(v) = model.max_input_chars {
            config.model.max_input_chars = v;
        }
    }

    Ok(config)
}
