use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Colors are six-digit hex without the leading `#`, as slide writers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub fill_color: String,
    pub line_color: String,
    pub line_width: f32,
    pub font_size: f32,
    pub text_color: String,
    pub align: HAlign,
    pub valign: VAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorStyle {
    pub line_color: String,
    pub line_width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: f32,
    pub bold: bool,
    pub text_color: Option<String>,
    pub fill_color: Option<String>,
    pub align: Option<HAlign>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub shape: ShapeStyle,
    pub connector: ConnectorStyle,
    pub text: TextStyle,
    pub title: TextStyle,
}

impl Theme {
    pub fn office_default() -> Self {
        Self {
            shape: ShapeStyle {
                fill_color: "4472C4".to_string(),
                line_color: "2E528F".to_string(),
                line_width: 1.0,
                font_size: 12.0,
                text_color: "FFFFFF".to_string(),
                align: HAlign::Center,
                valign: VAlign::Middle,
            },
            connector: ConnectorStyle {
                line_color: "2E528F".to_string(),
                line_width: 1.0,
            },
            text: TextStyle {
                font_size: 12.0,
                bold: false,
                text_color: None,
                fill_color: None,
                align: None,
            },
            title: TextStyle {
                font_size: 18.0,
                bold: true,
                text_color: None,
                fill_color: None,
                align: None,
            },
        }
    }

    pub fn modern() -> Self {
        Self {
            shape: ShapeStyle {
                fill_color: "F8FAFF".to_string(),
                line_color: "C7D2E5".to_string(),
                line_width: 1.0,
                font_size: 13.0,
                text_color: "1C2430".to_string(),
                align: HAlign::Center,
                valign: VAlign::Middle,
            },
            connector: ConnectorStyle {
                line_color: "7A8AA6".to_string(),
                line_width: 1.0,
            },
            text: TextStyle {
                font_size: 13.0,
                bold: false,
                text_color: Some("1C2430".to_string()),
                fill_color: None,
                align: None,
            },
            title: TextStyle {
                font_size: 20.0,
                bold: true,
                text_color: Some("1C2430".to_string()),
                fill_color: None,
                align: None,
            },
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "modern" => Some(Self::modern()),
            "office" | "default" => Some(Self::office_default()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::office_default()
    }
}
