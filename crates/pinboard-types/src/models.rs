use serde::{Deserialize, Serialize};

pub const MAX_BOARD_TITLE_LEN: usize = 20;
pub const MAX_BOARD_COMMENT_LEN: usize = 200;
pub const MAX_PIN_NAME_LEN: usize = 20;

/// Partial update for a pin. Unset fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PinPatch {
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PinPatch {
    pub fn img_url(img_url: impl Into<String>) -> Self {
        Self {
            img_url: Some(img_url.into()),
            description: None,
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            img_url: None,
            description: Some(description.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.img_url.is_none() && self.description.is_none()
    }
}
