//! Form and view state of the process page, plus the pure functions that
//! render it.

use serde_json::Value;
use shared::domain::{visible_fields, Operation, ParamField, ParamValues};

use crate::transport::SelectedFile;

pub const INPUT_PLACEHOLDER: &str = "No image yet";
pub const OUTPUT_PLACEHOLDER: &str = "Not processed yet";
pub const PROCESS_LABEL: &str = "Process";
pub const BUSY_LABEL: &str = "Processing...";
pub const MISSING_FILE_MESSAGE: &str = "Pick an image first.";
pub const FAILURE_FALLBACK: &str = "Failed to process.";
pub const DONE_MESSAGE: &str = "Done ✔";

/// What the user has entered so far.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub file: Option<SelectedFile>,
    pub operation: Operation,
    pub values: ParamValues,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewPane {
    Placeholder(&'static str),
    Image { url: String },
}

impl PreviewPane {
    pub fn image_url(&self) -> Option<&str> {
        match self {
            PreviewPane::Image { url } => Some(url),
            PreviewPane::Placeholder(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, PreviewPane::Placeholder(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: String,
    pub is_error: bool,
}

/// The process button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub enabled: bool,
    pub label: &'static str,
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            enabled: true,
            label: PROCESS_LABEL,
        }
    }
}

/// Everything the page displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub visible_fields: Vec<ParamField>,
    pub input_pane: PreviewPane,
    pub output_pane: PreviewPane,
    /// Pretty-printed metadata; `None` while hidden.
    pub meta: Option<String>,
    /// `None` while hidden.
    pub status: Option<StatusLine>,
    pub trigger: Trigger,
}

impl ViewState {
    pub fn new(operation: Operation) -> Self {
        Self {
            visible_fields: visible_fields(operation),
            input_pane: PreviewPane::Placeholder(INPUT_PLACEHOLDER),
            output_pane: PreviewPane::Placeholder(OUTPUT_PLACEHOLDER),
            meta: None,
            status: None,
            trigger: Trigger::default(),
        }
    }

    pub fn sync_visibility(&mut self, operation: Operation) {
        self.visible_fields = visible_fields(operation);
    }

    pub fn is_field_visible(&self, field: ParamField) -> bool {
        self.visible_fields.contains(&field)
    }

    pub fn set_status(&mut self, message: impl Into<String>, is_error: bool) {
        self.status = Some(StatusLine {
            message: message.into(),
            is_error,
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn show_meta(&mut self, meta: &Value) {
        self.meta = Some(render_meta(meta));
    }

    pub fn hide_meta(&mut self) {
        self.meta = None;
    }

    pub fn show_placeholders(&mut self) {
        self.input_pane = PreviewPane::Placeholder(INPUT_PLACEHOLDER);
        self.output_pane = PreviewPane::Placeholder(OUTPUT_PLACEHOLDER);
    }

    pub fn show_images(&mut self, input_url: &str, output_url: &str) {
        self.input_pane = PreviewPane::Image {
            url: input_url.to_string(),
        };
        self.output_pane = PreviewPane::Image {
            url: output_url.to_string(),
        };
    }

    pub fn begin_busy(&mut self) {
        self.trigger = Trigger {
            enabled: false,
            label: BUSY_LABEL,
        };
    }

    pub fn end_busy(&mut self) {
        self.trigger = Trigger::default();
    }
}

/// Metadata as shown to the user: two-space indented JSON, keys in the order
/// the server sent them.
pub fn render_meta(meta: &Value) -> String {
    serde_json::to_string_pretty(meta).unwrap_or_else(|_| meta.to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_view_shows_placeholders_and_enabled_trigger() {
        let view = ViewState::new(Operation::Sharpen);
        assert!(view.input_pane.is_placeholder());
        assert!(view.output_pane.is_placeholder());
        assert_eq!(view.trigger, Trigger::default());
        assert_eq!(
            view.visible_fields,
            vec![ParamField::Amount, ParamField::Radius]
        );
    }

    #[test]
    fn busy_state_disables_and_relabels_trigger() {
        let mut view = ViewState::new(Operation::Downsampling);
        view.begin_busy();
        assert!(!view.trigger.enabled);
        assert_eq!(view.trigger.label, BUSY_LABEL);
        view.end_busy();
        assert!(view.trigger.enabled);
        assert_eq!(view.trigger.label, PROCESS_LABEL);
    }

    #[test]
    fn meta_keeps_server_key_order() {
        let meta: Value = serde_json::from_str(r#"{"width":200,"height":200}"#).expect("json");
        assert_eq!(
            render_meta(&meta),
            "{\n  \"width\": 200,\n  \"height\": 200\n}"
        );
        assert_eq!(render_meta(&json!(null)), "null");
    }
}
