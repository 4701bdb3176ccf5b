//! Plain-text rendering of the view for the terminal.

use std::fmt::Write as _;

use client_core::{PreviewPane, ViewState};
use shared::domain::{visible_fields, Operation};

pub fn render_view(view: &ViewState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "input:  {}", render_pane(&view.input_pane));
    let _ = writeln!(out, "output: {}", render_pane(&view.output_pane));
    if let Some(meta) = &view.meta {
        let _ = writeln!(out, "meta:\n{meta}");
    }
    if let Some(status) = &view.status {
        let marker = if status.is_error { "error" } else { "status" };
        let _ = writeln!(out, "{marker}: {}", status.message);
    }
    out
}

fn render_pane(pane: &PreviewPane) -> String {
    match pane {
        PreviewPane::Placeholder(text) => format!("[{text}]"),
        PreviewPane::Image { url } => url.clone(),
    }
}

/// `operation: field, field` for one operation.
pub fn render_fields(operation: Operation) -> String {
    let names: Vec<&str> = visible_fields(operation)
        .into_iter()
        .map(|field| field.name())
        .collect();
    format!("{operation}: {}", names.join(", "))
}
