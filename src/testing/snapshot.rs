//! Snapshot helpers.
//!
//! Plain-text renderings of draw lists and widget trees for snapshot-style
//! assertions.

use std::fmt::Write;

use crate::error::Result;
use crate::gui::Gui;
use crate::render::recorder::{DrawCommand, Recorder};
use crate::tree::node::WidgetId;
use crate::tree::tree::WidgetTree;

/// Paint `gui` into a [`Recorder`] and return one line per draw call.
pub fn render_to_string(gui: &mut Gui) -> Result<String> {
    let mut recorder = Recorder::new();
    gui.paint(&mut recorder)?;
    Ok(commands_to_string(recorder.commands()))
}

/// One line per command, joined with `'\n'`, no trailing newline.
pub fn commands_to_string(commands: &[DrawCommand]) -> String {
    commands
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Indented outline of the attached tree with kinds, names, text and bounds.
///
/// Hidden widgets are marked `[hidden]`, disabled ones `[disabled]`.
pub fn tree_to_string(tree: &WidgetTree) -> String {
    let mut out = String::new();
    outline(tree, tree.root(), 0, &mut out);
    out.truncate(out.trim_end().len());
    out
}

fn outline(tree: &WidgetTree, id: WidgetId, depth: usize, out: &mut String) {
    let Some(widget) = tree.get(id) else { return };
    let b = widget.bounds();
    let _ = write!(out, "{:indent$}{}", "", widget.kind.type_name(), indent = depth * 2);
    if let Some(name) = &widget.name {
        let _ = write!(out, " #{name}");
    }
    if let Some(text) = widget.kind.text() {
        let _ = write!(out, " {text:?}");
    }
    if let Some(checked) = widget.kind.checked() {
        out.push_str(if checked { " [x]" } else { " [ ]" });
    }
    let _ = write!(out, " {},{} {}x{}", b.x, b.y, b.width, b.height);
    if !widget.is_visible() {
        out.push_str(" [hidden]");
    }
    if !widget.is_enabled() {
        out.push_str(" [disabled]");
    }
    out.push('\n');
    for &child in tree.children(id) {
        outline(tree, child, depth + 1, out);
    }
}
