//! Plain-text rendering of the controller state.

use std::fmt::Write;

use todolist_core::TodoController;

pub fn render(controller: &TodoController) -> String {
    let mut out = String::new();
    let visible = controller.filtered_todos();
    if visible.is_empty() {
        out.push_str("(nothing to show)\n");
    }
    for todo in visible {
        let mark = if todo.completed { 'x' } else { ' ' };
        let _ = writeln!(out, "[{mark}] {:>3}  {}", todo.id, todo.title);
    }

    let counts = controller.counts();
    let _ = writeln!(
        out,
        "{} active, {} completed, {} total (filter: {})",
        counts.active,
        counts.completed,
        counts.total,
        controller.filter()
    );
    if let Some(error) = controller.error() {
        let _ = writeln!(out, "error: {error}");
    }
    out
}
