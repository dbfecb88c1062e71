//! Compile error rendering with a source snippet.

use std::fmt::Write;

use aq_compile::CompileError;

/// Render `err` with the offending source line and a caret under the error
/// offset:
///
/// ```text
/// error: unbalanced brackets
///  --> script.aq:1:8
///   |
/// 1 | Add(1,2
///   |        ^
/// ```
pub fn render_compile_error(source: &str, path: &str, err: &CompileError) -> String {
    // End-of-input errors point just past the last line, not at a blank one
    let offset = err.offset.min(source.trim_end_matches(['\n', '\r']).len());
    let offset = floor_char_boundary(source, offset);

    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[offset..]
        .find('\n')
        .map_or(source.len(), |i| offset + i);
    let line = source[line_start..line_end].trim_end_matches('\r');
    let line_number = source[..line_start].matches('\n').count() + 1;
    let column = source[line_start..offset].chars().count() + 1;
    let gutter = " ".repeat(line_number.to_string().len());

    let mut out = String::new();
    let _ = writeln!(out, "error: {}", err.message());
    let _ = writeln!(out, "{gutter}--> {path}:{line_number}:{column}");
    let _ = writeln!(out, "{gutter} |");
    let _ = writeln!(out, "{line_number} | {line}");
    let _ = writeln!(out, "{gutter} | {}^", " ".repeat(column - 1));
    out
}

fn floor_char_boundary(source: &str, mut offset: usize) -> usize {
    while offset > 0 && !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
