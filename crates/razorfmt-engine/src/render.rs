use crate::layout::{Doc, LineKind};
use crate::options::FormatOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

/// Renders a `Doc` into a string, breaking groups that do not fit in
/// `options.print_width` columns.
///
/// Indentation is written lazily in front of the next text, so blank lines
/// and line ends never carry trailing whitespace.
pub fn render(doc: &Doc, options: &FormatOptions) -> String {
    let max_width = options.print_width.clamp(20, 400);
    let mut out = String::new();

    // Work stack: (indent, mode, doc)
    let mut stack: Vec<(usize, Mode, &Doc)> = vec![(0, Mode::Break, doc)];
    let mut col = 0usize;
    let mut pending_indent: Option<usize> = None;

    while let Some((indent, mode, doc)) = stack.pop() {
        match doc {
            Doc::Nil => {}
            Doc::Text(s) => {
                write_indent(&mut out, &mut pending_indent);
                out.push_str(s);
                col += s.chars().count();
            }
            Doc::Line(LineKind::Soft) if mode == Mode::Flat => {
                write_indent(&mut out, &mut pending_indent);
                out.push(' ');
                col += 1;
            }
            Doc::Line(_) => {
                while out.ends_with(' ') {
                    out.pop();
                }
                out.push('\n');
                pending_indent = Some(indent);
                col = indent;
            }
            Doc::Concat(items) => {
                for item in items.iter().rev() {
                    stack.push((indent, mode, item));
                }
            }
            Doc::Indent(extra, doc) => stack.push((indent + extra, mode, doc)),
            Doc::Group(doc) => {
                let fits_flat = fits(max_width.saturating_sub(col), indent, doc, &stack);
                let mode = if fits_flat { Mode::Flat } else { Mode::Break };
                stack.push((indent, mode, doc));
            }
        }
    }

    out
}

fn write_indent(out: &mut String, pending_indent: &mut Option<usize>) {
    if let Some(indent) = pending_indent.take() {
        out.extend(std::iter::repeat_n(' ', indent));
    }
}

/// Whether `doc` fits flat in `remaining` columns, followed by whatever the
/// rest of the stack prints before its next line break.
///
/// A hard line inside `doc` itself means the group cannot be flat; a line
/// break in the rest ends the measured line.
fn fits(remaining: usize, indent: usize, doc: &Doc, rest: &[(usize, Mode, &Doc)]) -> bool {
    let mut remaining = remaining as isize;
    // (indent, mode, doc, belongs to the measured group)
    let mut stack: Vec<(usize, Mode, &Doc, bool)> = vec![(indent, Mode::Flat, doc, true)];
    let mut rest = rest.iter().rev();

    while remaining >= 0 {
        let Some((indent, mode, doc, own)) = stack.pop() else {
            match rest.next() {
                Some(&(indent, mode, doc)) => {
                    stack.push((indent, mode, doc, false));
                    continue;
                }
                None => return true,
            }
        };
        match doc {
            Doc::Nil => {}
            Doc::Text(s) => remaining -= s.chars().count() as isize,
            Doc::Line(LineKind::Hard) => return !own,
            Doc::Line(LineKind::Soft) => match mode {
                Mode::Flat => remaining -= 1,
                Mode::Break => return true,
            },
            Doc::Concat(items) => {
                for item in items.iter().rev() {
                    stack.push((indent, mode, item, own));
                }
            }
            Doc::Indent(extra, doc) => stack.push((indent + extra, mode, doc, own)),
            Doc::Group(doc) => {
                let mode = if own { Mode::Flat } else { mode };
                stack.push((indent, mode, doc, own));
            }
        }
    }

    false
}
