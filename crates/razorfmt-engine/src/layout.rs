use std::fmt;

/// Layout primitives in the Wadler/Leijen style.
///
/// The formatter builds a `Doc` and the renderer decides, group by group,
/// whether soft lines print as spaces (flat) or as line breaks (broken).
#[derive(Clone, PartialEq, Eq)]
pub enum Doc {
    Nil,
    /// Literal text. Never contains a newline.
    Text(String),
    Line(LineKind),
    Concat(Vec<Doc>),
    Indent(usize, Box<Doc>),
    Group(Box<Doc>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Always a line break.
    Hard,
    /// A space when its group is flat, a line break otherwise.
    Soft,
}

impl Doc {
    pub fn nil() -> Self {
        Doc::Nil
    }

    pub fn text<T: Into<String>>(text: T) -> Self {
        let text = text.into();
        debug_assert!(!text.contains('\n'), "line breaks belong in Doc::Line: {text:?}");
        if text.is_empty() {
            Doc::Nil
        } else {
            Doc::Text(text)
        }
    }

    pub fn hardline() -> Self {
        Doc::Line(LineKind::Hard)
    }

    pub fn softline() -> Self {
        Doc::Line(LineKind::Soft)
    }

    /// Concatenates, flattening nested concats and dropping `Nil`.
    pub fn concat(items: Vec<Doc>) -> Self {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Doc::Nil => {}
                Doc::Concat(inner) => out.extend(inner),
                other => out.push(other),
            }
        }
        match out.len() {
            0 => Doc::Nil,
            1 => out.pop().unwrap_or(Doc::Nil),
            _ => Doc::Concat(out),
        }
    }

    pub fn indent(self, spaces: usize) -> Self {
        if spaces == 0 || self.is_nil() {
            self
        } else {
            Doc::Indent(spaces, Box::new(self))
        }
    }

    pub fn group(self) -> Self {
        if self.is_nil() {
            self
        } else {
            Doc::Group(Box::new(self))
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Doc::Nil)
    }

    /// Whether rendering this doc always produces a line break.
    pub fn has_hardline(&self) -> bool {
        match self {
            Doc::Line(LineKind::Hard) => true,
            Doc::Nil | Doc::Text(_) | Doc::Line(LineKind::Soft) => false,
            Doc::Concat(items) => items.iter().any(Doc::has_hardline),
            Doc::Indent(_, doc) | Doc::Group(doc) => doc.has_hardline(),
        }
    }
}

impl fmt::Debug for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Doc::Nil => write!(f, "Nil"),
            Doc::Text(t) => write!(f, "Text({t:?})"),
            Doc::Line(k) => write!(f, "Line({k:?})"),
            Doc::Concat(items) => f.debug_tuple("Concat").field(items).finish(),
            Doc::Indent(n, doc) => f.debug_tuple("Indent").field(n).field(doc).finish(),
            Doc::Group(doc) => f.debug_tuple("Group").field(doc).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn concat_flattens_and_drops_nil() {
        let doc = Doc::concat(vec![
            Doc::nil(),
            Doc::concat(vec![Doc::text("a"), Doc::text("b")]),
            Doc::text(""),
            Doc::hardline(),
        ]);
        assert_eq!(
            doc,
            Doc::Concat(vec![
                Doc::Text("a".into()),
                Doc::Text("b".into()),
                Doc::Line(LineKind::Hard),
            ])
        );
    }

    #[test]
    fn concat_of_one_is_the_item() {
        assert_eq!(Doc::concat(vec![Doc::text("x")]), Doc::text("x"));
        assert!(Doc::concat(vec![Doc::nil(), Doc::nil()]).is_nil());
    }

    #[test]
    fn nil_stays_nil_through_wrappers() {
        assert!(Doc::nil().indent(4).is_nil());
        assert!(Doc::nil().group().is_nil());
    }

    #[test]
    fn hardline_detection() {
        assert!(!Doc::concat(vec![Doc::text("a"), Doc::softline()]).has_hardline());
        assert!(
            Doc::concat(vec![Doc::text("a"), Doc::hardline()])
                .indent(4)
                .group()
                .has_hardline()
        );
    }

    #[test]
    fn debug_is_compact() {
        let doc = Doc::concat(vec![Doc::text("a"), Doc::softline()]).group();
        assert_eq!(
            format!("{doc:?}"),
            r#"Group(Concat([Text("a"), Line(Soft)]))"#
        );
    }
}
