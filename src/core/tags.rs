//! Tag-Tabellen für Parser, Layout-Schätzer und Segmenter.

/// Void-Elemente ohne End-Tag.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elemente, die nie eine sichtbare Box erzeugen.
pub const HIDDEN_TAGS: &[&str] = &[
    "head", "link", "meta", "noscript", "script", "style", "template", "title",
];

/// Inline-Elemente, die im Zeilenfluss nebeneinander stehen.
pub const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "br", "button", "code", "em", "i", "img", "input", "label", "mark",
    "select", "small", "span", "strong", "sub", "sup", "textarea", "u",
];

/// Block-Level-Elemente (sperren Editierbarkeit eines umgebenden Blattes).
pub const BLOCK_LEVEL_TAGS: &[&str] = &[
    "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset", "figure", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p",
    "pre", "section", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Formular-Controls, die nie gezogen werden dürfen.
pub const INTERACTIVE_TAGS: &[&str] = &["button", "input", "option", "select", "textarea"];

pub fn is_void(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

pub fn is_hidden(tag: &str) -> bool {
    HIDDEN_TAGS.contains(&tag)
}

pub fn is_inline(tag: &str) -> bool {
    INLINE_TAGS.contains(&tag)
}

pub fn is_block_level(tag: &str) -> bool {
    BLOCK_LEVEL_TAGS.contains(&tag)
}

pub fn is_interactive(tag: &str) -> bool {
    INTERACTIVE_TAGS.contains(&tag)
}
