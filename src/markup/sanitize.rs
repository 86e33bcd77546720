//! Bereinigung des Eingabe-Strings vor dem Parsen.
//!
//! Entfernt Markdown-Code-Fences und umschließende Anführungszeichen,
//! reduziert Voll-Dokumente auf Styles + Body-Inhalt und ersetzt
//! Eingaben ohne Markup durch einen sichtbaren Platzhalter.

use regex::Regex;
use std::sync::OnceLock;

/// Platzhalter für Eingaben ohne Tag-Begrenzer.
pub const FALLBACK_MARKUP: &str = "<div class=\"editor-fallback\" style=\"padding: 24px; border: 2px dashed #d97706; background: #fffbeb; color: #92400e;\"><h2>Kein darstellbarer Inhalt</h2><p>Der übergebene Inhalt enthält kein Markup und wurde durch diesen Platzhalter ersetzt.</p></div>";

/// Ergebnis der Bereinigung.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedMarkup {
    pub markup: String,
    /// Eingabe wurde durch [`FALLBACK_MARKUP`] ersetzt
    pub used_fallback: bool,
}

fn cached(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn fence_open() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n?")
}

fn fence_close() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"\r?\n?```\s*$")
}

fn full_document() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?i)<!doctype|<html[\s>]|<body[\s>]")
}

fn style_block() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?is)<style[^>]*>(.*?)</style\s*>")
}

fn body_block() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?is)<body[^>]*>(.*?)(?:</body\s*>|$)")
}

fn html_block() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?is)<html[^>]*>(.*?)(?:</html\s*>|$)")
}

fn head_block() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    cached(&CELL, r"(?is)<head[^>]*>.*?</head\s*>")
}

/// Bereinigt einen beliebigen Eingabe-String zu parsbarem Markup.
pub fn sanitize_markup(input: &str) -> SanitizedMarkup {
    let mut content = strip_wrappers(input.trim());

    if full_document().is_some_and(|re| re.is_match(&content)) {
        content = extract_document(&content);
    }

    if !content.contains('<') || !content.contains('>') {
        log::warn!(
            "Eingabe enthält kein Markup ({} Zeichen), verwende Platzhalter",
            input.chars().count()
        );
        return SanitizedMarkup {
            markup: FALLBACK_MARKUP.to_string(),
            used_fallback: true,
        };
    }

    SanitizedMarkup {
        markup: content,
        used_fallback: false,
    }
}

/// Entfernt Code-Fences und umschließende Anführungszeichen (auch verschachtelt).
fn strip_wrappers(input: &str) -> String {
    let mut content = input.to_string();
    loop {
        let before = content.len();

        if content.starts_with("```") {
            if let Some(re) = fence_open() {
                content = re.replace(&content, "").into_owned();
            }
            if let Some(re) = fence_close() {
                content = re.replace(&content, "").into_owned();
            }
        }

        for quote in ['"', '\'', '`'] {
            if content.len() >= 2 && content.starts_with(quote) && content.ends_with(quote) {
                content = content[1..content.len() - 1].to_string();
            }
        }

        content = content.trim().to_string();
        if content.len() == before {
            return content;
        }
    }
}

/// Reduziert ein Voll-Dokument auf `<style>`-Blöcke gefolgt vom Body-Inhalt.
fn extract_document(content: &str) -> String {
    let styles: String = style_block()
        .map(|re| {
            re.captures_iter(content)
                .filter_map(|caps| caps.get(1))
                .map(|m| format!("<style>{}</style>", m.as_str()))
                .collect()
        })
        .unwrap_or_default();

    let body = body_block()
        .and_then(|re| re.captures(content))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .or_else(|| {
            let inner = html_block()
                .and_then(|re| re.captures(content))
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())?;
            Some(match head_block() {
                Some(re) => re.replace_all(&inner, "").into_owned(),
                None => inner,
            })
        })
        .unwrap_or_default();

    // Style-Blöcke im Body würden sonst doppelt erscheinen
    let body = match style_block() {
        Some(re) => re.replace_all(&body, "").into_owned(),
        None => body,
    };

    format!("{}{}", styles, body.trim())
}
