//! Escaping und Entity-Dekodierung für Text-Inhalte.
//!
//! Text-Nodes halten ihren Inhalt in der rohen (escapten) Markup-Form,
//! damit unbekannte Entities (`&nbsp;`, `&copy;`) den Round-Trip überleben.

/// Escaped Klartext für die Verwendung als Text-Node-Inhalt.
///
/// Unbekannte Entities, die `decode_entities` stehen gelassen hat, bleiben
/// als Entity erhalten.
pub fn escape_text(plain: &str) -> String {
    let mut out = String::with_capacity(plain.len());
    for (index, ch) in plain.char_indices() {
        match ch {
            '&' if is_unknown_entity(&plain[index + 1..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escaped einen Attributwert für doppelte Anführungszeichen.
pub fn escape_attribute(raw: &str) -> String {
    raw.replace('"', "&quot;")
}

/// Dekodiert die gängigen Entities eines rohen Text-Inhalts.
/// Unbekannte Entities bleiben unverändert stehen.
pub fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find(';').filter(|&end| end <= 10) else {
            out.push('&');
            rest = after;
            continue;
        };
        let name = &after[..end];
        match resolve_entity(name) {
            Some(ch) => out.push(ch),
            None => {
                out.push('&');
                out.push_str(name);
                out.push(';');
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

fn is_unknown_entity(rest: &str) -> bool {
    starts_entity(rest)
        && rest
            .split_once(';')
            .is_some_and(|(name, _)| resolve_entity(name).is_none())
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let numeric = name.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Escaped `&`, die keine gültige Entity einleiten (`Tom & Jerry`).
pub fn escape_bare_ampersands(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len() + 8);
    for (index, ch) in raw.char_indices() {
        if ch == '&' && !starts_entity(&raw[index + 1..]) {
            out.push_str("&amp;");
        } else {
            out.push(ch);
        }
    }
    out
}

fn starts_entity(rest: &str) -> bool {
    let Some(end) = rest.find(';').filter(|&end| end > 0 && end <= 10) else {
        return false;
    };
    let name = &rest[..end];
    match name.strip_prefix('#') {
        Some(numeric) => match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !numeric.is_empty() && numeric.chars().all(|c| c.is_ascii_digit()),
        },
        None => name.chars().all(|c| c.is_ascii_alphanumeric()),
    }
}

/// Kürzt einen Text auf höchstens `max_chars` Zeichen (Char-Grenzen-sicher).
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Fasst Whitespace-Folgen zu einem Leerzeichen zusammen und trimmt.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
