//! Inline-`style`-Attribut als geordnete Property-Map.
//!
//! Reihenfolge und unbekannte Properties bleiben erhalten, damit ein
//! unveränderter Style byte-gleich zurückgeschrieben wird.

use indexmap::IndexMap;

/// Geparstes Inline-Style (`prop: value; ...`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    properties: IndexMap<String, String>,
}

impl InlineStyle {
    /// Parsed einen Style-String. Ungültige Deklarationen werden übersprungen.
    pub fn parse(raw: &str) -> Self {
        let mut properties = IndexMap::new();
        for declaration in raw.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }
            properties.insert(name, value.to_string());
        }
        Self { properties }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.properties.insert(name.to_string(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.properties.shift_remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Liest eine Längenangabe in px (`12px`, `12`, `12.5px`). Andere Einheiten → `None`.
    pub fn px(&self, name: &str) -> Option<f32> {
        parse_px(self.get(name)?)
    }

    /// Wert der `position`-Property (klein geschrieben), Default `static`.
    pub fn position(&self) -> String {
        self.get("position")
            .map(|p| p.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "static".to_string())
    }

    /// Gibt `true` zurück für `position: absolute`.
    pub fn is_absolute(&self) -> bool {
        self.position() == "absolute"
    }

    /// Gibt `true` zurück für `position: fixed` oder `position: sticky`.
    pub fn is_fixed_or_sticky(&self) -> bool {
        matches!(self.position().as_str(), "fixed" | "sticky")
    }

    /// Gibt `true` zurück für `display: none`.
    pub fn is_hidden(&self) -> bool {
        self.get("display")
            .is_some_and(|d| d.trim().eq_ignore_ascii_case("none"))
    }

    /// Gibt `true` zurück, wenn Kinder horizontal nebeneinander fließen
    /// (`display: flex` ohne Spalten-Richtung, `display: grid` mit Spalten).
    pub fn is_horizontal_flow(&self) -> bool {
        let display = self.get("display").map(|d| d.trim().to_ascii_lowercase());
        match display.as_deref() {
            Some("flex") | Some("inline-flex") => !self
                .get("flex-direction")
                .is_some_and(|d| d.trim().starts_with("column")),
            Some("grid") | Some("inline-grid") => self.get("grid-template-columns").is_some(),
            _ => false,
        }
    }

    /// Schreibt den Style zurück in die Attribut-Form.
    pub fn to_attribute(&self) -> String {
        self.properties
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Parsed `12px` / `12` / `-3.5px` zu f32.
pub fn parse_px(value: &str) -> Option<f32> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    number.parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Formatiert eine px-Länge ohne überflüssige Nachkommastellen.
pub fn format_px(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{}px", rounded as i64)
    } else {
        format!("{}px", rounded)
    }
}
