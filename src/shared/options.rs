//! Zentrale Konfiguration für den Markup-Canvas-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use serde::{Deserialize, Serialize};

use crate::core::{Granularity, LayoutMetrics, PlacementMode};

// ── Interaktion ─────────────────────────────────────────────────────

/// Bewegung (Einheiten), ab der aus einem Klick ein Drag wird.
pub const DRAG_THRESHOLD: f32 = 12.0;

// ── Snapping ────────────────────────────────────────────────────────

/// Maximaler Achsen-Abstand, innerhalb dessen ein Snap-Punkt greift.
pub const SNAP_THRESHOLD: f32 = 12.0;
/// Rasterweite der Grid-Snap-Punkte.
pub const GRID_SIZE: f32 = 20.0;
/// Anteil der Strecke zum Snap-Punkt, der pro Bewegung angewendet wird (1.0 = harter Sprung).
pub const SNAP_PULL_FACTOR: f32 = 1.0;

// ── Freiform-Platzierung ────────────────────────────────────────────

/// Innenabstand zum Containerrand (Rahmen/Outline bleiben sichtbar).
pub const BOUNDARY_PADDING: f32 = 4.0;
/// Mindestabstand zwischen kollidierenden Elementen nach dem Auseinanderschieben.
pub const COLLISION_MIN_DISTANCE: f32 = 12.0;
/// Vertikaler Abstand beim Auto-Arrange.
pub const ARRANGE_SPACING: f32 = 16.0;
/// Zeitversatz pro Element beim Auto-Arrange (ms).
pub const ARRANGE_STAGGER_MS: u32 = 60;
/// Dauer animierter Übergänge (ms).
pub const TRANSITION_DURATION_MS: u32 = 200;

// ── Segmentierung ───────────────────────────────────────────────────

/// Mindestgröße eines Containers bzw. Blocks (Breite, Höhe).
pub const MIN_REGION_SIZE: [f32; 2] = [50.0, 30.0];
/// Mindestgröße eines ziehbaren Elements im Reorder-Modus.
pub const MIN_DRAGGABLE_SIZE: [f32; 2] = [10.0, 10.0];
/// Anzahl Blöcke der letzten Fallback-Stufe.
pub const FALLBACK_BLOCK_LIMIT: usize = 5;
/// Mindestlänge des Textes generischer Blöcke, um editierbar zu sein.
pub const MIN_EDITABLE_TEXT_CHARS: usize = 5;

// ── Feedback ────────────────────────────────────────────────────────

/// Deckkraft des Drag-Ghosts.
pub const GHOST_OPACITY: f32 = 0.5;
/// Deckkraft des gedimmten Original-Elements während eines Drags.
pub const DIMMED_OPACITY: f32 = 0.35;
/// Endradius des Drop-Ripples.
pub const RIPPLE_RADIUS: f32 = 48.0;
/// Lebensdauer von Ripple und Partikeln (ms).
pub const RIPPLE_DURATION_MS: u32 = 450;
/// Anzahl Partikel beim Drop.
pub const PARTICLE_COUNT: usize = 12;

// ── Layout ──────────────────────────────────────────────────────────

/// Standard-Viewport-Größe, bis der Host eine eigene meldet.
pub const VIEWPORT_SIZE: [f32; 2] = [1280.0, 720.0];

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `markup_canvas_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorOptions {
    // ── Interaktion ─────────────────────────────────────────────
    /// Drag-Schwelle (euklidisch)
    pub drag_threshold: f32,

    // ── Snapping ────────────────────────────────────────────────
    /// Snap-Schwelle pro Achse
    pub snap_threshold: f32,
    /// Rasterweite
    pub grid_size: f32,
    /// Grid-Punkte erzeugen
    pub grid_snap_enabled: bool,
    /// Element- und Containerkanten-Punkte erzeugen
    pub element_snap_enabled: bool,
    /// 1.0 = harter Sprung auf den Snap-Punkt, kleiner = gedämpfter Zug
    pub snap_pull_factor: f32,

    // ── Freiform ────────────────────────────────────────────────
    pub boundary_padding: f32,
    pub collision_min_distance: f32,
    pub arrange_spacing: f32,
    pub arrange_stagger_ms: u32,
    pub transition_duration_ms: u32,
    /// Nach jedem Freiform-Drop automatisch anordnen
    pub auto_arrange_after_drop: bool,

    // ── Segmentierung ───────────────────────────────────────────
    pub min_container_size: [f32; 2],
    pub min_block_size: [f32; 2],
    pub min_draggable_size: [f32; 2],
    pub fallback_block_limit: usize,
    pub min_editable_text_chars: usize,
    /// Einzelnen Wrapper unter der Wurzel auflösen
    pub collapse_wrappers: bool,

    // ── Textbearbeitung ─────────────────────────────────────────
    /// Escape verwirft die laufende Bearbeitung statt sie zu übernehmen
    pub escape_reverts_text_edit: bool,

    // ── Feedback ────────────────────────────────────────────────
    pub ghost_opacity: f32,
    pub dimmed_opacity: f32,
    pub ripple_radius: f32,
    pub ripple_duration_ms: u32,
    pub particle_count: usize,

    // ── Modi ────────────────────────────────────────────────────
    pub default_placement_mode: PlacementMode,
    pub default_granularity: Granularity,

    // ── Layout-Schätzer ─────────────────────────────────────────
    /// Viewport-Größe bis zur ersten Host-Meldung
    pub viewport_size: [f32; 2],
    /// Metriken des Fluss-Schätzers
    pub layout: LayoutMetrics,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            drag_threshold: DRAG_THRESHOLD,

            snap_threshold: SNAP_THRESHOLD,
            grid_size: GRID_SIZE,
            grid_snap_enabled: true,
            element_snap_enabled: true,
            snap_pull_factor: SNAP_PULL_FACTOR,

            boundary_padding: BOUNDARY_PADDING,
            collision_min_distance: COLLISION_MIN_DISTANCE,
            arrange_spacing: ARRANGE_SPACING,
            arrange_stagger_ms: ARRANGE_STAGGER_MS,
            transition_duration_ms: TRANSITION_DURATION_MS,
            auto_arrange_after_drop: false,

            min_container_size: MIN_REGION_SIZE,
            min_block_size: MIN_REGION_SIZE,
            min_draggable_size: MIN_DRAGGABLE_SIZE,
            fallback_block_limit: FALLBACK_BLOCK_LIMIT,
            min_editable_text_chars: MIN_EDITABLE_TEXT_CHARS,
            collapse_wrappers: true,

            escape_reverts_text_edit: false,

            ghost_opacity: GHOST_OPACITY,
            dimmed_opacity: DIMMED_OPACITY,
            ripple_radius: RIPPLE_RADIUS,
            ripple_duration_ms: RIPPLE_DURATION_MS,
            particle_count: PARTICLE_COUNT,

            default_placement_mode: PlacementMode::Reorder,
            default_granularity: Granularity::Normal,

            viewport_size: VIEWPORT_SIZE,
            layout: LayoutMetrics::default(),
        }
    }
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    Self::sanitized(opts)
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Ersetzt nicht-endliche oder negative Zahlenwerte durch die Standardwerte.
    ///
    /// Rasterweite und Zeichenmetriken müssen zusätzlich größer als 0 sein.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let dm = defaults.layout;

        sanitize(&mut self.drag_threshold, defaults.drag_threshold, "drag_threshold");
        sanitize(&mut self.snap_threshold, defaults.snap_threshold, "snap_threshold");
        sanitize_positive(&mut self.grid_size, defaults.grid_size, "grid_size");
        sanitize(&mut self.snap_pull_factor, defaults.snap_pull_factor, "snap_pull_factor");
        sanitize(&mut self.boundary_padding, defaults.boundary_padding, "boundary_padding");
        sanitize(
            &mut self.collision_min_distance,
            defaults.collision_min_distance,
            "collision_min_distance",
        );
        sanitize(&mut self.arrange_spacing, defaults.arrange_spacing, "arrange_spacing");
        sanitize(&mut self.ghost_opacity, defaults.ghost_opacity, "ghost_opacity");
        sanitize(&mut self.dimmed_opacity, defaults.dimmed_opacity, "dimmed_opacity");
        sanitize(&mut self.ripple_radius, defaults.ripple_radius, "ripple_radius");

        for (value, fallback, name) in [
            (&mut self.min_container_size, defaults.min_container_size, "min_container_size"),
            (&mut self.min_block_size, defaults.min_block_size, "min_block_size"),
            (&mut self.min_draggable_size, defaults.min_draggable_size, "min_draggable_size"),
            (&mut self.viewport_size, defaults.viewport_size, "viewport_size"),
        ] {
            sanitize(&mut value[0], fallback[0], name);
            sanitize(&mut value[1], fallback[1], name);
        }

        sanitize_positive(&mut self.layout.char_width, dm.char_width, "layout.char_width");
        sanitize_positive(&mut self.layout.line_height, dm.line_height, "layout.line_height");
        sanitize(&mut self.layout.block_padding, dm.block_padding, "layout.block_padding");
        sanitize(&mut self.layout.block_gap, dm.block_gap, "layout.block_gap");
        self
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("markup_canvas_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("markup_canvas_editor.toml")
    }

    /// Snap-Punkte werden überhaupt erzeugt.
    pub fn snapping_enabled(&self) -> bool {
        self.grid_snap_enabled || self.element_snap_enabled
    }
}

fn sanitize(value: &mut f32, fallback: f32, name: &str) {
    if !value.is_finite() || *value < 0.0 {
        log::warn!("Ungültiger Wert für {}: {}, verwende {}", name, value, fallback);
        *value = fallback;
    }
}

fn sanitize_positive(value: &mut f32, fallback: f32, name: &str) {
    if !value.is_finite() || *value <= 0.0 {
        log::warn!("Ungültiger Wert für {}: {}, verwende {}", name, value, fallback);
        *value = fallback;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let opts: EditorOptions = toml::from_str(
            "snap_threshold = 15.0\nescape_reverts_text_edit = true\ndefault_granularity = \"simple\"\n",
        )
        .expect("TOML sollte parsen");

        assert_eq!(opts.snap_threshold, 15.0);
        assert!(opts.escape_reverts_text_edit);
        assert_eq!(opts.default_granularity, Granularity::Simple);
        assert_eq!(opts.grid_size, GRID_SIZE);
        assert_eq!(opts.layout, LayoutMetrics::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("markup_canvas_editor_missing_options.toml");
        let _ = std::fs::remove_file(&path);
        assert_eq!(EditorOptions::load_from_file(&path), EditorOptions::default());
    }

    #[test]
    fn non_finite_values_fall_back_to_defaults() {
        let path = std::env::temp_dir().join("markup_canvas_editor_nan_options.toml");
        std::fs::write(
            &path,
            concat!(
                "boundary_padding = nan\n",
                "grid_size = 0.0\n",
                "snap_threshold = 20.0\n",
                "min_draggable_size = [inf, 4.0]\n",
                "[layout]\n",
                "char_width = -inf\n",
                "line_height = 18.0\n",
                "block_padding = 12.0\n",
                "block_gap = nan\n",
            ),
        )
        .expect("Optionen-Datei sollte schreibbar sein");

        let opts = EditorOptions::load_from_file(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(opts.boundary_padding, BOUNDARY_PADDING);
        assert_eq!(opts.grid_size, GRID_SIZE);
        assert_eq!(opts.snap_threshold, 20.0);
        assert_eq!(opts.min_draggable_size, [MIN_DRAGGABLE_SIZE[0], 4.0]);
        assert_eq!(opts.layout.char_width, LayoutMetrics::default().char_width);
        assert_eq!(opts.layout.line_height, 18.0);
        assert_eq!(opts.layout.block_gap, LayoutMetrics::default().block_gap);
    }
}
