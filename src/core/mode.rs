//! Editor-Modi: Platzierungsart und Reorder-Granularität.

use serde::{Deserialize, Serialize};

/// Wie ein gezogenes Element abgelegt wird.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    /// Listen-Semantik: Verschieben zwischen Containern und Geschwistern
    #[default]
    Reorder,
    /// Koordinaten-Semantik: absolute Platzierung mit Snapping
    Freeform,
}

impl PlacementMode {
    pub fn toggled(self) -> Self {
        match self {
            PlacementMode::Reorder => PlacementMode::Freeform,
            PlacementMode::Freeform => PlacementMode::Reorder,
        }
    }
}

/// Feinheit der Reorder-Container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Nur direkte Kinder der Wurzel, einziges Drop-Ziel ist die Wurzel
    Simple,
    /// Alle erkannten Container sind Drop-Ziele
    #[default]
    Normal,
}
