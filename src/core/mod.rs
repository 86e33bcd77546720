//! Core-Domänentypen: Dokument-Baum, Styles, Geometrie, Layout, Klassifikation, Snap-Index.

pub mod classification;
/// Lebender Dokument-Baum
///
/// Arena aus Element-, Text- und Kommentar-Nodes mit stabilen IDs.
/// Der Baum ist Modell und Sicht zugleich.
pub mod document;
pub mod geometry;
pub mod layout;
pub mod mode;
pub mod spatial;
pub mod style;
pub mod tags;
pub mod text;

pub use classification::{Classification, NodeClass, NodeRoles};
pub use document::{DocumentTree, ElementData, Node, NodeData, NodeId, NodeMarks, ROOT_TAG};
pub use geometry::{clamp_into, Rect};
pub use layout::{LayoutMetrics, LayoutSnapshot};
pub use mode::{Granularity, PlacementMode};
pub use spatial::{SnapIndex, SnapKind, SnapMatch, SnapPoint};
pub use style::{format_px, parse_px, InlineStyle};
