//! Layered layout and canvas rendering of the recorded action graph.

mod collapse;
mod component;
mod filter;
mod focus;
mod lanes;
mod layout;
mod level;
mod rank;
mod render;
mod safe_id;
mod state;
mod style;
pub(crate) mod types;

pub use component::ActionGraphCanvas;
pub use focus::toggle_focus;
pub use layout::{Selection, compute_layout};
pub use types::{GraphLayout, GraphSnapshot, NodeKind};
