//! Interactive charts for the report.
//!
//! Figures are Plotly.js specifications built as JSON; the browser does the
//! drawing, so nothing here needs a graphics stack.

mod figure;
mod plots;

pub use figure::{palette_color, Facets, Figure, PALETTE, PLOTLY_CDN_SCRIPT};
pub use plots::{PlotCollection, Visualizer};
