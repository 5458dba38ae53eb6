//! Bounded ARIMA(p,d,q) strategy with automatic order selection.

pub mod diff;
pub mod linalg;
mod model;

pub use diff::{difference, undifference, DifferencedSeries};
pub use model::ArimaStrategy;
