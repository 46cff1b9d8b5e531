//! Domain types: daily bars and the column-oriented price series.

pub mod bar;
pub mod series;

pub use bar::Bar;
pub use series::PriceSeries;
