pub mod market;
pub mod price;
pub mod series;
pub mod timestamp;
