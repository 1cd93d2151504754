pub mod filter;
pub mod input;
pub mod viewport;

pub use filter::PointFilter;
pub use viewport::ViewportEngine;
