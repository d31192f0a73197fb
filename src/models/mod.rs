pub mod alert;
pub mod forecast;
pub mod geo;
pub mod summary;

pub use alert::*;
pub use forecast::*;
pub use geo::*;
pub use summary::*;
