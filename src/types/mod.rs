pub mod price;
pub mod signals;
pub mod stock;

pub use price::*;
pub use signals::*;
pub use stock::*;
