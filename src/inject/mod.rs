pub mod style;
pub mod trigger;

pub use style::*;
pub use trigger::*;
