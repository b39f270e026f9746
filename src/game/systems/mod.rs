pub mod rules;
pub mod visibility;

pub use rules::*;
pub use visibility::*;
