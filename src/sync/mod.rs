pub mod broadcaster;
pub mod presence;

pub use broadcaster::*;
pub use presence::*;
