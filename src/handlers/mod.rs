pub mod diagnostics;
pub mod editing;
pub mod health;
pub mod note_update;

pub use diagnostics::*;
pub use editing::*;
pub use health::*;
pub use note_update::*;
