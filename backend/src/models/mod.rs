pub mod flight;
pub mod macros;
pub mod text;

pub use flight::*;
pub use text::FoldedText;
