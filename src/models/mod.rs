pub mod enums;
pub mod extracted;
pub mod package;

pub use enums::*;
pub use extracted::*;
pub use package::*;
