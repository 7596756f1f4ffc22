pub mod dates;
pub mod names;
pub mod ports;
pub mod values;

pub use dates::*;
pub use names::*;
pub use ports::*;
pub use values::*;
