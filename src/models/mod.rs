pub mod document;
pub mod enums;
pub mod units;
pub mod vital_sign;

pub use document::*;
pub use enums::*;
pub use units::*;
pub use vital_sign::*;
