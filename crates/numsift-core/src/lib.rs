pub mod domain;
pub mod error;
pub mod extract;
pub mod landline;

pub use domain::MobileNumber;
pub use error::CoreError;
pub use extract::{extract, Extractor};
pub use landline::{scrub_landlines, validate_std_code, StdCodes};
