pub mod mobile;

pub use mobile::MobileNumber;
