pub mod builder;
mod datetime;
mod duration;
mod input;
mod range;

pub use datetime::DateTime;
pub use datetime::as_bson;
pub use duration::Duration;
pub use input::DateInput;
pub use range::Period;

#[cfg(test)]
pub use datetime::FIXED_NOW;
