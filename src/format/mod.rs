//! Format masks and the pattern engines that apply them.

pub mod date;
pub mod errors;
pub mod mask;
pub mod number;

mod unit_tests;

pub use date::DatePattern;
pub use errors::{FormatError, FormatResult};
pub use mask::{MaskContext, resolve_mask, synthesize_integer_mask, synthesize_number_mask};
pub use number::{DecimalPattern, DecimalSymbols, ParsedNumber};
