//! Validated inputs for the data operations.
//!
//! | Type | Wire value |
//! |------|------------|
//! | [`Symbol`] | trimmed, upper-cased ticker |
//! | [`Interval`] | `1min`, `5min`, `15min`, `30min`, `60min` |
//! | [`OutputSize`] | `compact`, `full` |

mod interval;
mod output_size;
mod symbol;

pub use interval::Interval;
pub use output_size::OutputSize;
pub use symbol::Symbol;
