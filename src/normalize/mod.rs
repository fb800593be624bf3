// src/normalize/mod.rs
// =============================================================================
// Clean-up applied to API values before they reach the dataset.
//
// Submodules:
// - number: turns "1.2万" / "3亿" style counts into integers
// - text: strips zero-width characters and anything the output charset
//   cannot represent
// =============================================================================

mod number;
mod text;

pub use number::parse_count_value;
pub use text::{OutputCharset, TextSanitizer};
