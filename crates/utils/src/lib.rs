pub mod numbers;
pub mod output;
pub mod positions;

// Re-export commonly used items
pub use crate::numbers::{collapse_whitespace, is_not_available, normalize_label, parse_number};
pub use crate::output::{read_json, write_json};
pub use crate::positions::{consolidate_equity, consolidate_holdings, consolidate_mf};
