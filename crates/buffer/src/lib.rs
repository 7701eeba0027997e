//! Text buffer for milo.
//!
//! An ordered sequence of rows, each holding raw bytes, a derived rendered
//! form (tabs expanded) and a per-cell highlight classification. Also home
//! to cursor coordinates and the selection model, both of which address
//! buffer positions but own no row data.

mod buffer;
mod cursor;
mod row;
mod selection;

pub use buffer::Buffer;
pub use cursor::Cursor;
pub use row::Row;
pub use selection::Selection;

/// Fallback tab stop width when no configuration is available.
pub const DEFAULT_TAB_STOP: usize = 8;
