/// Recursive candidate discovery under the scan root.
pub mod walk;

pub use walk::{ScanOptions, scan, scan_with};
