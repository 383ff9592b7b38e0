use std::ffi::OsStr;
use std::path::{Component, Path};

/// Converts a path relative to the scan root into a manifest key.
///
/// Components are joined with `/` regardless of platform so keys compare
/// equal to paths recorded by `md5sum`. Returns `None` for paths that are not
/// valid UTF-8 or that contain anything other than normal components.
#[must_use]
pub fn relative_key(path: &Path) -> Option<String> {
    let mut key = String::new();
    for component in path.components() {
        let Component::Normal(part) = component else {
            return None;
        };
        if !key.is_empty() {
            key.push('/');
        }
        key.push_str(part.to_str()?);
    }
    if key.is_empty() { None } else { Some(key) }
}

/// Whether a file name marks a hidden entry.
#[must_use]
pub fn is_hidden_name(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}
