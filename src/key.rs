use core::fmt::Debug;

/// Maximum number of bytes of a key kept by the table.
///
/// Longer keys are truncated to the last UTF-8 character boundary at or
/// below this length; no error is raised.
pub const MAX_KEY_LEN: usize = 32;

/// Truncates `key` to at most [`MAX_KEY_LEN`] bytes without splitting a
/// character.
#[inline]
pub fn truncate_key(key: &str) -> &str {
    if key.len() <= MAX_KEY_LEN {
        return key;
    }

    let mut end = MAX_KEY_LEN;
    while !key.is_char_boundary(end) {
        end -= 1;
    }
    &key[..end]
}

/// A slot's private copy of its key.
///
/// The bytes live inline in the slot, so the stored key is independent of
/// the caller's buffer from the moment it is assigned.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SlotKey {
    bytes: [u8; MAX_KEY_LEN],
    len: u8,
}

impl Default for SlotKey {
    fn default() -> Self {
        Self {
            bytes: [0; MAX_KEY_LEN],
            len: 0,
        }
    }
}

impl SlotKey {
    /// Copies `key` into inline storage, truncating if needed.
    pub fn new(key: &str) -> Self {
        let key = truncate_key(key);
        let mut bytes = [0; MAX_KEY_LEN];
        bytes[..key.len()].copy_from_slice(key.as_bytes());
        Self {
            bytes,
            len: key.len() as u8,
        }
    }

    /// The stored key text.
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: `bytes[..len]` was copied from a `&str` cut on a character
        // boundary by `truncate_key`, so it is valid UTF-8.
        unsafe { core::str::from_utf8_unchecked(&self.bytes[..self.len as usize]) }
    }
}

impl Debug for SlotKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq<str> for SlotKey {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}
