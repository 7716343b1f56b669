use hashbrown::Equivalent;
use std::borrow::Cow;
use std::hash::{Hash, Hasher};

/// Polynomial hash over the raw name bytes: seed 1, multiplier 31, bytes
/// taken as unsigned.
pub fn station_hash(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(1u32, |h, &b| h.wrapping_mul(31).wrapping_add(b as u32))
}

/// Owned, byte-exact station identifier with its hash computed once.
#[derive(Debug, Clone)]
pub struct StationKey {
    bytes: Box<[u8]>,
    hash: u32,
}

impl StationKey {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.into(),
            hash: station_hash(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decoded station name. Invalid UTF-8 sequences are replaced rather than
    /// rejected.
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl PartialEq for StationKey {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.bytes == other.bytes
    }
}

impl Eq for StationKey {}

impl Hash for StationKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash);
    }
}

impl From<&str> for StationKey {
    fn from(name: &str) -> Self {
        Self::new(name.as_bytes())
    }
}

/// Borrowed view of a station name inside a line buffer.
///
/// Hashes exactly like [`StationKey`] so a chunk-local map can be searched
/// without copying the name; a key is only allocated for stations not yet
/// present.
#[derive(Debug, Clone, Copy)]
pub struct StationName<'a> {
    bytes: &'a [u8],
    hash: u32,
}

impl<'a> StationName<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            hash: station_hash(bytes),
        }
    }

    pub fn to_key(&self) -> StationKey {
        StationKey {
            bytes: self.bytes.into(),
            hash: self.hash,
        }
    }
}

impl Hash for StationName<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash);
    }
}

impl Equivalent<StationKey> for StationName<'_> {
    fn equivalent(&self, key: &StationKey) -> bool {
        self.hash == key.hash && self.bytes == &*key.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: Hash + ?Sized>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_polynomial_hash() {
        assert_eq!(station_hash(b""), 1);
        // 31 * 1 + 'A'
        assert_eq!(station_hash(b"A"), 31 + 65);
        assert_eq!(station_hash(b"AB"), (31 + 65) * 31 + 66);
        // bytes above 0x7f are unsigned
        assert_eq!(station_hash(&[0xff]), 31 + 255);
    }

    #[test]
    fn test_key_equality_is_byte_exact() {
        let a = StationKey::new(b"Hamburg");
        let b = StationKey::from("Hamburg");
        let c = StationKey::new(b"hamburg");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_borrowed_name_matches_key() {
        let key = StationKey::from("São Paulo");
        let name = StationName::new("São Paulo".as_bytes());

        assert!(name.equivalent(&key));
        assert_eq!(hash_of(&name), hash_of(&key));
        assert_eq!(name.to_key(), key);
        assert!(!StationName::new(b"Sao Paulo").equivalent(&key));
    }

    #[test]
    fn test_name_decodes_lossily() {
        let key = StationKey::new(&[b'A', 0xff, b'B']);
        assert_eq!(key.name(), "A\u{fffd}B");
        assert_eq!(StationKey::from("Zürich").name(), "Zürich");
    }
}
