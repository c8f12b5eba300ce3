use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Global string interner for node IDs — fast comparisons, low memory.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Process-wide counter backing generated ids and disambiguation suffixes.
static COUNTER: AtomicU64 = AtomicU64::new(0);

/// A lightweight, interned identifier for canvas nodes.
/// Internally a `Spur` index — 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Spur);

impl NodeId {
    /// Intern a string as a NodeId, or return the existing id if already interned.
    pub fn intern(s: &str) -> Self {
        NodeId(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh unique id for a newly created node.
    pub fn generate() -> Self {
        Self::intern(&format!("n{}", next_suffix()))
    }

    /// Rewrite a colliding id by appending a generated suffix.
    /// Used when a restored or pasted document carries a duplicate id.
    pub fn disambiguate(&self) -> Self {
        Self::intern(&format!("{}-{}", self.as_str(), next_suffix()))
    }
}

/// Base36 render of the next counter value, short and filename-safe.
fn next_suffix() -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let mut buf = [0u8; 14];
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = DIGITS[(n % 36) as usize];
        n /= 36;
        if n == 0 {
            break;
        }
    }
    // Only ASCII digits/letters end up in the buffer
    String::from_utf8_lossy(&buf[i..]).into_owned()
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NodeId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NodeId::intern("note_1");
        let b = NodeId::intern("note_1");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "note_1");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = NodeId::generate();
        let b = NodeId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn disambiguate_keeps_prefix() {
        let a = NodeId::intern("dup");
        let b = a.disambiguate();
        assert_ne!(a, b);
        assert!(b.as_str().starts_with("dup-"));
    }
}
