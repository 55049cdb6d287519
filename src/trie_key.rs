use std::borrow::Cow;

/// The `TrieKey` trait allows a type to be used as a key in a `TrieMap`.
///
/// Keys are sequences of `char`s. Since UTF-8 preserves code point order,
/// walking a trie in ascending `char` order visits keys in the same order as
/// comparing them as `String`s.
pub trait TrieKey {
    /// Returns the characters of the key, in order.
    fn key_chars(&self) -> impl Iterator<Item = char>;

    /// Collects the key into an owned `String`.
    fn to_key_string(&self) -> String {
        self.key_chars().collect()
    }
}

impl TrieKey for str {
    fn key_chars(&self) -> impl Iterator<Item = char> {
        self.chars()
    }

    fn to_key_string(&self) -> String {
        self.to_owned()
    }
}

impl TrieKey for String {
    fn key_chars(&self) -> impl Iterator<Item = char> {
        self.as_str().chars()
    }

    fn to_key_string(&self) -> String {
        self.clone()
    }
}

impl TrieKey for Box<str> {
    fn key_chars(&self) -> impl Iterator<Item = char> {
        self.chars()
    }
}

impl TrieKey for Cow<'_, str> {
    fn key_chars(&self) -> impl Iterator<Item = char> {
        self.chars()
    }
}

impl TrieKey for char {
    fn key_chars(&self) -> impl Iterator<Item = char> {
        std::iter::once(*self)
    }
}

impl TrieKey for [char] {
    fn key_chars(&self) -> impl Iterator<Item = char> {
        self.iter().copied()
    }
}

impl TrieKey for Vec<char> {
    fn key_chars(&self) -> impl Iterator<Item = char> {
        self.iter().copied()
    }
}

impl<const N: usize> TrieKey for [char; N] {
    fn key_chars(&self) -> impl Iterator<Item = char> {
        self.iter().copied()
    }
}

impl<T: TrieKey + ?Sized> TrieKey for &T {
    fn key_chars(&self) -> impl Iterator<Item = char> {
        T::key_chars(*self)
    }

    fn to_key_string(&self) -> String {
        T::to_key_string(*self)
    }
}
