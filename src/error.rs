/// Errors reported by mutating set-trie operations.
///
/// Lookups never fail: absent sets are reported through `Option` or a
/// caller-supplied default.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetTrieError {
    /// The set asked to be removed was never stored.
    MissingSet {
        /// Number of distinct elements in the offending set
        len: usize,
    },
}

impl std::fmt::Display for SetTrieError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetTrieError::MissingSet { len } => {
                write!(f, "cannot remove a set of {} elements that is not stored", len)
            }
        }
    }
}

impl std::error::Error for SetTrieError {}

pub type Result<T> = std::result::Result<T, SetTrieError>;
