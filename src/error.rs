/// Compile-time failures. All of them are fatal for the offending table
/// and require the author to fix the input; none are retryable.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Wrong length, out-of-alphabet character, or a bad 32-bit halfword
    /// separator.
    #[error("malformed template \"{template}\": {reason}")]
    MalformedTemplate { template: String, reason: String },

    /// Two templates whose match sets intersect and whose specificity
    /// cannot order them. Often an architecture side constraint (a manual
    /// note like "field != 1111") that a pure bit template cannot encode;
    /// the compiler surfaces it instead of guessing a resolution.
    #[error("ambiguous encoding: {first} and {second} overlap, undecided at bits {positions:?}")]
    AmbiguousEncoding {
        first: String,
        second: String,
        positions: Vec<u8>,
    },

    /// Range-backend precondition: wildcards interleaved between fixed
    /// bits make the naive interval cover opcodes the pattern does not
    /// actually match. The mask-chain backend stays valid for the same
    /// table.
    #[error("non-contiguous wildcards in pattern for {tag}: a range guard would over-match")]
    NonContiguousWildcards { tag: String },

    /// Tags identify variants; a table may bind each tag only once.
    #[error("duplicate tag {0}")]
    DuplicateTag(String),
}
