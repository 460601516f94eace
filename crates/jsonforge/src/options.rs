/// Configuration for a decode call.
///
/// Options travel inside the [`Lexer`](crate::Lexer), so nested records,
/// sequences and maps decoded from the same token stream all see the same
/// policy.
///
/// # Examples
///
/// ```rust
/// use jsonforge::DecodeOptions;
///
/// let strict = DecodeOptions {
///     deny_unknown_fields: true,
///     ..Default::default()
/// };
/// assert!(!strict.allow_comments);
/// ```
///
/// # Default
///
/// All flags default to `false` and [`max_depth`](Self::max_depth) to
/// [`DEFAULT_MAX_DEPTH`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct DecodeOptions {
    /// Whether a key with no matching field fails the decode.
    ///
    /// By default unknown keys are skipped together with their values, at
    /// any nesting depth, so newer producers can add fields without breaking
    /// older consumers.
    ///
    /// # Default
    ///
    /// `false`
    pub deny_unknown_fields: bool,

    /// Whether `// line` and `/* block */` comments are skipped between
    /// tokens.
    ///
    /// When `false`, a comment where a structural or value token is expected
    /// fails with [`ErrorKind::UnallowedComment`](crate::ErrorKind::UnallowedComment).
    /// The raw [`Lexer::scan`](crate::Lexer::scan) reports comment tokens
    /// regardless of this setting.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_comments: bool,

    /// Whether bytes may follow the top-level value.
    ///
    /// When `false`, the top-level entry points require end of input (or
    /// only whitespace) after the decoded value.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_trailing_data: bool,

    /// How many objects and arrays may be open at once.
    ///
    /// Typed decoding recurses once per nesting level, so this bounds stack
    /// use for recursive records. Opening one more container than allowed
    /// fails with [`ErrorKind::DepthLimitExceeded`](crate::ErrorKind::DepthLimitExceeded).
    /// Skipped and captured values are tracked on the heap and do not count.
    ///
    /// # Default
    ///
    /// [`DEFAULT_MAX_DEPTH`]
    pub max_depth: usize,
}

/// Nesting limit used by [`DecodeOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            deny_unknown_fields: false,
            allow_comments: false,
            allow_trailing_data: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
