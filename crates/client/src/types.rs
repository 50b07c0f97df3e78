use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A span whose start lies after its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid span: start {start} is greater than end {end}")]
pub struct InvalidSpan {
    pub start: usize,
    pub end: usize,
}

/// Half-open interval `[start, end)` of offsets into the subject text.
///
/// Serialized as a two-element JSON array. Decoding a pair with
/// `start > end` fails, so every `Span` in a decoded response is well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(usize, usize)", into = "(usize, usize)")]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Result<Self, InvalidSpan> {
        if start > end {
            return Err(InvalidSpan { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Slices `text` by this span.
    ///
    /// Offsets count characters (Unicode scalar values), which is how the
    /// matching service reports them. Returns `None` when the span reaches
    /// past the end of `text`. `text` must be the same text that was
    /// submitted.
    pub fn extract<'t>(&self, text: &'t str) -> Option<&'t str> {
        let mut boundaries = text
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(text.len()));
        let start = boundaries.nth(self.start)?;
        let end = match self.len() {
            0 => start,
            len => boundaries.nth(len - 1)?,
        };
        Some(&text[start..end])
    }
}

impl TryFrom<(usize, usize)> for Span {
    type Error = InvalidSpan;

    fn try_from((start, end): (usize, usize)) -> Result<Self, Self::Error> {
        Span::new(start, end)
    }
}

impl From<Span> for (usize, usize) {
    fn from(span: Span) -> Self {
        (span.start, span.end)
    }
}

/// One capture group: `None` when the group did not participate.
pub type Group = Option<Span>;

/// A single match: the overall span plus its capture groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub span: Span,
    /// Index `0` holds capture group 1.
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Match {
    /// Group by capture number: `0` is the overall match, `1..` the capture
    /// groups. Out-of-range indices and non-participating groups are `None`.
    pub fn group(&self, index: usize) -> Option<Span> {
        match index {
            0 => Some(self.span),
            n => self.groups.get(n - 1).copied().flatten(),
        }
    }
}

/// Body of `POST /regex/match`.
///
/// Fields are sent exactly as given. Flags are conventionally drawn from
/// `i`, `m`, `s` and `g`, but membership is left to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub pattern: String,
    pub flags: String,
    pub text: String,
}

impl MatchRequest {
    pub fn new(
        pattern: impl Into<String>,
        flags: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            flags: flags.into(),
            text: text.into(),
        }
    }
}

/// Decoded `POST /regex/match` reply, in the service's discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResponse {
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl MatchResponse {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }
}

impl<'a> IntoIterator for &'a MatchResponse {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Body of `POST /regex/replace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceRequest {
    pub pattern: String,
    pub flags: String,
    pub text: String,
    pub repl: String,
}

impl ReplaceRequest {
    pub fn new(
        pattern: impl Into<String>,
        flags: impl Into<String>,
        text: impl Into<String>,
        repl: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            flags: flags.into(),
            text: text.into(),
            repl: repl.into(),
        }
    }
}

/// Rewritten text and the number of substitutions made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceResponse {
    pub output: String,
    pub count: u64,
}

/// Body of `POST /regex/split`; same shape as a match request.
pub type SplitRequest = MatchRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitResponse {
    #[serde(default)]
    pub pieces: Vec<String>,
}

/// `GET /healthz` reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub ok: bool,
}
