//! Segment matching logic.
//!
//! # Responsibilities
//! - Parse pattern strings into ordered segment matchers
//! - Match a request's segments against a pattern structurally
//! - Capture parameter segments into a binding set
//!
//! # Design Decisions
//! - Literal segments compare byte-exact (no case folding)
//! - A parameter matches exactly one non-empty segment
//! - Empty segments are collapsed on both sides, so `/a//b/` is `/a/b`
//! - No regex, no wildcards: matching is O(segments)

use std::fmt;

use crate::routing::bindings::Bindings;
use crate::routing::error::RegistrationError;

/// Path separator for patterns and request paths.
pub const SEPARATOR: char = '/';

/// Prefix marking a parameter segment in a pattern (`:name`).
pub const PARAM_SIGIL: char = ':';

/// Characters that end the path part of a request target.
pub const QUERY_DELIMITERS: [char; 2] = ['?', '#'];

/// Split a path into its non-empty segments.
pub fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty())
}

/// One segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentMatcher {
    /// Matches exactly this text.
    Literal(String),
    /// Matches any single non-empty segment and binds it under this name.
    Param(String),
}

impl SegmentMatcher {
    fn parse(segment: &str) -> Self {
        match segment.strip_prefix(PARAM_SIGIL) {
            Some(name) => SegmentMatcher::Param(name.to_string()),
            None => SegmentMatcher::Literal(segment.to_string()),
        }
    }

    /// Returns true if this matcher accepts the request segment.
    pub fn matches(&self, segment: &str) -> bool {
        match self {
            SegmentMatcher::Literal(text) => text == segment,
            SegmentMatcher::Param(_) => !segment.is_empty(),
        }
    }
}

impl fmt::Display for SegmentMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentMatcher::Literal(text) => f.write_str(text),
            SegmentMatcher::Param(name) => write!(f, "{}{}", PARAM_SIGIL, name),
        }
    }
}

/// An ordered sequence of segment matchers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    segments: Vec<SegmentMatcher>,
}

impl Pattern {
    /// Parse a pattern string such as `/users/:id`.
    ///
    /// Fails if a parameter has an empty name or a name is used twice, or if
    /// a literal contains `?` or `#` (dispatch strips those from the path, so
    /// such a literal could never match).
    pub fn parse(pattern: &str) -> Result<Self, RegistrationError> {
        let segments: Vec<SegmentMatcher> = split_segments(pattern)
            .map(SegmentMatcher::parse)
            .collect();

        let mut seen: Vec<&str> = Vec::new();
        for segment in &segments {
            if let SegmentMatcher::Literal(text) = segment {
                if let Some(c) = text.chars().find(|c| QUERY_DELIMITERS.contains(c)) {
                    return Err(RegistrationError::malformed(
                        pattern,
                        format!("literal {:?} contains {:?}", text, c),
                    ));
                }
            }
            if let SegmentMatcher::Param(name) = segment {
                if name.is_empty() {
                    return Err(RegistrationError::malformed(pattern, "empty parameter name"));
                }
                if seen.contains(&name.as_str()) {
                    return Err(RegistrationError::malformed(
                        pattern,
                        format!("parameter {:?} declared twice", name),
                    ));
                }
                seen.push(name);
            }
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[SegmentMatcher] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True for the root pattern (zero segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Names of the parameters in pattern order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            SegmentMatcher::Param(name) => Some(name.as_str()),
            SegmentMatcher::Literal(_) => None,
        })
    }

    /// Structurally match request segments, capturing parameters on success.
    ///
    /// The lengths must be equal and every position must match.
    pub fn match_segments(&self, request: &[&str]) -> Option<Bindings> {
        if request.len() != self.segments.len() {
            return None;
        }

        let mut bindings = Bindings::with_capacity(self.param_names().count());
        for (matcher, segment) in self.segments.iter().zip(request) {
            if !matcher.matches(segment) {
                return None;
            }
            if let SegmentMatcher::Param(name) = matcher {
                bindings.push(name, segment);
            }
        }
        Some(bindings)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "{}{}", SEPARATOR, segment)?;
        }
        Ok(())
    }
}
