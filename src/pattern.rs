//! Path template compilation and matching.
//!
//! A URI template such as `/users/{id}/posts` is compiled once, at bind
//! time, into an anchored regular expression with one capture group per
//! `{name}` segment plus the ordered list of parameter names. Matching
//! runs against the raw (still percent-encoded) request path; splitting
//! never decodes, so an encoded `%2F` inside a segment cannot leak into
//! the path structure. Parameter values are decoded only on extraction.

use regex::Regex;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maximum number of path parameters before parameter storage spills to
/// the heap. Most REST-style templates carry well under 8.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated `(name, raw value)` storage for extracted parameters.
///
/// Param names use `Arc<str>`: they come from the compiled pattern and
/// are shared with every match, while values are per-request data.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A path template is structurally invalid.
///
/// Returned by [`PathPattern::compile`]. Scope is a single route: the
/// registry rejects the offending declaration and still binds its
/// siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedTemplateError {
    /// A segment contains `{` or `}` without being exactly `{name}`.
    UnbalancedBraces {
        /// The offending template
        template: String,
        /// The segment that failed to parse
        segment: String,
    },
    /// A `{}` segment with no parameter name.
    EmptyParameterName {
        /// The offending template
        template: String,
    },
    /// The same parameter name appears more than once in one template.
    DuplicateParameter {
        /// The offending template
        template: String,
        /// The repeated parameter name
        name: String,
    },
}

impl MalformedTemplateError {
    /// The template string that failed to compile.
    #[must_use]
    pub fn template(&self) -> &str {
        match self {
            MalformedTemplateError::UnbalancedBraces { template, .. }
            | MalformedTemplateError::EmptyParameterName { template }
            | MalformedTemplateError::DuplicateParameter { template, .. } => template,
        }
    }
}

impl fmt::Display for MalformedTemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedTemplateError::UnbalancedBraces { template, segment } => {
                write!(
                    f,
                    "malformed template '{}': segment '{}' has unbalanced braces",
                    template, segment
                )
            }
            MalformedTemplateError::EmptyParameterName { template } => {
                write!(
                    f,
                    "malformed template '{}': parameter segment has an empty name",
                    template
                )
            }
            MalformedTemplateError::DuplicateParameter { template, name } => {
                write!(
                    f,
                    "malformed template '{}': parameter '{}' declared more than once",
                    template, name
                )
            }
        }
    }
}

impl std::error::Error for MalformedTemplateError {}

/// A compiled path template: the raw template string, its matcher and
/// the ordered parameter names.
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    regex: Regex,
    param_names: Vec<Arc<str>>,
}

impl PathPattern {
    /// Compile a URI template into a matcher.
    ///
    /// Literal segments are escaped and matched byte-for-byte,
    /// case-sensitively. `{name}` segments match any non-empty run of
    /// characters excluding `/`. A segment count mismatch is never a
    /// match; there is no implicit trailing-slash tolerance.
    ///
    /// # Errors
    ///
    /// [`MalformedTemplateError`] when a segment carries stray braces,
    /// a parameter name is empty, or a parameter name is repeated.
    pub fn compile(template: &str) -> Result<Self, MalformedTemplateError> {
        let mut pattern = String::with_capacity(template.len() + 8);
        pattern.push('^');
        let mut param_names: Vec<Arc<str>> = Vec::with_capacity(template.matches('{').count());

        if template == "/" {
            pattern.push('/');
        } else {
            for segment in template.strip_prefix('/').unwrap_or(template).split('/') {
                pattern.push('/');
                if segment.starts_with('{') && segment.ends_with('}') && segment.len() >= 2 {
                    let name = &segment[1..segment.len() - 1];
                    if name.is_empty() {
                        return Err(MalformedTemplateError::EmptyParameterName {
                            template: template.to_string(),
                        });
                    }
                    if name.contains('{') || name.contains('}') {
                        return Err(MalformedTemplateError::UnbalancedBraces {
                            template: template.to_string(),
                            segment: segment.to_string(),
                        });
                    }
                    if param_names.iter().any(|n| n.as_ref() == name) {
                        return Err(MalformedTemplateError::DuplicateParameter {
                            template: template.to_string(),
                            name: name.to_string(),
                        });
                    }
                    pattern.push_str("([^/]+)");
                    param_names.push(Arc::from(name));
                } else if segment.contains('{') || segment.contains('}') {
                    return Err(MalformedTemplateError::UnbalancedBraces {
                        template: template.to_string(),
                        segment: segment.to_string(),
                    });
                } else {
                    pattern.push_str(&regex::escape(segment));
                }
            }
        }

        pattern.push('$');
        // Escaped literals and fixed capture groups only; cannot fail.
        let regex = Regex::new(&pattern).expect("Failed to compile path regex");

        Ok(Self {
            template: template.to_string(),
            regex,
            param_names,
        })
    }

    /// The raw template string this pattern was compiled from.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parameter names in template order.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    /// Test a concrete request path against this pattern.
    ///
    /// The path is matched raw; captured values stay percent-encoded
    /// until read through [`PathParams::decoded_value`].
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;
        let mut pairs = ParamVec::new();
        for (i, name) in self.param_names.iter().enumerate() {
            let value = caps.get(i + 1)?.as_str().to_string();
            pairs.push((Arc::clone(name), value));
        }
        Some(PathParams { pairs })
    }
}

/// Parameter values extracted from one matched path.
///
/// Values are stored raw; decoding happens on access and never fails.
#[derive(Debug, Clone, Default)]
pub struct PathParams {
    pairs: ParamVec,
}

impl PathParams {
    /// The captured value for `name`, still percent-encoded.
    #[must_use]
    pub fn raw_value(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// The percent-decoded value for `name`.
    ///
    /// An undecodable sequence degrades to the raw value unchanged.
    #[must_use]
    pub fn decoded_value(&self, name: &str) -> Option<Cow<'_, str>> {
        self.raw_value(name).map(percent_decode)
    }

    /// All parameters as a decoded `name -> value` map.
    ///
    /// Note: this allocates; prefer [`PathParams::decoded_value`] in
    /// hot paths.
    #[must_use]
    pub fn decoded_map(&self) -> HashMap<String, String> {
        self.pairs
            .iter()
            .map(|(k, v)| (k.to_string(), percent_decode(v).into_owned()))
            .collect()
    }

    /// Iterate `(name, raw value)` pairs in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_ref(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// RFC 3986 percent-decoding.
///
/// Decodes `%XX` octet sequences into their UTF-8 meaning; `+` is left
/// untouched. If the decoded bytes are not valid UTF-8 the raw input is
/// returned unchanged — request paths must never fail at this layer.
#[must_use]
pub fn percent_decode(raw: &str) -> Cow<'_, str> {
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        Err(_) => Cow::Borrowed(raw),
    }
}
