//! Path template compilation.
//!
//! # Responsibilities
//! - Turn an Express-style template (`/users/:id`) into an anchored matcher
//! - Record parameter names left-to-right
//! - Extract parameter values from a concrete path
//!
//! # Design Decisions
//! - Compiled once at registration, never at dispatch
//! - Literal text is escaped, so `.` or `+` in a template match themselves
//! - A parameter matches one or more characters other than `/`
//! - Duplicate parameter names are rejected

use regex::Regex;

use crate::routing::error::RouteError;
use crate::routing::params::Params;

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
    param_names: Vec<String>,
}

impl PathPattern {
    /// Compile a path template.
    ///
    /// A parameter is a `:` followed by one or more of `[A-Za-z0-9_]`.
    /// A `:` not followed by a name character is literal text.
    pub fn compile(template: &str) -> Result<Self, RouteError> {
        let mut pattern = String::with_capacity(template.len() + 8);
        let mut param_names: Vec<String> = Vec::new();
        let mut literal = String::new();

        pattern.push('^');

        let mut chars = template.char_indices().peekable();
        while let Some((start, c)) = chars.next() {
            if c != ':' {
                literal.push(c);
                continue;
            }

            let name_start = start + c.len_utf8();
            let mut name_end = name_start;
            while let Some(&(i, next)) = chars.peek() {
                if !is_name_char(next) {
                    break;
                }
                name_end = i + next.len_utf8();
                chars.next();
            }

            if name_end == name_start {
                literal.push(c);
                continue;
            }

            let name = &template[name_start..name_end];
            if param_names.iter().any(|existing| existing == name) {
                return Err(RouteError::DuplicateParam {
                    path: template.to_string(),
                    name: name.to_string(),
                });
            }

            pattern.push_str(&regex::escape(&literal));
            literal.clear();
            pattern.push_str("([^/]+)");
            param_names.push(name.to_string());
        }

        pattern.push_str(&regex::escape(&literal));
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|source| RouteError::InvalidPattern {
            path: template.to_string(),
            source,
        })?;

        Ok(Self {
            source: template.to_string(),
            regex,
            param_names,
        })
    }

    /// The template this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parameter names in template order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Returns true if the whole path matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match the whole path and extract parameter values by position.
    pub fn captures(&self, path: &str) -> Option<Params> {
        let captures = self.regex.captures(path)?;
        let mut params = Params::with_capacity(self.param_names.len());
        for (index, name) in self.param_names.iter().enumerate() {
            if let Some(value) = captures.get(index + 1) {
                params.push(name.clone(), value.as_str());
            }
        }
        Some(params)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
