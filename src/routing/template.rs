//! Path template parsing.
//!
//! # Responsibilities
//! - Find `{name}` variable references in a template
//! - Produce the normalized pattern used for ordering and duplicate checks
//! - Keep the segment list the matcher walks
//!
//! # Design Decisions
//! - Parsing is total: malformed templates are reported by registration
//!   validation, never by the parser
//! - Only `{` + one or more ASCII word characters + `}` is a variable;
//!   every other brace is literal text
//! - Variables normalize to `{}`, which no variable reference can produce

/// Token substituted for every variable occurrence in a normalized pattern.
pub const PLACEHOLDER: &str = "{}";

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Text that must appear verbatim in the request path.
    Literal(String),
    /// A variable occurrence; indexes into `PathTemplate::variables`.
    Variable(usize),
}

/// A parsed, immutable path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    path: String,
    normalized: String,
    variables: Vec<String>,
    pub(crate) segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a template such as `/users/{userId}/cars/{carId}`.
    pub fn parse(template: &str) -> Self {
        let bytes = template.as_bytes();
        let mut normalized = String::with_capacity(template.len());
        let mut variables = Vec::new();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut pos = 0;

        while pos < bytes.len() {
            if let Some(end) = variable_end(bytes, pos) {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(variables.len()));
                variables.push(template[pos + 1..end].to_string());
                normalized.push_str(PLACEHOLDER);
                pos = end + 1;
                continue;
            }

            // Advance one whole character so multi-byte text stays intact.
            let ch = template[pos..].chars().next().unwrap_or_default();
            literal.push(ch);
            normalized.push(ch);
            pos += ch.len_utf8().max(1);
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            path: template.to_string(),
            normalized,
            variables,
            segments,
        }
    }

    /// The template exactly as registered.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The template with every variable replaced by [`PLACEHOLDER`].
    pub fn normalized_path(&self) -> &str {
        &self.normalized
    }

    /// Variable names in declaration order, duplicates included.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Substitute every variable with the value `value_of` returns for it.
    ///
    /// Fails with the name of the first variable that has no value.
    pub fn fill<F>(&self, mut value_of: F) -> Result<String, String>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut out = String::with_capacity(self.path.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(index) => {
                    let name = &self.variables[*index];
                    let value = value_of(name).ok_or_else(|| name.clone())?;
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }
}

/// Returns the index of the closing brace if a variable reference starts at `pos`.
fn variable_end(bytes: &[u8], pos: usize) -> Option<usize> {
    if bytes[pos] != b'{' {
        return None;
    }
    let mut end = pos + 1;
    while end < bytes.len() && is_word_byte(bytes[end]) {
        end += 1;
    }
    (end > pos + 1 && end < bytes.len() && bytes[end] == b'}').then_some(end)
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}
