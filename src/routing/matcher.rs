//! Path matching against parsed templates.
//!
//! # Responsibilities
//! - Match a concrete request path against a `PathTemplate`
//! - Capture the raw (still percent-encoded) value of every variable
//!
//! # Design Decisions
//! - Literal text, separators included, must match exactly
//! - A variable captures one or more characters, never `/`
//! - Captures are greedy with backtracking, like the equivalent anchored regex
//! - Trailing slash presence must agree with the template
//! - Duplicate variable names: the last occurrence wins

use std::collections::HashMap;

use crate::routing::template::{PathTemplate, Segment};

/// Variable name → raw captured value.
pub type PathVariables = HashMap<String, String>;

impl PathTemplate {
    /// Match `path` against this template, returning the captured variables.
    pub fn matches(&self, path: &str) -> Option<PathVariables> {
        let mut captures = Vec::with_capacity(self.variables().len());
        if !match_segments(&self.segments, path, &mut captures) {
            return None;
        }

        let mut variables = PathVariables::with_capacity(captures.len());
        for (index, value) in captures {
            variables.insert(self.variables()[index].clone(), value.to_string());
        }
        Some(variables)
    }
}

fn match_segments<'p>(
    segments: &[Segment],
    path: &'p str,
    captures: &mut Vec<(usize, &'p str)>,
) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return path.is_empty();
    };

    match first {
        Segment::Literal(literal) => path
            .strip_prefix(literal.as_str())
            .is_some_and(|tail| match_segments(rest, tail, captures)),
        Segment::Variable(index) => {
            let limit = path.find('/').unwrap_or(path.len());
            for end in (1..=limit).rev().filter(|&end| path.is_char_boundary(end)) {
                captures.push((*index, &path[..end]));
                if match_segments(rest, &path[end..], captures) {
                    return true;
                }
                captures.pop();
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> PathVariables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_root_path() {
        let template = PathTemplate::parse("/");
        assert_eq!(template.matches("/"), Some(vars(&[])));
        assert_eq!(template.matches("/users"), None);
        assert_eq!(template.matches(""), None);
    }

    #[test]
    fn test_single_variable() {
        let template = PathTemplate::parse("/users/{userId}");
        assert_eq!(template.matches("/"), None);
        assert_eq!(template.matches("/users"), None);
        assert_eq!(template.matches("/users/"), None);
        assert_eq!(template.matches("/users/one"), Some(vars(&[("userId", "one")])));
        assert_eq!(template.matches("/users/one/"), None);
        assert_eq!(template.matches("/users/one/two"), None);
    }

    #[test]
    fn test_two_variables() {
        let template = PathTemplate::parse("/users/{userId}/cars/{carId}");
        assert_eq!(template.matches("/users/one"), None);
        assert_eq!(template.matches("/users/one/two"), None);
        assert_eq!(
            template.matches("/users/one/cars/two"),
            Some(vars(&[("userId", "one"), ("carId", "two")]))
        );
        assert_eq!(template.matches("/users/one/cars/two/"), None);
        assert_eq!(template.matches("/users//cars/two"), None);
    }

    #[test]
    fn test_captures_stay_percent_encoded() {
        let template = PathTemplate::parse("/files/{name}");
        assert_eq!(
            template.matches("/files/a%2Fb%20c"),
            Some(vars(&[("name", "a%2Fb%20c")]))
        );
    }

    #[test]
    fn test_variables_inside_segments() {
        let template = PathTemplate::parse("/report-{year}.{format}");
        assert_eq!(
            template.matches("/report-2024.tar.gz"),
            Some(vars(&[("year", "2024.tar"), ("format", "gz")]))
        );
        assert_eq!(template.matches("/report-.csv"), None);
        assert_eq!(template.matches("/report-2024."), None);
    }

    #[test]
    fn test_literal_braces_match_verbatim() {
        let template = PathTemplate::parse("/one/{two}/th{r-e}e/");
        assert_eq!(
            template.matches("/one/2/th{r-e}e/"),
            Some(vars(&[("two", "2")]))
        );
        assert_eq!(template.matches("/one/2/three/"), None);
    }

    #[test]
    fn test_adjacent_variables_backtrack() {
        let template = PathTemplate::parse("/{a}{b}");
        assert_eq!(template.matches("/xyz"), Some(vars(&[("a", "xy"), ("b", "z")])));
        assert_eq!(template.matches("/x"), None);
    }

    #[test]
    fn test_duplicate_variable_last_wins() {
        let template = PathTemplate::parse("/{id}/{id}");
        assert_eq!(template.matches("/first/second"), Some(vars(&[("id", "second")])));
    }

    #[test]
    fn test_multibyte_captures() {
        let template = PathTemplate::parse("/tags/{tag}");
        assert_eq!(template.matches("/tags/café"), Some(vars(&[("tag", "café")])));
    }
}
