//! Reverse routing: building a URL from a named route and its arguments.

use orange_core::RouterError;
use regex::Regex;
use std::{fmt::Display, ops::Range, sync::LazyLock};

/// Finds the capture groups of a route pattern. Groups do not nest.
static GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((.*?)\)").expect("group pattern is a valid regex"));

struct Group {
    span: Range<usize>,
    body: String,
    validator: Regex,
}

/// A route pattern split into literal text and validated capture groups.
pub(crate) struct UrlTemplate {
    pattern: String,
    groups: Vec<Group>,
}

impl UrlTemplate {
    pub(crate) fn parse(pattern: &str) -> Result<Self, RouterError> {
        let mut groups = Vec::new();

        for caps in GROUP.captures_iter(pattern) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            let validator = Regex::new(&format!("^(?:{})$", body.as_str())).map_err(|e| {
                RouterError::InvalidPattern {
                    pattern: pattern.to_owned(),
                    source: Box::new(e),
                }
            })?;

            groups.push(Group {
                span: whole.range(),
                body: body.as_str().to_owned(),
                validator,
            });
        }

        Ok(Self {
            pattern: pattern.to_owned(),
            groups,
        })
    }

    /// Substitute `args` into the groups, left to right.
    pub(crate) fn build(&self, args: &[&dyn Display]) -> Result<String, RouterError> {
        if args.len() != self.groups.len() {
            return Err(RouterError::InvalidValue(format!(
                "Parameter count mismatch. Expecting {} got {}",
                self.groups.len(),
                args.len()
            )));
        }

        let mut url = String::with_capacity(self.pattern.len());
        let mut cursor = 0;

        for (group, arg) in self.groups.iter().zip(args) {
            let value = arg.to_string();
            if !group.validator.is_match(&value) {
                return Err(RouterError::InvalidValue(format!(
                    "Parameter mismatch. Expecting {} got {}",
                    group.body, value
                )));
            }

            url.push_str(&self.pattern[cursor..group.span.start]);
            url.push_str(&value);
            cursor = group.span.end;
        }
        url.push_str(&self.pattern[cursor..]);

        Ok(url)
    }
}
