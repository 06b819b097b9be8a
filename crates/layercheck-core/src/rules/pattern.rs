//! Layer-name template compilation
//!
//! A template such as `BLK_n_FLR_n_BLT_UP_AREA` uses a lone `n` segment as a
//! numeric placeholder. A segment counts as a placeholder only when the `n`
//! is preceded by the start of the template, `_` or `=`, and followed by the
//! end of the template or `_`. Every other character, including the `n` in
//! words like `OPEN`, is matched literally and case-sensitively.

use std::sync::OnceLock;

use regex::Regex;

/// Matcher derived from a name template
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    /// Template without placeholders, compared byte for byte
    Literal(String),
    /// Anchored regex with each placeholder replaced by `\d+`
    Placeholder { template: String, regex: Regex },
}

impl CompiledPattern {
    pub fn is_match(&self, name: &str) -> bool {
        match self {
            CompiledPattern::Literal(template) => template == name,
            CompiledPattern::Placeholder { regex, .. } => regex.is_match(name),
        }
    }

    pub fn template(&self) -> &str {
        match self {
            CompiledPattern::Literal(template) => template,
            CompiledPattern::Placeholder { template, .. } => template,
        }
    }

    pub fn has_placeholder(&self) -> bool {
        matches!(self, CompiledPattern::Placeholder { .. })
    }
}

/// Byte offsets of every placeholder `n` in `template`
fn placeholder_positions(template: &str) -> Vec<usize> {
    let bytes = template.as_bytes();
    (0..bytes.len())
        .filter(|&i| {
            bytes[i] == b'n'
                && (i == 0 || matches!(bytes[i - 1], b'_' | b'='))
                && (i + 1 == bytes.len() || bytes[i + 1] == b'_')
        })
        .collect()
}

/// Compile a template. Never fails: if the regex cannot be built the
/// template falls back to exact comparison.
pub fn compile(template: &str) -> CompiledPattern {
    let positions = placeholder_positions(template);
    if positions.is_empty() {
        return CompiledPattern::Literal(template.to_string());
    }

    let mut source = String::with_capacity(template.len() + positions.len() * 4 + 2);
    source.push('^');
    let mut cursor = 0;
    for pos in positions {
        source.push_str(&regex::escape(&template[cursor..pos]));
        source.push_str(r"\d+");
        cursor = pos + 1;
    }
    source.push_str(&regex::escape(&template[cursor..]));
    source.push('$');

    match Regex::new(&source) {
        Ok(regex) => CompiledPattern::Placeholder {
            template: template.to_string(),
            regex,
        },
        Err(e) => {
            tracing::warn!(template, error = %e, "pattern fell back to literal match");
            CompiledPattern::Literal(template.to_string())
        }
    }
}

/// Lazily compile a fixed regex held in `cell`
pub(crate) fn cached_regex(cell: &'static OnceLock<Option<Regex>>, source: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| match Regex::new(source) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(source, error = %e, "built-in regex failed to compile");
            None
        }
    })
    .as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_positions() {
        assert_eq!(placeholder_positions("BLK_n_FLR_n_BLT_UP_AREA"), vec![4, 10]);
        assert_eq!(placeholder_positions("n_STAIR"), vec![0]);
        assert_eq!(placeholder_positions("CAPACITY_L=n"), vec![11]);
        assert!(placeholder_positions("OPEN_SPACE").is_empty());
        assert!(placeholder_positions("_nn_").is_empty());
    }

    #[test]
    fn test_literal_template() {
        let p = compile("PLOT_BOUNDARY");
        assert!(!p.has_placeholder());
        assert!(p.is_match("PLOT_BOUNDARY"));
        assert!(!p.is_match("PLOT_BOUNDARY_1"));
        assert!(!p.is_match("plot_boundary"));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let p = compile("ROAD.WIDTH_n(m)");
        assert!(!p.has_placeholder());
        assert!(!p.is_match("ROAD.WIDTH_12(m)"));
        let p = compile("ROAD.WIDTH_n_(m)");
        assert!(p.is_match("ROAD.WIDTH_12_(m)"));
        assert!(!p.is_match("ROADXWIDTH_12_(m)"));
    }
}
