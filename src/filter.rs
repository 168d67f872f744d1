use regex::Regex;

use crate::error::FilterError;

/// Compile exclusion patterns, keeping their order.
pub fn compile_patterns(raw: &[String]) -> Result<Vec<Regex>, FilterError> {
    raw.iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// Returns false as soon as one pattern matches the raw line.
pub fn should_keep(line: &str, exclude: &[Regex]) -> bool {
    !exclude.iter().any(|re| re.is_match(line))
}
