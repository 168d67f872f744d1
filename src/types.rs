use regex::Regex;

/// Per-session tailing options. Built once by the caller and shared
/// read-only between every session it starts.
#[derive(Debug, Clone, Default)]
pub struct TailOptions {
    /// Ask the API server to prefix each line with its timestamp.
    pub timestamps: bool,
    /// How far back to start; values `<= 0` leave the window unbounded.
    pub since_seconds: i64,
    /// Limit on the initial backlog.
    pub tail_lines: Option<i64>,
    /// Prefix output lines with the namespace.
    pub show_namespace: bool,
    /// Flatten JSON object lines into `key=value` pairs.
    pub structured: bool,
    /// Exclusion patterns, checked in order against the raw line.
    pub exclude: Vec<Regex>,
}
