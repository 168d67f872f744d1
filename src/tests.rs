#[cfg(test)]
mod tests {
    use crate::cli::{Cli, parse_since};
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn test_cli_parsing_pod() {
        let args = vec!["stern-tail", "my-pod"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.pods, vec!["my-pod".to_string()]);
        assert!(cli.container.is_none());
        assert!(cli.namespace.is_none());
    }

    #[test]
    fn test_cli_parsing_requires_pod() {
        let args = vec!["stern-tail", "-n", "prod"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parsing_multiple_pods() {
        let args = vec!["stern-tail", "web-1", "web-2"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.pods, vec!["web-1".to_string(), "web-2".to_string()]);
    }

    #[test]
    fn test_cli_parsing_container() {
        let args = vec!["stern-tail", "my-pod", "-c", "app"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.container, Some("app".to_string()));
    }

    #[test]
    fn test_cli_parsing_defaults() {
        let args = vec!["stern-tail", "my-pod"];
        let cli = Cli::try_parse_from(args).unwrap();
        let options = cli.tail_options().unwrap();
        assert_eq!(options.since_seconds, 48 * 3600);
        assert_eq!(options.tail_lines, None);
        assert!(!options.timestamps);
        assert!(!options.show_namespace);
        assert!(!options.structured);
        assert!(options.exclude.is_empty());
    }

    #[test]
    fn test_cli_parsing_tail_options() {
        let args = vec![
            "stern-tail",
            "my-pod",
            "-t",
            "--since",
            "10m",
            "--tail",
            "5",
            "--show-namespace",
            "-j",
            "-e",
            "health",
            "-e",
            "^DEBUG",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let options = cli.tail_options().unwrap();
        assert!(options.timestamps);
        assert_eq!(options.since_seconds, 600);
        assert_eq!(options.tail_lines, Some(5));
        assert!(options.show_namespace);
        assert!(options.structured);
        let patterns: Vec<&str> = options.exclude.iter().map(|re| re.as_str()).collect();
        assert_eq!(patterns, vec!["health", "^DEBUG"]);
    }

    #[test]
    fn test_cli_invalid_exclude_pattern() {
        let args = vec!["stern-tail", "my-pod", "-e", "(broken"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.tail_options().is_err());
    }

    #[test]
    fn test_cli_parsing_verbose() {
        let args = vec!["stern-tail", "my-pod", "-v"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_parse_since() {
        assert_eq!(parse_since("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_since("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_since("3h"), Ok(Duration::from_secs(3 * 3600)));
        assert!(parse_since("soon").is_err());
    }
}
