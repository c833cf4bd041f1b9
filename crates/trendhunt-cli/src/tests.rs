use clap::Parser;

use super::*;

#[test]
fn parses_collect_without_filter() {
    let cli = Cli::try_parse_from(["trendhunt-cli", "collect"]).expect("expected valid cli args");

    assert!(matches!(cli.command, Commands::Collect { term: None }));
}

#[test]
fn parses_collect_with_term() {
    let cli = Cli::try_parse_from(["trendhunt-cli", "collect", "--term", "birria ramen"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Collect { term } => assert_eq!(term.as_deref(), Some("birria ramen")),
        Commands::Discover { .. } => panic!("expected collect"),
    }
}

#[test]
fn parses_discover_dry_run() {
    let cli = Cli::try_parse_from(["trendhunt-cli", "discover", "--dry-run"])
        .expect("expected valid cli args");

    assert!(matches!(cli.command, Commands::Discover { dry_run: true }));
}

#[test]
fn discover_defaults_to_writing() {
    let cli = Cli::try_parse_from(["trendhunt-cli", "discover"]).expect("expected valid cli args");

    assert!(matches!(cli.command, Commands::Discover { dry_run: false }));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["trendhunt-cli"]).is_err());
}

#[test]
fn select_terms_filters_case_insensitively() {
    let terms = vec![
        trendhunt_core::TrackedTerm {
            term: "Birria Ramen".to_string(),
            category: "Food".to_string(),
            region: "Austin, TX".to_string(),
            neighborhood: "East Austin".to_string(),
        },
        trendhunt_core::TrackedTerm {
            term: "Ube Latte".to_string(),
            category: "Drink".to_string(),
            region: "Austin, TX".to_string(),
            neighborhood: "South Congress".to_string(),
        },
    ];

    let selected = commands::select_terms(terms.clone(), Some("  ube   LATTE ")).expect("match");
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].0, 2);
    assert_eq!(selected[0].1.term, "Ube Latte");

    assert_eq!(commands::select_terms(terms.clone(), None).expect("all").len(), 2);
    assert!(commands::select_terms(terms, Some("matcha")).is_err());
}
