use super::*;
use crate::render::clip;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["foodscout"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn browse_defaults_to_one_page_without_filters() {
    let cli = Cli::try_parse_from(["foodscout", "browse"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Browse {
            pages: 1,
            category: None,
            sort: None
        })
    ));
}

#[test]
fn browse_parses_category_and_sort() {
    let cli = Cli::try_parse_from([
        "foodscout",
        "browse",
        "--pages",
        "3",
        "--category",
        "sweet-snacks",
        "--sort",
        "grade-desc",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Browse {
            pages: 3,
            category: Some(Category::SweetSnacks),
            sort: Some(SortOption::GradeDesc)
        })
    ));
}

#[test]
fn browse_rejects_unknown_category() {
    let result = Cli::try_parse_from(["foodscout", "browse", "--category", "pizza"]);
    assert!(result.is_err());
}

#[test]
fn search_takes_name() {
    let cli = Cli::try_parse_from(["foodscout", "search", "oat milk"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Search { ref name, category: None, sort: None }) if name == "oat milk"
    ));
}

#[test]
fn show_with_add_flag() {
    let cli = Cli::try_parse_from(["foodscout", "show", "3017620422003", "--add"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Show { ref code, add: true }) if code == "3017620422003"
    ));
}

#[test]
fn categories_default_limit() {
    let cli = Cli::try_parse_from(["foodscout", "categories"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Categories {
            key: None,
            page: 1,
            limit: 20
        })
    ));
}

#[test]
fn categories_with_key_and_page() {
    let cli =
        Cli::try_parse_from(["foodscout", "categories", "beverages", "--page", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Categories { key: Some(ref key), page: 3, .. }) if key == "beverages"
    ));
}

#[test]
fn cart_set_accepts_negative_quantity() {
    let cli = Cli::try_parse_from(["foodscout", "cart", "set", "3017620422003", "-1"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Cart {
            command: CartCommands::Set { ref key, quantity: -1 }
        }) if key == "3017620422003"
    ));
}

#[test]
fn cart_subcommands_parse() {
    for (args, expected) in [
        (vec!["foodscout", "cart", "list"], "list"),
        (vec!["foodscout", "cart", "clear"], "clear"),
        (vec!["foodscout", "cart", "inc", "k"], "inc"),
        (vec!["foodscout", "cart", "dec", "k"], "dec"),
        (vec!["foodscout", "cart", "remove", "k"], "remove"),
        (vec!["foodscout", "cart", "add", "123"], "add"),
    ] {
        let cli = Cli::try_parse_from(args).unwrap();
        let Some(Commands::Cart { command }) = cli.command else {
            panic!("expected cart command for {expected}");
        };
        let parsed = match command {
            CartCommands::List => "list",
            CartCommands::Clear => "clear",
            CartCommands::Inc { .. } => "inc",
            CartCommands::Dec { .. } => "dec",
            CartCommands::Remove { .. } => "remove",
            CartCommands::Add { .. } => "add",
            CartCommands::Set { .. } => "set",
        };
        assert_eq!(parsed, expected);
    }
}

#[test]
fn config_command_parses() {
    let cli = Cli::try_parse_from(["foodscout", "config"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Config)));
}

#[test]
fn clip_marks_truncation() {
    assert_eq!(clip("short", 10), "short");
    assert_eq!(clip("abcdefghij", 4), "abcd...");
    assert_eq!(clip("\u{e9}\u{e9}\u{e9}", 2), "\u{e9}\u{e9}...");
}

#[test]
fn filter_state_defaults_sort_to_none() {
    let state = browse::filter_state(Some(Category::Meals), None);
    assert_eq!(state.category, Some(Category::Meals));
    assert!(state.sort.is_none());
    assert_eq!(state.active_count(), 1);
}
