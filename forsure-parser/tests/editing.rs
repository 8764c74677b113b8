//! Edits applied to parsed documents stay renderable, and diff reports exactly what changed.

use forsure_parser::forsure::diff::{diff, Change, ChangeKind};
use forsure_parser::forsure::editing::{EditCommand, EditError};
use forsure_parser::forsure::formats::render;
use forsure_parser::forsure::parsing::parse;
use rstest::rstest;

const PROJECT: &str = "\
root:
  - src:
    - index.js
    - util.js
  - README.md
";

#[rstest]
#[case("add a file called config.js in src", "src/config.js", ChangeKind::Added)]
#[case("create a folder called docs", "docs", ChangeKind::Added)]
#[case("remove the file src/util.js", "src/util.js", ChangeKind::Removed)]
fn test_single_change(#[case] command: &str, #[case] path: &str, #[case] kind: ChangeKind) {
    let before = parse(PROJECT).unwrap();
    let after = EditCommand::parse(command).unwrap().apply(&before).unwrap();
    assert_eq!(
        diff(&before, &after),
        vec![Change {
            path: path.to_string(),
            kind
        }]
    );
    assert_eq!(parse(&render(&after)).unwrap(), after);
}

#[test]
fn test_rename_shows_as_remove_and_add() {
    let before = parse(PROJECT).unwrap();
    let after = EditCommand::parse("rename the folder src to lib")
        .unwrap()
        .apply(&before)
        .unwrap();
    let changes: Vec<String> = diff(&before, &after).iter().map(Change::to_string).collect();
    assert_eq!(changes, vec!["- src", "+ lib"]);
}

#[test]
fn test_move_creates_target() {
    let before = parse(PROJECT).unwrap();
    let after = EditCommand::parse("move the file README.md to docs/guides")
        .unwrap()
        .apply(&before)
        .unwrap();
    assert!(after.find("docs/guides/README.md").unwrap().is_file());
    let rendered = render(&after);
    assert!(rendered.contains("  - docs:\n    - guides:\n      - README.md\n"));
}

#[test]
fn test_failed_edit_leaves_tree_untouched() {
    let before = parse(PROJECT).unwrap();
    let command = EditCommand::parse("remove the file src/missing.js").unwrap();
    assert_eq!(
        command.apply(&before),
        Err(EditError::PathNotFound("src/missing.js".to_string()))
    );
    assert_eq!(before, parse(PROJECT).unwrap());
}
