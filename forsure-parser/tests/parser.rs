//! Parser behaviour on whole documents: the reference scenarios, the error taxonomy and the
//! fixture documents under `tests/fixtures`.

use forsure_parser::forsure::ast::{AttributeValue, ParseErrorKind};
use forsure_parser::forsure::formats::render;
use forsure_parser::forsure::loader::DocumentLoader;
use forsure_parser::forsure::parsing::{parse, ParseOptions};
use forsure_parser::forsure::testing::assert_tree;
use rstest::rstest;

fn fixture(name: &str) -> DocumentLoader {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    DocumentLoader::from_path(path).expect("fixture exists")
}

#[test]
fn test_header_document() {
    let root = parse("root:\n  - src:\n    - index.js\n  - README.md\n").unwrap();
    assert_tree(&root)
        .name("root")
        .is_directory()
        .child_count(2)
        .child(0, |src| {
            src.name("src")
                .is_directory()
                .child_count(1)
                .child(0, |index| {
                    index.name("index.js").is_file();
                });
        })
        .child(1, |readme| {
            readme.name("README.md").is_file().no_description();
        });
}

#[test]
fn test_uneven_indentation_step_is_rejected() {
    // Two spaces to `src`, then four more to its child: a two level jump
    let error = parse("root:\n  - src:\n      - index.js\n  - README.md\n").unwrap_err();
    assert_eq!(error.kind, ParseErrorKind::InvalidNesting);
    assert_eq!(error.line, 3);
}

#[test]
fn test_headerless_chain() {
    let root = parse("- a:\n  - b:\n    - c\n").unwrap();
    assert_eq!(root.max_depth(), 3);
    assert!(root.find("a/b/c").unwrap().is_file());
}

#[rstest]
#[case::empty("", ParseErrorKind::EmptyDocument, 1)]
#[case::whitespace_only("  \n \n", ParseErrorKind::EmptyDocument, 1)]
#[case::tab("\t- src:\n", ParseErrorKind::InvalidIndentation, 1)]
#[case::tab_after_spaces("- src:\n  \t- a\n", ParseErrorKind::InvalidIndentation, 2)]
#[case::odd_indent("- src:\n   - a\n", ParseErrorKind::InvalidIndentation, 2)]
#[case::gap("- src:\n    - a\n", ParseErrorKind::InvalidNesting, 2)]
#[case::under_file("- a\n  - b\n    - c\n", ParseErrorKind::InvalidNesting, 2)]
#[case::same_level_under_header("root:\n  - x\n- src:\n", ParseErrorKind::InvalidNesting, 3)]
#[case::unclosed_description("- a\n  <description>\n  text\n", ParseErrorKind::UnterminatedDescription, 2)]
#[case::stray_close("- a\n</description>\n", ParseErrorKind::UnterminatedDescription, 2)]
#[case::orphan_description("<description>x</description>\n- a\n", ParseErrorKind::UnterminatedDescription, 1)]
#[case::duplicate("- src:\n  - utils:\n  - utils:\n", ParseErrorKind::DuplicateSiblingName, 3)]
#[case::duplicate_file_and_dir("- utils\n- utils:\n", ParseErrorKind::DuplicateSiblingName, 2)]
#[case::mixed("- a\n- Type: File\n  - Name: b\n", ParseErrorKind::MixedDialect, 3)]
#[case::bad_attributes("- a { x: }\n", ParseErrorKind::MalformedDeclaration, 1)]
#[case::unknown_type("- Type: Folder\n", ParseErrorKind::MalformedDeclaration, 1)]
#[case::missing_dash("src:\n", ParseErrorKind::MalformedDeclaration, 1)]
#[case::dot_name("- ..\n", ParseErrorKind::MalformedDeclaration, 1)]
#[case::verbose_name_colon("- Type: File\n  - Name: notes:\n", ParseErrorKind::MalformedDeclaration, 2)]
#[case::terse_double_colon("- notes::\n", ParseErrorKind::MalformedDeclaration, 1)]
#[case::description_at_header_level("root:\n  - a\n<description>x</description>\n", ParseErrorKind::InvalidNesting, 3)]
#[case::description_past_entry("root:\n  - a\n      <description>x</description>\n", ParseErrorKind::InvalidNesting, 3)]
#[case::description_tab("- a\n\t<description>x</description>\n", ParseErrorKind::InvalidIndentation, 2)]
fn test_rejects(#[case] source: &str, #[case] kind: ParseErrorKind, #[case] line: usize) {
    let error = parse(source).unwrap_err();
    assert_eq!(error.kind, kind, "{error}");
    assert_eq!(error.line, line, "{error}");
}

const LONG_DOCUMENT: &str = "\
root: { version: 1 }
  <description>
  Service layout.
  </description>
  # sources
  - src:
    <description>
    Application code.
    </description>
    - main.rs

    - handlers:
      - users.rs
  - docs:
";

/// Errors deep in a document keep their own line number, past blank lines, comments and
/// multi-line descriptions.
#[rstest]
#[case::gap_after_blank("    - main.rs\n\n", "        - too_deep.rs\n", ParseErrorKind::InvalidNesting)]
#[case::under_file("    - main.rs\n", "      - child.rs\n", ParseErrorKind::InvalidNesting)]
#[case::duplicate_sibling("  - docs:\n", "  - src\n", ParseErrorKind::DuplicateSiblingName)]
#[case::duplicate_nested("      - users.rs\n", "      - users.rs\n", ParseErrorKind::DuplicateSiblingName)]
#[case::unterminated("  - docs:\n", "    <description>\n    never closed\n", ParseErrorKind::UnterminatedDescription)]
#[case::stray_close("    - main.rs\n", "    </description>\n", ParseErrorKind::UnterminatedDescription)]
#[case::mixed("      - users.rs\n", "      - Type: File\n        - Name: admin.rs\n", ParseErrorKind::MixedDialect)]
#[case::description_too_deep("      - users.rs\n", "            <description>x</description>\n", ParseErrorKind::InvalidNesting)]
fn test_error_line_in_long_document(
    #[case] after: &str,
    #[case] inserted: &str,
    #[case] kind: ParseErrorKind,
) {
    let at = LONG_DOCUMENT.find(after).expect("anchor line exists") + after.len();
    let source = format!("{}{}{}", &LONG_DOCUMENT[..at], inserted, &LONG_DOCUMENT[at..]);
    let mut expected = LONG_DOCUMENT[..at].lines().count() + 1;
    if kind == ParseErrorKind::MixedDialect {
        // Reported at the `Name:` line, where the verbose entry claims its place
        expected += 1;
    }

    let error = parse(&source).unwrap_err();
    assert_eq!(error.kind, kind, "{error}\n{source}");
    assert_eq!(error.line, expected, "{error}\n{source}");
}

#[test]
fn test_long_document_parses() {
    let root = parse(LONG_DOCUMENT).unwrap();
    assert_tree(&root)
        .description("Service layout.")
        .child_count(2)
        .child(0, |src| {
            src.description("Application code.").child_count(2);
        });
}

#[test]
fn test_descriptions_follow_indentation() {
    let root = parse("root:\n  - src:\n    - a.txt\n  <description>meant for root</description>\n")
        .unwrap();
    assert_tree(&root)
        .description("meant for root")
        .child(0, |src| {
            src.no_description().child(0, |a| {
                a.name("a.txt").no_description();
            });
        });

    let root = parse("root:\n  - src:\n    - a.txt\n    <description>meant for src</description>\n    - b.txt\n")
        .unwrap();
    assert_tree(&root).no_description().child(0, |src| {
        src.description("meant for src").child_count(2);
    });
}

#[rstest]
#[case::terse_colon("- src:\n", true)]
#[case::terse_slash("- src/\n", true)]
#[case::terse_both("- src/:\n", true)]
#[case::terse_file("- src\n", false)]
#[case::verbose_directory("- Type: Directory\n  - Name: src\n", true)]
#[case::verbose_file("- Type: File\n  - Name: src\n", false)]
#[case::verbose_slash_name("- Type: Directory\n  - Name: src/\n", true)]
fn test_dialects_normalize(#[case] source: &str, #[case] is_directory: bool) {
    let root = parse(source).unwrap();
    let node = root.child("src").expect("src is declared");
    assert_eq!(node.is_directory(), is_directory);
}

#[test]
fn test_terse_fixture() {
    let loader = fixture("web-app.forsure");
    let root = loader.parse(&ParseOptions::default()).unwrap();
    assert_tree(&root)
        .attribute("version", AttributeValue::Integer(2))
        .attribute("owner", AttributeValue::from("web team"))
        .child_count(5)
        .child_named("app", |app| {
            app.is_directory()
                .description("App router pages.")
                .child_named("layout.tsx", |layout| {
                    layout.attribute("generated", AttributeValue::Bool(false));
                })
                .child_named("api", |api| {
                    api.child_named("auth", |auth| {
                        auth.child(0, |route| {
                            route
                                .name("route.ts")
                                .attribute("methods", AttributeValue::from("GET, POST"));
                        });
                    });
                });
        })
        .child_named("next.config.js", |config| {
            config
                .is_file()
                .attribute("strict", AttributeValue::Bool(true))
                .attribute("port", AttributeValue::Integer(3000))
                .attribute("ratio", AttributeValue::Float(0.75));
        });
    assert!(root.find("components/ui").unwrap().is_directory());
    assert_eq!(
        root.find("lib/utils.ts").unwrap().description.as_deref(),
        Some("Shared helpers.")
    );
}

#[test]
fn test_verbose_fixture() {
    let root = fixture("express-api.forsure")
        .parse(&ParseOptions::default())
        .unwrap();
    assert_tree(&root)
        .attribute("path", AttributeValue::from("./"))
        .description("Root directory of the Express API project.")
        .child_count(4)
        .child(0, |package| {
            package
                .name("package.json")
                .is_file()
                .description("Lists project dependencies, scripts, and metadata.");
        })
        .child(2, |src| {
            src.name("src")
                .is_directory()
                .child_count(2)
                .child(0, |controllers| {
                    controllers
                        .name("controllers")
                        .description("Contains route controllers.");
                })
                .child(1, |routes| {
                    routes.name("routes").is_directory().no_description();
                });
        })
        .child(3, |config| {
            config.name("config").is_directory();
        });
}

#[rstest]
#[case("web-app.forsure")]
#[case("express-api.forsure")]
fn test_fixtures_survive_rendering(#[case] name: &str) {
    let root = fixture(name).parse(&ParseOptions::default()).unwrap();
    let rendered = render(&root);
    assert_eq!(parse(&rendered).unwrap(), root);
    assert_eq!(render(&parse(&rendered).unwrap()), rendered);
}

#[test]
fn test_crlf_document() {
    let root = parse("root:\r\n  - src:\r\n    - main.rs\r\n").unwrap();
    assert!(root.find("src/main.rs").is_some());
}
