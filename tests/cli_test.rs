//! Command dispatch against tree documents on disk

use std::fs;
use std::path::{Path, PathBuf};

use rstest::rstest;
use tempfile::TempDir;

use dagnode::application::ApplicationError;
use dagnode::cli::{dispatch, output, CliError, Commands, ConfigCommands};
use dagnode::config::{local_config_path, RenderStyle, Settings};
use dagnode::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
    output::disable_colors();
}

const TREE_JSON: &str = r#"{
  "name": "MyNodeA",
  "children": [
    {
      "name": "MyNodeC",
      "attributes": { "attributeA": { "value": 0 } }
    },
    {
      "name": "MyNodeB",
      "family": "Group",
      "attributes": {
        "attributeA": { "value": 1 },
        "attributeB": { "name": "weight", "value": 3 }
      },
      "children": [
        { "name": "MyNodeD", "attributes": { "attributeA": { "value": 2 } } }
      ]
    }
  ]
}"#;

const TREE_TOML: &str = r#"
name = "MyNodeA"

[[children]]
name = "MyNodeC"

[[children]]
name = "MyNodeB"
"#;

fn write_document(dir: &TempDir, file: &str, content: &str) -> PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, content).unwrap();
    path
}

fn run(command: Commands, settings: &Settings) -> Result<String, CliError> {
    run_in(command, settings, Path::new("."))
}

fn run_in(command: Commands, settings: &Settings, local_dir: &Path) -> Result<String, CliError> {
    let mut out = Vec::new();
    dispatch(&command, settings, local_dir, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn show(document: &Path, style: Option<RenderStyle>) -> Commands {
    Commands::Show {
        document: document.to_path_buf(),
        style,
    }
}

// ============================================================
// Show Tests
// ============================================================

#[rstest]
#[case("tree.json", TREE_JSON, "|----MyNodeA\n\t|----MyNodeC\n\t|----MyNodeB\n\t\t|----MyNodeD\n")]
#[case("tree.toml", TREE_TOML, "|----MyNodeA\n\t|----MyNodeC\n\t|----MyNodeB\n")]
fn given_document_when_show_then_lists_outline(
    #[case] file: &str,
    #[case] content: &str,
    #[case] expected: &str,
) {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, file, content);

    let rendered = run(show(&document, None), &Settings::default()).unwrap();

    assert_eq!(rendered, expected);
}

#[test]
fn given_tree_style_setting_when_show_then_box_drawing() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "tree.json", TREE_JSON);
    let settings = Settings {
        render: RenderStyle::Tree,
        ..Settings::default()
    };

    let rendered = run(show(&document, None), &settings).unwrap();

    assert_eq!(rendered.lines().next(), Some("MyNodeA"));
    assert_eq!(rendered.lines().count(), 4);
    assert!(!rendered.contains("|----"));
}

#[test]
fn given_unknown_extension_when_show_then_unsupported_format() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "tree.yaml", "name: x");

    let err = run(show(&document, None), &Settings::default()).unwrap_err();

    assert!(matches!(
        err,
        CliError::Application(ApplicationError::UnsupportedFormat(_))
    ));
    assert_eq!(err.exit_code(), dagnode::exitcode::USAGE);
}

#[test]
fn given_broken_document_when_show_then_data_error() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "tree.json", "{ \"name\": ");

    let err = run(show(&document, None), &Settings::default()).unwrap_err();

    assert_eq!(err.exit_code(), dagnode::exitcode::DATAERR);
}

// ============================================================
// Search Tests
// ============================================================

#[test]
fn given_pattern_when_find_then_prints_matches_in_preorder() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "tree.json", TREE_JSON);

    let rendered = run(
        Commands::Find {
            document,
            pattern: "node[bd]".to_string(),
            ignore_case: true,
            no_ignore_case: false,
        },
        &Settings::default(),
    )
    .unwrap();

    let names: Vec<&str> = rendered
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();
    assert_eq!(names, vec!["MyNodeB", "MyNodeD"]);
}

#[test]
fn given_invalid_regex_when_find_then_error() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "tree.json", TREE_JSON);

    let result = run(
        Commands::Find {
            document,
            pattern: "(".to_string(),
            ignore_case: false,
            no_ignore_case: false,
        },
        &Settings::default(),
    );

    assert!(matches!(
        result,
        Err(CliError::Application(ApplicationError::Domain(_)))
    ));
}

#[test]
fn given_family_pattern_when_family_then_only_group_members() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "tree.json", TREE_JSON);

    let rendered = run(
        Commands::Family {
            document,
            pattern: "^Group$".to_string(),
            ignore_case: false,
            no_ignore_case: false,
        },
        &Settings::default(),
    )
    .unwrap();

    assert_eq!(rendered.lines().count(), 1);
    assert!(rendered.starts_with("MyNodeB (Group #"));
}

#[test]
fn given_case_insensitive_setting_when_find_with_no_ignore_case_then_case_matters() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "tree.json", TREE_JSON);
    let settings = Settings {
        case_insensitive: true,
        ..Settings::default()
    };
    let find = |no_ignore_case: bool| Commands::Find {
        document: document.clone(),
        pattern: "mynoded".to_string(),
        ignore_case: false,
        no_ignore_case,
    };

    assert_eq!(run(find(false), &settings).unwrap().lines().count(), 1);
    assert_eq!(run(find(true), &settings).unwrap(), "");
}

// ============================================================
// Sort & Attribute Tests
// ============================================================

#[test]
fn given_unsorted_document_when_sort_then_prints_sorted_outline() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "tree.json", TREE_JSON);

    let rendered = run(
        Commands::Sort {
            document,
            attribute: None,
            reverse: false,
            no_reverse: false,
            json: false,
        },
        &Settings::default(),
    )
    .unwrap();

    assert_eq!(
        rendered,
        "|----MyNodeA\n\t|----MyNodeB\n\t\t|----MyNodeD\n\t|----MyNodeC\n"
    );
}

#[test]
fn given_reverse_setting_when_sort_by_attribute_as_json_then_descending_document() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "tree.json", TREE_JSON);
    let settings = Settings {
        reverse_order: true,
        ..Settings::default()
    };

    let rendered = run(
        Commands::Sort {
            document,
            attribute: Some("attributeA".to_string()),
            reverse: false,
            no_reverse: false,
            json: true,
        },
        &settings,
    )
    .unwrap();

    let root = dagnode::application::parse_tree(&rendered, dagnode::application::DocumentFormat::Json)
        .unwrap();
    let names: Vec<String> = root.children().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["MyNodeB", "MyNodeC"]);
}

#[test]
fn given_reverse_setting_when_sort_with_no_reverse_then_ascending() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "tree.json", TREE_JSON);
    let settings = Settings {
        reverse_order: true,
        ..Settings::default()
    };

    let rendered = run(
        Commands::Sort {
            document,
            attribute: None,
            reverse: false,
            no_reverse: true,
            json: false,
        },
        &settings,
    )
    .unwrap();

    assert_eq!(
        rendered,
        "|----MyNodeA\n\t|----MyNodeB\n\t\t|----MyNodeD\n\t|----MyNodeC\n"
    );
}

#[test]
fn given_node_name_when_attributes_then_lists_values_in_order() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "tree.json", TREE_JSON);

    let rendered = run(
        Commands::Attributes {
            document,
            name: "MyNodeB".to_string(),
        },
        &Settings::default(),
    )
    .unwrap();

    assert_eq!(rendered, "MyNodeB\n  attributeA: 1\n  attributeB: 3\n");
}

#[test]
fn given_unknown_node_when_attributes_then_not_found() {
    let dir = TempDir::new().unwrap();
    let document = write_document(&dir, "tree.json", TREE_JSON);

    let err = run(
        Commands::Attributes {
            document,
            name: "Nobody".to_string(),
        },
        &Settings::default(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        CliError::Application(ApplicationError::NodeNotFound(ref name)) if name == "Nobody"
    ));
}

// ============================================================
// Config Tests
// ============================================================

#[test]
fn given_config_dir_when_config_path_then_local_path_inside_it() {
    let dir = TempDir::new().unwrap();

    let rendered = run_in(
        Commands::Config {
            command: ConfigCommands::Path,
        },
        &Settings::default(),
        dir.path(),
    )
    .unwrap();

    let local_line = rendered
        .lines()
        .find(|line| line.starts_with("local:"))
        .unwrap();
    assert!(local_line.ends_with(&local_config_path(dir.path()).display().to_string()));
}
