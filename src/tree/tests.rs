#[cfg(test)]
use super::*;
use crate::parser::read_records;

fn tree(input: &str) -> Result<RawNode, ConfigError> {
    let records = read_records(input, '/')?;
    build_tree(&records, "toplevel", '/')
}

fn all_paths(node: &RawNode, out: &mut Vec<(usize, String)>) {
    for child in node.children().values() {
        out.push((child.depth(), child.path().to_string()));
        all_paths(child, out);
    }
}

#[test]
fn test_nested_sections_from_example() {
    let input = r#"
[Constants]
c = 3 * 10 ** 8

[detectors]
width = 2
[/det1]
height = 1.5

[/det2]
height = 2

[Sampler]
sampler_name = custom
[/parameter1]
min = 0
max = sin(pi / 4)

[/parameter2]
min = -1
max = c / 2
"#;
    let root = tree(input).expect("Failed to build tree");

    assert_eq!(root.name(), "toplevel");
    assert_eq!(root.depth(), 0);
    assert_eq!(root.sections(), vec!["Constants", "detectors", "Sampler"]);

    let mut paths = Vec::new();
    all_paths(&root, &mut paths);
    let expected: Vec<(usize, String)> = vec![
        (1, "Constants".into()),
        (1, "detectors".into()),
        (2, "detectors/det1".into()),
        (2, "detectors/det2".into()),
        (1, "Sampler".into()),
        (2, "Sampler/parameter1".into()),
        (2, "Sampler/parameter2".into()),
    ];
    assert_eq!(paths, expected);

    let p2 = root.section("Sampler").and_then(|s| s.section("parameter2")).unwrap();
    assert_eq!(p2.keys(), vec!["min", "max"]);
    assert_eq!(p2.value("max").map(|r| r.text.as_str()), Some("c / 2"));
    assert_eq!(p2.value("max").map(|r| r.line), Some(21));
}

#[test]
fn test_arbitrary_depth() {
    let root = tree("[a]\n[/b]\n[//c]\nx = 1\n[///d]\n[/e]\n[f]\n").unwrap();

    let d = root.lookup("a/b/c/d").unwrap().as_section().unwrap();
    assert_eq!(d.depth(), 4);
    assert_eq!(d.path(), "a/b/c/d");
    assert_eq!(root.lookup("a/b/c/x").unwrap().as_value().map(|r| r.text.as_str()), Some("1"));
    // `[/e]` closes b, c and d and attaches under a
    assert_eq!(root.section("a").unwrap().sections(), vec!["b", "e"]);
    assert_eq!(root.sections(), vec!["a", "f"]);
}

#[test]
fn test_depth_jump_is_malformed() {
    match tree("[/det1]\nheight = 1\n") {
        Err(ConfigError::MalformedHeader { line, .. }) => assert_eq!(line, 1),
        other => panic!("expected MalformedHeader, got {:?}", other),
    }

    assert!(matches!(
        tree("[a]\n[//b]\n"),
        Err(ConfigError::MalformedHeader { line: 2, .. })
    ));
}

#[test]
fn test_duplicate_sibling_section() {
    match tree("[Sampler]\n[/p]\n[/p]\n") {
        Err(ConfigError::DuplicateSection { path, line }) => {
            assert_eq!(path, "Sampler/p");
            assert_eq!(line, 3);
        }
        other => panic!("expected DuplicateSection, got {:?}", other),
    }

    assert!(matches!(
        tree("[A]\n[B]\n[A]\n"),
        Err(ConfigError::DuplicateSection { .. })
    ));
}

#[test]
fn test_same_name_under_different_parents_is_fine() {
    let root = tree("[a]\n[/p]\n[b]\n[/p]\n").unwrap();
    assert!(root.lookup("a/p").is_ok());
    assert!(root.lookup("b/p").is_ok());
}

#[test]
fn test_duplicate_key() {
    match tree("[A]\nx = 1\nx = 2\n") {
        Err(ConfigError::DuplicateKey { section, key, line }) => {
            assert_eq!(section, "A");
            assert_eq!(key, "x");
            assert_eq!(line, 3);
        }
        other => panic!("expected DuplicateKey, got {:?}", other),
    }
}

#[test]
fn test_root_keys() {
    let root = tree("title = demo\n[A]\n").unwrap();
    assert_eq!(root.keys(), vec!["title"]);
    assert_eq!(root.key_path("title"), "title");
}

#[test]
fn test_key_wins_over_section_of_same_name() {
    let root = tree("[A]\nB = 1\n[/B]\nx = 2\n").unwrap();
    let a = root.section("A").unwrap();
    assert!(matches!(a.get("B"), Some(Entry::Value(_))));
    assert!(a.section("B").is_some());
}

#[test]
fn test_lookup_missing_path() {
    let root = tree("[A]\nx = 1\n").unwrap();
    assert!(matches!(
        root.lookup("A/y"),
        Err(ConfigError::PathNotFound { .. })
    ));
    assert!(matches!(
        root.lookup("A/x/z"),
        Err(ConfigError::PathNotFound { .. })
    ));
    assert!(matches!(root.lookup(""), Ok(Entry::Section(_))));
}

#[test]
fn test_try_map_keeps_shape() {
    let root = tree("[A]\nx = 1\n[/B]\ny = 2\n").unwrap();
    let mapped: Node<usize> = root
        .try_map(&mut |_, _, raw: RawValue| Ok::<_, ()>(raw.text.len()))
        .unwrap();
    assert_eq!(mapped.lookup("A/B/y").unwrap().as_value(), Some(&1));
    assert_eq!(mapped.section("A").unwrap().depth(), 1);
}

fn layered(inputs: &[&str]) -> Result<RawNode, ConfigError> {
    let streams = inputs
        .iter()
        .map(|text| read_records(text, '/'))
        .collect::<Result<Vec<_>, _>>()?;
    build_tree_from_sources(streams.iter().map(Vec::as_slice), "toplevel", '/')
}

#[test]
fn test_later_source_extends_sections() {
    let root = layered(&["[A]\nx = 1\n[/B]\ny = 2\n", "[A]\nz = 3\n[/B]\ny = 20\n[C]\n"]).unwrap();

    let a = root.section("A").unwrap();
    assert_eq!(a.keys(), vec!["x", "z"]);
    assert_eq!(root.sections(), vec!["A", "C"]);
    assert_eq!(
        root.lookup("A/B/y").unwrap().as_value().map(|r| r.text.as_str()),
        Some("20")
    );
}

#[test]
fn test_later_source_starts_at_root() {
    // `[/B]` can't continue a section left open by the previous input
    assert!(matches!(
        layered(&["[A]\n", "[/B]\n"]),
        Err(ConfigError::MalformedHeader { .. })
    ));
    let root = layered(&["[A]\nx = 1\n", "title = run\n"]).unwrap();
    assert_eq!(root.keys(), vec!["title"]);
}

#[test]
fn test_repeats_within_one_source_still_fail() {
    assert!(matches!(
        layered(&["[A]\n", "[A]\n[A]\n"]),
        Err(ConfigError::DuplicateSection { .. })
    ));
    assert!(matches!(
        layered(&["[A]\nx = 1\n", "[A]\nx = 2\nx = 3\n"]),
        Err(ConfigError::DuplicateKey { .. })
    ));
}
