use mqt_fs::NormalizedPath;
use rstest::rstest;

#[test]
fn test_normalize_backslashes_to_forward() {
    let path = NormalizedPath::new("addons\\sale\\models");
    assert_eq!(path.as_str(), "addons/sale/models");
}

#[test]
fn test_join_paths() {
    let base = NormalizedPath::new("repo/addons");
    assert_eq!(base.join("sale").as_str(), "repo/addons/sale");
}

#[test]
fn test_join_after_trailing_slash() {
    let base = NormalizedPath::new("repo/addons/");
    assert_eq!(base.join("sale").as_str(), "repo/addons/sale");
}

#[rstest]
#[case("repo/addons/", "repo/addons")]
#[case("repo/addons///", "repo/addons")]
#[case("repo/addons", "repo/addons")]
#[case("/", "/")]
fn test_trim_trailing_separator(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(
        NormalizedPath::new(input).trim_trailing_separator().as_str(),
        expected
    );
}

#[test]
fn test_file_name_ignores_trailing_slash() {
    let path = NormalizedPath::new("repo/addons/");
    assert_eq!(path.file_name(), Some("addons"));
}

#[test]
fn test_parent() {
    let path = NormalizedPath::new("repo/addons/sale");
    assert_eq!(path.parent().unwrap().as_str(), "repo/addons");
    assert_eq!(NormalizedPath::new("/repo").parent().unwrap().as_str(), "/");
    assert!(NormalizedPath::new("repo").parent().is_none());
}

#[rstest]
#[case("repo/.git", true)]
#[case("repo/.tx", true)]
#[case("repo/sale", false)]
#[case("repo/sale.py", false)]
#[case(".", false)]
#[case("repo/..", false)]
fn test_is_hidden(#[case] input: &str, #[case] hidden: bool) {
    assert_eq!(NormalizedPath::new(input).is_hidden(), hidden);
}

#[test]
fn test_extension() {
    assert_eq!(NormalizedPath::new("mqt.toml").extension(), Some("toml"));
    assert_eq!(NormalizedPath::new(".hidden").extension(), None);
    assert_eq!(NormalizedPath::new("Makefile").extension(), None);
}

#[test]
fn test_ordering_is_lexicographic() {
    let mut paths = vec![
        NormalizedPath::new("b/x"),
        NormalizedPath::new("a/y"),
        NormalizedPath::new("a/x"),
    ];
    paths.sort();
    let as_str: Vec<_> = paths.iter().map(|p| p.as_str()).collect();
    assert_eq!(as_str, vec!["a/x", "a/y", "b/x"]);
}

#[test]
fn test_canonical_keeps_unresolvable_path() {
    let path = NormalizedPath::canonical("no/such/dir");
    assert_eq!(path.as_str(), "no/such/dir");
}

#[test]
fn test_canonical_resolves_relative_components() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("addons")).unwrap();

    let path = NormalizedPath::canonical(dir.path().join("addons/../addons"));

    assert!(path.as_str().ends_with("/addons"));
    assert!(!path.as_str().contains(".."));
}
