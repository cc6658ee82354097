//! Addon discovery on real directory layouts

use mqt_addons::{
    ModuleIndex, get_addons, get_dependencies, get_module_paths, get_modules, get_subpaths,
};
use mqt_fs::NormalizedPath;
use mqt_test_utils::AddonTree;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn addons_roots_are_sorted_by_folder_name() {
    let tree = AddonTree::new();
    // created in reverse order so listing order differs from name order
    tree.module("2_testfolder/module_b", &[])
        .module("1_testfolder/module_a", &[]);

    let addons = get_addons(&tree.root());

    assert_eq!(
        addons,
        vec![tree.at("1_testfolder"), tree.at("2_testfolder")]
    );
}

#[test]
fn addons_root_is_returned_as_is() {
    let tree = AddonTree::new();
    tree.module("sale_x", &[]).module("stock_x", &[]);

    assert_eq!(get_addons(&tree.root()), vec![tree.root()]);
}

#[test]
fn missing_path_has_no_addons() {
    let tree = AddonTree::new();
    assert!(get_addons(&tree.at("missing")).is_empty());
    assert!(get_modules(&tree.at("missing")).is_empty());
}

#[test]
fn modules_skip_hidden_excluded_and_uninstallable() {
    let tree = AddonTree::new();
    tree.module("b_mod", &[])
        .module("a_mod", &[])
        .module(".hidden_mod", &[])
        .module("odoo", &[])
        .module("config", &[])
        .uninstallable_module("old_mod")
        .package("lib")
        .file("setup.py", "");

    assert_eq!(get_modules(&tree.root()), vec!["a_mod", "b_mod"]);
}

#[test]
fn modules_with_loosely_typed_manifests_are_listed() {
    let tree = AddonTree::new();
    tree.module_with_manifest(
        "old_style",
        "__openerp__.py",
        "{'name': 'Old', 'version': 1.0, 'depends': ['base']}",
    )
    .module_with_manifest("app", "__manifest__.py", "{'name': 'A', 'application': None}");

    assert_eq!(get_modules(&tree.root()), vec!["app", "old_style"]);
}

#[rstest]
#[case("")]
#[case("/")]
fn module_names_ignore_trailing_separator(#[case] suffix: &str) {
    let tree = AddonTree::new();
    tree.module("addons/sale_x", &[]);
    let path = NormalizedPath::new(format!("{}{suffix}", tree.at("addons")));

    assert_eq!(get_modules(&path), vec!["sale_x"]);
    assert_eq!(get_module_paths(&path), vec![tree.at("addons/sale_x")]);
}

#[test]
fn uninstallable_module_still_resolves_as_dependency() {
    let tree = AddonTree::new();
    tree.module("sale_x", &["legacy"])
        .module_with_manifest(
            "legacy",
            "__manifest__.py",
            "{'name': 'x', 'installable': False}",
        );

    assert_eq!(get_modules(&tree.root()), vec!["sale_x"]);

    let index = ModuleIndex::from_addons_path(&[tree.root()]);
    assert!(index.get("legacy").is_some());
    assert_eq!(
        get_dependencies(&index, "sale_x").unwrap(),
        vec!["legacy", "sale_x"]
    );
}

#[test]
fn subpaths_find_nested_packages() {
    let tree = AddonTree::new();
    tree.module("project/addons/hr_x", &[])
        .uninstallable_module("project/addons/old")
        .package("project/scripts")
        .package("project/odoo")
        .dir("project/.git")
        .file("project/README.md", "");

    let subpaths = get_subpaths(&[tree.at("project")]);

    assert_eq!(
        subpaths,
        vec![tree.at("project/addons/hr_x"), tree.at("project/scripts")]
    );
}

#[rstest]
#[case("project/.")]
#[case("project/addons/..")]
fn subpaths_walk_dot_inputs(#[case] rel: &str) {
    let tree = AddonTree::new();
    tree.module("project/addons/hr_x", &[]).package("project/scripts");

    let subpaths = get_subpaths(&[tree.at(rel)]);

    assert_eq!(subpaths.len(), 2, "{subpaths:?}");
    assert!(subpaths[0].as_str().ends_with("addons/hr_x"));
    assert!(subpaths[1].as_str().ends_with("scripts"));
}

#[test]
fn subpaths_skip_hidden_children_but_not_hidden_inputs() {
    let tree = AddonTree::new();
    tree.package(".config/tool").package(".config/.cache/tmp");

    assert_eq!(
        get_subpaths(&[tree.at(".config")]),
        vec![tree.at(".config/tool")]
    );
}

#[test]
fn subpaths_package_is_a_leaf() {
    let tree = AddonTree::new();
    tree.package("pkg").module("pkg/inner_mod", &[]);

    assert_eq!(get_subpaths(&[tree.at("pkg")]), vec![tree.at("pkg")]);
}
