use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use pmake::catalog::{parse_catalog, ProjectSettings, Selection};
use pmake::error::Error;
use pmake::processor::{
    copy_tree, create_project, ensure_output_dir, replace_file_name_wildcards, replace_wildcards,
};
use tempfile::TempDir;

const CATALOG: &str = r#"{
    "wildcards": { "name": "__NAME__", "language": "__LANG__", "standard": "__STD__" },
    "languages": {
        "c++": {
            "standards": ["20"],
            "templates": {
                "executable": {
                    "modes": { "console": { "features": { "required": ["test"], "optional": ["imgui"] } } }
                }
            }
        }
    }
}"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn wildcards() -> IndexMap<String, String> {
    IndexMap::from([
        ("__NAME__".to_string(), "demo".to_string()),
        ("__LANG__".to_string(), "c++".to_string()),
    ])
}

fn resources(root: &Path) {
    write(root, "pmake-info.json", CATALOG);
    write(root, ".pmakeignore", "# keep raw\nassets/**\n");
    write(
        root,
        "templates/common/CMakeLists.txt",
        "project(__NAME__ LANGUAGES CXX)\nset(CMAKE_CXX_STANDARD @@ENV:STANDARD@@)\n@@if ENV:FEATURES has \"test\"@@add_subdirectory(tests)\n@@endif@@",
    );
    write(root, "templates/common/include/__NAME__/__NAME__.hpp", "#pragma once\n");
    write(root, "templates/common/assets/raw.txt", "__NAME__ @@left alone@@\n");
    write(root, "templates/features/test/tests/test___NAME__.cpp", "// tests for __NAME__ (@@ENV:MODE@@)\n");
}

#[test]
fn test_ensure_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path();

    assert!(ensure_output_dir(path.join("new_dir"), false).is_ok());
    assert!(matches!(
        ensure_output_dir(path, false),
        Err(Error::OutputDirectoryExistsError { .. })
    ));
    assert!(ensure_output_dir(path, true).is_ok());
}

#[test]
fn test_replace_wildcards() {
    assert_eq!(replace_wildcards("__NAME__/__NAME__.__LANG__", &wildcards()), "demo/demo.c++");
    assert_eq!(replace_wildcards("nothing here", &wildcards()), "nothing here");
}

#[test]
fn test_replace_file_name_wildcards_renames_nested_paths() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "__NAME__/src/__NAME__.cpp", "x");
    write(root, "plain.txt", "y");

    replace_file_name_wildcards(root, &wildcards()).unwrap();

    assert_eq!(fs::read_to_string(root.join("demo/src/demo.cpp")).unwrap(), "x");
    assert!(!root.join("__NAME__").exists());
    assert!(root.join("plain.txt").exists());
}

#[test]
fn test_copy_tree_overlays_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "base/a.txt", "base");
    write(root, "base/dir/b.txt", "base");
    write(root, "overlay/a.txt", "overlay");

    let dest = root.join("dest");
    copy_tree(root.join("base"), &dest).unwrap();
    copy_tree(root.join("overlay"), &dest).unwrap();

    assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "overlay");
    assert_eq!(fs::read_to_string(dest.join("dir/b.txt")).unwrap(), "base");
}

#[test_log::test]
fn test_create_project() {
    let resources_dir = TempDir::new().unwrap();
    resources(resources_dir.path());
    let catalog = parse_catalog(CATALOG, true).unwrap();
    let selection = Selection { name: Some("demo".to_string()), ..Default::default() };
    let project = ProjectSettings::configure(selection, &catalog).unwrap();

    let output = TempDir::new().unwrap();
    let output_dir = output.path().join("demo");
    create_project(&project, resources_dir.path(), &output_dir, false).unwrap();

    let expected = TempDir::new().unwrap();
    write(
        expected.path(),
        "CMakeLists.txt",
        "project(demo LANGUAGES CXX)\nset(CMAKE_CXX_STANDARD 20)\nadd_subdirectory(tests)\n",
    );
    write(expected.path(), "include/demo/demo.hpp", "#pragma once\n");
    write(expected.path(), "assets/raw.txt", "__NAME__ @@left alone@@\n");
    write(expected.path(), "tests/test_demo.cpp", "// tests for demo (console)\n");

    assert!(!dir_diff::is_different(&output_dir, expected.path()).unwrap());
}

#[test_log::test]
fn test_create_project_skips_unavailable_features() {
    let resources_dir = TempDir::new().unwrap();
    resources(resources_dir.path());
    let catalog = parse_catalog(CATALOG, true).unwrap();
    let selection = Selection {
        name: Some("demo".to_string()),
        features: Some(vec!["imgui".to_string()]),
        ..Default::default()
    };
    let project = ProjectSettings::configure(selection, &catalog).unwrap();

    let output = TempDir::new().unwrap();
    let output_dir = output.path().join("demo");
    create_project(&project, resources_dir.path(), &output_dir, false).unwrap();

    assert_eq!(
        fs::read_to_string(output_dir.join("CMakeLists.txt")).unwrap(),
        "project(demo LANGUAGES CXX)\nset(CMAKE_CXX_STANDARD 20)\n"
    );
    assert!(!output_dir.join("tests").exists());
}

#[test]
fn test_create_project_refuses_existing_output() {
    let resources_dir = TempDir::new().unwrap();
    resources(resources_dir.path());
    let catalog = parse_catalog(CATALOG, true).unwrap();
    let project = ProjectSettings::configure(Selection::default(), &catalog).unwrap();

    let output = TempDir::new().unwrap();
    let err = create_project(&project, resources_dir.path(), output.path(), false).unwrap_err();
    assert!(matches!(err, Error::OutputDirectoryExistsError { .. }));
}

#[test_log::test]
fn test_create_project_with_force_leaves_existing_files_alone() {
    let resources_dir = TempDir::new().unwrap();
    resources(resources_dir.path());
    let catalog = parse_catalog(CATALOG, true).unwrap();
    let selection = Selection { name: Some("demo".to_string()), ..Default::default() };
    let project = ProjectSettings::configure(selection, &catalog).unwrap();

    let output = TempDir::new().unwrap();
    let output_dir = output.path();
    write(output_dir, "a_notes.txt", "__NAME__ keep me\n");
    write(output_dir, "fix.patch", "@@ -1,3 +1,4 @@\n-old\n+new\n");
    write(output_dir, "__NAME__/draft.txt", "@@ENV:UNKNOWN@@\n");
    write(output_dir, "CMakeLists.txt", "stale\n");

    create_project(&project, resources_dir.path(), output_dir, true).unwrap();

    assert_eq!(fs::read_to_string(output_dir.join("a_notes.txt")).unwrap(), "__NAME__ keep me\n");
    assert_eq!(
        fs::read_to_string(output_dir.join("fix.patch")).unwrap(),
        "@@ -1,3 +1,4 @@\n-old\n+new\n"
    );
    assert_eq!(
        fs::read_to_string(output_dir.join("__NAME__/draft.txt")).unwrap(),
        "@@ENV:UNKNOWN@@\n"
    );
    assert_eq!(
        fs::read_to_string(output_dir.join("CMakeLists.txt")).unwrap(),
        "project(demo LANGUAGES CXX)\nset(CMAKE_CXX_STANDARD 20)\nadd_subdirectory(tests)\n"
    );
    assert_eq!(
        fs::read_to_string(output_dir.join("tests/test_demo.cpp")).unwrap(),
        "// tests for demo (console)\n"
    );
    assert!(output_dir.join("include/demo/demo.hpp").exists());
}
