use std::fs;
use std::path::Path;

use globset::{Glob, GlobSetBuilder};
use pmake::error::{Error, EvaluationError, ParseErrorKind};
use pmake::preprocessor::{process, process_all, process_all_except, process_str, Context};
use tempfile::TempDir;

fn features(items: &[&str]) -> Context {
    Context::builder().list("FEATURES", items.iter().copied()).build()
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_directive_free_text_round_trips() {
    let samples = [
        "",
        "plain text",
        "#include <vector>\n\n[[nodiscard]] int f() { return {{1, 2}}.size(); }\n",
        "set(SOURCES ${PROJECT_SOURCE_DIR}/main.cpp)\r\n",
        "email me @ home, single @ signs are fine\n",
        "unicode: ünïcødé ✓ 日本語\n\n\n",
    ];
    for sample in samples {
        assert_eq!(process_str("f.txt", sample, &Context::default()).unwrap(), sample);
    }
}

#[test]
fn test_output_is_stable_when_reprocessed() {
    let context = Context::builder()
        .scalar("ENV:LANGUAGE", "c++")
        .list("ENV:FEATURES", ["imgui", "test"])
        .build();
    let template = "lang=@@ENV:LANGUAGE@@\n@@if ENV:FEATURES has \"imgui\"@@imgui [@@ENV:FEATURES@@]\n@@endif@@done\n";

    let first = process_str("f.txt", template, &context).unwrap();
    assert_eq!(first, "lang=c++\nimgui [imgui,test]\ndone\n");

    let second = process_str("f.txt", &first, &Context::default()).unwrap();
    assert_eq!(second, first);
}

#[test]
fn test_membership_scenarios() {
    let template = r#"A@@if FEATURES has "test"@@B@@endif@@C"#;
    assert_eq!(process_str("f", template, &features(&["test", "docs"])).unwrap(), "ABC");
    assert_eq!(process_str("f", template, &features(&["docs"])).unwrap(), "AC");
}

#[test]
fn test_variable_scenario() {
    let context = Context::builder().scalar("ENV:LANGUAGE", "c++").build();
    assert_eq!(process_str("f", "Lang: @@ENV:LANGUAGE@@", &context).unwrap(), "Lang: c++");
}

#[test]
fn test_missing_variable_scenario() {
    let err = process_str("f", "@@ENV:MISSING@@", &Context::default()).unwrap_err();
    match err {
        Error::EvaluationError(EvaluationError::UndefinedVariable { name, .. }) => {
            assert_eq!(name, "ENV:MISSING")
        }
        other => panic!("expected UndefinedVariable, got {other:?}"),
    }
}

#[test]
fn test_elif_scenario() {
    let context = Context::builder().scalar("A", "false").scalar("B", "true").build();
    let output = process_str("f", "@@if A@@X@@elif B@@Y@@else@@Z@@endif@@", &context).unwrap();
    assert_eq!(output, "Y");
}

#[test]
fn test_unmatched_close_scenario() {
    let err = process_str("src/main.cpp", "x@@endif@@", &Context::default()).unwrap_err();
    match err {
        Error::ParseError(err) => {
            assert_eq!(err.kind, ParseErrorKind::UnmatchedClose);
            assert_eq!(err.location.file, Path::new("src/main.cpp"));
        }
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_exactly_one_body_is_rendered() {
    let template = "@@if N == \"1\"@@one@@elif N == \"2\"@@two@@elif N != \"3\"@@other@@else@@three@@endif@@";
    for (n, expected) in [("1", "one"), ("2", "two"), ("3", "three"), ("4", "other")] {
        let context = Context::builder().scalar("N", n).build();
        assert_eq!(process_str("f", template, &context).unwrap(), expected);
    }
}

#[test]
fn test_error_messages_carry_location() {
    let err = process_str("CMakeLists.txt", "a\nb @@oops here@@", &Context::default()).unwrap_err();
    assert!(matches!(err, Error::LexError(_)));
    assert!(err.to_string().starts_with("CMakeLists.txt:2:3: malformed marker"));
}

#[test]
fn test_process_reads_without_writing() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("main.cpp");
    fs::write(&path, "// @@ENV:LANGUAGE@@\n").unwrap();

    let context = Context::builder().scalar("ENV:LANGUAGE", "c++").build();
    assert_eq!(process(&path, &context).unwrap(), "// c++\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), "// @@ENV:LANGUAGE@@\n");
}

#[test]
fn test_process_missing_file_is_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = process(temp_dir.path().join("nope.txt"), &Context::default()).unwrap_err();
    assert!(matches!(err, Error::IoError { .. }));
}

#[test_log::test]
fn test_process_all_rewrites_every_file() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "CMakeLists.txt", "project(x LANGUAGES @@ENV:LANGUAGE@@)\n");
    write(root, "source/main.cpp", "@@if ENV:FEATURES has \"imgui\"@@#include <imgui.h>\n@@endif@@int main() {}\n");
    write(root, "docs/readme.md", "no markers\n");

    let context = Context::builder()
        .scalar("ENV:LANGUAGE", "CXX")
        .list("ENV:FEATURES", Vec::<String>::new())
        .build();
    process_all(root, &context).unwrap();

    assert_eq!(fs::read_to_string(root.join("CMakeLists.txt")).unwrap(), "project(x LANGUAGES CXX)\n");
    assert_eq!(fs::read_to_string(root.join("source/main.cpp")).unwrap(), "int main() {}\n");
    assert_eq!(fs::read_to_string(root.join("docs/readme.md")).unwrap(), "no markers\n");
}

#[test_log::test]
fn test_process_all_stops_at_first_error_without_rollback() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a.txt", "@@X@@");
    write(root, "b.txt", "@@MISSING@@");
    write(root, "c.txt", "@@X@@");

    let context = Context::builder().scalar("X", "done").build();
    let err = process_all(root, &context).unwrap_err();

    match err {
        Error::EvaluationError(EvaluationError::UndefinedVariable { name, location }) => {
            assert_eq!(name, "MISSING");
            assert_eq!(location.file, root.join("b.txt"));
        }
        other => panic!("expected UndefinedVariable, got {other:?}"),
    }
    assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "done");
    assert_eq!(fs::read_to_string(root.join("b.txt")).unwrap(), "@@MISSING@@");
    assert_eq!(fs::read_to_string(root.join("c.txt")).unwrap(), "@@X@@");
}

#[test]
fn test_process_all_except_skips_ignored_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "assets/logo.svg", "<svg>@@not a marker@@</svg>");
    write(root, "main.cpp", "@@X@@");

    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new("assets/**").unwrap());
    let ignored = builder.build().unwrap();

    let context = Context::builder().scalar("X", "ok").build();
    process_all_except(root, &context, &ignored).unwrap();

    assert_eq!(fs::read_to_string(root.join("main.cpp")).unwrap(), "ok");
    assert_eq!(
        fs::read_to_string(root.join("assets/logo.svg")).unwrap(),
        "<svg>@@not a marker@@</svg>"
    );
}
