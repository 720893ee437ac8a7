//! Corpus test: every file under test_data/valid must parse clean, and
//! every file under test_data/invalid must produce at least one syntax
//! error.

use std::path::Path;

fn check_dir(dir: &str, expect_clean: bool) {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data").join(dir);
    let entries = std::fs::read_dir(&root)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", root.display(), e));

    let mut checked = 0;
    for entry in entries {
        let path = entry.expect("directory entry").path();
        if path.extension().map_or(true, |ext| ext != "otto") {
            continue;
        }
        let source = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
        let outcome = otto_core::parse(&source);
        assert_eq!(
            outcome.errors.is_empty(),
            expect_clean,
            "{}: unexpected errors state: {:?}",
            path.display(),
            outcome.errors
        );
        checked += 1;
    }
    assert!(checked > 0, "no .otto files found under {}", root.display());
}

#[test]
fn valid_pipelines_parse_without_errors() {
    check_dir("valid", true);
}

#[test]
fn invalid_pipelines_report_errors() {
    check_dir("invalid", false);
}

#[test]
fn valid_pipelines_compile_to_documents() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data/valid");
    for entry in std::fs::read_dir(root).expect("valid corpus") {
        let path = entry.expect("directory entry").path();
        if path.extension().map_or(true, |ext| ext != "otto") {
            continue;
        }
        let source = std::fs::read_to_string(&path).expect("readable corpus file");
        let outcome = otto_core::compile(&source).expect("no structural failure");
        assert!(outcome.errors.is_empty(), "{}", path.display());
        // Every document carries the compatibility version.
        let json = serde_json::to_value(&outcome.orf).expect("serializable orf");
        assert_eq!(json["version"], serde_json::json!(1), "{}", path.display());
    }
}
