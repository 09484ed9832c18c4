use std::env;
use std::path::{Path, PathBuf};

static EXPECTED_COMMANDS: &[&str] = &["bench-viewer", "report", "config"];

fn find_docs_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../docs")
}

#[test]
fn test_manpage_generation() {
    let markdown_path = find_docs_dir().join("manpage.md");

    assert!(
        markdown_path.exists(),
        "Missing markdown documentation: {}",
        markdown_path.display()
    );

    let content = std::fs::read_to_string(&markdown_path).unwrap_or_else(|_| {
        panic!(
            "Failed to read markdown documentation: {}",
            markdown_path.display()
        )
    });

    for command in EXPECTED_COMMANDS.iter() {
        assert!(
            content.contains(command),
            "Markdown documentation does not contain command: {}",
            command
        );
    }
}
