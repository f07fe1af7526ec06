/*!
 * End-to-end tests for export and import
 */

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use tempfile::tempdir;

use crate::exporter::export_project;
use crate::filter::FilterRules;
use crate::importer::import_project;
use crate::progress::NoProgress;
use crate::serializer::relative_posix_path;

// Helper function to create a test project
fn setup_test_project(root: &Path) -> io::Result<()> {
    fs::create_dir_all(root.join("src").join("util"))?;
    fs::create_dir_all(root.join(".git").join("refs"))?;
    fs::create_dir_all(root.join("web").join("node_modules").join("left-pad"))?;
    fs::create_dir_all(root.join("assets"))?;

    fs::write(root.join("README.md"), "# Demo\n\nA small project.\n")?;
    fs::write(root.join("src").join("main.rs"), "fn main() {\n    println!(\"hi\");\n}\n")?;
    fs::write(root.join("src").join("util").join("mod.rs"), "pub fn add(a: i32, b: i32) -> i32 {\n    a + b\n}")?;
    fs::write(root.join("web").join("app.js"), "console.log('app');")?;
    fs::write(root.join("web").join("package-lock.json"), "{\"lockfileVersion\": 3}")?;
    fs::write(root.join("Makefile"), "build:\n\tcargo build")?;

    fs::write(root.join(".git").join("refs").join("HEAD"), "ref: refs/heads/main")?;
    fs::write(
        root.join("web").join("node_modules").join("left-pad").join("index.js"),
        "module.exports = leftPad;",
    )?;

    let mut png = File::create(root.join("assets").join("logo.png"))?;
    png.write_all(&[0x89, b'P', b'N', b'G', 0, 0, 0, 0])?;

    Ok(())
}

// Helper to collect every included text file as relative path -> content
fn walk_text_files(root: &Path, rules: &FilterRules) -> io::Result<BTreeMap<String, String>> {
    let mut files = BTreeMap::new();
    let walker = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !rules.excludes_entry(&e.file_name().to_string_lossy(), e.file_type().is_dir()));
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.insert(
                relative_posix_path(root, entry.path()),
                fs::read_to_string(entry.path())?,
            );
        }
    }
    Ok(files)
}

// Helper to split an export document into its tree and contents sections
fn sections(doc: &str) -> (&str, &str) {
    let split = doc.find("## 📄 File Contents").unwrap_or(doc.len());
    doc.split_at(split)
}

#[test]
fn test_round_trip() -> io::Result<()> {
    let work = tempdir()?;
    let project = work.path().join("demo");
    setup_test_project(&project)?;
    let doc_path = work.path().join("demo.claude");

    let rules = FilterRules::default();
    export_project(&project, &doc_path, &rules, &NoProgress)?;

    let restored = work.path().join("restored");
    let document = fs::read_to_string(&doc_path)?;
    let report = import_project(&document, &restored, &NoProgress)?;
    assert!(report.is_complete());

    let original = walk_text_files(&project, &rules)?;
    let roundtrip = walk_text_files(&restored, &rules)?;

    assert_eq!(
        original.keys().collect::<Vec<_>>(),
        roundtrip.keys().collect::<Vec<_>>()
    );
    for (path, content) in &original {
        assert_eq!(&roundtrip[path], content.trim(), "content mismatch for {}", path);
    }
    Ok(())
}

#[test]
fn test_excluded_dirs_appear_nowhere() -> io::Result<()> {
    let work = tempdir()?;
    setup_test_project(work.path())?;
    let doc_path = work.path().join("out.claude");

    export_project(work.path(), &doc_path, &FilterRules::default(), &NoProgress)?;
    let doc = fs::read_to_string(&doc_path)?;

    assert!(!doc.contains(".git/"));
    assert!(!doc.contains("refs/heads/main"));
    assert!(!doc.contains("node_modules"));
    assert!(!doc.contains("leftPad"));
    Ok(())
}

#[test]
fn test_ignored_extensions_and_names() -> io::Result<()> {
    let work = tempdir()?;
    setup_test_project(work.path())?;
    let doc_path = work.path().join("out.claude");

    export_project(work.path(), &doc_path, &FilterRules::default(), &NoProgress)?;
    let doc = fs::read_to_string(&doc_path)?;
    let (tree, contents) = sections(&doc);

    // Same rules in both sections
    assert!(!tree.contains("logo.png"));
    assert!(!contents.contains("logo.png"));
    assert!(!tree.contains("package-lock.json"));
    assert!(!contents.contains("package-lock.json"));
    // The emptied directory is still shown
    assert!(tree.contains("assets/"));
    Ok(())
}

#[test]
fn test_tree_order_and_glyphs() -> io::Result<()> {
    let work = tempdir()?;
    setup_test_project(work.path())?;
    let doc_path = work.path().join("out.claude");

    export_project(work.path(), &doc_path, &FilterRules::default(), &NoProgress)?;
    let doc = fs::read_to_string(&doc_path)?;
    let (tree, _) = sections(&doc);

    let expected = [
        "```",
        "├── Makefile",
        "├── README.md",
        "├── assets/",
        "├── src/",
        "│   ├── main.rs",
        "│   └── util/",
        "│       └── mod.rs",
        "└── web/",
        "    └── app.js",
        "```",
    ]
    .join("\n");
    assert!(tree.contains(&expected), "unexpected tree:\n{}", tree);
    Ok(())
}

#[test]
fn test_sample_project_scenario() -> io::Result<()> {
    let work = tempdir()?;
    let project = work.path().join("sample-project");
    fs::create_dir_all(project.join("src"))?;
    fs::write(project.join("README.md"), "# Sample Project")?;
    fs::write(project.join("src").join("index.ts"), "console.log(1);")?;
    let doc_path = work.path().join("sample.claude");

    let summary = export_project(&project, &doc_path, &FilterRules::default(), &NoProgress)?;
    assert_eq!(summary.files_exported, 2);

    let doc = fs::read_to_string(&doc_path)?;
    assert!(doc.contains("```\n├── README.md\n└── src/\n    └── index.ts\n```"));

    let target = work.path().join("empty");
    fs::create_dir(&target)?;
    import_project(&doc, &target, &NoProgress)?;
    assert_eq!(fs::read_to_string(target.join("README.md"))?, "# Sample Project");
    assert_eq!(
        fs::read_to_string(target.join("src").join("index.ts"))?,
        "console.log(1);"
    );
    Ok(())
}

#[test]
fn test_rejected_document_writes_nothing() -> io::Result<()> {
    let work = tempdir()?;
    let project = work.path().join("p");
    fs::create_dir(&project)?;
    fs::write(project.join("a.txt"), "a")?;
    let doc_path = work.path().join("p.claude");
    export_project(&project, &doc_path, &FilterRules::default(), &NoProgress)?;
    let doc = fs::read_to_string(&doc_path)?;

    let target = work.path().join("target");
    fs::create_dir(&target)?;
    for broken in [
        doc.replace("# Project Structure:", "# Structure"),
        doc.replace("## 📄 File Contents", "## Files"),
    ] {
        assert!(import_project(&broken, &target, &NoProgress).is_err());
        assert_eq!(fs::read_dir(&target)?.count(), 0);
    }
    Ok(())
}

#[test]
#[cfg(unix)]
fn test_unreadable_file_does_not_abort_export() -> io::Result<()> {
    let work = tempdir()?;
    let project = work.path().join("p");
    fs::create_dir(&project)?;
    fs::write(project.join("kept.txt"), "kept")?;
    // Listed by the traversal, but reading it fails
    std::os::unix::fs::symlink(project.join("gone.txt"), project.join("dangling.txt"))?;

    let doc_path = work.path().join("p.claude");
    let summary = export_project(&project, &doc_path, &FilterRules::default(), &NoProgress)?;
    let doc = fs::read_to_string(&doc_path)?;
    let (_, contents) = sections(&doc);

    assert!(contents.contains("### 📝 `kept.txt`"));
    assert!(!contents.contains("dangling.txt"));
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].path, "dangling.txt");
    Ok(())
}

#[test]
fn test_custom_rules() -> io::Result<()> {
    let work = tempdir()?;
    setup_test_project(work.path())?;
    let doc_path = work.path().join("out.claude");

    let rules = FilterRules::with_additions(&["web".to_string()], &[".md".to_string()], &["Makefile".to_string()]);
    let summary = export_project(work.path(), &doc_path, &rules, &NoProgress)?;

    let mut exported: Vec<_> = summary.file_details.keys().cloned().collect();
    exported.sort();
    assert_eq!(exported, vec!["src/main.rs", "src/util/mod.rs"]);
    Ok(())
}

#[test]
fn test_crlf_content_round_trip() -> io::Result<()> {
    let work = tempdir()?;
    let project = work.path().join("win");
    fs::create_dir(&project)?;
    fs::write(project.join("win.txt"), "line1\r\nline2\r\nline3")?;
    fs::write(project.join("mixed.txt"), "unix\nwindows\r\n\r\nend")?;
    let doc_path = work.path().join("win.claude");

    export_project(&project, &doc_path, &FilterRules::default(), &NoProgress)?;
    let document = fs::read_to_string(&doc_path)?;
    let restored = work.path().join("restored");
    let report = import_project(&document, &restored, &NoProgress)?;

    assert!(report.is_complete());
    assert_eq!(fs::read(restored.join("win.txt"))?, b"line1\r\nline2\r\nline3");
    assert_eq!(fs::read(restored.join("mixed.txt"))?, b"unix\nwindows\r\n\r\nend");
    Ok(())
}

#[test]
#[cfg(unix)]
fn test_unusual_unix_file_names_round_trip() -> io::Result<()> {
    let work = tempdir()?;
    let project = work.path().join("names");
    fs::create_dir_all(project.join("logs"))?;
    fs::write(project.join("logs").join("notes:2024.txt"), "colon")?;
    fs::write(project.join("back\\slash.txt"), "backslash")?;
    let doc_path = work.path().join("names.claude");

    export_project(&project, &doc_path, &FilterRules::default(), &NoProgress)?;
    let document = fs::read_to_string(&doc_path)?;
    let restored = work.path().join("restored");
    let report = import_project(&document, &restored, &NoProgress)?;

    assert!(report.is_complete(), "failures: {:?}", report.failures);
    assert_eq!(
        fs::read_to_string(restored.join("logs").join("notes:2024.txt"))?,
        "colon"
    );
    assert_eq!(fs::read_to_string(restored.join("back\\slash.txt"))?, "backslash");
    Ok(())
}

#[test]
fn test_file_named_like_excluded_dir_is_left_out() -> io::Result<()> {
    let work = tempdir()?;
    let project = work.path().join("p");
    fs::create_dir(&project)?;
    fs::write(project.join("build"), "#!/bin/sh\nmake")?;
    fs::write(project.join("main.c"), "int main(void) { return 0; }")?;
    let doc_path = work.path().join("p.claude");

    let summary = export_project(&project, &doc_path, &FilterRules::default(), &NoProgress)?;
    let doc = fs::read_to_string(&doc_path)?;
    let (tree, contents) = sections(&doc);

    assert!(!tree.contains("build"));
    assert!(!contents.contains("### 📝 `build`"));
    assert_eq!(summary.files_exported, 1);
    assert!(tree.contains("└── main.c"));
    Ok(())
}
