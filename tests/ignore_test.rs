use nodebaker::constants::IGNORE_FILE;
use nodebaker::ignore::parse_ignore_file;
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

#[test]
fn test_parse_ignore_file() {
    let temp_dir = TempDir::new().unwrap();
    let ignore_path = temp_dir.path().join(IGNORE_FILE);

    // Test without .templateignore
    let glob_set = parse_ignore_file(&ignore_path).unwrap();
    assert!(glob_set.is_match("db/.DS_Store")); // Default pattern
    assert!(!glob_set.is_match("db/sqlite.ts"));

    // Test with .templateignore
    let mut file = File::create(&ignore_path).unwrap();
    writeln!(file, "# backups\n*.orig\n\ndrafts/**").unwrap();

    let glob_set = parse_ignore_file(&ignore_path).unwrap();
    assert!(glob_set.is_match("db/sqlite.ts.orig"));
    assert!(glob_set.is_match("drafts/server/koa.ts"));
    assert!(glob_set.is_match("db/.DS_Store")); // Default pattern still works
    assert!(!glob_set.is_match("db/sqlite.ts"));
}

#[test]
fn test_invalid_pattern() {
    let temp_dir = TempDir::new().unwrap();
    let ignore_path = temp_dir.path().join(IGNORE_FILE);
    std::fs::write(&ignore_path, "db/[unclosed\n").unwrap();

    assert!(parse_ignore_file(&ignore_path).is_err());
}
