mod common;

use std::fs;

use nodebaker::catalog::{Catalog, Category, VariantId};
use nodebaker::constants::IGNORE_FILE;
use nodebaker::error::Error;
use nodebaker::placeholder::Syntax;
use nodebaker::resolver::Validator;
use tempfile::TempDir;

#[test]
fn test_builtin_categories_and_variants() {
    let catalog = Catalog::builtin().unwrap();

    assert_eq!(catalog.list_categories(), vec![Category::Db, Category::Server, Category::Lint]);
    let db: Vec<&str> = catalog.list_variants(Category::Db).iter().map(|v| v.as_str()).collect();
    assert_eq!(
        db,
        vec![
            "mysql",
            "postgresql",
            "sqlite",
            "typeorm-mysql",
            "typeorm-postgresql",
            "typeorm-sqlite",
        ]
    );
    let server: Vec<&str> =
        catalog.list_variants(Category::Server).iter().map(|v| v.as_str()).collect();
    assert_eq!(server, vec!["express"]);
}

#[test]
fn test_builtin_category_policies() {
    let catalog = Catalog::builtin().unwrap();

    let db = catalog.category(Category::Db).unwrap();
    assert!(db.is_mandatory());
    assert!(db.default_variant().is_none());

    let server = catalog.category(Category::Server).unwrap();
    assert!(server.is_mandatory());
    assert_eq!(server.default_variant(), Some(&VariantId::new("express")));

    let lint = catalog.category(Category::Lint).unwrap();
    assert!(!lint.is_mandatory());
}

#[test]
fn test_parameters_derived_from_placeholders() {
    let catalog = Catalog::builtin().unwrap();

    let mysql = catalog.lookup(Category::Db, "mysql").unwrap();
    assert_eq!(mysql.parameters(), ["dbHost", "dbUser", "dbName"]);

    let postgresql = catalog.lookup(Category::Db, "postgresql").unwrap();
    assert_eq!(postgresql.parameters(), ["databaseUrl"]);
    assert_eq!(postgresql.validator_for("databaseUrl"), Some(Validator::Uri));

    let express = catalog.lookup(Category::Server, "express").unwrap();
    assert_eq!(express.parameters(), ["port", "projectName"]);
    assert_eq!(express.default_for("port"), Some("5000"));
    assert_eq!(express.default_for("projectName"), None);
    assert_eq!(express.id(), "server/express");
    assert_eq!(express.source_path(), "server/express.ts");
    assert_eq!(express.title(), "Express");

    let eslint = catalog.lookup(Category::Lint, "eslint").unwrap();
    assert!(eslint.parameters().is_empty());
}

#[test]
fn test_builtin_matches_template_tree() {
    let builtin = Catalog::builtin().unwrap();
    let scanned = Catalog::from_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")).unwrap();

    assert_eq!(scanned.list_categories(), builtin.list_categories());
    for category in builtin.list_categories() {
        assert_eq!(scanned.list_variants(category), builtin.list_variants(category));
        for variant in builtin.list_variants(category) {
            let expected = builtin.lookup(category, variant.as_str()).unwrap();
            let actual = scanned.lookup(category, variant.as_str()).unwrap();
            assert_eq!(actual.parameters(), expected.parameters());
            assert_eq!(actual.source(), expected.source());
            assert_eq!(actual.directories(), expected.directories());
        }
    }
}

#[test]
fn test_typeorm_variants_request_source_folders() {
    let catalog = Catalog::builtin().unwrap();

    let typeorm = catalog.lookup(Category::Db, "typeorm-sqlite").unwrap();
    assert_eq!(typeorm.directories(), ["entities", "migrations", "subscribers"]);
    assert_eq!(typeorm.parameters(), ["sqliteFile"]);
    assert!(typeorm.dependencies().contains_key("typeorm"));
    assert!(typeorm.dependencies().contains_key("sqlite3"));

    assert!(catalog.lookup(Category::Db, "sqlite").unwrap().directories().is_empty());
}

#[test]
fn test_invalid_source_folder() {
    let result = common::catalog(
        "categories:\n  db:\n    variants:\n      memory:\n        directories: [\"../etc\"]\n",
        &[("db/memory.ts", "export {};\n")],
    );
    assert!(matches!(result, Err(Error::CatalogError(_))));
}

#[test]
fn test_syntax_follows_extension() {
    let catalog = common::catalog(
        "{}",
        &[("server/app.yaml", "port: {{port}}\n"), ("lint/eslint.json", "{}\n")],
    )
    .unwrap();

    assert_eq!(catalog.lookup(Category::Server, "app").unwrap().syntax(), Syntax::Plain);
    assert_eq!(catalog.lookup(Category::Lint, "eslint").unwrap().syntax(), Syntax::Json);
    let builtin = Catalog::builtin().unwrap();
    assert_eq!(builtin.lookup(Category::Db, "mysql").unwrap().syntax(), Syntax::Script);
}

#[test]
fn test_lookup_unknown_variant() {
    let catalog = Catalog::builtin().unwrap();

    match catalog.lookup(Category::Db, "oracle") {
        Err(Error::UnknownVariant { category, variant }) => {
            assert_eq!(category, Category::Db);
            assert_eq!(variant, "oracle");
        }
        other => panic!("Expected UnknownVariant, got {:?}", other),
    }
    assert!(matches!(
        catalog.lookup(Category::Server, "sqlite"),
        Err(Error::UnknownVariant { .. })
    ));
}

#[test]
fn test_category_from_str() {
    assert_eq!("db".parse::<Category>().unwrap(), Category::Db);
    assert_eq!("lint".parse::<Category>().unwrap(), Category::Lint);
    assert!(matches!("orm".parse::<Category>(), Err(Error::UnknownCategory { .. })));
}

#[test]
fn test_catalog_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Catalog>();
}

#[test]
fn test_category_without_metadata_is_mandatory() {
    let catalog = common::catalog("{}", &[("db/memory.ts", "export const db = [];\n")]).unwrap();

    let db = catalog.category(Category::Db).unwrap();
    assert!(db.is_mandatory());
    assert!(db.default_variant().is_none());
    assert_eq!(db.label(), "Select db");
    assert!(catalog.category(Category::Server).is_none());
    assert_eq!(catalog.lookup(Category::Db, "memory").unwrap().title(), "Memory");
}

#[test]
fn test_malformed_placeholder_is_rejected_at_load() {
    let result = common::catalog("{}", &[("db/broken.ts", "const a = 1;\nconst b = \"{{ 1x }}\";\n")]);

    match result {
        Err(Error::MalformedPlaceholder { template, line }) => {
            assert_eq!(template, "db/broken.ts");
            assert_eq!(line, 2);
        }
        other => panic!("Expected MalformedPlaceholder, got {:?}", other),
    }
}

#[test]
fn test_unknown_category_directory() {
    let result = common::catalog("{}", &[("orm/prisma.ts", "")]);
    assert!(matches!(result, Err(Error::UnknownCategory { .. })));
}

#[test]
fn test_default_for_unused_parameter() {
    let metadata = r#"
categories:
  db:
    variants:
      memory:
        defaults:
          host: localhost
"#;
    let result = common::catalog(metadata, &[("db/memory.ts", "const name = \"{{name}}\";")]);
    assert!(matches!(result, Err(Error::CatalogError(_))));
}

#[test]
fn test_env_template_with_unknown_parameter() {
    let metadata = r#"
categories:
  db:
    variants:
      memory:
        env:
          DB_HOST: "{{host}}"
"#;
    let result = common::catalog(metadata, &[("db/memory.ts", "const name = \"{{name}}\";")]);
    assert!(matches!(result, Err(Error::CatalogError(_))));
}

#[test]
fn test_metadata_without_source() {
    let metadata = r#"
categories:
  db:
    variants:
      oracle:
        title: Oracle
"#;
    let result = common::catalog(metadata, &[("db/memory.ts", "")]);
    assert!(matches!(result, Err(Error::CatalogError(_))));
}

#[test]
fn test_default_naming_missing_variant() {
    let metadata = r#"
categories:
  server:
    default: koa
"#;
    let result = common::catalog(metadata, &[("server/express.ts", "")]);
    assert!(matches!(result, Err(Error::CatalogError(_))));
}

#[test]
fn test_duplicate_variant() {
    let result = common::catalog("{}", &[("db/memory.ts", ""), ("db/memory.js", "")]);
    assert!(matches!(result, Err(Error::CatalogError(_))));
}

#[test]
fn test_invalid_dependency_constraint() {
    let metadata = r#"
categories:
  db:
    variants:
      memory:
        dependencies:
          lowdb: "^1 || ^2"
"#;
    let result = common::catalog(metadata, &[("db/memory.ts", "")]);
    assert!(matches!(result, Err(Error::InvalidConstraint { .. })));
}

#[test]
fn test_unknown_metadata_field() {
    let metadata = r#"
categories:
  db:
    labels: oops
"#;
    let result = common::catalog(metadata, &[("db/memory.ts", "")]);
    assert!(matches!(result, Err(Error::CatalogError(_))));
}

#[test]
fn test_json_metadata() {
    let metadata = r#"{"categories": {"server": {"default": "express", "mandatory": true}}}"#;
    let catalog = common::catalog(metadata, &[("server/express.ts", "")]).unwrap();
    assert_eq!(
        catalog.category(Category::Server).unwrap().default_variant(),
        Some(&VariantId::new("express"))
    );
}

#[test]
fn test_from_dir() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("db/nested")).unwrap();
    fs::create_dir_all(root.join("server")).unwrap();

    fs::write(
        root.join("catalog.yaml"),
        "categories:\n  server:\n    default: koa\n    variants:\n      koa:\n        defaults:\n          port: \"3000\"\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "not a template").unwrap();
    fs::write(root.join(IGNORE_FILE), "*.orig\n").unwrap();
    fs::write(root.join("db/memory.ts"), "export const name = \"{{name}}\";\n").unwrap();
    fs::write(root.join("db/memory.ts.orig"), "{{ broken").unwrap();
    fs::write(root.join("db/nested/deep.ts"), "").unwrap();
    fs::write(root.join("server/koa.ts"), "app.listen({{port}});\n").unwrap();

    let catalog = Catalog::from_dir(root).unwrap();

    assert_eq!(catalog.list_categories(), vec![Category::Db, Category::Server]);
    let db: Vec<&str> = catalog.list_variants(Category::Db).iter().map(|v| v.as_str()).collect();
    assert_eq!(db, vec!["memory"]);
    let koa = catalog.lookup(Category::Server, "koa").unwrap();
    assert_eq!(koa.parameters(), ["port"]);
    assert_eq!(koa.default_for("port"), Some("3000"));
    assert_eq!(
        catalog.category(Category::Server).unwrap().default_variant(),
        Some(&VariantId::new("koa"))
    );
}

#[test]
fn test_from_missing_dir() {
    let temp_dir = TempDir::new().unwrap();
    let result = Catalog::from_dir(temp_dir.path().join("missing"));
    assert!(matches!(result, Err(Error::CatalogError(_))));
}
