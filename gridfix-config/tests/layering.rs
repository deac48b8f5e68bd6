use gridfix_config::Loader;
use gridfix_engine::GridStrategy;
use std::fs;

#[test]
fn file_overrides_only_the_keys_it_sets() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gridfix.toml");
    fs::write(
        &path,
        "[layout]\nmax_row_width = 960\nstrategy = \"by-container\"\n\n[document]\nbackup_suffix = \"orig\"\n",
    )
    .unwrap();

    let config = Loader::new().with_file(&path).build().unwrap();
    assert_eq!(config.layout.max_row_width, 960);
    assert_eq!(config.layout.min_width, 40);
    assert_eq!(config.layout.strategy, GridStrategy::ByContainer);
    assert_eq!(config.document.backup_suffix, "orig");
    assert!(config.document.backup);
}

#[test]
fn later_layers_win() {
    let dir = tempfile::tempdir().unwrap();
    let project = dir.path().join("project.toml");
    let explicit = dir.path().join("explicit.toml");
    fs::write(&project, "[output]\nrow_class = \"grid-row\"\ncolumn_class_prefix = \"span\"\n").unwrap();
    fs::write(&explicit, "[output]\nrow_class = \"line\"\n").unwrap();

    let config = Loader::new()
        .with_optional_file(&project)
        .with_file(&explicit)
        .set_override("layout.strategy", "by-row")
        .unwrap()
        .build()
        .unwrap();

    let options = config.to_engine_options();
    assert_eq!(options.rewrite.row_class, "line");
    assert_eq!(options.rewrite.column_class(4), "span4");
}

#[test]
fn missing_optional_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let config = Loader::new()
        .with_optional_file(dir.path().join("absent.toml"))
        .build()
        .unwrap();
    assert_eq!(config.tags.root, "body");
}

#[test]
fn missing_required_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let result = Loader::new().with_file(dir.path().join("absent.toml")).build();
    assert!(result.is_err());
}

#[test]
fn unknown_strategy_is_rejected() {
    let result = Loader::new()
        .set_override("layout.strategy", "diagonal")
        .unwrap()
        .build();
    assert!(result.is_err());
}
