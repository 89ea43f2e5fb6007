//! Library integration tests.

use gobuilder::config::{load_configs, Config};
use gobuilder::project::entrypoint::{imports_file_name, imports_source, main_file_name};
use gobuilder::project::revision::PackageRevision;
use gobuilder::template::{EntryTemplate, Metadata, TemplateData};
use gobuilder::workspace::SearchPath;
use gobuilder::BuilderError;
use std::fs;
use tempfile::TempDir;

#[test]
fn error_types_are_public() {
    let err = BuilderError::ProjectNotFound {
        name: "test".into(),
    };
    assert!(err.to_string().contains("test"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> gobuilder::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use gobuilder::cli::{Cli, Commands};

    let cli = Cli::parse_from(["gobuilder", "list", "--json"]);

    if let Commands::List(args) = cli.command {
        assert!(args.json);
    } else {
        panic!("Expected List command");
    }
}

#[test]
fn configs_load_in_order_with_local_overrides() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("gobuilder.yml"),
        "api:\n  fetchers: {}\n  repos:\n    lib:\n      url: github.com/org/lib\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("gobuilder.local.yml"),
        "api:\n  repos:\n    lib:\n      revision: v2.0.0\n",
    )
    .unwrap();
    fs::write(temp.path().join("tools.yml"), "cli:\n  fetchers: {}\n").unwrap();

    let configs = load_configs(
        &["gobuilder.yml".into(), temp.path().join("tools.yml")],
        temp.path(),
    )
    .unwrap();

    assert_eq!(configs.len(), 2);
    assert_eq!(configs[0].get_string("api.repos.lib.url"), "github.com/org/lib");
    assert_eq!(configs[0].get_string("api.repos.lib.revision"), "v2.0.0");
    assert_eq!(configs[1].keys(), vec!["cli"]);
}

#[test]
fn generated_files_follow_naming_convention() {
    assert_eq!(main_file_name("api"), "main_api.go");
    assert_eq!(imports_file_name("api"), "main_api_imports.go");
    assert_eq!(
        imports_source(&["github.com/org/a"]),
        "package main\nimport _ \"github.com/org/a\"\n"
    );
}

#[test]
fn builtin_template_renders_project_metadata() {
    let template = EntryTemplate::builtin().unwrap();
    let metadata = Metadata {
        name: "api".into(),
        packages: vec!["github.com/org/api/server".into()],
        config: Config::from_yaml_str("fetchers: {}\n").unwrap(),
        revisions: vec![PackageRevision {
            package: "github.com/org/api/server".into(),
            branch: "main".into(),
            revision: "0123abcd".into(),
        }],
        built_at: chrono::Utc::now(),
    };

    let source = template.render(&metadata, &TemplateData::new()).unwrap();

    assert!(source.starts_with("package main"));
    assert!(source.contains("github.com/org/api/server"));
    assert!(source.contains("0123abcd"));
    assert!(!source.contains("${"));
}

#[test]
fn search_path_finds_packages_in_first_matching_root() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    fs::create_dir_all(second.path().join("src/github.com/org/lib")).unwrap();
    let path = SearchPath::from_roots([first.path(), second.path()]);

    let location = path.find("github.com/org/lib").unwrap();

    assert_eq!(location.root, second.path());
    assert!(!path.contains("github.com/org/other"));
}
