use std::{fs, path::PathBuf};

use tempfile::tempdir;

use modelgen_cli::{Args, run};

fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

/// Collects all schema files from a directory
fn collect_schemas(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

fn args_for(schema: &PathBuf, output: PathBuf) -> Args {
    let overrides = schema.with_extension("override");
    Args {
        schema: schema.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        overrides: overrides
            .is_file()
            .then(|| overrides.to_string_lossy().to_string()),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let schemas = collect_schemas(demos_dir());

    assert!(!schemas.is_empty(), "No schemas found in demos/");

    let mut failed = Vec::new();

    for schema in &schemas {
        let output = temp_dir
            .path()
            .join(format!("{}.py", schema.file_stem().unwrap().to_string_lossy()));

        match run(&args_for(schema, output.clone())) {
            Ok(()) => {
                let python = fs::read_to_string(&output).expect("Output should be written");
                assert!(python.starts_with("# This file is generated by modelgen. DO NOT EDIT!\n"));
            }
            Err(e) => failed.push((schema.clone(), e)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_uml_demo_content() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("uml.py");

    run(&args_for(&demos_dir().join("uml.toml"), output.clone())).expect("uml demo should compile");
    let python = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = python.lines().collect();

    let position = |line: &str| {
        lines
            .iter()
            .position(|l| *l == line)
            .unwrap_or_else(|| panic!("missing line: {line}"))
    };

    // classes, parents first
    assert!(position("class Element: pass") < position("class NamedElement(Element): pass"));
    assert!(
        position("class Namespace(NamedElement): pass")
            < position("class Package(Namespace, PackageableElement): pass")
    );
    assert!(!python.contains("class Presentation"));
    assert!(!python.contains("class String"));

    // stereotypes
    assert!(lines.contains(&"# class 'Type' has been stereotyped as 'Abstract'"));
    assert!(lines.contains(&"# class 'Classifier' has been stereotyped as 'Abstract' too"));

    // attributes
    assert!(lines.contains(&"NamedElement.name = attribute('name', str)"));
    assert!(lines.contains(&"Classifier.isAbstract = attribute('isAbstract', int, default=False)"));
    assert!(lines.contains(
        &"NamedElement.visibility = enumeration('visibility', ('public', 'private', 'protected', 'package'), 'public')"
    ));
    assert!(lines.contains(&"# 'Comment.body' is a simple attribute"));
    assert!(lines.contains(&"Comment.body = attribute('body', str)"));

    // associations
    assert!(lines.contains(
        &"Package.packagedElement = association('packagedElement', PackageableElement, composite=True, opposite='owningPackage')"
    ));
    assert!(lines.contains(
        &"PackageableElement.owningPackage = association('owningPackage', Package, lower=1, upper=1, opposite='packagedElement')"
    ));
    assert!(!python.contains("presentation"));

    // derived unions, nested unions first
    assert!(
        position("Namespace.ownedMember = derivedunion('ownedMember', NamedElement, 0, '*', Package.packagedElement)")
            < position("Element.ownedElement = derivedunion('ownedElement', Element, 0, '*', Element.ownedComment, Namespace.ownedMember)")
    );
    assert!(lines.contains(
        &"Element.owner = derivedunion('owner', Element, 1, 1, NamedElement.namespace)"
    ));

    // redefinitions
    assert!(lines.contains(
        &"Package.nestedPackage = redefine(Package, 'nestedPackage', Package, Package.packagedElement)"
    ));

    // overrides
    assert!(lines.contains(&"Element.isKindOf = _element_is_kind_of"));
    assert!(lines.contains(&"NamedElement.qualifiedName = property(_named_element_qualified_name)"));
    assert!(!python.contains("No override for operation"));
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let schemas = collect_schemas(demos_dir().join("errors"));

    assert!(!schemas.is_empty(), "No error demos found in demos/errors/");

    let mut unexpectedly_succeeded = Vec::new();

    for schema in &schemas {
        let output = temp_dir
            .path()
            .join(format!("error_{}.py", schema.file_stem().unwrap().to_string_lossy()));

        if run(&args_for(schema, output.clone())).is_ok() {
            unexpectedly_succeeded.push(schema.clone());
        }
        assert!(!output.exists(), "No output may be written on error");
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}
