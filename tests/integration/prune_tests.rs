use shears::core::models::{AssetTable, Compilation, EmittedAsset, OutputGroup, PruneConfig};
use shears::core::pruner::{prune, Pruner};
use shears::ShearsError;

/// A compilation whose asset table holds every file its groups list
fn compilation_of(groups: Vec<OutputGroup>) -> Compilation {
    let assets: AssetTable = groups
        .iter()
        .flat_map(|g| g.files.iter().chain(g.auxiliary_files.iter()))
        .map(|f| EmittedAsset::new(f.clone(), format!("/* {} */", f).into_bytes()))
        .collect();
    Compilation::new(assets, groups)
}

fn js_app() -> OutputGroup {
    OutputGroup::new("js/app")
        .with_files(["js/app.9f8e7d6c.js"])
        .with_auxiliary_files(["js/app.9f8e7d6c.js.map"])
}

#[test]
fn test_code_file_and_map_removed() {
    let mut compilation = compilation_of(vec![OutputGroup::new("css/app")
        .with_files(["css/app.a1b2.js"])
        .with_auxiliary_files(["css/app.a1b2.js.map"])]);

    let report = prune(&mut compilation, &PruneConfig::new(["css/app"])).unwrap();

    let group = compilation.group("css/app").unwrap();
    assert!(group.files.is_empty());
    assert!(group.auxiliary_files.is_empty());
    assert!(!compilation.assets.contains("css/app.a1b2.js"));
    assert!(!compilation.assets.contains("css/app.a1b2.js.map"));
    assert_eq!(report.removed_count(), 2);
}

#[test]
fn test_map_in_file_list_removed() {
    // Older bundlers list the map next to the code instead of as an auxiliary file
    let mut compilation = compilation_of(vec![OutputGroup::new("css/app").with_files([
        "css/app.css",
        "css/app.js",
        "css/app.js.map",
    ])]);

    let report = prune(&mut compilation, &PruneConfig::new(["css/app"])).unwrap();

    assert_eq!(report.removed_count(), 2);
    assert_eq!(report.groups[0].removed, vec!["css/app.js", "css/app.js.map"]);
    assert_eq!(compilation.group("css/app").unwrap().files, vec!["css/app.css"]);
    assert!(!compilation.assets.contains("css/app.js.map"));
    assert_eq!(compilation.assets.len(), 1);
}

#[test]
fn test_code_file_without_map_removed() {
    let mut compilation = compilation_of(vec![
        OutputGroup::new("css/app").with_files(["css/app.a1b2.css", "css/app.a1b2.js"]),
    ]);

    let report = prune(&mut compilation, &PruneConfig::new(["css/app"])).unwrap();

    assert_eq!(report.groups.len(), 1);
    assert_eq!(report.groups[0].removed, vec!["css/app.a1b2.js"]);
    assert_eq!(compilation.group("css/app").unwrap().files, vec!["css/app.a1b2.css"]);
    assert!(compilation.assets.contains("css/app.a1b2.css"));
    assert_eq!(compilation.assets.len(), 1);
}

#[test]
fn test_other_groups_untouched() {
    let mut compilation = compilation_of(vec![
        js_app(),
        OutputGroup::new("css/app").with_files(["css/app.a1b2.css", "css/app.a1b2.js"]),
    ]);
    let before = compilation.group("js/app").unwrap().clone();

    prune(&mut compilation, &PruneConfig::new(["css/app"])).unwrap();

    assert_eq!(compilation.group("js/app").unwrap(), &before);
    assert!(compilation.assets.contains("js/app.9f8e7d6c.js"));
    assert!(compilation.assets.contains("js/app.9f8e7d6c.js.map"));
}

#[test]
fn test_no_code_file_is_fatal() {
    let mut compilation = compilation_of(vec![OutputGroup::new("css/app")]);

    let err = prune(&mut compilation, &PruneConfig::new(["css/app"])).unwrap_err();

    match err {
        ShearsError::Prune { group, matched, min, max } => {
            assert_eq!(group, "css/app");
            assert!(matched.is_empty());
            assert_eq!((min, max), (1, 2));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_only_stylesheet_is_fatal() {
    let mut compilation = compilation_of(vec![
        OutputGroup::new("css/app").with_files(["css/app.a1b2.css"]),
    ]);

    let err = prune(&mut compilation, &PruneConfig::new(["css/app"])).unwrap_err();
    assert!(err.is_configuration_drift());
    assert!(compilation.assets.contains("css/app.a1b2.css"));
}

#[test]
fn test_three_code_files_is_fatal() {
    let mut compilation = compilation_of(vec![OutputGroup::new("css/app").with_files([
        "css/app.1.js",
        "css/app.2.js",
        "css/app.3.js",
    ])]);

    let err = prune(&mut compilation, &PruneConfig::new(["css/app"])).unwrap_err();

    match err {
        ShearsError::Prune { matched, .. } => assert_eq!(matched.len(), 3),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_failed_prune_leaves_compilation_unchanged() {
    // First target is fine, second is not: nothing may be removed
    let mut compilation = compilation_of(vec![
        OutputGroup::new("css/app").with_files(["css/app.css", "css/app.js"]),
        OutputGroup::new("css/print").with_files(["css/print.1.js", "css/print.2.js", "css/print.3.js"]),
    ]);
    let before_groups = compilation.groups.clone();
    let before_assets = compilation.assets.clone();

    let result = prune(&mut compilation, &PruneConfig::new(["css/app", "css/print"]));

    assert!(result.is_err());
    assert_eq!(compilation.groups, before_groups);
    assert_eq!(compilation.assets, before_assets);
}

#[test]
fn test_missing_target_is_fatal() {
    let mut compilation = compilation_of(vec![js_app()]);

    let err = prune(&mut compilation, &PruneConfig::new(["css/app"])).unwrap_err();
    assert!(matches!(err, ShearsError::MissingGroup(ref name) if name == "css/app"));
}

#[test]
fn test_custom_bounds_admit_three_files() {
    let mut compilation = compilation_of(vec![OutputGroup::new("css/app")
        .with_files(["css/app.css", "css/app.js", "css/app.runtime.js"])
        .with_auxiliary_files(["css/app.js.map"])]);

    let pruner = Pruner::new(&PruneConfig::new(["css/app"]).with_bounds(1, 3)).unwrap();
    let report = pruner.prune(&mut compilation).unwrap();

    assert_eq!(report.removed_count(), 3);
    assert_eq!(compilation.group("css/app").unwrap().files, vec!["css/app.css"]);
}

#[test]
fn test_query_string_code_file() {
    let mut compilation = Compilation::new(
        [EmittedAsset::new("css/app.js", b"".to_vec()), EmittedAsset::new("css/app.js.map", b"{}".to_vec())]
            .into_iter()
            .collect(),
        vec![OutputGroup::new("css/app")
            .with_files(["css/app.js?3c2d1e"])
            .with_auxiliary_files(["css/app.js.map"])],
    );

    let report = prune(&mut compilation, &PruneConfig::new(["css/app"])).unwrap();

    assert_eq!(report.groups[0].removed, vec!["css/app.js?3c2d1e", "css/app.js.map"]);
    assert!(compilation.assets.is_empty());
}

#[test]
fn test_fresh_compilation_per_pass() {
    // Same pruner, two passes, as in a watch session
    let pruner = Pruner::new(&PruneConfig::new(["css/app"])).unwrap();

    for hash in ["aaaa", "bbbb"] {
        let code = format!("css/app.{}.js", hash);
        let mut compilation = compilation_of(vec![
            OutputGroup::new("css/app").with_files([format!("css/app.{}.css", hash), code.clone()]),
        ]);

        let report = pruner.prune(&mut compilation).unwrap();
        assert_eq!(report.groups[0].removed, vec![code]);
    }
}
