use shears::core::interfaces::BuildService;
use shears::core::models::{BuildConfig, BuildMode, PruneConfig};
use shears::core::services::FinalizeService;
use shears::infrastructure::TokioFileSystemService;
use shears::plugins::CompletionPlugin;
use shears::ShearsError;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

const STATS: &str = r#"{
  "groups": [
    {
      "name": "js/app",
      "files": ["js/app.9f8e7d6c.js"],
      "auxiliaryFiles": ["js/app.9f8e7d6c.js.map"]
    },
    {
      "name": "css/app",
      "files": ["css/app.a1b2c3d4.css", "css/app.a1b2c3d4.js"],
      "auxiliaryFiles": ["css/app.a1b2c3d4.js.map"]
    }
  ]
}"#;

/// Lay out a bundler output directory plus its stats file
fn write_fixture(root: &Path, stats: &str) {
    let outdir = root.join("public/build");
    let files = [
        ("js/app.9f8e7d6c.js", "console.log('app');"),
        ("js/app.9f8e7d6c.js.map", "{\"version\":3}"),
        ("css/app.a1b2c3d4.css", "body{color:red}"),
        ("css/app.a1b2c3d4.js", ""),
        ("css/app.a1b2c3d4.js.map", "{\"version\":3}"),
        ("images/logo.5e6f7a8b.png", "PNG"),
    ];
    for (name, content) in files {
        let path = outdir.join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }
    std::fs::write(root.join("build-stats.json"), stats).unwrap();
}

fn config_for(root: &Path, targets: &[&str]) -> BuildConfig {
    BuildConfig {
        root: root.to_path_buf(),
        outdir: root.join("public/build"),
        stats: root.join("build-stats.json"),
        prune: PruneConfig::new(targets.iter().copied()),
        ..Default::default()
    }
}

fn read_manifest(outdir: &Path) -> BTreeMap<String, String> {
    let content = std::fs::read_to_string(outdir.join("manifest.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_finalize_prunes_and_writes_manifest() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    write_fixture(root, STATS);
    let config = config_for(root, &["css/app"]);

    let mut service = FinalizeService::from_config(Arc::new(TokioFileSystemService), &config).unwrap();
    let result = service.build(&config).await.unwrap();

    assert!(result.success);
    assert_eq!(result.pruned.removed_count(), 2);
    assert_eq!(result.deleted_files.len(), 2);

    let outdir = &config.outdir;
    assert!(!outdir.join("css/app.a1b2c3d4.js").exists());
    assert!(!outdir.join("css/app.a1b2c3d4.js.map").exists());
    assert!(outdir.join("css/app.a1b2c3d4.css").exists());
    assert!(outdir.join("js/app.9f8e7d6c.js").exists());

    let manifest = read_manifest(outdir);
    assert_eq!(manifest["build/css/app.css"], "/build/css/app.a1b2c3d4.css");
    assert_eq!(manifest["build/js/app.js"], "/build/js/app.9f8e7d6c.js");
    assert_eq!(manifest["build/js/app.js.map"], "/build/js/app.9f8e7d6c.js.map");
    assert_eq!(manifest["build/images/logo.5e6f7a8b.png"], "/build/images/logo.5e6f7a8b.png");
    assert!(!manifest.contains_key("build/css/app.js"));
    assert!(!manifest.values().any(|v| v.contains("css/app.a1b2c3d4.js")));

    // Four kept assets plus the manifest
    assert_eq!(result.output_files.len(), 5);
}

#[tokio::test]
async fn test_completion_message_counts_final_assets() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    write_fixture(root, STATS);
    let mut config = config_for(root, &["css/app"]);
    config.mode = BuildMode::Development;

    let reporter = Arc::new(CompletionPlugin::new(config.relative_outdir()).quiet());
    let mut service = FinalizeService::from_config(Arc::new(TokioFileSystemService), &config)
        .unwrap()
        .with_plugin(reporter.clone());

    service.build(&config).await.unwrap();
    assert_eq!(reporter.messages(), vec!["5 files written to public/build"]);

    // A rebuild overwrites the message rather than appending
    std::fs::write(config.outdir.join("images/extra.1234.png"), "PNG").unwrap();
    std::fs::write(config.outdir.join("css/app.a1b2c3d4.js"), "").unwrap();
    service.build(&config).await.unwrap();
    assert_eq!(reporter.messages(), vec!["6 files written to public/build"]);
}

#[tokio::test]
async fn test_failed_prune_writes_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    let stats = r#"{"groups":[{"name":"css/app","files":["css/app.a1b2c3d4.css"]}]}"#;
    write_fixture(root, stats);
    let config = config_for(root, &["css/app"]);

    let mut service = FinalizeService::from_config(Arc::new(TokioFileSystemService), &config).unwrap();
    let err = service.build(&config).await.unwrap_err();

    assert!(matches!(err, ShearsError::Prune { .. }));
    assert!(!config.outdir.join("manifest.json").exists());
    // Cleanup did not run either
    assert!(config.outdir.join("css/app.a1b2c3d4.js").exists());
}

#[tokio::test]
async fn test_missing_stats_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = config_for(temp_dir.path(), &["css/app"]);

    let mut service = FinalizeService::from_config(Arc::new(TokioFileSystemService), &config).unwrap();
    let err = service.build(&config).await.unwrap_err();

    assert!(matches!(err, ShearsError::Stats(_)));
}

#[tokio::test]
async fn test_no_clean_keeps_pruned_files_on_disk() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    write_fixture(root, STATS);
    let mut config = config_for(root, &["css/app"]);
    config.clean = false;

    let mut service = FinalizeService::from_config(Arc::new(TokioFileSystemService), &config).unwrap();
    let result = service.build(&config).await.unwrap();

    assert!(result.deleted_files.is_empty());
    assert!(config.outdir.join("css/app.a1b2c3d4.js").exists());

    // Still pruned from the manifest
    let manifest = read_manifest(&config.outdir);
    assert!(!manifest.contains_key("build/css/app.js"));
}

#[tokio::test]
async fn test_stats_file_inside_outdir_is_not_an_asset() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    write_fixture(root, STATS);
    let mut config = config_for(root, &["css/app"]);
    config.stats = config.outdir.join("stats.json");
    std::fs::write(&config.stats, STATS).unwrap();

    let mut service = FinalizeService::from_config(Arc::new(TokioFileSystemService), &config).unwrap();
    service.build(&config).await.unwrap();

    assert!(config.stats.exists());
    let manifest = read_manifest(&config.outdir);
    assert!(!manifest.contains_key("build/stats.json"));
}
