use std::collections::BTreeMap;
use std::error::Error;
use std::fs;

use devloop::config::{load_from_path, load_or_default, validate_config, BuildSection, ConfigFile};
use devloop::resolve_rebuild_cmd;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn defaults_reproduce_the_classic_loop() -> TestResult {
    let cfg = ConfigFile::default();

    assert_eq!(cfg.build.cmd, "zig build");
    assert_eq!(cfg.build.cooldown, "1s");
    assert_eq!(cfg.serve.cmd, "python3 -m http.server -d zig-out");
    assert_eq!(cfg.watch.path, "src");
    assert!(cfg.overrides.is_empty());

    validate_config(&cfg)?;
    Ok(())
}

#[test]
fn missing_config_file_falls_back_to_defaults() -> TestResult {
    let dir = tempfile::tempdir()?;
    let cfg = load_or_default(dir.path().join("Devloop.toml"))?;

    assert_eq!(cfg.build.cmd, "zig build");
    Ok(())
}

#[test]
fn full_config_parses() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("Devloop.toml");
    fs::write(
        &path,
        r#"
[build]
cmd = "zig build"
mode = "dev"
cooldown = "250ms"

[build.modes]
dev = "zig build -Ddev=true"
update = "zig build -Dupdate=true"

[serve]
cmd = "python3 -m http.server -d zig-out"
ready_pattern = "Serving HTTP"

[watch]
path = "src"
exclude = ["**/*.tmp"]

[[override]]
target = "zig-out/zjb_extract.js"
source = "static/dev/zjb_extract.js"
"#,
    )?;

    let cfg = load_from_path(&path)?;
    validate_config(&cfg)?;

    assert_eq!(cfg.build.mode.as_deref(), Some("dev"));
    assert_eq!(cfg.build.modes.len(), 2);
    assert_eq!(cfg.serve.ready_pattern.as_deref(), Some("Serving HTTP"));
    assert_eq!(cfg.watch.exclude, vec!["**/*.tmp".to_string()]);
    assert_eq!(cfg.overrides.len(), 1);
    assert_eq!(cfg.overrides[0].target, "zig-out/zjb_extract.js");
    Ok(())
}

#[test]
fn unknown_configured_mode_is_rejected() {
    let mut cfg = ConfigFile::default();
    cfg.build.mode = Some("dev".into());

    assert!(validate_config(&cfg).is_err());
}

#[test]
fn bad_cooldown_is_rejected() {
    let mut cfg = ConfigFile::default();
    cfg.build.cooldown = "fast".into();

    assert!(validate_config(&cfg).is_err());
}

#[test]
fn empty_build_cmd_is_rejected() {
    let mut cfg = ConfigFile::default();
    cfg.build.cmd = "  ".into();

    assert!(validate_config(&cfg).is_err());
}

#[test]
fn bad_ready_pattern_is_rejected() {
    let mut cfg = ConfigFile::default();
    cfg.serve.ready_pattern = Some("(".into());

    assert!(validate_config(&cfg).is_err());
}

#[test]
fn absolute_watch_path_is_rejected() {
    let mut cfg = ConfigFile::default();
    cfg.watch.path = "/srv/src".into();

    assert!(validate_config(&cfg).is_err());
}

fn build_with_modes() -> BuildSection {
    let mut modes = BTreeMap::new();
    modes.insert("dev".to_string(), "zig build -Ddev=true".to_string());
    modes.insert("update".to_string(), "zig build -Dupdate=true".to_string());

    BuildSection {
        cmd: "zig build".into(),
        mode: Some("dev".into()),
        modes,
        cooldown: "1s".into(),
    }
}

#[test]
fn rebuild_cmd_uses_configured_mode() -> TestResult {
    let build = build_with_modes();
    assert_eq!(resolve_rebuild_cmd(&build, None)?, "zig build -Ddev=true");
    Ok(())
}

#[test]
fn cli_mode_overrides_configured_mode() -> TestResult {
    let build = build_with_modes();
    assert_eq!(
        resolve_rebuild_cmd(&build, Some("update"))?,
        "zig build -Dupdate=true"
    );
    Ok(())
}

#[test]
fn no_mode_reuses_the_full_build_cmd() -> TestResult {
    let mut build = build_with_modes();
    build.mode = None;
    assert_eq!(resolve_rebuild_cmd(&build, None)?, "zig build");
    Ok(())
}

#[test]
fn unknown_cli_mode_is_an_error() {
    let build = build_with_modes();
    assert!(resolve_rebuild_cmd(&build, Some("release")).is_err());
}
