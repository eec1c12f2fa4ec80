//! Integration tests for the tokenforge binary: clean + build runs
#![allow(deprecated)] // Command::cargo_bin is deprecated but still functional

mod utils;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use utils::{fixture_workspace, snapshot, write_tokens};

fn tokenforge(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("tokenforge").unwrap();
    cmd.current_dir(dir);
    cmd
}

const CATEGORIZED_FILES: &[&str] = &[
    "build/compose/color/Colors.kt",
    "build/compose/spacing/Spacing.kt",
    "build/compose/sizing/Sizing.kt",
    "build/compose/spaces/Spaces.kt",
    "build/compose/borderRadius/BorderRadius.kt",
    "build/compose/typography/Typography.kt",
    "build/compose/strokesAndShadows/StrokesAndShadows.kt",
    "build/ios/color/Colors.swift",
    "build/ios/spacing/Spacing.swift",
    "build/ios/sizing/Sizing.swift",
    "build/ios/spaces/Spaces.swift",
    "build/ios/borderRadius/BorderRadius.swift",
    "build/ios/typography/Typography.swift",
    "build/ios/strokesAndShadows/StrokesAndShadows.swift",
];

#[test]
fn test_build_generates_one_file_per_category_and_platform() {
    let dir = fixture_workspace();

    tokenforge(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("compose_color"))
        .stdout(predicate::str::contains("✔︎ build/compose/color/Colors.kt"))
        .stdout(predicate::str::contains("✔︎ build/ios/typography/Typography.swift"));

    for file in CATEGORIZED_FILES {
        assert!(dir.path().join(file).is_file(), "missing {}", file);
    }
    assert_eq!(snapshot(&dir.path().join("build")).len(), CATEGORIZED_FILES.len());
}

#[test]
fn test_compose_colors_content() {
    let dir = fixture_workspace();
    tokenforge(dir.path()).assert().success();

    let colors = fs::read_to_string(dir.path().join("build/compose/color/Colors.kt")).unwrap();
    assert!(colors.starts_with("// Do not edit directly, this file was auto-generated.\n"));
    assert!(colors.contains("package com.test\n"));
    assert!(colors.contains("object Colors {\n"));
    assert!(colors.contains("  /** Error and destructive actions */\n  val colorsRed = Color(0xFFE53935)\n"));
    assert!(colors.contains("  val colorsScrim = Color(0x80000000)\n"));
    assert!(colors.contains("  val colorsDanger = colorsRed\n"));
    // Only color tokens
    assert!(!colors.contains("spaceBase"));
}

#[test]
fn test_swift_colors_content() {
    let dir = fixture_workspace();
    tokenforge(dir.path()).assert().success();

    let colors = fs::read_to_string(dir.path().join("build/ios/color/Colors.swift")).unwrap();
    assert!(colors.contains("// Colors.swift\n"));
    assert!(colors.contains("import UIKit\n"));
    assert!(colors.contains("public enum Colors {\n"));
    assert!(colors.contains(
        "    public static let colorsBlue = UIColor(red: 0.118, green: 0.533, blue: 0.898, alpha: 1)\n"
    ));
    assert!(!colors.contains("package"));
}

#[test]
fn test_categories_receive_their_kinds() {
    let dir = fixture_workspace();
    tokenforge(dir.path()).assert().success();
    let read = |path: &str| fs::read_to_string(dir.path().join(path)).unwrap();

    let spacing = read("build/compose/spacing/Spacing.kt");
    assert!(spacing.contains("val spaceBase = 4.dp"));
    assert!(spacing.contains("val spaceMd = 16.dp"));

    let spaces = read("build/compose/spaces/Spaces.kt");
    assert!(spaces.contains("val dimensionGutter = 16.dp"));
    assert!(spaces.contains("val dimensionColumns = 12"));
    assert!(!spaces.contains("spaceBase"));

    let strokes = read("build/compose/strokesAndShadows/StrokesAndShadows.kt");
    assert!(strokes.contains("val strokeDividerColor = Color(0xFF1E88E5)"));
    assert!(strokes.contains("val strokeDividerWidth = 1.dp"));
    assert!(strokes.contains("val strokeCardY = 2.dp"));
    assert!(strokes.contains("val strokeDisabled = 0.4f"));
}

#[test]
fn test_typography_shorthand_on_compose_expanded_on_ios() {
    let dir = fixture_workspace();
    tokenforge(dir.path()).assert().success();

    let compose =
        fs::read_to_string(dir.path().join("build/compose/typography/Typography.kt")).unwrap();
    assert!(compose.contains(
        "val textBody = TextStyle(fontSize = 16.sp, fontWeight = FontWeight(700), lineHeight = 24.sp, letterSpacing = 0.sp)"
    ));
    assert!(compose.contains("val textCase = \"uppercase\""));
    assert!(compose.contains("val textLink = \"underline\""));

    let ios =
        fs::read_to_string(dir.path().join("build/ios/typography/Typography.swift")).unwrap();
    assert!(ios.contains("public static let textBodyFontFamily = \"Inter\""));
    assert!(ios.contains("public static let textBodyFontWeight = UIFont.Weight.bold"));
    assert!(ios.contains("public static let textBodyFontSize = CGFloat(16)"));
    assert!(!ios.contains("TextStyle"));
}

#[test]
fn test_regeneration_is_byte_identical() {
    let dir = fixture_workspace();
    tokenforge(dir.path()).assert().success();
    let first = snapshot(&dir.path().join("build"));

    tokenforge(dir.path()).assert().success();
    let second = snapshot(&dir.path().join("build"));

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_clean_only_twice_is_idempotent() {
    let dir = fixture_workspace();
    tokenforge(dir.path()).assert().success();

    tokenforge(dir.path())
        .arg("--clean-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned 14 generated files"));
    for file in CATEGORIZED_FILES {
        assert!(!dir.path().join(file).exists(), "{} survived clean", file);
    }

    tokenforge(dir.path())
        .arg("--clean-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaned").not());
}

#[test]
fn test_clean_keeps_unrelated_files() {
    let dir = fixture_workspace();
    tokenforge(dir.path()).assert().success();
    let handwritten = dir.path().join("build/compose/color/Extensions.kt");
    fs::write(&handwritten, "// mine").unwrap();

    tokenforge(dir.path()).arg("--clean-only").assert().success();
    assert!(handwritten.exists());
}

#[test]
fn test_omit_removes_exactly_two_outputs() {
    let dir = fixture_workspace();
    tokenforge(dir.path())
        .args(["--omit", "spaces"])
        .assert()
        .success();

    let files = snapshot(&dir.path().join("build"));
    assert_eq!(files.len(), CATEGORIZED_FILES.len() - 2);
    assert!(!dir.path().join("build/compose/spaces").exists());
    assert!(!dir.path().join("build/ios/spaces").exists());
    assert!(dir.path().join("build/compose/spacing/Spacing.kt").exists());
}

#[test]
fn test_omit_unknown_category_fails() {
    let dir = fixture_workspace();
    tokenforge(dir.path())
        .args(["--omit", "gradients"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category 'gradients'"));
}

#[test]
fn test_single_profile_writes_one_compose_object() {
    let dir = fixture_workspace();
    tokenforge(dir.path())
        .args(["--profile", "single"])
        .assert()
        .success()
        .stdout(predicate::str::contains("✔︎ build/compose/DesignTokens.kt"));

    let files = snapshot(&dir.path().join("build"));
    assert_eq!(files.len(), 1);
    let tokens =
        fs::read_to_string(dir.path().join("build/compose/DesignTokens.kt")).unwrap();
    assert!(tokens.contains("object DesignTokens {"));
    assert!(tokens.contains("val colorsRed = Color(0xFFE53935)"));
    assert!(tokens.contains("val fontFamily = \"Inter\""));
}

#[test]
fn test_extended_profile_adds_font_categories() {
    let dir = fixture_workspace();
    tokenforge(dir.path())
        .args(["--profile", "extended"])
        .assert()
        .success();

    let families =
        fs::read_to_string(dir.path().join("build/ios/fontFamilies/FontFamilies.swift")).unwrap();
    assert!(families.contains("public static let fontFamily = \"Inter\""));
    assert!(dir.path().join("build/compose/spaces/Spaces.kt").exists());
}

#[test]
fn test_config_file_is_picked_up() {
    let dir = fixture_workspace();
    fs::write(
        dir.path().join("tokenforge.toml"),
        r#"
        build_root = "generated"

        [compose]
        package_name = "com.example.tokens"
        "#,
    )
    .unwrap();

    tokenforge(dir.path()).assert().success();
    let colors =
        fs::read_to_string(dir.path().join("generated/compose/color/Colors.kt")).unwrap();
    assert!(colors.contains("package com.example.tokens\n"));
    assert!(!dir.path().join("build").exists());
}

#[test]
fn test_invalid_config_fails() {
    let dir = fixture_workspace();
    fs::write(dir.path().join("tokenforge.toml"), "profile = \"everything\"").unwrap();
    tokenforge(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn test_unresolved_reference_fails_run() {
    let dir = fixture_workspace();
    write_tokens(
        dir.path(),
        "broken.json",
        r#"{ "oops": { "value": "{colors.missing}", "type": "color" } }"#,
    );

    tokenforge(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not resolve"));
    assert!(!dir.path().join("build").exists());
}

#[test]
fn test_missing_sources_fail_run() {
    let dir = tempfile::TempDir::new().unwrap();
    tokenforge(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No token files matched"));
}

#[test]
fn test_custom_source_glob() {
    let dir = tempfile::TempDir::new().unwrap();
    let design = dir.path().join("design");
    fs::create_dir_all(&design).unwrap();
    fs::write(
        design.join("brand.json"),
        r##"{ "brand": { "value": "#000000", "type": "color" } }"##,
    )
    .unwrap();

    tokenforge(dir.path())
        .args(["--source", "design/*.json"])
        .assert()
        .success();
    let colors = fs::read_to_string(dir.path().join("build/compose/color/Colors.kt")).unwrap();
    assert!(colors.contains("val brand = Color(0xFF000000)"));
}

#[test]
fn test_json_summary() {
    let dir = fixture_workspace();
    let output = tokenforge(dir.path())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["format"], "tokenforge-json-v1");
    let platforms = parsed["built"]["platforms"].as_array().unwrap();
    assert_eq!(platforms.len(), CATEGORIZED_FILES.len());
    assert_eq!(platforms[0]["platform"], "compose_borderRadius");
}

#[test]
fn test_list_targets_touches_nothing() {
    let dir = fixture_workspace();
    let output = tokenforge(dir.path())
        .arg("--list-targets")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), CATEGORIZED_FILES.len());
    assert!(stdout.contains("build/ios/spaces/Spaces.swift"));
    assert!(stdout.contains("filterByType_strokesAndShadows"));
    assert!(!dir.path().join("build").exists());
}
