use std::path::Path;

use crate::error::NamedExportsError;
use crate::filter::IdFilter;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn default_filter_skips_node_modules_virtual_and_relative_ids() {
    let filter = IdFilter::new(Path::new("/project"), &[], &[]).expect("filter");

    assert!(filter.is_eligible("/project/src/main.js"));
    assert!(!filter.is_eligible("/project/node_modules/lib/index.js"));
    assert!(!filter.is_eligible("\0virtual:helpers"));
    assert!(!filter.is_eligible("/project/src/dep.js?commonjs-proxy"));
    assert!(!filter.is_eligible("src/main.js"));
}

#[test]
fn include_globs_match_root_relative_paths() {
    let filter =
        IdFilter::new(Path::new("/project"), &strings(&["src/**/*.js"]), &[]).expect("filter");

    assert!(filter.is_eligible("/project/src/app/main.js"));
    assert!(!filter.is_eligible("/project/scripts/build.js"));
    assert!(!filter.is_eligible("/elsewhere/src/main.ts"));
}

#[test]
fn explicit_exclude_replaces_the_default() {
    let filter = IdFilter::new(Path::new("/project"), &[], &strings(&["**/*.spec.js"]))
        .expect("filter");

    assert!(!filter.is_eligible("/project/src/main.spec.js"));
    assert!(filter.is_eligible("/project/node_modules/lib/index.js"));
}

#[test]
fn invalid_globs_are_reported() {
    let err = IdFilter::new(Path::new("/project"), &strings(&["src/[abc"]), &[])
        .expect_err("invalid glob");
    assert!(matches!(err, NamedExportsError::InvalidGlob { .. }));
}
