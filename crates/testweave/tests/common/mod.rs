#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use testweave::case::CaseResult;
use testweave::{fail, skip};

pub fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "").unwrap();
}

pub fn tree(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in files {
        touch(dir.path(), file);
    }
    dir
}

pub fn pass() -> CaseResult {
    Ok(())
}

pub fn failing() -> CaseResult {
    fail("1 != 2")
}

pub fn flaky() -> CaseResult {
    skip("flaky")
}

pub fn slow() -> CaseResult {
    skip("slow")
}
