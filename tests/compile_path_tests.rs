mod common;

use jmmc::{compile_path, Config, Error};
use std::fs;
use tempfile::TempDir;

#[test]
fn directory_compiles_valid_files_only() {
    common::init_logger();
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(src.path().join("a.jmm"), "class A { int x; public int get() { return x; } }").unwrap();
    fs::write(src.path().join("b.jmm"), "class B { public int f() { return true; } }").unwrap();
    fs::write(src.path().join("notes.txt"), "class C { }").unwrap();

    let results = compile_path(src.path(), out.path(), &Config::default()).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].1.is_ok());
    assert!(!results[1].1.is_ok());

    let written = fs::read_to_string(out.path().join("A.j")).unwrap();
    assert!(written.starts_with(".class public A\n.super java/lang/Object\n"));
    assert!(!out.path().join("B.j").exists());
    assert!(!out.path().join("C.j").exists());
}

#[test]
fn single_file_names_output_after_class() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let input = src.path().join("whatever.jmm");
    fs::write(&input, "import io; class Hello { public static void main(String[] args) { io.println(7); } }").unwrap();

    let results = compile_path(&input, &out.path().join("nested"), &Config::default()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].1.class_name(), "Hello");
    assert!(out.path().join("nested").join("Hello.j").is_file());
}

#[test]
fn syntax_errors_abort_with_parse_error() {
    let src = TempDir::new().unwrap();
    let input = src.path().join("bad.jmm");
    fs::write(&input, "class { }").unwrap();
    let err = compile_path(&input, src.path(), &Config::default()).unwrap_err();
    assert!(matches!(err, Error::Parse { line: 1, .. }), "{err:?}");
}

#[test]
fn missing_input_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = compile_path(&dir.path().join("nope.jmm"), dir.path(), &Config::default()).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "{err:?}");
}
