// Common test utilities
#![allow(dead_code)]

use jmmc::ast::Program;
use jmmc::ir::ClassUnit;
use jmmc::review::{Analysis, ReviewError};
use jmmc::symtab::SymbolTable;
use jmmc::Config;

/// Route `log` output through the test harness
pub fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

/// Parse, build the symbol table and review `src`
pub fn analyze_src(src: &str) -> (Program, SymbolTable, Analysis) {
    init_logger();
    let program = jmmc::parser::parse_jmm(src).expect("test source should parse");
    let table = jmmc::symtab::build(&program);
    let analysis = jmmc::review::review(&program, &table);
    (program, table, analysis)
}

pub fn assert_no_errors(src: &str) {
    let (_, _, analysis) = analyze_src(src);
    assert!(analysis.is_ok(), "unexpected diagnostics: {:#?}", analysis.diagnostics);
}

/// Diagnostic kinds reported for `src`, in report order
pub fn kinds(src: &str) -> Vec<ReviewError> {
    analyze_src(src).2.diagnostics.into_iter().map(|d| d.kind).collect()
}

pub fn ir(src: &str) -> ClassUnit {
    assert_no_errors(src);
    jmmc::compile(src, &Config::default()).expect("compile").ir.expect("ir")
}

pub fn jasmin(src: &str) -> String {
    init_logger();
    jmmc::compile(src, &Config::default()).expect("compile").into_jasmin().expect("jasmin")
}

/// Instruction lines of method `name`, trimmed, without directives
pub fn method_body(jasmin: &str, name: &str) -> Vec<String> {
    let header = format!(" {}(", name);
    let mut lines = jasmin.lines().skip_while(|l| !(l.starts_with(".method") && l.contains(&header)));
    lines.next();
    lines
        .take_while(|l| *l != ".end method")
        .map(str::trim)
        .filter(|l| !l.starts_with(".limit"))
        .map(str::to_string)
        .collect()
}
