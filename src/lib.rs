//! Java-- compiler back end (jmmc)
//!
//! Compiles one Java-- class to Jasmin assembly for the JVM.
//!
//! ## Architecture
//!
//! - **parser**: lexing and parsing of Java-- source into the AST
//! - **symtab**: symbol table built once per class
//! - **review**: semantic passes producing diagnostics and a type side table
//! - **ir**: lowering to typed three-address instructions
//! - **codegen**: Jasmin text generation from IR
//! - **bin**: command-line interface
//!
//! ## Compilation Flow
//!
//! ```text
//! Source → Parser → AST → SymbolTable → Review → IR → Jasmin
//!                                          ↓
//!                                     Diagnostics (stop here if any)
//! ```

pub mod ast;
pub mod parser;
pub mod symtab;
pub mod review;
pub mod ir;
pub mod codegen;
pub mod types;
pub mod error;
pub mod config;
pub mod consts;

pub use config::Config;
pub use error::{Error, Result};
pub use review::Diagnostic;

use ast::Program;
use std::fs;
use std::path::{Path, PathBuf};
use symtab::SymbolTable;

/// Source file extension picked up when compiling a directory
pub const SOURCE_EXTENSION: &str = "jmm";

/// Result of running one class through the pipeline.
///
/// `ir` and `jasmin` are present only when review reported no diagnostics.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub table: SymbolTable,
    pub diagnostics: Vec<Diagnostic>,
    pub ir: Option<ir::ClassUnit>,
    pub jasmin: Option<String>,
}

impl Compilation {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn class_name(&self) -> &str {
        self.table.class_name()
    }

    /// Jasmin text, or `Error::Semantic` when review rejected the class
    pub fn into_jasmin(self) -> Result<String> {
        let count = self.diagnostics.len();
        self.jasmin.ok_or(Error::Semantic { count })
    }
}

/// Run a parsed program through review, IR generation and code generation.
pub fn compile_program(program: &Program, config: &Config) -> Result<Compilation> {
    let table = symtab::build(program);
    let analysis = review::review(program, &table);
    if !analysis.is_ok() {
        log::info!(
            "'{}' rejected with {} diagnostic(s)",
            table.class_name(),
            analysis.diagnostics.len()
        );
        return Ok(Compilation { table, diagnostics: analysis.diagnostics, ir: None, jasmin: None });
    }

    let unit = ir::generate(program, &table, &analysis.types)?;
    let jasmin = codegen::generate(&unit, config)?;
    Ok(Compilation { table, diagnostics: Vec::new(), ir: Some(unit), jasmin: Some(jasmin) })
}

/// Compile Java-- source held in memory
pub fn compile(source: &str, config: &Config) -> Result<Compilation> {
    let program = parser::parse_jmm(source)?;
    compile_program(&program, config)
}

/// Compile one source file, writing `<Class>.j` into `output_dir` on success.
pub fn compile_file(input: &Path, output_dir: &Path, config: &Config) -> Result<Compilation> {
    log::info!("compiling {}", input.display());
    let source = fs::read_to_string(input)?;
    let compilation = compile(&source, config)?;
    if let Some(jasmin) = &compilation.jasmin {
        fs::create_dir_all(output_dir)?;
        let target = output_dir.join(format!("{}.j", compilation.class_name()));
        fs::write(&target, jasmin)?;
        log::info!("wrote {}", target.display());
    }
    Ok(compilation)
}

/// Compile a file, or every `.jmm` file below a directory.
pub fn compile_path(input: &Path, output_dir: &Path, config: &Config) -> Result<Vec<(PathBuf, Compilation)>> {
    if !input.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", input.display()),
        )
        .into());
    }
    if input.is_file() {
        let compilation = compile_file(input, output_dir, config)?;
        return Ok(vec![(input.to_path_buf(), compilation)]);
    }

    let mut sources: Vec<PathBuf> = walkdir::WalkDir::new(input)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == SOURCE_EXTENSION))
        .collect();
    sources.sort();
    log::info!("found {} source file(s) under {}", sources.len(), input.display());

    let mut results = Vec::with_capacity(sources.len());
    for source in sources {
        let compilation = compile_file(&source, output_dir, config)?;
        results.push((source, compilation));
    }
    Ok(results)
}
