// Names and limits shared across the pipeline

// Parser: upper bound on tree depth. Statements, parentheses, `!`, and every
// folded binary or postfix operator count one level. Later stages recurse
// over the tree, so this also bounds their stack use.
pub const PARSER_MAX_DEPTH: usize = 100;

// Default `.limit stack` / `.limit locals` values
pub const DEFAULT_LIMIT: u16 = 99;

// Entry point; implicitly static and exempt from the single-return rule
pub const MAIN_METHOD: &str = "main";

// Reserved member name (array length) that user declarations may not take
pub const LENGTH: &str = "length";

pub const THIS: &str = "this";

pub const INIT: &str = "<init>";

pub const OBJECT_CLASS: &str = "java/lang/Object";

// Well-known simple names from java.lang that map to java/lang/* in descriptors
pub const JAVA_LANG_SIMPLE_TYPES: &[&str] = &[
    "String", "Object", "Integer", "Boolean", "Math", "System",
];

// Prefix of compiler-generated temporaries; not a legal identifier start
pub const TEMP_PREFIX: char = '$';
