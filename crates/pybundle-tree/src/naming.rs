//! Naming utilities for converting entry point names between case conventions
//!
//! Three forms are derived from one source name:
//! - display: `foo-bar-baz` (CLI-facing)
//! - identifier: `FooBarBaz` (generated type names)
//! - module: `foo_bar_baz` (file, directory and import path segments)
//!
//! Space, `-` and `_` separate words. Any other character that is not ASCII
//! alphanumeric also separates words, so every form stays a valid CLI token
//! or Rust identifier.

use sha2::{Digest, Sha256};

/// Names a generated module can never take without disambiguation
const RESERVED_MODULES: &[&str] = &["root", "bootstrap", "main"];

/// Rust keywords (strict and reserved) that cannot be module names
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub",
    "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Prelude names used unqualified in generated command bodies
const PRELUDE_IDENTIFIERS: &[&str] = &[
    "Box", "Clone", "Copy", "Default", "Drop", "Err", "Fn", "FnMut", "FnOnce", "From", "Into",
    "IntoIterator", "Iterator", "None", "Ok", "Option", "Result", "Send", "Sized", "Some",
    "String", "Sync", "ToOwned", "ToString", "TryFrom", "TryInto", "Vec",
];

/// Hex digits of the path hash tried in order when disambiguating
pub const HASH_WIDTHS: &[usize] = &[8, 16, 64];

fn words(source: &str) -> impl Iterator<Item = &str> {
    source
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
}

/// Convert a name to its CLI display form
///
/// - `Foo_Bar Baz` -> `foo-bar-baz`
/// - `serve` -> `serve`
pub fn to_display(source: &str) -> String {
    words(source)
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Convert a name to a Pascal-case identifier
///
/// Only the first character of each word changes case:
/// - `foo_bar baz` -> `FooBarBaz`
/// - `runHTTP-server` -> `RunHTTPServer`
///
/// `Self` and prelude names such as `Result` get a `Cmd` suffix.
pub fn to_identifier(source: &str) -> String {
    let ident: String = words(source)
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();

    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("Cmd{}", ident)
    } else if ident == "Self" || PRELUDE_IDENTIFIERS.contains(&ident.as_str()) {
        format!("{}Cmd", ident)
    } else {
        ident
    }
}

/// Convert a name to its module form
///
/// - `Foo Bar` -> `foo_bar`
/// - `2fa` -> `cmd_2fa`
pub fn to_module(source: &str) -> String {
    let module = words(source)
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_");

    if module.starts_with(|c: char| c.is_ascii_digit()) {
        format!("cmd_{}", module)
    } else {
        module
    }
}

/// Check whether a module name needs disambiguation regardless of collisions
pub fn is_reserved_module(module: &str) -> bool {
    RESERVED_MODULES.contains(&module) || RUST_KEYWORDS.contains(&module)
}

/// Stable hex digest of a dotted command path
pub fn path_hash(dotted_path: &str) -> String {
    hex::encode(Sha256::digest(dotted_path.as_bytes()))
}

/// Append a path-derived suffix: `hello` + `scripts.hello` -> `hello_<hash prefix>`
///
/// `width` is the number of hex digits kept from [`path_hash`].
pub fn disambiguate(base: &str, dotted_path: &str, width: usize) -> String {
    let hash = path_hash(dotted_path);
    let width = width.min(hash.len());
    format!("{}_{}", base, &hash[..width])
}
