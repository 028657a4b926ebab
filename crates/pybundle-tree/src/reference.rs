//! Entry point reference parser
//!
//! Parses references of the form `module.path:callable.attr [extras]` into
//! an [`InvocationDescriptor`]. A leading `import module;` statement is
//! tolerated, as is a callable that repeats its module path.

use crate::errors::ReferenceParseError;
use std::fmt;

/// Separator between the module path and the callable
pub const SEPARATOR: char = ':';

/// Normalized module/callable pair for one entry point
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvocationDescriptor {
    /// Importable module path (e.g., "pkg.sub")
    pub target: String,
    /// Attribute path inside the module (e.g., "main", "App.run")
    pub callable: String,
}

impl InvocationDescriptor {
    /// Python statement that performs the invocation
    pub fn expression(&self) -> String {
        format!(
            "import {target}; {target}.{callable}()",
            target = self.target,
            callable = self.callable
        )
    }
}

impl fmt::Display for InvocationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.target, SEPARATOR, self.callable)
    }
}

/// Parse a raw reference string
pub fn parse_reference(reference: &str) -> Result<InvocationDescriptor, ReferenceParseError> {
    let (imported, body) = strip_import_statement(reference.trim());
    let body = strip_extras(body);

    let (target, callable) = match body.split_once(SEPARATOR) {
        Some((target, callable)) => (target.trim(), callable.trim()),
        // `import pkg; pkg.main()` carries the target in the import statement
        None => match imported.and_then(|module| split_call_expression(module, body)) {
            Some(parts) => parts,
            None => {
                return Err(ReferenceParseError::new(
                    reference,
                    "missing ':' separator",
                ))
            }
        },
    };

    if target.is_empty() {
        return Err(ReferenceParseError::new(reference, "empty module path"));
    }

    let callable = callable
        .strip_prefix(target)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(callable);
    if callable.is_empty() {
        return Err(ReferenceParseError::new(reference, "empty callable"));
    }

    if !is_dotted_name(target) {
        return Err(ReferenceParseError::new(
            reference,
            "module path is not a dotted Python name",
        ));
    }
    if !is_dotted_name(callable) {
        return Err(ReferenceParseError::new(
            reference,
            "callable is not a dotted attribute path",
        ));
    }

    Ok(InvocationDescriptor {
        target: target.to_string(),
        callable: callable.to_string(),
    })
}

/// Split off `import <module>;`, returning the imported module if present
fn strip_import_statement(text: &str) -> (Option<&str>, &str) {
    let Some(rest) = text.strip_prefix("import") else {
        return (None, text);
    };
    if !rest.starts_with(char::is_whitespace) {
        return (None, text);
    }
    match rest.split_once(';') {
        Some((module, tail)) => (Some(module.trim()), tail.trim()),
        None => (None, text),
    }
}

/// Drop a trailing extras marker such as `[cli, gui]`
fn strip_extras(text: &str) -> &str {
    let trimmed = text.trim_end();
    if trimmed.ends_with(']') {
        if let Some(open) = trimmed.rfind('[') {
            return trimmed[..open].trim_end();
        }
    }
    trimmed
}

/// `pkg.mod.main()` with imported module `pkg.mod` -> (`pkg.mod`, `main`)
fn split_call_expression<'a>(module: &'a str, body: &'a str) -> Option<(&'a str, &'a str)> {
    let call = body.trim().trim_end_matches(';').trim_end();
    let call = call.strip_suffix("()").unwrap_or(call);
    let callable = call.strip_prefix(module)?.strip_prefix('.')?;
    Some((module, callable.trim()))
}

fn is_dotted_name(text: &str) -> bool {
    text.split('.').all(|segment| {
        let mut chars = segment.chars();
        chars
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
            && chars.all(|c| c.is_alphanumeric() || c == '_')
    })
}

#[cfg(test)]
mod tests {
    use crate::reference::*;

    fn parsed(reference: &str) -> InvocationDescriptor {
        match parse_reference(reference) {
            Ok(descriptor) => descriptor,
            Err(e) => panic!("'{}' should parse: {}", reference, e),
        }
    }

    #[test]
    fn test_parse_module_and_callable() {
        let descriptor = parsed("pkg.sub:call");
        assert_eq!(descriptor.target, "pkg.sub");
        assert_eq!(descriptor.callable, "call");
        assert_eq!(descriptor.to_string(), "pkg.sub:call");
    }

    #[test]
    fn test_missing_separator_fails() {
        let Err(err) = parse_reference("pkgonly") else {
            panic!("reference without separator must fail");
        };
        assert_eq!(err.reference, "pkgonly");
        assert_eq!(err.reason, "missing ':' separator");
    }

    #[test]
    fn test_empty_sides_fail() {
        assert!(parse_reference(":main").is_err());
        assert!(parse_reference("pkg:").is_err());
        assert!(parse_reference("  pkg :  ").is_err());
    }

    #[test]
    fn test_whitespace_and_extras_are_trimmed() {
        let descriptor = parsed("  app.cli : main [rich, color] ");
        assert_eq!(descriptor.target, "app.cli");
        assert_eq!(descriptor.callable, "main");
    }

    #[test]
    fn test_redundant_target_prefix_is_stripped() {
        let descriptor = parsed("pkg.mod:pkg.mod.main");
        assert_eq!(descriptor.callable, "main");

        // A class attribute path is kept as-is
        let descriptor = parsed("pkg.mod:App.run");
        assert_eq!(descriptor.callable, "App.run");
    }

    #[test]
    fn test_import_boilerplate_is_trimmed() {
        let descriptor = parsed("import pkg.mod; pkg.mod:main");
        assert_eq!(descriptor.target, "pkg.mod");
        assert_eq!(descriptor.callable, "main");

        let descriptor = parsed("import pkg.mod; pkg.mod.main()");
        assert_eq!(descriptor.target, "pkg.mod");
        assert_eq!(descriptor.callable, "main");
    }

    #[test]
    fn test_import_prefixed_module_name_is_not_boilerplate() {
        let descriptor = parsed("importer.cli:main");
        assert_eq!(descriptor.target, "importer.cli");
    }

    #[test]
    fn test_expression_round_trips_through_parser() {
        let descriptor = parsed("fastapi_app.main:serve");
        assert_eq!(
            descriptor.expression(),
            "import fastapi_app.main; fastapi_app.main.serve()"
        );
        assert_eq!(parsed(&descriptor.expression()), descriptor);
    }

    #[test]
    fn test_rejects_non_python_names() {
        assert!(parse_reference("pkg-name:main").is_err());
        assert!(parse_reference("pkg:main()").is_err());
        assert!(parse_reference("pkg..mod:main").is_err());
        assert!(parse_reference("pkg:\"main\"").is_err());
    }
}
