use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_span::SourceType;

use crate::error::NamedExportsError;

/// Source type from the id's extension; virtual ids without one parse as ES modules.
pub fn source_type_for(path: &Path) -> SourceType {
    SourceType::from_path(path).unwrap_or_else(|_| SourceType::mjs())
}

pub fn parse_program<'a>(
    allocator: &'a Allocator,
    source_text: &'a str,
    path: &Path,
) -> Result<Program<'a>, NamedExportsError> {
    let parsed = Parser::new(allocator, source_text, source_type_for(path)).parse();
    if parsed.panicked || !parsed.errors.is_empty() {
        let message = parsed
            .errors
            .iter()
            .map(|e| format!("{e:?}"))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(NamedExportsError::Parse {
            path: path.to_path_buf(),
            message,
        });
    }
    Ok(parsed.program)
}

pub(crate) fn span_text<'s>(source_text: &'s str, start: u32, end: u32) -> &'s str {
    source_text
        .get(start as usize..end as usize)
        .unwrap_or_default()
}
