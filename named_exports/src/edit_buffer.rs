use std::fmt;

use crate::error::NamedExportsError;
use crate::source_map::{MapOptions, MappingsBuilder, SourceMap};

#[derive(Debug, Clone)]
struct Overwrite {
    start: usize,
    end: usize,
    content: String,
}

#[derive(Debug, Clone)]
struct Append {
    index: usize,
    content: String,
}

/// Position-preserving editor over an original source text.
///
/// Offsets are byte offsets into the original. Overwrites may not overlap each
/// other and appends may not land strictly inside an overwritten span. An
/// append at the start of an overwrite is emitted before the replacement, one
/// at its end after it. Appends at the same index keep insertion order.
#[derive(Debug, Clone)]
pub struct EditBuffer<'s> {
    original: &'s str,
    overwrites: Vec<Overwrite>,
    appends: Vec<Append>,
}

impl<'s> EditBuffer<'s> {
    pub fn new(original: &'s str) -> Self {
        Self {
            original,
            overwrites: vec![],
            appends: vec![],
        }
    }

    pub fn original(&self) -> &'s str {
        self.original
    }

    pub fn has_changes(&self) -> bool {
        !self.overwrites.is_empty() || !self.appends.is_empty()
    }

    pub fn overwrite(
        &mut self,
        start: usize,
        end: usize,
        content: impl Into<String>,
    ) -> Result<&mut Self, NamedExportsError> {
        if start >= end || !self.is_boundary(start) || !self.is_boundary(end) {
            return Err(self.out_of_bounds(start, end));
        }
        let overlaps_overwrite = self
            .overwrites
            .iter()
            .any(|it| start < it.end && it.start < end);
        let swallows_append = self
            .appends
            .iter()
            .any(|it| start < it.index && it.index < end);
        if overlaps_overwrite || swallows_append {
            return Err(NamedExportsError::OverlappingEdit { start, end });
        }
        self.overwrites.push(Overwrite {
            start,
            end,
            content: content.into(),
        });
        Ok(self)
    }

    pub fn append_left(
        &mut self,
        index: usize,
        content: impl Into<String>,
    ) -> Result<&mut Self, NamedExportsError> {
        if !self.is_boundary(index) {
            return Err(self.out_of_bounds(index, index));
        }
        if self
            .overwrites
            .iter()
            .any(|it| it.start < index && index < it.end)
        {
            return Err(NamedExportsError::OverlappingEdit {
                start: index,
                end: index,
            });
        }
        self.appends.push(Append {
            index,
            content: content.into(),
        });
        Ok(self)
    }

    pub fn generate_map(&self, options: &MapOptions) -> SourceMap {
        self.render_with_map(options).1
    }

    pub fn render_with_map(&self, options: &MapOptions) -> (String, SourceMap) {
        let assembled = self.assemble(Assembler::new(self.original, Some(options.hires)));
        let code = assembled.code;
        let map = assembled
            .mappings
            .unwrap_or_else(MappingsBuilder::new)
            .finish(options, self.original);
        (code, map)
    }

    fn assemble(&self, mut assembler: Assembler<'s>) -> Assembler<'s> {
        let mut overwrites = self.overwrites.iter().collect::<Vec<_>>();
        overwrites.sort_by_key(|it| it.start);
        let mut appends = self.appends.iter().collect::<Vec<_>>();
        appends.sort_by_key(|it| it.index);
        let mut pending = appends.into_iter().peekable();

        let mut cursor = 0usize;
        for overwrite in overwrites {
            emit_original_with_appends(&mut assembler, cursor, overwrite.start, &mut pending);
            assembler.push_replacement(overwrite.start, &overwrite.content);
            cursor = overwrite.end;
        }
        emit_original_with_appends(&mut assembler, cursor, self.original.len(), &mut pending);
        assembler
    }

    fn is_boundary(&self, index: usize) -> bool {
        index <= self.original.len() && self.original.is_char_boundary(index)
    }

    fn out_of_bounds(&self, start: usize, end: usize) -> NamedExportsError {
        NamedExportsError::EditOutOfBounds {
            start,
            end,
            len: self.original.len(),
        }
    }
}

impl fmt::Display for EditBuffer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assembled = self.assemble(Assembler::new(self.original, None));
        f.write_str(&assembled.code)
    }
}

fn emit_original_with_appends<'s, 'e>(
    assembler: &mut Assembler<'s>,
    from: usize,
    to: usize,
    pending: &mut std::iter::Peekable<std::vec::IntoIter<&'e Append>>,
) {
    let mut at = from;
    while let Some(append) = pending.next_if(|it| it.index <= to) {
        assembler.push_original(at, append.index);
        assembler.push_inserted(&append.content);
        at = append.index;
    }
    assembler.push_original(at, to);
}

struct Assembler<'s> {
    original: &'s str,
    line_starts: Vec<usize>,
    code: String,
    mappings: Option<MappingsBuilder>,
    hires: bool,
}

impl<'s> Assembler<'s> {
    fn new(original: &'s str, hires: Option<bool>) -> Self {
        let line_starts = std::iter::once(0)
            .chain(original.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            original,
            line_starts,
            code: String::with_capacity(original.len()),
            mappings: hires.map(|_| MappingsBuilder::new()),
            hires: hires.unwrap_or(false),
        }
    }

    fn source_position(&self, offset: usize) -> (u32, u32) {
        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        let col = self.original[line_start..offset].encode_utf16().count();
        (line as u32, col as u32)
    }

    fn push_original(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let text = &self.original[start..end];
        self.code.push_str(text);
        let (mut line, mut col) = self.source_position(start);
        let hires = self.hires;
        let Some(mappings) = self.mappings.as_mut() else {
            return;
        };
        let mut needs_mapping = true;
        for ch in text.chars() {
            if ch == '\n' {
                mappings.advance_char(ch);
                line += 1;
                col = 0;
                needs_mapping = true;
                continue;
            }
            if hires || needs_mapping {
                mappings.add_mapping(line, col);
                needs_mapping = false;
            }
            mappings.advance_char(ch);
            col += ch.len_utf16() as u32;
        }
    }

    fn push_replacement(&mut self, original_start: usize, content: &str) {
        self.code.push_str(content);
        let (line, col) = self.source_position(original_start);
        if let Some(mappings) = self.mappings.as_mut() {
            if !content.is_empty() {
                mappings.add_mapping(line, col);
            }
            mappings.advance(content);
        }
    }

    fn push_inserted(&mut self, content: &str) {
        self.code.push_str(content);
        if let Some(mappings) = self.mappings.as_mut() {
            mappings.advance(content);
        }
    }
}
