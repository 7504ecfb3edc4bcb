//! Shared machinery for the line oriented mesh readers.
//!
//! Most of the time you will not need to interact with this module directly, use
//! [`read_mesh`](crate::read_mesh) or the [`MeshFormat`](crate::MeshFormat) implementations
//! instead. The error types are public so that callers can match on them.

mod error;

pub use error::{
    DuplicateSection, ElementArity, IndexOutOfRange, InvalidToken, Location, MalformedHeader, MissingSection,
    ParseError, Section, TruncatedFile, UnexpectedTagCount, UnsupportedFormatVersion, Warning,
};

use crate::prelude::*;
use crate::mesh::InvalidElementArity;

use std::str::FromStr;

/// The result of successfully reading a mesh file: the mesh itself and whatever
/// tolerated anomalies were found along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub mesh: Mesh,
    pub warnings: Vec<Warning>,
}

impl Parsed {
    pub(crate) fn new(mesh: Mesh, warnings: Vec<Warning>) -> Self {
        Self { mesh, warnings }
    }
}

/// Line iterator that remembers which file it reads and how far it got, so that errors
/// can point at the offending line.
pub(crate) struct LineReader<R> {
    lines: std::io::Lines<R>,
    file: String,
    line_number: usize,
}

impl<R: BufRead> LineReader<R> {
    pub(crate) fn new<T: Into<String>>(reader: R, file: T) -> Self {
        Self {
            lines: reader.lines(),
            file: file.into(),
            line_number: 0,
        }
    }

    /// the next line of the file, `None` at EOF
    pub(crate) fn next_line(&mut self) -> Result<Option<String>, std::io::Error> {
        match self.lines.next() {
            Some(line) => {
                self.line_number += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    /// the next line that contains anything other than whitespace, `None` at EOF
    pub(crate) fn next_nonblank(&mut self) -> Result<Option<String>, std::io::Error> {
        while let Some(line) = self.next_line()? {
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }

        Ok(None)
    }

    /// Read line `found` (0-based) of a section that promised `expected` lines.
    /// Running out of file is a [`TruncatedFile`] error.
    pub(crate) fn section_line(
        &mut self,
        section: Section,
        expected: usize,
        found: usize,
    ) -> Result<String, Error> {
        match self.next_line()? {
            Some(line) => Ok(line),
            None => {
                let truncated = TruncatedFile::new(self.eof_location(), section, expected, found);
                Err(ParseError::from(truncated).into())
            }
        }
    }

    /// location of the most recently read line
    pub(crate) fn location(&self) -> Location {
        Location::new(self.file.clone(), self.line_number)
    }

    /// location one past the last line of the file
    pub(crate) fn eof_location(&self) -> Location {
        Location::new(self.file.clone(), self.line_number + 1)
    }

    pub(crate) fn file(&self) -> &str {
        &self.file
    }
}

/// upper bound on rows reserved up front from a count the file declares
pub(crate) const PREALLOCATED_ROWS: usize = 1 << 16;

/// capacity to reserve for a section that declares `count` rows. The rest grows as lines
/// are actually read, so a lying header ends in `TruncatedFile` instead of a huge allocation
pub(crate) fn preallocated(count: usize) -> usize {
    count.min(PREALLOCATED_ROWS)
}

/// stack coordinate rows read one line at a time into an `(n, 3)` array
pub(crate) fn node_array(rows: &[[f64; 3]]) -> Array2<f64> {
    Array2::from_shape_fn((rows.len(), 3), |(i, j)| rows[i][j])
}

/// parse a single whitespace separated token
pub(crate) fn parse_token<T: FromStr>(
    token: &str,
    location: &Location,
    section: Section,
    expected: &'static str,
) -> Result<T, ParseError> {
    token
        .parse()
        .map_err(|_| InvalidToken::new(location.clone(), section, expected, token.into()).into())
}

/// parse three coordinates from exactly three tokens
pub(crate) fn parse_coordinates(
    tokens: &[&str],
    location: &Location,
) -> Result<[f64; 3], ParseError> {
    if tokens.len() != 3 {
        let found = tokens.join(" ");
        return Err(InvalidToken::new(location.clone(), Section::Nodes, "3 coordinates", found).into());
    }

    let mut coordinates = [0.0; 3];
    for (slot, token) in coordinates.iter_mut().zip(tokens) {
        *slot = parse_token(token, location, Section::Nodes, "a floating point coordinate")?;
    }

    Ok(coordinates)
}

/// Parse one element's 1-based node indices into `out` as 0-based indices, checking the
/// count against the arity of `kind` and every index against `node_count`.
pub(crate) fn parse_connectivity(
    tokens: &[&str],
    kind: ElementKind,
    node_count: usize,
    location: &Location,
    out: &mut Vec<usize>,
) -> Result<(), ParseError> {
    if tokens.len() != kind.arity() {
        let arity = InvalidElementArity::new(kind, kind.arity(), tokens.len());
        return Err(ElementArity::new(location.clone(), arity).into());
    }

    let section = Section::Connectivity(kind);

    for token in tokens {
        let index: i64 = parse_token(token, location, section, "an integer node index")?;

        if index < 1 || index as u64 > node_count as u64 {
            return Err(IndexOutOfRange::new(location.clone(), section, index, node_count).into());
        }

        out.push((index - 1) as usize);
    }

    Ok(())
}

/// Row-major connectivity and tags of a single kind, collected while reading and
/// turned into an [`ElementGroup`] once the file is done.
pub(crate) struct GroupBuffer {
    kind: ElementKind,
    connectivity: Vec<usize>,
    tags: Vec<Tag>,
}

impl GroupBuffer {
    /// `elements` comes from a file header, so only up to [`PREALLOCATED_ROWS`] are reserved
    pub(crate) fn with_capacity(kind: ElementKind, elements: usize) -> Self {
        let elements = preallocated(elements);

        Self {
            kind,
            connectivity: Vec::with_capacity(elements * kind.arity()),
            tags: Vec::with_capacity(elements),
        }
    }

    pub(crate) fn kind(&self) -> ElementKind {
        self.kind
    }

    pub(crate) fn connectivity_mut(&mut self) -> &mut Vec<usize> {
        &mut self.connectivity
    }

    pub(crate) fn push_tag(&mut self, tag: Tag) {
        self.tags.push(tag)
    }

    /// the connectivity of the element pushed most recently
    pub(crate) fn last_element_mut(&mut self) -> &mut [usize] {
        let start = self.connectivity.len().saturating_sub(self.kind.arity());
        &mut self.connectivity[start..]
    }

    pub(crate) fn finish(self) -> Result<ElementGroup, Error> {
        let group = ElementGroup::from_flat(self.kind, self.connectivity, self.tags)?;
        Ok(group)
    }
}

/// one buffer per kind, in canonical order
pub(crate) fn group_buffers(counts: &[usize]) -> [GroupBuffer; 6] {
    ElementKind::ALL.map(|kind| {
        let capacity = counts.get(kind.index()).copied().unwrap_or(0);
        GroupBuffer::with_capacity(kind, capacity)
    })
}

/// turn the buffers collected by a reader into the mesh's groups
pub(crate) fn finish_groups(buffers: [GroupBuffer; 6]) -> Result<[ElementGroup; 6], Error> {
    let mut groups = ElementKind::ALL.map(ElementGroup::empty);

    for buffer in buffers {
        let idx = buffer.kind().index();
        groups[idx] = buffer.finish()?;
    }

    Ok(groups)
}
