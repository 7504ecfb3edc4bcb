use crate::prelude::*;

use crate::mesh::InvalidElementArity;

/// file name and 1-based line number a parse error points at
#[derive(Display, Debug, Clone, PartialEq, Eq, Constructor)]
#[display(fmt = "{file}:{line}")]
pub struct Location {
    pub file: String,
    pub line: usize,
}

/// the part of a mesh file that was being read when something went wrong
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    #[display(fmt = "header")]
    Header,
    #[display(fmt = "format version")]
    FormatVersion,
    #[display(fmt = "node coordinates")]
    Nodes,
    #[display(fmt = "{} connectivity", _0)]
    Connectivity(ElementKind),
    #[display(fmt = "{} boundary tags", _0)]
    BoundaryTags(ElementKind),
    #[display(fmt = "elements")]
    Elements,
}

#[derive(Debug, thiserror::Error, From)]
pub enum ParseError {
    #[error("{0}")]
    MalformedHeader(MalformedHeader),
    #[error("{0}")]
    TruncatedFile(TruncatedFile),
    #[error("{0}")]
    IndexOutOfRange(IndexOutOfRange),
    #[error("{0}")]
    InvalidElementArity(ElementArity),
    #[error("{0}")]
    UnsupportedFormatVersion(UnsupportedFormatVersion),
    #[error("{0}")]
    UnexpectedTagCount(UnexpectedTagCount),
    #[error("{0}")]
    InvalidToken(InvalidToken),
    #[error("{0}")]
    MissingSection(MissingSection),
    #[error("{0}")]
    DuplicateSection(DuplicateSection),
}

impl ParseError {
    /// where in the file the error was detected
    pub fn location(&self) -> &Location {
        match self {
            ParseError::MalformedHeader(e) => &e.location,
            ParseError::TruncatedFile(e) => &e.location,
            ParseError::IndexOutOfRange(e) => &e.location,
            ParseError::InvalidElementArity(e) => &e.location,
            ParseError::UnsupportedFormatVersion(e) => &e.location,
            ParseError::UnexpectedTagCount(e) => &e.location,
            ParseError::InvalidToken(e) => &e.location,
            ParseError::MissingSection(e) => &e.location,
            ParseError::DuplicateSection(e) => &e.location,
        }
    }
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "{location}: malformed {section} line: expected {expected}, got `{found}`")]
pub struct MalformedHeader {
    pub location: Location,
    pub section: Section,
    pub expected: String,
    pub found: String,
}

#[derive(Display, Debug, Constructor)]
#[display(
    fmt = "{location}: file ended while reading {section}: expected {expected} lines, found {found}"
)]
pub struct TruncatedFile {
    pub location: Location,
    pub section: Section,
    pub expected: usize,
    pub found: usize,
}

#[derive(Display, Debug, Constructor)]
#[display(
    fmt = "{location}: node index {index} in {section} is outside of the valid range 1..={node_count}"
)]
pub struct IndexOutOfRange {
    pub location: Location,
    pub section: Section,
    pub index: i64,
    pub node_count: usize,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "{location}: {arity}")]
pub struct ElementArity {
    pub location: Location,
    pub arity: InvalidElementArity,
}

#[derive(Display, Debug, Constructor)]
#[display(
    fmt = "{location}: unsupported mesh format version `{found}`, only ASCII version `{expected}` can be read"
)]
pub struct UnsupportedFormatVersion {
    pub location: Location,
    pub expected: &'static str,
    pub found: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "{location}: element {element} declares {found} tags, expected exactly 2")]
pub struct UnexpectedTagCount {
    pub location: Location,
    pub element: i64,
    pub found: i64,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "{location}: could not parse {section}: expected {expected}, got `{found}`")]
pub struct InvalidToken {
    pub location: Location,
    pub section: Section,
    pub expected: &'static str,
    pub found: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "{location}: expected section marker `{expected}`, got `{found}`")]
pub struct MissingSection {
    pub location: Location,
    pub expected: String,
    pub found: String,
}

/// a section that may appear at most once was opened a second time
#[derive(Display, Debug, Constructor)]
#[display(fmt = "{location}: second `{marker}` section, the first one ended on line {first_end}")]
pub struct DuplicateSection {
    pub location: Location,
    pub marker: String,
    pub first_end: usize,
}

/// Anomalies that are tolerated while reading. They are logged as they occur and handed
/// back alongside the mesh.
#[derive(Display, Debug, Clone, PartialEq)]
pub enum Warning {
    /// content remains after every section the header promised
    #[display(
        fmt = "{}: content after the last expected section was not parsed (optional sections are not supported)",
        _0
    )]
    PossibleUnparsedTrailer(Location),
    /// elements of a type code that is not one of the six modeled kinds were dropped
    #[display(fmt = "skipped {count} elements with unsupported type code {code}")]
    UnrecognizedElementType { code: u32, count: usize },
    /// the two tag slots of an element disagree, the first one was kept
    #[display(fmt = "{location}: tag slots differ ({first} vs {second}), keeping {first}")]
    MismatchedTagSlots {
        location: Location,
        first: Tag,
        second: Tag,
    },
}
