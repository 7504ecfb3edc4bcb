//! Reader and writer for the legacy ASCII mesh format (`.msh`, version 2.2).
//!
//! ```text
//! $MeshFormat
//! 2.2 0 8
//! $EndMeshFormat
//! $Nodes
//! N
//! index x y z                (N lines)
//! $EndNodes
//! $Elements
//! M
//! index type 2 tag tag v1 .. vA
//! $EndElements
//! ```
//!
//! Elements of type codes outside the six modeled kinds are skipped. Any other
//! `$Section` (e.g. `$PhysicalNames`) is skipped up to its `$EndSection` marker.
//!
//! Pyramids are stored with a different vertex order than the structured-grid format.
//! The in-memory mesh uses the structured-grid order and this codec permutes on the
//! way in and the way out.

use crate::prelude::*;

use crate::parse::{
    self, DuplicateSection, GroupBuffer, InvalidToken, LineReader, MalformedHeader,
    MissingSection, ParseError, Parsed, Section, UnexpectedTagCount, UnsupportedFormatVersion,
    Warning,
};

use std::collections::BTreeMap;

/// the only format version this codec reads and writes
pub const SUPPORTED_VERSION: &str = "2.2";

/// ASCII file type marker in the version line
const ASCII_FILE_TYPE: &str = "0";

/// every element line carries exactly this many tags (physical, elementary)
const TAG_COUNT: i64 = 2;

/// `msh[j] == ugrid[PYRAMID_PERMUTATION[j]]`. The permutation is its own inverse, so
/// the same table converts in both directions.
pub(crate) const PYRAMID_PERMUTATION: [usize; 5] = [0, 3, 4, 1, 2];

/// reorder a pyramid's five nodes between the two formats' conventions
pub(crate) fn permute_pyramid(nodes: &mut [usize]) {
    debug_assert_eq!(nodes.len(), 5);

    let original = [nodes[0], nodes[1], nodes[2], nodes[3], nodes[4]];
    for (slot, source) in nodes.iter_mut().zip(PYRAMID_PERMUTATION) {
        *slot = original[source];
    }
}

/// parse an entire `.msh` v2.2 document. `name` is only used in error messages
pub fn parse<R: BufRead>(reader: R, name: &str) -> Result<Parsed, Error> {
    let mut lines = LineReader::new(reader, name);
    let mut warnings = Vec::new();

    expect_marker(&mut lines, "$MeshFormat")?;
    read_format_version(&mut lines)?;
    expect_marker(&mut lines, "$EndMeshFormat")?;

    // each block with the line its `$End` marker was on
    let mut nodes: Option<(Array2<f64>, usize)> = None;
    let mut groups: Option<([ElementGroup; 6], usize)> = None;

    while let Some(line) = lines.next_nonblank()? {
        match line.trim() {
            "$Nodes" => {
                if let Some((_, first_end)) = &nodes {
                    return Err(duplicate(&lines, "$Nodes", *first_end));
                }

                let block = read_nodes(&mut lines)?;
                expect_marker(&mut lines, "$EndNodes")?;
                nodes = Some((block, lines.location().line));
            }
            "$Elements" => {
                if let Some((_, first_end)) = &groups {
                    return Err(duplicate(&lines, "$Elements", *first_end));
                }

                let node_count = match &nodes {
                    Some((nodes, _)) => nodes.nrows(),
                    None => {
                        let err = MissingSection::new(lines.location(), "$Nodes".into(), line.clone());
                        return Err(ParseError::from(err).into());
                    }
                };

                let buffers = read_elements(&mut lines, node_count, &mut warnings)?;
                let block = parse::finish_groups(buffers)?;
                expect_marker(&mut lines, "$EndElements")?;
                groups = Some((block, lines.location().line));
            }
            other if other.starts_with('$') && !other.starts_with("$End") => {
                let section = other.to_string();
                skip_section(&mut lines, &section)?;
            }
            other => {
                let err = MissingSection::new(lines.location(), "a `$Section` marker".into(), other.into());
                return Err(ParseError::from(err).into());
            }
        }
    }

    let (nodes, _) = nodes.ok_or_else(|| missing_at_eof(&lines, "$Nodes"))?;
    let (groups, _) = groups.ok_or_else(|| missing_at_eof(&lines, "$Elements"))?;

    Ok(Parsed::new(Mesh::from_parts(nodes, groups), warnings))
}

fn duplicate<R: BufRead>(lines: &LineReader<R>, marker: &str, first_end: usize) -> Error {
    let err = DuplicateSection::new(lines.location(), marker.into(), first_end);
    ParseError::from(err).into()
}

fn missing_at_eof<R>(lines: &LineReader<R>, marker: &str) -> Error
where
    R: BufRead,
{
    let err = MissingSection::new(lines.eof_location(), marker.into(), "end of file".into());
    ParseError::from(err).into()
}

fn expect_marker<R: BufRead>(lines: &mut LineReader<R>, marker: &str) -> Result<(), Error> {
    match lines.next_nonblank()? {
        Some(line) if line.trim() == marker => Ok(()),
        Some(line) => {
            let err = MissingSection::new(lines.location(), marker.into(), line.trim().into());
            Err(ParseError::from(err).into())
        }
        None => Err(missing_at_eof(lines, marker)),
    }
}

fn read_format_version<R: BufRead>(lines: &mut LineReader<R>) -> Result<(), Error> {
    let line = lines.next_line()?.unwrap_or_default();
    let mut tokens = line.split_whitespace();

    let version = tokens.next();
    let file_type = tokens.next();

    let supported = version == Some(SUPPORTED_VERSION)
        && file_type.map(|t| t == ASCII_FILE_TYPE).unwrap_or(true);

    if !supported {
        let err = UnsupportedFormatVersion::new(lines.location(), SUPPORTED_VERSION, line.trim().into());
        return Err(ParseError::from(err).into());
    }

    Ok(())
}

/// skip everything up to and including `$End<name>`
fn skip_section<R: BufRead>(lines: &mut LineReader<R>, marker: &str) -> Result<(), Error> {
    let end_marker = format!("$End{}", &marker[1..]);
    log::debug!("{}: skipping unsupported section {marker}", lines.file());

    while let Some(line) = lines.next_line()? {
        if line.trim() == end_marker {
            return Ok(());
        }
    }

    Err(missing_at_eof(lines, &end_marker))
}

/// read the count line at the start of a `$Nodes` or `$Elements` block
fn read_count<R: BufRead>(lines: &mut LineReader<R>, section: Section) -> Result<usize, Error> {
    let line = lines.next_line()?.unwrap_or_default();

    line.trim().parse().map_err(|_| {
        let err = MalformedHeader::new(lines.location(), section, "an entry count".into(), line.clone());
        ParseError::from(err).into()
    })
}

fn read_nodes<R: BufRead>(lines: &mut LineReader<R>) -> Result<Array2<f64>, Error> {
    let node_count = read_count(lines, Section::Nodes)?;
    let mut rows = Vec::with_capacity(parse::preallocated(node_count));

    for idx in 0..node_count {
        let line = lines.section_line(Section::Nodes, node_count, idx)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let location = lines.location();

        // the leading node index is assumed to count up from 1 and is not used
        let coordinates = match tokens.split_first() {
            Some((_, coordinates)) => coordinates,
            None => &[][..],
        };
        rows.push(parse::parse_coordinates(coordinates, &location)?);
    }

    log::debug!("{}: read {node_count} nodes", lines.file());

    Ok(parse::node_array(&rows))
}

fn read_elements<R: BufRead>(
    lines: &mut LineReader<R>,
    node_count: usize,
    warnings: &mut Vec<Warning>,
) -> Result<[GroupBuffer; 6], Error> {
    let element_count = read_count(lines, Section::Elements)?;
    let mut buffers = parse::group_buffers(&[]);
    let mut skipped: BTreeMap<u32, usize> = BTreeMap::new();

    for idx in 0..element_count {
        let line = lines.section_line(Section::Elements, element_count, idx)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let location = lines.location();

        if tokens.len() < 3 {
            let err = InvalidToken::new(
                location,
                Section::Elements,
                "`index type tag-count ...`",
                line.clone(),
            );
            return Err(ParseError::from(err).into());
        }

        let element: i64 = parse::parse_token(tokens[0], &location, Section::Elements, "an element index")?;
        let code: u32 = parse::parse_token(tokens[1], &location, Section::Elements, "an element type code")?;

        let kind = match ElementKind::from_legacy_code(code) {
            Some(kind) => kind,
            None => {
                *skipped.entry(code).or_insert(0) += 1;
                continue;
            }
        };

        let tag_count: i64 = parse::parse_token(tokens[2], &location, Section::Elements, "a tag count")?;
        if tag_count != TAG_COUNT {
            let err = UnexpectedTagCount::new(location, element, tag_count);
            return Err(ParseError::from(err).into());
        }

        // tag slots, then connectivity
        let rest = &tokens[3..];
        if rest.len() < 2 {
            let err = InvalidToken::new(location, Section::Elements, "two tag values", line.clone());
            return Err(ParseError::from(err).into());
        }

        let first: Tag = parse::parse_token(rest[0], &location, Section::Elements, "an integer tag")?;
        let second: Tag = parse::parse_token(rest[1], &location, Section::Elements, "an integer tag")?;

        if first != second {
            let warning = Warning::MismatchedTagSlots {
                location: location.clone(),
                first,
                second,
            };
            log::warn!("{warning}");
            warnings.push(warning);
        }

        let buffer = &mut buffers[kind.index()];
        parse::parse_connectivity(&rest[2..], kind, node_count, &location, buffer.connectivity_mut())?;

        if kind == ElementKind::Pyramid {
            permute_pyramid(buffer.last_element_mut());
        }

        buffer.push_tag(first);
    }

    for (code, count) in skipped {
        let warning = Warning::UnrecognizedElementType { code, count };
        log::warn!("{}: {warning}", lines.file());
        warnings.push(warning);
    }

    Ok(buffers)
}

/// write a mesh as a `.msh` v2.2 ASCII document
pub fn write<W: Write>(mesh: &Mesh, mut writer: W) -> Result<(), Error> {
    writeln!(writer, "$MeshFormat")?;
    writeln!(writer, "{SUPPORTED_VERSION} {ASCII_FILE_TYPE} {}", std::mem::size_of::<f64>())?;
    writeln!(writer, "$EndMeshFormat")?;

    writeln!(writer, "$Nodes")?;
    writeln!(writer, "{}", mesh.num_nodes())?;
    for (idx, row) in mesh.nodes().outer_iter().enumerate() {
        writeln!(
            writer,
            "{} {} {} {}",
            idx + 1,
            utils::shortest(row[0]),
            utils::shortest(row[1]),
            utils::shortest(row[2])
        )?;
    }
    writeln!(writer, "$EndNodes")?;

    writeln!(writer, "$Elements")?;
    writeln!(writer, "{}", mesh.num_elements())?;

    // a single running index across all groups, boundary groups first
    let mut element = 1;
    let mut scratch = Vec::with_capacity(8);

    for group in mesh.groups() {
        let code = group.kind().legacy_code();

        for (nodes, tag) in group.iter() {
            scratch.clear();
            scratch.extend(nodes.iter().copied());

            if group.kind() == ElementKind::Pyramid {
                permute_pyramid(&mut scratch);
            }

            write!(writer, "{element} {code} {TAG_COUNT} {tag} {tag}")?;
            for node in &scratch {
                write!(writer, " {}", node + 1)?;
            }
            writeln!(writer)?;

            element += 1;
        }
    }

    writeln!(writer, "$EndElements")?;
    writer.flush()?;

    Ok(())
}
