//! Reader and writer for the structured-grid interchange format (`.ugrid`, ASCII).
//!
//! ```text
//! N T Q Te P Pr H
//! x y z                      (N lines)
//! v1 v2 v3 [v4]              (T + Q lines, triangles then quads, 1-based)
//! tag                        (T + Q lines, same order)
//! v1 .. vA                   (Te + P + Pr + H lines, 1-based)
//! ```
//!
//! Volume elements carry no tags in this format. They are read back with tag `0` and
//! their tags are never written.

use crate::prelude::*;

use crate::parse::{
    self, GroupBuffer, LineReader, MalformedHeader, ParseError, Parsed, Section, Warning,
};

/// number of integers in the header line
const HEADER_LEN: usize = 7;

/// parse an entire `.ugrid` document. `name` is only used in error messages
pub fn parse<R: BufRead>(reader: R, name: &str) -> Result<Parsed, Error> {
    let mut lines = LineReader::new(reader, name);
    let mut warnings = Vec::new();

    let counts = read_header(&mut lines)?;
    let node_count = counts[0];
    let element_counts = &counts[1..];

    log::debug!("{name}: header promises {counts:?}");

    let nodes = read_nodes(&mut lines, node_count)?;

    let mut buffers = parse::group_buffers(element_counts);

    for kind in ElementKind::BOUNDARY {
        let buffer = &mut buffers[kind.index()];
        read_connectivity(&mut lines, buffer, element_counts[kind.index()], node_count)?;
    }

    for kind in ElementKind::BOUNDARY {
        let buffer = &mut buffers[kind.index()];
        read_boundary_tags(&mut lines, buffer, element_counts[kind.index()])?;
    }

    for kind in ElementKind::VOLUME {
        let count = element_counts[kind.index()];
        let buffer = &mut buffers[kind.index()];
        read_connectivity(&mut lines, buffer, count, node_count)?;

        for _ in 0..count {
            buffer.push_tag(0);
        }
    }

    if lines.next_nonblank()?.is_some() {
        let warning = Warning::PossibleUnparsedTrailer(lines.location());
        log::warn!("{warning}");
        warnings.push(warning);
    }

    let groups = parse::finish_groups(buffers)?;
    let mesh = Mesh::from_parts(nodes, groups);

    Ok(Parsed::new(mesh, warnings))
}

fn read_header<R: BufRead>(lines: &mut LineReader<R>) -> Result<[usize; HEADER_LEN], Error> {
    let expected = "7 non-negative integers (nodes, tris, quads, tets, pyramids, prisms, hexes)";

    let line = match lines.next_line()? {
        Some(line) => line,
        None => {
            let err = MalformedHeader::new(lines.eof_location(), Section::Header, expected.into(), String::new());
            return Err(ParseError::from(err).into());
        }
    };

    let malformed = || {
        let err = MalformedHeader::new(lines.location(), Section::Header, expected.into(), line.clone());
        Error::from(ParseError::from(err))
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != HEADER_LEN {
        return Err(malformed());
    }

    let mut counts = [0; HEADER_LEN];
    for (slot, token) in counts.iter_mut().zip(&tokens) {
        *slot = token.parse().map_err(|_| malformed())?;
    }

    Ok(counts)
}

fn read_nodes<R: BufRead>(lines: &mut LineReader<R>, node_count: usize) -> Result<Array2<f64>, Error> {
    let mut rows = Vec::with_capacity(parse::preallocated(node_count));

    for idx in 0..node_count {
        let line = lines.section_line(Section::Nodes, node_count, idx)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        rows.push(parse::parse_coordinates(&tokens, &lines.location())?);
    }

    Ok(parse::node_array(&rows))
}

fn read_connectivity<R: BufRead>(
    lines: &mut LineReader<R>,
    buffer: &mut GroupBuffer,
    count: usize,
    node_count: usize,
) -> Result<(), Error> {
    let kind = buffer.kind();

    for idx in 0..count {
        let line = lines.section_line(Section::Connectivity(kind), count, idx)?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        parse::parse_connectivity(
            &tokens,
            kind,
            node_count,
            &lines.location(),
            buffer.connectivity_mut(),
        )?;
    }

    Ok(())
}

fn read_boundary_tags<R: BufRead>(
    lines: &mut LineReader<R>,
    buffer: &mut GroupBuffer,
    count: usize,
) -> Result<(), Error> {
    let section = Section::BoundaryTags(buffer.kind());

    for idx in 0..count {
        let line = lines.section_line(section, count, idx)?;
        let location = lines.location();

        let mut tokens = line.split_whitespace();
        let tag = match (tokens.next(), tokens.next()) {
            (Some(token), None) => parse::parse_token(token, &location, section, "an integer tag")?,
            _ => {
                let err = parse::InvalidToken::new(location, section, "a single integer tag", line.clone());
                return Err(ParseError::from(err).into());
            }
        };

        buffer.push_tag(tag);
    }

    Ok(())
}

/// write a mesh as a `.ugrid` document
pub fn write<W: Write>(mesh: &Mesh, mut writer: W) -> Result<(), Error> {
    let header = mesh
        .counts()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{header}")?;

    for row in mesh.nodes().outer_iter() {
        writeln!(
            writer,
            "{} {} {}",
            utils::fixed_point(row[0]),
            utils::fixed_point(row[1]),
            utils::fixed_point(row[2])
        )?;
    }

    for group in mesh.boundary_groups() {
        write_connectivity(&mut writer, group)?;
    }

    for group in mesh.boundary_groups() {
        for tag in group.tags() {
            writeln!(writer, "{tag}")?;
        }
    }

    for group in mesh.volume_groups() {
        write_connectivity(&mut writer, group)?;
    }

    writer.flush()?;

    Ok(())
}

fn write_connectivity<W: Write>(writer: &mut W, group: &ElementGroup) -> Result<(), Error> {
    for element in group.connectivity().outer_iter() {
        let line = element
            .iter()
            .map(|node| (node + 1).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{line}")?;
    }

    Ok(())
}
