//! Writes the boundary faces of a mesh as a VTK XML PolyData (`.vtp`) document, the
//! surface format the extrusion tool reads.

use crate::prelude::*;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;

/// the encoding to use when writing an inline dataarray
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Ascii,
    Base64,
}

impl Encoding {
    fn to_str(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Base64 => "binary",
        }
    }
}

/// values of a single data array
enum Values<'a> {
    Float64(&'a [f64]),
    Int64(&'a [i64]),
}

impl<'a> Values<'a> {
    fn vtk_type(&self) -> &'static str {
        match self {
            Values::Float64(_) => "Float64",
            Values::Int64(_) => "Int64",
        }
    }

    fn ascii(&self) -> String {
        match self {
            Values::Float64(values) => values
                .iter()
                .map(|x| utils::shortest(*x))
                .collect::<Vec<_>>()
                .join(" "),
            Values::Int64(values) => values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// little endian bytes prefixed with their length as a `UInt64` header
    fn base64(&self) -> String {
        let mut bytes = Vec::new();

        match self {
            Values::Float64(values) => {
                bytes.extend(((values.len() * 8) as u64).to_le_bytes());
                values.iter().for_each(|x| bytes.extend(x.to_le_bytes()));
            }
            Values::Int64(values) => {
                bytes.extend(((values.len() * 8) as u64).to_le_bytes());
                values.iter().for_each(|x| bytes.extend(x.to_le_bytes()));
            }
        }

        base64::encode(bytes.as_slice())
    }
}

/// Write every triangle and quad of `mesh` as polygons. All nodes are written as points
/// so that polygon connectivity keeps the mesh's 0-based numbering. Each polygon carries
/// its boundary tag in a `BoundaryTag` cell array.
pub fn write_vtp<W: Write>(mesh: &Mesh, writer: W, encoding: Encoding) -> Result<(), Error> {
    let mut writer = Writer::new_with_indent(writer, b' ', 2);

    let mut connectivity = Vec::new();
    let mut offsets = Vec::with_capacity(mesh.num_boundary_elements());
    let mut tags = Vec::with_capacity(mesh.num_boundary_elements());

    for group in mesh.boundary_groups() {
        for (nodes, tag) in group.iter() {
            connectivity.extend(nodes.iter().map(|n| *n as i64));
            offsets.push(connectivity.len() as i64);
            tags.push(tag);
        }
    }

    let points: Vec<f64> = mesh.nodes().iter().copied().collect();
    let num_points = mesh.num_nodes().to_string();
    let num_polys = offsets.len().to_string();

    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;

    writer.write_event(Event::Start(BytesStart::new("VTKFile").with_attributes([
        ("type", "PolyData"),
        ("version", "1.0"),
        ("byte_order", "LittleEndian"),
        ("header_type", "UInt64"),
    ])))?;
    writer.write_event(Event::Start(BytesStart::new("PolyData")))?;
    writer.write_event(Event::Start(BytesStart::new("Piece").with_attributes([
        ("NumberOfPoints", num_points.as_str()),
        ("NumberOfVerts", "0"),
        ("NumberOfLines", "0"),
        ("NumberOfStrips", "0"),
        ("NumberOfPolys", num_polys.as_str()),
    ])))?;

    writer.write_event(Event::Start(BytesStart::new("Points")))?;
    write_inline_dataarray(&mut writer, None, 3, &Values::Float64(&points), encoding)?;
    writer.write_event(Event::End(BytesEnd::new("Points")))?;

    writer.write_event(Event::Start(BytesStart::new("Polys")))?;
    write_inline_dataarray(
        &mut writer,
        Some("connectivity"),
        1,
        &Values::Int64(&connectivity),
        encoding,
    )?;
    write_inline_dataarray(&mut writer, Some("offsets"), 1, &Values::Int64(&offsets), encoding)?;
    writer.write_event(Event::End(BytesEnd::new("Polys")))?;

    writer.write_event(Event::Start(
        BytesStart::new("CellData").with_attributes([("Scalars", "BoundaryTag")]),
    ))?;
    write_inline_dataarray(&mut writer, Some("BoundaryTag"), 1, &Values::Int64(&tags), encoding)?;
    writer.write_event(Event::End(BytesEnd::new("CellData")))?;

    writer.write_event(Event::End(BytesEnd::new("Piece")))?;
    writer.write_event(Event::End(BytesEnd::new("PolyData")))?;
    writer.write_event(Event::End(BytesEnd::new("VTKFile")))?;

    writer.into_inner().flush()?;

    Ok(())
}

/// write a single (inline) array of data to the document
fn write_inline_dataarray<W: Write>(
    writer: &mut Writer<W>,
    name: Option<&str>,
    components: usize,
    values: &Values<'_>,
    encoding: Encoding,
) -> Result<(), Error> {
    let components = components.to_string();

    let mut start = BytesStart::new("DataArray").with_attributes([
        ("type", values.vtk_type()),
        ("NumberOfComponents", components.as_str()),
        ("format", encoding.to_str()),
    ]);

    if let Some(name) = name {
        start.push_attribute(("Name", name));
    }

    let body = match encoding {
        Encoding::Ascii => values.ascii(),
        Encoding::Base64 => values.base64(),
    };

    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(&body)))?;
    writer.write_event(Event::End(BytesEnd::new("DataArray")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn square() -> Mesh {
        let nodes = array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.5, 0.5, 1.0],
        ];

        Mesh::new(nodes)
            .unwrap()
            .with_group(
                ElementGroup::new(ElementKind::Triangle, array![[0, 1, 4], [1, 2, 4]], vec![1, 1])
                    .unwrap(),
            )
            .unwrap()
            .with_group(
                ElementGroup::new(ElementKind::Quadrilateral, array![[0, 1, 2, 3]], vec![2]).unwrap(),
            )
            .unwrap()
    }

    fn text_of<'a>(document: &'a str, name: &str) -> &'a str {
        let marker = format!("Name=\"{name}\">");
        let start = document.find(&marker).unwrap() + marker.len();
        let end = start + document[start..].find("</DataArray>").unwrap();
        &document[start..end]
    }

    #[test]
    fn ascii_polys() {
        let mut out = Vec::new();
        write_vtp(&square(), &mut out, Encoding::Ascii).unwrap();
        let document = String::from_utf8(out).unwrap();

        assert!(document.contains("NumberOfPoints=\"5\""));
        assert!(document.contains("NumberOfPolys=\"3\""));
        assert_eq!(text_of(&document, "connectivity"), "0 1 4 1 2 4 0 1 2 3");
        assert_eq!(text_of(&document, "offsets"), "3 6 10");
        assert_eq!(text_of(&document, "BoundaryTag"), "1 1 2");
    }

    #[test]
    fn base64_has_length_header() {
        let mut out = Vec::new();
        write_vtp(&square(), &mut out, Encoding::Base64).unwrap();
        let document = String::from_utf8(out).unwrap();

        let bytes = base64::decode(text_of(&document, "offsets")).unwrap();
        assert_eq!(bytes.len(), 8 + 3 * 8);

        let mut header = [0u8; 8];
        header.copy_from_slice(&bytes[..8]);
        assert_eq!(u64::from_le_bytes(header), 24);

        let mut last = [0u8; 8];
        last.copy_from_slice(&bytes[bytes.len() - 8..]);
        assert_eq!(i64::from_le_bytes(last), 10);
    }
}
