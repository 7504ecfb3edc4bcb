//! The boundary condition map (`.mapbc`) read by the flow solver alongside the volume
//! mesh: a count line, then one `tag<TAB>code<TAB>name` line per boundary tag.

use crate::prelude::*;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// solver boundary condition, stored in the file as its numeric code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum BoundaryCondition {
    /// inviscid wall
    #[display(fmt = "3000")]
    Tangency,
    /// no-slip wall
    #[display(fmt = "4000")]
    ViscousSolid,
    #[display(fmt = "5000")]
    FarfieldRiemann,
    #[display(fmt = "5050")]
    Freestream,
    #[display(fmt = "{}", _0)]
    Other(u32),
}

impl From<u32> for BoundaryCondition {
    fn from(code: u32) -> Self {
        match code {
            3000 => Self::Tangency,
            4000 => Self::ViscousSolid,
            5000 => Self::FarfieldRiemann,
            5050 => Self::Freestream,
            other => Self::Other(other),
        }
    }
}

impl From<BoundaryCondition> for u32 {
    fn from(bc: BoundaryCondition) -> u32 {
        match bc {
            BoundaryCondition::Tangency => 3000,
            BoundaryCondition::ViscousSolid => 4000,
            BoundaryCondition::FarfieldRiemann => 5000,
            BoundaryCondition::Freestream => 5050,
            BoundaryCondition::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapBcEntry {
    pub tag: Tag,
    pub condition: BoundaryCondition,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapBc {
    entries: Vec<MapBcEntry>,
}

impl MapBc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry<T: Into<String>>(
        mut self,
        tag: Tag,
        condition: BoundaryCondition,
        name: T,
    ) -> Self {
        self.entries.push(MapBcEntry {
            tag,
            condition,
            name: name.into(),
        });
        self
    }

    pub fn entries(&self) -> &[MapBcEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// boundary tags present on the mesh faces that have no entry in this map
    pub fn missing_tags(&self, mesh: &Mesh) -> Vec<Tag> {
        let covered: BTreeSet<Tag> = self.entries.iter().map(|entry| entry.tag).collect();

        mesh.boundary_tags()
            .into_iter()
            .filter(|tag| !covered.contains(tag))
            .collect()
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writeln!(writer, "{}", self.entries.len())?;

        for entry in &self.entries {
            writeln!(writer, "{}\t{}\t{}", entry.tag, entry.condition, entry.name)?;
        }

        writer.flush()?;
        Ok(())
    }
}
