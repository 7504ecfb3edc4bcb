//! Common traits and types that are useful for working with `umesh`
#![allow(unused_imports)]

pub use crate::mesh::{ElementGroup, ElementKind, Mesh, Tag};
pub use crate::parse::Parsed;
pub use crate::traits::MeshFormat;
pub use crate::{MshV2, Ugrid};

pub(crate) use crate::utils;
pub(crate) use crate::Error;

pub(crate) use std::io::{BufRead, Write};

pub(crate) use derive_more::{Constructor, Display, From};

pub(crate) use ndarray::{Array2, ArrayView1};
