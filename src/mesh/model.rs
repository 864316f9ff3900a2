//! The mesh container: per-vertex buffer views keyed by attribute slot.

use crate::buffer::{codec, BufferView, ElementKind};
use crate::util::{Error, Result};
use smallvec::SmallVec;
use std::fmt;

/// Known per-vertex attribute slots, plus an extension point for custom
/// names.
///
/// Attribute names are resolved to slots once, at mesh construction, rather
/// than on every access.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Position,
    Normal,
    Color,
    Tangent,
    SkinClusterIndex,
    SkinClusterWeight,
    /// Texture coordinate set 0..=4
    TexCoord(u8),
    /// Any attribute outside the known set
    Custom(String),
}

impl Attribute {
    /// Resolve an attribute from its string name. Unknown names become
    /// [`Custom`](Self::Custom).
    pub fn from_name(name: &str) -> Self {
        match name {
            "position" => Self::Position,
            "normal" => Self::Normal,
            "color" => Self::Color,
            "tangent" => Self::Tangent,
            "skin_cluster_index" => Self::SkinClusterIndex,
            "skin_cluster_weight" => Self::SkinClusterWeight,
            "texcoord0" => Self::TexCoord(0),
            "texcoord1" => Self::TexCoord(1),
            "texcoord2" => Self::TexCoord(2),
            "texcoord3" => Self::TexCoord(3),
            "texcoord4" => Self::TexCoord(4),
            other => Self::Custom(other.to_string()),
        }
    }

    /// Returns true for direction-like attributes that stay unit length.
    #[inline]
    pub fn is_directional(&self) -> bool {
        matches!(self, Self::Normal | Self::Tangent)
    }

    /// Returns true for attributes the welder blends on vertex collision
    /// (normals and colors); everything else keeps the first value seen.
    #[inline]
    pub fn is_blended(&self) -> bool {
        matches!(self, Self::Normal | Self::Color)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position => write!(f, "position"),
            Self::Normal => write!(f, "normal"),
            Self::Color => write!(f, "color"),
            Self::Tangent => write!(f, "tangent"),
            Self::SkinClusterIndex => write!(f, "skin_cluster_index"),
            Self::SkinClusterWeight => write!(f, "skin_cluster_weight"),
            Self::TexCoord(set) => write!(f, "texcoord{set}"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// A triangle mesh: positions, a triangle-list index buffer, and any number
/// of additional per-vertex attributes.
///
/// All attribute views hold exactly `vertex_count()` elements; the index
/// count is a multiple of 3 and every index stays below the vertex count
/// (validated at construction).
#[derive(Clone, Debug)]
pub struct Mesh {
    name: String,
    positions: BufferView,
    indices: BufferView,
    attributes: SmallVec<[(Attribute, BufferView); 8]>,
}

impl Mesh {
    /// Create a mesh from a vec3 position view and a scalar uint16/uint32
    /// triangle-list index view.
    ///
    /// Index values are validated eagerly against the vertex count, so a
    /// mesh that constructs successfully can always be welded.
    pub fn new(positions: BufferView, indices: BufferView) -> Result<Self> {
        if positions.element().scalar_count != 3 {
            return Err(Error::invalid(format!(
                "positions must be 3-component, got {}",
                positions.element()
            )));
        }
        let index_element = indices.element();
        if index_element.scalar_count != 1
            || !matches!(index_element.kind, ElementKind::UInt16 | ElementKind::UInt32)
        {
            return Err(Error::invalid(format!(
                "indices must be scalar uint16/uint32, got {index_element}"
            )));
        }
        if indices.num_elements() % 3 != 0 {
            return Err(Error::invalid(format!(
                "index count {} is not a multiple of 3",
                indices.num_elements()
            )));
        }
        let vertex_count = positions.num_elements();
        for i in 0..indices.num_elements() {
            let index = codec::get::<u32>(&indices, i as u32)?;
            if index as usize >= vertex_count {
                return Err(Error::invalid(format!(
                    "index value {index} at slot {i} exceeds vertex count {vertex_count}"
                )));
            }
        }
        Ok(Self {
            name: String::new(),
            positions,
            indices,
            attributes: SmallVec::new(),
        })
    }

    /// Attach a per-vertex attribute view.
    ///
    /// Fails for the `Position` slot (held separately) and for views whose
    /// element count differs from the vertex count. A repeated slot replaces
    /// the previous view.
    pub fn add_attribute(&mut self, attribute: Attribute, view: BufferView) -> Result<()> {
        if attribute == Attribute::Position {
            return Err(Error::invalid(
                "position is the mesh's primary view, not an attribute",
            ));
        }
        if view.num_elements() != self.vertex_count() {
            return Err(Error::invalid(format!(
                "attribute {attribute} has {} elements, mesh has {} vertices",
                view.num_elements(),
                self.vertex_count()
            )));
        }
        if let Some(slot) = self.attributes.iter_mut().find(|(a, _)| *a == attribute) {
            slot.1 = view;
        } else {
            self.attributes.push((attribute, view));
        }
        Ok(())
    }

    /// Display name, carried through processing passes.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The vec3 position view.
    pub fn positions(&self) -> &BufferView {
        &self.positions
    }

    /// The triangle-list index view.
    pub fn indices(&self) -> &BufferView {
        &self.indices
    }

    /// Look up an attribute view by slot.
    pub fn attribute(&self, attribute: &Attribute) -> Option<&BufferView> {
        self.attributes
            .iter()
            .find(|(a, _)| a == attribute)
            .map(|(_, view)| view)
    }

    /// Iterate the non-position attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = (&Attribute, &BufferView)> {
        self.attributes.iter().map(|(a, v)| (a, v))
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.num_elements()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.num_elements() / 3
    }
}
