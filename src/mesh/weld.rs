//! Vertex welding: merge duplicate vertices, remap indices, drop degenerate
//! triangles.

use super::{Attribute, Mesh};
use crate::buffer::{codec, from_vec, BufferView, ElementFormat};
use crate::util::{Error, Result};
use glam::Vec3;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Default weld epsilon. Passing exactly this value selects the hashed
/// exact-match path; any other epsilon selects the linear-scan distance path.
pub const WELD_EPSILON: f32 = 1.0e-6;

/// Weld duplicate vertices of `mesh` into a new mesh.
///
/// Vertices are merged in source order: with `epsilon == WELD_EPSILON`
/// positions must match exactly (hash lookup, O(N)); with any other epsilon
/// each vertex is compared against every unique vertex accepted so far and
/// the first within `epsilon` wins (O(N^2) - intended for small meshes or
/// offline baking, not runtime use). Triangle indices are remapped and
/// degenerate triangles removed; surviving triangles keep their order.
///
/// Attribute handling on vertex collision:
/// - `reset_normals` replaces each output normal with `normalize(position)`.
///   That is a sphere/star-shaped-mesh heuristic and not generally correct
///   for arbitrary geometry.
/// - Normals and colors take a running 50/50 blend of the incoming and
///   previously stored value (order-dependent, not a true mean), normals
///   renormalized after each blend.
/// - Every other attribute keeps the first value seen for a target vertex.
/// - An attribute whose data cannot be decoded is dropped from the output
///   with a warning; a failure on positions or indices fails the whole weld.
///
/// The input mesh is never mutated; the output owns all-new buffers.
pub fn weld(mesh: &Mesh, epsilon: f32, reset_normals: bool) -> Result<Mesh> {
    let positions = read_all::<Vec3>(mesh.positions()).map_err(|e| Error::weld("positions", e))?;
    let (unique, remap) = build_remap(&positions, epsilon);

    let mut indices = read_all::<u32>(mesh.indices()).map_err(|e| Error::weld("indices", e))?;
    for index in indices.iter_mut() {
        // every source vertex was visited, so the fallback arm is defensive
        *index = remap.get(*index as usize).copied().unwrap_or(*index);
    }
    remove_degenerates(&mut indices);

    let out_positions = from_vec(&unique, mesh.positions().element())
        .map_err(|e| Error::weld("positions", e))?;
    let out_indices =
        from_vec(&indices, ElementFormat::UINT32).map_err(|e| Error::weld("indices", e))?;
    let mut out = Mesh::new(out_positions, out_indices)?;
    if !mesh.name().is_empty() {
        out.set_name(format!("{} (welded)", mesh.name()));
    }

    for (attribute, view) in mesh.attributes() {
        match rebuild_attribute(attribute, view, &unique, &remap, reset_normals) {
            Ok(rebuilt) => out.add_attribute(attribute.clone(), rebuilt)?,
            Err(err) => {
                warn!(attribute = %attribute, error = %err, "dropping attribute from weld output")
            }
        }
    }
    Ok(out)
}

fn read_all<T: codec::Channels>(view: &BufferView) -> Result<Vec<T>> {
    (0..view.num_elements())
        .map(|i| codec::get::<T>(view, i as u32))
        .collect()
}

/// Accept unique vertices in source order and map every source vertex to its
/// unique index.
fn build_remap(positions: &[Vec3], epsilon: f32) -> (Vec<Vec3>, Vec<u32>) {
    let slow = epsilon != WELD_EPSILON;
    let epsilon2 = epsilon * epsilon;
    let mut unique: Vec<Vec3> = Vec::new();
    let mut remap: Vec<u32> = Vec::with_capacity(positions.len());
    let mut hashed: HashMap<[u32; 3], u32> = HashMap::new();

    for (i, &position) in positions.iter().enumerate() {
        if i > 0 && i % 16384 == 0 {
            debug!(visited = i, total = positions.len(), "long-running weld remap");
        }
        let found = if slow {
            // first accepted vertex within epsilon wins; no distance
            // minimizing tie-break
            unique
                .iter()
                .position(|&q| q.distance_squared(position) <= epsilon2)
                .map(|j| j as u32)
        } else {
            hashed.get(&position_key(position)).copied()
        };
        let target = match found {
            Some(j) => j,
            None => {
                let j = unique.len() as u32;
                if !slow {
                    hashed.insert(position_key(position), j);
                }
                unique.push(position);
                j
            }
        };
        remap.push(target);
    }
    (unique, remap)
}

/// Exact-match hash key: the position's raw bit pattern.
#[inline]
fn position_key(p: Vec3) -> [u32; 3] {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}

/// Delete any triple with two equal indices, re-examining the same slot
/// after a removal so cascading deletions are caught. Survivors keep their
/// order.
fn remove_degenerates(indices: &mut Vec<u32>) {
    let mut i = 0;
    while i + 2 < indices.len() {
        let (a, b, c) = (indices[i], indices[i + 1], indices[i + 2]);
        if a == b || b == c || a == c {
            indices.drain(i..i + 3);
        } else {
            i += 3;
        }
    }
}

fn rebuild_attribute(
    attribute: &Attribute,
    view: &BufferView,
    unique: &[Vec3],
    remap: &[u32],
    reset_normals: bool,
) -> Result<BufferView> {
    if *attribute == Attribute::Normal && reset_normals {
        let normals: Vec<Vec3> = unique.iter().map(|p| p.normalize_or_zero()).collect();
        return from_vec(&normals, view.element());
    }

    if attribute.is_blended() {
        let mut output = vec![Vec3::ZERO; unique.len()];
        let mut seen = vec![false; unique.len()];
        for (from, &target) in remap.iter().enumerate() {
            let target = target as usize;
            let incoming = codec::get::<Vec3>(view, from as u32)?;
            let stored = if seen[target] { output[target] } else { incoming };
            let mut blended = incoming.lerp(stored, 0.5);
            if attribute.is_directional() {
                blended = blended.normalize_or_zero();
            }
            output[target] = blended;
            seen[target] = true;
        }
        return from_vec(&output, view.element());
    }

    // first value seen for a target wins; later duplicates are ignored
    let output = crate::buffer::allocate(unique.len(), view.element())?;
    let mut seen = vec![false; unique.len()];
    for (from, &target) in remap.iter().enumerate() {
        if seen[target as usize] {
            continue;
        }
        let value = codec::get_dynamic(view, from as u32)?;
        codec::set_dynamic(&output, target, value)?;
        seen[target as usize] = true;
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_degenerates_cascade() {
        // first triple degenerate; after removal the next shifts into its
        // slot and must be examined again
        let mut indices = vec![0, 0, 1, 2, 2, 3, 0, 1, 2];
        remove_degenerates(&mut indices);
        assert_eq!(indices, vec![0, 1, 2]);

        let mut all_bad = vec![5, 5, 5, 1, 2, 1];
        remove_degenerates(&mut all_bad);
        assert!(all_bad.is_empty());

        let mut good = vec![0, 1, 2, 3, 4, 5];
        remove_degenerates(&mut good);
        assert_eq!(good, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_build_remap_exact() {
        let positions = [Vec3::ZERO, Vec3::ZERO, Vec3::X, Vec3::X];
        let (unique, remap) = build_remap(&positions, WELD_EPSILON);
        assert_eq!(unique, vec![Vec3::ZERO, Vec3::X]);
        assert_eq!(remap, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_build_remap_epsilon_first_wins() {
        // both accepted vertices are within epsilon of the third; the first
        // by acceptance order wins even though the second is closer
        let positions = [
            Vec3::ZERO,
            Vec3::new(0.015, 0.0, 0.0),
            Vec3::new(0.009, 0.0, 0.0),
        ];
        let (unique, remap) = build_remap(&positions, 0.01);
        assert_eq!(unique.len(), 2);
        assert_eq!(remap, vec![0, 1, 0]);
    }
}
