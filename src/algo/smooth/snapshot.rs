//! Vertex positions keyed by index, with room for vertices that are not
//! part of the smoothed set.

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeMesh, VertexId};

/// Positions of the vertices taking part in a smoothing run.
///
/// Slot `i` holds the position of vertex `i`, or `None` if that vertex is
/// outside the selection. Unselected vertices are never moved, and a
/// selected vertex whose ring touches an unselected one is left in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionSnapshot {
    slots: Vec<Option<Point3<f64>>>,
}

impl PositionSnapshot {
    /// Every vertex is selected.
    pub fn full(positions: &[Point3<f64>]) -> Self {
        Self {
            slots: positions.iter().copied().map(Some).collect(),
        }
    }

    /// Only the listed vertices are selected.
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidParameter`] if an index is out of range.
    ///
    /// # Example
    ///
    /// ```
    /// use cotsmooth::algo::smooth::PositionSnapshot;
    /// use cotsmooth::mesh::VertexId;
    /// use nalgebra::Point3;
    ///
    /// let positions = vec![Point3::origin(); 4];
    /// let snapshot = PositionSnapshot::selected(&positions, [1, 3]).unwrap();
    /// assert_eq!(snapshot.num_selected(), 2);
    /// assert!(snapshot.get(VertexId::new(0)).is_none());
    /// ```
    pub fn selected<S>(positions: &[Point3<f64>], selection: S) -> Result<Self>
    where
        S: IntoIterator<Item = usize>,
    {
        let mut slots = vec![None; positions.len()];
        for i in selection {
            let pos = positions
                .get(i)
                .ok_or_else(|| MeshError::invalid_param("selection", i, "vertex index out of range"))?;
            slots[i] = Some(*pos);
        }
        Ok(Self { slots })
    }

    /// Every vertex of the mesh is selected.
    pub fn from_mesh(mesh: &HalfEdgeMesh) -> Self {
        Self {
            slots: mesh.vertex_ids().map(|v| Some(*mesh.position(v))).collect(),
        }
    }

    /// Write selected positions back into a mesh. Unselected vertices are untouched.
    pub fn apply_to(&self, mesh: &mut HalfEdgeMesh) {
        for (v, pos) in self.iter() {
            if v.index() < mesh.num_vertices() {
                mesh.set_position(v, pos);
            }
        }
    }

    /// Number of slots (selected or not).
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of selected vertices.
    pub fn num_selected(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Position of `v`, if selected.
    #[inline]
    pub fn get(&self, v: VertexId) -> Option<Point3<f64>> {
        self.slots.get(v.index()).copied().flatten()
    }

    /// Iterate over selected vertices and their positions.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, Point3<f64>)> + '_ {
        self.slots
            .iter()
            .copied()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|pos| (VertexId::new(i), pos)))
    }

    /// Raw slots, indexed by vertex.
    #[inline]
    pub fn as_slice(&self) -> &[Option<Point3<f64>>] {
        &self.slots
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Option<Point3<f64>>] {
        &mut self.slots
    }

    /// Fill unselected slots from `fallback` and return a dense position list.
    pub fn into_positions(self, fallback: &[Point3<f64>]) -> Vec<Point3<f64>> {
        self.slots
            .into_iter()
            .zip(fallback)
            .map(|(slot, &orig)| slot.unwrap_or(orig))
            .collect()
    }
}

impl From<Vec<Option<Point3<f64>>>> for PositionSnapshot {
    fn from(slots: Vec<Option<Point3<f64>>>) -> Self {
        Self { slots }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;

    fn positions() -> Vec<Point3<f64>> {
        (0..4).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_full_selects_everything() {
        let snapshot = PositionSnapshot::full(&positions());
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.num_selected(), 4);
        assert_eq!(snapshot.get(VertexId::new(2)), Some(Point3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_selected_rejects_out_of_range() {
        let result = PositionSnapshot::selected(&positions(), [0, 7]);
        assert!(matches!(result, Err(MeshError::InvalidParameter { name: "selection", .. })));
    }

    #[test]
    fn test_iter_skips_unselected() {
        let snapshot = PositionSnapshot::selected(&positions(), [3, 1]).unwrap();
        let ids: Vec<usize> = snapshot.iter().map(|(v, _)| v.index()).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_into_positions_fills_gaps() {
        let original = positions();
        let mut snapshot = PositionSnapshot::selected(&original, [0]).unwrap();
        snapshot.as_mut_slice()[0] = Some(Point3::new(9.0, 9.0, 9.0));

        let dense = snapshot.into_positions(&original);
        assert_eq!(dense[0], Point3::new(9.0, 9.0, 9.0));
        assert_eq!(&dense[1..], &original[1..]);
    }

    #[test]
    fn test_apply_to_mesh() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let mut mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();

        let mut slots = vec![None; 3];
        slots[2] = Some(Point3::new(0.5, 2.0, 0.0));
        PositionSnapshot::from(slots).apply_to(&mut mesh);

        assert_eq!(*mesh.position(VertexId::new(2)), Point3::new(0.5, 2.0, 0.0));
        assert_eq!(*mesh.position(VertexId::new(0)), vertices[0]);
        assert_eq!(PositionSnapshot::from_mesh(&mesh).num_selected(), 3);
    }
}
