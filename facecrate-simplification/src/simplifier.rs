//! The trait shared by the decimation methods.

use facecrate_core::{Completion, IndexedMesh, OperationControl};

/// Raw output of one simplification method, before repair.
#[derive(Debug, Clone)]
pub struct Simplified {
    pub mesh: IndexedMesh,
    pub completion: Completion,
}

impl Simplified {
    /// A copy of the input, used when a method stops before changing anything.
    pub fn unchanged(mesh: &IndexedMesh, completion: Completion) -> Self {
        Self {
            mesh: mesh.clone(),
            completion,
        }
    }
}

/// Simplify a mesh by reducing the number of triangles.
pub trait MeshSimplifier {
    /// Reduce `mesh` towards `target` triangles.
    ///
    /// Methods never fail: validation happens before they run, and anything
    /// that stops them early is reported through `completion`.
    fn simplify(&self, mesh: &IndexedMesh, target: usize, control: &OperationControl) -> Simplified;

    fn name(&self) -> &'static str;
}
