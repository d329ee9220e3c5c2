//! Result type shared by the face reconstructors.

use facecrate_core::{Completion, IndexedMesh, OperationControl, PolygonFace, Result};
use serde::{Deserialize, Serialize};

/// Whether meaningful polygon faces could be produced for a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FaceCapability {
    /// Faces were reconstructed.
    #[default]
    Available,
    /// The mesh exceeded the size guard; faces are one per triangle.
    Unavailable,
}

/// Faces for a mesh plus how they were obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionOutcome {
    /// Partition of the mesh's triangles into polygon faces.
    pub faces: Vec<PolygonFace>,
    pub capability: FaceCapability,
    /// Multi-triangle patches that failed the loop checks and were split.
    pub rejected_patches: usize,
    /// Faces covering more than one triangle.
    pub merged_faces: usize,
    pub completion: Completion,
}

impl ReconstructionOutcome {
    /// One face per triangle.
    pub fn trivial(mesh: &IndexedMesh, capability: FaceCapability) -> Self {
        Self {
            faces: facecrate_core::triangle_faces(&mesh.vertices, &mesh.faces),
            capability,
            rejected_patches: 0,
            merged_faces: 0,
            completion: Completion::Complete,
        }
    }

    /// Store the faces on the mesh.
    pub fn apply_to(self, mesh: &mut IndexedMesh) -> FaceCapability {
        mesh.polygon_faces = Some(self.faces);
        self.capability
    }
}

/// Anything that groups a mesh's triangles into polygon faces.
pub trait FaceReconstructor {
    /// Build faces for `mesh`. The faces always partition its triangles.
    fn reconstruct(
        &self,
        mesh: &IndexedMesh,
        control: &OperationControl,
    ) -> Result<ReconstructionOutcome>;

    fn name(&self) -> &'static str;
}
