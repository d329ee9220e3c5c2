//! Reconstructor selection by mesh provenance.

use facecrate_core::{IndexedMesh, OperationControl, Provenance, Result};
use tracing::debug;

use crate::config::ReconstructionConfig;
use crate::coplanar::CoplanarMerger;
use crate::outcome::{FaceReconstructor, ReconstructionOutcome};
use crate::reconstructor::PolygonReconstructor;

/// The reconstructor suited to meshes of the given provenance.
///
/// Generated meshes are exact and take the [`CoplanarMerger`]; everything
/// else needs the tolerance-based [`PolygonReconstructor`].
pub fn select_reconstructor(
    provenance: Provenance,
    config: &ReconstructionConfig,
) -> Box<dyn FaceReconstructor> {
    if provenance.is_exact() {
        Box::new(CoplanarMerger::new(config.clone()))
    } else {
        Box::new(PolygonReconstructor::new(config.clone()))
    }
}

/// Reconstruct polygon faces with the reconstructor matching `mesh.provenance`.
pub fn reconstruct_faces(
    mesh: &IndexedMesh,
    config: &ReconstructionConfig,
    control: &OperationControl,
) -> Result<ReconstructionOutcome> {
    let reconstructor = select_reconstructor(mesh.provenance, config);
    debug!(
        provenance = ?mesh.provenance,
        reconstructor = reconstructor.name(),
        "Reconstructing faces"
    );
    reconstructor.reconstruct(mesh, control)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection() {
        let config = ReconstructionConfig::default();
        assert_eq!(
            select_reconstructor(Provenance::ProcedurallyGenerated, &config).name(),
            "coplanar"
        );
        assert_eq!(select_reconstructor(Provenance::Loaded, &config).name(), "polygon");
        assert_eq!(select_reconstructor(Provenance::Decimated, &config).name(), "polygon");
    }

    #[test]
    fn test_empty_mesh() {
        let outcome = reconstruct_faces(
            &IndexedMesh::new(),
            &ReconstructionConfig::default(),
            &OperationControl::new(),
        )
        .unwrap();
        assert!(outcome.faces.is_empty());
    }
}
