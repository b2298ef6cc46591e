use crate::mesh_builder::GeneratedMesh;

/// Receives every mesh the generator publishes.
///
/// Implemented by whatever owns the renderable surface. Each call replaces
/// the previous mesh entirely.
pub trait MeshSink {
    fn publish(&mut self, mesh: &GeneratedMesh);
}

impl<S: MeshSink + ?Sized> MeshSink for &mut S {
    fn publish(&mut self, mesh: &GeneratedMesh) {
        (**self).publish(mesh);
    }
}

/// Keeps a copy of the last published mesh. Used by headless hosts.
#[derive(Default)]
pub struct CapturedMesh {
    mesh: Option<GeneratedMesh>,
    publish_count: usize,
}

impl CapturedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mesh(&self) -> Option<&GeneratedMesh> {
        self.mesh.as_ref()
    }

    pub fn publish_count(&self) -> usize {
        self.publish_count
    }

    pub fn take(&mut self) -> Option<GeneratedMesh> {
        self.mesh.take()
    }
}

impl MeshSink for CapturedMesh {
    fn publish(&mut self, mesh: &GeneratedMesh) {
        self.mesh = Some(mesh.clone());
        self.publish_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_mesh_replaces_previous() {
        let mut sink = CapturedMesh::new();
        assert!(sink.mesh().is_none());

        let first = GeneratedMesh {
            vertices: vec![[0.0, 0.0, 0.0]],
            ..GeneratedMesh::default()
        };
        let second = GeneratedMesh {
            vertices: vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            ..GeneratedMesh::default()
        };

        sink.publish(&first);
        sink.publish(&second);

        assert_eq!(sink.publish_count(), 2);
        assert_eq!(sink.mesh(), Some(&second));
        assert_eq!(sink.take(), Some(second));
        assert!(sink.mesh().is_none());
    }

    #[test]
    fn test_mutable_reference_forwards() {
        fn publish_twice<S: MeshSink>(mut sink: S) {
            sink.publish(&GeneratedMesh::default());
            sink.publish(&GeneratedMesh::default());
        }

        let mut sink = CapturedMesh::new();
        publish_twice(&mut sink);
        assert_eq!(sink.publish_count(), 2);
    }
}
