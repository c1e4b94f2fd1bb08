/// A polygon given as 0-based indices into the owning mesh's vertex buffer.
///
/// Indices are kept in the order the generator produced them. Winding is not checked or fixed up,
/// so two faces of the same mesh may face opposite ways.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    indices: Vec<usize>,
}

impl Face {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn tri(indices: [usize; 3]) -> Self {
        Self::new(indices.to_vec())
    }

    pub fn quad(indices: [usize; 4]) -> Self {
        Self::new(indices.to_vec())
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn is_quad(&self) -> bool {
        self.indices.len() == 4
    }

    /// Fans the face out from its first vertex.
    ///
    /// A quad `(v0, v1, v2, v3)` always becomes `(v0, v1, v2)` and `(v0, v2, v3)`, whatever its shape.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let first = self.indices.first().copied();
        self.indices
            .windows(2)
            .skip(1)
            .filter_map(move |pair| first.map(|v0| [v0, pair[0], pair[1]]))
    }
}
