use crate::vertex::Vertex;

/// How a primitive's vertex sequence is assembled into triangles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VertexPattern {
    /// Independent triples: `(0, 1, 2), (3, 4, 5), ...`
    List,
    /// Every triangle shares the first vertex: `(0, 1, 2), (0, 2, 3), ...`
    Fan,
    /// Every triangle shares an edge with the previous one. Odd triangles are flipped so that all of them keep the
    /// winding of the first.
    Strip,
}

impl VertexPattern {
    /// The number of triangles produced from `len` vertices.
    pub fn triangle_count(&self, len: usize) -> usize {
        match self {
            VertexPattern::List => len / 3,
            VertexPattern::Fan | VertexPattern::Strip => len.saturating_sub(2),
        }
    }

    /// Whether `len` vertices form a well-formed primitive of this pattern.
    pub fn accepts(&self, len: usize) -> bool {
        len >= 3
            && match self {
                VertexPattern::List => len % 3 == 0,
                VertexPattern::Fan | VertexPattern::Strip => true,
            }
    }

    /// Iterate over the vertex indices of every triangle in a primitive of `len` vertices.
    pub fn triangles(self, len: usize) -> impl Iterator<Item = [usize; 3]> {
        (0..self.triangle_count(len)).map(move |i| match self {
            VertexPattern::List => [i * 3, i * 3 + 1, i * 3 + 2],
            VertexPattern::Fan => [0, i + 1, i + 2],
            VertexPattern::Strip if i % 2 == 0 => [i, i + 1, i + 2],
            VertexPattern::Strip => [i + 1, i, i + 2],
        })
    }
}

/// An assembly pattern plus the ordered vertices it applies to.
#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub pattern: VertexPattern,
    pub vertices: Vec<Vertex>,
}

impl Primitive {
    pub fn new(pattern: VertexPattern, vertices: Vec<Vertex>) -> Self {
        Self { pattern, vertices }
    }

    pub fn list(vertices: Vec<Vertex>) -> Self {
        Self::new(VertexPattern::List, vertices)
    }

    pub fn fan(vertices: Vec<Vertex>) -> Self {
        Self::new(VertexPattern::Fan, vertices)
    }

    pub fn strip(vertices: Vec<Vertex>) -> Self {
        Self::new(VertexPattern::Strip, vertices)
    }

    /// Whether the vertex count is consistent with the pattern.
    pub fn is_well_formed(&self) -> bool {
        self.pattern.accepts(self.vertices.len())
    }

    /// Iterate over the vertex indices of every triangle in this primitive.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> {
        self.pattern.triangles(self.vertices.len())
    }
}
