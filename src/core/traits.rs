//! Core linear-algebra traits shared by the solvers and preconditioners.

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    fn matvec(&self, x: &V, y: &mut V);
}

/// Inner products and Euclidean norms over a vector type.
pub trait InnerProduct<V> {
    type Scalar: Copy + PartialOrd + From<f64>;
    /// dot(x, y) = xᵀy.
    fn dot(&self, x: &V, y: &V) -> Self::Scalar;
    /// ‖x‖₂.
    fn norm(&self, x: &V) -> Self::Scalar;
}

/// Row count of a matrix, or length of a vector seen as a column.
pub trait Indexing {
    fn nrows(&self) -> usize;
}
