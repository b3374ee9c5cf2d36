/// Reason why a grid couldn't be assembled from cell values.
#[derive(Debug)]
pub enum GridError {
	/// The supplied cells do not form a square; either a row's length
	/// differs from the row count, or a flat buffer's length is not the
	/// square of the requested side.
	NotSquare,
}

/// Reason why a grid couldn't be analyzed into a quadtree.
#[derive(Debug)]
pub enum BuildError {
	/// The side length of the region to cover is not a power of two.
	InvalidDimension,
	/// The requested region does not lie fully inside the grid.
	OutOfBounds,
}

/// Reason why a quadtree couldn't be written back to a grid.
#[derive(Debug)]
pub enum ReconstructError {
	/// The destination grid cannot hold the tree's region.
	DimensionMismatch,
}
