pub mod error;
pub mod grid;
pub mod quantize;

pub use grid::Grid;

use error::{BuildError, ReconstructError};

use tracing::{debug, trace};

/// Square axis-aligned region of a grid: top-left corner plus side length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
	pub x: usize,
	pub y: usize,
	pub size: usize,
}

impl Region {
	/// The four half-size subregions, in top-left, top-right, bottom-left,
	/// bottom-right order.
	pub fn quadrants(&self) -> [Region; 4] {
		let half = self.size / 2;
		[
			Region { x: self.x, y: self.y, size: half },
			Region { x: self.x + half, y: self.y, size: half },
			Region { x: self.x, y: self.y + half, size: half },
			Region { x: self.x + half, y: self.y + half, size: half },
		]
	}

	/// Whether `(px, py)` falls inside the region.
	pub fn contains(&self, px: usize, py: usize) -> bool {
		px >= self.x && px < self.x + self.size
			&& py >= self.y && py < self.y + self.size
	}
}

/// Node in a region quadtree over a square grid.
///
/// A node covers the square `region` and is either a leaf, holding the
/// single value every cell in the region shares, or a branch, holding
/// exactly four subnodes that tile the region quadrant by quadrant.
/// There is no in-between: a branch with fewer than four subnodes or a
/// leaf without a value cannot be expressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<V> {
	pub region: Region,
	pub body: NodeBody<V>,
}

/// The two shapes a node can take.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeBody<V> {
	Leaf(V),
	Branch(Box<[Node<V>; 4]>),
}

impl<V: Copy + Eq> Node<V> {
	/// Builds a full-resolution quadtree over the whole grid.
	///
	/// Every unit cell becomes its own leaf; call `compress` afterwards to
	/// merge uniform regions. The grid's side length must be a power of
	/// two (which also rules out the empty grid).
	pub fn build(grid: &Grid<V>) -> Result<Self, BuildError> {
		debug!(side = grid.side(), "building full-resolution quadtree");
		Self::build_region(grid, Region { x: 0, y: 0, size: grid.side() })
	}

	/// Builds a quadtree over one square region of the grid.
	///
	/// The region's side length must be a power of two and the region must
	/// lie fully inside the grid. Both are checked up front; nothing is
	/// read from the grid on failure.
	pub fn build_region(grid: &Grid<V>, region: Region) -> Result<Self, BuildError> {
		if !region.size.is_power_of_two() {
			return Err(BuildError::InvalidDimension);
		}
		if region.x + region.size > grid.side() || region.y + region.size > grid.side() {
			return Err(BuildError::OutOfBounds);
		}
		Ok(Self::build_unchecked(grid, region))
	}

	fn build_unchecked(grid: &Grid<V>, region: Region) -> Self {
		let body = if region.size == 1 {
			NodeBody::Leaf(grid[(region.x, region.y)])
		} else {
			let [tl, tr, bl, br] = region.quadrants();
			NodeBody::Branch(Box::new([
				Self::build_unchecked(grid, tl),
				Self::build_unchecked(grid, tr),
				Self::build_unchecked(grid, bl),
				Self::build_unchecked(grid, br),
			]))
		};
		Node { region, body }
	}

	/// Collapses every branch whose four quadrants reduce to leaves of one
	/// identical value into a single leaf with that value.
	///
	/// Children are compressed before their parent is examined, so merges
	/// cascade: a region that is uniform at any scale ends up as one leaf,
	/// all the way to the root for a constant grid. Merging requires exact
	/// value equality; the tree stays an exact representation of the grid
	/// it was built from.
	///
	/// Compressing an already-compressed tree changes nothing.
	pub fn compress(&mut self) {
		if let NodeBody::Branch(sections) = &mut self.body {
			for section in sections.iter_mut() {
				section.compress();
			}
			if let Some(value) = uniform_value(sections) {
				trace!(
					x = self.region.x,
					y = self.region.y,
					size = self.region.size,
					"collapsed uniform quadrants"
				);
				self.body = NodeBody::Leaf(value);
			}
		}
	}

	/// Writes the values this tree represents into a destination grid.
	///
	/// Leaves write their value over their whole region; branches recurse.
	/// Quadrants are disjoint and exhaustive, so every covered cell is
	/// written exactly once and cells outside the tree's region are left
	/// untouched. The destination must be large enough to hold the tree's
	/// region; for a tree built over a full grid that means a destination
	/// of the same side length.
	pub fn reconstruct(&self, dest: &mut Grid<V>) -> Result<(), ReconstructError> {
		if self.region.x + self.region.size > dest.side()
			|| self.region.y + self.region.size > dest.side()
		{
			return Err(ReconstructError::DimensionMismatch);
		}
		self.write_into(dest);
		Ok(())
	}

	fn write_into(&self, dest: &mut Grid<V>) {
		match &self.body {
			NodeBody::Leaf(value) => {
				for py in self.region.y..self.region.y + self.region.size {
					for px in self.region.x..self.region.x + self.region.size {
						dest[(px, py)] = *value;
					}
				}
			}
			NodeBody::Branch(sections) => {
				for section in sections.iter() {
					section.write_into(dest);
				}
			}
		}
	}

	/// Value at `(px, py)`, or `None` outside this node's region.
	///
	/// Descends quadrant by quadrant, so on a compressed tree this is a
	/// logarithmic lookup rather than a grid read.
	pub fn get(&self, px: usize, py: usize) -> Option<V> {
		if !self.region.contains(px, py) {
			return None;
		}
		match &self.body {
			NodeBody::Leaf(value) => Some(*value),
			NodeBody::Branch(sections) => sections.iter().find_map(|s| s.get(px, py)),
		}
	}
}

impl<V> Node<V> {
	pub fn is_leaf(&self) -> bool {
		matches!(self.body, NodeBody::Leaf(_))
	}
}

/// The common value of four sibling leaves, if that is what they are.
fn uniform_value<V: Copy + Eq>(sections: &[Node<V>; 4]) -> Option<V> {
	let mut values = sections.iter().map(|section| match &section.body {
		NodeBody::Leaf(value) => Some(*value),
		NodeBody::Branch(_) => None,
	});
	let first = values.next()??;
	if values.all(|value| value == Some(first)) {
		Some(first)
	} else {
		None
	}
}
