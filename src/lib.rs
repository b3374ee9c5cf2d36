pub mod node;

pub use node::*;

impl<V> node::Node<V> {
	/// Total number of nodes in the tree, this node included.
	///
	/// A freshly built tree over an `N`x`N` grid has `N * N` leaves plus
	/// the branches above them; comparing the count before and after
	/// `compress` measures how much the tree shrank.
	pub fn node_count(&self) -> usize {
		match &self.body {
			NodeBody::Leaf(_) => 1,
			NodeBody::Branch(sections) => {
				1 + sections.iter().map(Self::node_count).sum::<usize>()
			}
		}
	}

	/// Number of leaves, i.e. the number of constant squares the tree
	/// partitions its region into.
	pub fn leaf_count(&self) -> usize {
		match &self.body {
			NodeBody::Leaf(_) => 1,
			NodeBody::Branch(sections) => sections.iter().map(Self::leaf_count).sum(),
		}
	}

	/// Length of the longest path from this node down to a leaf.
	pub fn depth(&self) -> usize {
		match &self.body {
			NodeBody::Leaf(_) => 0,
			NodeBody::Branch(sections) => {
				1 + sections.iter().map(Self::depth).max().unwrap_or(0)
			}
		}
	}
}
