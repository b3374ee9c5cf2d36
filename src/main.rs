use image::error::ImageError;

use quadgrid::error::BuildError;
use quadgrid::quantize;
use quadgrid::{Grid, Node};

use tracing_subscriber::EnvFilter;

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	eprintln!("{}", msg);
	std::process::exit(code)
}

/// Runs the built-in 4x4 sample: build, compress, reconstruct, and print
/// both grids so the round trip can be eyeballed.
fn run_demo() {
	let grid = match Grid::from_rows(vec![
		vec![0u32, 0, 1, 1],
		vec![0, 0, 1, 1],
		vec![1, 1, 0, 0],
		vec![1, 1, 0, 0],
	]) {
		Ok(g) => g,
		Err(_) => unreachable!("the sample grid is square"),
	};
	println!("Original grid:");
	for row in grid.rows() {
		println!("{:?}", row);
	}
	let mut tree = match Node::build(&grid) {
		Ok(t) => t,
		Err(_) => unreachable!("the sample grid has a power-of-two side"),
	};
	let full_nodes = tree.node_count();
	tree.compress();
	eprintln!(
		"{} nodes before compression, {} after ({} leaves)",
		full_nodes,
		tree.node_count(),
		tree.leaf_count()
	);
	let mut restored = Grid::new(grid.side(), 0u32);
	match tree.reconstruct(&mut restored) {
		Ok(()) => (),
		Err(_) => unreachable!("the destination matches the sample grid"),
	}
	println!("Reconstructed grid:");
	for row in restored.rows() {
		println!("{:?}", row);
	}
}

/// `clap`-based CLI for round-tripping images through a region quadtree.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 5: computation limits exceeded
///
/// 10: other, potentially unknown error
fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.init();

	let clap_matches = clap::App::new("quadgrid")
		.version("0.2.0")
		.about("Compresses square power-of-two images with a region quadtree.")
		.arg_from_usage("--demo 'Run the built-in 4x4 sample and exit'")
		.arg_from_usage("-d, --dedup=[N] 'Color distance threshold for palette deduplication; defaults to 256'")
		.arg_from_usage("[INPUT] 'Path to input image'")
		.arg_from_usage("[OUTPUT] 'Path to output image; defaults to INPUT with a modified file extension'")
		.get_matches();

	if clap_matches.is_present("demo") {
		run_demo();
		return;
	}

	let input_path = match clap_matches.value_of("INPUT") {
		Some(p) => p,
		None => error_exit("An input file or --demo must be given", 2),
	};
	let source = match image::open(input_path) {
		Ok(i) => i,
		Err(e) => {
			let (msg, code) = match e {
				ImageError::Decoding(_) => ("Invalid image data", 4),
				ImageError::Limits(_) => ("Computation limits exceeded", 5),
				ImageError::IoError(_) => ("File not found or could not be read", 3),
				_ => ("An error occurred", 10),
			};
			error_exit(msg, code)
		}
	}
	.into_rgba();
	let dedup = match clap_matches.value_of("dedup").unwrap_or("256").parse() {
		Ok(n) => n,
		Err(_) => error_exit("Non-numeric value for dedup", 2),
	};

	let palette = quantize::generate_palette(&source, dedup);
	eprintln!("{} colors in generated palette", palette.len());
	let grid = match quantize::quantize(&source, &palette) {
		Ok(g) => g,
		Err(_) => error_exit("Input image must be square", 4),
	};
	let mut tree = match Node::build(&grid) {
		Ok(t) => t,
		Err(e) => {
			let msg = match e {
				BuildError::InvalidDimension => "Input image side length must be a power of two",
				BuildError::OutOfBounds => "Input image does not cover the requested region",
			};
			error_exit(msg, 4)
		}
	};
	let full_nodes = tree.node_count();
	tree.compress();
	eprintln!(
		"{} nodes before compression, {} after ({} leaves)",
		full_nodes,
		tree.node_count(),
		tree.leaf_count()
	);
	let mut restored = Grid::new(grid.side(), 0u32);
	match tree.reconstruct(&mut restored) {
		Ok(()) => (),
		Err(_) => unreachable!("the destination was allocated from the source grid"),
	}
	let output = quantize::render(&restored, &palette);
	match output.save(clap_matches.value_of("OUTPUT")
		.unwrap_or(&(input_path.rsplitn(2, '.').last().unwrap().to_string() + "-q.png"))) {
		Ok(_) => (),
		Err(_) => error_exit("Could not save output", 3),
	}
}
