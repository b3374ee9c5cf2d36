use super::error::GridError;
use super::grid::Grid;

use std::collections::HashMap;

pub type Color = image::Rgba<u8>;

fn abs_sub(a: u8, b: u8) -> u8 {
	(a as i16 - b as i16).abs() as u8
}

fn color_distance(a: &Color, b: &Color) -> u32 {
	(0..4)
		.map(|ch| {
			let d = abs_sub(a.0[ch], b.0[ch]) as u32;
			d * d
		})
		.sum()
}

/// Ordered list of colors; grid cell values are indices into it.
///
/// The most frequent color sits at index 0, so low cell values are the
/// common ones.
#[derive(Clone, Debug, Default)]
pub struct Palette {
	pub colors: Vec<Color>,
}

impl Palette {
	/// Color for a cell value.
	///
	/// Values outside the palette come back as transparent black rather
	/// than failing, so a short palette still renders every grid.
	pub fn color(&self, value: u32) -> Color {
		*self.colors.get(value as usize).unwrap_or(&image::Rgba([0; 4]))
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}
}

/// Selects a palette by ranking the image's colors by frequency.
///
/// Colors whose squared channel distance falls below `dedup_thresh` are
/// merged into one entry, the frequency-weighted average of the group, so
/// near-duplicates from antialiasing don't each claim a palette slot.
pub fn generate_palette(img: &image::RgbaImage, dedup_thresh: u32) -> Palette {
	let mut counts = HashMap::new();
	for pixel in img.pixels() {
		*counts.entry(*pixel).or_insert(0isize) += 1;
	}
	let mut groups: Vec<Vec<(Color, isize)>> = Vec::new();
	for (color, count) in counts {
		match groups.iter_mut().find(|g| color_distance(&g[0].0, &color) < dedup_thresh) {
			Some(group) => group.push((color, count)),
			None => groups.push(vec![(color, count)]),
		}
	}
	let mut rank = groups
		.into_iter()
		.map(|group| {
			let total: isize = group.iter().map(|(_, count)| count).sum();
			let mut acc = [0isize; 4];
			for (color, count) in &group {
				for ch in 0..4 {
					acc[ch] += color.0[ch] as isize * count;
				}
			}
			let avg = image::Rgba([
				(acc[0] / total) as u8,
				(acc[1] / total) as u8,
				(acc[2] / total) as u8,
				(acc[3] / total) as u8,
			]);
			(avg, total)
		})
		.collect::<Vec<_>>();
	rank.sort_by_key(|(_, total)| -total);
	Palette { colors: rank.into_iter().map(|(color, _)| color).collect() }
}

/// Converts a square image into a grid of palette values, matching each
/// pixel to its nearest palette color.
///
/// Lookups are memoized per distinct source color, so images with few
/// colors quantize in one distance scan per color.
pub fn quantize(img: &image::RgbaImage, palette: &Palette) -> Result<Grid<u32>, GridError> {
	if img.width() != img.height() {
		return Err(GridError::NotSquare);
	}
	let mut memo: HashMap<Color, u32> = HashMap::new();
	let cells = img
		.pixels()
		.map(|pixel| {
			*memo.entry(*pixel).or_insert_with(|| {
				palette
					.colors
					.iter()
					.enumerate()
					.map(|(value, color)| (color_distance(pixel, color), value as u32))
					.min()
					.map(|(_, value)| value)
					.unwrap_or(0)
			})
		})
		.collect();
	Grid::from_cells(img.width() as usize, cells)
}

/// Renders a grid of palette values back into an RGBA image.
pub fn render(grid: &Grid<u32>, palette: &Palette) -> image::RgbaImage {
	image::RgbaImage::from_fn(grid.side() as u32, grid.side() as u32, |x, y| {
		palette.color(grid[(x as usize, y as usize)])
	})
}

#[cfg(test)]
mod test {
	use super::{generate_palette, quantize, render, Palette};

	fn checker() -> image::RgbaImage {
		image::RgbaImage::from_fn(4, 4, |x, y| {
			if (x < 2) == (y < 2) {
				image::Rgba([0, 0, 0, 255])
			} else {
				image::Rgba([255, 255, 255, 255])
			}
		})
	}

	#[test]
	fn palette_ranks_by_frequency() {
		let mut img = checker();
		// tip the balance: white now covers 9 of 16 pixels
		img.put_pixel(0, 0, image::Rgba([255, 255, 255, 255]));
		let palette = generate_palette(&img, 1);
		assert_eq!(2, palette.len());
		assert_eq!(image::Rgba([255, 255, 255, 255]), palette.colors[0]);
	}

	#[test]
	fn palette_merges_nearby_colors() {
		let img = image::RgbaImage::from_fn(2, 2, |x, _| {
			if x == 0 {
				image::Rgba([10, 0, 0, 255])
			} else {
				image::Rgba([12, 0, 0, 255])
			}
		});
		let palette = generate_palette(&img, 16);
		assert_eq!(1, palette.len());
		assert_eq!(image::Rgba([11, 0, 0, 255]), palette.colors[0]);
	}

	#[test]
	fn quantize_then_render_restores_palette_colors() {
		let img = checker();
		let palette = generate_palette(&img, 1);
		let grid = quantize(&img, &palette).unwrap();
		assert_eq!(4, grid.side());
		assert_eq!(img.into_raw(), render(&grid, &palette).into_raw());
	}

	#[test]
	fn quantize_rejects_non_square_images() {
		let img = image::RgbaImage::new(4, 2);
		let palette = Palette { colors: vec![image::Rgba([0, 0, 0, 255])] };
		assert!(quantize(&img, &palette).is_err());
	}

	#[test]
	fn out_of_range_values_render_transparent() {
		let palette = Palette { colors: vec![image::Rgba([1, 2, 3, 255])] };
		assert_eq!(image::Rgba([0, 0, 0, 0]), palette.color(5));
	}
}
