//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! PS3 RGBA swizzle - recursive quadrant tiling of 32-bit texels
//!
//! The console stores a square power-of-two surface as four quadrants in the
//! order top-left, top-right, bottom-left, bottom-right, each quadrant laid
//! out the same way down to 4x4 groups. A group holds 16 consecutive texels
//! in 2x2-quad order. Non-square surfaces are split into square tiles with
//! the side of the short edge. Tall tiles follow one another; wide tiles
//! start only `side` texels apart, so neighbouring wide tiles share source
//! texels.

use crate::formats::blh::MipLevel;

const BYTES_PER_TEXEL: usize = 4;
const GROUP_SIDE: usize = 4;

/// Texel offset of the 4x4 group at `(x, y)` inside a square tile of side `size`.
///
/// `x` and `y` are texel coordinates inside the tile. `size` must be a power
/// of two no smaller than 4.
#[must_use]
pub fn block_address(size: usize, x: usize, y: usize) -> usize {
    if size <= GROUP_SIDE {
        return 0;
    }
    let half = size / 2;
    let area = size * size;
    match (x < half, y < half) {
        (true, true) => block_address(half, x, y),
        (false, true) => block_address(half, x - half, y) + area / 4,
        (true, false) => block_address(half, x, y - half) + area / 2,
        (false, false) => block_address(half, x - half, y - half) + 3 * area / 4,
    }
}

/// Position of texel `(dx, dy)` among the 16 texels of its group.
fn group_index(dx: usize, dy: usize) -> usize {
    let quad = (dx >> 1) + 2 * (dy >> 1);
    let texel = (dx & 1) + 2 * (dy & 1);
    quad * 4 + texel
}

/// Whether a surface can be expressed as square power-of-two tiles.
fn is_tileable(width: usize, height: usize) -> bool {
    let side = width.min(height);
    side >= GROUP_SIDE && width.is_power_of_two() && height.is_power_of_two()
}

/// Swizzled texel index for linear texel `(x, y)`.
fn swizzled_index(width: usize, height: usize, x: usize, y: usize) -> usize {
    let side = width.min(height);
    let (lx, ly) = (x % side, y % side);
    // Wide tiles start `side` texels apart, tall tiles a whole tile apart
    let tile_offset = if width > height {
        (x / side) * side
    } else {
        (y / side) * side * side
    };

    let group_x = lx & !(GROUP_SIDE - 1);
    let group_y = ly & !(GROUP_SIDE - 1);
    tile_offset
        + block_address(side, group_x, group_y)
        + group_index(lx - group_x, ly - group_y)
}

/// Reorder one swizzled RGBA8 level into row-major order.
///
/// Data shorter than `width * height * 4` is returned unchanged with a
/// warning. Levels that cannot be tiled are passed through unchanged.
#[must_use]
pub fn unswizzle_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    remap(data, width, height, Direction::Unswizzle)
}

/// Inverse of [`unswizzle_rgba`] for square and tall levels.
///
/// Wide tiles overlap in swizzled order, so a wide level keeps only the
/// texels written last.
#[must_use]
pub fn swizzle_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    remap(data, width, height, Direction::Swizzle)
}

#[derive(Clone, Copy)]
enum Direction {
    Swizzle,
    Unswizzle,
}

fn remap(data: &[u8], width: u32, height: u32, direction: Direction) -> Vec<u8> {
    let (width, height) = (width as usize, height as usize);
    let expected = width * height * BYTES_PER_TEXEL;

    if data.len() < expected {
        tracing::warn!(
            "Texture data is too small for {}x{} ({} < {} bytes), left as is",
            width,
            height,
            data.len(),
            expected
        );
        return data.to_vec();
    }
    if !is_tileable(width, height) {
        tracing::debug!("{}x{} level cannot be tiled, left as is", width, height);
        return data.to_vec();
    }

    let mut output = vec![0u8; expected];
    for y in 0..height {
        for x in 0..width {
            let linear = (y * width + x) * BYTES_PER_TEXEL;
            let swizzled = swizzled_index(width, height, x, y) * BYTES_PER_TEXEL;
            let (src, dst) = match direction {
                Direction::Unswizzle => (swizzled, linear),
                Direction::Swizzle => (linear, swizzled),
            };
            output[dst..dst + BYTES_PER_TEXEL].copy_from_slice(&data[src..src + BYTES_PER_TEXEL]);
        }
    }
    output
}

/// Unswizzle every level of an RGBA8 mip chain, each from its own byte range.
///
/// A level that runs past the end of `data` is handed over short and so
/// comes back unchanged.
#[must_use]
pub fn unswizzle_mip_chain(data: &[u8], levels: &[MipLevel]) -> Vec<u8> {
    let mut output = Vec::with_capacity(data.len());
    for level in levels {
        let start = (level.offset as usize).min(data.len());
        let end = ((level.offset + level.size) as usize).min(data.len());
        if start == end && level.size > 0 {
            tracing::warn!("Mip level {}x{} is missing from the data region", level.width, level.height);
            break;
        }
        output.extend(unswizzle_rgba(&data[start..end], level.width, level.height));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texels(count: usize) -> Vec<u8> {
        (0..count as u32).flat_map(u32::to_be_bytes).collect()
    }

    fn texel_at(data: &[u8], index: usize) -> u32 {
        let offset = index * 4;
        u32::from_be_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
    }

    #[test]
    fn test_block_address_quadrants() {
        assert_eq!(block_address(4, 0, 0), 0);
        assert_eq!(block_address(8, 0, 0), 0);
        assert_eq!(block_address(8, 4, 0), 16);
        assert_eq!(block_address(8, 0, 4), 32);
        assert_eq!(block_address(8, 4, 4), 48);
        assert_eq!(block_address(16, 12, 4), 64 + 48);
    }

    #[test]
    fn test_group_order() {
        let order: Vec<(usize, usize)> = vec![
            (0, 0), (1, 0), (0, 1), (1, 1),
            (2, 0), (3, 0), (2, 1), (3, 1),
            (0, 2), (1, 2), (0, 3), (1, 3),
            (2, 2), (3, 2), (2, 3), (3, 3),
        ];
        for (k, (dx, dy)) in order.into_iter().enumerate() {
            assert_eq!(group_index(dx, dy), k);
        }
    }

    #[test]
    fn test_unswizzle_single_group() {
        let data = texels(16);
        let linear = unswizzle_rgba(&data, 4, 4);
        // Row 0 takes source texels 0, 1, 4, 5
        assert_eq!(texel_at(&linear, 0), 0);
        assert_eq!(texel_at(&linear, 1), 1);
        assert_eq!(texel_at(&linear, 2), 4);
        assert_eq!(texel_at(&linear, 3), 5);
        // Row 1 takes 2, 3, 6, 7
        assert_eq!(texel_at(&linear, 4), 2);
        assert_eq!(texel_at(&linear, 7), 7);
        assert_eq!(texel_at(&linear, 15), 15);
    }

    #[test]
    fn test_round_trip_square_and_tall() {
        for (width, height) in [(4u32, 4u32), (8, 8), (32, 32), (4, 16), (8, 32), (16, 64)] {
            let linear = texels((width * height) as usize);
            let swizzled = swizzle_rgba(&linear, width, height);
            assert_ne!(swizzled.len(), 0);
            assert_eq!(unswizzle_rgba(&swizzled, width, height), linear, "{width}x{height}");
        }
    }

    #[test]
    fn test_wide_tiles_step_by_side() {
        let data = texels(16 * 4);
        let linear = unswizzle_rgba(&data, 16, 4);
        // Tile n starts at source texel 4n
        assert_eq!(texel_at(&linear, 4), 4);
        assert_eq!(texel_at(&linear, 12), 12);
        // (4, 1) is texel 2 of the second tile's group
        assert_eq!(texel_at(&linear, 16 + 4), 6);

        let data = texels(8 * 4);
        let linear = unswizzle_rgba(&data, 8, 4);
        assert_eq!(texel_at(&linear, 4), 4);
        assert_eq!(texel_at(&linear, 5), 5);
        assert_eq!(texel_at(&linear, 6), 8);
    }

    #[test]
    fn test_tall_tiles_are_consecutive() {
        let data = texels(4 * 16);
        let linear = unswizzle_rgba(&data, 4, 16);
        // Second 4x4 tile starts at source texel 16 and lands at y = 4
        assert_eq!(texel_at(&linear, 4 * 4), 16);
        assert_eq!(texel_at(&linear, 12 * 4), 48);
    }

    #[test]
    fn test_short_input_is_unchanged() {
        let data = texels(10);
        assert_eq!(unswizzle_rgba(&data, 4, 4), data);
    }

    #[test]
    fn test_untileable_level_is_unchanged() {
        let data = texels(4);
        assert_eq!(unswizzle_rgba(&data, 2, 2), data);
        let data = texels(12 * 12);
        assert_eq!(unswizzle_rgba(&data, 12, 12), data);
    }

    #[test]
    fn test_mip_chain_uses_each_level_range() {
        let top = texels(64);
        let second = texels(16);
        let mut chain = swizzle_rgba(&top, 8, 8);
        chain.extend(swizzle_rgba(&second, 4, 4));
        chain.extend(texels(4));

        let levels = [
            MipLevel { width: 8, height: 8, offset: 0, size: 256 },
            MipLevel { width: 4, height: 4, offset: 256, size: 64 },
            MipLevel { width: 2, height: 2, offset: 320, size: 16 },
        ];
        let output = unswizzle_mip_chain(&chain, &levels);
        assert_eq!(output.len(), chain.len());
        assert_eq!(&output[..256], &top[..]);
        assert_eq!(&output[256..320], &second[..]);
        assert_eq!(&output[320..], &texels(4)[..]);
    }
}
