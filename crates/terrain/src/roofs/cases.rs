//! Facet table for roof tiles.
//!
//! Roof corners are indexed `A = 0 (x, y)`, `B = 1 (x+1, y)`,
//! `C = 2 (x+1, y+1)`, `D = 3 (x, y+1)`. A full roof tile is split into two
//! triangles whose corners, surface and texture coordinates depend on which
//! corners are raised onto the ridge (bit `i` of the mask set for corner `i`).

use bevy::math::Vec2;
use tiles::RoofPosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoofSurface {
    /// Flat top between raised corners, drawn with the roof's top texture.
    Top,
    /// Slope down from the ridge, drawn with the roof's side texture.
    Side,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoofFacet {
    pub corners: [usize; 3],
    pub surface: RoofSurface,
    pub uvs: [Vec2; 3],
}

const ABC: [usize; 3] = [0, 1, 2];
const ACD: [usize; 3] = [0, 2, 3];
const ABD: [usize; 3] = [0, 1, 3];
const BCD: [usize; 3] = [1, 2, 3];

const U0: Vec2 = Vec2::new(0.0, 0.0);
const U1: Vec2 = Vec2::new(1.0, 0.0);
const U2: Vec2 = Vec2::new(1.0, 1.0);
const U3: Vec2 = Vec2::new(0.0, 1.0);
const UH: Vec2 = Vec2::new(0.5, 1.0);
const UHL: Vec2 = Vec2::new(-0.5, 1.0);

const fn side(corners: [usize; 3], uvs: [Vec2; 3]) -> Option<RoofFacet> {
    Some(RoofFacet {
        corners,
        surface: RoofSurface::Side,
        uvs,
    })
}

const fn top(corners: [usize; 3], uvs: [Vec2; 3]) -> Option<RoofFacet> {
    Some(RoofFacet {
        corners,
        surface: RoofSurface::Top,
        uvs,
    })
}

/// Facets of a full roof tile by raised-corner mask. `None` marks a facet
/// with no usable texture mapping; such triangles are left out. Only the two
/// saddles (5 and 10) have none.
pub const FULL_ROOF_CASES: [[Option<RoofFacet>; 2]; 16] = [
    // 0: flat
    [top(ABC, [U0, U1, U2]), top(ACD, [U0, U2, U3])],
    // 1: A
    [side(ABC, [U2, U1, U0]), side(ACD, [U3, U1, U0])],
    // 2: B
    [side(ABD, [U0, U3, U1]), side(BCD, [U2, U1, U0])],
    // 3: A B
    [side(ABC, [U3, U2, U1]), side(ACD, [U3, U1, U0])],
    // 4: C
    [side(ABC, [U1, U0, U3]), side(ACD, [U0, U2, U1])],
    // 5: A C, saddle
    [None, None],
    // 6: B C
    [side(ABC, [U0, U3, U2]), side(ACD, [U0, U2, U1])],
    // 7: A B C
    [top(ABC, [U0, U1, U2]), side(ACD, [UH, UHL, U0])],
    // 8: D
    [side(ABD, [U1, U0, U2]), side(BCD, [U1, U0, U3])],
    // 9: A D
    [side(ABC, [U2, U1, U0]), side(ACD, [U2, U0, U3])],
    // 10: B D, saddle
    [None, None],
    // 11: A B D
    [top(ABD, [U0, U1, U3]), side(BCD, [UH, U0, UHL])],
    // 12: C D
    [side(ABC, [U1, U0, U3]), side(ACD, [U1, U3, U2])],
    // 13: A C D
    [side(ABC, [UHL, U0, UH]), top(ACD, [U0, U2, U3])],
    // 14: B C D
    [side(ABD, [U0, UHL, UH]), top(BCD, [U1, U2, U3])],
    // 15: all raised
    [top(ABC, [U0, U1, U2]), top(ACD, [U0, U2, U3])],
];

/// Raised-corner mask from the four corner flags in `A, B, C, D` order.
pub fn corner_mask(raised: [bool; 4]) -> usize {
    raised
        .iter()
        .enumerate()
        .fold(0, |mask, (i, &r)| if r { mask | (1 << i) } else { mask })
}

/// Whether a full roof splits along `B-D` instead of `A-C`.
///
/// Holds when exactly one of `B`, `D` is the sole raised corner, or when three
/// corners are raised and `A` or `C` is the low one.
pub fn is_flipped(mask: usize) -> bool {
    let raised = |i: usize| mask & (1 << i) != 0;
    let count = (mask & 0xF).count_ones();
    (count == 1 && (raised(1) || raised(3))) || (count == 3 && (!raised(0) || !raised(2)))
}

pub fn full_roof_facets(mask: usize) -> [Option<RoofFacet>; 2] {
    FULL_ROOF_CASES[mask & 0xF]
}

/// Single side facet of a corner roof piece, `None` for full and empty roofs.
pub fn corner_cap(position: RoofPosition) -> Option<RoofFacet> {
    match position {
        RoofPosition::Tl => side(ABD, [UH, U1, U0]),
        RoofPosition::Tr => side(ABC, [U0, UH, U1]),
        RoofPosition::Bl => side(ACD, [U1, U0, UH]),
        RoofPosition::Br => side(BCD, [U0, UH, U1]),
        RoofPosition::Full | RoofPosition::Empty => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_mask_bits() {
        assert_eq!(corner_mask([false; 4]), 0);
        assert_eq!(corner_mask([true, false, false, false]), 1);
        assert_eq!(corner_mask([false, true, false, true]), 10);
        assert_eq!(corner_mask([true; 4]), 15);
    }

    #[test]
    fn test_flipped_cases_use_bd_diagonal() {
        for mask in 0..16 {
            let uses_bd = full_roof_facets(mask)
                .iter()
                .flatten()
                .any(|f| f.corners == ABD || f.corners == BCD);
            assert_eq!(uses_bd, is_flipped(mask), "mask {mask}");
        }
    }

    #[test]
    fn test_flip_rule() {
        let flipped: Vec<usize> = (0..16).filter(|&m| is_flipped(m)).collect();
        assert_eq!(flipped, vec![2, 8, 11, 14]);
    }

    #[test]
    fn test_only_saddles_are_unmatched() {
        for mask in [5, 10] {
            assert_eq!(full_roof_facets(mask), [None, None]);
        }
        for mask in [0, 1, 2, 3, 4, 6, 7, 8, 9, 11, 12, 13, 14, 15] {
            assert!(full_roof_facets(mask).iter().all(Option::is_some), "mask {mask}");
        }
    }

    #[test]
    fn test_top_facets_are_level() {
        for mask in 0..16 {
            for facet in full_roof_facets(mask).iter().flatten() {
                let raised = facet.corners.iter().filter(|&&c| mask & (1 << c) != 0).count();
                let level = raised == 0 || raised == 3;
                assert_eq!(facet.surface == RoofSurface::Top, level, "mask {mask}");
            }
        }
    }

    #[test]
    fn test_full_roof_table_values() {
        use super::RoofSurface::{Side, Top};
        type Row = [([usize; 3], RoofSurface, [Vec2; 3]); 2];
        let expected: [(usize, Row); 14] = [
            (0, [(ABC, Top, [U0, U1, U2]), (ACD, Top, [U0, U2, U3])]),
            (1, [(ABC, Side, [U2, U1, U0]), (ACD, Side, [U3, U1, U0])]),
            (2, [(ABD, Side, [U0, U3, U1]), (BCD, Side, [U2, U1, U0])]),
            (3, [(ABC, Side, [U3, U2, U1]), (ACD, Side, [U3, U1, U0])]),
            (4, [(ABC, Side, [U1, U0, U3]), (ACD, Side, [U0, U2, U1])]),
            (6, [(ABC, Side, [U0, U3, U2]), (ACD, Side, [U0, U2, U1])]),
            (7, [(ABC, Top, [U0, U1, U2]), (ACD, Side, [UH, UHL, U0])]),
            (8, [(ABD, Side, [U1, U0, U2]), (BCD, Side, [U1, U0, U3])]),
            (9, [(ABC, Side, [U2, U1, U0]), (ACD, Side, [U2, U0, U3])]),
            (11, [(ABD, Top, [U0, U1, U3]), (BCD, Side, [UH, U0, UHL])]),
            (12, [(ABC, Side, [U1, U0, U3]), (ACD, Side, [U1, U3, U2])]),
            (13, [(ABC, Side, [UHL, U0, UH]), (ACD, Top, [U0, U2, U3])]),
            (14, [(ABD, Side, [U0, UHL, UH]), (BCD, Top, [U1, U2, U3])]),
            (15, [(ABC, Top, [U0, U1, U2]), (ACD, Top, [U0, U2, U3])]),
        ];
        for (mask, row) in expected {
            let facets = full_roof_facets(mask);
            for (facet, (corners, surface, uvs)) in facets.iter().zip(row) {
                let facet = facet.unwrap();
                assert_eq!(facet.corners, corners, "mask {mask}");
                assert_eq!(facet.surface, surface, "mask {mask}");
                assert_eq!(facet.uvs, uvs, "mask {mask}");
            }
        }
    }

    #[test]
    fn test_corner_caps() {
        assert_eq!(corner_cap(RoofPosition::Tl).unwrap().corners, ABD);
        assert_eq!(corner_cap(RoofPosition::Br).unwrap().uvs, [U0, UH, U1]);
        assert!(corner_cap(RoofPosition::Full).is_none());
        assert!(corner_cap(RoofPosition::Empty).is_none());
    }
}
