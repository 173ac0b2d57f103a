//! End-to-end checks of the scanning engine through the public API.

use spritetrim::{
    CellRect, ClassificationRule, Execution, GridSpec, PixelBuffer, TrimRect, TrimResult,
    iterate_cells, scan_cell_bounds, scan_sheet, scan_sheet_with,
};

/// Small deterministic generator so sheets vary without extra dependencies.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

fn random_alpha(width: usize, height: usize, seed: u64, density: u64) -> Vec<u8> {
    let mut rng = Lcg(seed);
    (0..width * height)
        .map(|_| {
            if rng.next() % 100 < density {
                (rng.next() % 255 + 1) as u8
            } else {
                0
            }
        })
        .collect()
}

fn trimmed(x: usize, y: usize, width: usize, height: usize) -> TrimResult {
    TrimResult::Trimmed(TrimRect {
        x,
        y,
        width,
        height,
    })
}

/// Reference trim computed by brute force over image coordinates.
fn brute_force(data: &[u8], width: usize, cell: &CellRect, threshold: u8) -> TrimResult {
    let mut found: Option<(usize, usize, usize, usize)> = None;
    for y in cell.y..cell.bottom() {
        for x in cell.x..cell.right() {
            if data[y * width + x] > threshold {
                let (lx, ly) = (x - cell.x, y - cell.y);
                found = Some(match found {
                    None => (lx, ly, lx, ly),
                    Some((a, b, c, d)) => (a.min(lx), b.min(ly), c.max(lx), d.max(ly)),
                });
            }
        }
    }
    match found {
        None => TrimResult::Empty,
        Some((min_x, min_y, max_x, max_y)) => {
            TrimResult::Trimmed(TrimRect::from_extremes(min_x, min_y, max_x, max_y))
        }
    }
}

#[test]
fn single_opaque_pixel_in_4x4_cell() {
    let mut rgba = vec![0u8; 4 * 4 * 4];
    let idx = (2 * 4 + 1) * 4;
    rgba[idx..idx + 4].copy_from_slice(&[10, 20, 30, 255]);
    let buffer = PixelBuffer::from_rgba(&rgba, 4, 4).unwrap();

    let cell = CellRect {
        x: 0,
        y: 0,
        width: 4,
        height: 4,
    };
    let rule = ClassificationRule::Alpha { threshold: 0 };
    let trim = scan_cell_bounds(&buffer, &cell, rule).unwrap();
    assert_eq!(trim, trimmed(1, 2, 1, 1));
}

#[test]
fn two_by_two_grid_on_16x16() {
    let cells: Vec<_> = iterate_cells(16, 16, &GridSpec::new(8, 8)).unwrap().collect();
    let tuples: Vec<_> = cells.iter().map(|c| (c.x, c.y, c.width, c.height)).collect();
    assert_eq!(tuples, vec![(0, 0, 8, 8), (8, 0, 8, 8), (0, 8, 8, 8), (8, 8, 8, 8)]);
}

#[test]
fn partial_third_column_is_not_emitted() {
    let cells: Vec<_> = iterate_cells(25, 10, &GridSpec::new(10, 10)).unwrap().collect();
    assert_eq!(cells.len(), 2);
    assert_eq!(cells.last().unwrap().right(), 20);
}

#[test]
fn transparent_and_opaque_sheets() {
    let clear = vec![0u8; 12 * 9];
    let buffer = PixelBuffer::from_alpha(&clear, 12, 9).unwrap();
    let result = scan_sheet(&buffer, &GridSpec::new(4, 3), ClassificationRule::default()).unwrap();
    assert_eq!(result.len(), 9);
    assert!(result.iter().all(|c| c.trim.is_empty()));

    let solid = vec![255u8; 12 * 9];
    let buffer = PixelBuffer::from_alpha(&solid, 12, 9).unwrap();
    let result = scan_sheet(&buffer, &GridSpec::new(4, 3), ClassificationRule::default()).unwrap();
    for entry in &result {
        assert_eq!(entry.trim, trimmed(0, 0, 4, 3));
    }
}

#[test]
fn scan_matches_brute_force_on_random_sheets() {
    for seed in 0..12u64 {
        let (width, height) = (37 + seed as usize, 29);
        let data = random_alpha(width, height, seed, 3 + seed * 2);
        let buffer = PixelBuffer::from_alpha(&data, width, height).unwrap();
        let grid = GridSpec::new(5, 4)
            .with_spacing((seed % 3) as usize)
            .with_margin((seed % 2) as usize);
        let threshold = (seed * 20) as u8;
        let rule = ClassificationRule::Alpha { threshold };

        let result = scan_sheet(&buffer, &grid, rule).unwrap();
        let expected_cells: Vec<_> = iterate_cells(width, height, &grid).unwrap().collect();
        assert_eq!(result.len(), expected_cells.len());

        for (entry, cell) in result.iter().zip(&expected_cells) {
            assert_eq!(&entry.cell, cell);
            assert_eq!(
                entry.trim,
                brute_force(&data, width, cell, threshold),
                "seed {} cell {:?}",
                seed,
                cell
            );
        }
    }
}

#[test]
fn repeated_scans_are_identical() {
    let data = random_alpha(64, 64, 7, 5);
    let buffer = PixelBuffer::from_alpha(&data, 64, 64).unwrap();
    let grid = GridSpec::new(16, 16);

    let rule = ClassificationRule::default();

    let first = scan_sheet(&buffer, &grid, rule).unwrap();
    let second = scan_sheet(&buffer, &grid, rule).unwrap();
    let parallel = scan_sheet_with(&buffer, &grid, rule, Execution::Parallel).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, parallel);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&parallel).unwrap()
    );
}
