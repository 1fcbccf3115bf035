use std::collections::VecDeque;
use std::io;
use std::io::prelude::*;

use ndarray::prelude::*;

/// Cells at this height bound basins and belong to none.
const BASIN_BARRIER: u8 = 9;

// The four orthogonal neighbour offsets as (dx, dy).
const NEIGHBOUR_OFFSETS: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Point {
    x: usize,
    y: usize,
}

impl Point {
    fn new(x: usize, y: usize) -> Point {
        Point { x, y }
    }
}

struct HeightMap {
    heights: Array2<u8>,
}

impl HeightMap {
    fn width(&self) -> usize {
        self.heights.ncols()
    }

    fn height(&self) -> usize {
        self.heights.nrows()
    }

    fn height_at(&self, p: Point) -> u8 {
        self.heights[(p.y, p.x)]
    }

    fn neighbours(&self, p: Point) -> Vec<Point> {
        let mut result: Vec<Point> = Vec::with_capacity(4);
        for (dx, dy) in NEIGHBOUR_OFFSETS {
            let x = p.x as isize + dx;
            let y = p.y as isize + dy;
            if x >= 0 && (x as usize) < self.width() && y >= 0 && (y as usize) < self.height() {
                result.push(Point::new(x as usize, y as usize));
            }
        }
        result
    }

    fn is_low_point(&self, p: Point) -> bool {
        let h = self.height_at(p);
        self.neighbours(p).iter().all(|n| self.height_at(*n) > h)
    }

    fn low_points(&self) -> Vec<Point> {
        let mut result: Vec<Point> = Vec::new();
        for y in 0..self.height() {
            for x in 0..self.width() {
                let p = Point::new(x, y);
                if self.is_low_point(p) {
                    result.push(p);
                }
            }
        }
        result
    }

    /// Grows the basin surrounding `low` by flood fill: every cell
    /// reachable from it through heights below 9 belongs to the basin.
    fn basin_size(&self, low: Point) -> usize {
        let mut visited: Array2<bool> = Array2::from_elem((self.height(), self.width()), false);
        let mut frontier: VecDeque<Point> = VecDeque::new();
        visited[(low.y, low.x)] = true;
        frontier.push_back(low);
        let mut size: usize = 0;
        while let Some(p) = frontier.pop_front() {
            size += 1;
            for n in self.neighbours(p) {
                if !visited[(n.y, n.x)] && self.height_at(n) < BASIN_BARRIER {
                    visited[(n.y, n.x)] = true;
                    frontier.push_back(n);
                }
            }
        }
        size
    }
}

impl TryFrom<&[String]> for HeightMap {
    type Error = String;

    fn try_from(lines: &[String]) -> Result<HeightMap, String> {
        if lines.is_empty() || lines[0].is_empty() {
            return Err("no data".to_string());
        }
        let width = lines[0].chars().count();
        let mut rows: Vec<Vec<u8>> = Vec::with_capacity(lines.len());
        for line in lines {
            let mut row: Vec<u8> = Vec::with_capacity(width);
            for cell in line.chars() {
                match cell.to_digit(10) {
                    Some(d) => row.push(d as u8),
                    None => {
                        return Err(format!("invalid (non-numeric) cell '{}'", cell));
                    }
                }
            }
            if row.len() != width {
                return Err(format!(
                    "line '{}' is {} cells wide, expected {}",
                    line,
                    row.len(),
                    width
                ));
            }
            rows.push(row);
        }
        let heights = Array::from_shape_fn((rows.len(), width), |(y, x)| rows[y][x]);
        Ok(HeightMap { heights })
    }
}

fn total_risk(map: &HeightMap) -> u32 {
    map.low_points()
        .iter()
        .map(|p| u32::from(map.height_at(*p)) + 1)
        .sum()
}

fn largest_basins_product(map: &HeightMap) -> usize {
    let mut basin_sizes: Vec<usize> = map
        .low_points()
        .iter()
        .map(|p| map.basin_size(*p))
        .collect();
    basin_sizes.sort_unstable();
    basin_sizes.iter().rev().take(3).product()
}

#[cfg(test)]
fn example_map() -> HeightMap {
    let lines: Vec<String> = [
        "2199943210",
        "3987894921",
        "9856789892",
        "8767896789",
        "9899965678",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect();
    HeightMap::try_from(lines.as_slice()).expect("valid test data")
}

#[test]
fn test_low_points() {
    let map = example_map();
    let lows = map.low_points();
    assert_eq!(lows.len(), 4);
    assert!(lows.contains(&Point::new(1, 0)));
    assert!(lows.contains(&Point::new(9, 0)));
    assert!(lows.contains(&Point::new(2, 2)));
    assert!(lows.contains(&Point::new(6, 4)));
}

#[test]
fn test_total_risk() {
    assert_eq!(total_risk(&example_map()), 15);
}

#[test]
fn test_basin_sizes() {
    let map = example_map();
    let mut sizes: Vec<usize> = map
        .low_points()
        .iter()
        .map(|p| map.basin_size(*p))
        .collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![3, 9, 9, 14]);
}

#[test]
fn test_basin_stops_at_barrier() {
    let lines: Vec<String> = ["11911", "11911", "11911"]
        .iter()
        .map(|line| line.to_string())
        .collect();
    let map = HeightMap::try_from(lines.as_slice()).expect("valid test data");
    assert_eq!(map.basin_size(Point::new(0, 0)), 6);
    assert_eq!(map.basin_size(Point::new(4, 2)), 6);
}

#[test]
fn test_largest_basins_product() {
    assert_eq!(largest_basins_product(&example_map()), 1134);
}

#[test]
fn test_parse_rejects_bad_input() {
    let empty: Vec<String> = Vec::new();
    assert!(HeightMap::try_from(empty.as_slice()).is_err());
    let ragged: Vec<String> = vec!["123".to_string(), "45".to_string()];
    assert!(HeightMap::try_from(ragged.as_slice()).is_err());
    let junk: Vec<String> = vec!["12a".to_string()];
    assert!(HeightMap::try_from(junk.as_slice()).is_err());
}

fn part1(map: &HeightMap) {
    println!("Day 9 part 1: {}", total_risk(map));
}

fn part2(map: &HeightMap) {
    println!("Day 9 part 2: {}", largest_basins_product(map));
}

fn main() {
    let lines: Vec<String> = io::BufReader::new(io::stdin())
        .lines()
        .map(|thing| thing.unwrap())
        .collect();
    let map = HeightMap::try_from(lines.as_slice()).expect("valid input");

    part1(&map);
    part2(&map);
}
