use std::collections::VecDeque;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::io::prelude::*;

use ndarray::prelude::*;
use tracing::{event, Level};
use tracing_subscriber::prelude::*;

/// Energy above this flashes the cell.
const FLASH_THRESHOLD: u8 = 9;

// All eight neighbour offsets as (dx, dy), clockwise from north.
const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
struct Point {
    x: usize,
    y: usize,
}

impl Point {
    fn new(x: usize, y: usize) -> Point {
        Point { x, y }
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum InvalidInput {
    Empty,
    RaggedRow {
        line: usize,
        len: usize,
        expected: usize,
    },
    BadCell {
        line: usize,
        cell: char,
    },
}

impl Display for InvalidInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InvalidInput::Empty => f.write_str("input is empty"),
            InvalidInput::RaggedRow {
                line,
                len,
                expected,
            } => write!(
                f,
                "line {} is {} cells wide, expected {}",
                line, len, expected
            ),
            InvalidInput::BadCell { line, cell } => {
                write!(f, "invalid (non-numeric) cell '{}' on line {}", cell, line)
            }
        }
    }
}

impl std::error::Error for InvalidInput {}

#[derive(Debug, Clone, PartialEq)]
struct Grid {
    levels: Array2<u8>,
}

impl Grid {
    fn width(&self) -> usize {
        self.levels.ncols()
    }

    fn height(&self) -> usize {
        self.levels.nrows()
    }

    fn level(&self, p: Point) -> u8 {
        self.levels[(p.y, p.x)]
    }

    fn neighbours(&self, p: Point) -> Vec<Point> {
        let mut result: Vec<Point> = Vec::with_capacity(8);
        for (dx, dy) in NEIGHBOUR_OFFSETS {
            let x = p.x as isize + dx;
            let y = p.y as isize + dy;
            if x >= 0 && (x as usize) < self.width() && y >= 0 && (y as usize) < self.height() {
                result.push(Point::new(x as usize, y as usize));
            }
        }
        result
    }

    /// Runs one tick and returns the number of cells that flashed.
    ///
    /// Every cell gains one energy; cells driven over the threshold flash,
    /// feeding energy to their neighbours, which may flash in turn.  The
    /// chain reaction runs to its fixed point before this returns.  A
    /// flashing cell drops to 0 at once and gains no further energy this
    /// tick, so no cell flashes twice in one tick.
    fn step(&mut self) -> usize {
        let mut pending: VecDeque<Point> = VecDeque::new();
        for ((y, x), level) in self.levels.indexed_iter_mut() {
            *level += 1;
            if *level > FLASH_THRESHOLD {
                pending.push_back(Point::new(x, y));
            }
        }

        let mut flashed: Array2<bool> = Array2::from_elem((self.height(), self.width()), false);
        let mut flashes: usize = 0;
        while let Some(p) = pending.pop_front() {
            assert!(!flashed[(p.y, p.x)], "cell {} flashed twice in one tick", p);
            flashed[(p.y, p.x)] = true;
            self.levels[(p.y, p.x)] = 0;
            flashes += 1;
            event!(Level::TRACE, "the cell at {} flashes", p);
            for n in self.neighbours(p) {
                if flashed[(n.y, n.x)] {
                    continue;
                }
                self.levels[(n.y, n.x)] += 1;
                if self.levels[(n.y, n.x)] == FLASH_THRESHOLD + 1 {
                    // Newly over the threshold; queue it exactly once.
                    pending.push_back(n);
                }
            }
        }
        flashes
    }
}

#[test]
fn test_neighbours() {
    let grid = Grid::try_from("123\n456\n789").expect("valid test data");
    let mut corner = grid.neighbours(Point::new(0, 0));
    corner.sort();
    assert_eq!(
        corner,
        vec![Point::new(0, 1), Point::new(1, 0), Point::new(1, 1)]
    );
    assert_eq!(grid.neighbours(Point::new(1, 0)).len(), 5);
    assert_eq!(grid.neighbours(Point::new(1, 1)).len(), 8);

    let wide = Grid::try_from("123\n456").expect("valid test data");
    assert_eq!(wide.width(), 3);
    assert_eq!(wide.height(), 2);
    assert_eq!(wide.neighbours(Point::new(1, 1)).len(), 5);

    let lonely = Grid::try_from("5").expect("valid test data");
    assert!(lonely.neighbours(Point::new(0, 0)).is_empty());
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            if y > 0 {
                f.write_str("\n")?;
            }
            for x in 0..self.width() {
                write!(f, "{}", self.level(Point::new(x, y)))?;
            }
        }
        Ok(())
    }
}

impl TryFrom<&str> for Grid {
    type Error = InvalidInput;

    fn try_from(text: &str) -> Result<Grid, InvalidInput> {
        let lines: Vec<&str> = text.lines().map(|line| line.trim()).collect();
        if lines.is_empty() || lines[0].is_empty() {
            return Err(InvalidInput::Empty);
        }
        let width = lines[0].chars().count();
        let mut rows: Vec<Vec<u8>> = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let mut row: Vec<u8> = Vec::with_capacity(width);
            for cell in line.chars() {
                match cell.to_digit(10) {
                    Some(d) => row.push(d as u8),
                    None => {
                        return Err(InvalidInput::BadCell { line: i + 1, cell });
                    }
                }
            }
            if row.len() != width {
                return Err(InvalidInput::RaggedRow {
                    line: i + 1,
                    len: row.len(),
                    expected: width,
                });
            }
            rows.push(row);
        }
        let levels = Array::from_shape_fn((rows.len(), width), |(y, x)| rows[y][x]);
        Ok(Grid { levels })
    }
}

#[test]
fn test_parse_grid() {
    let grid = Grid::try_from("190\n705").expect("valid test data");
    assert_eq!(grid.width(), 3);
    assert_eq!(grid.height(), 2);
    assert_eq!(grid.level(Point::new(0, 0)), 1);
    assert_eq!(grid.level(Point::new(2, 0)), 0);
    assert_eq!(grid.level(Point::new(0, 1)), 7);
    assert_eq!(grid.level(Point::new(2, 1)), 5);
    assert_eq!(grid.to_string(), "190\n705");
}

#[test]
fn test_parse_rejects_bad_input() {
    assert_eq!(Grid::try_from(""), Err(InvalidInput::Empty));
    assert_eq!(Grid::try_from("\n123"), Err(InvalidInput::Empty));
    assert_eq!(
        Grid::try_from("123\n45"),
        Err(InvalidInput::RaggedRow {
            line: 2,
            len: 2,
            expected: 3,
        })
    );
    assert_eq!(
        Grid::try_from("123\n4x6"),
        Err(InvalidInput::BadCell { line: 2, cell: 'x' })
    );
}

fn total_flashes(grid: &mut Grid, steps: usize) -> usize {
    let mut total: usize = 0;
    for step in 1..=steps {
        let flashes = grid.step();
        event!(Level::DEBUG, "after step {}: {} flashes", step, flashes);
        total += flashes;
    }
    total
}

/// Steps until every cell flashes in the same tick, up to `max_steps`.
fn first_synchronized_flash(grid: &mut Grid, max_steps: usize) -> Option<usize> {
    let cells = grid.width() * grid.height();
    for step in 1..=max_steps {
        let flashes = grid.step();
        event!(Level::DEBUG, "after step {}: {} flashes", step, flashes);
        if flashes == cells {
            event!(Level::INFO, "all {} cells flashed on step {}", cells, step);
            return Some(step);
        }
    }
    None
}

#[cfg(test)]
const EXAMPLE: &str = concat!(
    "5483143223\n",
    "2745854711\n",
    "5264556173\n",
    "6141336146\n",
    "6357385478\n",
    "4167524645\n",
    "2176841721\n",
    "6882881134\n",
    "4846848554\n",
    "5283751526"
);

#[cfg(test)]
const EXAMPLE_AFTER_STEP_1: &str = concat!(
    "6594254334\n",
    "3856965822\n",
    "6375667284\n",
    "7252447257\n",
    "7468496589\n",
    "5278635756\n",
    "3287952832\n",
    "7993992245\n",
    "5957959665\n",
    "6394862637"
);

#[cfg(test)]
const EXAMPLE_AFTER_STEP_2: &str = concat!(
    "8807476555\n",
    "5089087054\n",
    "8597889608\n",
    "8485769600\n",
    "8700908800\n",
    "6600088989\n",
    "6800005943\n",
    "0000007456\n",
    "9000000876\n",
    "8700006848"
);

#[test]
fn test_step_without_flashes() {
    // A step in which nothing flashes adds exactly 1 everywhere.
    let mut grid = Grid::try_from(EXAMPLE).expect("valid test data");
    assert_eq!(grid.step(), 0);
    assert_eq!(grid.to_string(), EXAMPLE_AFTER_STEP_1);
}

#[test]
fn test_step_cascade() {
    let mut grid = Grid::try_from(EXAMPLE).expect("valid test data");
    assert_eq!(grid.step(), 0);
    assert_eq!(grid.step(), 35);
    assert_eq!(grid.to_string(), EXAMPLE_AFTER_STEP_2);
}

#[test]
fn test_small_cascade() {
    // A ring of 9s flashes and drags the centre cell with it.
    let mut grid = Grid::try_from("11111\n19991\n19191\n19991\n11111").expect("valid test data");
    assert_eq!(grid.step(), 9);
    assert_eq!(grid.to_string(), "34543\n40004\n50005\n40004\n34543");
    assert_eq!(grid.step(), 0);
    assert_eq!(grid.to_string(), "45654\n51115\n61116\n51115\n45654");
}

#[test]
fn test_single_cell_grid() {
    let mut grid = Grid::try_from("9").expect("valid test data");
    assert_eq!(grid.step(), 1);
    assert_eq!(grid.to_string(), "0");
    assert_eq!(grid.step(), 0);
    assert_eq!(grid.to_string(), "1");
}

#[test]
fn test_levels_stay_bounded() {
    let mut grid = Grid::try_from(EXAMPLE).expect("valid test data");
    for _ in 0..20 {
        grid.step();
        assert!(grid.levels.iter().all(|level| *level <= FLASH_THRESHOLD));
    }
}

#[test]
fn test_step_is_deterministic() {
    let pristine = Grid::try_from(EXAMPLE).expect("valid test data");
    let mut first = pristine.clone();
    let mut second = pristine.clone();
    for _ in 0..10 {
        assert_eq!(first.step(), second.step());
        assert_eq!(first, second);
    }
}

#[test]
fn test_total_flashes() {
    let mut grid = Grid::try_from(EXAMPLE).expect("valid test data");
    assert_eq!(total_flashes(&mut grid, 10), 204);
    // 90 more steps for the full 100.
    assert_eq!(total_flashes(&mut grid, 90), 1656 - 204);
}

#[test]
fn test_first_synchronized_flash() {
    let mut grid = Grid::try_from(EXAMPLE).expect("valid test data");
    assert_eq!(first_synchronized_flash(&mut grid, 300), Some(195));

    let mut calm = Grid::try_from("11\n11").expect("valid test data");
    assert_eq!(first_synchronized_flash(&mut calm, 3), None);
}

fn part1(grid: &Grid) {
    const STEPS: usize = 100;
    let flashes = total_flashes(&mut grid.clone(), STEPS);
    println!("Day 11 part 1: {}", flashes);
}

fn part2(grid: &Grid) {
    match first_synchronized_flash(&mut grid.clone(), usize::MAX) {
        Some(step) => println!("Day 11 part 2: {}", step),
        None => println!("Day 11 part 2: there was no synchronized flash"),
    }
}

fn run() -> Result<(), InvalidInput> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let mut input = String::new();
    match io::stdin().read_to_string(&mut input) {
        Ok(_) => (),
        Err(e) => {
            panic!("failed to read input: {}", e);
        }
    }
    let grid = Grid::try_from(input.as_str())?;
    part1(&grid);
    part2(&grid);
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
