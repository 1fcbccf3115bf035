use std::io;
use std::io::prelude::*;

type Reading = Vec<u8>;

fn parse_reading(line: &str) -> Result<Reading, String> {
    let mut bits: Reading = Vec::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '0' => bits.push(0),
            '1' => bits.push(1),
            _ => {
                return Err(format!("invalid bit '{}' in reading '{}'", ch, line));
            }
        }
    }
    if bits.is_empty() {
        return Err("empty reading".to_string());
    }
    Ok(bits)
}

fn parse_readings(lines: &[String]) -> Result<Vec<Reading>, String> {
    if lines.is_empty() {
        return Err("no data".to_string());
    }
    let readings: Vec<Reading> = lines
        .iter()
        .map(|line| parse_reading(line))
        .collect::<Result<Vec<Reading>, String>>()?;
    let width = readings[0].len();
    for (reading, line) in readings.iter().zip(lines) {
        if reading.len() != width {
            return Err(format!(
                "reading '{}' is {} bits wide, expected {}",
                line,
                reading.len(),
                width
            ));
        }
    }
    Ok(readings)
}

#[test]
fn test_parse_reading() {
    assert_eq!(parse_reading("01101"), Ok(vec![0, 1, 1, 0, 1]));
    assert!(parse_reading("01121").is_err());
    assert!(parse_reading("").is_err());
}

fn to_decimal(bits: &[u8]) -> u32 {
    bits.iter().fold(0, |value, bit| value * 2 + u32::from(*bit))
}

#[test]
fn test_to_decimal() {
    assert_eq!(to_decimal(&[1, 0, 1, 1, 0]), 22);
    assert_eq!(to_decimal(&[0, 1, 0, 0, 1]), 9);
    assert_eq!(to_decimal(&[0]), 0);
}

fn one_counts(readings: &[Reading]) -> Vec<usize> {
    let width = readings[0].len();
    let mut counts: Vec<usize> = vec![0; width];
    for reading in readings {
        for (bitpos, bit) in reading.iter().enumerate() {
            counts[bitpos] += usize::from(*bit);
        }
    }
    counts
}

fn power_rates(readings: &[Reading]) -> (u32, u32) {
    let mut gamma_bits: Reading = Vec::with_capacity(readings[0].len());
    for ones in one_counts(readings) {
        let zeros = readings.len() - ones;
        gamma_bits.push(if ones > zeros { 1 } else { 0 });
    }
    let epsilon_bits: Reading = gamma_bits.iter().map(|bit| 1 - bit).collect();
    (to_decimal(&gamma_bits), to_decimal(&epsilon_bits))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Criterion {
    MostCommon,
    LeastCommon,
}

fn bit_to_keep(readings: &[Reading], bitpos: usize, criterion: Criterion) -> u8 {
    let ones = readings.iter().filter(|r| r[bitpos] == 1).count();
    let zeros = readings.len() - ones;
    match criterion {
        // The oxygen generator keeps the most common bit, 1 on a tie.
        Criterion::MostCommon => {
            if ones >= zeros {
                1
            } else {
                0
            }
        }
        // The CO2 scrubber keeps the least common bit, 0 on a tie.
        Criterion::LeastCommon => {
            if ones < zeros {
                1
            } else {
                0
            }
        }
    }
}

#[test]
fn test_bit_to_keep_tie_break() {
    let tied: Vec<Reading> = vec![vec![1, 0], vec![0, 1]];
    assert_eq!(bit_to_keep(&tied, 0, Criterion::MostCommon), 1);
    assert_eq!(bit_to_keep(&tied, 0, Criterion::LeastCommon), 0);
}

fn rating(readings: &[Reading], criterion: Criterion) -> u32 {
    let width = readings[0].len();
    let mut remaining: Vec<Reading> = readings.to_vec();
    for bitpos in 0..width {
        if remaining.len() == 1 {
            break;
        }
        let keep = bit_to_keep(&remaining, bitpos, criterion);
        remaining.retain(|reading| reading[bitpos] == keep);
    }
    assert_eq!(
        remaining.len(),
        1,
        "all bit positions considered with {} readings still left",
        remaining.len()
    );
    to_decimal(&remaining[0])
}

#[cfg(test)]
fn example_readings() -> Vec<Reading> {
    let lines: Vec<String> = [
        "00100", "11110", "10110", "10111", "10101", "01111", "00111", "11100", "10000", "11001",
        "00010", "01010",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect();
    parse_readings(&lines).expect("valid test data")
}

#[test]
fn test_power_rates() {
    let (gamma, epsilon) = power_rates(&example_readings());
    assert_eq!(gamma, 22);
    assert_eq!(epsilon, 9);
    assert_eq!(gamma * epsilon, 198);
}

#[test]
fn test_ratings() {
    let readings = example_readings();
    let oxygen = rating(&readings, Criterion::MostCommon);
    let co2 = rating(&readings, Criterion::LeastCommon);
    assert_eq!(oxygen, 23);
    assert_eq!(co2, 10);
    assert_eq!(oxygen * co2, 230);
}

#[test]
fn test_parse_readings_rejects_bad_input() {
    let empty: Vec<String> = Vec::new();
    assert!(parse_readings(&empty).is_err());
    let ragged: Vec<String> = vec!["101".to_string(), "10".to_string()];
    assert!(parse_readings(&ragged).is_err());
}

fn part1(readings: &[Reading]) {
    let (gamma, epsilon) = power_rates(readings);
    println!("Day 3 part 1: {}*{} = {}", gamma, epsilon, gamma * epsilon);
}

fn part2(readings: &[Reading]) {
    let oxygen = rating(readings, Criterion::MostCommon);
    let co2 = rating(readings, Criterion::LeastCommon);
    println!("Day 3 part 2: {}*{} = {}", oxygen, co2, oxygen * co2);
}

fn main() {
    let lines: Vec<String> = io::BufReader::new(io::stdin())
        .lines()
        .map(|line| line.unwrap())
        .collect();
    let readings = parse_readings(&lines).expect("valid input");
    part1(&readings);
    part2(&readings);
}
