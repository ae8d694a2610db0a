use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::Verbosity;

use crate::board::DEFAULT_SIZE;

pub const DEFAULT_OUTPUT: &str = "Pac-Man.board";
pub const MIN_SIZE: usize = 3;
const DEFAULT_RENDER_FPS: u64 = 60;

/// Terminal Pac-Man on a square board.
#[derive(Parser, Debug)]
#[command(name = "pacman", version)]
pub struct Config {
    /// Board file to load; its size wins over --size
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Where `s` saves the board
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Side length of a new board; values below 3 fall back to 10
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_SIZE)]
    pub size: usize,

    /// Seed for cherry placement
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write log output to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub verbose: Verbosity,
}

impl Config {
    pub fn board_size(&self) -> usize {
        if self.size < MIN_SIZE {
            DEFAULT_SIZE
        } else {
            self.size
        }
    }
}

/// Redraw rate from `PACMAN_FPS`, ignoring anything that is not a positive
/// integer.
pub fn read_render_fps() -> u64 {
    parse_fps(std::env::var("PACMAN_FPS").ok().as_deref())
}

fn parse_fps(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_RENDER_FPS)
}
