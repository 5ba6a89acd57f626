//! Small fixtures shared by the unit tests.

use crate::maze::Maze;

pub const SMALL_LAYOUT: &[&str] = &[
    "#############",
    "#o....P....o#",
    "#.###.#.###.#",
    "#...F.E.....#",
    "###.##-##.###",
    "TTT.#LHR#.TTT",
    "#.#.#####.#.#",
    "#...........#",
    "#############",
];

pub fn small_maze() -> Maze {
    Maze::parse(SMALL_LAYOUT).expect("small layout is valid")
}
