use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::env::{Discrete, Env, EnvError, Step, StepInfo};
use crate::utils::{categorical_sample, from_1d_to_2d, from_2d_to_1d, inc};

/// (probability, next state, reward, terminated)
type Transition = (f64, usize, f64, bool);

/// The FrozenLake grid world.
///
/// The agent starts on an `S` tile and walks over frozen `F` tiles until it
/// reaches the goal `G` (reward 1) or falls into a hole `H` (reward 0). On a
/// slippery lake the agent moves in the intended direction with probability
/// 1/3 and in each of the two perpendicular directions with probability 1/3.
#[derive(Debug, Clone)]
pub struct FrozenLakeEnv {
    ready: bool,
    initial_state_distrib: Vec<f64>,
    probs: Vec<[[Transition; 3]; 4]>,
    player_pos: usize,
    max_steps: u128,
    curr_step: u128,
    nrow: usize,
    ncol: usize,
    map: Vec<Vec<char>>,
    rng: StdRng,
    action_rng: StdRng,
}

impl FrozenLakeEnv {
    // default 4x4 map
    pub const MAP_4X4: [&'static str; 4] = ["SFFF", "FHFH", "FFFH", "HFFG"];

    pub const MAP_8X8: [&'static str; 8] = [
        "SFFFFFFF", "FFFFFFFF", "FFFHFFFF", "FFFFFHFF", "FFFHFFFF", "FHHFFFHF", "FHFFHFHF",
        "FFFHFFFG",
    ];

    pub const ACTIONS: [&'static str; 4] = ["LEFT", "DOWN", "RIGHT", "UP"];

    /// Step limit of the registered `FrozenLake-v0` 4x4 task.
    pub const DEFAULT_MAX_STEPS: u128 = 100;

    fn update_probability_matrix(
        map: &[Vec<char>],
        nrow: usize,
        ncol: usize,
        row: usize,
        col: usize,
        action: usize,
    ) -> (usize, f64, bool) {
        let (newrow, newcol) = inc(nrow, ncol, row, col, action);
        let newstate: usize = from_2d_to_1d(ncol, newrow, newcol);
        let newletter: char = map[newrow][newcol];
        let terminated: bool = newletter == 'G' || newletter == 'H';
        let reward: f64 = if newletter == 'G' { 1.0 } else { 0.0 };
        (newstate, reward, terminated)
    }

    fn parse_map(map: &[&str]) -> Result<Vec<Vec<char>>, EnvError> {
        if map.is_empty() {
            return Err(EnvError::InvalidMap("the map has no rows".to_string()));
        }
        let grid: Vec<Vec<char>> = map.iter().map(|row| row.chars().collect()).collect();
        let ncol = grid[0].len();
        if ncol == 0 {
            return Err(EnvError::InvalidMap("the map has no columns".to_string()));
        }
        for (i, row) in grid.iter().enumerate() {
            if row.len() != ncol {
                return Err(EnvError::InvalidMap(format!(
                    "row {} has {} tiles, expected {}",
                    i,
                    row.len(),
                    ncol
                )));
            }
            if let Some(c) = row.iter().find(|c| !"SFHG".contains(**c)) {
                return Err(EnvError::InvalidMap(format!(
                    "unknown tile '{}' in row {}",
                    c, i
                )));
            }
        }
        if !grid.iter().flatten().any(|c| *c == 'S') {
            return Err(EnvError::InvalidMap("the map has no start tile".to_string()));
        }
        Ok(grid)
    }

    /// Looks up one of the built-in maps by name (`4x4` or `8x8`).
    pub fn named_map(name: &str) -> Option<&'static [&'static str]> {
        match name {
            "4x4" => Some(&Self::MAP_4X4),
            "8x8" => Some(&Self::MAP_8X8),
            _ => None,
        }
    }

    pub fn new(
        map: &[&str],
        is_slippery: bool,
        max_steps: u128,
        seed: Option<u64>,
    ) -> Result<Self, EnvError> {
        let grid = Self::parse_map(map)?;
        let nrow: usize = grid.len();
        let ncol: usize = grid[0].len();
        // calculating start positions probabilities
        let starts: Vec<usize> = grid
            .iter()
            .flatten()
            .enumerate()
            .filter(|(_, c)| **c == 'S')
            .map(|(i, _)| i)
            .collect();
        let mut initial_state_distrib: Vec<f64> = vec![0.0; nrow * ncol];
        for i in starts.iter() {
            initial_state_distrib[*i] = 1.0 / starts.len() as f64;
        }
        // calculating transitions probabilities
        let mut probs: Vec<[[Transition; 3]; 4]> =
            vec![[[(0.0, 0, 0.0, false); 3]; 4]; nrow * ncol];
        for row in 0..nrow {
            for col in 0..ncol {
                let s = from_2d_to_1d(ncol, row, col);
                for a in 0..4 {
                    let li = &mut probs[s][a];
                    let letter = grid[row][col];
                    if letter == 'G' || letter == 'H' {
                        li[0] = (1.0, s, 0.0, true)
                    } else if is_slippery {
                        for (i, b) in [(a + 3) % 4, a, (a + 1) % 4].iter().enumerate() {
                            let (s, r, t) =
                                Self::update_probability_matrix(&grid, nrow, ncol, row, col, *b);
                            li[i] = (1.0 / 3.0, s, r, t);
                        }
                    } else {
                        let (s, r, t) =
                            Self::update_probability_matrix(&grid, nrow, ncol, row, col, a);
                        li[0] = (1.0, s, r, t);
                    }
                }
            }
        }

        let (rng, action_rng) = match seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };

        Ok(Self {
            ready: false,
            initial_state_distrib,
            probs,
            player_pos: 0,
            max_steps,
            curr_step: 0,
            nrow,
            ncol,
            map: grid,
            rng,
            action_rng,
        })
    }

    /// The `FrozenLake-v0` task: slippery 4x4 lake limited to 100 steps.
    pub fn v0(seed: Option<u64>) -> Result<Self, EnvError> {
        Self::new(&Self::MAP_4X4, true, Self::DEFAULT_MAX_STEPS, seed)
    }
}

impl Env for FrozenLakeEnv {
    fn reset(&mut self) -> usize {
        let random: f64 = self.rng.gen();
        self.player_pos = categorical_sample(&self.initial_state_distrib, random);
        self.ready = true;
        self.curr_step = 0;
        self.player_pos
    }

    fn step(&mut self, action: usize) -> Result<Step, EnvError> {
        if !self.ready {
            return Err(EnvError::NotReady);
        }
        if action >= 4 {
            return Err(EnvError::InvalidAction { action, n: 4 });
        }
        self.curr_step += 1;
        let transitions = self.probs[self.player_pos][action];
        let t_probs = transitions.map(|a| a.0);
        let random: f64 = self.rng.gen();
        let i = categorical_sample(&t_probs, random);
        let (p, s, r, t) = transitions[i];
        trace!(
            "{} -> {} from {} (p={:.3}, reward={})",
            Self::ACTIONS[action],
            s,
            self.player_pos,
            p,
            r
        );
        self.player_pos = s;
        let truncated = !t && self.curr_step >= self.max_steps;
        let done = t || truncated;
        if done {
            self.ready = false;
        }
        Ok(Step {
            next_state: s,
            reward: r,
            done,
            info: StepInfo { prob: p, truncated },
        })
    }

    fn action_space(&self) -> Discrete {
        Discrete::new(4)
    }

    fn observation_space(&self) -> Discrete {
        Discrete::new(self.probs.len())
    }

    fn sample_action(&mut self) -> usize {
        self.action_space().sample(&mut self.action_rng)
    }

    fn render(&self) -> String {
        let (prow, pcol) = from_1d_to_2d(self.ncol, self.player_pos);
        let mut out = String::with_capacity(self.nrow * (self.ncol + 1));
        for (r, row) in self.map.iter().enumerate() {
            if r > 0 {
                out.push('\n');
            }
            for (c, letter) in row.iter().enumerate() {
                if r == prow && c == pcol {
                    out.push('@');
                } else if *letter == 'S' {
                    out.push('F');
                } else {
                    out.push(*letter);
                }
            }
        }
        out
    }

    fn action_label(&self, action: usize) -> String {
        Self::ACTIONS
            .get(action)
            .map(|s| s.to_string())
            .unwrap_or_else(|| action.to_string())
    }
}
