use frozen_lake_tabular::env::{Discrete, Env, EnvError, Step, StepInfo};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two states, two actions. Action 0 in state 0 pays 1 and ends the episode
/// in state 1; action 1 pays nothing and stays in state 0.
#[allow(dead_code)]
pub struct TwoStateEnv {
    state: usize,
    ready: bool,
    steps: usize,
    max_steps: usize,
    rng: StdRng,
}

#[allow(dead_code)]
impl TwoStateEnv {
    pub fn new(max_steps: usize, seed: u64) -> Self {
        Self {
            state: 0,
            ready: false,
            steps: 0,
            max_steps,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Env for TwoStateEnv {
    fn reset(&mut self) -> usize {
        self.state = 0;
        self.steps = 0;
        self.ready = true;
        self.state
    }

    fn step(&mut self, action: usize) -> Result<Step, EnvError> {
        if !self.ready {
            return Err(EnvError::NotReady);
        }
        if action >= 2 {
            return Err(EnvError::InvalidAction { action, n: 2 });
        }
        self.steps += 1;
        let (next_state, reward, terminated) = match (self.state, action) {
            (0, 0) => (1, 1.0, true),
            (s, _) => (s, 0.0, false),
        };
        self.state = next_state;
        let truncated = !terminated && self.steps >= self.max_steps;
        let done = terminated || truncated;
        if done {
            self.ready = false;
        }
        Ok(Step {
            next_state,
            reward,
            done,
            info: StepInfo {
                prob: 1.0,
                truncated,
            },
        })
    }

    fn action_space(&self) -> Discrete {
        Discrete::new(2)
    }

    fn observation_space(&self) -> Discrete {
        Discrete::new(2)
    }

    fn sample_action(&mut self) -> usize {
        self.action_space().sample(&mut self.rng)
    }

    fn render(&self) -> String {
        format!("state {}", self.state)
    }
}

/// Every step pays 1 and ends the episode.
#[allow(dead_code)]
#[derive(Default)]
pub struct AlwaysWinEnv {
    pub resets: usize,
    pub steps: usize,
}

impl Env for AlwaysWinEnv {
    fn reset(&mut self) -> usize {
        self.resets += 1;
        0
    }

    fn step(&mut self, _action: usize) -> Result<Step, EnvError> {
        self.steps += 1;
        Ok(Step {
            next_state: 1,
            reward: 1.0,
            done: true,
            info: StepInfo {
                prob: 1.0,
                truncated: false,
            },
        })
    }

    fn action_space(&self) -> Discrete {
        Discrete::new(2)
    }

    fn observation_space(&self) -> Discrete {
        Discrete::new(2)
    }

    fn sample_action(&mut self) -> usize {
        0
    }

    fn render(&self) -> String {
        "win".to_string()
    }
}
