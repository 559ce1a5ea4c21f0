use anyhow::{bail, Result};
use pitch_core::{EnvSettings, FieldGeometry, Frame, RobotCommand, TeamColor};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    decode_command, encode_observation, evaluate_tick, initial_frame, nearest_robot,
    resolve_possession, Action, Normalizer, Policy, Possession, ShapingReport, Simulation,
};

/// The result of one environment step.
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub observation: Vec<f64>,
    pub reward: f64,
    pub done: bool,
    /// Episode-cumulative breakdown of every reward term and termination
    /// cause, for external reporting.
    pub shaping: ShapingReport,
}

/// Mutable state of one episode, recreated at every reset.
struct Episode {
    frame: Frame,
    done_limit: f64,
    active_index: usize,
    possession: Possession,
    last_commands: Option<Vec<RobotCommand>>,
    steps: u32,
    terminated: bool,
    shaping: ShapingReport,
}

impl Episode {
    fn new(frame: Frame, done_limit: f64) -> Self {
        Self {
            frame,
            done_limit,
            active_index: 0,
            possession: Possession::None,
            last_commands: None,
            steps: 0,
            terminated: false,
            shaping: ShapingReport::default(),
        }
    }

    /// Encode the current frame and refresh the active-robot and possession
    /// bookkeeping that rides along with every observation.
    fn observe(&mut self, normalizer: &Normalizer, settings: &EnvSettings) -> Vec<f64> {
        if let Some((index, _)) = nearest_robot(&self.frame, TeamColor::Blue) {
            self.active_index = index;
        }
        self.possession =
            resolve_possession(&self.frame, self.last_commands.as_deref(), settings);
        encode_observation(&self.frame, normalizer)
    }
}

/// The shoot-task training environment.
///
/// Single-threaded and synchronous: one [`ShootEnv::step`] call drives exactly
/// one simulation advance and one reward/observation computation. For
/// concurrent trajectories, instantiate one environment per caller.
pub struct ShootEnv<S, P> {
    settings: EnvSettings,
    geometry: FieldGeometry,
    normalizer: Normalizer,
    sim: S,
    scripted: P,
    rng: StdRng,
    episode: Option<Episode>,
}

impl<S: Simulation, P: Policy> ShootEnv<S, P> {
    /// Create a new environment. `scripted` supplies actions for every robot
    /// the external policy does not control. Pass a seed for reproducible
    /// placements and kick draws.
    pub fn new(settings: EnvSettings, sim: S, scripted: P, seed: Option<u64>) -> Result<Self> {
        settings.validate()?;
        let geometry = FieldGeometry::from_variant(settings.field);
        geometry.validate()?;
        let normalizer = Normalizer::new(&geometry, &settings);
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            settings,
            geometry,
            normalizer,
            sim,
            scripted,
            rng,
            episode: None,
        })
    }

    /// Start a new episode: generate a legal random starting frame, hand it to
    /// the simulator, and return the first observation.
    pub fn reset(&mut self) -> Result<Vec<f64>> {
        let spawned = initial_frame(&self.settings, &self.geometry, &mut self.rng);
        self.sim.reset(&spawned.frame)?;
        log::debug!(
            "episode reset: ball at ({:.2}, {:.2}), done limit x = {:.2}",
            spawned.frame.ball.position.x,
            spawned.frame.ball.position.y,
            spawned.done_limit
        );
        let mut episode = Episode::new(spawned.frame, spawned.done_limit);
        let observation = episode.observe(&self.normalizer, &self.settings);
        self.episode = Some(episode);
        Ok(observation)
    }

    /// Advance the environment by one tick with the given policy action.
    ///
    /// The action drives the active robot; every other robot receives an
    /// action from the scripted policy. All commands go through the same
    /// decode path. Returns the new observation, the scalar reward, the done
    /// flag and the shaping diagnostics.
    pub fn step(&mut self, action: Action) -> Result<StepOutput> {
        let episode = match self.episode.as_mut() {
            Some(episode) => episode,
            None => bail!("step() called before reset()"),
        };
        if episode.terminated {
            bail!("episode has terminated; call reset() to start a new one");
        }

        let mut commands = Vec::with_capacity(
            episode.frame.blue.len() + episode.frame.yellow.len(),
        );
        for i in 0..episode.frame.blue.len() {
            let robot = &episode.frame.blue[i];
            let robot_action = if i == episode.active_index {
                action
            } else {
                self.scripted.action(&episode.frame, TeamColor::Blue, i)
            };
            commands.push(decode_command(
                TeamColor::Blue,
                robot.id,
                robot_action,
                robot.heading,
                &self.settings,
                &mut self.rng,
            ));
        }
        for i in 0..episode.frame.yellow.len() {
            let robot = &episode.frame.yellow[i];
            let robot_action = self.scripted.action(&episode.frame, TeamColor::Yellow, i);
            commands.push(decode_command(
                TeamColor::Yellow,
                robot.id,
                robot_action,
                robot.heading,
                &self.settings,
                &mut self.rng,
            ));
        }

        let new_frame = self.sim.step(&commands, self.settings.time_step)?;
        let prev_frame = std::mem::replace(&mut episode.frame, new_frame);

        let outcome = evaluate_tick(
            Some(&prev_frame),
            &episode.frame,
            &self.geometry,
            &self.settings,
            episode.done_limit,
            episode.active_index,
            &mut episode.shaping,
        );
        episode.steps += 1;

        let mut done = outcome.done;
        if let Some(event) = outcome.event {
            log::debug!(
                "episode ended after {} steps: {:?}, reward {}",
                episode.steps,
                event,
                outcome.reward
            );
        } else if episode.steps >= self.settings.max_episode_steps {
            log::debug!("episode truncated at {} steps", episode.steps);
            done = true;
        }
        episode.terminated = done;
        episode.last_commands = Some(commands);

        let observation = episode.observe(&self.normalizer, &self.settings);
        Ok(StepOutput {
            observation,
            reward: outcome.reward,
            done,
            shaping: episode.shaping,
        })
    }

    pub fn settings(&self) -> &EnvSettings {
        &self.settings
    }

    pub fn geometry(&self) -> &FieldGeometry {
        &self.geometry
    }

    /// The current frame, if an episode is in progress.
    pub fn frame(&self) -> Option<&Frame> {
        self.episode.as_ref().map(|e| &e.frame)
    }

    /// The roster index of the blue robot the policy currently drives.
    pub fn active_robot(&self) -> Option<usize> {
        self.episode.as_ref().map(|e| e.active_index)
    }

    /// Who held the ball at the last observation.
    pub fn possession(&self) -> Option<Possession> {
        self.episode.as_ref().map(|e| e.possession)
    }
}
