use crate::engine::systems::EngineSystem;
use crate::engine::timestep::TimeStep;
use candela_utils::EngineArgs;
use nalgebra::Vector3;
use rapier3d::prelude::*;
use web_time::{Duration, Instant};

const EARTH_GRAVITY: f32 = 9.81;

/// The 3D physics engine.
pub struct DynamicsSystem {
    pub gravity: Vector3<f32>,
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub current_timepoint: Instant,
    pub timestep: Duration,
    pub alpha: f32,
    paused: bool,
}

impl Default for DynamicsSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicsSystem {
    pub fn new() -> Self {
        let timestep = EngineArgs::get().physics_timestep.unwrap_or(1.0 / 60.0);

        DynamicsSystem {
            gravity: Vector3::new(0.0, -EARTH_GRAVITY, 0.0),
            rigid_body_set: RigidBodySet::default(),
            collider_set: ColliderSet::default(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::default(),
            island_manager: IslandManager::default(),
            broad_phase: DefaultBroadPhase::default(),
            narrow_phase: NarrowPhase::default(),
            impulse_joint_set: ImpulseJointSet::default(),
            multibody_joint_set: MultibodyJointSet::default(),
            ccd_solver: CCDSolver,
            current_timepoint: Instant::now(),
            timestep: Duration::from_secs_f64(timestep),
            alpha: 0.0,
            paused: false,
        }
    }

    /// True once a whole fixed step of wall-clock time has accumulated;
    /// advances the accumulator anchor when it fires.
    pub fn is_due(&mut self) -> bool {
        if self.current_timepoint.elapsed() < self.timestep {
            return false;
        }
        self.current_timepoint += self.timestep;
        true
    }

    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(), // no hooks yet
            &(), // no events yet
        );
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

impl EngineSystem for DynamicsSystem {
    fn name(&self) -> &'static str {
        "dynamics physics"
    }

    fn on_update(&mut self, _ts: &TimeStep) {
        if self.paused {
            return;
        }

        while self.is_due() {
            self.step();
        }

        let rem = self.current_timepoint.elapsed();
        self.alpha = (rem.as_secs_f32() / self.timestep.as_secs_f32()).clamp(0.0, 1.0);
    }

    fn set_paused(&mut self, paused: bool) {
        // re-anchor when resuming, otherwise the whole pause bursts through at once
        if self.paused && !paused {
            self.current_timepoint = Instant::now();
        }
        self.paused = paused;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
