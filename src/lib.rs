pub mod benchmark;
pub mod configuration;
pub mod simulation;

pub use simulation::states::{normalized, NVec3, Particle, ParticleKind, System};
pub use simulation::params::{
    DiskParams, LogLevel, ParamsError, SimulationParams, SpheroidalParams, SpiralParams,
    Verbosity, G_GALACTIC,
};
pub use simulation::shells::{make_shells, shell_force, Shell, ShellError, SHELL_SOFTENING_SQ};
pub use simulation::spatial::SpatialGrid;
pub use simulation::forces::{Force, ForceSet, LocalizedGravity, ShellGravity};
pub use simulation::integrator::{adaptive_timestep, verlet_half_kick, verlet_kick_drift};
pub use simulation::disk::form_disk;
pub use simulation::diagnostics::{Diagnostics, RadialDensityProfile, RotationCurve};
pub use simulation::engine::{run, Engine};
pub use simulation::scenario::{ConfigError, Scenario};

pub use configuration::config::ScenarioConfig;

pub use benchmark::benchmark::{bench_forces, bench_step};
