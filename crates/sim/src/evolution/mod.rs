//! Evolution module providing the per-individual processes of the life cycle.
//!
//! - **Senescence**: age-dependent maximum survival
//! - **Selection**: Gaussian viability selection around the optimum `theta`
//! - **Genetics**: infinitesimal-model breeding values and phenotypes
//! - **Reproduction**: litter sizes and sire choice
//! - **Regulation**: density dependence of reproduction above capacity

pub mod genetics;
pub mod regulation;
pub mod reproduction;
pub mod selection;
pub mod senescence;

pub use genetics::GeneticsModel;
pub use regulation::PopulationRegulator;
pub use reproduction::{MatingPool, ReproductionModel, Sire};
pub use selection::{GaussianSelection, SelectionModel};
pub use senescence::{SenescenceCurve, SenescenceModel};
