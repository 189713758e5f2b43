// Application layer - Use case interactors

pub mod analyze_interactor;
pub mod assemble_interactor;
pub mod container;
pub mod narrate_interactor;

// Re-export interactors
pub use analyze_interactor::{AnalyzeInteractor, AnalyzeRequest};
pub use assemble_interactor::{AssembleInteractor, ProgressFn};
pub use narrate_interactor::{NarrateInteractor, NarrateRequest};
