//! newsroom-core: generate, evaluate, learn, regenerate.
//!
//! `evaluator` and `learner` are pure and safe to call from any thread.
//! `generator` is the only component that touches the network, and it never
//! surfaces an error: failures degrade to a deterministic script.

pub mod episode;
pub mod evaluator;
pub mod generator;
pub mod hashing;
pub mod learner;
pub mod prompt;
pub mod session;
pub mod trace;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use episode::{Episode, EpisodeIdentity, EpisodeRequest, EpisodeRunner, EpisodeSummary};
pub use evaluator::{evaluate, EvaluatorConfig};
pub use generator::{
    fallback_text, Generation, GenerationProfile, HuggingFaceGenerator, OfflineGenerator,
    TextGenerator,
};
pub use learner::learn;
pub use prompt::build_prompt;
pub use session::{render_weight_bars, Session, SessionReport, DEMO_TOPICS};
pub use trace::{Decision, Stage, TraceStep};
