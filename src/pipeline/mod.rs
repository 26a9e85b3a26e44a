mod naming;
mod options;
mod orchestrator;

pub use naming::output_name;
pub use options::{LanguageSelection, Throttle, TranslationOptions};
pub use orchestrator::{
    ArtifactSink, BatchReport, Document, DocumentReport, LanguageOutcome, MemorySink, NoProgress,
    Orchestrator, Progress, ProgressSink, RunStatus,
};
