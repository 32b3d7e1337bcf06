//! Image Analysis
//!
//! Sends an image and a prompt to a multimodal `generateContent` endpoint on a
//! background worker and reports progress and the outcome through events.

pub mod error;
pub mod events;
pub mod pool;
pub mod request;
pub mod task;

pub use events::{TaskEvent, TaskEventKind};
pub use pool::WorkerPool;
pub use task::AnalysisTask;
