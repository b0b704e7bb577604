pub mod evaluation;
pub mod job;
pub mod resume;
pub mod user;

pub use evaluation::{Evaluation, FitVerdict};
pub use job::JobDescription;
pub use resume::Resume;
pub use user::{Role, User};
