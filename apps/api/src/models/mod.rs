pub mod candidate;
pub mod job;
pub mod resume;

pub use candidate::CandidateRow;
pub use job::JobRow;
pub use resume::ResumeRow;
