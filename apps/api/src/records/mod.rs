//! Candidates, resumes and jobs: the stored inputs an analysis can refer to by id.

pub mod handlers;
pub mod store;
