pub mod handlers;
pub mod keywords;
pub mod pipeline;
pub mod providers;
pub mod scoring;
