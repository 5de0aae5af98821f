mod assignments;
mod companies;
pub mod dto;
mod job_titles;
mod persons;
pub mod response;
mod router;
mod stylesheet;
mod themes;
mod units;

pub use router::{AppState, create_router};
