//! CV upload, the analysis page (scores, CV content, suggestions) and job
//! matching. Parsing and scoring stay in the backend; this module turns its
//! answers into display-ready views.

pub mod analysis;
pub mod handlers;
pub mod matching;
