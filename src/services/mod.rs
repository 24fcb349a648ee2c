pub mod candidate_service;
pub mod section_service;
