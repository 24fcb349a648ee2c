pub mod candidate_dto;
pub mod section_dto;
