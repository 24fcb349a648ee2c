pub mod candidate;
pub mod certification;
pub mod education;
pub mod project;
pub mod section;
pub mod user;
pub mod work_experience;
