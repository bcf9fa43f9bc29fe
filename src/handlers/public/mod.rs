pub mod bands;
pub mod docs;
pub mod featured;
pub mod status;
