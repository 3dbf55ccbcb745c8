pub mod check;
pub mod probe;
pub mod score;
pub mod track_info;
