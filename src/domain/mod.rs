pub mod measurement;
pub mod quality_parameter;
pub mod supplier;
