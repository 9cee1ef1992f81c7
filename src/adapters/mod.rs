// Adapters layer: concrete implementations of the domain ports (problem loading, answer input).

pub mod csv_loader;
pub mod line_source;

pub use csv_loader::CsvProblemLoader;
pub use line_source::LineAnswerSource;
