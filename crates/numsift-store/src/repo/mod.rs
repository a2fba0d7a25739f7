pub mod cities;
pub mod people;
pub mod source_files;

pub use cities::{CitiesRepo, City, CityCount};
pub use people::{ExportRow, PeopleRepo, Person};
pub use source_files::{Provenance, SourceFile, SourceFilesRepo};
