//! Warm-up exercises
//!
//! - `rectangle`: perimeter and area
//! - `two_sum`: index pair lookup
//! - `stats`: sum/min/max/average/sort over floats
//! - `text`: character frequency
//! - `person`: age and job-fit helpers
//! - `people`: `name|job|year` record parsing
pub mod people;
pub mod person;
pub mod rectangle;
pub mod stats;
pub mod text;
pub mod two_sum;

pub use people::{parse_people, read_people_file};
pub use person::Person;
pub use stats::{StatsError, Summary};
pub use text::char_count;
pub use two_sum::two_sum;
