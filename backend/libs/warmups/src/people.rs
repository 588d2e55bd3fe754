use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::person::Person;

/// Parse `name|job|year_of_birth` records, one per line.
///
/// Names are upper-cased and jobs lower-cased. Blank lines are ignored; lines
/// with missing fields or a non-numeric year are skipped with a warning.
pub fn parse_people<R: BufRead>(reader: R) -> io::Result<Vec<Person>> {
    let mut people = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = line.split('|');
        let (Some(name), Some(job), Some(year)) = (fields.next(), fields.next(), fields.next())
        else {
            tracing::warn!(line = line_no, "Skipping record with missing fields");
            continue;
        };

        let year_of_birth = match year.trim().parse::<i64>() {
            Ok(year) => year,
            Err(e) => {
                tracing::warn!(
                    line = line_no,
                    name = %name.trim(),
                    error = %e,
                    "Error converting year of birth"
                );
                continue;
            }
        };

        people.push(Person::new(
            name.trim().to_uppercase(),
            job.trim().to_lowercase(),
            year_of_birth,
        ));
    }

    Ok(people)
}

/// Open `path` and parse it with [`parse_people`].
pub fn read_people_file(path: impl AsRef<Path>) -> io::Result<Vec<Person>> {
    let file = File::open(path)?;
    parse_people(BufReader::new(file))
}
