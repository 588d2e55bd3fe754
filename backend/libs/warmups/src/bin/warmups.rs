//! warmups CLI - run the warm-up exercises from the command line

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use warmups::{char_count, read_people_file, rectangle, two_sum, Person, Summary};

#[derive(Parser, Debug)]
#[command(name = "warmups", author, version, about = "Small algorithm exercises")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Perimeter and area of an X by Y rectangle
    Rectangle { x: f64, y: f64 },
    /// Indices of two numbers that add up to TARGET
    TwoSum {
        #[arg(long, allow_hyphen_values = true)]
        target: i64,
        #[arg(required = true, allow_hyphen_values = true)]
        nums: Vec<i64>,
    },
    /// Sum, max, min, average and sorted order of VALUES
    Stats {
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<f64>,
    },
    /// Character frequencies of TEXT
    CharCount { text: String },
    /// Age and job fit for one person
    Person {
        name: String,
        job: String,
        year_of_birth: i64,
    },
    /// Parse a `name|job|year` file and print the records
    People { path: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warmups=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rectangle { x, y } => {
            println!("Rectangle perimeter: {}", rectangle::perimeter(x, y));
            println!("Rectangle area: {}", rectangle::area(x, y));
        }
        Commands::TwoSum { target, nums } => match two_sum(&nums, target) {
            Some((i, j)) => println!("[{}, {}]", i, j),
            None => println!("no pair adds up to {}", target),
        },
        Commands::Stats { values } => {
            let summary = Summary::of(&values)?;
            println!("Sum: {}", summary.sum);
            println!("Max number: {}", summary.max);
            println!("Min number: {}", summary.min);
            println!("Average: {}", summary.average);
            println!("Sorted: {:?}", summary.sorted);
        }
        Commands::CharCount { text } => {
            let mut counts: Vec<_> = char_count(&text).into_iter().collect();
            counts.sort_unstable();
            for (c, n) in counts {
                println!("{}: {}", c, n);
            }
        }
        Commands::Person {
            name,
            job,
            year_of_birth,
        } => {
            let person = Person::new(name, job, year_of_birth);
            println!("{}'s age: {}", person.name, person.age());
            println!("Is {}'s job fit: {}", person.name, person.is_job_fit());
        }
        Commands::People { path } => {
            let people = read_people_file(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            for p in people {
                println!("{} | {} | {}", p.name, p.job, p.year_of_birth);
            }
        }
    }

    Ok(())
}
