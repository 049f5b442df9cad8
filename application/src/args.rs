//! [`Args`] definitions.

use clap::Parser;
use service::read::course::FilterState;

/// Browser of the course catalog.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Filters to browse the catalog with.
    #[command(flatten)]
    pub filter: Filter,

    /// Number of pages to load.
    #[arg(short, long, default_value_t = 1)]
    pub pages: u32,

    /// Print only this many of the latest loaded courses.
    #[arg(long)]
    pub latest: Option<usize>,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Catalog filters.
#[derive(Clone, Debug, Default, clap::Args)]
pub struct Filter {
    /// Text to search for.
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Category, subject or stage name.
    #[arg(long, default_value = "")]
    pub category: String,

    /// `Beginner`, `Intermediate`, `Advanced` or `All Levels`.
    #[arg(long, default_value = "")]
    pub level: String,

    /// `free`, `$0-$50`, `$50-$100` or `$100+`.
    #[arg(long, default_value = "")]
    pub price: String,

    /// Teacher name.
    #[arg(long, default_value = "")]
    pub teacher: String,

    /// `popular`, `newest`, `rating`, `price-low` or `price-high`.
    #[arg(long, default_value = "")]
    pub sort: String,
}

impl From<Filter> for FilterState {
    fn from(value: Filter) -> Self {
        let Filter {
            search,
            category,
            level,
            price,
            teacher,
            sort,
        } = value;
        Self {
            search,
            category,
            level,
            price,
            teacher,
            sort,
        }
    }
}
