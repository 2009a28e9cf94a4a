use chrono::Local;
use clap::Subcommand;
use chime_core::{format_elapsed, format_remaining, Category, ClockFormat};

#[derive(Subcommand)]
pub enum FormatAction {
    /// Render a remaining-seconds value for a category
    Remaining {
        /// Category: timer, alarm, pomodoro, reminder, stopwatch
        category: String,
        /// Signed remaining seconds
        seconds: f64,
        /// Use a 12-hour clock for absolute times
        #[arg(long)]
        twelve_hour: bool,
    },
    /// Render an elapsed-seconds value
    Elapsed {
        seconds: f64,
    },
}

pub fn run(action: FormatAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        FormatAction::Remaining { category, seconds, twelve_hour } => {
            // Unrecognized categories fall through to the Unknown arm.
            let category: Category =
                serde_json::from_value(serde_json::Value::String(category))?;
            let clock = if twelve_hour {
                ClockFormat::TwelveHour
            } else {
                ClockFormat::TwentyFourHour
            };
            println!("{}", format_remaining(category, seconds, clock, Local::now()));
        }
        FormatAction::Elapsed { seconds } => {
            println!("{}", format_elapsed(seconds));
        }
    }
    Ok(())
}
