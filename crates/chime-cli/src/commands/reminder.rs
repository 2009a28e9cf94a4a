use chrono::{Local, TimeZone, Utc};
use clap::Subcommand;
use chime_core::{one_shot_trigger, Recurrence, Reminder, ReminderDraft, ReminderState, TimeOfDay};

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Simulate a reminder's fire sequence
    Preview {
        /// Interval in minutes
        #[arg(long, default_value = "60")]
        frequency: u32,
        /// -1 infinite, 0 pending, positive N finite
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        recurrences: i64,
        /// Number of fires to simulate
        #[arg(long, default_value = "5")]
        fires: u32,
    },
    /// First trigger for an explicit time of day
    OneShot {
        hour: u32,
        minute: u32,
    },
}

pub fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ReminderAction::Preview { frequency, recurrences, fires } => {
            let draft = ReminderDraft {
                label: "preview".into(),
                frequency_minutes: Some(frequency),
                recurrences: Recurrence::from(recurrences),
                only_while_gaming: false,
                reset_on_game_start: false,
                start_time: None,
                sound: None,
            };
            let mut reminder = Reminder::from_draft("preview".into(), draft);
            let now = Utc::now();
            reminder.schedule_first(now);

            for fire in 1..=fires {
                let Some(trigger) = reminder.next_trigger else {
                    println!("fire {fire}: never ({:?})", reminder.state(true));
                    break;
                };
                println!("fire {fire}: +{}s", trigger - now.timestamp());
                if reminder.on_fire(true) == ReminderState::Exhausted {
                    println!("exhausted after fire {fire}");
                    break;
                }
            }
        }
        ReminderAction::OneShot { hour, minute } => {
            if hour > 23 || minute > 59 {
                return Err(format!("invalid time of day {hour:02}:{minute:02}").into());
            }
            let trigger = one_shot_trigger(TimeOfDay { hour, minute }, Local::now());
            match Local.timestamp_opt(trigger, 0).single() {
                Some(dt) => println!("{trigger} ({})", dt.format("%Y-%m-%d %H:%M:%S")),
                None => println!("{trigger}"),
            }
        }
    }
    Ok(())
}
