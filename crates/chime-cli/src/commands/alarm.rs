use chrono::{Local, TimeZone};
use clap::Subcommand;
use chime_core::{Alarm, Recurring};

#[derive(Subcommand)]
pub enum AlarmAction {
    /// Compute the next trigger for a time of day and recurrence rule
    Next {
        hour: u32,
        minute: u32,
        /// once, daily, weekdays, weekends, or comma-separated days (0 = Monday)
        #[arg(long, default_value = "once")]
        recurring: String,
        /// Pending snooze instant (epoch seconds)
        #[arg(long)]
        snoozed_until: Option<i64>,
        /// Last fire instant (epoch seconds)
        #[arg(long)]
        last_triggered: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: AlarmAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AlarmAction::Next { hour, minute, recurring, snoozed_until, last_triggered, json } => {
            if hour > 23 || minute > 59 {
                return Err(format!("invalid time of day {hour:02}:{minute:02}").into());
            }
            let now = Local::now();
            let mut alarm = Alarm::new(hour, minute, Recurring::from(recurring), now.timestamp());
            alarm.snoozed_until = snoozed_until;
            alarm.last_triggered = last_triggered;

            match alarm.next_trigger(now.clone()) {
                Some(trigger) => {
                    if json {
                        println!(
                            "{}",
                            serde_json::json!({
                                "next_trigger": trigger,
                                "seconds_until": trigger - now.timestamp(),
                            })
                        );
                    } else {
                        let local = Local.timestamp_opt(trigger, 0).single();
                        match local {
                            Some(dt) => println!("{trigger} ({})", dt.format("%Y-%m-%d %H:%M:%S")),
                            None => println!("{trigger}"),
                        }
                    }
                }
                None => println!("never (disabled)"),
            }
        }
    }
    Ok(())
}
