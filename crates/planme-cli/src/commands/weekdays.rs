use anyhow::Result;
use owo_colors::OwoColorize;
use planme_core::weekdays::{decode_weekdays, encode_weekdays, try_weekday_from_js_day};

use crate::cli::{WeekdaysCommand, WeekdaysSubcommand};
use crate::parser::parse_days_string;

pub fn weekdays(command: WeekdaysCommand) -> Result<()> {
    match command.command {
        WeekdaysSubcommand::Encode { days } => {
            let days = parse_days_string(&days)?;
            println!("{}", encode_weekdays(days));
        }
        WeekdaysSubcommand::Decode { mask } => {
            let days = decode_weekdays(mask);
            if days.is_empty() {
                println!("{}", "No weekdays selected".bright_black());
            } else {
                let names: Vec<&str> = days.iter().map(|day| day.name()).collect();
                println!("{}", names.join(", "));
            }
        }
        WeekdaysSubcommand::FromJs { day } => {
            let weekday = try_weekday_from_js_day(day)?;
            println!("{} (ISO {})", weekday, weekday.iso_number());
        }
    }
    Ok(())
}
