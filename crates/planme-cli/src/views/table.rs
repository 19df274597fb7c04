use chrono::{DateTime, Utc};
use chrono_humanize::Humanize;
use comfy_table::{Attribute, Cell, Color, Row, Table};
use planme_core::models::{RecurrenceEndType, RecurrenceFrequency, RecurrenceRule};
use planme_core::weekdays::date_to_weekday;

pub fn display_occurrences(occurrences: &[DateTime<Utc>], now: DateTime<Utc>) {
    if occurrences.is_empty() {
        println!("No upcoming occurrences (series may have ended)");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Date (UTC)", "Weekday", "Due"]);

    let today = now.date_naive();
    for (i, occurrence) in occurrences.iter().enumerate() {
        let mut row = Row::new();
        row.add_cell(Cell::new(i + 1));
        row.add_cell(Cell::new(occurrence.format("%Y-%m-%d %H:%M").to_string()).add_attribute(Attribute::Bold));
        row.add_cell(Cell::new(date_to_weekday(*occurrence).name()));

        let due_text = occurrence.humanize();
        let due_cell = if *occurrence < now {
            Cell::new(due_text).fg(Color::DarkGrey)
        } else if occurrence.date_naive() == today {
            Cell::new(due_text).fg(Color::Yellow)
        } else {
            Cell::new(due_text)
        };
        row.add_cell(due_cell);
        table.add_row(row);
    }

    println!("{table}");
}

/// One-line human description, e.g. "every 2 weeks on Monday, Friday".
pub fn describe_rule(rule: &RecurrenceRule) -> String {
    let interval = rule.effective_interval();
    let every = |unit: &str| {
        if interval == 1 {
            format!("every {unit}")
        } else {
            format!("every {interval} {unit}s")
        }
    };

    let pattern = match rule.frequency {
        RecurrenceFrequency::None => "never".to_string(),
        RecurrenceFrequency::DailyInterval => every("day"),
        RecurrenceFrequency::WeeklyDays => {
            let days: Vec<&str> = rule.weekdays().into_iter().map(|day| day.name()).collect();
            format!("{} on {}", every("week"), days.join(", "))
        }
        RecurrenceFrequency::MonthlyDayOfMonth => {
            format!("{} on day {}", every("month"), rule.day_of_month.unwrap_or_default())
        }
        RecurrenceFrequency::MonthlyWeekdaysOfMonth => {
            let position = match rule.week_of_month {
                Some(-1) => "last".to_string(),
                Some(week) => ordinal(week),
                None => "?".to_string(),
            };
            let weekday = rule.weekday_of_month.map_or("?", |day| day.name());
            format!("{} on the {} {}", every("month"), position, weekday)
        }
        RecurrenceFrequency::YearlyInterval => {
            format!("{} on {}", every("year"), rule.start_date_time.format("%B %-d"))
        }
    };

    let start = rule.start_date_time.format("%Y-%m-%d %H:%M UTC");
    match (rule.end_type, rule.ends_on()) {
        (RecurrenceEndType::Once, _) => format!("once at {start}"),
        (_, Some(end)) => format!("{pattern} from {start} until {}", end.format("%Y-%m-%d %H:%M UTC")),
        (RecurrenceEndType::AfterOccurrences, _) => format!(
            "{pattern} from {start}, {} times",
            rule.max_occurrences.unwrap_or_default()
        ),
        _ => format!("{pattern} from {start}"),
    }
}

fn ordinal(n: i8) -> String {
    let suffix = match n {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
