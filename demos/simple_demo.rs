use chrono::Local;
use cronline::parser::CronParser;
use cronline::Schedule;

fn main() {
    // Parse cron expression, both day fields have to match
    let parser = CronParser::builder().dom_and_dow(true).build();
    let schedule = Schedule::with_parser("0 18 13 * FRI", &parser, Local)
        .expect("Couldn't parse cron string");

    // Compare cron pattern with current local time
    let time = Local::now();
    let matches = schedule.is_match(&time);

    // Get next and previous match
    let next = schedule.next(&time).expect("No next occurrence");
    let previous = schedule.previous(&time).expect("No previous occurrence");

    println!("Current time is: {time}");
    println!(
        "Pattern \"{}\" does {} time {}",
        schedule.cron(),
        if matches { "match" } else { "not match" },
        time
    );
    println!("Pattern \"{}\" will match next time at {}", schedule.cron(), next);
    println!("Pattern \"{}\" matched last time at {}", schedule.cron(), previous);
}
