use chrono::Utc;
use chrono_tz::{America::New_York, Asia::Tokyo};
use cronline::Schedule;

fn main() {
    let now = Utc::now();

    // The same expression is read as wall-clock time in each zone
    let new_york = Schedule::new("0 9 * * *", New_York).expect("Couldn't parse cron string");
    let tokyo = Schedule::new("0 9 * * *", Tokyo).expect("Couldn't parse cron string");

    let next_new_york = new_york
        .next(&now.with_timezone(&New_York))
        .expect("No next occurrence");
    let next_tokyo = tokyo
        .next(&now.with_timezone(&Tokyo))
        .expect("No next occurrence");

    println!("Now:      {now}");
    println!("New York: {next_new_york} ({})", next_new_york.with_timezone(&Utc));
    println!("Tokyo:    {next_tokyo} ({})", next_tokyo.with_timezone(&Utc));
}
