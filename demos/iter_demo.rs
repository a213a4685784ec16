use chrono::Local;
use cronline::Schedule;

fn main() {
    // Every 15 minutes during office hours
    let schedule = Schedule::new("*/15 9-17 * * mon-fri", Local).expect("Couldn't parse cron string");

    let time = Local::now();

    // iter_after never yields the starting time itself
    println!(
        "Finding matches of pattern '{}' starting from {}:",
        schedule.cron(),
        time
    );

    for time in schedule.iter_after(&time).take(5) {
        println!("{}", time);
    }
}
